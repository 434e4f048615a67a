//! Injected logging capability for the publish pipeline
//!
//! The orchestrator depends on this trait instead of a process-wide logging
//! singleton so that emitted messages can be asserted deterministically in
//! tests.

/// Logging interface consumed by the publish pipeline
pub trait Logger: Send + Sync {
    /// Success-level message
    fn ok(&self, message: &str);

    /// Progress/warning-level message
    fn warn(&self, message: &str);

    /// Error-level message
    fn err(&self, message: &str);
}

/// Console logger used by the CLI binary
#[derive(Debug, Default)]
pub struct ConsoleLogger;

impl ConsoleLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for ConsoleLogger {
    fn ok(&self, message: &str) {
        println!("✅ {}", message);
    }

    fn warn(&self, message: &str) {
        println!("⚠️  {}", message);
    }

    fn err(&self, message: &str) {
        eprintln!("❌ {}", message);
    }
}

/// Recording logger for deterministic assertions in tests
#[cfg(test)]
pub struct RecordingLogger {
    entries: std::sync::Mutex<Vec<(LogLevel, String)>>,
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Ok,
    Warn,
    Err,
}

#[cfg(test)]
impl RecordingLogger {
    pub fn new() -> Self {
        Self {
            entries: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

#[cfg(test)]
impl Logger for RecordingLogger {
    fn ok(&self, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((LogLevel::Ok, message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((LogLevel::Warn, message.to_string()));
    }

    fn err(&self, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((LogLevel::Err, message.to_string()));
    }
}
