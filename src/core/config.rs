//! Configuration structures for component-publisher
//!
//! This module provides type-safe configuration management with serde support.

use serde::{Deserialize, Serialize};

/// Root configuration object
///
/// The only required section is the ordered registry list; order is
/// significant because uploads happen sequentially with fail-fast semantics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RegistryConfig {
    /// Ordered list of registry base URLs
    pub registries: Vec<String>,
}

impl RegistryConfig {
    /// Create a configuration from an explicit endpoint list
    pub fn new(registries: Vec<String>) -> Self {
        Self { registries }
    }

    /// Whether at least one registry endpoint is configured
    pub fn is_empty(&self) -> bool {
        self.registries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserializes_from_yaml() {
        let yaml = "registries:\n  - https://reg-a.example.com\n  - https://reg-b.example.com/\n";
        let config: RegistryConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.registries.len(), 2);
        assert_eq!(config.registries[0], "https://reg-a.example.com");
    }

    #[test]
    fn test_config_preserves_order() {
        let config = RegistryConfig::new(vec![
            "https://b.example.com".to_string(),
            "https://a.example.com".to_string(),
        ]);

        assert_eq!(config.registries[0], "https://b.example.com");
        assert!(!config.is_empty());
    }

    #[test]
    fn test_empty_config() {
        let config = RegistryConfig::default();
        assert!(config.is_empty());
    }
}
