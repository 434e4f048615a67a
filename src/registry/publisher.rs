//! Per-endpoint publisher with the single-credential-retry protocol
//!
//! For one registry route: attempt the upload with whatever credentials are
//! currently known. An unauthorized response with no known credentials
//! triggers exactly one interactive credential acquisition and one retried
//! upload; unauthorized with credentials present is terminal. All other
//! failures are terminal and classified into the publish error taxonomy.

use crate::core::{Logger, PublishError};
use crate::registry::transport::{RegistryTransport, TransportError};
use crate::security::{CredentialBroker, Credentials};
use std::path::Path;

/// Build the upload route for one endpoint
///
/// A single trailing slash on the base is stripped before joining, so
/// `https://reg.example.com/` and `https://reg.example.com` yield the same
/// route.
pub fn publish_route(endpoint_base: &str, name: &str, version: &str) -> String {
    let base = endpoint_base.strip_suffix('/').unwrap_or(endpoint_base);
    format!("{}/{}/{}", base, name, version)
}

/// Publishes the artifact to a single registry endpoint
pub struct RegistryPublisher<'a> {
    transport: &'a dyn RegistryTransport,
    broker: &'a dyn CredentialBroker,
    logger: &'a dyn Logger,
}

impl<'a> RegistryPublisher<'a> {
    pub fn new(
        transport: &'a dyn RegistryTransport,
        broker: &'a dyn CredentialBroker,
        logger: &'a dyn Logger,
    ) -> Self {
        Self {
            transport,
            broker,
            logger,
        }
    }

    /// Upload the artifact to `route`, retrying once after interactive
    /// credential acquisition on an unauthorized response
    ///
    /// Prompted credentials live only for this endpoint; pre-supplied ones
    /// are passed in again by the caller for every endpoint.
    pub async fn publish_to_endpoint(
        &self,
        route: &str,
        artifact_path: &Path,
        initial_credentials: Option<&Credentials>,
    ) -> Result<(), PublishError> {
        // A pre-supplied pair goes through the broker too; its short-circuit
        // returns the pair without any terminal I/O.
        let mut credentials = match initial_credentials {
            Some(supplied) => Some(
                self.broker
                    .resolve(Some(supplied.clone()))
                    .await
                    .map_err(|e| credential_error(route, e))?,
            ),
            None => None,
        };
        // Bounds the protocol to one retry explicitly, independent of the
        // credentials-present classification rule.
        let mut prompted = false;

        loop {
            self.logger.warn(&format!("📤 Publishing {}...", route));

            match self
                .transport
                .upload(route, artifact_path, credentials.as_ref())
                .await
            {
                Ok(()) => {
                    self.logger.ok(&format!("🚀 Published {}", route));
                    return Ok(());
                }
                Err(TransportError::Unauthorized) => {
                    if credentials.is_some() || prompted {
                        let error = PublishError::InvalidCredentials {
                            route: route.to_string(),
                        };
                        self.logger.err(&error.to_string());
                        return Err(error);
                    }

                    self.logger.warn("🔑 Registry credentials required");
                    let acquired = self
                        .broker
                        .resolve(None)
                        .await
                        .map_err(|e| credential_error(route, e))?;
                    credentials = Some(acquired);
                    prompted = true;
                }
                Err(other) => {
                    let error = classify(route, other);
                    self.logger.err(&error.to_string());
                    return Err(error);
                }
            }
        }
    }
}

fn credential_error(route: &str, cause: anyhow::Error) -> PublishError {
    PublishError::NetworkOrRegistry {
        route: route.to_string(),
        message: format!("credential resolution failed: {}", cause),
    }
}

/// Map a terminal transport failure onto the publish error taxonomy
fn classify(route: &str, error: TransportError) -> PublishError {
    match error {
        TransportError::Unauthorized => PublishError::InvalidCredentials {
            route: route.to_string(),
        },
        TransportError::Registry {
            code,
            suggested_version,
            message,
        } => match (code.as_str(), suggested_version) {
            ("cli_version_not_valid", Some(suggested_version)) => {
                PublishError::CliVersionMismatch { suggested_version }
            }
            ("node_version_not_valid", Some(suggested_version)) => {
                PublishError::RuntimeVersionMismatch { suggested_version }
            }
            (code, _) => PublishError::NetworkOrRegistry {
                route: route.to_string(),
                message: if message.is_empty() {
                    code.to_string()
                } else {
                    message
                },
            },
        },
        TransportError::Other(message) => PublishError::NetworkOrRegistry {
            route: route.to_string(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::logger::RecordingLogger;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Transport replaying a scripted sequence of outcomes
    pub(crate) struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<(), TransportError>>>,
        /// (route, credentials present) per upload attempt
        pub(crate) calls: Mutex<Vec<(String, bool)>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new(responses: Vec<Result<(), TransportError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn attempts(&self) -> Vec<(String, bool)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RegistryTransport for ScriptedTransport {
        async fn upload(
            &self,
            route: &str,
            _artifact_path: &Path,
            credentials: Option<&Credentials>,
        ) -> Result<(), TransportError> {
            self.calls
                .lock()
                .unwrap()
                .push((route.to_string(), credentials.is_some()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(TransportError::Other("script exhausted".to_string())))
        }
    }

    /// Broker counting interactive acquisitions and pre-supplied pass-throughs
    pub(crate) struct CountingBroker {
        pub(crate) prompts: AtomicUsize,
        pub(crate) passthroughs: AtomicUsize,
    }

    impl CountingBroker {
        pub(crate) fn new() -> Self {
            Self {
                prompts: AtomicUsize::new(0),
                passthroughs: AtomicUsize::new(0),
            }
        }

        pub(crate) fn prompt_count(&self) -> usize {
            self.prompts.load(Ordering::SeqCst)
        }

        pub(crate) fn passthrough_count(&self) -> usize {
            self.passthroughs.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CredentialBroker for CountingBroker {
        async fn resolve(
            &self,
            pre_supplied: Option<Credentials>,
        ) -> anyhow::Result<Credentials> {
            if let Some(credentials) = pre_supplied {
                self.passthroughs.fetch_add(1, Ordering::SeqCst);
                return Ok(credentials);
            }
            self.prompts.fetch_add(1, Ordering::SeqCst);
            Ok(Credentials::new("prompted-user", "prompted-pass"))
        }
    }

    const ROUTE: &str = "https://reg.example.com/hello-world/1.0.0";

    fn artifact() -> std::path::PathBuf {
        std::path::PathBuf::from("/tmp/package.tar.gz")
    }

    #[test]
    fn test_publish_route_strips_single_trailing_slash() {
        assert_eq!(
            publish_route("https://reg.example.com/", "foo", "1.0.0"),
            "https://reg.example.com/foo/1.0.0"
        );
        assert_eq!(
            publish_route("https://reg.example.com", "foo", "1.0.0"),
            "https://reg.example.com/foo/1.0.0"
        );
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let transport = ScriptedTransport::new(vec![Ok(())]);
        let broker = CountingBroker::new();
        let logger = RecordingLogger::new();
        let publisher = RegistryPublisher::new(&transport, &broker, &logger);

        publisher
            .publish_to_endpoint(ROUTE, &artifact(), None)
            .await
            .unwrap();

        assert_eq!(transport.attempts(), vec![(ROUTE.to_string(), false)]);
        assert_eq!(broker.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_supplied_credentials_are_resolved_through_the_broker() {
        let transport = ScriptedTransport::new(vec![Ok(())]);
        let broker = CountingBroker::new();
        let logger = RecordingLogger::new();
        let publisher = RegistryPublisher::new(&transport, &broker, &logger);
        let creds = Credentials::new("alice", "s3cret");

        publisher
            .publish_to_endpoint(ROUTE, &artifact(), Some(&creds))
            .await
            .unwrap();

        assert_eq!(broker.passthrough_count(), 1);
        assert_eq!(broker.prompt_count(), 0, "pre-supplied pair must not prompt");
        assert_eq!(transport.attempts(), vec![(ROUTE.to_string(), true)]);
    }

    #[tokio::test]
    async fn test_unauthorized_with_supplied_credentials_is_terminal() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::Unauthorized)]);
        let broker = CountingBroker::new();
        let logger = RecordingLogger::new();
        let publisher = RegistryPublisher::new(&transport, &broker, &logger);
        let creds = Credentials::new("alice", "wrong");

        let err = publisher
            .publish_to_endpoint(ROUTE, &artifact(), Some(&creds))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "INVALID_CREDENTIALS");
        assert!(err.to_string().contains(ROUTE));
        assert_eq!(transport.attempts().len(), 1);
        assert_eq!(broker.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_unauthorized_without_credentials_prompts_once_and_retries() {
        let transport =
            ScriptedTransport::new(vec![Err(TransportError::Unauthorized), Ok(())]);
        let broker = CountingBroker::new();
        let logger = RecordingLogger::new();
        let publisher = RegistryPublisher::new(&transport, &broker, &logger);

        publisher
            .publish_to_endpoint(ROUTE, &artifact(), None)
            .await
            .unwrap();

        let attempts = transport.attempts();
        assert_eq!(attempts.len(), 2);
        assert!(!attempts[0].1, "first attempt must be unauthenticated");
        assert!(attempts[1].1, "retry must carry the prompted credentials");
        assert_eq!(broker.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_second_unauthorized_after_prompt_is_terminal() {
        let transport = ScriptedTransport::new(vec![
            Err(TransportError::Unauthorized),
            Err(TransportError::Unauthorized),
        ]);
        let broker = CountingBroker::new();
        let logger = RecordingLogger::new();
        let publisher = RegistryPublisher::new(&transport, &broker, &logger);

        let err = publisher
            .publish_to_endpoint(ROUTE, &artifact(), None)
            .await
            .unwrap_err();

        assert_eq!(err.code(), "INVALID_CREDENTIALS");
        assert_eq!(transport.attempts().len(), 2);
        assert_eq!(broker.prompt_count(), 1, "no second prompt is permitted");
    }

    #[tokio::test]
    async fn test_cli_version_mismatch_classification() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::Registry {
            code: "cli_version_not_valid".to_string(),
            suggested_version: Some("3.2.0".to_string()),
            message: String::new(),
        })]);
        let broker = CountingBroker::new();
        let logger = RecordingLogger::new();
        let publisher = RegistryPublisher::new(&transport, &broker, &logger);

        let err = publisher
            .publish_to_endpoint(ROUTE, &artifact(), None)
            .await
            .unwrap_err();

        assert_eq!(err.code(), "CLI_VERSION_NOT_VALID");
        assert!(err.to_string().contains("3.2.0"));
        assert_eq!(broker.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_runtime_version_mismatch_classification() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::Registry {
            code: "node_version_not_valid".to_string(),
            suggested_version: Some("12.0.0".to_string()),
            message: String::new(),
        })]);
        let broker = CountingBroker::new();
        let logger = RecordingLogger::new();
        let publisher = RegistryPublisher::new(&transport, &broker, &logger);

        let err = publisher
            .publish_to_endpoint(ROUTE, &artifact(), None)
            .await
            .unwrap_err();

        assert_eq!(err.code(), "NODE_VERSION_NOT_VALID");
        assert!(err.to_string().contains("12.0.0"));
    }

    #[tokio::test]
    async fn test_unknown_registry_code_is_network_error() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::Registry {
            code: "registry_on_fire".to_string(),
            suggested_version: None,
            message: "try later".to_string(),
        })]);
        let broker = CountingBroker::new();
        let logger = RecordingLogger::new();
        let publisher = RegistryPublisher::new(&transport, &broker, &logger);

        let err = publisher
            .publish_to_endpoint(ROUTE, &artifact(), None)
            .await
            .unwrap_err();

        assert_eq!(err.code(), "NETWORK_OR_REGISTRY_ERROR");
        assert!(err.to_string().contains("try later"));
    }

    #[tokio::test]
    async fn test_opaque_failure_carries_raw_cause() {
        let transport = ScriptedTransport::new(vec![Err(TransportError::Other(
            "connection reset by peer".to_string(),
        ))]);
        let broker = CountingBroker::new();
        let logger = RecordingLogger::new();
        let publisher = RegistryPublisher::new(&transport, &broker, &logger);

        let err = publisher
            .publish_to_endpoint(ROUTE, &artifact(), None)
            .await
            .unwrap_err();

        assert_eq!(err.code(), "NETWORK_OR_REGISTRY_ERROR");
        assert!(err.to_string().contains("connection reset by peer"));
    }
}
