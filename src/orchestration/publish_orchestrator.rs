//! Publish orchestrator - entry point of the publish pipeline
//!
//! Drives the complete run: endpoint resolution, packaging, compression,
//! the sequential fail-fast upload loop across all configured registries,
//! and the unconditional cleanup of the compressed artifact.

use crate::core::config::RegistryConfig;
use crate::core::config_loader::{ConfigLoadOptions, ConfigLoader};
use crate::core::{Logger, PublishError};
use crate::packaging::{self, Compressor, Packager};
use crate::registry::publisher::{RegistryPublisher, publish_route};
use crate::registry::transport::RegistryTransport;
use crate::security::{CredentialBroker, Credentials};
use secrecy::SecretString;
use std::path::PathBuf;

/// Immutable input to a publish run
#[derive(Debug, Clone)]
pub struct PublishRequest {
    /// Component source directory
    pub component_path: PathBuf,

    /// Pre-supplied registry username
    pub username: Option<String>,

    /// Pre-supplied registry password
    pub password: Option<SecretString>,
}

impl PublishRequest {
    pub fn new(component_path: PathBuf) -> Self {
        Self {
            component_path,
            username: None,
            password: None,
        }
    }

    /// Credentials reused for every endpoint, present only when both the
    /// username and the password were supplied up front
    fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(Credentials {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }
}

/// Main publish orchestrator
pub struct PublishOrchestrator<'a> {
    packager: &'a dyn Packager,
    compressor: &'a dyn Compressor,
    transport: &'a dyn RegistryTransport,
    broker: &'a dyn CredentialBroker,
    logger: &'a dyn Logger,
}

impl<'a> PublishOrchestrator<'a> {
    pub fn new(
        packager: &'a dyn Packager,
        compressor: &'a dyn Compressor,
        transport: &'a dyn RegistryTransport,
        broker: &'a dyn CredentialBroker,
        logger: &'a dyn Logger,
    ) -> Self {
        Self {
            packager,
            compressor,
            transport,
            broker,
            logger,
        }
    }

    /// Run the full publish pipeline for one component
    ///
    /// Endpoints are uploaded to strictly in configured order and the loop
    /// aborts on the first failure. Cleanup of the compressed artifact runs
    /// exactly once per run on every exit path past endpoint resolution; a
    /// cleanup failure never masks an earlier pipeline error.
    pub async fn publish(
        &self,
        request: &PublishRequest,
        config: ConfigLoadOptions,
    ) -> Result<(), PublishError> {
        let endpoints = ConfigLoader::load(config).await.inspect_err(|e| {
            self.logger.err(&e.to_string());
        })?;

        let artifact_path = packaging::compressed_path(&request.component_path);
        let run_result = self.package_and_upload(request, &endpoints).await;
        let cleanup_result = packaging::remove_artifact(&artifact_path).await;

        match (run_result, cleanup_result) {
            (Err(error), _) => Err(error),
            (Ok(()), Err(e)) => {
                let error = PublishError::Cleanup {
                    path: artifact_path.display().to_string(),
                    message: e.to_string(),
                };
                self.logger.err(&error.to_string());
                Err(error)
            }
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    async fn package_and_upload(
        &self,
        request: &PublishRequest,
        endpoints: &RegistryConfig,
    ) -> Result<(), PublishError> {
        let package_dir = packaging::package_dir(&request.component_path);
        let artifact_path = packaging::compressed_path(&request.component_path);

        self.logger
            .warn(&format!("📦 Packaging into {}...", package_dir.display()));
        let manifest = self
            .packager
            .package(&request.component_path)
            .await
            .map_err(|e| self.packaging_error(e))?;

        self.logger.warn(&format!(
            "🗜️  Compressing into {}...",
            artifact_path.display()
        ));
        self.compressor
            .compress(&package_dir, &artifact_path)
            .await
            .map_err(|e| self.packaging_error(e))?;

        let credentials = request.credentials();
        if credentials.is_some() {
            self.logger.ok("🔑 Using supplied credentials");
        }

        let publisher = RegistryPublisher::new(self.transport, self.broker, self.logger);
        for endpoint in &endpoints.registries {
            let route = publish_route(endpoint, &manifest.name, &manifest.version);
            // Fail-fast: a failing endpoint aborts the loop and the
            // remaining endpoints are never attempted in this run.
            publisher
                .publish_to_endpoint(&route, &artifact_path, credentials.as_ref())
                .await?;
        }

        Ok(())
    }

    fn packaging_error(&self, cause: anyhow::Error) -> PublishError {
        let error = PublishError::Packaging {
            message: format!("{:#}", cause),
        };
        self.logger.err(&error.to_string());
        error
    }
}
