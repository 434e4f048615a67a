pub mod core;
pub mod orchestration;
pub mod packaging;
pub mod registry;
pub mod security;

pub use crate::core::*;
pub use orchestration::{PublishOrchestrator, PublishRequest};
pub use packaging::{Compressor, DirPackager, Packager, TarGzCompressor};
pub use registry::{HttpTransport, RegistryPublisher, RegistryTransport, publish_route};
pub use security::{
    CredentialBroker, Credentials, InteractiveBroker, PromptSource, TerminalPrompt,
};
