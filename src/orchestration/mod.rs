pub mod publish_orchestrator;

pub use publish_orchestrator::*;
