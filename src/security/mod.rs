pub mod credential_broker;

pub use credential_broker::*;
