pub mod config;
pub mod config_loader;
pub mod error;
pub mod logger;

pub use config::*;
pub use config_loader::*;
pub use error::*;
pub use logger::*;
