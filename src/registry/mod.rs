pub mod publisher;
pub mod transport;

pub use publisher::*;
pub use transport::*;
