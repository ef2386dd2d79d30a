pub mod config;
pub mod error;
pub mod logger;
pub mod models;

pub use config::Config;
pub use error::{BridgeError, BridgeResult, ErrorPayload};
