pub mod config;
pub mod error;
pub mod postprocess;

pub use config::Config;
pub use error::ConfigError;
pub use postprocess::PostprocessConfig;
