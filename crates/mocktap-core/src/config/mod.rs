//! Engine configuration and config file parsing.

pub mod error;
pub mod parser;
pub mod settings;

pub use error::ConfigError;
pub use parser::{load_config, parse_config, ConfigFormat};
pub use settings::{CachePolicy, MockerConfig};
