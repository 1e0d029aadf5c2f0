//! Configuration loading: TOML file, profiles, path expansion.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path};
pub use types::{LoggingConfig, RenderConfig, ResolvedConfig};
