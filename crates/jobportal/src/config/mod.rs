pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_str, load_with_env};
pub use schema::{
    AuthConfig, Config, DatabaseConfig, LogFormat, LoggingConfig, SchedulingConfig, ServerConfig,
};
