use std::path::{Path, PathBuf};

use chrono::FixedOffset;

use crate::config::schema::{Config, LogFormat, SUPPORTED_VERSION};
use crate::error::ConfigError;

const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Loads the file if one is given, applies `JOBPORTAL_*` environment
/// overrides, and validates the result.
pub fn load_with_env(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config)?;
    Ok(config)
}

fn apply_env_overrides<F>(config: &mut Config, var: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = var("JOBPORTAL_HOST") {
        config.server.host = host;
    }
    if let Some(port) = var("JOBPORTAL_PORT") {
        config.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
            name: "JOBPORTAL_PORT".to_string(),
            value: port.clone(),
        })?;
    }
    if let Some(path) = var("JOBPORTAL_DATABASE_PATH") {
        config.database.path = Some(PathBuf::from(path));
    }
    if let Some(level) = var("JOBPORTAL_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(format) = var("JOBPORTAL_LOG_FORMAT") {
        config.logging.format = match format.to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => {
                return Err(ConfigError::InvalidEnv {
                    name: "JOBPORTAL_LOG_FORMAT".to_string(),
                    value: format,
                })
            }
        };
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != SUPPORTED_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.server.port == 0 {
        return Err(ConfigError::Validation {
            message: "server.port must not be 0".to_string(),
        });
    }

    if config.auth.token_ttl_hours <= 0 {
        return Err(ConfigError::Validation {
            message: format!(
                "auth.token_ttl_hours must be positive, got {}",
                config.auth.token_ttl_hours
            ),
        });
    }

    if config.scheduling.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
        return Err(ConfigError::Validation {
            message: format!(
                "scheduling.utc_offset_minutes must be within ±{}, got {}",
                MAX_UTC_OFFSET_MINUTES, config.scheduling.utc_offset_minutes
            ),
        });
    }

    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "logging.level must not be empty".to_string(),
        });
    }

    Ok(())
}

impl Config {
    /// The offset interview wall-clock fields are read at.
    pub fn scheduling_offset(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.scheduling.utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::Validation {
                message: format!(
                    "invalid UTC offset of {} minutes",
                    self.scheduling.utc_offset_minutes
                ),
            }
        })
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.auth.token_ttl_hours)
    }
}
