//! Configuration loading.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::domain::{AppConfig, AppError};

/// Load configuration from `path`, falling back to defaults when the file is absent.
pub fn load_config(path: &Path) -> Result<AppConfig, AppError> {
    match fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), "loading configuration");
            parse_config_content(&content)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "configuration file not found, using defaults");
            let config = AppConfig::default();
            config.validate()?;
            Ok(config)
        }
        Err(err) => Err(err.into()),
    }
}

/// Parse configuration from string content.
pub fn parse_config_content(content: &str) -> Result<AppConfig, AppError> {
    let config: AppConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
