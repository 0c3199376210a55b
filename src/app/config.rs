//! Configuration and credential resolution for the binary.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{AccessToken, AppConfig, AppError};

pub const CONFIG_ENV: &str = "GITNOTES_CONFIG";
pub const TOKEN_ENV: &str = "GITNOTES_TOKEN";
pub const CLIENT_ID_ENV: &str = "GITNOTES_OAUTH_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "GITNOTES_OAUTH_CLIENT_SECRET";
pub const DEFAULT_CONFIG_FILE: &str = "gitnotes.toml";

/// Explicit path, then `GITNOTES_CONFIG`, then `gitnotes.toml` in the working directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_FILE),
    }
}

/// Load the configuration file and apply the OAuth credential overrides from the environment.
pub fn load_app_config(explicit: Option<&Path>) -> Result<AppConfig, AppError> {
    let path = resolve_config_path(explicit);
    let mut config = AppConfig::load(&path)?;
    apply_env_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

pub fn apply_env_overrides(config: &mut AppConfig) {
    if let Some(client_id) = non_empty_var(CLIENT_ID_ENV) {
        debug!("oauth.client_id overridden from environment");
        config.oauth.client_id = client_id;
    }
    if let Some(client_secret) = non_empty_var(CLIENT_SECRET_ENV) {
        debug!("oauth.client_secret overridden from environment");
        config.oauth.client_secret = client_secret;
    }
}

/// Bearer token for the signed-in user.
pub fn token_from_env() -> Result<AccessToken, AppError> {
    non_empty_var(TOKEN_ENV)
        .map(AccessToken::bearer)
        .ok_or_else(|| AppError::config_error(format!("{} must be set", TOKEN_ENV)))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
