//! Application configuration models.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::AppError;

/// Configuration loaded from `gitnotes.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// GitHub REST API configuration.
    #[serde(default)]
    pub github: GitHubApiConfig,
    /// OAuth2 application registration.
    #[serde(default)]
    pub oauth: OAuthConfig,
}

impl AppConfig {
    /// Read `path`; a missing file yields the defaults.
    pub fn load(path: &std::path::Path) -> Result<Self, AppError> {
        super::load_config(path)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.github.validate()?;
        self.oauth.validate()?;
        Ok(())
    }
}

/// GitHub REST API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitHubApiConfig {
    /// REST API root.
    #[serde(default = "default_api_url")]
    pub api_url: Url,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Sent as `User-Agent`; GitHub rejects requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for GitHubApiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl GitHubApiConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.timeout_secs == 0 {
            return Err(AppError::config_error("github.timeout_secs must be greater than 0"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(AppError::config_error("github.user_agent must not be empty"));
        }
        if self.api_url.cannot_be_a_base() {
            return Err(AppError::config_error("github.api_url must be an absolute URL"));
        }
        Ok(())
    }
}

/// OAuth2 application registration for the authorization-code flow.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OAuthConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub redirect_url: Option<Url>,
    #[serde(default = "default_authorize_url")]
    pub authorize_url: Url,
    #[serde(default = "default_token_url")]
    pub token_url: Url,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_url", &self.redirect_url)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_url: None,
            authorize_url: default_authorize_url(),
            token_url: default_token_url(),
            scopes: default_scopes(),
        }
    }
}

impl OAuthConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.scopes.iter().any(|scope| scope.trim().is_empty() || scope.contains(' ')) {
            return Err(AppError::config_error("oauth.scopes must not contain blank entries"));
        }
        Ok(())
    }

    /// Whether a client id and secret have been configured.
    pub fn is_registered(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

fn default_api_url() -> Url {
    Url::parse("https://api.github.com").expect("Default API URL must be valid")
}

fn default_authorize_url() -> Url {
    Url::parse("https://github.com/login/oauth/authorize")
        .expect("Default authorize URL must be valid")
}

fn default_token_url() -> Url {
    Url::parse("https://github.com/login/oauth/access_token")
        .expect("Default token URL must be valid")
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("gitnotes/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_scopes() -> Vec<String> {
    vec!["read:user".to_string(), "user:email".to_string(), "repo".to_string()]
}
