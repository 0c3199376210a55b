pub mod app_config;
pub mod loader;

pub use app_config::{AppConfig, GitHubApiConfig, OAuthConfig};
pub use loader::{load_config, parse_config_content};
