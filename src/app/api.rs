//! API facade: builds the production context from configuration.

use crate::adapters::GitHubClientBuilder;
use crate::app::AppContext;
use crate::domain::{AppConfig, AppError};

/// Create an `AppContext` backed by the GitHub REST API.
pub fn connect(config: &AppConfig) -> Result<AppContext<GitHubClientBuilder>, AppError> {
    let builder = GitHubClientBuilder::new(config)?;
    Ok(AppContext::new(builder))
}
