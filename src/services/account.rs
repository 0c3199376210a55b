//! GitHub account operations used by the login flow and repository picker.

use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{AccessToken, AppError, GitHubUser, GitRepo};
use crate::ports::ClientBuilder;

const OWNER_AFFILIATION: &str = "owner";

#[derive(Debug, Clone)]
pub struct AccountService<B: ClientBuilder> {
    builder: B,
}

impl<B: ClientBuilder> AccountService<B> {
    pub fn new(builder: B) -> Self {
        Self { builder }
    }

    pub fn authorization_url(&self, state: &str) -> Url {
        self.builder.authorization_url(state)
    }

    pub fn exchange_code(&self, code: &str) -> Result<AccessToken, AppError> {
        self.builder
            .exchange_code(code)
            .inspect_err(|err| warn!(error = %err, "authorization code exchange failed"))
    }

    /// Profile of the token's owner. A public email is required to link the account.
    pub fn get_user(&self, token: &AccessToken) -> Result<GitHubUser, AppError> {
        let client = self.builder.build(token);
        let raw = client.get_user().inspect_err(|err| warn!(error = %err, "get_user failed"))?;
        let email = raw.email.filter(|email| !email.trim().is_empty()).ok_or_else(|| {
            AppError::remote(format!("GitHub user '{}' has no public email", raw.login), None)
        })?;
        debug!(login = %raw.login, "fetched GitHub user");

        Ok(GitHubUser {
            id: raw.id,
            login: raw.login,
            email,
            name: raw.name,
            location: raw.location,
            avatar_url: raw.avatar_url,
        })
    }

    /// Repositories owned by the token's user.
    pub fn list_repositories(&self, token: &AccessToken) -> Result<Vec<GitRepo>, AppError> {
        let client = self.builder.build(token);
        let repos = client
            .list_repositories(OWNER_AFFILIATION)
            .inspect_err(|err| warn!(error = %err, "list_repositories failed"))?;
        info!(count = repos.len(), "listed owned repositories");

        Ok(repos
            .into_iter()
            .map(|repo| GitRepo {
                visibility: repo.visibility.unwrap_or_else(|| {
                    if repo.private { "private".to_string() } else { "public".to_string() }
                }),
                default_branch: repo.default_branch.unwrap_or_default(),
                name: repo.name,
            })
            .collect())
    }
}
