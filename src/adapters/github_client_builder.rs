//! GitHub client construction and OAuth2 authorization-code flow.

use std::time::Duration;

use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::adapters::github_http::HttpGitHubClient;
use crate::domain::{AccessToken, AppConfig, AppError, GitHubApiConfig, OAuthConfig};
use crate::ports::{ClientBuilder, RepositoryApi};

/// Builds `HttpGitHubClient`s that share one connection pool.
///
/// The pool is created once; each `build` call binds it to a single token.
#[derive(Debug, Clone)]
pub struct GitHubClientBuilder {
    http: Client,
    api: GitHubApiConfig,
    oauth: OAuthConfig,
}

impl GitHubClientBuilder {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        config.validate()?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.github.timeout_secs))
            .user_agent(config.github.user_agent.clone())
            .build()
            .map_err(|e| AppError::transport("Failed to create HTTP client", e))?;

        Ok(Self { http, api: config.github.clone(), oauth: config.oauth.clone() })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl TokenResponse {
    fn into_token(self) -> Result<AccessToken, AppError> {
        if let Some(error) = self.error {
            let detail = self.error_description.unwrap_or(error);
            return Err(AppError::remote(format!("token exchange rejected: {}", detail), None));
        }

        let access_token = self
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::remote("token exchange returned no access token", None))?;

        Ok(AccessToken {
            access_token,
            token_type: self.token_type.unwrap_or_else(|| "bearer".to_string()),
            refresh_token: self.refresh_token,
            expiry: self.expires_in.map(|secs| Utc::now() + chrono::Duration::seconds(secs)),
        })
    }
}

impl ClientBuilder for GitHubClientBuilder {
    fn build(&self, token: &AccessToken) -> Box<dyn RepositoryApi> {
        Box::new(HttpGitHubClient::new(self.http.clone(), self.api.api_url.clone(), token.clone()))
    }

    fn authorization_url(&self, state: &str) -> Url {
        let mut url = self.oauth.authorize_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("response_type", "code");
            query.append_pair("client_id", &self.oauth.client_id);
            if let Some(redirect) = &self.oauth.redirect_url {
                query.append_pair("redirect_uri", redirect.as_str());
            }
            if !self.oauth.scopes.is_empty() {
                query.append_pair("scope", &self.oauth.scopes.join(" "));
            }
            query.append_pair("state", state);
        }
        url
    }

    fn exchange_code(&self, code: &str) -> Result<AccessToken, AppError> {
        if !self.oauth.is_registered() {
            return Err(AppError::config_error(
                "oauth.client_id and oauth.client_secret must be set to exchange a code",
            ));
        }
        if code.trim().is_empty() {
            return Err(AppError::validation("code", "authorization code must not be empty"));
        }

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("client_id", self.oauth.client_id.as_str()),
            ("client_secret", self.oauth.client_secret.as_str()),
            ("code", code),
        ];
        if let Some(redirect) = &self.oauth.redirect_url {
            form.push(("redirect_uri", redirect.as_str()));
        }

        debug!(token_url = %self.oauth.token_url, "exchanging authorization code");
        let response = self
            .http
            .post(self.oauth.token_url.clone())
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .map_err(|e| AppError::transport("token exchange request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::remote(
                format!("token exchange failed with status {}", status.as_u16()),
                Some(status.as_u16()),
            ));
        }

        let body: TokenResponse = response.json().map_err(|e| AppError::RemoteCall {
            message: "token exchange: failed to parse response".to_string(),
            status: Some(status.as_u16()),
            source: Some(Box::new(e)),
        })?;
        let token = body.into_token()?;
        info!("authorization code exchanged for access token");
        Ok(token)
    }
}
