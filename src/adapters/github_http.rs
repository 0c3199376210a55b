//! GitHub REST client implementation using reqwest.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::domain::{AccessToken, AppError};
use crate::ports::{
    CommitIdentity, ContentDelete, ContentWrite, Contents, RawContent, RawGitRef, RawRepo,
    RawSearchPage, RawTree, RawUser, RepositoryApi,
};

const GITHUB_JSON: &str = "application/vnd.github+json";
const GITHUB_TEXT_MATCH_JSON: &str = "application/vnd.github.text-match+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";
const REPOS_PER_PAGE: &str = "100";

/// Whether a request can be rejected by a blob SHA precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

/// HTTP transport for the GitHub REST API, bound to one access token.
///
/// Each call performs exactly one request.
#[derive(Clone)]
pub struct HttpGitHubClient {
    client: Client,
    api_url: Url,
    token: AccessToken,
}

impl std::fmt::Debug for HttpGitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGitHubClient")
            .field("api_url", &self.api_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl HttpGitHubClient {
    /// Wrap a shared connection pool with a per-user credential.
    pub fn new(client: Client, api_url: Url, token: AccessToken) -> Self {
        Self { client, api_url, token }
    }

    fn endpoint<'a, I>(&self, segments: I) -> Result<Url, AppError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::config_error("GitHub API URL cannot be used as a base"))?
            .pop_if_empty()
            .extend(segments.into_iter().filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> Result<Url, AppError> {
        self.endpoint(["repos", owner, repo, "contents"].into_iter().chain(path.split('/')))
    }

    fn send(
        &self,
        request: RequestBuilder,
        accept: &str,
        access: Access,
        operation: &str,
    ) -> Result<Response, AppError> {
        let response = request
            .bearer_auth(&self.token.access_token)
            .header(ACCEPT, accept)
            .header(API_VERSION_HEADER, API_VERSION)
            .send()
            .map_err(|e| AppError::transport(format!("{} request failed", operation), e))?;

        let status = response.status();
        debug!(operation, status = status.as_u16(), "GitHub response");
        if status.is_success() {
            return Ok(response);
        }

        let body_text = response.text().unwrap_or_default();
        Err(classify_failure(status, &body_text, access, operation))
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
        operation: &str,
    ) -> Result<T, AppError> {
        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = self.send(request, GITHUB_JSON, Access::Read, operation)?;
        parse_json(response, operation)
    }
}

#[derive(Debug, Serialize)]
struct WriteBody<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    committer: &'a CommitIdentity,
    author: &'a CommitIdentity,
}

#[derive(Debug, Serialize)]
struct DeleteBody<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
    committer: &'a CommitIdentity,
    author: &'a CommitIdentity,
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    content: RawContent,
}

fn parse_json<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T, AppError> {
    let status = response.status();
    let body_text = response
        .text()
        .map_err(|e| AppError::transport(format!("{}: failed to read response", operation), e))?;
    serde_json::from_str(&body_text).map_err(|e| AppError::RemoteCall {
        message: format!("{}: failed to parse response", operation),
        status: Some(status.as_u16()),
        source: Some(Box::new(e)),
    })
}

/// Conflicts only arise from writes; a read answered with 409 means the
/// repository has no commits yet.
fn classify_failure(status: StatusCode, body: &str, access: Access, operation: &str) -> AppError {
    let remote_message = extract_error_message(body);
    match (status.as_u16(), access) {
        (404, _) => AppError::not_found(format!("{}: no such path or ref", operation)),
        (409, Access::Write) => AppError::Conflict {
            message: format!("{}: blob SHA does not match the current file", operation),
        },
        (409, Access::Read) => AppError::not_found(format!("{}: repository is empty", operation)),
        (422, Access::Write)
            if remote_message.as_deref().is_some_and(mentions_sha_precondition) =>
        {
            AppError::Conflict {
                message: format!("{}: file changed or already exists on the remote", operation),
            }
        }
        (401, _) => AppError::remote(
            format!("{}: credential rejected", operation),
            Some(status.as_u16()),
        ),
        _ => {
            let detail = remote_message.unwrap_or_else(|| {
                status.canonical_reason().unwrap_or("unexpected status").to_string()
            });
            AppError::remote(format!("{}: {}", operation, detail), Some(status.as_u16()))
        }
    }
}

fn mentions_sha_precondition(message: &str) -> bool {
    message.to_ascii_lowercase().contains("sha")
}

fn extract_error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let parsed = serde_json::from_str::<serde_json::Value>(body).ok()?;
    parsed.get("message").and_then(|message| message.as_str()).map(ToOwned::to_owned)
}

impl RepositoryApi for HttpGitHubClient {
    fn get_ref(&self, owner: &str, repo: &str, reference: &str) -> Result<RawGitRef, AppError> {
        let segments = ["repos", owner, repo, "git", "ref"].into_iter().chain(reference.split('/'));
        let url = self.endpoint(segments)?;
        self.get_json(url, &[], "get ref")
    }

    fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        tree_sha: &str,
        recursive: bool,
    ) -> Result<RawTree, AppError> {
        let url = self.endpoint(["repos", owner, repo, "git", "trees", tree_sha])?;
        let query: &[(&str, &str)] = if recursive { &[("recursive", "1")] } else { &[] };
        self.get_json(url, query, "get tree")
    }

    fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<Contents, AppError> {
        let url = self.contents_url(owner, repo, path)?;
        self.get_json(url, &[("ref", reference)], "get contents")
    }

    fn put_contents(
        &self,
        owner: &str,
        repo: &str,
        write: &ContentWrite,
    ) -> Result<RawContent, AppError> {
        let url = self.contents_url(owner, repo, &write.path)?;
        let body = WriteBody {
            message: &write.message,
            content: STANDARD.encode(write.content.as_bytes()),
            branch: &write.branch,
            sha: write.sha.as_deref(),
            committer: &write.committer,
            author: &write.committer,
        };
        let request = self.client.put(url).json(&body);
        let response = self.send(request, GITHUB_JSON, Access::Write, "put contents")?;
        let written: WriteResponse = parse_json(response, "put contents")?;
        Ok(written.content)
    }

    fn delete_contents(
        &self,
        owner: &str,
        repo: &str,
        delete: &ContentDelete,
    ) -> Result<(), AppError> {
        let url = self.contents_url(owner, repo, &delete.path)?;
        let body = DeleteBody {
            message: &delete.message,
            sha: &delete.sha,
            branch: &delete.branch,
            committer: &delete.committer,
            author: &delete.committer,
        };
        let request = self.client.delete(url).json(&body);
        self.send(request, GITHUB_JSON, Access::Write, "delete contents")?;
        Ok(())
    }

    fn search_code(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RawSearchPage, AppError> {
        let url = self.endpoint(["search", "code"])?;
        let page = page.to_string();
        let per_page = per_page.to_string();
        let request = self.client.get(url).query(&[
            ("q", query),
            ("page", page.as_str()),
            ("per_page", per_page.as_str()),
        ]);
        let response = self.send(request, GITHUB_TEXT_MATCH_JSON, Access::Read, "search code")?;
        parse_json(response, "search code")
    }

    fn get_user(&self) -> Result<RawUser, AppError> {
        let url = self.endpoint(["user"])?;
        self.get_json(url, &[], "get user")
    }

    fn list_repositories(&self, affiliation: &str) -> Result<Vec<RawRepo>, AppError> {
        let url = self.endpoint(["user", "repos"])?;
        self.get_json(
            url,
            &[("affiliation", affiliation), ("per_page", REPOS_PER_PAGE)],
            "list repositories",
        )
    }
}
