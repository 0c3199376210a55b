//! GitHub repository API port and the raw response shapes it exchanges.

use serde::{Deserialize, Serialize};

use crate::domain::AppError;

/// Entry returned by the contents endpoint, either a single file or one item of a
/// directory listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContent {
    /// `file`, `dir`, `symlink` or `submodule`.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Response of the contents endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Contents {
    Directory(Vec<RawContent>),
    File(RawContent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGitObject {
    pub sha: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGitRef {
    #[serde(rename = "ref")]
    pub reference: String,
    pub object: RawGitObject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTreeEntry {
    pub path: String,
    #[serde(default)]
    pub mode: String,
    /// `blob`, `tree` or `commit`.
    #[serde(rename = "type")]
    pub kind: String,
    pub sha: String,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTree {
    pub sha: String,
    #[serde(default)]
    pub tree: Vec<RawTreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSearchHit {
    #[serde(default)]
    pub name: String,
    pub path: String,
    pub sha: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSearchPage {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<RawSearchHit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUser {
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRepo {
    pub name: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// Author and committer identity recorded on a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// Create or update one file. `content` is plain text; transport encoding is the
/// adapter's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentWrite {
    pub path: String,
    pub content: String,
    pub message: String,
    pub branch: String,
    /// Blob SHA precondition; `None` creates the file.
    pub sha: Option<String>,
    pub committer: CommitIdentity,
}

/// Delete one file, conditional on its current blob SHA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDelete {
    pub path: String,
    pub message: String,
    pub branch: String,
    pub sha: String,
    pub committer: CommitIdentity,
}

/// Port for the GitHub repository endpoints the file store is built on.
///
/// Implementations perform one remote round trip per call and classify failures
/// into `AppError` kinds; they never retry.
pub trait RepositoryApi {
    /// Resolve a ref such as `heads/main`.
    fn get_ref(&self, owner: &str, repo: &str, reference: &str) -> Result<RawGitRef, AppError>;

    fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        tree_sha: &str,
        recursive: bool,
    ) -> Result<RawTree, AppError>;

    /// Fetch a file or a directory listing at `path` on `reference`.
    fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<Contents, AppError>;

    /// Create or update a file; returns the new file metadata without its body.
    fn put_contents(
        &self,
        owner: &str,
        repo: &str,
        write: &ContentWrite,
    ) -> Result<RawContent, AppError>;

    fn delete_contents(
        &self,
        owner: &str,
        repo: &str,
        delete: &ContentDelete,
    ) -> Result<(), AppError>;

    /// Code search. `page` is 1-indexed.
    fn search_code(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RawSearchPage, AppError>;

    fn get_user(&self) -> Result<RawUser, AppError>;

    fn list_repositories(&self, affiliation: &str) -> Result<Vec<RawRepo>, AppError>;
}
