//! Normalized output shapes.

use serde::{Deserialize, Serialize};

/// A note file as seen by callers, whichever remote endpoint produced it.
///
/// `content` is empty for tree listings and write results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitFile {
    /// Blob SHA, never a commit SHA.
    pub blob_sha: String,
    pub path: String,
    pub content: String,
    pub size: u64,
    pub is_dir: bool,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub files: Vec<GitFile>,
    /// Hit count reported by the remote across all pages.
    pub total_matches: u64,
}

/// A repository owned by the authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRepo {
    pub name: String,
    pub visibility: String,
    pub default_branch: String,
}

/// Profile of the authenticated GitHub user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUser {
    pub id: u64,
    pub login: String,
    pub email: String,
    pub name: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
}
