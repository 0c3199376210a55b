//! Request descriptors supplied by callers for every repository operation.

use serde::{Deserialize, Serialize};

/// Identifies the remote repository and branch an operation targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    pub owner: String,
    pub repository: String,
    pub default_branch: String,
}

impl RepositoryDescriptor {
    pub fn new(
        owner: impl Into<String>,
        repository: impl Into<String>,
        default_branch: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repository: repository.into(),
            default_branch: default_branch.into(),
        }
    }

    /// `owner/repository`, as used in search qualifiers.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repository)
    }
}

impl std::fmt::Display for RepositoryDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repository, self.default_branch)
    }
}

/// One write or delete intent against a note.
///
/// `blob_sha` present means the note already exists and the write is conditional on
/// the remote blob still having that SHA. Absent means create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOperationRequest {
    /// Blob SHA (not a commit SHA) of the version being replaced or deleted.
    #[serde(default)]
    pub blob_sha: Option<String>,
    pub path: String,
    #[serde(default)]
    pub content: String,
    pub author_name: String,
    pub author_email: String,
    pub repo: RepositoryDescriptor,
}

impl FileOperationRequest {
    /// The precondition SHA, treating an empty string as absent.
    pub fn precondition(&self) -> Option<&str> {
        self.blob_sha.as_deref().map(str::trim).filter(|sha| !sha.is_empty())
    }
}
