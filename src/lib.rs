//! gitnotes: Markdown notes stored as files in a GitHub repository.
//!
//! Notes are addressed by path and versioned by blob SHA; every write is a commit on
//! the configured branch, conditional on the SHA the caller last read.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use adapters::{GitHubClientBuilder, HttpGitHubClient};
pub use app::AppContext;
pub use app::api::connect;
pub use domain::{
    AccessToken, AppConfig, AppError, ErrorKind, FileOperationRequest, GitFile, GitHubUser,
    GitRepo, RepositoryDescriptor, SearchResult,
};
pub use ports::{ClientBuilder, RepositoryApi};
pub use services::{AccountService, COMMIT_MESSAGE, PAGE_SIZE, RepositoryFileService};
