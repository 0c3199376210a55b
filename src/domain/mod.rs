pub mod configuration;
pub mod credential;
pub mod error;
pub mod git_file;
pub mod note_path;
pub mod repository;

pub use configuration::{AppConfig, GitHubApiConfig, OAuthConfig};
pub use credential::AccessToken;
pub use error::{AppError, ErrorKind};
pub use git_file::{GitFile, GitHubUser, GitRepo, SearchResult};
pub use note_path::{
    is_valid_directory_path, is_valid_note_path, validate_directory_path, validate_note_path,
};
pub use repository::{FileOperationRequest, RepositoryDescriptor};
