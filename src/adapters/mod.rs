pub mod github_client_builder;
pub mod github_http;

pub use github_client_builder::GitHubClientBuilder;
pub use github_http::HttpGitHubClient;
