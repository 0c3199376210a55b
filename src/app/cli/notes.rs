//! Note commands.

use clap::Args;
use serde_json::json;

use super::{RepoArgs, print_json};
use crate::app::api::connect;
use crate::app::config::token_from_env;
use crate::domain::{AppConfig, AppError, FileOperationRequest};

/// Commit identity recorded as both author and committer.
#[derive(Args, Debug, Clone)]
pub struct AuthorArgs {
    #[arg(long, env = "GITNOTES_AUTHOR_NAME")]
    author_name: String,
    #[arg(long, env = "GITNOTES_AUTHOR_EMAIL")]
    author_email: String,
}

pub fn run_tree(
    config: &AppConfig,
    repo: &RepoArgs,
    commit: Option<&str>,
) -> Result<(), AppError> {
    let token = token_from_env()?;
    let ctx = connect(config)?;
    let files = match commit {
        Some(commit) => ctx.files().list_tree_at(&token, &repo.descriptor(), commit)?,
        None => ctx.files().list_tree(&token, &repo.descriptor())?,
    };
    print_json(&files)
}

pub fn run_ls(config: &AppConfig, repo: &RepoArgs, path: &str) -> Result<(), AppError> {
    let token = token_from_env()?;
    let ctx = connect(config)?;
    print_json(&ctx.files().list_all_files(&token, &repo.descriptor(), path)?)
}

pub fn run_get(config: &AppConfig, repo: &RepoArgs, path: &str) -> Result<(), AppError> {
    let token = token_from_env()?;
    let ctx = connect(config)?;
    print_json(&ctx.files().get_file(&token, &repo.descriptor(), path)?)
}

pub fn run_search(
    config: &AppConfig,
    repo: &RepoArgs,
    query: &str,
    path: &str,
    page: u32,
) -> Result<(), AppError> {
    let token = token_from_env()?;
    let ctx = connect(config)?;
    print_json(&ctx.files().search_files(&token, &repo.descriptor(), path, query, page)?)
}

pub fn run_save(
    config: &AppConfig,
    repo: &RepoArgs,
    path: String,
    content: String,
    sha: Option<String>,
    author: AuthorArgs,
) -> Result<(), AppError> {
    let token = token_from_env()?;
    let ctx = connect(config)?;
    let request = operation(repo, path, content, sha, author);
    print_json(&ctx.files().save_file(&token, &request)?)
}

pub fn run_delete(
    config: &AppConfig,
    repo: &RepoArgs,
    path: String,
    sha: Option<String>,
    author: AuthorArgs,
) -> Result<(), AppError> {
    let token = token_from_env()?;
    let ctx = connect(config)?;
    let request = operation(repo, path, String::new(), sha, author);
    ctx.files().delete_file(&token, &request)?;
    print_json(&json!({ "deleted": request.path }))
}

fn operation(
    repo: &RepoArgs,
    path: String,
    content: String,
    sha: Option<String>,
    author: AuthorArgs,
) -> FileOperationRequest {
    FileOperationRequest {
        blob_sha: sha,
        path,
        content,
        author_name: author.author_name,
        author_email: author.author_email,
        repo: repo.descriptor(),
    }
}
