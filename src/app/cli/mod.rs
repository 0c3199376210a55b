//! CLI Adapter.

mod account;
mod notes;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::app::config::load_app_config;
use crate::domain::{AppError, RepositoryDescriptor};

#[derive(Parser)]
#[command(name = "gitnotes")]
#[command(version)]
#[command(
    about = "Read, search and write Markdown notes stored in a GitHub repository",
    long_about = None
)]
struct Cli {
    /// Configuration file (defaults to $GITNOTES_CONFIG, then ./gitnotes.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

/// Repository the command operates on.
#[derive(Args, Debug, Clone)]
pub struct RepoArgs {
    /// Repository owner (user or organization)
    #[arg(long)]
    owner: String,
    /// Repository name
    #[arg(long)]
    repo: String,
    /// Branch that reads and writes target
    #[arg(long, default_value = "main")]
    branch: String,
}

impl RepoArgs {
    fn descriptor(&self) -> RepositoryDescriptor {
        RepositoryDescriptor::new(&self.owner, &self.repo, &self.branch)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the OAuth authorization URL to send the user to
    AuthUrl {
        /// Opaque value echoed back on the callback
        #[arg(long)]
        state: String,
    },
    /// Exchange an OAuth authorization code for an access token
    Exchange {
        #[arg(long)]
        code: String,
    },
    /// Show the profile of the token's owner
    Whoami,
    /// List repositories owned by the token's owner
    Repos,
    /// List every note on the branch
    Tree {
        #[command(flatten)]
        repo: RepoArgs,
        /// List at this commit instead of the branch head
        #[arg(long)]
        commit: Option<String>,
    },
    /// List the notes directly under a directory, with content
    #[clap(visible_alias = "list")]
    Ls {
        #[command(flatten)]
        repo: RepoArgs,
        /// Directory (defaults to the repository root)
        #[arg(default_value = "")]
        path: String,
    },
    /// Print a note
    Get {
        #[command(flatten)]
        repo: RepoArgs,
        path: String,
    },
    /// Full-text search over notes
    Search {
        #[command(flatten)]
        repo: RepoArgs,
        query: String,
        /// Restrict to a directory
        #[arg(long, default_value = "")]
        path: String,
        /// 1-indexed result page
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Create or update a note
    Save {
        #[command(flatten)]
        repo: RepoArgs,
        path: String,
        /// Note body
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        content: Option<String>,
        /// Read the note body from a file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Blob SHA of the version being replaced; omit to create
        #[arg(long)]
        sha: Option<String>,
        #[command(flatten)]
        author: notes::AuthorArgs,
    },
    /// Delete a note
    #[clap(visible_alias = "rm")]
    Delete {
        #[command(flatten)]
        repo: RepoArgs,
        path: String,
        /// Blob SHA of the version being deleted
        #[arg(long)]
        sha: Option<String>,
        #[command(flatten)]
        author: notes::AuthorArgs,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<(), AppError> {
    let config = load_app_config(cli.config.as_deref())?;

    match cli.command {
        Commands::AuthUrl { state } => account::run_auth_url(&config, &state),
        Commands::Exchange { code } => account::run_exchange(&config, &code),
        Commands::Whoami => account::run_whoami(&config),
        Commands::Repos => account::run_repos(&config),
        Commands::Tree { repo, commit } => notes::run_tree(&config, &repo, commit.as_deref()),
        Commands::Ls { repo, path } => notes::run_ls(&config, &repo, &path),
        Commands::Get { repo, path } => notes::run_get(&config, &repo, &path),
        Commands::Search { repo, query, path, page } => {
            notes::run_search(&config, &repo, &query, &path, page)
        }
        Commands::Save { repo, path, content, file, sha, author } => {
            let content = match (content, file) {
                (Some(content), _) => content,
                (None, Some(file)) => std::fs::read_to_string(file)?,
                (None, None) => String::new(),
            };
            notes::run_save(&config, &repo, path, content, sha, author)
        }
        Commands::Delete { repo, path, sha, author } => {
            notes::run_delete(&config, &repo, path, sha, author)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::mapping("command output", e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}
