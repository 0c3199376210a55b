use crate::ports::ClientBuilder;
use crate::services::{AccountService, RepositoryFileService};

/// Application context holding the services a command runs against.
///
/// Both services share one `ClientBuilder`, so they share its connection pool.
#[derive(Debug, Clone)]
pub struct AppContext<B: ClientBuilder + Clone> {
    files: RepositoryFileService<B>,
    account: AccountService<B>,
}

impl<B: ClientBuilder + Clone> AppContext<B> {
    pub fn new(builder: B) -> Self {
        Self {
            files: RepositoryFileService::new(builder.clone()),
            account: AccountService::new(builder),
        }
    }

    /// Note reads, search and writes.
    pub fn files(&self) -> &RepositoryFileService<B> {
        &self.files
    }

    /// Profile, repository listing and OAuth.
    pub fn account(&self) -> &AccountService<B> {
        &self.account
    }
}
