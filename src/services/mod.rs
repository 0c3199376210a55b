pub mod account;
pub mod file_mapper;
pub mod repository_files;

pub use account::AccountService;
pub use repository_files::{COMMIT_MESSAGE, PAGE_SIZE, RepositoryFileService};
