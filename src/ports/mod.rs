mod client_builder;
mod repository_api;

pub use client_builder::ClientBuilder;
pub use repository_api::{
    CommitIdentity, ContentDelete, ContentWrite, Contents, RawContent, RawGitObject, RawGitRef,
    RawRepo, RawSearchHit, RawSearchPage, RawTree, RawTreeEntry, RawUser, RepositoryApi,
};
