//! Note storage on top of a GitHub repository.
//!
//! Every note is a markdown file addressed by its path. The blob SHA returned with
//! each file is the version token: updates and deletes must present the SHA they
//! last read, and the remote rejects the write if the file has changed since.

use tracing::{debug, error, info, warn};

use crate::domain::{
    AccessToken, AppError, ErrorKind, FileOperationRequest, GitFile, RepositoryDescriptor,
    SearchResult, is_valid_note_path, validate_directory_path, validate_note_path,
};
use crate::ports::{
    ClientBuilder, CommitIdentity, ContentDelete, ContentWrite, Contents, RepositoryApi,
};
use crate::services::file_mapper;

/// Fixed page size for search results.
pub const PAGE_SIZE: u32 = 20;
/// Commit message recorded on every write and delete.
pub const COMMIT_MESSAGE: &str = "Created with gitnotes";
const EXTENSION_QUALIFIER: &str = "extension:md";

/// Lists, reads, searches, writes and deletes note files in a GitHub repository.
///
/// Stateless between calls: each operation builds its own client from the
/// caller's token and issues its remote calls sequentially.
#[derive(Debug, Clone)]
pub struct RepositoryFileService<B: ClientBuilder> {
    builder: B,
}

impl<B: ClientBuilder> RepositoryFileService<B> {
    pub fn new(builder: B) -> Self {
        Self { builder }
    }

    /// All notes on the branch head, without content, in the remote's tree order.
    pub fn list_tree(
        &self,
        token: &AccessToken,
        repo: &RepositoryDescriptor,
    ) -> Result<Vec<GitFile>, AppError> {
        debug!(repository = %repo, "list_tree");
        let client = self.builder.build(token);
        let reference = format!("heads/{}", repo.default_branch);
        let head = client
            .get_ref(&repo.owner, &repo.repository, &reference)
            .inspect_err(|err| log_failure("list_tree", repo, "", err))?;
        self.tree_at(client.as_ref(), repo, &head.object.sha)
    }

    /// Like `list_tree`, but at a pinned commit instead of the branch head.
    pub fn list_tree_at(
        &self,
        token: &AccessToken,
        repo: &RepositoryDescriptor,
        commit_sha: &str,
    ) -> Result<Vec<GitFile>, AppError> {
        if commit_sha.trim().is_empty() {
            return Err(AppError::validation("commit_sha", "must not be empty"));
        }
        debug!(repository = %repo, commit_sha, "list_tree_at");
        let client = self.builder.build(token);
        self.tree_at(client.as_ref(), repo, commit_sha)
    }

    fn tree_at(
        &self,
        client: &dyn RepositoryApi,
        repo: &RepositoryDescriptor,
        commit_sha: &str,
    ) -> Result<Vec<GitFile>, AppError> {
        let tree = client
            .get_tree(&repo.owner, &repo.repository, commit_sha, true)
            .inspect_err(|err| log_failure("list_tree", repo, "", err))?;
        if tree.truncated {
            warn!(repository = %repo, commit_sha, "tree listing truncated by the remote");
        }
        Ok(tree.tree.iter().filter_map(file_mapper::from_tree_entry).collect())
    }

    /// Every note directly inside `path`, with content. An empty path is the
    /// repository root.
    pub fn list_all_files(
        &self,
        token: &AccessToken,
        repo: &RepositoryDescriptor,
        path: &str,
    ) -> Result<Vec<GitFile>, AppError> {
        validate_directory_path(path)?;
        debug!(repository = %repo, path, "list_all_files");
        let client = self.builder.build(token);

        let entries = match client
            .get_contents(&repo.owner, &repo.repository, path, &repo.default_branch)
            .inspect_err(|err| log_failure("list_all_files", repo, path, err))?
        {
            Contents::Directory(entries) => entries,
            Contents::File(_) => {
                return Err(AppError::not_found(format!("'{}' is not a directory", path)));
            }
        };

        entries
            .iter()
            .filter(|entry| {
                file_mapper::is_file_type(&entry.kind) && is_valid_note_path(&entry.path)
            })
            .map(|entry| fetch_file(client.as_ref(), repo, &entry.path))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| log_failure("list_all_files", repo, path, err))
    }

    pub fn get_file(
        &self,
        token: &AccessToken,
        repo: &RepositoryDescriptor,
        path: &str,
    ) -> Result<GitFile, AppError> {
        validate_note_path(path)?;
        debug!(repository = %repo, path, "get_file");
        let client = self.builder.build(token);
        fetch_file(client.as_ref(), repo, path)
            .inspect_err(|err| log_failure("get_file", repo, path, err))
    }

    /// One page of notes whose content matches `query`, optionally restricted to
    /// the directory `path`. Pages are 1-indexed and `PAGE_SIZE` long.
    ///
    /// Each hit is fetched in full, in the order the remote returned them; the
    /// first failing fetch fails the whole search.
    pub fn search_files(
        &self,
        token: &AccessToken,
        repo: &RepositoryDescriptor,
        path: &str,
        query: &str,
        page: u32,
    ) -> Result<SearchResult, AppError> {
        validate_directory_path(path)?;
        if page == 0 {
            return Err(AppError::validation("page", "pages are numbered from 1"));
        }
        let search_query = build_search_query(query, path, repo);
        debug!(repository = %repo, path, page, query = %search_query, "search_files");

        let client = self.builder.build(token);
        let results = client
            .search_code(&search_query, page, PAGE_SIZE)
            .inspect_err(|err| log_failure("search_files", repo, path, err))?;
        if results.incomplete_results {
            warn!(repository = %repo, "search results reported incomplete by the remote");
        }

        let files = results
            .items
            .iter()
            .filter(|hit| is_valid_note_path(&hit.path))
            .map(|hit| fetch_file(client.as_ref(), repo, &hit.path))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| log_failure("search_files", repo, path, err))?;

        Ok(SearchResult { files, total_matches: results.total_count })
    }

    /// Create the note when `blob_sha` is absent, otherwise update it conditional
    /// on the remote blob still matching. Returns metadata only.
    pub fn save_file(
        &self,
        token: &AccessToken,
        req: &FileOperationRequest,
    ) -> Result<GitFile, AppError> {
        validate_note_path(&req.path)?;
        if req.content.is_empty() {
            return Err(AppError::validation("content", "must not be empty"));
        }
        let committer = committer_of(req)?;
        let write = ContentWrite {
            path: req.path.clone(),
            content: req.content.clone(),
            message: COMMIT_MESSAGE.to_string(),
            branch: req.repo.default_branch.clone(),
            sha: req.precondition().map(str::to_string),
            committer,
        };
        let operation = if write.sha.is_some() { "update" } else { "create" };
        debug!(repository = %req.repo, path = %req.path, operation, "save_file");

        let client = self.builder.build(token);
        let written = client
            .put_contents(&req.repo.owner, &req.repo.repository, &write)
            .inspect_err(|err| log_failure("save_file", &req.repo, &req.path, err))?;
        let file = file_mapper::from_write_result(written);
        info!(
            repository = %req.repo,
            path = %file.path,
            blob_sha = %file.blob_sha,
            operation,
            "note saved"
        );
        Ok(file)
    }

    /// Delete the note, conditional on the remote blob matching `blob_sha`.
    pub fn delete_file(
        &self,
        token: &AccessToken,
        req: &FileOperationRequest,
    ) -> Result<(), AppError> {
        validate_note_path(&req.path)?;
        let sha = req
            .precondition()
            .ok_or_else(|| AppError::validation("blob_sha", "required to delete a note"))?;
        let committer = committer_of(req)?;
        let delete = ContentDelete {
            path: req.path.clone(),
            message: COMMIT_MESSAGE.to_string(),
            branch: req.repo.default_branch.clone(),
            sha: sha.to_string(),
            committer,
        };
        debug!(repository = %req.repo, path = %req.path, "delete_file");

        let client = self.builder.build(token);
        client
            .delete_contents(&req.repo.owner, &req.repo.repository, &delete)
            .inspect_err(|err| log_failure("delete_file", &req.repo, &req.path, err))?;
        info!(repository = %req.repo, path = %req.path, "note deleted");
        Ok(())
    }
}

fn fetch_file(
    client: &dyn RepositoryApi,
    repo: &RepositoryDescriptor,
    path: &str,
) -> Result<GitFile, AppError> {
    match client.get_contents(&repo.owner, &repo.repository, path, &repo.default_branch)? {
        Contents::File(raw) if file_mapper::is_file_type(&raw.kind) => {
            file_mapper::from_content(raw)
        }
        Contents::File(_) | Contents::Directory(_) => {
            Err(AppError::not_found(format!("'{}' is not a file", path)))
        }
    }
}

fn committer_of(req: &FileOperationRequest) -> Result<CommitIdentity, AppError> {
    if req.author_name.trim().is_empty() {
        return Err(AppError::validation("author_name", "must not be empty"));
    }
    if req.author_email.trim().is_empty() {
        return Err(AppError::validation("author_email", "must not be empty"));
    }
    Ok(CommitIdentity { name: req.author_name.clone(), email: req.author_email.clone() })
}

/// `"{query} path:{path} extension:md repo:{owner}/{repo}"`, skipping empty parts.
pub fn build_search_query(query: &str, path: &str, repo: &RepositoryDescriptor) -> String {
    let mut parts = Vec::with_capacity(4);
    let query = query.trim();
    if !query.is_empty() {
        parts.push(query.to_string());
    }
    if path.contains(' ') {
        parts.push(format!("path:\"{}\"", path));
    } else if !path.is_empty() {
        parts.push(format!("path:{}", path));
    }
    parts.push(EXTENSION_QUALIFIER.to_string());
    parts.push(format!("repo:{}", repo.full_name()));
    parts.join(" ")
}

fn log_failure(operation: &str, repo: &RepositoryDescriptor, path: &str, err: &AppError) {
    match err.kind() {
        ErrorKind::Mapping => {
            error!(operation, repository = %repo, path, error = %err, "undecodable response")
        }
        _ => warn!(
            operation,
            repository = %repo,
            path,
            status = ?err.status(),
            error = %err,
            "operation failed"
        ),
    }
}
