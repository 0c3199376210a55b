use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};
use url::Url;

use crate::domain::{AccessToken, AppError};
use crate::ports::{
    ClientBuilder, ContentDelete, ContentWrite, Contents, RawContent, RawGitObject, RawGitRef,
    RawRepo, RawSearchHit, RawSearchPage, RawTree, RawTreeEntry, RawUser, RepositoryApi,
};

pub const OWNER: &str = "ada";
pub const REPO: &str = "notes";
pub const BRANCH: &str = "main";
pub const VALID_CODE: &str = "good-code";

#[derive(Default)]
struct RemoteState {
    files: BTreeMap<String, String>,
    extra_tree_entries: Vec<RawTreeEntry>,
    commits: u32,
    calls: Vec<String>,
    failing_paths: HashSet<String>,
    user: RawUser,
    repos: Vec<RawRepo>,
}

/// In-memory GitHub repository that behaves like the contents, tree and search
/// endpoints, and records every call made against it.
///
/// Clones share state, so a test can hand one clone to a service as its
/// `ClientBuilder` and inspect another.
#[derive(Clone, Default)]
pub struct FakeGitHub {
    state: Arc<Mutex<RemoteState>>,
    builds: Arc<Mutex<usize>>,
}

pub fn blob_sha(content: &str) -> String {
    let digest = Sha256::digest(format!("blob {}\0{}", content.len(), content).as_bytes());
    format!("{:x}", digest)[..40].to_string()
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.state.lock().unwrap().files.insert(path.to_string(), content.to_string());
        self
    }

    /// Add a tree entry that has no backing file, e.g. a submodule.
    pub fn with_tree_entry(self, path: &str, kind: &str) -> Self {
        self.state.lock().unwrap().extra_tree_entries.push(RawTreeEntry {
            path: path.to_string(),
            mode: "160000".to_string(),
            kind: kind.to_string(),
            sha: format!("entry-{}", path),
            size: None,
        });
        self
    }

    /// Make content fetches of `path` fail with a server error.
    pub fn failing_on(self, path: &str) -> Self {
        self.state.lock().unwrap().failing_paths.insert(path.to_string());
        self
    }

    pub fn with_user(self, user: RawUser) -> Self {
        self.state.lock().unwrap().user = user;
        self
    }

    pub fn with_repos(self, repos: Vec<RawRepo>) -> Self {
        self.state.lock().unwrap().repos = repos;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn builds(&self) -> usize {
        *self.builds.lock().unwrap()
    }

    pub fn content_of(&self, path: &str) -> Option<String> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub fn sha_of(&self, path: &str) -> Option<String> {
        self.content_of(path).map(|content| blob_sha(&content))
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn head_sha(commits: u32) -> String {
    format!("commit-{}", commits)
}

fn file_content(path: &str, content: &str) -> RawContent {
    RawContent {
        kind: "file".to_string(),
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        sha: blob_sha(content),
        size: content.len() as u64,
        encoding: Some("base64".to_string()),
        content: Some(STANDARD.encode(content.as_bytes())),
    }
}

/// Split a search query on whitespace, keeping double-quoted runs together.
fn split_query(query: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in query.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                current.push(c);
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn conflict(message: &str) -> AppError {
    AppError::Conflict { message: message.to_string() }
}

impl RepositoryApi for FakeGitHub {
    fn get_ref(&self, owner: &str, repo: &str, reference: &str) -> Result<RawGitRef, AppError> {
        self.record(format!("get_ref {}/{} {}", owner, repo, reference));
        if reference != format!("heads/{}", BRANCH) {
            return Err(AppError::not_found("get ref: no such path or ref"));
        }
        let state = self.state.lock().unwrap();
        Ok(RawGitRef {
            reference: format!("refs/{}", reference),
            object: RawGitObject { sha: head_sha(state.commits), kind: "commit".to_string() },
        })
    }

    fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        tree_sha: &str,
        recursive: bool,
    ) -> Result<RawTree, AppError> {
        self.record(format!("get_tree {}/{} {} recursive={}", owner, repo, tree_sha, recursive));
        let state = self.state.lock().unwrap();
        if tree_sha != head_sha(state.commits) {
            return Err(AppError::not_found("get tree: no such path or ref"));
        }

        let mut directories = BTreeSet::new();
        for path in state.files.keys() {
            let mut prefix = String::new();
            let segments: Vec<&str> = path.split('/').collect();
            for segment in &segments[..segments.len() - 1] {
                if !prefix.is_empty() {
                    prefix.push('/');
                }
                prefix.push_str(segment);
                directories.insert(prefix.clone());
            }
        }

        let mut tree: Vec<RawTreeEntry> = directories
            .into_iter()
            .map(|path| RawTreeEntry {
                sha: format!("tree-{}", path),
                path,
                mode: "040000".to_string(),
                kind: "tree".to_string(),
                size: None,
            })
            .collect();
        tree.extend(state.files.iter().map(|(path, content)| RawTreeEntry {
            path: path.clone(),
            mode: "100644".to_string(),
            kind: "blob".to_string(),
            sha: blob_sha(content),
            size: Some(content.len() as u64),
        }));
        tree.extend(state.extra_tree_entries.iter().cloned());
        tree.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(RawTree { sha: tree_sha.to_string(), tree, truncated: false })
    }

    fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<Contents, AppError> {
        self.record(format!("get_contents {}/{} {} ref={}", owner, repo, path, reference));
        let state = self.state.lock().unwrap();
        if state.failing_paths.contains(path) {
            return Err(AppError::remote("get contents: Server Error", Some(500)));
        }
        if let Some(content) = state.files.get(path) {
            return Ok(Contents::File(file_content(path, content)));
        }

        let prefix = if path.is_empty() { String::new() } else { format!("{}/", path) };
        let mut seen_dirs = BTreeSet::new();
        let mut entries = Vec::new();
        for (file_path, content) in &state.files {
            let Some(rest) = file_path.strip_prefix(&prefix) else { continue };
            match rest.split_once('/') {
                Some((dir, _)) => {
                    if seen_dirs.insert(dir.to_string()) {
                        entries.push(RawContent {
                            kind: "dir".to_string(),
                            name: dir.to_string(),
                            path: format!("{}{}", prefix, dir),
                            sha: format!("tree-{}{}", prefix, dir),
                            ..RawContent::default()
                        });
                    }
                }
                None => {
                    entries.push(RawContent {
                        content: None,
                        encoding: None,
                        ..file_content(file_path, content)
                    });
                }
            }
        }

        if entries.is_empty() {
            return Err(AppError::not_found("get contents: no such path or ref"));
        }
        Ok(Contents::Directory(entries))
    }

    fn put_contents(
        &self,
        owner: &str,
        repo: &str,
        write: &ContentWrite,
    ) -> Result<RawContent, AppError> {
        self.record(format!(
            "put_contents {}/{} {} sha={} by={}",
            owner,
            repo,
            write.path,
            write.sha.as_deref().unwrap_or("-"),
            write.committer.email
        ));
        let mut state = self.state.lock().unwrap();
        let current = state.files.get(&write.path).map(|content| blob_sha(content));
        match (current, write.sha.as_deref()) {
            (Some(_), None) => return Err(conflict("put contents: sha wasn't supplied")),
            (Some(current), Some(expected)) if current != expected => {
                return Err(conflict("put contents: blob SHA does not match"));
            }
            (None, Some(_)) => return Err(AppError::not_found("put contents: no such path")),
            _ => {}
        }

        state.files.insert(write.path.clone(), write.content.clone());
        state.commits += 1;
        let written = file_content(&write.path, &write.content);
        Ok(RawContent { content: None, encoding: None, ..written })
    }

    fn delete_contents(
        &self,
        owner: &str,
        repo: &str,
        delete: &ContentDelete,
    ) -> Result<(), AppError> {
        self.record(format!(
            "delete_contents {}/{} {} sha={}",
            owner, repo, delete.path, delete.sha
        ));
        let mut state = self.state.lock().unwrap();
        let current = state
            .files
            .get(&delete.path)
            .map(|content| blob_sha(content))
            .ok_or_else(|| AppError::not_found("delete contents: no such path"))?;
        if current != delete.sha {
            return Err(conflict("delete contents: blob SHA does not match"));
        }
        state.files.remove(&delete.path);
        state.commits += 1;
        Ok(())
    }

    /// Supports free-text terms plus `path:`, `extension:` and `repo:` qualifiers.
    fn search_code(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<RawSearchPage, AppError> {
        self.record(format!("search_code q={} page={} per_page={}", query, page, per_page));
        let mut terms = Vec::new();
        let mut path_prefix = String::new();
        let mut extension = String::new();
        for token in split_query(query) {
            if let Some(path) = token.strip_prefix("path:") {
                path_prefix = path.trim_matches('"').to_string();
            } else if let Some(ext) = token.strip_prefix("extension:") {
                extension = format!(".{}", ext);
            } else if token.starts_with("repo:") {
                continue;
            } else {
                terms.push(token.to_lowercase());
            }
        }

        let state = self.state.lock().unwrap();
        let matches: Vec<RawSearchHit> = state
            .files
            .iter()
            .filter(|(path, _)| {
                let dir = format!("{}/", path_prefix);
                let in_dir = path_prefix.is_empty() || path.starts_with(&dir);
                in_dir && path.ends_with(&extension)
            })
            .filter(|(_, content)| {
                let content = content.to_lowercase();
                terms.iter().all(|term| content.contains(term))
            })
            .map(|(path, content)| RawSearchHit {
                name: path.rsplit('/').next().unwrap_or(path).to_string(),
                path: path.clone(),
                sha: blob_sha(content),
            })
            .collect();

        let start = (page.saturating_sub(1) * per_page) as usize;
        let items = matches.iter().skip(start).take(per_page as usize).cloned().collect();
        Ok(RawSearchPage {
            total_count: matches.len() as u64,
            incomplete_results: false,
            items,
        })
    }

    fn get_user(&self) -> Result<RawUser, AppError> {
        self.record("get_user".to_string());
        Ok(self.state.lock().unwrap().user.clone())
    }

    fn list_repositories(&self, affiliation: &str) -> Result<Vec<RawRepo>, AppError> {
        self.record(format!("list_repositories affiliation={}", affiliation));
        Ok(self.state.lock().unwrap().repos.clone())
    }
}

impl ClientBuilder for FakeGitHub {
    fn build(&self, _token: &AccessToken) -> Box<dyn RepositoryApi> {
        *self.builds.lock().unwrap() += 1;
        Box::new(self.clone())
    }

    fn authorization_url(&self, state: &str) -> Url {
        let mut url = Url::parse("https://github.test/login/oauth/authorize").unwrap();
        url.query_pairs_mut().append_pair("state", state);
        url
    }

    fn exchange_code(&self, code: &str) -> Result<AccessToken, AppError> {
        self.record(format!("exchange_code {}", code));
        if code == VALID_CODE {
            Ok(AccessToken::bearer("gho_fake"))
        } else {
            Err(AppError::remote("token exchange rejected: bad_verification_code", None))
        }
    }
}
