//! Conversion from raw GitHub response shapes into `GitFile`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::domain::{AppError, GitFile, is_valid_note_path};
use crate::ports::{RawContent, RawTreeEntry};

const FILE_TYPE: &str = "file";
const BLOB_TYPE: &str = "blob";
const DIR_TYPE: &str = "dir";
const BASE64_ENCODING: &str = "base64";

/// True for contents-API `file` entries and tree `blob` entries.
pub fn is_file_type(kind: &str) -> bool {
    kind == FILE_TYPE || kind == BLOB_TYPE
}

/// Map a tree entry. Non-file entries and paths outside the note grammar yield
/// `None`; listings carry no body, so content is empty and size is zero.
pub fn from_tree_entry(entry: &RawTreeEntry) -> Option<GitFile> {
    if !is_file_type(&entry.kind) || !is_valid_note_path(&entry.path) {
        return None;
    }
    Some(GitFile {
        blob_sha: entry.sha.clone(),
        path: entry.path.clone(),
        content: String::new(),
        size: 0,
        is_dir: false,
    })
}

/// Map a contents-API response, decoding its transport-encoded body.
pub fn from_content(raw: RawContent) -> Result<GitFile, AppError> {
    let content = decode_content(&raw)?;
    Ok(GitFile {
        blob_sha: raw.sha,
        path: raw.path,
        content,
        size: raw.size,
        is_dir: raw.kind == DIR_TYPE,
    })
}

/// Map the metadata echoed by a write; write responses carry no body.
pub fn from_write_result(raw: RawContent) -> GitFile {
    GitFile {
        blob_sha: raw.sha,
        path: raw.path,
        content: String::new(),
        size: raw.size,
        is_dir: false,
    }
}

fn decode_content(raw: &RawContent) -> Result<String, AppError> {
    let body = raw.content.as_deref().unwrap_or_default();
    match raw.encoding.as_deref().unwrap_or_default() {
        "" => Ok(body.to_string()),
        BASE64_ENCODING => {
            // GitHub wraps base64 bodies at 60 columns.
            let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            let what = format!("content of '{}'", raw.path);
            let bytes = STANDARD
                .decode(compact.as_bytes())
                .map_err(|e| AppError::mapping(what.clone(), e.to_string()))?;
            String::from_utf8(bytes).map_err(|e| AppError::mapping(what, e.to_string()))
        }
        other => Err(AppError::mapping(
            format!("content of '{}'", raw.path),
            format!("unsupported content encoding '{}'", other),
        )),
    }
}
