//! Note path grammar.
//!
//! A note path is one or more `/`-separated segments followed by `.md`. A segment
//! is one or more words of ASCII letters, digits and `-`, joined by single spaces.
//! A bare filename such as `bar.md` is a valid note path.

use super::AppError;

pub const NOTE_EXTENSION: &str = ".md";

/// Returns true if `path` is a legal note identifier.
pub fn is_valid_note_path(path: &str) -> bool {
    match path.strip_suffix(NOTE_EXTENSION) {
        Some(stem) => stem.split('/').all(is_valid_segment),
        None => false,
    }
}

/// Returns true if `path` names the repository root (empty) or a directory made of
/// note path segments.
pub fn is_valid_directory_path(path: &str) -> bool {
    path.is_empty() || path.split('/').all(is_valid_segment)
}

pub fn validate_note_path(path: &str) -> Result<(), AppError> {
    if is_valid_note_path(path) {
        Ok(())
    } else {
        Err(AppError::validation(
            "path",
            format!("'{}' is not a valid note path (expected e.g. 'folder/note.md')", path),
        ))
    }
}

pub fn validate_directory_path(path: &str) -> Result<(), AppError> {
    if is_valid_directory_path(path) {
        Ok(())
    } else {
        Err(AppError::validation("path", format!("'{}' is not a valid directory path", path)))
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment.split(' ').all(|word| {
            !word.is_empty() && word.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
