use std::io;

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classification of a failure, for callers that branch on the kind of error
/// rather than its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected before any remote call was made.
    Validation,
    /// The remote reports the path or ref does not exist.
    NotFound,
    /// A write was rejected because the blob SHA precondition no longer holds.
    Conflict,
    /// Any other failure reaching the remote or processing its response.
    RemoteCall,
    /// A successful response could not be decoded into the expected shape.
    Mapping,
    /// Local configuration could not be loaded or is invalid.
    Configuration,
}

/// Library-wide error type for gitnotes operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed validation.
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Remote path or ref does not exist.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Blob SHA precondition failed on write or delete.
    #[error("Write conflict: {message}")]
    Conflict { message: String },

    /// Remote call failed.
    #[error("GitHub request failed: {message}")]
    RemoteCall {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    /// Remote response could not be mapped.
    #[error("Failed to decode {what}: {details}")]
    Mapping { what: String, details: String },

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl AppError {
    pub fn validation<S: Into<String>>(field: &'static str, message: S) -> Self {
        AppError::Validation { field, message: message.into() }
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        AppError::NotFound { message: message.into() }
    }

    pub fn remote<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        AppError::RemoteCall { message: message.into(), status, source: None }
    }

    /// Remote failure caused by a transport-level error.
    pub fn transport<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        AppError::RemoteCall {
            message: message.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    pub fn mapping<W: Into<String>, D: Into<String>>(what: W, details: D) -> Self {
        AppError::Mapping { what: what.into(), details: details.into() }
    }

    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation { .. } => ErrorKind::Validation,
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::Conflict { .. } => ErrorKind::Conflict,
            AppError::RemoteCall { .. } => ErrorKind::RemoteCall,
            AppError::Mapping { .. } => ErrorKind::Mapping,
            AppError::Configuration(_) | AppError::Io(_) | AppError::TomlParse(_) => {
                ErrorKind::Configuration
            }
        }
    }

    /// HTTP status the remote answered with, for failures that recorded one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::RemoteCall { status, .. } => *status,
            _ => None,
        }
    }
}
