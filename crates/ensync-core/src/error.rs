use thiserror::Error;

/// Errors surfaced by a directory backend.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("bind failed: {0}")]
    Bind(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("modify failed for {dn}: {message}")]
    Modify { dn: String, message: String },
}

/// Errors produced by an allocation run.
#[derive(Debug, Error)]
pub enum AllocError {
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("malformed {attribute} value {value:?} on entry {dn}")]
    MalformedNumber {
        dn: String,
        attribute: String,
        value: String,
    },

    #[error("entry {dn} has no {attribute} attribute")]
    MissingAttribute { dn: String, attribute: String },
}

/// Errors from a metrics sink.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metrics push failed: {0}")]
    Push(String),
}

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;
pub type AllocResult<T> = Result<T, AllocError>;
