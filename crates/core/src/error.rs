//! Error types for kot-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for kot-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for kot-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// The reference parsed, but not with the supported scheme
    #[error("Not an S3 URL: {0}")]
    InvalidScheme(String),

    /// The reference could not be parsed as a URL at all
    #[error("Malformed URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    /// Transport, authentication or service-side failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Bucket or object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// No section in the config file starts with the requested name
    #[error("No section matching '{prefix}' in {}", path.display())]
    NoMatchingSection { prefix: String, path: PathBuf },

    /// A line inside the selected section is not `key = value`
    #[error("Malformed line {line_no} in {}: {line}", path.display())]
    MalformedConfigLine {
        path: PathBuf,
        line_no: usize,
        line: String,
    },

    /// The config file could not be opened
    #[error("Cannot open config file {}: {source}", path.display())]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config section was found but its values are unusable
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidScheme(_) | Error::MalformedUrl { .. } => 2, // UsageError
            Error::NoMatchingSection { .. }
            | Error::MalformedConfigLine { .. }
            | Error::ConfigNotFound { .. }
            | Error::Config(_) => 2, // UsageError
            Error::Backend(_) => 3,  // BackendError
            Error::NotFound(_) => 4, // NotFound
            Error::Io(_) => 1,       // GeneralError
        }
    }
}
