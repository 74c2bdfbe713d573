//! Error types for loading rules and validating requests.
//!
//! Resolution itself never fails: unknown keys and missing manifest sections
//! resolve to smaller scope sets. Only loading and request-shape problems are
//! errors.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read rules manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse rules manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to scan rules directory {path}: {source}")]
    RulesDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read rule file {path}: {source}")]
    RuleRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid frontmatter in {path}: {reason}")]
    InvalidFrontmatter { path: String, reason: String },

    #[error("Invalid scope '{0}'. Must be: project, group, tech, or language")]
    InvalidScope(String),

    #[error("Both scope and key must be provided together.")]
    IncompleteSearchScope,
}

impl Error {
    /// Whether the error was caused by the caller's request rather than by
    /// the rules on disk.
    pub fn is_request_error(&self) -> bool {
        matches!(self, Self::InvalidScope(_) | Self::IncompleteSearchScope)
    }
}
