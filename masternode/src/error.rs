//! Identity resolution error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid funding reference: {0}")]
    InvalidFundingReference(String),

    #[error("Duplicate funding reference: {0}")]
    DuplicateFundingReference(String),

    #[error("No masternode identity found: {0}")]
    NoIdentities(String),

    #[error("Unusable signing key: {0}")]
    InvalidSigningKey(String),

    #[error("Missing setting in node config: {0}")]
    MissingNodeSetting(String),

    #[error("Directory lookup failed: {0}")]
    Directory(String),

    #[error("Directory has no masternode at {0}")]
    DirectoryNoMatch(String),

    #[error("Directory returned {count} masternodes at {address}, expected exactly one")]
    AmbiguousDirectoryMatch { address: String, count: usize },
}

impl From<reqwest::Error> for IdentityError {
    fn from(e: reqwest::Error) -> Self {
        IdentityError::Directory(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
