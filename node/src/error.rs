//! Node interface error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Invalid response to `{command}`: {reason}")]
    InvalidResponse { command: String, reason: String },

    #[error("Node unreachable: {0}")]
    Unreachable(String),
}

pub type Result<T> = std::result::Result<T, NodeError>;
