//! Engine error types

use mnvote_crypto::CryptoError;
use mnvote_governance::GovernanceError;
use mnvote_node::NodeError;
use thiserror::Error;

use crate::orchestrator::SubmissionReport;
use crate::session::SessionState;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Node unreachable: {0}")]
    NodeUnreachable(#[source] NodeError),

    #[error("Node error: {0}")]
    Node(#[from] NodeError),

    #[error("Ballot error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("Entropy source failed after {attempted} submission(s); batch aborted: {source}")]
    EntropyUnavailable {
        attempted: usize,
        /// Pairs sent before the failure, marked aborted
        report: Box<SubmissionReport>,
        #[source]
        source: CryptoError,
    },

    #[error("Session is {actual:?}, expected {expected:?}")]
    InvalidState {
        expected: SessionState,
        actual: SessionState,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
