//! Governance error types

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum GovernanceError {
    #[error("Proposal not found: {0}")]
    ProposalNotFound(String),

    #[error("Duplicate proposal on ballot: {0}")]
    DuplicateProposal(String),

    #[error("Ballot position {index} out of range ({len} proposals)")]
    PositionOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, GovernanceError>;
