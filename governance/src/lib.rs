//! mnvote Governance Module
//!
//! Ballot model for budget proposals: the proposals open on the network,
//! the operator's in-progress choice for each, and the display metrics
//! derived from the network tallies at load time.

pub mod ballot;
pub mod error;
pub mod proposal;
pub mod voting;

pub use ballot::{ballot_order, Ballot};
pub use error::{GovernanceError, Result};
pub use proposal::{Proposal, ProposalMetrics, ProposalRecord};
pub use voting::{CycleDirection, ExistingVote, PriorVote, VoteChoice, VoteDirection};

/// Governance display constants
pub mod config {
    /// A proposal is passing when yeas minus nays exceeds
    /// the masternode count divided by this value (10%)
    pub const PASSING_MARGIN_DIVISOR: u64 = 10;
}
