//! The narrow interface the engine uses to reach a node

use std::collections::HashMap;

use mnvote_governance::{ExistingVote, VoteDirection};
use mnvote_masternode::FundingReference;

use crate::error::Result;
use crate::records::ProposalList;

/// Substring a node puts in its reply when it accepted a vote
pub const DEFAULT_SUCCESS_MARKER: &str = "successfully";

/// A fully signed vote, ready to relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedVote {
    pub funding: FundingReference,
    pub proposal_hash: String,
    pub direction: VoteDirection,
    pub timestamp: i64,
    pub signature: String,
}

/// Control interface of a node.
///
/// Every call blocks until the node has answered.
pub trait NodeInterface {
    /// Check that the node answers at all
    fn ping(&self) -> Result<()>;

    /// Total masternodes on the network
    fn get_masternode_count(&self) -> Result<u64>;

    /// Open budget proposals
    fn list_proposals(&self) -> Result<ProposalList>;

    /// Votes already cast on a proposal, keyed by funding reference
    fn list_existing_votes(&self, proposal_name: &str) -> Result<HashMap<String, ExistingVote>>;

    /// Relay a signed vote, returning the node's reply verbatim
    fn submit_vote(&self, vote: &SignedVote) -> Result<String>;
}

/// Whether a vote reply reports success
pub fn is_success(response: &str, marker: &str) -> bool {
    response.contains(marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_marker() {
        assert!(is_success("Voted successfully", DEFAULT_SUCCESS_MARKER));
        assert!(!is_success("Error voting : Invalid signature", DEFAULT_SUCCESS_MARKER));
        assert!(!is_success("", DEFAULT_SUCCESS_MARKER));
    }
}
