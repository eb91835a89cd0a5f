//! Startup: read the ballot from the node

use std::collections::HashMap;

use mnvote_governance::{Ballot, PriorVote};
use mnvote_masternode::IdentitySet;
use mnvote_node::{NodeInterface, RejectedProposal};

use crate::error::{EngineError, Result};

#[derive(Debug)]
pub struct LoadedBallot {
    pub ballot: Ballot,
    /// Proposals the node listed but that failed validation
    pub rejected: Vec<RejectedProposal>,
}

/// Fetch proposals, tallies and existing votes, and build the ballot.
///
/// An unreachable node is reported as [`EngineError::NodeUnreachable`].
pub fn load_ballot(node: &dyn NodeInterface, identities: &IdentitySet) -> Result<LoadedBallot> {
    node.ping().map_err(EngineError::NodeUnreachable)?;

    let masternode_count = node.get_masternode_count()?;
    let list = node.list_proposals()?;
    log::info!(
        "Node reports {} proposal(s), {} masternode(s)",
        list.records.len(),
        masternode_count
    );

    let local_refs = identities.funding_references();
    let mut prior_votes = HashMap::new();
    for record in &list.records {
        let existing = node.list_existing_votes(&record.name)?;
        let prior = PriorVote::detect(&existing, local_refs.iter().map(String::as_str));
        if prior.has_voted() {
            log::debug!("Prior vote found on {}: {:?}", record.name, prior);
        }
        prior_votes.insert(record.name.clone(), prior);
    }

    let ballot = Ballot::from_records(list.records, masternode_count, &prior_votes)?;

    Ok(LoadedBallot {
        ballot,
        rejected: list.rejected,
    })
}
