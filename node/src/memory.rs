//! In-memory node for deterministic testing.
//!
//! Serves canned proposals, votes and counts, and records every vote it
//! is asked to relay. Specific funding references can be made to fail.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use mnvote_governance::{ExistingVote, ProposalRecord, VoteChoice};

use crate::error::{NodeError, Result};
use crate::interface::{NodeInterface, SignedVote};
use crate::records::{ProposalList, RejectedProposal};

pub const MEMORY_ACCEPTED_REPLY: &str = "Voted successfully";
pub const MEMORY_REJECTED_REPLY: &str = "Error voting : Invalid signature";

#[derive(Debug, Default)]
pub struct MemoryNode {
    unreachable: bool,
    masternode_count: u64,
    proposals: Vec<ProposalRecord>,
    rejected_proposals: Vec<RejectedProposal>,
    votes: HashMap<String, HashMap<String, ExistingVote>>,
    refuse: HashSet<String>,
    broken: HashSet<String>,
    submissions: Mutex<Vec<SignedVote>>,
}

impl MemoryNode {
    pub fn new(masternode_count: u64) -> Self {
        Self {
            masternode_count,
            ..Self::default()
        }
    }

    /// A node that fails every call
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn with_proposal(mut self, name: &str, content_hash: &str, yeas: u64, nays: u64) -> Self {
        self.proposals.push(ProposalRecord {
            name: name.to_string(),
            content_hash: content_hash.to_string(),
            yeas,
            nays,
        });
        self
    }

    /// A listing entry the node reports as unusable
    pub fn with_rejected_proposal(mut self, name: &str, reason: &str) -> Self {
        self.rejected_proposals.push(RejectedProposal {
            name: name.to_string(),
            reason: reason.to_string(),
        });
        self
    }

    pub fn with_existing_vote(mut self, proposal: &str, funding_ref: &str, choice: VoteChoice) -> Self {
        self.votes
            .entry(proposal.to_string())
            .or_default()
            .insert(funding_ref.to_string(), ExistingVote { choice });
        self
    }

    /// Reply with a rejection for votes from this funding reference
    pub fn refusing(mut self, funding_ref: &str) -> Self {
        self.refuse.insert(funding_ref.to_string());
        self
    }

    /// Fail the relay call itself for votes from this funding reference
    pub fn failing(mut self, funding_ref: &str) -> Self {
        self.broken.insert(funding_ref.to_string());
        self
    }

    /// Every vote relayed so far, in call order
    pub fn submissions(&self) -> Vec<SignedVote> {
        self.submissions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn check_reachable(&self) -> Result<()> {
        if self.unreachable {
            Err(NodeError::Unreachable("memory node is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl NodeInterface for MemoryNode {
    fn ping(&self) -> Result<()> {
        self.check_reachable()
    }

    fn get_masternode_count(&self) -> Result<u64> {
        self.check_reachable()?;
        Ok(self.masternode_count)
    }

    fn list_proposals(&self) -> Result<ProposalList> {
        self.check_reachable()?;
        Ok(ProposalList {
            records: self.proposals.clone(),
            rejected: self.rejected_proposals.clone(),
        })
    }

    fn list_existing_votes(&self, proposal_name: &str) -> Result<HashMap<String, ExistingVote>> {
        self.check_reachable()?;
        Ok(self.votes.get(proposal_name).cloned().unwrap_or_default())
    }

    fn submit_vote(&self, vote: &SignedVote) -> Result<String> {
        self.check_reachable()?;
        if let Ok(mut submissions) = self.submissions.lock() {
            submissions.push(vote.clone());
        }

        let funding_ref = vote.funding.to_string();
        if self.broken.contains(&funding_ref) {
            return Err(NodeError::CommandFailed {
                command: "mnbudgetvoteraw".to_string(),
                code: Some(1),
                stderr: "connection reset".to_string(),
            });
        }

        if self.refuse.contains(&funding_ref) {
            Ok(MEMORY_REJECTED_REPLY.to_string())
        } else {
            Ok(MEMORY_ACCEPTED_REPLY.to_string())
        }
    }
}
