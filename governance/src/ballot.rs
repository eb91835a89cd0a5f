//! The ballot: all open proposals plus the operator's choice for each
//!
//! Proposals are held sorted case-insensitively by name. The same order
//! drives cursor navigation and vote submission.

use std::collections::{HashMap, HashSet};

use crate::error::{GovernanceError, Result};
use crate::proposal::{Proposal, ProposalRecord};
use crate::voting::{CycleDirection, PriorVote, VoteChoice};

#[derive(Debug, Clone, Default)]
pub struct Ballot {
    proposals: Vec<Proposal>,
    masternode_count: u64,
}

/// Case-insensitive name order, ties broken by the exact name so the
/// order never depends on the input order.
pub fn ballot_order(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl Ballot {
    /// Build a ballot from proposals, rejecting duplicate names
    pub fn new(mut proposals: Vec<Proposal>, masternode_count: u64) -> Result<Self> {
        let mut names = HashSet::new();
        for proposal in &proposals {
            if !names.insert(proposal.name()) {
                return Err(GovernanceError::DuplicateProposal(
                    proposal.name().to_string(),
                ));
            }
        }

        proposals.sort_by(|a, b| ballot_order(a.name(), b.name()));

        Ok(Self {
            proposals,
            masternode_count,
        })
    }

    /// Build a ballot from node records and precomputed prior votes
    pub fn from_records(
        records: Vec<ProposalRecord>,
        masternode_count: u64,
        prior_votes: &HashMap<String, PriorVote>,
    ) -> Result<Self> {
        let proposals = records
            .into_iter()
            .map(|record| {
                let prior = prior_votes.get(&record.name).copied().unwrap_or_default();
                Proposal::new(record, masternode_count, prior)
            })
            .collect();

        Self::new(proposals, masternode_count)
    }

    /// Proposals in ballot order
    pub fn list_votable(&self) -> &[Proposal] {
        &self.proposals
    }

    /// Proposals that will produce submissions, in ballot order
    pub fn to_submit(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals
            .iter()
            .filter(|p| p.choice() != VoteChoice::Abstain)
    }

    pub fn get(&self, name: &str) -> Option<&Proposal> {
        self.proposals.iter().find(|p| p.name() == name)
    }

    /// Advance the choice of the named proposal one step around the cycle
    pub fn cycle_vote(&mut self, name: &str, direction: CycleDirection) -> Result<VoteChoice> {
        let proposal = self
            .proposals
            .iter_mut()
            .find(|p| p.name() == name)
            .ok_or_else(|| GovernanceError::ProposalNotFound(name.to_string()))?;

        Ok(proposal.cycle(direction))
    }

    /// Advance the choice of the proposal at a ballot position
    pub fn cycle_vote_at(&mut self, index: usize, direction: CycleDirection) -> Result<VoteChoice> {
        let len = self.proposals.len();
        let proposal = self
            .proposals
            .get_mut(index)
            .ok_or(GovernanceError::PositionOutOfRange { index, len })?;

        Ok(proposal.cycle(direction))
    }

    pub fn masternode_count(&self) -> u64 {
        self.masternode_count
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }
}
