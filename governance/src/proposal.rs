//! Proposal types and display metrics

use crate::config::PASSING_MARGIN_DIVISOR;
use crate::voting::{CycleDirection, PriorVote, VoteChoice};

/// A proposal as reported by the node, validated at the load boundary
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalRecord {
    pub name: String,
    pub content_hash: String,
    pub yeas: u64,
    pub nays: u64,
}

/// Metrics derived once from the tallies and the network masternode count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProposalMetrics {
    pub turnout_percent: f64,
    pub passing: bool,
}

impl ProposalMetrics {
    pub fn compute(yeas: u64, nays: u64, masternode_count: u64) -> Self {
        let turnout_percent = if masternode_count == 0 {
            0.0
        } else {
            (yeas + nays) as f64 / masternode_count as f64 * 100.0
        };
        let margin = yeas as i128 - nays as i128;
        let passing = margin > (masternode_count / PASSING_MARGIN_DIVISOR) as i128;

        Self {
            turnout_percent,
            passing,
        }
    }

    /// Turnout with one decimal place, as shown on the ballot
    pub fn turnout_display(&self) -> String {
        format!("{:.1}", self.turnout_percent)
    }
}

/// One line of the ballot.
///
/// Everything except `choice` is fixed when the ballot is loaded.
#[derive(Debug, Clone)]
pub struct Proposal {
    name: String,
    content_hash: String,
    yeas: u64,
    nays: u64,
    choice: VoteChoice,
    prior_vote: PriorVote,
    metrics: ProposalMetrics,
}

impl Proposal {
    pub fn new(record: ProposalRecord, masternode_count: u64, prior_vote: PriorVote) -> Self {
        let metrics = ProposalMetrics::compute(record.yeas, record.nays, masternode_count);

        Self {
            name: record.name,
            content_hash: record.content_hash,
            yeas: record.yeas,
            nays: record.nays,
            choice: VoteChoice::Abstain,
            prior_vote,
            metrics,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn yeas(&self) -> u64 {
        self.yeas
    }

    pub fn nays(&self) -> u64 {
        self.nays
    }

    pub fn choice(&self) -> VoteChoice {
        self.choice
    }

    pub fn prior_vote(&self) -> PriorVote {
        self.prior_vote
    }

    pub fn metrics(&self) -> &ProposalMetrics {
        &self.metrics
    }

    pub(crate) fn cycle(&mut self, direction: CycleDirection) -> VoteChoice {
        self.choice = self.choice.cycled(direction);
        self.choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, yeas: u64, nays: u64) -> ProposalRecord {
        ProposalRecord {
            name: name.to_string(),
            content_hash: format!("{}-hash", name),
            yeas,
            nays,
        }
    }

    #[test]
    fn test_new_proposal_defaults_to_abstain() {
        let proposal = Proposal::new(record("dev-fund", 10, 2), 100, PriorVote::NotVoted);
        assert_eq!(proposal.choice(), VoteChoice::Abstain);
        assert_eq!(proposal.content_hash(), "dev-fund-hash");
    }

    #[test]
    fn test_turnout_and_passing() {
        let metrics = ProposalMetrics::compute(300, 50, 3000);
        assert_eq!(metrics.turnout_display(), "11.7");
        // 250 <= 300
        assert!(!metrics.passing);

        let metrics = ProposalMetrics::compute(400, 50, 3000);
        assert!(metrics.passing);
    }

    #[test]
    fn test_margin_uses_integer_division() {
        // 3009 / 10 == 300, so a margin of 301 passes
        assert!(ProposalMetrics::compute(301, 0, 3009).passing);
        assert!(!ProposalMetrics::compute(300, 0, 3009).passing);
    }

    #[test]
    fn test_metrics_with_no_masternodes() {
        let metrics = ProposalMetrics::compute(0, 5, 0);
        assert_eq!(metrics.turnout_percent, 0.0);
        assert!(!metrics.passing);
    }
}
