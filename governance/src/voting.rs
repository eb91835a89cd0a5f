//! Vote choices, wire directions, and prior-vote detection

use serde::Deserialize;
use std::collections::HashMap;

/// The operator's choice for one proposal.
///
/// Choices form the fixed cycle `No → Abstain → Yes → No`.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoteChoice {
    No,
    #[default]
    Abstain,
    Yes,
}

/// Step through the choice cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Forward,
    Backward,
}

impl CycleDirection {
    pub fn delta(self) -> i64 {
        match self {
            CycleDirection::Forward => 1,
            CycleDirection::Backward => -1,
        }
    }
}

impl VoteChoice {
    /// Cycle order, indexed by [`VoteChoice::index`]
    pub const CYCLE: [VoteChoice; 3] = [VoteChoice::No, VoteChoice::Abstain, VoteChoice::Yes];

    pub fn index(self) -> usize {
        match self {
            VoteChoice::No => 0,
            VoteChoice::Abstain => 1,
            VoteChoice::Yes => 2,
        }
    }

    /// Choice at `index` in the cycle, wrapping in both directions
    pub fn from_index(index: i64) -> Self {
        Self::CYCLE[index.rem_euclid(Self::CYCLE.len() as i64) as usize]
    }

    pub fn cycled(self, direction: CycleDirection) -> Self {
        Self::from_index(self.index() as i64 + direction.delta())
    }

    /// Wire direction, or `None` for abstain (which is never submitted)
    pub fn direction(self) -> Option<VoteDirection> {
        match self {
            VoteChoice::Yes => Some(VoteDirection::Yes),
            VoteChoice::No => Some(VoteDirection::No),
            VoteChoice::Abstain => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VoteChoice::No => "NO",
            VoteChoice::Abstain => "ABSTAIN",
            VoteChoice::Yes => "YES",
        }
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A submittable vote direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteDirection {
    Yes,
    No,
}

impl VoteDirection {
    /// Code used inside the signed vote message
    pub fn code(self) -> u8 {
        match self {
            VoteDirection::Yes => 1,
            VoteDirection::No => 2,
        }
    }

    /// Keyword the node's vote command expects
    pub fn as_str(self) -> &'static str {
        match self {
            VoteDirection::Yes => "yes",
            VoteDirection::No => "no",
        }
    }
}

/// A vote already recorded on the network for some masternode
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExistingVote {
    #[serde(rename = "Vote")]
    pub choice: VoteChoice,
}

/// Whether one of the operator's masternodes has already voted on a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorVote {
    #[default]
    NotVoted,
    Yes,
    No,
}

impl PriorVote {
    /// Scan network votes for the first local funding reference with a
    /// yes or no vote. Abstain records do not count as a prior vote.
    pub fn detect<'a, I>(existing: &HashMap<String, ExistingVote>, local_refs: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        for funding_ref in local_refs {
            match existing.get(funding_ref).map(|vote| vote.choice) {
                Some(VoteChoice::Yes) => return PriorVote::Yes,
                Some(VoteChoice::No) => return PriorVote::No,
                _ => {}
            }
        }
        PriorVote::NotVoted
    }

    pub fn has_voted(self) -> bool {
        self != PriorVote::NotVoted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn votes(entries: &[(&str, VoteChoice)]) -> HashMap<String, ExistingVote> {
        entries
            .iter()
            .map(|(k, c)| (k.to_string(), ExistingVote { choice: *c }))
            .collect()
    }

    #[test]
    fn test_cycle_wraps_both_ways() {
        assert_eq!(VoteChoice::Yes.cycled(CycleDirection::Forward), VoteChoice::No);
        assert_eq!(VoteChoice::No.cycled(CycleDirection::Backward), VoteChoice::Yes);
        assert_eq!(VoteChoice::Abstain.cycled(CycleDirection::Forward), VoteChoice::Yes);
        assert_eq!(VoteChoice::Abstain.cycled(CycleDirection::Backward), VoteChoice::No);
    }

    #[test]
    fn test_cycle_matches_modular_sum() {
        let steps = [1i64, 1, -1, 1, 1, 1, -1, -1, -1, -1, 1];
        let mut choice = VoteChoice::Abstain;
        let mut sum = 0;
        for step in steps {
            let direction = if step > 0 {
                CycleDirection::Forward
            } else {
                CycleDirection::Backward
            };
            choice = choice.cycled(direction);
            sum += step;
            assert_eq!(choice, VoteChoice::from_index(1 + sum));
        }
    }

    #[test]
    fn test_direction_codes() {
        assert_eq!(VoteChoice::Yes.direction().map(VoteDirection::code), Some(1));
        assert_eq!(VoteChoice::No.direction().map(VoteDirection::code), Some(2));
        assert_eq!(VoteChoice::Abstain.direction(), None);
        assert_eq!(VoteDirection::No.as_str(), "no");
    }

    #[test]
    fn test_prior_vote_detection() {
        let existing = votes(&[("tx1-0", VoteChoice::Yes)]);
        assert_eq!(PriorVote::detect(&existing, ["tx1-0"]), PriorVote::Yes);
        assert_eq!(PriorVote::detect(&existing, ["tx9-0"]), PriorVote::NotVoted);

        let existing = votes(&[("tx1-0", VoteChoice::Abstain), ("tx2-1", VoteChoice::No)]);
        assert_eq!(PriorVote::detect(&existing, ["tx1-0", "tx2-1"]), PriorVote::No);
    }

    #[test]
    fn test_existing_vote_from_node_json() {
        let raw = r#"{"tx1-0": {"Vote": "YES", "nTime": 1445}, "tx2-1": {"Vote": "NO"}}"#;
        let parsed: HashMap<String, ExistingVote> = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed["tx1-0"].choice, VoteChoice::Yes);
        assert_eq!(parsed["tx2-1"].choice, VoteChoice::No);
    }
}
