//! Typed parsing of node replies
//!
//! Node replies are JSON objects keyed by name. Each entry is checked on
//! its own; a bad entry is reported and dropped instead of failing the
//! whole listing.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use mnvote_governance::{ExistingVote, ProposalRecord};

use crate::error::{NodeError, Result};

/// A proposal entry the node returned that could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedProposal {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProposalList {
    pub records: Vec<ProposalRecord>,
    pub rejected: Vec<RejectedProposal>,
}

#[derive(Debug, Deserialize)]
struct RawProposal {
    #[serde(rename = "Hash")]
    hash: String,
    #[serde(rename = "Yeas")]
    yeas: u64,
    #[serde(rename = "Nays")]
    nays: u64,
}

#[derive(Debug, Deserialize)]
struct RawCount {
    total: u64,
}

fn parse_object(command: &str, raw: &str) -> Result<Map<String, Value>> {
    serde_json::from_str(raw).map_err(|e| NodeError::InvalidResponse {
        command: command.to_string(),
        reason: e.to_string(),
    })
}

/// Parse the proposal listing (`mnbudget show`)
pub fn parse_proposal_list(raw: &str) -> Result<ProposalList> {
    let mut list = ProposalList::default();

    for (name, value) in parse_object("mnbudget show", raw)? {
        let parsed = serde_json::from_value::<RawProposal>(value)
            .map_err(|e| e.to_string())
            .and_then(|p| {
                if p.hash.trim().is_empty() {
                    Err("empty Hash".to_string())
                } else {
                    Ok(p)
                }
            });

        match parsed {
            Ok(p) => list.records.push(ProposalRecord {
                name,
                content_hash: p.hash,
                yeas: p.yeas,
                nays: p.nays,
            }),
            Err(reason) => {
                log::warn!("Rejecting proposal {}: {}", name, reason);
                list.rejected.push(RejectedProposal { name, reason });
            }
        }
    }

    Ok(list)
}

/// Parse existing votes for one proposal (`mnbudget getvotes`)
pub fn parse_existing_votes(raw: &str) -> Result<HashMap<String, ExistingVote>> {
    let mut votes = HashMap::new();

    for (funding_ref, value) in parse_object("mnbudget getvotes", raw)? {
        match serde_json::from_value::<ExistingVote>(value) {
            Ok(vote) => {
                votes.insert(funding_ref, vote);
            }
            Err(e) => log::warn!("Ignoring vote record {}: {}", funding_ref, e),
        }
    }

    Ok(votes)
}

/// Parse the masternode count, either a bare number or `{"total": n, ...}`
pub fn parse_masternode_count(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    if let Ok(count) = trimmed.parse::<u64>() {
        return Ok(count);
    }

    serde_json::from_str::<RawCount>(trimmed)
        .map(|c| c.total)
        .map_err(|_| NodeError::InvalidResponse {
            command: "masternode count".to_string(),
            reason: format!("not a count: {}", trimmed),
        })
}
