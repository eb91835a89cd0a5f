//! Node access through its command-line RPC client

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;

use mnvote_governance::ExistingVote;

use crate::error::{NodeError, Result};
use crate::interface::{NodeInterface, SignedVote};
use crate::records::{self, ProposalList};

pub const DEFAULT_CLI_PROGRAM: &str = "dash-cli";

/// Runs one client process per request
#[derive(Debug, Clone)]
pub struct DashCli {
    program: PathBuf,
    /// Passed before every command, e.g. `-datadir=...` or `-testnet`
    base_args: Vec<String>,
}

impl DashCli {
    pub fn new(program: impl Into<PathBuf>, base_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            base_args,
        }
    }

    /// Arguments for relaying one vote, in the order the node expects
    pub fn vote_args(vote: &SignedVote) -> Vec<String> {
        vec![
            "mnbudgetvoteraw".to_string(),
            vote.funding.txid.clone(),
            vote.funding.output_index.to_string(),
            vote.proposal_hash.clone(),
            vote.direction.as_str().to_string(),
            vote.timestamp.to_string(),
            vote.signature.clone(),
        ]
    }

    fn run<S: AsRef<str>>(&self, args: &[S]) -> Result<String> {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let command = args.join(" ");
        log::debug!("→ {} {}", self.program.display(), command);

        let output = Command::new(&self.program)
            .args(&self.base_args)
            .args(&args)
            .output()
            .map_err(|source| NodeError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::error!("❌ `{}` failed: {}", command, stderr);
            return Err(NodeError::CommandFailed {
                command,
                code: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl NodeInterface for DashCli {
    fn ping(&self) -> Result<()> {
        self.run(&["getinfo"])
            .map(|_| ())
            .map_err(|e| NodeError::Unreachable(e.to_string()))
    }

    fn get_masternode_count(&self) -> Result<u64> {
        records::parse_masternode_count(&self.run(&["masternode", "count"])?)
    }

    fn list_proposals(&self) -> Result<ProposalList> {
        records::parse_proposal_list(&self.run(&["mnbudget", "show"])?)
    }

    fn list_existing_votes(&self, proposal_name: &str) -> Result<HashMap<String, ExistingVote>> {
        records::parse_existing_votes(&self.run(&["mnbudget", "getvotes", proposal_name])?)
    }

    fn submit_vote(&self, vote: &SignedVote) -> Result<String> {
        let args = Self::vote_args(vote);
        let reply = self.run(args.as_slice())?;
        Ok(reply.trim_end().to_string())
    }
}
