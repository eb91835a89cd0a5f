//! Batch vote submission
//!
//! Walks every non-abstain proposal in ballot order and, for each, every
//! local masternode in funding reference order. Each pair gets a fresh
//! randomized timestamp, its own signature, and exactly one relay attempt.
//! A failed pair is recorded and the batch moves on; nothing is retried
//! or rolled back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use mnvote_crypto::{random_past_timestamp, sign_vote, EntropySource, MessageSigner};
use mnvote_governance::{Ballot, Proposal, VoteChoice, VoteDirection};
use mnvote_masternode::{IdentitySet, MasternodeIdentity};
use mnvote_node::{is_success, NodeInterface, SignedVote, DEFAULT_SUCCESS_MARKER};

use crate::clock::Clock;
use crate::error::{EngineError, Result};

/// Result of one (proposal, masternode) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The node accepted the vote; its reply verbatim
    Accepted { response: String },
    /// The node answered without the success marker; its reply verbatim
    Rejected { response: String },
    /// The vote never got a reply: signing or the relay call failed
    Failed { reason: String },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted { .. })
    }

    /// Text shown to the operator for this pair
    pub fn message(&self) -> &str {
        match self {
            SubmissionOutcome::Accepted { response } | SubmissionOutcome::Rejected { response } => {
                response
            }
            SubmissionOutcome::Failed { reason } => reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionEntry {
    pub proposal: String,
    pub funding_reference: String,
    pub choice: VoteChoice,
    pub timestamp: i64,
    pub signature: Option<String>,
    pub outcome: SubmissionOutcome,
}

/// Entries in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    pub entries: Vec<SubmissionEntry>,
    /// Set when the batch was interrupted between pairs
    pub cancelled: bool,
    /// Set when an entropy failure stopped the batch
    pub aborted: bool,
    /// Pairs skipped because of cancellation or an abort
    pub not_attempted: usize,
}

impl SubmissionReport {
    pub fn successes(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_success()).count()
    }

    pub fn failures(&self) -> usize {
        self.entries.len() - self.successes()
    }

    pub fn is_complete(&self) -> bool {
        !self.cancelled && !self.aborted
    }
}

/// Progress callbacks, e.g. for live display while the batch runs
pub trait SubmissionObserver {
    fn on_proposal(&mut self, _proposal: &Proposal) {}
    fn on_entry(&mut self, _entry: &SubmissionEntry) {}
}

#[derive(Debug, Default)]
pub struct NoopObserver;

impl SubmissionObserver for NoopObserver {}

pub struct Orchestrator<'a> {
    node: &'a dyn NodeInterface,
    signer: &'a dyn MessageSigner,
    clock: &'a dyn Clock,
    success_marker: String,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        node: &'a dyn NodeInterface,
        signer: &'a dyn MessageSigner,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            node,
            signer,
            clock,
            success_marker: DEFAULT_SUCCESS_MARKER.to_string(),
            cancel: None,
        }
    }

    pub fn with_success_marker(mut self, marker: impl Into<String>) -> Self {
        self.success_marker = marker.into();
        self
    }

    /// Flag checked before each pair; once set, no further pair is started
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Sign and relay every (non-abstain proposal, masternode) pair.
    ///
    /// Calling this twice sends every vote twice, with new timestamps.
    /// Only an entropy failure stops the batch early with an error, which
    /// carries the report for the pairs already sent.
    pub fn submit_all(
        &self,
        ballot: &Ballot,
        identities: &IdentitySet,
        entropy: &mut dyn EntropySource,
        observer: &mut dyn SubmissionObserver,
    ) -> Result<SubmissionReport> {
        let proposals: Vec<&Proposal> = ballot.to_submit().collect();
        let total = proposals.len() * identities.len();
        let mut report = SubmissionReport::default();

        log::info!(
            "Submitting {} proposal vote(s) from {} masternode(s)",
            proposals.len(),
            identities.len()
        );

        'batch: for proposal in proposals {
            let Some(direction) = proposal.choice().direction() else {
                continue;
            };

            for (i, identity) in identities.iter().enumerate() {
                if self.cancelled() {
                    report.cancelled = true;
                    report.not_attempted = total - report.entries.len();
                    log::warn!(
                        "Submission cancelled, {} vote(s) not sent",
                        report.not_attempted
                    );
                    break 'batch;
                }
                if i == 0 {
                    observer.on_proposal(proposal);
                }

                let timestamp = match random_past_timestamp(&mut *entropy, self.clock.now()) {
                    Ok(timestamp) => timestamp,
                    Err(source) => {
                        report.aborted = true;
                        report.not_attempted = total - report.entries.len();
                        log::error!(
                            "❌ Entropy source failed, {} vote(s) not sent: {}",
                            report.not_attempted,
                            source
                        );
                        return Err(EngineError::EntropyUnavailable {
                            attempted: report.entries.len(),
                            report: Box::new(report),
                            source,
                        });
                    }
                };

                let entry = self.submit_pair(proposal, direction, identity, timestamp);
                observer.on_entry(&entry);
                report.entries.push(entry);
            }
        }

        log::info!(
            "Submission finished: {} accepted, {} failed",
            report.successes(),
            report.failures()
        );
        Ok(report)
    }

    fn submit_pair(
        &self,
        proposal: &Proposal,
        direction: VoteDirection,
        identity: &MasternodeIdentity,
        timestamp: i64,
    ) -> SubmissionEntry {
        let funding_reference = identity.funding_reference();
        let mut entry = SubmissionEntry {
            proposal: proposal.name().to_string(),
            funding_reference: funding_reference.clone(),
            choice: proposal.choice(),
            timestamp,
            signature: None,
            outcome: SubmissionOutcome::Failed {
                reason: String::new(),
            },
        };

        let signature = match sign_vote(
            self.signer,
            &funding_reference,
            proposal.content_hash(),
            direction.code(),
            timestamp,
            identity.secret.expose(),
        ) {
            Ok(signature) => signature,
            Err(e) => {
                log::error!(
                    "❌ Signing failed for {} on {}: {}",
                    funding_reference,
                    proposal.name(),
                    e
                );
                entry.outcome = SubmissionOutcome::Failed {
                    reason: format!("signing failed: {}", e),
                };
                return entry;
            }
        };

        let vote = SignedVote {
            funding: identity.funding.clone(),
            proposal_hash: proposal.content_hash().to_string(),
            direction,
            timestamp,
            signature: signature.clone(),
        };
        entry.signature = Some(signature);

        entry.outcome = match self.node.submit_vote(&vote) {
            Ok(response) if is_success(&response, &self.success_marker) => {
                log::info!(
                    "✅ {} voted {} on {}",
                    funding_reference,
                    direction.as_str(),
                    proposal.name()
                );
                SubmissionOutcome::Accepted { response }
            }
            Ok(response) => {
                log::warn!(
                    "Vote from {} on {} rejected: {}",
                    funding_reference,
                    proposal.name(),
                    response
                );
                SubmissionOutcome::Rejected { response }
            }
            Err(e) => {
                log::error!(
                    "❌ Relaying vote from {} on {} failed: {}",
                    funding_reference,
                    proposal.name(),
                    e
                );
                SubmissionOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        entry
    }
}
