//! Loading a ballot and driving a session to completion

use mnvote_crypto::{CryptoError, Ed25519MessageSigner, EntropySource, OsEntropy};
use mnvote_engine::*;
use mnvote_governance::{PriorVote, VoteChoice};
use mnvote_masternode::{IdentitySet, MasternodeIdentity, SigningSecret};
use mnvote_node::MemoryNode;

const KEY: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

fn identities() -> IdentitySet {
    IdentitySet::new(vec![
        MasternodeIdentity::new("mn1", "tx1-0".parse().unwrap(), SigningSecret::new(KEY)),
        MasternodeIdentity::new("mn2", "tx2-1".parse().unwrap(), SigningSecret::new(KEY)),
    ])
    .unwrap()
}

fn node() -> MemoryNode {
    MemoryNode::new(200)
        .with_proposal("dev-fund", "aa11", 30, 5)
        .with_proposal("Marketing", "bb22", 2, 10)
        .with_existing_vote("dev-fund", "tx1-0", VoteChoice::Yes)
        .with_existing_vote("dev-fund", "tx9-9", VoteChoice::No)
        .with_existing_vote("Marketing", "tx2-1", VoteChoice::Abstain)
}

#[test]
fn test_load_ballot_detects_local_prior_votes() {
    let loaded = load_ballot(&node(), &identities()).unwrap();
    let ballot = loaded.ballot;

    assert_eq!(ballot.masternode_count(), 200);
    assert_eq!(ballot.len(), 2);

    let dev = ballot.get("dev-fund").unwrap();
    assert_eq!(dev.prior_vote(), PriorVote::Yes);
    assert_eq!(dev.choice(), VoteChoice::Abstain);
    assert!(dev.metrics().passing);

    let marketing = ballot.get("Marketing").unwrap();
    assert_eq!(marketing.prior_vote(), PriorVote::NotVoted);
    assert!(!marketing.metrics().passing);
}

#[test]
fn test_load_ballot_keeps_rejected_listing_entries() {
    let node = node().with_rejected_proposal("broken", "missing Hash");
    let loaded = load_ballot(&node, &identities()).unwrap();

    assert_eq!(loaded.ballot.len(), 2);
    assert_eq!(loaded.rejected.len(), 1);
    assert_eq!(loaded.rejected[0].name, "broken");
}

#[test]
fn test_unreachable_node() {
    let result = load_ballot(&MemoryNode::unreachable(), &identities());
    assert!(matches!(result, Err(EngineError::NodeUnreachable(_))));
}

#[test]
fn test_session_submits_once() {
    let node = node();
    let loaded = load_ballot(&node, &identities()).unwrap();

    let mut session = Session::new();
    session.finish_loading(loaded.ballot, identities()).unwrap();
    assert_eq!(session.state(), SessionState::Ready);

    // "dev-fund" sorts first: vote yes, then move to the confirm row
    assert_eq!(session.apply(UserIntent::IncreaseChoice), Action::Redraw);
    session.apply(UserIntent::CycleUp);
    assert!(session.on_confirm_row());
    assert_eq!(session.apply(UserIntent::Confirm), Action::Submit);

    let orchestrator = Orchestrator::new(&node, &Ed25519MessageSigner, &SystemClock);
    let report = session
        .submit(&orchestrator, &mut OsEntropy, &mut NoopObserver)
        .unwrap();
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.successes(), 2);

    assert_eq!(session.state(), SessionState::Done);
    assert!(session.report().is_some());
    assert_eq!(session.apply(UserIntent::IncreaseChoice), Action::Ignored);

    let again = session.submit(&orchestrator, &mut OsEntropy, &mut NoopObserver);
    assert!(matches!(
        again,
        Err(EngineError::InvalidState {
            expected: SessionState::Ready,
            actual: SessionState::Done
        })
    ));
    assert_eq!(node.submissions().len(), 2);
}

#[test]
fn test_session_cannot_submit_while_loading() {
    let node = MemoryNode::new(1);
    let orchestrator = Orchestrator::new(&node, &Ed25519MessageSigner, &FixedClock(0));
    let mut session = Session::new();

    let result = session.submit(&orchestrator, &mut OsEntropy, &mut NoopObserver);
    assert!(matches!(result, Err(EngineError::InvalidState { .. })));
    assert_eq!(session.state(), SessionState::Loading);
}

/// Good for a single timestamp
struct OneDraw(bool);

impl EntropySource for OneDraw {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> mnvote_crypto::Result<()> {
        if std::mem::replace(&mut self.0, true) {
            return Err(CryptoError::EntropyUnavailable("exhausted".to_string()));
        }
        dest.fill(3);
        Ok(())
    }
}

#[test]
fn test_session_keeps_report_of_aborted_batch() {
    let node = node();
    let loaded = load_ballot(&node, &identities()).unwrap();

    let mut session = Session::new();
    session.finish_loading(loaded.ballot, identities()).unwrap();
    session.apply(UserIntent::IncreaseChoice);

    let orchestrator = Orchestrator::new(&node, &Ed25519MessageSigner, &SystemClock);
    let result = session.submit(&orchestrator, &mut OneDraw(false), &mut NoopObserver);
    assert!(matches!(
        result,
        Err(EngineError::EntropyUnavailable { attempted: 1, .. })
    ));

    assert_eq!(session.state(), SessionState::Done);
    let report = session.report().unwrap();
    assert!(report.aborted);
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.successes(), 1);
    assert_eq!(report.not_attempted, 1);
    assert_eq!(node.submissions().len(), 1);
}
