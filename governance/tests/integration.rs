use mnvote_governance::*;
use std::collections::HashMap;

fn record(name: &str, yeas: u64, nays: u64) -> ProposalRecord {
    ProposalRecord {
        name: name.to_string(),
        content_hash: format!("{:0>64}", name.len()),
        yeas,
        nays,
    }
}

#[test]
fn test_ballot_from_node_records() {
    let mut priors = HashMap::new();
    priors.insert("Proposal-Z".to_string(), PriorVote::Yes);

    let ballot = Ballot::from_records(
        vec![record("Proposal-Z", 900, 100), record("Proposal-a", 10, 400)],
        4000,
        &priors,
    )
    .unwrap();

    let proposals = ballot.list_votable();
    assert_eq!(proposals[0].name(), "Proposal-a");
    assert_eq!(proposals[0].prior_vote(), PriorVote::NotVoted);
    assert!(!proposals[0].metrics().passing);

    assert_eq!(proposals[1].name(), "Proposal-Z");
    assert_eq!(proposals[1].prior_vote(), PriorVote::Yes);
    assert!(proposals[1].metrics().passing);
    assert_eq!(proposals[1].metrics().turnout_display(), "25.0");
}

#[test]
fn test_cycle_sequence_never_leaves_choice_set() {
    let mut ballot = Ballot::from_records(vec![record("p", 0, 0)], 1, &HashMap::new()).unwrap();

    let pattern = [
        CycleDirection::Forward,
        CycleDirection::Backward,
        CycleDirection::Backward,
        CycleDirection::Backward,
        CycleDirection::Forward,
        CycleDirection::Backward,
        CycleDirection::Backward,
    ];

    let mut expected_index = VoteChoice::Abstain.index() as i64;
    for direction in pattern.iter().cycle().take(50) {
        let choice = ballot.cycle_vote("p", *direction).unwrap();
        expected_index += direction.delta();
        assert!(VoteChoice::CYCLE.contains(&choice));
        assert_eq!(choice, VoteChoice::from_index(expected_index));
    }
}

#[test]
fn test_metrics_fixed_at_load() {
    let mut ballot =
        Ballot::from_records(vec![record("p", 50, 10)], 200, &HashMap::new()).unwrap();
    let before = *ballot.get("p").unwrap().metrics();

    ballot.cycle_vote("p", CycleDirection::Forward).unwrap();

    let proposal = ballot.get("p").unwrap();
    assert_eq!(*proposal.metrics(), before);
    assert_eq!(*proposal.metrics(), ProposalMetrics::compute(50, 10, 200));
    assert_eq!(proposal.yeas(), 50);
    assert_eq!(proposal.nays(), 10);
}
