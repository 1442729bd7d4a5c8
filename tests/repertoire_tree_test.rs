//! Properties of the repertoire tree and the line drill.

use proptest::prelude::*;
use repertoire_core::{parse_line, DrillOutcome, DrillState, LineDrill, MoveToken, RepertoireTree};
use std::collections::BTreeSet;

fn line(s: &str) -> Vec<MoveToken> {
    parse_line(s).unwrap()
}

fn tok(s: &str) -> MoveToken {
    MoveToken::parse(s).unwrap()
}

/// Strategy for move tokens from a small alphabet so lines share prefixes often.
fn small_token() -> impl Strategy<Value = MoveToken> {
    prop::sample::select(vec!["e2e4", "d2d4", "e7e5", "c7c5", "g1f3", "b8c6"])
        .prop_map(|s| MoveToken::parse(s).unwrap())
}

fn small_line() -> impl Strategy<Value = Vec<MoveToken>> {
    prop::collection::vec(small_token(), 1..6)
}

/// Lines a user can still pick: drop any line that is a strict prefix of another.
fn maximal_lines(lines: &[Vec<MoveToken>]) -> BTreeSet<Vec<MoveToken>> {
    lines
        .iter()
        .filter(|l| {
            !lines
                .iter()
                .any(|other| other.len() > l.len() && other.starts_with(l))
        })
        .cloned()
        .collect()
}

proptest! {
    #[test]
    fn extracted_lines_match_inserted(lines in prop::collection::vec(small_line(), 0..12)) {
        let mut tree = RepertoireTree::new();
        for l in &lines {
            tree.insert_line(l);
        }

        let extracted = tree.extract_lines();
        let distinct: BTreeSet<_> = extracted.iter().cloned().collect();
        prop_assert_eq!(distinct.len(), extracted.len(), "no line extracted twice");
        prop_assert_eq!(distinct, maximal_lines(&lines));
    }

    #[test]
    fn insertion_order_does_not_change_the_set(lines in prop::collection::vec(small_line(), 1..8)) {
        let mut forward = RepertoireTree::new();
        let mut backward = RepertoireTree::new();
        for l in &lines {
            forward.insert_line(l);
        }
        for l in lines.iter().rev() {
            backward.insert_line(l);
        }

        let a: BTreeSet<_> = forward.extract_lines().into_iter().collect();
        let b: BTreeSet<_> = backward.extract_lines().into_iter().collect();
        prop_assert_eq!(a, b);
        prop_assert_eq!(forward.node_count(), backward.node_count());
    }

    #[test]
    fn reinserting_is_idempotent(lines in prop::collection::vec(small_line(), 1..8)) {
        let mut tree = RepertoireTree::new();
        for l in &lines {
            tree.insert_line(l);
        }
        let before = tree.extract_lines();
        for l in &lines {
            prop_assert_eq!(tree.insert_line(l), 0);
        }
        prop_assert_eq!(tree.extract_lines(), before);
    }

    #[test]
    fn suggestions_are_unique(lines in prop::collection::vec(small_line(), 1..10), prefix in prop::collection::vec(small_token(), 0..3)) {
        let mut tree = RepertoireTree::new();
        for l in &lines {
            tree.insert_line(l);
        }
        let next = tree.suggest_next(&prefix);
        let distinct: BTreeSet<_> = next.iter().collect();
        prop_assert_eq!(distinct.len(), next.len());
    }
}

#[test]
fn test_extraction_is_deterministic() {
    let mut tree = RepertoireTree::new();
    tree.insert_line(&line("e2e4 e7e5 g1f3"));
    tree.insert_line(&line("d2d4 d7d5"));
    tree.insert_line(&line("e2e4 c7c5"));

    let first = tree.extract_lines();
    assert_eq!(first, tree.extract_lines());
    assert_eq!(
        first,
        vec![line("e2e4 e7e5 g1f3"), line("e2e4 c7c5"), line("d2d4 d7d5")]
    );
}

#[test]
fn test_suggest_next_examples() {
    let mut tree = RepertoireTree::new();
    tree.insert_line(&line("e2e4"));
    tree.insert_line(&line("e2e4 e7e5"));

    assert_eq!(tree.suggest_next(&[]), vec![tok("e2e4")]);
    assert_eq!(tree.suggest_next(&line("e2e4")), vec![tok("e7e5")]);
    assert!(tree.suggest_next(&line("d2d4")).is_empty());
}

#[test]
fn test_fresh_tree_extracts_nothing() {
    assert!(RepertoireTree::new().extract_lines().is_empty());
}

#[test]
fn test_tree_survives_json() {
    let mut tree = RepertoireTree::new();
    tree.insert_line(&line("e2e4 e7e5 g1f3 b8c6"));
    tree.insert_line(&line("e2e4 e7e5 f1c4"));
    tree.insert_line(&line("c2c4"));

    let text = serde_json::to_string(&tree).unwrap();
    let restored: RepertoireTree = serde_json::from_str(&text).unwrap();
    assert_eq!(restored.extract_lines(), tree.extract_lines());
}

#[test]
fn test_drill_scenario() {
    let mut drill = LineDrill::new(line("e2e4 e7e5 g1f3"));

    assert_eq!(
        drill.play(&tok("e2e4")),
        DrillOutcome::Accepted { reply: Some(tok("e7e5")) }
    );
    assert_eq!(drill.state(), DrillState::AwaitingUserMove(2));

    drill.play(&tok("g1f3"));
    assert_eq!(drill.state(), DrillState::Solved);
}

#[test]
fn test_drill_mismatch() {
    let mut drill = LineDrill::new(line("e2e4 e7e5 g1f3"));
    match drill.play(&tok("d2d4")) {
        DrillOutcome::Rejected { expected, .. } => assert_eq!(expected, tok("e2e4")),
        other => panic!("expected a rejection, got {other:?}"),
    }
    assert_eq!(drill.state(), DrillState::AwaitingUserMove(0));
}

#[test]
fn test_drill_undo_returns_to_start() {
    let mut drill = LineDrill::new(line("e2e4 e7e5 g1f3"));
    drill.play(&tok("e2e4"));
    assert_eq!(drill.state(), DrillState::AwaitingUserMove(2));
    assert!(drill.undo());
    assert_eq!(drill.state(), DrillState::AwaitingUserMove(0));
    assert!(!drill.undo());
}

#[test]
fn test_drill_each_extracted_line() {
    let mut tree = RepertoireTree::new();
    tree.insert_line(&line("e2e4 e7e5 g1f3 b8c6"));
    tree.insert_line(&line("e2e4 c7c5 g1f3"));

    for l in tree.extract_lines() {
        let mut drill = LineDrill::new(l.clone());
        for user_move in l.iter().step_by(2) {
            assert!(matches!(drill.play(user_move), DrillOutcome::Accepted { .. }));
        }
        assert!(drill.is_solved());
    }
}
