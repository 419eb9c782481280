//! Property-based tests for collation, matching and handler selection

use super::machine::{Behavior, DialogError, Handler, HandlerTable, Machine, Outcome};
use super::*;
use proptest::prelude::*;
use std::sync::OnceLock;

// ============================================================================
// Test Helpers
// ============================================================================

fn utterance(tokens: &[String]) -> Utterance {
    Utterance::new(tokens.join(" "), tokens.to_vec(), tokens.join(" "))
}

fn arb_token() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,6}",
        "[а-я]{1,6}",
        Just("тест".to_string()),
        Just("опрос".to_string()),
        Just("вопрос".to_string()),
    ]
}

fn poll_collation() -> Collation {
    Collation::new(&[("опрос", &["тест", "вопрос"])])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    A,
    B,
}

struct Stub;

const NAMES: [&str; 6] = ["h0", "h1", "h2", "h3", "h4", "h5"];

fn noop(_m: &mut Machine<Stub>, _u: &Utterance) -> Result<Outcome, DialogError> {
    Ok(Outcome::Continue(Response::new("noop")))
}

impl Behavior for Stub {
    type State = Phase;
    const KIND: &'static str = "stub";

    fn table() -> &'static HandlerTable<Self> {
        static TABLE: OnceLock<HandlerTable<Stub>> = OnceLock::new();
        TABLE.get_or_init(|| HandlerTable::new(Collation::default(), Vec::new()))
    }
}

fn arb_spec() -> impl Strategy<Value = MatchSpec> {
    prop_oneof![
        1 => Just(MatchSpec::Any),
        2 => arb_token().prop_map(MatchSpec::ExactPhrase),
        2 => proptest::collection::vec(arb_token(), 0..3).prop_map(MatchSpec::OrderedTokenSequence),
        3 => proptest::collection::vec(arb_token(), 0..3).prop_map(MatchSpec::UnorderedTokenSet),
    ]
}

fn arb_guard() -> impl Strategy<Value = Vec<Phase>> {
    prop_oneof![
        Just(vec![]),
        Just(vec![Phase::A]),
        Just(vec![Phase::B]),
        Just(vec![Phase::A, Phase::B]),
    ]
}

fn arb_phase() -> impl Strategy<Value = Phase> {
    prop_oneof![Just(Phase::A), Just(Phase::B)]
}

// ============================================================================
// Collation
// ============================================================================

proptest! {
    #[test]
    fn prop_similarity_reflexive(token in arb_token()) {
        let collation = poll_collation();
        prop_assert!(collation.similar(&token, &token));
        prop_assert!(collation.similar(&token, &token.to_uppercase()));
    }

    #[test]
    fn prop_similarity_symmetric(a in arb_token(), b in arb_token()) {
        let collation = poll_collation();
        prop_assert_eq!(collation.similar(&a, &b), collation.similar(&b, &a));
    }

    #[test]
    fn prop_similarity_is_canonical_equality(a in arb_token(), b in arb_token()) {
        let collation = poll_collation();
        prop_assert_eq!(
            collation.similar(&a, &b),
            collation.canonical(&a) == collation.canonical(&b)
        );
    }
}

// ============================================================================
// Matching
// ============================================================================

proptest! {
    #[test]
    fn prop_sequence_matches_itself_only_at_same_length(
        tokens in proptest::collection::vec(arb_token(), 1..5),
        extra in arb_token(),
    ) {
        let collation = poll_collation();
        let spec = MatchSpec::OrderedTokenSequence(tokens.clone());
        prop_assert!(spec.matches(&utterance(&tokens), &collation));

        let mut longer = tokens.clone();
        longer.push(extra);
        prop_assert!(!spec.matches(&utterance(&longer), &collation));

        let shorter = &tokens[..tokens.len() - 1];
        prop_assert!(!spec.matches(&utterance(shorter), &collation));
    }

    #[test]
    fn prop_unordered_set_ignores_order_and_noise(
        required in proptest::collection::vec(arb_token(), 0..4),
        noise in proptest::collection::vec("[0-9]{1,3}", 0..4),
    ) {
        let collation = poll_collation();
        let spec = MatchSpec::UnorderedTokenSet(required.clone());
        let mut tokens: Vec<String> = noise;
        tokens.extend(required.iter().rev().cloned());
        prop_assert!(spec.matches(&utterance(&tokens), &collation));
    }

    #[test]
    fn prop_poll_aliases_match_anywhere(
        alias in prop_oneof![Just("опрос"), Just("тест"), Just("вопрос")],
        before in proptest::collection::vec("[a-z]{1,5}", 0..3),
        after in proptest::collection::vec("[a-z]{1,5}", 0..3),
    ) {
        let collation = poll_collation();
        let spec = MatchSpec::tokens(&["опрос"]);
        let mut tokens = before;
        tokens.push(alias.to_string());
        tokens.extend(after);
        prop_assert!(spec.matches(&utterance(&tokens), &collation));
    }
}

// ============================================================================
// Handler selection
// ============================================================================

proptest! {
    #[test]
    fn prop_select_returns_first_eligible(
        rows in proptest::collection::vec((proptest::collection::vec(arb_spec(), 1..3), arb_guard()), 0..6),
        tokens in proptest::collection::vec(arb_token(), 0..4),
        phase in arb_phase(),
    ) {
        let collation = poll_collation();
        let input = utterance(&tokens);

        let expected = rows.iter().position(|(specs, guard)| {
            (guard.is_empty() || guard.contains(&phase))
                && specs.iter().any(|spec| spec.matches(&input, &collation))
        });

        let handlers = rows
            .iter()
            .enumerate()
            .map(|(i, (specs, guard))| Handler::new(NAMES[i], specs.clone(), noop).when(guard))
            .collect();
        let table: HandlerTable<Stub> = HandlerTable::new(poll_collation(), handlers);

        let selected = table.select(phase, &input).map(|handler| handler.name);
        prop_assert_eq!(selected, expected.map(|i| NAMES[i]));
    }
}
