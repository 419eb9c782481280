//! Match specifications and the pure input matcher

use super::collation::Collation;
use super::response::Utterance;

/// What an utterance must look like for a handler to fire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSpec {
    /// Matches unconditionally
    Any,
    /// Whole command similar to the phrase
    ExactPhrase(String),
    /// Same number of tokens, pairwise similar
    OrderedTokenSequence(Vec<String>),
    /// Every required token similar to some utterance token
    UnorderedTokenSet(Vec<String>),
}

impl MatchSpec {
    pub fn phrase(phrase: &str) -> Self {
        MatchSpec::ExactPhrase(phrase.to_string())
    }

    pub fn sequence(tokens: &[&str]) -> Self {
        MatchSpec::OrderedTokenSequence(tokens.iter().map(|t| (*t).to_string()).collect())
    }

    pub fn tokens(tokens: &[&str]) -> Self {
        MatchSpec::UnorderedTokenSet(tokens.iter().map(|t| (*t).to_string()).collect())
    }

    /// Evaluate against an utterance.
    ///
    /// `UnorderedTokenSet` is non-injective: a single present
    /// token may satisfy several required tokens.
    pub fn matches(&self, utterance: &Utterance, collation: &Collation) -> bool {
        match self {
            MatchSpec::Any => true,
            MatchSpec::ExactPhrase(phrase) => collation.similar(phrase, &utterance.command),
            MatchSpec::OrderedTokenSequence(sequence) => {
                sequence.len() == utterance.tokens.len()
                    && sequence
                        .iter()
                        .zip(&utterance.tokens)
                        .all(|(expected, actual)| collation.similar(expected, actual))
            }
            MatchSpec::UnorderedTokenSet(required) => required.iter().all(|needed| {
                utterance
                    .tokens
                    .iter()
                    .any(|token| collation.similar(needed, token))
            }),
        }
    }
}

/// True if any of `specs` matches
pub fn any_matches(specs: &[MatchSpec], utterance: &Utterance, collation: &Collation) -> bool {
    specs.iter().any(|spec| spec.matches(utterance, collation))
}
