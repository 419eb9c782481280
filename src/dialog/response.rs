//! Utterances in, responses out
//!
//! Response text may carry `{display}{spoken}` pairs so one source string
//! renders differently on screen and in speech.

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

static SPEECH_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}\{([^{}]*)\}").expect("valid regex"));

/// Reply given when no handler accepts the utterance
pub const UNRECOGNIZED_TEXT: &str = "Извините, я не поняла команду. Скажите «помощь», чтобы узнать, что я умею.";

/// One turn of already tokenized user input
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Utterance {
    pub command: String,
    pub tokens: Vec<String>,
    pub raw_text: String,
}

impl Utterance {
    pub fn new(command: impl Into<String>, tokens: Vec<String>, raw_text: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            tokens,
            raw_text: raw_text.into(),
        }
    }

    /// Build an utterance by splitting `text` on whitespace.
    ///
    /// Real traffic arrives pre-tokenized; this is for tests and local tools.
    #[allow(dead_code)] // Used by tests
    pub fn from_text(text: &str) -> Self {
        let command = text.trim().to_lowercase();
        let tokens = command.split_whitespace().map(str::to_string).collect();
        Self {
            command,
            tokens,
            raw_text: text.to_string(),
        }
    }
}

/// Reply produced by a handler
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Response {
    /// Source text, possibly containing `{display}{spoken}` pairs
    pub text: String,
    /// Explicit spoken rendering; derived from `text` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spoken_text: Option<String>,
    pub suggested_replies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Value>,
    pub end_session: bool,
}

impl Response {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn unrecognized() -> Self {
        Self::new(UNRECOGNIZED_TEXT)
    }

    pub fn with_replies<I, S>(mut self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggested_replies = replies.into_iter().map(Into::into).collect();
        self
    }

    pub fn ending(mut self) -> Self {
        self.end_session = true;
        self
    }

    /// Text as shown on screen
    pub fn display_text(&self) -> String {
        display_rendering(&self.text)
    }

    /// Text as spoken aloud
    pub fn spoken(&self) -> String {
        self.spoken_text
            .clone()
            .unwrap_or_else(|| spoken_rendering(&self.text))
    }
}

/// Replace every `{a}{b}` pair with `a`
pub fn display_rendering(text: &str) -> String {
    SPEECH_PAIR_RE.replace_all(text, "$1").into_owned()
}

/// Replace every `{a}{b}` pair with `b`
pub fn spoken_rendering(text: &str) -> String {
    SPEECH_PAIR_RE.replace_all(text, "$2").into_owned()
}
