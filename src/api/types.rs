//! Skill protocol envelopes

use crate::dialog::{Response, Utterance};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Incoming webhook call
#[derive(Debug, Deserialize)]
pub struct SkillRequest {
    #[serde(default)]
    #[allow(dead_code)] // Device and locale info, unused
    pub meta: Value,
    pub request: RequestBody,
    pub session: SessionInfo,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub original_utterance: String,
    #[serde(default)]
    pub nlu: Nlu,
}

#[derive(Debug, Default, Deserialize)]
pub struct Nlu {
    #[serde(default)]
    pub tokens: Vec<String>,
}

impl RequestBody {
    /// Platform tokens when present, otherwise the command split on whitespace
    pub fn utterance(&self) -> Utterance {
        let tokens = if self.nlu.tokens.is_empty() {
            self.command.split_whitespace().map(str::to_lowercase).collect()
        } else {
            self.nlu.tokens.iter().map(|t| t.to_lowercase()).collect()
        };
        Utterance::new(self.command.to_lowercase(), tokens, self.original_utterance.clone())
    }
}

/// Session block; everything besides the id is echoed back untouched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Outgoing webhook reply
#[derive(Debug, Serialize)]
pub struct SkillResponse {
    pub response: ResponseBody,
    pub session: SessionInfo,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseBody {
    pub text: String,
    pub tts: String,
    pub buttons: Vec<Button>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Value>,
    pub end_session: bool,
}

/// Suggested reply shown as a button that disappears once pressed
#[derive(Debug, Serialize)]
pub struct Button {
    pub title: String,
    pub hide: bool,
}

impl From<Response> for ResponseBody {
    fn from(response: Response) -> Self {
        Self {
            text: response.display_text(),
            tts: response.spoken(),
            buttons: response
                .suggested_replies
                .into_iter()
                .map(|title| Button { title, hide: true })
                .collect(),
            card: response.card,
            end_session: response.end_session,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
