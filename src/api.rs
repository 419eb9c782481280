//! HTTP transport for the voice-assistant skill protocol
//!
//! One webhook endpoint takes the platform's request envelope, runs the
//! utterance through the session's machine tree and wraps the reply.

mod handlers;
mod types;

pub use handlers::create_router;

use crate::config::ArcadeConfig;
use crate::dialog::{RootFactory, SessionDirectory};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<SessionDirectory>,
}

impl AppState {
    pub fn new(config: &ArcadeConfig, root: RootFactory) -> Self {
        Self {
            directory: Arc::new(SessionDirectory::new(config.seed, root)),
        }
    }
}
