//! Session directory: one root machine per session id

use super::machine::{DialogError, Dispatch, Outcome};
use super::response::{Response, Utterance};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Builds a fresh root machine for a new session
pub type RootFactory = fn(StdRng) -> Box<dyn Dispatch>;

/// Handle to one session's machine tree.
///
/// The mutex serializes utterances of the same session; different sessions
/// never share a lock.
pub type SessionHandle = Arc<Mutex<Box<dyn Dispatch>>>;

struct Directory {
    sessions: HashMap<String, SessionHandle>,
    /// Master generator; every new session is seeded from it
    seeds: StdRng,
}

/// Maps session ids to root machines, created lazily on first contact.
///
/// Sessions are never evicted.
pub struct SessionDirectory {
    inner: RwLock<Directory>,
    factory: RootFactory,
}

impl SessionDirectory {
    /// `seed` fixes every random choice made by every session, in creation
    /// order. Without it the directory seeds from OS entropy.
    pub fn new(seed: Option<u64>, factory: RootFactory) -> Self {
        let seeds = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            inner: RwLock::new(Directory {
                sessions: HashMap::new(),
                seeds,
            }),
            factory,
        }
    }

    /// Get or create the machine tree for a session
    pub async fn get_or_create(&self, session_id: &str) -> SessionHandle {
        {
            let inner = self.inner.read().await;
            if let Some(handle) = inner.sessions.get(session_id) {
                return Arc::clone(handle);
            }
        }

        let mut inner = self.inner.write().await;
        // Another request may have created it between the two locks
        if let Some(handle) = inner.sessions.get(session_id) {
            return Arc::clone(handle);
        }

        let rng = StdRng::seed_from_u64(inner.seeds.gen());
        let root = (self.factory)(rng);
        tracing::info!(session_id = %session_id, machine = root.kind(), "Created session");

        let handle: SessionHandle = Arc::new(Mutex::new(root));
        inner
            .sessions
            .insert(session_id.to_string(), Arc::clone(&handle));
        handle
    }

    /// Dispatch one utterance for a session
    pub async fn handle(
        &self,
        session_id: &str,
        utterance: &Utterance,
    ) -> Result<Response, DialogError> {
        let handle = self.get_or_create(session_id).await;
        let mut root = handle.lock().await;

        let outcome = root.parse(utterance).inspect_err(|e| {
            tracing::error!(session_id = %session_id, error = %e, "Dispatch failed");
        })?;

        tracing::debug!(
            session_id = %session_id,
            active = root.active_kind(),
            finished = outcome.is_finished(),
            "Handled utterance"
        );

        Ok(match outcome {
            Outcome::Continue(response) => response,
            // A root has no parent to return to: the conversation is over
            Outcome::Finished(response) => response.ending(),
        })
    }

    /// Kind of the innermost active machine of a session, if it exists
    #[allow(dead_code)] // Used by tests
    pub async fn active_kind(&self, session_id: &str) -> Option<&'static str> {
        let handle = {
            let inner = self.inner.read().await;
            inner.sessions.get(session_id).cloned()
        }?;
        let root = handle.lock().await;
        Some(root.active_kind())
    }

    #[allow(dead_code)] // Used by tests
    pub async fn session_count(&self) -> usize {
        self.inner.read().await.sessions.len()
    }
}
