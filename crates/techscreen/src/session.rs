//! Session state store - the in-memory conversation for one session.
//!
//! Holds the full model-facing history (including the system instruction),
//! a parallel display list for rendering (which never includes the system
//! instruction), and a flag for whether an interview is active. Lifetime is
//! one user session; the conversation driver is the only mutator.

use tokio::sync::RwLock;

use crate::chat::{Message, Role};

/// One entry of the render-facing message list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DisplayMessage {
    pub role: Role,
    pub text: String,
}

/// The in-memory conversation for a single session.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    /// Full history sent to the language model, in conversation order.
    pub history: Vec<Message>,
    /// What the client renders, in conversation order.
    pub display: Vec<DisplayMessage>,
    /// Whether an interview is in progress.
    pub started: bool,
}

/// Owner of the session's `ConversationState`.
///
/// `get` returns the current state, creating an empty one if none exists
/// yet; `set` replaces it wholesale. Events for the single session run to
/// completion one at a time, so there is no finer-grained locking.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: RwLock<ConversationState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> ConversationState {
        self.state.read().await.clone()
    }

    pub async fn set(&self, state: ConversationState) {
        *self.state.write().await = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fresh_store_yields_empty_idle_state() {
        let store = SessionStore::new();
        let state = store.get().await;
        assert!(state.history.is_empty());
        assert!(state.display.is_empty());
        assert!(!state.started);
    }

    #[tokio::test]
    async fn set_replaces_state() {
        let store = SessionStore::new();

        let mut state = store.get().await;
        state.history.push(Message::system("instruction"));
        state.display.push(DisplayMessage {
            role: Role::Assistant,
            text: "first question".to_string(),
        });
        state.started = true;
        store.set(state).await;

        let state = store.get().await;
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.display.len(), 1);
        assert!(state.started);
    }
}
