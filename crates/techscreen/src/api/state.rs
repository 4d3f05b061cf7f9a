//! Application state shared across handlers.

use std::sync::Arc;

use crate::interview::InterviewService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Conversation driver owning the session state.
    pub interview: Arc<InterviewService>,
}

impl AppState {
    pub fn new(interview: InterviewService) -> Self {
        Self {
            interview: Arc::new(interview),
        }
    }
}
