//! API request handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::candidate::CandidateSubmission;
use crate::interview::EXIT_HINT;
use crate::session::DisplayMessage;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Response to a successful interview start.
#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    /// The first assistant question.
    pub reply: String,
    /// Display list after the transition.
    pub messages: Vec<DisplayMessage>,
    /// Present when the candidate row could not be stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_warning: Option<String>,
}

/// Start an interview from a candidate form submission.
///
/// POST /interview
#[instrument(skip(state, submission))]
pub async fn start_interview(
    State(state): State<AppState>,
    Json(submission): Json<CandidateSubmission>,
) -> ApiResult<(StatusCode, Json<StartInterviewResponse>)> {
    let started = state.interview.start(submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(StartInterviewResponse {
            reply: started.reply.content,
            messages: started.display,
            database_warning: started.database_warning,
        }),
    ))
}

/// One chat input from the user.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// Response to a completed turn.
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    /// The assistant reply for this turn.
    pub reply: String,
    /// Display list after the turn.
    pub messages: Vec<DisplayMessage>,
}

/// Send one user message and get the assistant reply.
///
/// POST /interview/message
#[instrument(skip(state, request))]
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<Json<SendMessageResponse>> {
    if request.content.is_empty() {
        return Err(ApiError::bad_request("message content is required"));
    }

    let outcome = state.interview.reply(request.content).await?;

    Ok(Json(SendMessageResponse {
        reply: outcome.reply.content,
        messages: outcome.display,
    }))
}

/// The render source for the chat view.
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    /// Whether an interview is in progress.
    pub started: bool,
    /// Display list in conversation order (system instruction excluded).
    pub messages: Vec<DisplayMessage>,
    /// Hint text shown next to the chat input. Informational only; the
    /// server does not act on the token.
    pub hint: String,
}

/// Fetch the current conversation for rendering.
///
/// GET /interview/messages
pub async fn list_messages(State(state): State<AppState>) -> Json<MessagesResponse> {
    let (started, messages) = state.interview.messages().await;
    Json(MessagesResponse {
        started,
        messages,
        hint: EXIT_HINT.to_string(),
    })
}
