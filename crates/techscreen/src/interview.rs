//! Conversation driver - orchestrates interview turn-taking.
//!
//! Two states: Idle (no interview running) and Active. A validated profile
//! submission moves Idle to Active: the profile is stored (non-fatally),
//! the system instruction is built from the candidate's tech stack, the
//! model produces the first question, and a fresh two-entry transcript is
//! written. Each subsequent user message is a self-transition within
//! Active: the full accumulated history is resent to the model (the
//! service is stateless per call) and the user/assistant pair is appended
//! to the transcript.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::candidate::{CandidateRepository, CandidateSubmission};
use crate::chat::{LanguageModel, Message, Role};
use crate::session::{ConversationState, DisplayMessage, SessionStore};
use crate::transcript::TranscriptStore;

/// Hint shown to the user alongside the chat input. The driver does not
/// intercept the token; ending the interview is up to the client.
pub const EXIT_HINT: &str = "Type `exit` to end the interview.";

/// Result of starting an interview.
#[derive(Debug)]
pub struct InterviewStarted {
    /// The first assistant question.
    pub reply: Message,
    /// Display list after the transition (one assistant entry).
    pub display: Vec<DisplayMessage>,
    /// Set when the candidate row could not be stored; the interview
    /// continues regardless.
    pub database_warning: Option<String>,
}

/// Result of one completed turn.
#[derive(Debug)]
pub struct TurnOutcome {
    pub reply: Message,
    pub display: Vec<DisplayMessage>,
}

/// Orchestrates the interview against the model, the candidate table, the
/// transcript file, and the session state.
pub struct InterviewService {
    llm: Arc<dyn LanguageModel>,
    candidates: Arc<dyn CandidateRepository>,
    transcript: TranscriptStore,
    session: SessionStore,
}

impl InterviewService {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        candidates: Arc<dyn CandidateRepository>,
        transcript: TranscriptStore,
    ) -> Self {
        Self {
            llm,
            candidates,
            transcript,
            session: SessionStore::new(),
        }
    }

    /// Start an interview from a form submission (Idle -> Active).
    ///
    /// Re-submitting while Active restarts tracking: state and transcript
    /// are rebuilt from scratch.
    pub async fn start(&self, submission: CandidateSubmission) -> Result<InterviewStarted> {
        let profile = submission.validate()?;

        let database_warning = match self.candidates.insert(&profile).await {
            Ok(id) => {
                info!(candidate_id = id, full_name = %profile.full_name, "stored candidate profile");
                None
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "failed to store candidate profile");
                Some(format!("could not store candidate details: {err:#}"))
            }
        };

        let system = Message::system(system_instruction(&profile.tech_stack));

        let mut state = ConversationState {
            history: vec![system.clone()],
            ..ConversationState::default()
        };

        let reply = self
            .llm
            .complete(&state.history)
            .await
            .context("requesting chat completion")?;

        state.history.push(reply.clone());
        state.display.push(DisplayMessage {
            role: Role::Assistant,
            text: reply.content.clone(),
        });
        state.started = true;

        self.transcript
            .save(&[system, reply.clone()])
            .context("writing transcript")?;

        let display = state.display.clone();
        self.session.set(state).await;

        info!("interview started");
        Ok(InterviewStarted {
            reply,
            display,
            database_warning,
        })
    }

    /// Process one user message (self-transition within Active).
    pub async fn reply(&self, content: String) -> Result<TurnOutcome> {
        let mut state = self.session.get().await;
        if !state.started {
            bail!("no interview in progress");
        }

        let user = Message::user(content);
        state.history.push(user.clone());
        state.display.push(DisplayMessage {
            role: Role::User,
            text: user.content.clone(),
        });

        let reply = self
            .llm
            .complete(&state.history)
            .await
            .context("requesting chat completion")?;

        state.history.push(reply.clone());
        state.display.push(DisplayMessage {
            role: Role::Assistant,
            text: reply.content.clone(),
        });

        let display = state.display.clone();
        self.session.set(state).await;

        self.transcript
            .append(&[user, reply.clone()])
            .context("appending transcript turn")?;

        Ok(TurnOutcome { reply, display })
    }

    /// Current display list and whether an interview is active.
    pub async fn messages(&self) -> (bool, Vec<DisplayMessage>) {
        let state = self.session.get().await;
        (state.started, state.display)
    }

    /// Full model-facing history, including the system instruction.
    pub async fn history(&self) -> Vec<Message> {
        self.session.get().await.history
    }
}

/// The fixed interview policy, parameterized by the candidate's tech stack.
fn system_instruction(tech_stack: &str) -> String {
    format!(
        "You are an interview assistant. Based on the candidate's tech stack: \
         {tech_stack}, ask relevant interview questions but keep the track using \
         this system message. Do not ask more than 4 questions. \
         Wait for the user's answer before asking the next question. \
         Only one question after this system message. \
         Questions should not exceed 30 words."
    )
}
