//! Techscreen Library
//!
//! This library provides the core components for the interview screening
//! service: the chat message model and language-model client, the session
//! state store, the transcript persister, the candidate store, and the
//! conversation driver orchestrating them behind an HTTP API.

pub mod api;
pub mod candidate;
pub mod chat;
pub mod config;
pub mod interview;
pub mod session;
pub mod transcript;
