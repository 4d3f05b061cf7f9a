//! Chat message model and the language-model client.
//!
//! The wire format is the OpenAI-compatible chat completions API: an
//! ordered list of role-tagged messages in, a single assistant message out.
//! The service is stateless per call, so the caller resends the full
//! accumulated history on every request.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Who authored a message. Serializes to the lowercase wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat message. Ordering within a conversation is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Language-model invocation seam.
///
/// The production implementation talks HTTP; tests inject a scripted mock.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Request one assistant reply for the given conversation history.
    async fn complete(&self, messages: &[Message]) -> Result<Message>;
}

/// Client for any OpenAI-compatible chat completions endpoint.
pub struct OpenAiCompatClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiCompatClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatClient {
    async fn complete(&self, messages: &[Message]) -> Result<Message> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("sending chat completion request")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("chat completion request failed with {status}: {body}");
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("decoding chat completion response")?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("chat completion response contained no choices"))?;

        Ok(Message::assistant(content))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roles_serialize_lowercase() {
        let msg = Message::system("hello");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value, json!({"role": "system", "content": "hello"}));

        let msg = Message::assistant("hi");
        assert_eq!(serde_json::to_value(&msg).unwrap()["role"], "assistant");
    }

    #[test]
    fn request_body_carries_model_and_temperature() {
        let messages = vec![Message::system("s"), Message::user("u")];
        let request = ChatRequest {
            model: "mistral-small",
            messages: &messages,
            temperature: 0.7,
            stream: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "mistral-small");
        let temperature = value["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
        assert_eq!(value["stream"], false);
        assert_eq!(value["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn response_parses_first_choice_content() {
        let raw = json!({
            "id": "cmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Question one?"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        });
        let parsed: ChatResponse = serde_json::from_value(raw).unwrap();
        let content = parsed.choices[0].message.content.clone();
        assert_eq!(content.as_deref(), Some("Question one?"));
    }
}
