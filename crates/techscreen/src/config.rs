//! Layered configuration: defaults, optional TOML file, environment.
//!
//! Environment variables use the `TECHSCREEN__` prefix with `__` as the
//! section separator, e.g. `TECHSCREEN__LLM__API_KEY`,
//! `TECHSCREEN__DATABASE__HOST`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub database: DatabaseConfig,
    pub transcript: TranscriptConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Language-model endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Bearer token for the chat completions endpoint.
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature, fixed at startup.
    pub temperature: f32,
}

/// MySQL connection parameters for the candidate table.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
}

/// Transcript file settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptConfig {
    pub path: PathBuf,
}

impl AppConfig {
    /// Build configuration from defaults, an optional config file, and the
    /// process environment (highest precedence).
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8715_i64)?
            .set_default("llm.api_key", "")?
            .set_default("llm.base_url", "https://api.mistral.ai/v1")?
            .set_default("llm.model", "mistral-small")?
            .set_default("llm.temperature", 0.7_f64)?
            .set_default("database.host", "localhost")?
            .set_default("database.user", "root")?
            .set_default("database.password", "")?
            .set_default("database.name", "interviews")?
            .set_default("transcript.path", "chat_history.json")?;

        if let Some(path) = config_file {
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }

        let built = builder
            .add_source(Environment::with_prefix("TECHSCREEN").separator("__"))
            .build()
            .context("building configuration")?;

        built
            .try_deserialize()
            .context("deserializing configuration")
    }
}
