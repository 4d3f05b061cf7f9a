//! Candidate profile: form input, validation, and the durable table.
//!
//! A submission arrives as raw form fields (phone is a digits-only string)
//! and is validated into an immutable `CandidateProfile`, which is written
//! once to the `user_details` MySQL table. The connection is opened, used,
//! and closed within the scope of a single insert.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::Connection;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use thiserror::Error;

use crate::config::DatabaseConfig;

/// Raw form fields as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateSubmission {
    pub full_name: String,
    pub email: String,
    /// Digits-only string, coerced to an integer during validation.
    pub phone: String,
    #[serde(default)]
    pub years_experience: u32,
    #[serde(default)]
    pub desired_position: String,
    #[serde(default)]
    pub current_location: String,
    pub tech_stack: String,
}

/// Validation failures for a candidate submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid submission: {0} is required")]
    MissingField(&'static str),

    #[error("invalid submission: phone must be a digits-only number, got {0:?}")]
    InvalidPhone(String),
}

/// Validated candidate details. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: String,
    pub phone: i64,
    pub years_experience: u32,
    pub desired_position: String,
    pub current_location: String,
    pub tech_stack: String,
}

impl CandidateSubmission {
    /// Validate the form fields and produce the immutable profile.
    ///
    /// Required: full name, email, a digits-only phone, and a non-empty
    /// tech stack. Position and location are captured as-is.
    pub fn validate(self) -> Result<CandidateProfile, ValidationError> {
        if self.full_name.is_empty() {
            return Err(ValidationError::MissingField("full name"));
        }
        if self.email.is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if self.phone.is_empty() || !self.phone.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidPhone(self.phone));
        }
        let phone: i64 = self
            .phone
            .parse()
            .map_err(|_| ValidationError::InvalidPhone(self.phone.clone()))?;
        if self.tech_stack.is_empty() {
            return Err(ValidationError::MissingField("tech stack"));
        }

        Ok(CandidateProfile {
            full_name: self.full_name,
            email: self.email,
            phone,
            years_experience: self.years_experience,
            desired_position: self.desired_position,
            current_location: self.current_location,
            tech_stack: self.tech_stack,
        })
    }
}

/// Durable store for candidate profiles.
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// Insert one row; returns the new row id.
    async fn insert(&self, profile: &CandidateProfile) -> Result<u64>;
}

/// Schema for the candidate table, created if absent on first insert.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS user_details (
    id INT AUTO_INCREMENT PRIMARY KEY,
    full_name VARCHAR(255),
    email VARCHAR(255),
    phone BIGINT,
    years_experience INT,
    desired_position TEXT,
    current_location VARCHAR(255),
    tech_stack TEXT
)
"#;

/// MySQL-backed candidate repository.
///
/// Each insert opens a fresh connection, ensures the table exists, writes
/// the row, and closes the connection. There is no pooling: the table is
/// touched once per session, and a connect failure must never take the
/// interview flow down with it.
pub struct MySqlCandidateRepository {
    options: MySqlConnectOptions,
}

impl MySqlCandidateRepository {
    pub fn new(config: &DatabaseConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);
        Self { options }
    }
}

impl MySqlCandidateRepository {
    async fn insert_row(&self, profile: &CandidateProfile) -> Result<u64> {
        let mut conn = MySqlConnection::connect_with(&self.options)
            .await
            .context("connecting to MySQL")?;

        sqlx::raw_sql(SCHEMA)
            .execute(&mut conn)
            .await
            .context("creating user_details table")?;

        let result = sqlx::query(
            r#"
            INSERT INTO user_details (
                full_name, email, phone, years_experience,
                desired_position, current_location, tech_stack
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.full_name)
        .bind(&profile.email)
        .bind(profile.phone)
        .bind(profile.years_experience)
        .bind(&profile.desired_position)
        .bind(&profile.current_location)
        .bind(&profile.tech_stack)
        .execute(&mut conn)
        .await
        .context("inserting candidate row")?;

        let id = result.last_insert_id();

        conn.close().await.context("closing MySQL connection")?;

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> CandidateSubmission {
        CandidateSubmission {
            full_name: "A".to_string(),
            email: "a@x.com".to_string(),
            phone: "1234567890".to_string(),
            years_experience: 2,
            desired_position: "Dev".to_string(),
            current_location: "NYC".to_string(),
            tech_stack: "Python".to_string(),
        }
    }

    #[test]
    fn valid_submission_coerces_phone() {
        let profile = submission().validate().unwrap();
        assert_eq!(profile.full_name, "A");
        assert_eq!(profile.phone, 1_234_567_890);
        assert_eq!(profile.years_experience, 2);
        assert_eq!(profile.tech_stack, "Python");
    }

    #[test]
    fn missing_name_is_rejected() {
        let mut sub = submission();
        sub.full_name.clear();
        assert_eq!(
            sub.validate().unwrap_err(),
            ValidationError::MissingField("full name")
        );
    }

    #[test]
    fn missing_email_is_rejected() {
        let mut sub = submission();
        sub.email.clear();
        assert_eq!(
            sub.validate().unwrap_err(),
            ValidationError::MissingField("email")
        );
    }

    #[test]
    fn non_numeric_phone_is_rejected() {
        let mut sub = submission();
        sub.phone = "555-1234".to_string();
        assert!(matches!(
            sub.validate().unwrap_err(),
            ValidationError::InvalidPhone(_)
        ));
    }

    #[test]
    fn empty_phone_is_rejected() {
        let mut sub = submission();
        sub.phone.clear();
        assert!(matches!(
            sub.validate().unwrap_err(),
            ValidationError::InvalidPhone(_)
        ));
    }

    #[test]
    fn empty_tech_stack_is_rejected() {
        let mut sub = submission();
        sub.tech_stack.clear();
        assert_eq!(
            sub.validate().unwrap_err(),
            ValidationError::MissingField("tech stack")
        );
    }

    #[test]
    fn phone_too_long_for_i64_is_rejected() {
        let mut sub = submission();
        sub.phone = "9".repeat(30);
        assert!(matches!(
            sub.validate().unwrap_err(),
            ValidationError::InvalidPhone(_)
        ));
    }

    /// Requires a reachable MySQL server; run manually with
    /// `TECHSCREEN__DATABASE__*` set and `cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn insert_writes_one_row() {
        let config = crate::config::AppConfig::load(None).unwrap();
        let repo = MySqlCandidateRepository::new(&config.database);
        let profile = submission().validate().unwrap();
        let id = repo.insert(&profile).await.unwrap();
        assert!(id > 0);
    }
}
