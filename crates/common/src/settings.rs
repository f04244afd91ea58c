//! Client configuration.
//!
//! Settings are read from TOML and merged with environment variables prefixed
//! with `QUIZCALL__`. For example, `QUIZCALL__SERVICE__BASE_URL` overrides
//! `service.base_url`.

use std::str;

use config::{Config, Environment, File, FileFormat};
use error_stack::{Report, ResultExt};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::QuestionError;

pub const ENVIRONMENT_VARIABLE_PREFIX: &str = "QUIZCALL";
pub const ENVIRONMENT_VARIABLE_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Service {
    /// Endpoint the signed query is appended to.
    #[validate(url)]
    pub base_url: String,

    /// Whole-request timeout applied by the HTTP transport.
    #[serde(default = "default_timeout_ms")]
    #[validate(range(min = 1, max = 120_000))]
    pub timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[validate(schema(function = "validate_question_type_range"))]
pub struct RequestRules {
    pub question_type_min: i64,
    pub question_type_max: i64,
    pub firm_id_max_length: usize,
    /// Exact length of the PEM key text, armor and newlines included.
    pub private_key_length: usize,
    #[validate(custom(function = "validate_signature_delimiter"))]
    pub signature_delimiter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub service: Service,
    #[validate(nested)]
    pub request: RequestRules,
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    format!("quizcall/{}", env!("CARGO_PKG_VERSION"))
}

fn validate_question_type_range(rules: &RequestRules) -> Result<(), ValidationError> {
    if rules.question_type_min > rules.question_type_max {
        return Err(ValidationError::new("question_type_range")
            .with_message("question_type_min must not exceed question_type_max".into()));
    }
    Ok(())
}

// A digit inside the delimiter would make `r` and `s` ambiguous.
fn validate_signature_delimiter(delimiter: &str) -> Result<(), ValidationError> {
    if delimiter.is_empty() || delimiter.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("signature_delimiter")
            .with_message("delimiter must be non-empty and contain no digits".into()));
    }
    Ok(())
}

impl Settings {
    /// Load the embedded default settings merged with the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`QuestionError::Configuration`] if the merged settings fail
    /// to deserialize or validate.
    pub fn new() -> Result<Self, Report<QuestionError>> {
        let toml_bytes = include_bytes!("../../../quizcall.toml");
        let toml_str = str::from_utf8(toml_bytes).change_context(QuestionError::Configuration {
            message: "embedded quizcall.toml is not UTF-8".to_string(),
        })?;

        Self::from_toml(toml_str)
    }

    /// Parse settings from a TOML string, apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns a [`QuestionError::Configuration`] if the TOML is invalid, a
    /// required field is missing, or validation fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, Report<QuestionError>> {
        let environment = Environment::default()
            .prefix(ENVIRONMENT_VARIABLE_PREFIX)
            .separator(ENVIRONMENT_VARIABLE_SEPARATOR);

        let toml = File::from_str(toml_str, FileFormat::Toml);
        let settings: Self = Config::builder()
            .add_source(toml)
            .add_source(environment)
            .build()
            .and_then(Config::try_deserialize)
            .change_context(QuestionError::Configuration {
                message: "Failed to build settings".to_string(),
            })?;

        settings
            .validate()
            .change_context(QuestionError::Configuration {
                message: "Settings validation failed".to_string(),
            })?;

        Ok(settings)
    }

    /// Serialize the effective settings back to TOML.
    ///
    /// # Errors
    ///
    /// Returns a [`QuestionError::Configuration`] if serialization fails.
    pub fn to_canonical_toml(&self) -> Result<String, Report<QuestionError>> {
        toml::to_string(self).change_context(QuestionError::Configuration {
            message: "Failed to serialize settings".to_string(),
        })
    }
}
