//! Error types for the signed question pipeline.
//!
//! Every fallible public function returns `Result<T, Report<QuestionError>>`
//! so callers get the failing stage plus any context attached on the way up.
//! None of the variants ever carry private key text.

use derive_more::{Display, Error};

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorStage {
    #[display("validation")]
    Validation,
    #[display("crypto")]
    Crypto,
    #[display("network")]
    Network,
    #[display("configuration")]
    Configuration,
}

#[derive(Debug, Display, Error)]
pub enum QuestionError {
    /// Question type outside the configured range.
    #[display("Unknown question type: questionType={question_type} (allowed {min}..={max})")]
    InvalidCategory {
        question_type: i64,
        min: i64,
        max: i64,
    },

    /// Firm identifier exceeds the configured length.
    #[display("Invalid firm ID: firmID={firm_id} (max {max_length} bytes)")]
    InvalidFirmId { firm_id: String, max_length: usize },

    /// Private key text has the wrong serialized length.
    #[display("Invalid private key: length {actual}, expected {expected}")]
    InvalidPrivateKey { actual: usize, expected: usize },

    /// PEM armor missing or base64 body corrupt.
    #[display("Failed to decode private key: {message}")]
    KeyDecode { message: String },

    /// DER body is not an EC private key for the expected curve.
    #[display("Failed to parse private key: {message}")]
    KeyParse { message: String },

    /// The ECDSA operation itself failed.
    #[display("Failed to sign request: {message}")]
    Signing { message: String },

    /// Signature text does not have the `r<delimiter>s` decimal shape.
    #[display("Malformed digital signature: {message}")]
    MalformedSignature { message: String },

    /// Signed query string is missing a parameter or has a bad value.
    #[display("Malformed signed query: {message}")]
    MalformedQuery { message: String },

    /// Key file could not be read.
    #[display("Failed to read private key file: {message}")]
    KeyFile { message: String },

    /// Connection failure or non-2xx HTTP response.
    #[display("Transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Response body is not a well-formed envelope.
    #[display("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// The service answered with a non-zero status.
    #[display("Service error (status {status}): {message}")]
    Application { status: i64, message: String },

    #[display("Configuration error: {message}")]
    Configuration { message: String },
}

impl QuestionError {
    /// Stage of the pipeline this error belongs to.
    #[must_use]
    pub fn stage(&self) -> ErrorStage {
        match self {
            Self::InvalidCategory { .. }
            | Self::InvalidFirmId { .. }
            | Self::InvalidPrivateKey { .. }
            | Self::MalformedQuery { .. } => ErrorStage::Validation,
            Self::KeyDecode { .. }
            | Self::KeyParse { .. }
            | Self::Signing { .. }
            | Self::MalformedSignature { .. }
            | Self::KeyFile { .. } => ErrorStage::Crypto,
            Self::Transport { .. } | Self::MalformedResponse { .. } | Self::Application { .. } => {
                ErrorStage::Network
            }
            Self::Configuration { .. } => ErrorStage::Configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            QuestionError::InvalidCategory {
                question_type: 9,
                min: 0,
                max: 7,
            }
            .to_string(),
            "Unknown question type: questionType=9 (allowed 0..=7)"
        );
        assert_eq!(
            QuestionError::Application {
                status: 1,
                message: "bad firm".into(),
            }
            .to_string(),
            "Service error (status 1): bad firm"
        );
        assert_eq!(
            QuestionError::InvalidPrivateKey {
                actual: 228,
                expected: 229,
            }
            .to_string(),
            "Invalid private key: length 228, expected 229"
        );
    }

    #[test]
    fn test_error_stage() {
        assert_eq!(
            QuestionError::InvalidFirmId {
                firm_id: "x".into(),
                max_length: 0,
            }
            .stage(),
            ErrorStage::Validation
        );
        assert_eq!(
            QuestionError::KeyParse {
                message: "bad".into()
            }
            .stage(),
            ErrorStage::Crypto
        );
        assert_eq!(
            QuestionError::Transport {
                status: Some(500),
                message: "boom".into(),
            }
            .stage(),
            ErrorStage::Network
        );
        assert_eq!(
            QuestionError::Configuration {
                message: "bad".into()
            }
            .stage(),
            ErrorStage::Configuration
        );
    }
}
