//! Signed question request: validation, signing and query encoding.
//!
//! A [`SignedRequest`] is built once per call and moves through three stages
//! in order: [`RequestPreparer::check_params`],
//! [`RequestPreparer::generate_digital_signature`] and
//! [`RequestPreparer::generate_get_url`]. Calling a stage early is an error.

use std::fmt;

use chrono::Utc;
use error_stack::{Report, ResultExt};
use p256::ecdsa::VerifyingKey;
use url::Url;

use crate::constants::{
    QUERY_CURRENT_TIMESTAMP, QUERY_DIGITAL_SIGNATURE, QUERY_FIRM_ID, QUERY_QUESTION_TYPE,
};
use crate::error::QuestionError;
use crate::request_signing::{canonical_message, verify_digital_signature, RequestSigner};
use crate::settings::RequestRules;
use crate::validation::check_params;

/// Capabilities needed to turn caller input into a signed GET URL.
pub trait RequestPreparer {
    /// Validate the caller-supplied fields.
    ///
    /// # Errors
    ///
    /// Returns a validation-stage [`QuestionError`] on the first violated rule.
    fn check_params(&mut self) -> Result<(), Report<QuestionError>>;

    /// Sign the canonical message and store the signature.
    ///
    /// # Errors
    ///
    /// Returns a crypto-stage [`QuestionError`] if the key cannot be decoded or
    /// signing fails, or [`QuestionError::Configuration`] if the parameters
    /// were not validated first.
    fn generate_digital_signature(&mut self) -> Result<(), Report<QuestionError>>;

    /// Append the signed query parameters to `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`QuestionError::Configuration`] if the request is unsigned or
    /// `base_url` does not parse.
    fn generate_get_url(&self, base_url: &str) -> Result<Url, Report<QuestionError>>;
}

/// Nanoseconds since the Unix epoch.
#[must_use]
pub fn current_timestamp_nanos() -> i64 {
    // `timestamp_nanos_opt` only returns `None` after the year 2262.
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

pub struct SignedRequest<'a> {
    rules: &'a RequestRules,
    question_type: i64,
    firm_id: &'a str,
    current_timestamp: String,
    private_key: &'a str,
    validated: bool,
    digital_signature: Option<String>,
}

impl<'a> SignedRequest<'a> {
    /// Create a request stamped with the current time.
    #[must_use]
    pub fn new(
        rules: &'a RequestRules,
        question_type: i64,
        firm_id: &'a str,
        private_key: &'a str,
    ) -> Self {
        Self::with_timestamp(
            rules,
            question_type,
            firm_id,
            private_key,
            current_timestamp_nanos(),
        )
    }

    #[must_use]
    pub fn with_timestamp(
        rules: &'a RequestRules,
        question_type: i64,
        firm_id: &'a str,
        private_key: &'a str,
        timestamp_nanos: i64,
    ) -> Self {
        Self {
            rules,
            question_type,
            firm_id,
            current_timestamp: timestamp_nanos.to_string(),
            private_key,
            validated: false,
            digital_signature: None,
        }
    }

    #[must_use]
    pub fn question_type(&self) -> i64 {
        self.question_type
    }

    #[must_use]
    pub fn firm_id(&self) -> &str {
        self.firm_id
    }

    #[must_use]
    pub fn current_timestamp(&self) -> &str {
        &self.current_timestamp
    }

    #[must_use]
    pub fn digital_signature(&self) -> Option<&str> {
        self.digital_signature.as_deref()
    }

    /// Bytes that get hashed and signed.
    #[must_use]
    pub fn canonical_message(&self) -> Vec<u8> {
        canonical_message(self.question_type, self.firm_id, &self.current_timestamp)
    }
}

impl fmt::Debug for SignedRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedRequest")
            .field("question_type", &self.question_type)
            .field("firm_id", &self.firm_id)
            .field("current_timestamp", &self.current_timestamp)
            .field("private_key", &"<redacted>")
            .field("validated", &self.validated)
            .field("digital_signature", &self.digital_signature)
            .finish()
    }
}

impl RequestPreparer for SignedRequest<'_> {
    fn check_params(&mut self) -> Result<(), Report<QuestionError>> {
        check_params(
            self.rules,
            self.question_type,
            self.firm_id,
            self.private_key,
        )?;
        self.validated = true;
        Ok(())
    }

    fn generate_digital_signature(&mut self) -> Result<(), Report<QuestionError>> {
        if !self.validated {
            return Err(Report::new(QuestionError::Configuration {
                message: "request parameters must be validated before signing".to_string(),
            }));
        }

        let signer = RequestSigner::from_pem(self.private_key, &self.rules.signature_delimiter)?;
        let signature = signer.sign(&self.canonical_message())?;
        self.digital_signature = Some(signature);
        Ok(())
    }

    fn generate_get_url(&self, base_url: &str) -> Result<Url, Report<QuestionError>> {
        let signature = self.digital_signature.as_deref().ok_or_else(|| {
            Report::new(QuestionError::Configuration {
                message: "request must be signed before encoding".to_string(),
            })
        })?;

        let mut url = Url::parse(base_url).change_context(QuestionError::Configuration {
            message: format!("Invalid base URL: {base_url}"),
        })?;

        url.query_pairs_mut()
            .append_pair(QUERY_QUESTION_TYPE, &self.question_type.to_string())
            .append_pair(QUERY_FIRM_ID, self.firm_id)
            .append_pair(QUERY_CURRENT_TIMESTAMP, &self.current_timestamp)
            .append_pair(QUERY_DIGITAL_SIGNATURE, signature);

        Ok(url)
    }
}

/// Query parameters of a signed request as read back from a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedQuery {
    pub question_type: i64,
    pub firm_id: String,
    pub current_timestamp: String,
    pub digital_signature: String,
}

impl SignedQuery {
    /// Read the four signed parameters from `url`'s query string.
    ///
    /// # Errors
    ///
    /// Returns [`QuestionError::MalformedQuery`] if a parameter is missing or
    /// `questionType` is not an integer.
    pub fn from_url(url: &Url) -> Result<Self, Report<QuestionError>> {
        let find = |name: &str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
                .ok_or_else(|| {
                    Report::new(QuestionError::MalformedQuery {
                        message: format!("missing '{name}' parameter"),
                    })
                })
        };

        let question_type = find(QUERY_QUESTION_TYPE)?;
        let question_type = question_type
            .parse::<i64>()
            .change_context(QuestionError::MalformedQuery {
                message: format!("'{QUERY_QUESTION_TYPE}' is not an integer"),
            })?;

        Ok(Self {
            question_type,
            firm_id: find(QUERY_FIRM_ID)?,
            current_timestamp: find(QUERY_CURRENT_TIMESTAMP)?,
            digital_signature: find(QUERY_DIGITAL_SIGNATURE)?,
        })
    }

    #[must_use]
    pub fn canonical_message(&self) -> Vec<u8> {
        canonical_message(self.question_type, &self.firm_id, &self.current_timestamp)
    }

    /// Check the embedded signature against the caller's public key.
    ///
    /// # Errors
    ///
    /// Returns [`QuestionError::MalformedSignature`] if the signature text
    /// cannot be parsed.
    pub fn verify(
        &self,
        verifying_key: &VerifyingKey,
        delimiter: &str,
    ) -> Result<bool, Report<QuestionError>> {
        verify_digital_signature(
            verifying_key,
            &self.canonical_message(),
            &self.digital_signature,
            delimiter,
        )
    }
}
