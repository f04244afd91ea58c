//! Blocking HTTP transport for the signed GET request.

use std::time::Duration;

use error_stack::Report;
use ureq::Agent;
use url::Url;

use crate::error::QuestionError;
use crate::settings::Service;

/// Raw HTTP result handed to the response decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Sends one GET request and returns the status and body.
///
/// Non-2xx responses are returned as `Ok`; only failures to complete the
/// exchange (DNS, connect, timeout, reading the body) are errors.
pub trait Transport {
    /// # Errors
    ///
    /// Returns [`QuestionError::Transport`] with no status when the exchange
    /// could not be completed.
    fn get(&self, url: &Url) -> Result<TransportResponse, Report<QuestionError>>;
}

/// [`Transport`] backed by a `ureq` agent.
///
/// Redirects are followed up to the agent's default limit; only the final
/// response reaches the decoder.
pub struct UreqTransport {
    agent: Agent,
    user_agent: String,
}

impl UreqTransport {
    #[must_use]
    pub fn new(service: &Service) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_millis(service.timeout_ms)))
            .build();

        Self {
            agent: Agent::new_with_config(config),
            user_agent: service.user_agent.clone(),
        }
    }
}

fn transport_error(message: String) -> Report<QuestionError> {
    Report::new(QuestionError::Transport {
        status: None,
        message,
    })
}

impl Transport for UreqTransport {
    fn get(&self, url: &Url) -> Result<TransportResponse, Report<QuestionError>> {
        let mut response = self
            .agent
            .get(url.as_str())
            .header("Accept", "application/json")
            .header("User-Agent", &self.user_agent)
            .call()
            .map_err(|e| transport_error(format!("Failed to send request: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| transport_error(format!("Failed to read response: {}", e)))?;

        Ok(TransportResponse { status, body })
    }
}
