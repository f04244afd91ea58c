//! Response envelope decoding.

use error_stack::{Report, ResultExt};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::constants::{REMAIN_TIMES_UNLIMITED, STATUS_SUCCESS};
use crate::error::QuestionError;

/// Outer JSON structure returned by the question service.
#[derive(Debug, Deserialize)]
pub struct ResponseBody {
    /// `0` on success.
    pub status: i64,
    /// Populated when the request was rejected.
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Question payload handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionData {
    pub question: String,
    pub answer: String,
    /// Distractor answer, when the service supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disturb_answer: Option<String>,
    /// Calls left for this key; `-1` means unlimited.
    #[serde(default = "default_remain_times")]
    pub remain_times: i64,
}

fn default_remain_times() -> i64 {
    REMAIN_TIMES_UNLIMITED
}

impl QuestionData {
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        self.remain_times == REMAIN_TIMES_UNLIMITED
    }
}

fn malformed(message: impl Into<String>) -> Report<QuestionError> {
    Report::new(QuestionError::MalformedResponse {
        message: message.into(),
    })
}

/// Turn an HTTP status and body into the question payload.
///
/// # Errors
///
/// - [`QuestionError::Transport`] for a non-2xx status, with the body text
/// - [`QuestionError::MalformedResponse`] if the body is not an envelope or a
///   successful envelope has no usable `data`
/// - [`QuestionError::Application`] if the envelope status is non-zero
pub fn decode_response(status: u16, body: &[u8]) -> Result<QuestionData, Report<QuestionError>> {
    let is_success = StatusCode::from_u16(status)
        .map(|code| code.is_success())
        .unwrap_or(false);
    if !is_success {
        return Err(Report::new(QuestionError::Transport {
            status: Some(status),
            message: format!("HTTP {} - {}", status, String::from_utf8_lossy(body)),
        }));
    }

    let envelope: ResponseBody = serde_json::from_slice(body)
        .change_context(QuestionError::MalformedResponse {
            message: "body is not a JSON response envelope".to_string(),
        })?;

    if envelope.status != STATUS_SUCCESS {
        return Err(Report::new(QuestionError::Application {
            status: envelope.status,
            message: envelope.msg,
        }));
    }

    let data = envelope
        .data
        .filter(|value| !value.is_null())
        .ok_or_else(|| malformed("successful response has no data"))?;

    let mut data: QuestionData =
        serde_json::from_value(data).change_context(QuestionError::MalformedResponse {
            message: "data is missing question or answer".to_string(),
        })?;

    // The service sends an empty string when there is no distractor.
    if data.disturb_answer.as_deref().is_some_and(str::is_empty) {
        data.disturb_answer = None;
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_context<F: Fn(&QuestionError) -> bool>(
        result: Result<QuestionData, Report<QuestionError>>,
        check: F,
    ) {
        let err = result.expect_err("decode should fail");
        assert!(check(err.current_context()), "unexpected error: {err:?}");
    }

    #[test]
    fn test_decode_success() {
        let body = br#"{
            "status": 0,
            "msg": "",
            "data": {
                "question": "What is 2 + 2?",
                "answer": "4",
                "disturbAnswer": "5",
                "remainTimes": 41
            }
        }"#;

        let data = decode_response(200, body).unwrap();
        assert_eq!(data.question, "What is 2 + 2?");
        assert_eq!(data.answer, "4");
        assert_eq!(data.disturb_answer.as_deref(), Some("5"));
        assert_eq!(data.remain_times, 41);
        assert!(!data.is_unlimited());
    }

    #[test]
    fn test_decode_unlimited_and_missing_optionals() {
        let body = br#"{"status":0,"data":{"question":"Q","answer":"A"}}"#;

        let data = decode_response(200, body).unwrap();
        assert_eq!(data.disturb_answer, None);
        assert_eq!(data.remain_times, -1);
        assert!(data.is_unlimited());
    }

    #[test]
    fn test_decode_empty_disturb_answer_is_none() {
        let body = br#"{"status":0,"data":{"question":"Q","answer":"A","disturbAnswer":"","remainTimes":-1}}"#;

        let data = decode_response(200, body).unwrap();
        assert_eq!(data.disturb_answer, None);
    }

    #[test]
    fn test_decode_application_error() {
        let body = br#"{"status":1,"msg":"bad firm","data":null}"#;

        let err = decode_response(200, body).unwrap_err();
        match err.current_context() {
            QuestionError::Application { status, message } => {
                assert_eq!(*status, 1);
                assert_eq!(message, "bad firm");
            }
            other => panic!("Expected Application error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_application_error_ignores_data_shape() {
        let body = br#"{"status":3,"msg":"quota exhausted","data":""}"#;

        assert_context(decode_response(200, body), |e| {
            matches!(e, QuestionError::Application { status: 3, .. })
        });
    }

    #[test]
    fn test_decode_http_500_is_transport_error() {
        let body = br#"{"status":0,"data":{"question":"Q","answer":"A"}}"#;

        let err = decode_response(500, body).unwrap_err();
        match err.current_context() {
            QuestionError::Transport { status, message } => {
                assert_eq!(*status, Some(500));
                assert!(message.contains("\"question\""));
            }
            other => panic!("Expected Transport error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_redirect_is_transport_error() {
        assert_context(decode_response(302, b""), |e| {
            matches!(e, QuestionError::Transport { status: Some(302), .. })
        });
    }

    #[test]
    fn test_decode_invalid_status_code() {
        assert_context(decode_response(42, b"{}"), |e| {
            matches!(e, QuestionError::Transport { .. })
        });
    }

    #[test]
    fn test_decode_non_json_body() {
        assert_context(decode_response(200, b"<html>gateway</html>"), |e| {
            matches!(e, QuestionError::MalformedResponse { .. })
        });
    }

    #[test]
    fn test_decode_missing_status() {
        assert_context(decode_response(200, br#"{"msg":"","data":{}}"#), |e| {
            matches!(e, QuestionError::MalformedResponse { .. })
        });
    }

    #[test]
    fn test_decode_success_without_data() {
        assert_context(decode_response(200, br#"{"status":0,"msg":""}"#), |e| {
            matches!(e, QuestionError::MalformedResponse { .. })
        });
        assert_context(decode_response(201, br#"{"status":0,"data":null}"#), |e| {
            matches!(e, QuestionError::MalformedResponse { .. })
        });
    }

    #[test]
    fn test_decode_success_missing_answer() {
        assert_context(
            decode_response(200, br#"{"status":0,"data":{"question":"Q"}}"#),
            |e| matches!(e, QuestionError::MalformedResponse { .. }),
        );
    }
}
