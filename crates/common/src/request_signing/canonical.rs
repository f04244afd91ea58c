//! Canonical message assembly.
//!
//! The service recomputes this exact byte string to verify the signature, so
//! field order and formatting are part of the wire contract.

/// Concatenate question type, firm ID and timestamp with no separators.
#[must_use]
pub fn canonical_message(question_type: i64, firm_id: &str, current_timestamp: &str) -> Vec<u8> {
    format!("{question_type}{firm_id}{current_timestamp}").into_bytes()
}
