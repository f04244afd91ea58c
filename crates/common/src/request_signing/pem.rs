//! PEM armor decoding.
//!
//! Decoding is strict RFC 7468 via the `pem-rfc7468` decoder re-exported by
//! `p256`. Leading whitespace before the header is tolerated.

use error_stack::Report;
use p256::elliptic_curve::zeroize::Zeroizing;
use p256::pkcs8::der::pem;

use crate::error::QuestionError;

/// Decoded PEM block.
pub struct PemBlock {
    pub label: String,
    pub der: Zeroizing<Vec<u8>>,
}

/// Strip the PEM armor from `text` and base64-decode the body.
///
/// # Errors
///
/// Returns [`QuestionError::KeyDecode`] if the encapsulation boundaries are
/// missing or mismatched, or the body is not valid base64. Error messages
/// never include the body.
pub fn decode_pem(text: &str) -> Result<PemBlock, Report<QuestionError>> {
    let (label, der) = pem::decode_vec(text.trim_start().as_bytes()).map_err(|e| {
        Report::new(QuestionError::KeyDecode {
            message: format!("invalid PEM encoding: {e}"),
        })
    })?;

    Ok(PemBlock {
        label: label.to_string(),
        der: Zeroizing::new(der),
    })
}
