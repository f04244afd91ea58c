//! Request signing and verification utilities.
//!
//! Signatures are ECDSA/P-256 over the SHA-256 digest of the canonical
//! message. The wire form is `r` and `s` as decimal integers joined by the
//! configured delimiter, e.g. `1234...@==@5678...`.

use error_stack::{Report, ResultExt};
use p256::ecdsa::signature::hazmat::{PrehashVerifier, RandomizedPrehashSigner};
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::DecodePrivateKey;
use p256::{FieldBytes, SecretKey};
use primitive_types::U256;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::error::QuestionError;

use super::pem::{decode_pem, PemBlock};

/// Digest of `message` as signed on the wire.
#[must_use]
pub fn message_digest(message: &[u8]) -> [u8; 32] {
    Sha256::digest(message).into()
}

fn parse_ec_private_key(block: &PemBlock) -> Result<SecretKey, Report<QuestionError>> {
    // SEC1 is what `openssl ecparam -genkey` writes; PKCS#8 covers `openssl genpkey`.
    SecretKey::from_sec1_der(&block.der)
        .or_else(|_| SecretKey::from_pkcs8_der(&block.der))
        .map_err(|_| {
            Report::new(QuestionError::KeyParse {
                message: format!(
                    "'{}' block is not a SEC1 or PKCS#8 P-256 private key",
                    block.label
                ),
            })
        })
}

/// Signs canonical request messages with a P-256 private key.
pub struct RequestSigner {
    key: SigningKey,
    delimiter: String,
}

impl RequestSigner {
    /// Build a signer from PEM key text.
    ///
    /// # Errors
    ///
    /// Returns [`QuestionError::KeyDecode`] when the PEM armor or base64 body is
    /// broken, and [`QuestionError::KeyParse`] when the decoded bytes are not a
    /// P-256 private key.
    pub fn from_pem(pem: &str, delimiter: &str) -> Result<Self, Report<QuestionError>> {
        let block = decode_pem(pem)?;
        let secret_key = parse_ec_private_key(&block)?;

        Ok(Self {
            key: SigningKey::from(secret_key),
            delimiter: delimiter.to_string(),
        })
    }

    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        *self.key.verifying_key()
    }

    /// Sign `message` and return the `r<delimiter>s` decimal text.
    ///
    /// # Errors
    ///
    /// Returns [`QuestionError::Signing`] if the ECDSA operation fails.
    pub fn sign(&self, message: &[u8]) -> Result<String, Report<QuestionError>> {
        let digest = message_digest(message);
        log::debug!("Signing canonical digest sha256:{}", hex::encode(digest));

        let signature: Signature = self
            .key
            .sign_prehash_with_rng(&mut OsRng, &digest)
            .change_context(QuestionError::Signing {
                message: "ECDSA signing failed".to_string(),
            })?;

        Ok(encode_signature(&signature, &self.delimiter))
    }
}

/// Render `r` and `s` as decimal text joined by `delimiter`.
#[must_use]
pub fn encode_signature(signature: &Signature, delimiter: &str) -> String {
    let (r, s) = signature.split_bytes();
    format!(
        "{}{}{}",
        U256::from_big_endian(&r),
        delimiter,
        U256::from_big_endian(&s)
    )
}

fn parse_scalar(text: &str, name: &str) -> Result<FieldBytes, Report<QuestionError>> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Report::new(QuestionError::MalformedSignature {
            message: format!("'{name}' is not a decimal integer"),
        }));
    }

    let value = U256::from_dec_str(text).map_err(|_| {
        Report::new(QuestionError::MalformedSignature {
            message: format!("'{name}' does not fit in 256 bits"),
        })
    })?;

    let mut bytes = [0u8; 32];
    value.to_big_endian(&mut bytes);
    Ok(FieldBytes::from(bytes))
}

/// Parse `r<delimiter>s` decimal text back into a signature.
///
/// # Errors
///
/// Returns [`QuestionError::MalformedSignature`] if the delimiter is missing,
/// either component is not a decimal integer, or the scalars are out of range.
pub fn decode_signature(text: &str, delimiter: &str) -> Result<Signature, Report<QuestionError>> {
    let (r_text, s_text) = text.split_once(delimiter).ok_or_else(|| {
        Report::new(QuestionError::MalformedSignature {
            message: format!("missing '{delimiter}' delimiter"),
        })
    })?;

    let r = parse_scalar(r_text, "r")?;
    let s = parse_scalar(s_text, "s")?;

    Signature::from_scalars(r, s).map_err(|_| {
        Report::new(QuestionError::MalformedSignature {
            message: "r or s is outside the curve order".to_string(),
        })
    })
}

/// Verify a wire signature against `message` with the caller's public key.
///
/// Returns `Ok(false)` for a well-formed signature that does not match.
///
/// # Errors
///
/// Returns [`QuestionError::MalformedSignature`] if `signature` cannot be parsed.
pub fn verify_digital_signature(
    verifying_key: &VerifyingKey,
    message: &[u8],
    signature: &str,
    delimiter: &str,
) -> Result<bool, Report<QuestionError>> {
    let signature = decode_signature(signature, delimiter)?;
    let digest = message_digest(message);

    Ok(verifying_key.verify_prehash(&digest, &signature).is_ok())
}
