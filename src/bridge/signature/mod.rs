//! Webhook signature verification.
//!
//! Inbound messages carry `X-Signature: hex(HMAC-SHA-256(secret, body))`.
//! Verification runs over the exact raw body bytes before any parsing, and
//! the digest comparison is constant-time so the check leaks no timing
//! information about the expected value.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Reasons a webhook signature check fails.
///
/// All variants are reported to the sender as an authentication failure;
/// the distinction only matters for local logging.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The signature header was absent.
    #[error("missing signature header")]
    MissingHeader,

    /// The header value was not valid hex.
    #[error("signature header is not valid hex")]
    MalformedHeader,

    /// The digest did not match the body.
    #[error("signature mismatch")]
    Mismatch,
}

/// Verifies webhook payloads against a shared secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Vec<u8>,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret never appears in debug output.
        f.debug_struct("WebhookVerifier").finish_non_exhaustive()
    }
}

impl WebhookVerifier {
    /// Creates a verifier over a shared secret.
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Computes the hex-encoded signature for a payload.
    ///
    /// Exposed so tests and outbound senders can produce valid headers.
    #[must_use]
    pub fn sign(&self, raw_body: &[u8]) -> String {
        hex::encode(self.digest(raw_body))
    }

    /// Verifies a signature header against the raw body bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`SignatureError`] when the header is missing, not hex, or
    /// does not match the body digest.
    pub fn verify(&self, raw_body: &[u8], header: Option<&str>) -> Result<(), SignatureError> {
        let presented = header.ok_or(SignatureError::MissingHeader)?;
        let presented_bytes =
            hex::decode(presented.trim()).map_err(|_| SignatureError::MalformedHeader)?;
        let expected = self.digest(raw_body);

        if presented_bytes.len() != expected.len() {
            return Err(SignatureError::Mismatch);
        }
        if presented_bytes.ct_eq(expected.as_slice()).into() {
            Ok(())
        } else {
            Err(SignatureError::Mismatch)
        }
    }

    fn digest(&self, raw_body: &[u8]) -> Vec<u8> {
        // HMAC accepts keys of any length, so construction cannot fail; the
        // empty fallback keeps the function total without a panic path and
        // can only ever produce a mismatch.
        let Ok(mut mac) = HmacSha256::new_from_slice(&self.secret) else {
            return Vec::new();
        };
        mac.update(raw_body);
        mac.finalize().into_bytes().to_vec()
    }
}
