//! Slack request signing (HMAC-SHA256 over `v0:{timestamp}:{body}`).
//!
//! Every inbound request carries `X-Slack-Request-Timestamp` and
//! `X-Slack-Signature: v0=<hex>`. Requests older than five minutes are
//! rejected to limit replay.

use std::time::Duration;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
pub const SIGNATURE_HEADER: &str = "x-slack-signature";

const VERSION: &str = "v0";
const MAX_REQUEST_AGE: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("missing header: {0}")]
    MissingHeader(&'static str),

    #[error("invalid request timestamp")]
    InvalidTimestamp,

    #[error("request timestamp outside the allowed window")]
    Stale,

    #[error("signature verification failed")]
    Mismatch,

    #[error("invalid signing key: {0}")]
    InvalidKey(String),
}

/// Verifies inbound requests against the app's signing secret.
pub struct SignatureVerifier {
    secret: SecretString,
    max_age: Duration,
}

impl SignatureVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            max_age: MAX_REQUEST_AGE,
        }
    }

    /// Verify against the current clock.
    pub fn verify(
        &self,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<(), SignatureError> {
        self.verify_at(timestamp, signature, body, chrono::Utc::now().timestamp())
    }

    pub fn verify_at(
        &self,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: &[u8],
        now_secs: i64,
    ) -> Result<(), SignatureError> {
        let timestamp = timestamp.ok_or(SignatureError::MissingHeader(TIMESTAMP_HEADER))?;
        let signature = signature.ok_or(SignatureError::MissingHeader(SIGNATURE_HEADER))?;

        let sent_at: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| SignatureError::InvalidTimestamp)?;
        if now_secs.abs_diff(sent_at) > self.max_age.as_secs() {
            return Err(SignatureError::Stale);
        }

        let hex_sig = signature
            .strip_prefix(VERSION)
            .and_then(|s| s.strip_prefix('='))
            .ok_or(SignatureError::Mismatch)?;
        let expected = hex_decode(hex_sig).map_err(|_| SignatureError::Mismatch)?;

        let mut mac = self.mac()?;
        mac.update(basestring(timestamp, body).as_slice());
        // Constant-time comparison
        mac.verify_slice(&expected)
            .map_err(|_| SignatureError::Mismatch)
    }

    /// Produce the `v0=<hex>` signature for a request.
    pub fn sign(&self, timestamp: &str, body: &[u8]) -> Result<String, SignatureError> {
        let mut mac = self.mac()?;
        mac.update(basestring(timestamp, body).as_slice());
        Ok(format!("{VERSION}={}", hex_encode(&mac.finalize().into_bytes())))
    }

    fn mac(&self) -> Result<HmacSha256, SignatureError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| SignatureError::InvalidKey(e.to_string()))
    }
}

fn basestring(timestamp: &str, body: &[u8]) -> Vec<u8> {
    let mut base = format!("{VERSION}:{timestamp}:").into_bytes();
    base.extend_from_slice(body);
    base
}

fn hex_decode(hex: &str) -> Result<Vec<u8>, ()> {
    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return Err(());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ()))
        .collect()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
