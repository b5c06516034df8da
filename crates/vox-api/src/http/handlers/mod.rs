//! Request handlers.

pub mod commands;
pub mod events;
pub mod health;

use axum::http::HeaderMap;

use vox_infra::slack::signature::{SIGNATURE_HEADER, SignatureVerifier, TIMESTAMP_HEADER};

use crate::http::error::AppError;

/// Check the Slack signature headers against the raw body.
pub(crate) fn verify_request(
    verifier: &SignatureVerifier,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), AppError> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    verifier.verify(header(TIMESTAMP_HEADER), header(SIGNATURE_HEADER), body)?;
    Ok(())
}
