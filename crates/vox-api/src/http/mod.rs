//! Inbound Slack webhooks.
//!
//! Every Slack request is signature-checked before its body is parsed.
//! Handlers never wait for an interview; they hand work off and answer
//! `202 Accepted`.

pub mod error;
pub mod handlers;
pub mod router;

#[cfg(test)]
mod test_support;
