//! Generative text service abstractions.

pub mod box_client;
pub mod client;
