//! Chat platform port.

pub mod platform;
