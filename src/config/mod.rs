//! Configuration module.
//!
//! Exposes operational constants and the client configuration type.

mod constants;
mod types;

pub use constants::*;
pub use types::ClientConfig;
