//! Utilities Module - shared infrastructure
//!
//! - `constants`: Centralized timeouts, defaults and export names

pub mod constants;

pub use constants::{CONNECT_TIMEOUT, INFER_TIMEOUT, SMTP_TIMEOUT};
