//! Error handling.
//!
//! This module provides:
//! - The relay failure kinds (`RelayError`, `ErrorKind`)
//! - Initialization errors
//! - Categorization of transport errors into readable network failure messages

mod categorization;
mod types;

// Re-export public API
pub use categorization::{categorize_reqwest_error, network_error};
pub use types::{ErrorKind, InitializationError, NetworkErrorType, RelayError};
