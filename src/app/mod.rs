//! Main application modules.
//!
//! This module provides URL resolution and shutdown handling used by the relay
//! and the binary.

pub mod shutdown;
pub mod url;

// Re-export public API
pub use shutdown::{cancel_on_signal, shutdown_gracefully};
pub use url::resolve_url;
