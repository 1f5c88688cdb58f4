//! Pharmafind Core - Shared infrastructure for the literature pipeline
//!
//! Blocking HTTP over a shared async client, logging setup, and
//! TTY-aware progress reporting.

pub mod http;
pub mod logging;
pub mod progress;

// Re-exports for convenience
pub use http::{RequestError, SHARED_RUNTIME, get_text, http_client};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, fmt_num};
