//! Structured logging for the Proactive Support add-on.
//!
//! Wraps `tracing-subscriber` setup and provides a redactor that keeps
//! customer identifiers and credentials embedded in URLs out of log lines
//! and operator-facing output.
//!
//! # Example
//!
//! ```rust,no_run
//! use support_logging::{init, redact_customer_id, LoggerConfig};
//!
//! init(&LoggerConfig::default().with_log_level("debug"))?;
//! tracing::info!(customer_id = %redact_customer_id("C12345"), "support metrics enabled");
//! # Ok::<(), support_logging::LoggingError>(())
//! ```

pub mod config;
pub mod error;
pub mod redactor;
pub mod subscriber;

pub use config::*;
pub use error::*;
pub use redactor::*;
pub use subscriber::*;
