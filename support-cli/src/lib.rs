//! Operator tooling for the Proactive Support add-on.
//!
//! The `support-settings` binary loads a broker `server.properties`,
//! applies `--override key=value` pairs and prints the support settings
//! the add-on would run with.

pub mod cli;

pub use cli::*;
