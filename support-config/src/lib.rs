//! Proactive Support configuration for the broker metrics add-on.
//!
//! Reads broker properties and answers the questions the reporting add-on
//! asks of them:
//! - Is the configured customer id a paying customer, `anonymous`, or junk?
//! - How often should metrics be reported, to which topic and endpoints?
//! - Is Proactive Support switched on at all?
//!
//! All lookups go through the [`ConfigSource`] trait, so the same getters
//! work on a loaded `server.properties` ([`Properties`]), a plain
//! `HashMap`, or no configuration at all (`None`). Getters never fail:
//! malformed values are logged and replaced by their defaults.
//!
//! # Example
//!
//! ```rust,no_run
//! use support_config::{Properties, SupportSettings};
//!
//! let config = Properties::from_args(&["config/server.properties", "--override", "broker.id=2"])?;
//! let settings = SupportSettings::from_config(&config);
//! if settings.proactive_support_enabled {
//!     println!("reporting to {} every {} ms", settings.topic, settings.report_interval_ms);
//! }
//! # Ok::<(), support_config::PropertiesError>(())
//! ```

pub mod error;
pub mod properties;
pub mod providers;
pub mod settings;
pub mod validation;

pub use error::*;
pub use properties::*;
pub use providers::*;
pub use settings::*;
pub use validation::*;
