//! Proactive Support settings as read from the broker's `server.properties`.
//!
//! Every getter is total: a missing, malformed or out-of-range value falls
//! back to its default and is reported through `tracing`, never to the
//! caller.

use std::fmt;

use serde::Serialize;
use support_logging::{redact_customer_id, PiiRedactor, RedactionConfig};
use tracing::{debug, warn};

use crate::providers::ConfigSource;
use crate::validation::{is_syntactically_correct_customer_id, CustomerIdKind, ANONYMOUS_USER_ID};

pub const CUSTOMER_ID_CONFIG: &str = "confluent.support.customer.id";
pub const CUSTOMER_ID_DEFAULT: &str = ANONYMOUS_USER_ID;

pub const REPORT_INTERVAL_HOURS_CONFIG: &str = "confluent.support.metrics.report.interval.hours";
pub const REPORT_INTERVAL_HOURS_DEFAULT: i64 = 24;
pub const REPORT_INTERVAL_MS_DEFAULT: i64 = REPORT_INTERVAL_HOURS_DEFAULT * MILLIS_PER_HOUR;

pub const TOPIC_CONFIG: &str = "confluent.support.metrics.topic";
pub const TOPIC_DEFAULT: &str = "__confluent.support.metrics";

pub const ENDPOINT_INSECURE_CONFIG: &str = "confluent.support.metrics.endpoint.insecure";
pub const ENDPOINT_SECURE_CONFIG: &str = "confluent.support.metrics.endpoint.secure";

pub const METRICS_ENABLE_CONFIG: &str = "confluent.support.metrics.enable";
pub const METRICS_ENABLE_DEFAULT: bool = true;

pub const PROXY_CONFIG: &str = "confluent.support.proxy";

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Keys whose presence alone switches Proactive Support on.
pub const PROACTIVE_SUPPORT_KEYS: [&str; 3] =
    [TOPIC_CONFIG, ENDPOINT_INSECURE_CONFIG, ENDPOINT_SECURE_CONFIG];

/// Configured customer id, or `anonymous` when unset or malformed.
pub fn get_customer_id<C: ConfigSource + ?Sized>(config: &C) -> String {
    match config.get_property(CUSTOMER_ID_CONFIG) {
        Some(id) if is_syntactically_correct_customer_id(id) => id.to_string(),
        Some(id) => {
            warn!(
                customer_id = %redact_customer_id(id),
                default = CUSTOMER_ID_DEFAULT,
                "Invalid value for {}, falling back to default",
                CUSTOMER_ID_CONFIG
            );
            CUSTOMER_ID_DEFAULT.to_string()
        }
        None => CUSTOMER_ID_DEFAULT.to_string(),
    }
}

/// Report interval in milliseconds.
///
/// The broker configures it in whole hours; anything that is not a positive
/// hour count representable in milliseconds yields 24 hours.
pub fn get_report_interval_ms<C: ConfigSource + ?Sized>(config: &C) -> i64 {
    let Some(raw) = config.get_property(REPORT_INTERVAL_HOURS_CONFIG) else {
        return REPORT_INTERVAL_MS_DEFAULT;
    };

    let millis = raw
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|hours| *hours > 0)
        .and_then(|hours| hours.checked_mul(MILLIS_PER_HOUR));

    millis.unwrap_or_else(|| {
        warn!(
            value = raw,
            default_hours = REPORT_INTERVAL_HOURS_DEFAULT,
            "Invalid value for {}, falling back to default",
            REPORT_INTERVAL_HOURS_CONFIG
        );
        REPORT_INTERVAL_MS_DEFAULT
    })
}

pub fn get_kafka_topic<C: ConfigSource + ?Sized>(config: &C) -> String {
    config
        .get_property(TOPIC_CONFIG)
        .unwrap_or(TOPIC_DEFAULT)
        .to_string()
}

/// Insecure (HTTP) submission endpoint; empty when not configured.
pub fn get_endpoint_http<C: ConfigSource + ?Sized>(config: &C) -> String {
    config
        .get_property(ENDPOINT_INSECURE_CONFIG)
        .unwrap_or_default()
        .to_string()
}

/// Secure (HTTPS) submission endpoint; empty when not configured.
pub fn get_endpoint_https<C: ConfigSource + ?Sized>(config: &C) -> String {
    config
        .get_property(ENDPOINT_SECURE_CONFIG)
        .unwrap_or_default()
        .to_string()
}

/// True as soon as the topic or either endpoint key is present, whatever its value.
pub fn is_proactive_support_enabled<C: ConfigSource + ?Sized>(config: &C) -> bool {
    PROACTIVE_SUPPORT_KEYS
        .iter()
        .any(|key| config.contains_property(key))
}

/// Value of `confluent.support.metrics.enable`, defaulting to `true`.
pub fn get_metrics_enabled<C: ConfigSource + ?Sized>(config: &C) -> bool {
    let Some(raw) = config.get_property(METRICS_ENABLE_CONFIG) else {
        return METRICS_ENABLE_DEFAULT;
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => true,
        "false" => false,
        _ => {
            warn!(
                value = raw,
                default = METRICS_ENABLE_DEFAULT,
                "Invalid value for {}, falling back to default",
                METRICS_ENABLE_CONFIG
            );
            METRICS_ENABLE_DEFAULT
        }
    }
}

/// Proxy used for endpoint submissions, if a non-blank one is configured.
pub fn get_proxy<C: ConfigSource + ?Sized>(config: &C) -> Option<String> {
    config
        .get_property(PROXY_CONFIG)
        .map(str::trim)
        .filter(|proxy| !proxy.is_empty())
        .map(str::to_string)
}

/// Snapshot of every Proactive Support setting derived from one configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportSettings {
    pub customer_id: String,
    pub customer_id_kind: CustomerIdKind,
    pub report_interval_ms: i64,
    pub topic: String,
    pub endpoint_http: String,
    pub endpoint_https: String,
    pub proxy: Option<String>,
    pub metrics_enabled: bool,
    pub proactive_support_enabled: bool,
}

impl SupportSettings {
    pub fn from_config<C: ConfigSource + ?Sized>(config: &C) -> Self {
        let customer_id = get_customer_id(config);
        let settings = Self {
            customer_id_kind: CustomerIdKind::classify(customer_id.as_str()),
            customer_id,
            report_interval_ms: get_report_interval_ms(config),
            topic: get_kafka_topic(config),
            endpoint_http: get_endpoint_http(config),
            endpoint_https: get_endpoint_https(config),
            proxy: get_proxy(config),
            metrics_enabled: get_metrics_enabled(config),
            proactive_support_enabled: is_proactive_support_enabled(config),
        };

        debug!(
            customer_id_kind = ?settings.customer_id_kind,
            report_interval_ms = settings.report_interval_ms,
            topic = %settings.topic,
            enabled = settings.proactive_support_enabled,
            "Derived proactive support settings"
        );

        settings
    }

    /// Copy with customer id and URL credentials masked, for display and export.
    ///
    /// URLs only get the credential passes: host and path segments such as
    /// `c1.example.com` are not customer ids.
    pub fn redacted(&self, redactor: &PiiRedactor) -> Self {
        let url_redactor = PiiRedactor::new(RedactionConfig {
            redact_customer_ids: false,
            ..redactor.config().clone()
        });

        Self {
            customer_id: redactor.redact(&self.customer_id),
            endpoint_http: url_redactor.redact(&self.endpoint_http),
            endpoint_https: url_redactor.redact(&self.endpoint_https),
            proxy: self.proxy.as_deref().map(|proxy| url_redactor.redact(proxy)),
            ..self.clone()
        }
    }
}

impl fmt::Display for SupportSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_unset(value: &str) -> &str {
            if value.is_empty() {
                "<unset>"
            } else {
                value
            }
        }

        let status = if self.proactive_support_enabled {
            "enabled"
        } else {
            "disabled"
        };
        writeln!(f, "Proactive Support: {status}")?;
        writeln!(f, "  customer id:      {}", self.customer_id)?;
        writeln!(f, "  report interval:  {} ms", self.report_interval_ms)?;
        writeln!(f, "  metrics topic:    {}", self.topic)?;
        writeln!(f, "  endpoint (http):  {}", or_unset(&self.endpoint_http))?;
        writeln!(f, "  endpoint (https): {}", or_unset(&self.endpoint_https))?;
        writeln!(f, "  proxy:            {}", self.proxy.as_deref().unwrap_or("<unset>"))?;
        write!(f, "  metrics enabled:  {}", self.metrics_enabled)
    }
}
