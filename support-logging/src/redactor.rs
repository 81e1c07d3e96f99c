use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::{LoggingError, Result};

lazy_static! {
    static ref CUSTOMER_ID_REGEX: Regex = Regex::new(r"\b[cC][0-9]+\b").unwrap();
    static ref URL_CREDENTIALS_REGEX: Regex =
        Regex::new(r"(?P<scheme>\b[A-Za-z][A-Za-z0-9+.-]*://)[^/@\s]+@").unwrap();
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
}

/// Redaction configuration for support log output
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_customer_ids: bool,
    pub redact_url_credentials: bool,
    pub redact_emails: bool,
    /// Replace values by a short hash instead of a partial mask
    pub hash_for_correlation: bool,
    pub custom_patterns: Vec<(Regex, String)>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_customer_ids: true,
            redact_url_credentials: true,
            redact_emails: true,
            hash_for_correlation: false,
            custom_patterns: Vec::new(),
        }
    }
}

impl RedactionConfig {
    /// Adds an organization specific pattern, replaced verbatim by `replacement`.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::InvalidPattern`] when `pattern` is not a valid regex.
    pub fn with_custom_pattern(mut self, pattern: &str, replacement: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| LoggingError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        self.custom_patterns.push((regex, replacement.to_string()));
        Ok(self)
    }
}

/// Redacts customer identifiers and credentials from text before it is logged or printed
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RedactionConfig {
        &self.config
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        // Customer ids go first: hashed output of the later passes may contain `C<digits>` runs.
        if self.config.redact_customer_ids {
            result = self.redact_customer_ids(&result);
        }

        if self.config.redact_url_credentials {
            result = self.redact_url_credentials(&result);
        }

        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        for (pattern, replacement) in &self.config.custom_patterns {
            result = pattern.replace_all(&result, replacement.as_str()).to_string();
        }

        result
    }

    fn redact_customer_ids(&self, text: &str) -> String {
        CUSTOMER_ID_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                let id = &caps[0];
                if self.config.hash_for_correlation {
                    format!("CUSTOMER[{}]", hash_value(id))
                } else {
                    mask_customer_id(id)
                }
            })
            .to_string()
    }

    fn redact_url_credentials(&self, text: &str) -> String {
        URL_CREDENTIALS_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                let scheme = &caps["scheme"];
                if self.config.hash_for_correlation {
                    format!("{scheme}CREDENTIALS[{}]@", hash_value(&caps[0]))
                } else {
                    format!("{scheme}***@")
                }
            })
            .to_string()
    }

    fn redact_emails(&self, text: &str) -> String {
        EMAIL_REGEX
            .replace_all(text, |caps: &regex::Captures| {
                let email = &caps[0];
                if self.config.hash_for_correlation {
                    format!("EMAIL[{}]", hash_value(email))
                } else {
                    match email.split_once('@') {
                        Some((local, domain)) => {
                            format!("{}***@{}***", first_char(local), first_char(domain))
                        }
                        None => "***@***".to_string(),
                    }
                }
            })
            .to_string()
    }
}

/// Redacts a customer identifier with the default configuration.
///
/// `anonymous` and other non-customer values pass through untouched.
pub fn redact_customer_id(id: &str) -> String {
    PiiRedactor::default().redact(id)
}

// Keeps the letter prefix and, for longer ids, the last two digits.
fn mask_customer_id(id: &str) -> String {
    let prefix = first_char(id);
    let digits = id.get(1..).unwrap_or_default();
    if digits.len() > 3 {
        let tail = digits.get(digits.len() - 2..).unwrap_or_default();
        format!("{prefix}***{tail}")
    } else {
        format!("{prefix}***")
    }
}

fn first_char(value: &str) -> &str {
    value
        .char_indices()
        .nth(1)
        .map_or(value, |(end, _)| value.get(..end).unwrap_or(value))
}

fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    general_purpose::STANDARD.encode(&result[..8]) // Use first 8 bytes for shorter hash
}
