// Customer identifier validation
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Sentinel identifier of an unregistered reporter.
pub const ANONYMOUS_USER_ID: &str = "anonymous";

lazy_static! {
    static ref CUSTOMER_ID_REGEX: Regex = Regex::new(r"^[cC][0-9]+$").unwrap();
}

/// Classification of a configured customer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerIdKind {
    /// `C`/`c` followed by digits, e.g. `C12345`
    ConfluentCustomer,
    /// The `anonymous` sentinel, any letter case
    AnonymousUser,
    Invalid,
}

impl CustomerIdKind {
    pub fn classify<'a>(id: impl Into<Option<&'a str>>) -> Self {
        let id = id.into();
        if is_confluent_customer(id) {
            Self::ConfluentCustomer
        } else if is_anonymous_user(id) {
            Self::AnonymousUser
        } else {
            Self::Invalid
        }
    }

    pub fn is_valid(self) -> bool {
        self != Self::Invalid
    }
}

/// Returns true for a paying customer's identifier: `C` or `c` followed by digits only.
pub fn is_confluent_customer<'a>(id: impl Into<Option<&'a str>>) -> bool {
    id.into().is_some_and(|id| CUSTOMER_ID_REGEX.is_match(id))
}

/// Returns true when `id` is exactly `anonymous`, ignoring ASCII case.
pub fn is_anonymous_user<'a>(id: impl Into<Option<&'a str>>) -> bool {
    id.into()
        .is_some_and(|id| id.eq_ignore_ascii_case(ANONYMOUS_USER_ID))
}

pub fn is_syntactically_correct_customer_id<'a>(value: impl Into<Option<&'a str>>) -> bool {
    let value = value.into();
    is_confluent_customer(value) || is_anonymous_user(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CUSTOMER_IDS: &[&str] = &[
        "C0", "c1", "C1", "c12", "C22", "c123", "C333", "c1234", "C4444",
        "C00000", "C12345", "C99999", "C123456789", "C123456789012345678901234567890",
        "c00000", "c12345", "c99999", "c123456789", "c123456789012345678901234567890",
    ];

    // Must not contain valid anonymous ids.
    const INVALID_CUSTOMER_IDS: &[Option<&str>] = &[
        Some("0c000"), Some("0000C"), None, Some(""), Some("c"), Some("C"), Some("Hello"),
        Some("World"), Some("1"), Some("12"), Some("123"), Some("1234"), Some("12345"),
    ];

    const VALID_ANONYMOUS_IDS: &[&str] = &["anonymous", "ANONYMOUS", "anonyMOUS"];

    // Must not contain valid customer ids.
    const INVALID_ANONYMOUS_IDS: &[Option<&str>] =
        &[None, Some(""), Some("anon"), Some("anonymou"), Some("ANONYMOU")];

    #[test]
    fn test_valid_customer() {
        for id in VALID_CUSTOMER_IDS {
            assert!(is_confluent_customer(*id), "{id} should be a valid customer id");
        }
    }

    #[test]
    fn test_invalid_customer() {
        let anonymous = VALID_ANONYMOUS_IDS.iter().map(|id| Some(*id));
        for id in INVALID_CUSTOMER_IDS.iter().copied().chain(anonymous) {
            assert!(!is_confluent_customer(id), "{id:?} should not be a customer id");
        }
    }

    #[test]
    fn test_valid_anonymous_user() {
        for id in VALID_ANONYMOUS_IDS {
            assert!(is_anonymous_user(*id), "{id} should be an anonymous user id");
        }
    }

    #[test]
    fn test_invalid_anonymous_user() {
        let customers = VALID_CUSTOMER_IDS.iter().map(|id| Some(*id));
        for id in INVALID_ANONYMOUS_IDS.iter().copied().chain(customers) {
            assert!(!is_anonymous_user(id), "{id:?} should not be an anonymous user id");
        }
    }

    #[test]
    fn test_customer_id_valid_settings() {
        for id in VALID_ANONYMOUS_IDS.iter().chain(VALID_CUSTOMER_IDS) {
            assert!(is_syntactically_correct_customer_id(*id), "{id} should be accepted");
        }
    }

    #[test]
    fn test_customer_id_invalid_settings() {
        for id in INVALID_ANONYMOUS_IDS.iter().chain(INVALID_CUSTOMER_IDS) {
            assert!(!is_syntactically_correct_customer_id(*id), "{id:?} should be rejected");
        }
    }

    #[test]
    fn test_surrounding_whitespace_rejected() {
        assert!(!is_confluent_customer(" C123"));
        assert!(!is_confluent_customer("C123\n"));
        assert!(!is_anonymous_user("anonymous "));
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        assert!(!is_confluent_customer("C١٢٣"));
    }

    #[test]
    fn test_classify() {
        assert_eq!(CustomerIdKind::classify("C12345"), CustomerIdKind::ConfluentCustomer);
        assert_eq!(CustomerIdKind::classify("Anonymous"), CustomerIdKind::AnonymousUser);
        assert_eq!(CustomerIdKind::classify("0000C"), CustomerIdKind::Invalid);
        assert_eq!(CustomerIdKind::classify(None), CustomerIdKind::Invalid);
        assert!(!CustomerIdKind::Invalid.is_valid());
        assert!(CustomerIdKind::AnonymousUser.is_valid());
    }
}
