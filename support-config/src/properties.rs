//! Broker `server.properties` loading.
//!
//! Understands the subset of the `.properties` format brokers ship with:
//! `#`/`!` comments, `=`, `:` or whitespace separators, backslash line
//! continuations and `\t \n \r \f \\ \uXXXX` escapes. Command-line
//! `--override key=value` pairs are layered on top of the file.

use std::collections::btree_map::{self, BTreeMap};
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{PropertiesError, Result};
use crate::providers::ConfigSource;

const OVERRIDE_FLAG: &str = "--override";

/// Ordered set of broker properties
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `.properties` text.
    ///
    /// # Errors
    ///
    /// Returns [`PropertiesError::InvalidUnicodeEscape`] for a truncated or
    /// non-hex `\u` escape, or a UTF-16 surrogate escape without its pair.
    pub fn parse(text: &str) -> Result<Self> {
        let mut properties = Self::new();
        let mut lines = text.lines().enumerate();

        while let Some((index, line)) = lines.next() {
            let line_number = index + 1;
            let trimmed = line.trim_start_matches(is_separator_whitespace);
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let mut logical = trimmed.to_string();
            while ends_with_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some((_, next)) => {
                        logical.push_str(next.trim_start_matches(is_separator_whitespace));
                    }
                    None => break,
                }
            }

            let (key, value) = split_key_value(&logical);
            let key = unescape(key, line_number)?;
            let value = unescape(value, line_number)?;
            properties.set(key, value.trim_end_matches(is_separator_whitespace));
        }

        Ok(properties)
    }

    /// Reads and parses a properties file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or contains a malformed escape.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PropertiesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let properties = Self::parse(&text)?;
        debug!(path = %path.display(), count = properties.len(), "Loaded properties file");
        Ok(properties)
    }

    /// Loads broker properties from launcher arguments.
    ///
    /// The first argument names the properties file; it may be followed by
    /// any number of `--override key=value` pairs, applied in order.
    ///
    /// # Errors
    ///
    /// Fails on an empty argument list, an unreadable file, or an argument
    /// that is not a well-formed override.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let Some((path, rest)) = args.split_first() else {
            return Err(PropertiesError::MissingConfigPath);
        };

        let path: &str = path.as_ref();
        let mut properties = Self::load(path)?;
        let overrides = parse_overrides(rest)?;
        if !overrides.is_empty() {
            info!(count = overrides.len(), "Applying command line overrides");
        }
        properties.extend(overrides);
        Ok(properties)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Sets `key`, returning the value it replaces.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl ConfigSource for Properties {
    fn get_property(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Properties {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut properties = Self::new();
        properties.extend(iter);
        properties
    }
}

impl IntoIterator for Properties {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Parses `--override key=value` pairs.
///
/// # Errors
///
/// Returns [`PropertiesError::InvalidOverride`] for a stray argument, a flag
/// without a value, or a value without `=` or with an empty key.
pub fn parse_overrides<S: AsRef<str>>(args: &[S]) -> Result<Vec<(String, String)>> {
    let mut overrides = Vec::new();
    let mut args = args.iter().map(AsRef::<str>::as_ref);

    while let Some(arg) = args.next() {
        if arg != OVERRIDE_FLAG {
            return Err(PropertiesError::InvalidOverride(arg.to_string()));
        }
        let pair = args
            .next()
            .ok_or_else(|| PropertiesError::InvalidOverride(OVERRIDE_FLAG.to_string()))?;
        overrides.push(parse_override(pair)?);
    }

    Ok(overrides)
}

/// Splits one `key=value` override; the value may itself contain `=`.
///
/// # Errors
///
/// Returns [`PropertiesError::InvalidOverride`] without `=` or with an empty key.
pub fn parse_override(pair: &str) -> Result<(String, String)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(PropertiesError::InvalidOverride(pair.to_string())),
    }
}

fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
    trailing % 2 == 1
}

// Key ends at the first unescaped `=`, `:` or whitespace. Returns the raw
// (still escaped) key and value slices.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_separator_whitespace(c) {
            key_end = index;
            break;
        }
    }

    let (key, rest) = line.split_at(key_end);
    let rest = rest.trim_start_matches(is_separator_whitespace);
    let rest = rest
        .strip_prefix('=')
        .or_else(|| rest.strip_prefix(':'))
        .unwrap_or(rest);
    (key, rest.trim_start_matches(is_separator_whitespace))
}

fn unescape(raw: &str, line: usize) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let unit = read_utf16_unit(&mut chars, line)?;
                let decoded = if (0xD800..0xDC00).contains(&unit) {
                    // High surrogate: the low half must follow as another `\uXXXX`.
                    let low = match (chars.next(), chars.next()) {
                        (Some('\\'), Some('u')) => read_utf16_unit(&mut chars, line)?,
                        _ => return Err(PropertiesError::InvalidUnicodeEscape { line }),
                    };
                    char::decode_utf16([unit, low]).next().and_then(|c| c.ok())
                } else {
                    char::from_u32(u32::from(unit))
                };
                out.push(decoded.ok_or(PropertiesError::InvalidUnicodeEscape { line })?);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

// Reads the four hex digits of a `\u` escape.
fn read_utf16_unit(chars: &mut std::str::Chars<'_>, line: usize) -> Result<u16> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(PropertiesError::InvalidUnicodeEscape { line });
    }
    u16::from_str_radix(&hex, 16).map_err(|_| PropertiesError::InvalidUnicodeEscape { line })
}

// Only space, tab and form feed separate tokens; other Unicode spaces are key characters.
fn is_separator_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000C}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators() {
        let properties = Properties::parse("a=1\nb: 2\nc 3\nd = 4\ne\t:\t5\n").unwrap();

        assert_eq!(properties.get("a"), Some("1"));
        assert_eq!(properties.get("b"), Some("2"));
        assert_eq!(properties.get("c"), Some("3"));
        assert_eq!(properties.get("d"), Some("4"));
        assert_eq!(properties.get("e"), Some("5"));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let text = "# broker\n\n   ! legacy comment\n#confluent.support.customer.id=C1\nbroker.id=1\n";
        let properties = Properties::parse(text).unwrap();

        assert_eq!(properties.len(), 1);
        assert_eq!(properties.get("broker.id"), Some("1"));
        assert!(!properties.contains_key("#confluent.support.customer.id"));
    }

    #[test]
    fn test_value_keeps_separators_after_the_first() {
        let properties =
            Properties::parse("listeners=PLAINTEXT://:9092\nurl = http://example.com:80/a=b").unwrap();

        assert_eq!(properties.get("listeners"), Some("PLAINTEXT://:9092"));
        assert_eq!(properties.get("url"), Some("http://example.com:80/a=b"));
    }

    #[test]
    fn test_key_without_value() {
        let properties = Properties::parse("confluent.support.metrics.topic\n").unwrap();
        assert_eq!(properties.get("confluent.support.metrics.topic"), Some(""));
    }

    #[test]
    fn test_line_continuation() {
        let text = "log.dirs=/tmp/a,\\\n    /tmp/b\nnext=1";
        let properties = Properties::parse(text).unwrap();

        assert_eq!(properties.get("log.dirs"), Some("/tmp/a,/tmp/b"));
        assert_eq!(properties.get("next"), Some("1"));
    }

    #[test]
    fn test_escaped_backslash_is_not_continuation() {
        let properties = Properties::parse("path=C:\\\\\nnext=1").unwrap();

        assert_eq!(properties.get("path"), Some("C:\\"));
        assert_eq!(properties.get("next"), Some("1"));
    }

    #[test]
    fn test_escapes() {
        let properties = Properties::parse("key\\=with\\:seps=tab\\there\\u0041").unwrap();
        assert_eq!(properties.get("key=with:seps"), Some("tab\there\u{41}"));
    }

    #[test]
    fn test_invalid_unicode_escape() {
        let err = Properties::parse("ok=1\nbad=\\u00G1").unwrap_err();
        assert!(matches!(err, PropertiesError::InvalidUnicodeEscape { line: 2 }));

        let err = Properties::parse("short=\\u12").unwrap_err();
        assert!(matches!(err, PropertiesError::InvalidUnicodeEscape { line: 1 }));
    }

    #[test]
    fn test_surrogate_pair_escape() {
        let properties = Properties::parse("greeting=\\uD83D\\uDE00 hi").unwrap();
        assert_eq!(properties.get("greeting"), Some("\u{1F600} hi"));
    }

    #[test]
    fn test_unpaired_surrogate_rejected() {
        for text in ["k=\\uD83D", "k=\\uD83Dx", "k=\\uD83D\\u0041", "k=\\uDE00"] {
            let err = Properties::parse(text).unwrap_err();
            assert!(
                matches!(err, PropertiesError::InvalidUnicodeEscape { line: 1 }),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_signed_hex_escape_rejected() {
        let err = Properties::parse("k=\\u+041").unwrap_err();
        assert!(matches!(err, PropertiesError::InvalidUnicodeEscape { line: 1 }));
    }

    #[test]
    fn test_non_breaking_space_is_part_of_key() {
        let properties = Properties::parse("odd\u{00A0}key=1\n\u{000C}ff=2").unwrap();
        assert_eq!(properties.get("odd\u{00A0}key"), Some("1"));
        assert_eq!(properties.get("ff"), Some("2"));
    }

    #[test]
    fn test_trailing_whitespace_trimmed_and_last_wins() {
        let properties = Properties::parse("topic=first\ntopic=second   \n").unwrap();
        assert_eq!(properties.get("topic"), Some("second"));
    }

    #[test]
    fn test_overrides() {
        let overrides =
            parse_overrides(&["--override", "broker.id=2", "--override", "a=b=c"]).unwrap();
        assert_eq!(
            overrides,
            vec![
                ("broker.id".to_string(), "2".to_string()),
                ("a".to_string(), "b=c".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_overrides() {
        assert!(matches!(
            parse_overrides(&["--override"]),
            Err(PropertiesError::InvalidOverride(_))
        ));
        assert!(matches!(
            parse_overrides(&["--override", "no-equals"]),
            Err(PropertiesError::InvalidOverride(_))
        ));
        assert!(matches!(
            parse_overrides(&["--override", "=value"]),
            Err(PropertiesError::InvalidOverride(_))
        ));
        assert!(matches!(
            parse_overrides(&["broker.id=2"]),
            Err(PropertiesError::InvalidOverride(_))
        ));
    }

    #[test]
    fn test_from_args_requires_path() {
        let args: [&str; 0] = [];
        assert!(matches!(
            Properties::from_args(&args),
            Err(PropertiesError::MissingConfigPath)
        ));
    }

    #[test]
    fn test_collect_and_iterate_in_key_order() {
        let properties: Properties = [("b", "2"), ("a", "1")].into_iter().collect();
        let keys: Vec<&str> = properties.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
