//! Options normalizer: turns a step's key/value table into typed options.
//!
//! ```gherkin
//! When I find element by role "button"
//!   | timeout          | 4000    |
//!   | pseudoSelector   | hidden  |
//!   | withinSubject    | null    |
//! ```
//!
//! Every cell value is parsed as a JSON literal first (`4000` → number,
//! `true` → boolean, `null` → null). Values that are not valid JSON are kept
//! verbatim as strings, so `visible` stays the string `"visible"`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::result::{BuscarError, BuscarResult};
use crate::selector::PseudoSelector;

/// Option key: per-operation timeout in milliseconds
pub const TIMEOUT: &str = "timeout";
/// Option key: visibility pseudo-selector override
pub const PSEUDO_SELECTOR: &str = "pseudoSelector";
/// Option key: scope override (current subject vs page root)
pub const WITHIN_SUBJECT: &str = "withinSubject";
/// Option key: pierce shadow roots
pub const INCLUDE_SHADOW_DOM: &str = "includeShadowDom";
/// Option key: bypass actionability checks on actions
pub const FORCE: &str = "force";
/// Option key: informational logging, no effect on resolution
pub const LOG: &str = "log";

/// A single typed option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// JSON `null`
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON number
    Number(f64),
    /// JSON string, or any raw cell that failed to parse
    String(String),
    /// Arrays and objects
    Json(serde_json::Value),
}

impl OptionValue {
    /// Parse a raw table cell, falling back to the raw string
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Null) => Self::Null,
            Ok(serde_json::Value::Bool(b)) => Self::Bool(b),
            Ok(serde_json::Value::Number(n)) => n
                .as_f64()
                .map_or_else(|| Self::String(raw.to_string()), Self::Number),
            Ok(serde_json::Value::String(s)) => Self::String(s),
            Ok(other) => Self::Json(other),
            Err(_) => Self::String(raw.to_string()),
        }
    }

    /// Borrow as a string, if this is a string value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a number, if this is a numeric value
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Interpret as a flag: booleans as-is, the string `"true"` as true
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(s) => Some(s == "true"),
            _ => None,
        }
    }
}

/// Typed options built from a step table.
///
/// Keys are case-sensitive. Unknown keys are kept so that pass-through
/// collaborators can still read them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionSet {
    values: BTreeMap<String, OptionValue>,
}

impl OptionSet {
    /// Create an empty option set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from table rows.
    ///
    /// Returns `Ok(None)` when no table was given. Each row must hold exactly
    /// a key and a value; the last occurrence of a duplicate key wins.
    pub fn from_table(rows: Option<&[Vec<String>]>) -> BuscarResult<Option<Self>> {
        let Some(rows) = rows else {
            return Ok(None);
        };

        let mut options = Self::new();
        for (index, row) in rows.iter().enumerate() {
            let [key, value] = row.as_slice() else {
                return Err(BuscarError::invalid_options(format!(
                    "row {} has {} cells, expected a key and a value",
                    index + 1,
                    row.len()
                )));
            };
            options.insert(key.trim(), OptionValue::parse(value.trim()));
        }
        Ok(Some(options))
    }

    /// Insert or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) {
        self.values.insert(key.into(), value);
    }

    /// Set a value (builder form)
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: OptionValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a value only if the key is absent, so explicit options win
    #[must_use]
    pub fn with_default(mut self, key: impl Into<String>, value: OptionValue) -> Self {
        self.values.entry(key.into()).or_insert(value);
        self
    }

    /// Look up a raw value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    /// Whether a key is present
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of options
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no options
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over key/value pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `timeout` in milliseconds. Negative or non-numeric values are ignored.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        let ms = self.get(TIMEOUT)?.as_f64()?;
        (ms.is_finite() && ms >= 0.0).then(|| Duration::from_millis(ms as u64))
    }

    /// `pseudoSelector` override
    #[must_use]
    pub fn pseudo_selector(&self) -> Option<PseudoSelector> {
        self.get(PSEUDO_SELECTOR)?.as_str().and_then(PseudoSelector::parse)
    }

    /// `withinSubject`: `null`/`false` mean the page root, anything else the
    /// current subject. `None` when the key is absent.
    #[must_use]
    pub fn within_subject(&self) -> Option<bool> {
        self.get(WITHIN_SUBJECT).map(|value| match value {
            OptionValue::Null | OptionValue::Bool(false) => false,
            _ => true,
        })
    }

    /// `includeShadowDom`
    #[must_use]
    pub fn include_shadow_dom(&self) -> Option<bool> {
        self.get(INCLUDE_SHADOW_DOM)?.as_flag()
    }

    /// `force`
    #[must_use]
    pub fn force(&self) -> bool {
        self.get(FORCE).and_then(OptionValue::as_flag).unwrap_or(false)
    }

    /// `log`
    #[must_use]
    pub fn log(&self) -> bool {
        self.get(LOG).and_then(OptionValue::as_flag).unwrap_or(false)
    }
}

impl FromIterator<(String, OptionValue)> for OptionSet {
    fn from_iter<I: IntoIterator<Item = (String, OptionValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, &str)]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|(k, v)| vec![(*k).to_string(), (*v).to_string()])
            .collect()
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_number() {
            assert_eq!(OptionValue::parse("4000"), OptionValue::Number(4000.0));
        }

        #[test]
        fn test_parse_bool() {
            assert_eq!(OptionValue::parse("true"), OptionValue::Bool(true));
            assert_eq!(OptionValue::parse("false"), OptionValue::Bool(false));
        }

        #[test]
        fn test_parse_null() {
            assert_eq!(OptionValue::parse("null"), OptionValue::Null);
        }

        #[test]
        fn test_parse_quoted_string() {
            assert_eq!(
                OptionValue::parse("\"Loading\""),
                OptionValue::String("Loading".to_string())
            );
        }

        #[test]
        fn test_parse_falls_back_to_raw() {
            assert_eq!(
                OptionValue::parse("visible"),
                OptionValue::String("visible".to_string())
            );
            assert_eq!(
                OptionValue::parse("{not json"),
                OptionValue::String("{not json".to_string())
            );
        }

        #[test]
        fn test_parse_structured() {
            let value = OptionValue::parse("[1, 2]");
            assert!(matches!(value, OptionValue::Json(serde_json::Value::Array(_))));
        }
    }

    mod table_tests {
        use super::*;

        #[test]
        fn test_no_table_is_none() {
            assert_eq!(OptionSet::from_table(None).unwrap(), None);
        }

        #[test]
        fn test_table_rows_become_typed_options() {
            let rows = table(&[
                ("log", "true"),
                ("timeout", "4000"),
                ("withinSubject", "null"),
                ("includeShadowDom", "false"),
                ("pseudoSelector", "visible"),
            ]);
            let options = OptionSet::from_table(Some(&rows)).unwrap().unwrap();
            assert_eq!(options.len(), 5);
            assert!(options.log());
            assert_eq!(options.timeout(), Some(Duration::from_millis(4000)));
            assert_eq!(options.within_subject(), Some(false));
            assert_eq!(options.include_shadow_dom(), Some(false));
            assert_eq!(options.pseudo_selector(), Some(PseudoSelector::Visible));
        }

        #[test]
        fn test_last_duplicate_wins() {
            let rows = table(&[("timeout", "1000"), ("timeout", "2000")]);
            let options = OptionSet::from_table(Some(&rows)).unwrap().unwrap();
            assert_eq!(options.len(), 1);
            assert_eq!(options.timeout(), Some(Duration::from_millis(2000)));
        }

        #[test]
        fn test_order_is_irrelevant() {
            let a = table(&[("timeout", "1"), ("log", "true")]);
            let b = table(&[("log", "true"), ("timeout", "1")]);
            assert_eq!(
                OptionSet::from_table(Some(&a)).unwrap(),
                OptionSet::from_table(Some(&b)).unwrap()
            );
        }

        #[test]
        fn test_cells_are_trimmed() {
            let rows = table(&[(" timeout ", " 250 ")]);
            let options = OptionSet::from_table(Some(&rows)).unwrap().unwrap();
            assert_eq!(options.timeout(), Some(Duration::from_millis(250)));
        }

        #[test]
        fn test_wrong_row_width_is_rejected() {
            let rows = vec![vec!["timeout".to_string()]];
            let err = OptionSet::from_table(Some(&rows)).unwrap_err();
            assert!(matches!(err, BuscarError::InvalidOptions { .. }));
        }

        #[test]
        fn test_empty_table_is_empty_options() {
            let rows: Vec<Vec<String>> = Vec::new();
            let options = OptionSet::from_table(Some(&rows)).unwrap().unwrap();
            assert!(options.is_empty());
        }
    }

    mod accessor_tests {
        use super::*;

        #[test]
        fn test_force_accepts_string_true() {
            let options = OptionSet::new().with(FORCE, OptionValue::String("true".into()));
            assert!(options.force());
            assert!(!OptionSet::new().force());
        }

        #[test]
        fn test_negative_timeout_ignored() {
            let options = OptionSet::new().with(TIMEOUT, OptionValue::Number(-5.0));
            assert_eq!(options.timeout(), None);
        }

        #[test]
        fn test_within_subject_truthy_values() {
            let yes = OptionSet::new().with(WITHIN_SUBJECT, OptionValue::Bool(true));
            assert_eq!(yes.within_subject(), Some(true));
            let raw = OptionSet::new().with(WITHIN_SUBJECT, OptionValue::String("form".into()));
            assert_eq!(raw.within_subject(), Some(true));
            assert_eq!(OptionSet::new().within_subject(), None);
        }

        #[test]
        fn test_with_default_keeps_explicit_value() {
            let options = OptionSet::new()
                .with(PSEUDO_SELECTOR, OptionValue::String("hidden".into()))
                .with_default(PSEUDO_SELECTOR, OptionValue::String("visible".into()));
            assert_eq!(options.pseudo_selector(), Some(PseudoSelector::Hidden));

            let defaulted =
                OptionSet::new().with_default(PSEUDO_SELECTOR, OptionValue::String("visible".into()));
            assert_eq!(defaulted.pseudo_selector(), Some(PseudoSelector::Visible));
        }

        #[test]
        fn test_unknown_pseudo_selector_ignored() {
            let options = OptionSet::new().with(PSEUDO_SELECTOR, OptionValue::String("blurry".into()));
            assert_eq!(options.pseudo_selector(), None);
        }
    }
}
