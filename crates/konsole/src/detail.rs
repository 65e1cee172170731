//! Structured detail attached to a log event.
//!
//! A [`Detail`] is one of three shapes: an ordered mapping, a sequence, or a
//! scalar. Values are turned into display strings when the detail is built,
//! so rendering never needs to inspect types.
//!
//! ```
//! use konsole::detail::{Detail, render_detail};
//! use konsole::style::StyleRegistry;
//!
//! let detail = Detail::mapping([("path", "/tmp/x"), ("mode", "0644")]);
//! let block = render_detail(Some(&detail), &StyleRegistry::plain(), false);
//! assert_eq!(block, "\n    path = /tmp/x\n    mode = 0644");
//! ```

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::style::{StyleRegistry, StyleRole};

/// Indentation for every line of a detail or exception block.
pub(crate) const INDENT: &str = "    ";

/// Optional structured data rendered below the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    /// Key-value pairs, rendered in insertion order with aligned keys
    Mapping(Vec<(String, String)>),
    /// Items rendered one per line
    Sequence(Vec<String>),
    /// A single value; multi-line text renders one line per source line
    Scalar(String),
}

impl Detail {
    /// Build a mapping from key-value pairs, keeping their order.
    ///
    /// A repeated key stays at its first position and takes the last value.
    pub fn mapping<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: fmt::Display,
        V: fmt::Display,
    {
        Self::Mapping(merge_entries(
            entries
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        ))
    }

    /// Build a sequence from items, keeping their order.
    pub fn sequence<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        Self::Sequence(items.into_iter().map(|item| item.to_string()).collect())
    }

    /// Build a scalar from anything displayable.
    pub fn scalar(value: impl fmt::Display) -> Self {
        Self::Scalar(value.to_string())
    }

    /// Whether rendering this detail produces no lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Mapping(entries) => entries.is_empty(),
            Self::Sequence(items) => items.is_empty(),
            Self::Scalar(text) => text.lines().next().is_none(),
        }
    }

    /// The detail as JSON: mappings become objects, sequences arrays and
    /// scalars strings. Converting back with `From` yields the same detail,
    /// with repeated mapping keys merged the way [`Detail::mapping`] does.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Mapping(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                    .collect(),
            ),
            Self::Sequence(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
            Self::Scalar(text) => Value::String(text.clone()),
        }
    }

    fn lines(&self) -> Vec<String> {
        match self {
            Self::Mapping(entries) => {
                let entries = merge_entries(entries.iter().cloned());
                let width = entries
                    .iter()
                    .map(|(key, _)| key.chars().count())
                    .max()
                    .unwrap_or(0);
                entries
                    .iter()
                    .map(|(key, value)| format!("{key:>width$} = {value}"))
                    .collect()
            }
            Self::Sequence(items) => items.clone(),
            Self::Scalar(text) => text.lines().map(str::to_string).collect(),
        }
    }
}

/// Fold repeated keys into their first occurrence; the last value wins.
fn merge_entries(entries: impl IntoIterator<Item = (String, String)>) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = Vec::new();
    for (key, value) in entries {
        match merged.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => merged.push((key, value)),
        }
    }
    merged
}

/// Display text for a JSON value: strings without quotes, everything else
/// as compact JSON.
fn display_json(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl From<Value> for Detail {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Mapping(
                map.iter()
                    .map(|(key, value)| (key.clone(), display_json(value)))
                    .collect(),
            ),
            Value::Array(items) => Self::Sequence(items.iter().map(display_json).collect()),
            other => Self::Scalar(display_json(&other)),
        }
    }
}

impl From<&str> for Detail {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for Detail {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Detail {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from!(bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Serialize for Detail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Mapping(entries) => {
                let entries = merge_entries(entries.iter().cloned());
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in &entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Scalar(text) => serializer.serialize_str(text),
        }
    }
}

/// Render a detail as an indented block, one `"\n    "`-prefixed line per
/// entry, styled with the detail role.
///
/// Returns an empty string when the detail is absent or produces no lines.
#[must_use]
pub fn render_detail(detail: Option<&Detail>, styles: &StyleRegistry, color: bool) -> String {
    let Some(detail) = detail else {
        return String::new();
    };

    let mut block = String::new();
    for line in detail.lines() {
        block.push('\n');
        block.push_str(INDENT);
        block.push_str(&line);
    }

    if block.is_empty() {
        block
    } else {
        styles.apply(StyleRole::Detail, &block, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain(detail: &Detail) -> String {
        render_detail(Some(detail), &StyleRegistry::plain(), false)
    }

    #[test]
    fn test_absent_detail_renders_nothing() {
        assert_eq!(render_detail(None, &StyleRegistry::default(), true), "");
    }

    #[test]
    fn test_mapping_aligns_keys_right() {
        let detail = Detail::mapping([("a", "1"), ("long", "2"), ("mid", "3")]);
        assert_eq!(plain(&detail), "\n       a = 1\n    long = 2\n     mid = 3");
    }

    #[test]
    fn test_mapping_keeps_insertion_order() {
        let detail = Detail::mapping([("z", 1), ("a", 2)]);
        assert_eq!(plain(&detail), "\n    z = 1\n    a = 2");
    }

    #[test]
    fn test_repeated_key_keeps_first_position_and_last_value() {
        let detail = Detail::mapping([("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(
            detail,
            Detail::Mapping(vec![("a".into(), "3".into()), ("b".into(), "2".into())])
        );
        assert_eq!(plain(&detail), "\n    a = 3\n    b = 2");
        assert_eq!(Detail::from(detail.to_json()), detail);
    }

    #[test]
    fn test_hand_built_mapping_with_repeated_key_renders_merged() {
        let detail = Detail::Mapping(vec![
            ("a".into(), "1".into()),
            ("b".into(), "2".into()),
            ("a".into(), "3".into()),
        ]);
        assert_eq!(plain(&detail), "\n    a = 3\n    b = 2");
        assert_eq!(plain(&Detail::from(detail.to_json())), plain(&detail));
        assert_eq!(serde_json::to_string(&detail).unwrap(), r#"{"a":"3","b":"2"}"#);
    }

    #[test]
    fn test_empty_mapping_renders_nothing() {
        let detail = Detail::Mapping(Vec::new());
        assert!(detail.is_empty());
        assert_eq!(render_detail(Some(&detail), &StyleRegistry::default(), true), "");
    }

    #[test]
    fn test_key_width_counts_characters() {
        let detail = Detail::mapping([("größe", "1"), ("x", "2")]);
        assert_eq!(plain(&detail), "\n    größe = 1\n        x = 2");
    }

    #[test]
    fn test_sequence_one_line_per_item() {
        let detail = Detail::sequence(["one", "two", "three"]);
        assert_eq!(plain(&detail), "\n    one\n    two\n    three");
    }

    #[test]
    fn test_empty_sequence_renders_nothing() {
        assert_eq!(plain(&Detail::sequence(Vec::<String>::new())), "");
    }

    #[test]
    fn test_multiline_scalar_splits_lines() {
        assert_eq!(plain(&Detail::from("one\ntwo")), "\n    one\n    two");
    }

    #[test]
    fn test_scalar_number() {
        assert_eq!(plain(&Detail::from(665)), "\n    665");
    }

    #[test]
    fn test_block_is_styled_as_a_whole() {
        let block = render_detail(Some(&Detail::from("broken!")), &StyleRegistry::default(), true);
        assert_eq!(block, "\x1b[90m\n    broken!\x1b[0m");
    }

    #[test]
    fn test_from_json_object_preserves_order() {
        let detail = Detail::from(json!({"zeta": "z", "alpha": 1, "nested": [1, 2]}));
        assert_eq!(
            detail,
            Detail::Mapping(vec![
                ("zeta".to_string(), "z".to_string()),
                ("alpha".to_string(), "1".to_string()),
                ("nested".to_string(), "[1,2]".to_string()),
            ])
        );
    }

    #[test]
    fn test_from_json_array_and_scalars() {
        assert_eq!(
            Detail::from(json!(["a", 2, null])),
            Detail::Sequence(vec!["a".into(), "2".into(), "null".into()])
        );
        assert_eq!(Detail::from(json!("text")), Detail::Scalar("text".into()));
        assert_eq!(Detail::from(json!(true)), Detail::Scalar("true".into()));
    }

    #[test]
    fn test_serialize_matches_shape() {
        let mapping = Detail::mapping([("b", "1"), ("a", "2")]);
        assert_eq!(serde_json::to_string(&mapping).unwrap(), r#"{"b":"1","a":"2"}"#);
        let sequence = Detail::sequence([1, 2]);
        assert_eq!(serde_json::to_value(&sequence).unwrap(), json!(["1", "2"]));
        let scalar = Detail::from("x");
        assert_eq!(Detail::from(serde_json::to_value(&scalar).unwrap()), scalar);
    }
}
