//! Request payload tree
//!
//! Payloads are an explicit `Scalar | Sequence | Mapping` tree rather than a
//! raw `serde_json::Value`, so every generator matches exhaustively on the
//! node kind. Mappings keep insertion order; traversal order depends on it.

mod path;
mod traverse;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

pub use path::{LeafPath, PathError, PathSegment};
pub use traverse::{leaves, traverse};

/// Scalar leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

/// Ordered string-keyed mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: Vec<(String, Payload)>,
}

impl Mapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Payload> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Payload> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Payload) -> Option<Payload> {
        let key = key.into();
        if let Some(slot) = self.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Payload> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Payload)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl FromIterator<(String, Payload)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, Payload)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

/// A node of the payload tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Value", from = "Value")]
pub enum Payload {
    Scalar(Scalar),
    Sequence(Vec<Payload>),
    Mapping(Mapping),
}

impl Payload {
    #[must_use]
    pub const fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(s.into()))
    }

    #[must_use]
    pub fn int(n: i64) -> Self {
        Self::Scalar(Scalar::Number(n.into()))
    }

    #[must_use]
    pub fn empty_mapping() -> Self {
        Self::Mapping(Mapping::new())
    }

    #[must_use]
    pub const fn empty_sequence() -> Self {
        Self::Sequence(Vec::new())
    }

    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::String(_)))
    }

    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Number(_)))
    }

    #[must_use]
    pub const fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Short type label used in test case descriptions.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(Scalar::Null) => "null",
            Self::Scalar(Scalar::Bool(_)) => "boolean",
            Self::Scalar(Scalar::Number(_)) => "number",
            Self::Scalar(Scalar::String(_)) => "string",
            Self::Sequence(_) => "array",
            Self::Mapping(_) => "object",
        }
    }

    /// Compact JSON rendering.
    #[must_use]
    pub fn to_json_string(&self) -> String {
        Value::from(self.clone()).to_string()
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Self::Scalar(Scalar::Number(n)),
            Value::String(s) => Self::Scalar(Scalar::String(s)),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(obj) => {
                Self::Mapping(obj.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<Payload> for Value {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Scalar(Scalar::Null) => Self::Null,
            Payload::Scalar(Scalar::Bool(b)) => Self::Bool(b),
            Payload::Scalar(Scalar::Number(n)) => Self::Number(n),
            Payload::Scalar(Scalar::String(s)) => Self::String(s),
            Payload::Sequence(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Payload::Mapping(mapping) => Self::Object(
                mapping
                    .entries
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_conversion_keeps_key_order() {
        let value: Value =
            serde_json::from_str(r#"{"zeta": 1, "alpha": {"m": true, "b": null}}"#).unwrap();
        let payload = Payload::from(value.clone());

        let keys: Vec<&str> = payload.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(Value::from(payload), value);
    }

    #[test]
    fn mapping_insert_replaces_in_place() {
        let mut m = Mapping::new();
        m.insert("a", Payload::int(1));
        m.insert("b", Payload::int(2));
        let old = m.insert("a", Payload::string("x"));

        assert_eq!(old, Some(Payload::int(1)));
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(m.get("a"), Some(&Payload::string("x")));
    }

    #[test]
    fn mapping_remove_preserves_order() {
        let payload = Payload::from(json!({"a": 1, "b": 2, "c": 3}));
        let Payload::Mapping(mut m) = payload else {
            panic!("expected mapping");
        };
        assert_eq!(m.remove("b"), Some(Payload::int(2)));
        assert_eq!(m.remove("missing"), None);
        assert_eq!(m.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(Payload::string("x").kind(), "string");
        assert_eq!(Payload::int(1).kind(), "number");
        assert_eq!(Payload::null().kind(), "null");
        assert_eq!(Payload::empty_sequence().kind(), "array");
        assert_eq!(Payload::empty_mapping().kind(), "object");
        assert_eq!(Payload::from(json!(true)).kind(), "boolean");
    }

    #[test]
    fn serde_roundtrip_through_value() {
        let payload = Payload::from(json!({"name": "Widget", "tags": ["a", "b"]}));
        let text = serde_json::to_string(&payload).unwrap();
        assert_eq!(text, r#"{"name":"Widget","tags":["a","b"]}"#);

        let back: Payload = serde_json::from_str(&text).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn booleans_are_neither_strings_nor_numbers() {
        let b = Payload::from(json!(false));
        assert!(!b.is_string());
        assert!(!b.is_number());
    }
}
