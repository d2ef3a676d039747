//! Read-only navigation over weakly-typed server documents.

use serde_json::{Map, Value};
use tracing::warn;

/// Outcome of extracting one field.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Extracted<T> {
    /// Field present with the expected shape.
    Value(T),
    /// Field missing or `null`.
    Absent,
    /// Field present but unusable; carries a description of what was found.
    Malformed(String),
}

impl<T> Extracted<T> {
    /// Use `fallback` when this field is absent.
    pub(crate) fn or_else(self, fallback: impl FnOnce() -> Self) -> Self {
        match self {
            Self::Absent => fallback(),
            other => other,
        }
    }

    /// Collapse to an option, logging malformed values.
    pub(crate) fn resolve(self, field: &str) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Absent => None,
            Self::Malformed(found) => {
                warn!(field, found = %found, "Ignoring malformed field");
                None
            }
        }
    }

    /// Collapse to the type's default, logging malformed values.
    pub(crate) fn resolve_or_default(self, field: &str) -> T
    where
        T: Default,
    {
        self.resolve(field).unwrap_or_default()
    }
}

/// Cursor into a JSON document; navigating past a missing key yields an
/// empty cursor instead of failing.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Document<'a>(Option<&'a Value>);

impl<'a> Document<'a> {
    pub(crate) fn new(value: &'a Value) -> Self {
        Self(Some(value))
    }

    /// Descend into an object member.
    pub(crate) fn get(self, key: &str) -> Self {
        Self(self.0.and_then(|value| value.as_object()?.get(key)))
    }

    /// Descend through a sequence of object members.
    pub(crate) fn path(self, keys: &[&str]) -> Self {
        keys.iter().fold(self, |doc, key| doc.get(key))
    }

    /// Whether the current object has `key`, regardless of its value.
    pub(crate) fn has(self, key: &str) -> bool {
        self.0
            .and_then(Value::as_object)
            .is_some_and(|object| object.contains_key(key))
    }

    /// Whether the current object has `key` bound to an object.
    pub(crate) fn has_object(self, key: &str) -> bool {
        self.get(key).0.is_some_and(Value::is_object)
    }

    /// The cursor when it points at a value, `other` otherwise.
    pub(crate) fn or(self, other: Self) -> Self {
        match self.0 {
            Some(value) if !value.is_null() => self,
            _ => other,
        }
    }

    /// Elements of the array under the cursor (empty for anything else).
    pub(crate) fn items(self) -> &'a [Value] {
        self.0
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice)
    }

    fn present(self) -> Option<&'a Value> {
        self.0.filter(|value| !value.is_null())
    }

    /// String field.
    pub(crate) fn text(self) -> Extracted<String> {
        match self.present() {
            None => Extracted::Absent,
            Some(Value::String(s)) => Extracted::Value(s.clone()),
            Some(other) => Extracted::Malformed(other.to_string()),
        }
    }

    /// Identifier field: strings as-is, integers rendered in decimal.
    pub(crate) fn identifier(self) -> Extracted<String> {
        match self.present() {
            None => Extracted::Absent,
            Some(Value::String(s)) => Extracted::Value(s.clone()),
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Extracted::Value(n.to_string()),
            Some(other) => Extracted::Malformed(other.to_string()),
        }
    }

    /// Integer field, also accepting numeric strings.
    pub(crate) fn integer(self) -> Extracted<i64> {
        match self.present() {
            None => Extracted::Absent,
            Some(Value::Number(n)) => n
                .as_i64()
                .map_or_else(|| Extracted::Malformed(n.to_string()), Extracted::Value),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map_or_else(|_| Extracted::Malformed(s.clone()), Extracted::Value),
            Some(other) => Extracted::Malformed(other.to_string()),
        }
    }

    /// Non-negative integer field.
    pub(crate) fn unsigned(self) -> Extracted<u64> {
        match self.integer() {
            Extracted::Value(n) => {
                u64::try_from(n).map_or_else(|_| Extracted::Malformed(n.to_string()), Extracted::Value)
            }
            Extracted::Absent => Extracted::Absent,
            Extracted::Malformed(found) => Extracted::Malformed(found),
        }
    }

    /// Object field.
    pub(crate) fn object(self) -> Extracted<Map<String, Value>> {
        match self.present() {
            None => Extracted::Absent,
            Some(Value::Object(map)) => Extracted::Value(map.clone()),
            Some(other) => Extracted::Malformed(other.to_string()),
        }
    }

    /// Raw value under the cursor.
    pub(crate) fn raw(self) -> Option<&'a Value> {
        self.present()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_path_through_missing_keys() {
        let value = json!({"body": {"storage": {"value": "<p/>"}}});
        let doc = Document::new(&value);
        assert_eq!(
            doc.path(&["body", "storage", "value"]).text(),
            Extracted::Value("<p/>".to_owned())
        );
        assert_eq!(doc.path(&["body", "view", "value"]).text(), Extracted::Absent);
        assert_eq!(doc.path(&["nope", "deeper"]).text(), Extracted::Absent);
    }

    #[test]
    fn test_navigating_into_scalar_is_absent() {
        let value = json!({"space": "TEST"});
        assert_eq!(
            Document::new(&value).path(&["space", "key"]).text(),
            Extracted::Absent
        );
    }

    #[test]
    fn test_identifier_accepts_numbers() {
        let value = json!({"id": 12345, "other": "abc", "bad": [1]});
        let doc = Document::new(&value);
        assert_eq!(doc.get("id").identifier(), Extracted::Value("12345".to_owned()));
        assert_eq!(doc.get("other").identifier(), Extracted::Value("abc".to_owned()));
        assert!(matches!(doc.get("bad").identifier(), Extracted::Malformed(_)));
    }

    #[test]
    fn test_integer_accepts_numeric_strings() {
        let value = json!({"a": 7, "b": " 42 ", "c": "x", "d": null});
        let doc = Document::new(&value);
        assert_eq!(doc.get("a").integer(), Extracted::Value(7));
        assert_eq!(doc.get("b").integer(), Extracted::Value(42));
        assert!(matches!(doc.get("c").integer(), Extracted::Malformed(_)));
        assert_eq!(doc.get("d").integer(), Extracted::Absent);
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        let value = json!({"n": -1});
        assert!(matches!(
            Document::new(&value).get("n").unsigned(),
            Extracted::Malformed(_)
        ));
    }

    #[test]
    fn test_has_distinguishes_null_from_missing() {
        let value = json!({"description": null});
        let doc = Document::new(&value);
        assert!(doc.has("description"));
        assert!(!doc.has("homepage"));
        assert!(!doc.has_object("description"));
    }

    #[test]
    fn test_or_falls_back_when_missing() {
        let value = json!({"content": {"title": "Nested"}});
        let doc = Document::new(&value);
        let title = doc.get("title").or(doc.path(&["content", "title"])).text();
        assert_eq!(title, Extracted::Value("Nested".to_owned()));
    }

    #[test]
    fn test_resolve_defaults() {
        let malformed: Extracted<String> = Extracted::Malformed("42".to_owned());
        assert_eq!(malformed.resolve_or_default("title"), "");
        assert_eq!(Extracted::Value(3_i64).or_else(|| Extracted::Value(4)).resolve("n"), Some(3));
        assert_eq!(Extracted::<i64>::Absent.or_else(|| Extracted::Value(4)).resolve("n"), Some(4));
    }

    #[test]
    fn test_items_of_non_array_is_empty() {
        let value = json!({"results": {"not": "a list"}});
        assert!(Document::new(&value).get("results").items().is_empty());
    }
}
