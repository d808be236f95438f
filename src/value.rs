//! Recorded values and the coercion of raw tokens into them.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::definition::ParameterType;
use crate::error::{Error, Result};
use crate::registry::ParameterId;

/// Only unsigned decimal digit runs are accepted as integers; a leading sign
/// is rejected on purpose.
static UNSIGNED_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("hard-coded pattern"));

/// A value recorded for a submitted parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// The parameter was submitted as a bare flag.
    Bool(bool),
    /// A single integer value.
    Int(i64),
    /// A single string value.
    Str(String),
    /// Ordered values collected for a `multiple` parameter.
    List(Vec<Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Validate and convert one raw token according to the declared type.
///
/// `name` is only used to label the error; it should be the name under which
/// the parameter was submitted.
pub fn coerce(parameter_type: ParameterType, name: &str, raw: &str) -> Result<Value> {
    match parameter_type {
        // A flag never takes a value, whatever the token looks like.
        ParameterType::None => Err(Error::TypeViolation {
            name: name.to_string(),
            value: raw.to_string(),
        }),
        ParameterType::String => Ok(Value::Str(strip_quotes(raw).to_string())),
        ParameterType::Int => {
            if !UNSIGNED_DECIMAL.is_match(raw) {
                return Err(Error::TypeViolation {
                    name: name.to_string(),
                    value: raw.to_string(),
                });
            }
            // The digit run may still overflow i64.
            raw.parse::<i64>()
                .map(Value::Int)
                .map_err(|_| Error::TypeViolation {
                    name: name.to_string(),
                    value: raw.to_string(),
                })
        }
    }
}

/// Strip one layer of matching leading/trailing quote characters.
fn strip_quotes(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'\'' || first == b'"') {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

/// Insertion-ordered store of the values recorded during parsing.
///
/// Rule validation iterates entries in the order they were first recorded,
/// so the store keeps a flat list instead of a hash map. The store is not
/// cleared between parse invocations; see [`RecordedValues::clear`].
#[derive(Debug, Default)]
pub struct RecordedValues {
    entries: Vec<(ParameterId, Value)>,
}

impl RecordedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ParameterId) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, id: ParameterId) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }

    /// Insert a value, replacing the previous one recorded for the same
    /// identity while keeping its position.
    pub fn record(&mut self, id: ParameterId, value: Value) {
        match self.entries.iter_mut().find(|(entry_id, _)| *entry_id == id) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((id, value)),
        }
    }

    /// Append a value to the list recorded for a `multiple` parameter,
    /// starting a fresh list on the first occurrence.
    pub fn append(&mut self, id: ParameterId, value: Value) {
        match self.entries.iter_mut().find(|(entry_id, _)| *entry_id == id) {
            Some((_, Value::List(items))) => items.push(value),
            Some((_, slot)) => *slot = Value::List(vec![value]),
            None => self.entries.push((id, Value::List(vec![value]))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParameterId, &Value)> {
        self.entries.iter().map(|(id, value)| (*id, value))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_coercion_accepts_digit_runs() {
        let value = coerce(ParameterType::Int, "size", "10").unwrap();
        assert_eq!(value, Value::Int(10));
    }

    #[test]
    fn test_int_coercion_rejects_text() {
        let err = coerce(ParameterType::Int, "size", "abc").unwrap_err();
        assert_eq!(
            err,
            Error::TypeViolation {
                name: "size".to_string(),
                value: "abc".to_string(),
            }
        );
    }

    #[test]
    fn test_int_coercion_rejects_negative_numbers() {
        assert!(coerce(ParameterType::Int, "size", "-5").is_err());
    }

    #[test]
    fn test_int_coercion_rejects_overflow() {
        assert!(coerce(ParameterType::Int, "size", "99999999999999999999").is_err());
    }

    #[test]
    fn test_string_coercion_strips_one_quote_layer() {
        let value = coerce(ParameterType::String, "name", "'hello'").unwrap();
        assert_eq!(value, Value::Str("hello".to_string()));

        let value = coerce(ParameterType::String, "name", "\"'inner'\"").unwrap();
        assert_eq!(value, Value::Str("'inner'".to_string()));
    }

    #[test]
    fn test_string_coercion_keeps_unbalanced_quotes() {
        let value = coerce(ParameterType::String, "name", "'half").unwrap();
        assert_eq!(value, Value::Str("'half".to_string()));

        // A lone quote is not a pair.
        let value = coerce(ParameterType::String, "name", "\"").unwrap();
        assert_eq!(value, Value::Str("\"".to_string()));
    }

    #[test]
    fn test_flag_rejects_any_value() {
        assert!(coerce(ParameterType::None, "verbose", "yes").is_err());
    }

    #[test]
    fn test_store_preserves_insertion_order() {
        let mut store = RecordedValues::new();
        store.record(ParameterId::for_tests(2), Value::Bool(true));
        store.record(ParameterId::for_tests(0), Value::Int(1));
        store.record(ParameterId::for_tests(1), Value::Str("x".to_string()));

        let order: Vec<ParameterId> = store.iter().map(|(id, _)| id).collect();
        assert_eq!(
            order,
            vec![
                ParameterId::for_tests(2),
                ParameterId::for_tests(0),
                ParameterId::for_tests(1),
            ]
        );
    }

    #[test]
    fn test_store_append_builds_a_list() {
        let mut store = RecordedValues::new();
        let id = ParameterId::for_tests(0);
        store.append(id, Value::Str("a".to_string()));
        store.append(id, Value::Str("b".to_string()));

        assert_eq!(
            store.get(id),
            Some(&Value::List(vec![
                Value::Str("a".to_string()),
                Value::Str("b".to_string()),
            ]))
        );
    }
}
