//! Business keys for entities.
//!
//! A business key is the ordered tuple of key-property values. It identifies
//! one logical entity; the active/draft flag is never part of it.

use crate::Value;
use std::fmt;

/// Hashable key component.
///
/// Only exact-match scalar types can be key values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl KeyValue {
    /// Convert a property value into a key component.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(KeyValue::Bool(*b)),
            Value::Int(i) => Some(KeyValue::Int(*i)),
            Value::String(s) => Some(KeyValue::String(s.clone())),
            // Decimals, dates, nulls and structured values are not valid keys
            _ => None,
        }
    }

    /// Convert back into a property value.
    pub fn to_value(&self) -> Value {
        match self {
            KeyValue::Bool(b) => Value::Bool(*b),
            KeyValue::Int(i) => Value::Int(*i),
            KeyValue::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Bool(b) => write!(f, "{}", b),
            KeyValue::Int(i) => write!(f, "{}", i),
            KeyValue::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

impl From<&str> for KeyValue {
    fn from(s: &str) -> Self {
        KeyValue::String(s.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(s: String) -> Self {
        KeyValue::String(s)
    }
}

impl From<i64> for KeyValue {
    fn from(i: i64) -> Self {
        KeyValue::Int(i)
    }
}

/// The business key of a logical entity: named key components in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    parts: Vec<(String, KeyValue)>,
}

impl EntityKey {
    /// Create a key from named components.
    pub fn new(parts: Vec<(String, KeyValue)>) -> Self {
        Self { parts }
    }

    /// Create a single-component key.
    pub fn single(name: impl Into<String>, value: impl Into<KeyValue>) -> Self {
        Self {
            parts: vec![(name.into(), value.into())],
        }
    }

    /// Named components in schema order.
    pub fn parts(&self) -> &[(String, KeyValue)] {
        &self.parts
    }

    /// Look up a component by property name.
    pub fn get(&self, name: &str) -> Option<&KeyValue> {
        self.parts
            .iter()
            .find(|(part, _)| part == name)
            .map(|(_, value)| value)
    }

    /// Number of key components.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns true if the key has no components.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, (name, value)) in self.parts.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_from_value() {
        assert_eq!(
            KeyValue::from_value(&Value::String("EMEA".into())),
            Some(KeyValue::String("EMEA".into()))
        );
        assert_eq!(KeyValue::from_value(&Value::Int(7)), Some(KeyValue::Int(7)));
        assert_eq!(KeyValue::from_value(&Value::Decimal(1.5)), None);
        assert_eq!(KeyValue::from_value(&Value::Null), None);
    }

    #[test]
    fn test_entity_key_display() {
        let key = EntityKey::new(vec![
            ("ID".to_string(), KeyValue::from("EMEA")),
            ("Year".to_string(), KeyValue::Int(2024)),
        ]);
        assert_eq!(key.to_string(), "(ID='EMEA',Year=2024)");
        assert_eq!(key.get("Year"), Some(&KeyValue::Int(2024)));
    }
}
