//! Records and draft administrative data.

use crate::names::{
    CREATED_BY_USER, DRAFT_IS_CREATED_BY_ME, DRAFT_UUID, IN_PROCESS_BY_USER, IS_ACTIVE_ENTITY,
};
use crate::{EntityKey, KeyValue, Value};
use std::collections::BTreeMap;

/// Property storage for a record.
pub type Properties = BTreeMap<String, Value>;

/// A row of an entity set: a mapping from property name to value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    properties: Properties,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record from a property map.
    pub fn from_properties(properties: Properties) -> Self {
        Self { properties }
    }

    /// Build a record from a JSON object. Returns None for non-objects.
    pub fn from_json(json: serde_json::Value) -> Option<Self> {
        match Value::from(json) {
            Value::Object(properties) => Some(Self { properties }),
            _ => None,
        }
    }

    /// Get a property value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Set a property value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Builder-style variant of `set`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Remove a property.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.properties.remove(name)
    }

    /// Returns true if the property is present (even when null).
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Iterate over properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Borrow the underlying property map.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn into_properties(self) -> Properties {
        self.properties
    }

    /// The `IsActiveEntity` flag, if the record carries one.
    pub fn is_active(&self) -> Option<bool> {
        self.get(IS_ACTIVE_ENTITY).and_then(Value::as_bool)
    }

    /// Extract the business key for the given key properties.
    ///
    /// Returns None if any key property is missing or not a valid key value.
    pub fn key(&self, key_properties: &[String]) -> Option<EntityKey> {
        let mut parts = Vec::with_capacity(key_properties.len());
        for name in key_properties {
            let value = KeyValue::from_value(self.get(name)?)?;
            parts.push((name.clone(), value));
        }
        Some(EntityKey::new(parts))
    }

    /// Overwrite properties with the values of `patch`.
    pub fn merge(&mut self, patch: &Record) {
        for (name, value) in patch.iter() {
            self.properties.insert(name.clone(), value.clone());
        }
    }

    /// Keep only the named properties (missing ones are skipped).
    pub fn project(&self, names: &[String]) -> Record {
        let properties = names
            .iter()
            .filter_map(|name| self.get(name).map(|v| (name.clone(), v.clone())))
            .collect();
        Record { properties }
    }

    /// Convert into a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.properties
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            properties: iter.into_iter().collect(),
        }
    }
}

/// Administrative data attached to every draft record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftAdministrativeData {
    /// Unique identifier of this draft.
    pub draft_uuid: String,
    /// Principal currently editing the draft.
    pub in_process_by_user: String,
    /// Principal that created the draft.
    pub created_by_user: String,
    /// Whether the requesting principal created the draft. Stored relative
    /// to the creator; the dispatcher recomputes it for each request.
    pub draft_is_created_by_me: bool,
}

impl DraftAdministrativeData {
    /// Create administrative data for a draft created by `principal`.
    pub fn new(draft_uuid: impl Into<String>, principal: impl Into<String>) -> Self {
        let principal = principal.into();
        Self {
            draft_uuid: draft_uuid.into(),
            in_process_by_user: principal.clone(),
            created_by_user: principal,
            draft_is_created_by_me: true,
        }
    }

    /// Nested representation exposed on draft records.
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert(DRAFT_UUID.to_string(), Value::from(self.draft_uuid.as_str()));
        map.insert(
            IN_PROCESS_BY_USER.to_string(),
            Value::from(self.in_process_by_user.as_str()),
        );
        map.insert(
            CREATED_BY_USER.to_string(),
            Value::from(self.created_by_user.as_str()),
        );
        map.insert(
            DRAFT_IS_CREATED_BY_ME.to_string(),
            Value::Bool(self.draft_is_created_by_me),
        );
        Value::Object(map)
    }
}

/// Helper macro to build records.
#[macro_export]
macro_rules! props {
    () => {
        $crate::Record::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut record = $crate::Record::new();
            $(
                record.set($key, $crate::Value::from($value));
            )+
            record
        }
    };
}
