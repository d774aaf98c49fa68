//! Resolution of resource paths to record collections.

use mockd_core::names::IS_ACTIVE_ENTITY;
use mockd_core::{EntityKey, KeyValue, Record, Value};
use mockd_draft::DraftStore;
use mockd_parser::{KeyPredicate, PathSegment, ResourcePath};
use mockd_registry::{EntitySetDef, Registry};

use crate::{QueryError, QueryResult};

/// Anything that can produce the records addressed by a resource path.
pub trait RecordSource {
    fn collection(&self, path: &ResourcePath) -> QueryResult<Vec<Record>>;
}

/// A single entity addressed by key.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityAddress {
    pub entity_set: String,
    pub key: EntityKey,
    /// The version named in the key predicate; None addresses the visible one.
    pub is_active: Option<bool>,
}

/// Convert a key predicate into a business key and an optional version flag.
pub fn entity_key(def: &EntitySetDef, predicate: &KeyPredicate) -> QueryResult<(EntityKey, Option<bool>)> {
    let key_value = |property: &str, value: &Value| {
        KeyValue::from_value(value).ok_or_else(|| {
            QueryError::invalid_key(&def.name, format!("{} is not a valid value for {}", value, property))
        })
    };

    match predicate {
        KeyPredicate::Single(value) => match def.key_properties.as_slice() {
            [property] => Ok((
                EntityKey::new(vec![(property.clone(), key_value(property, value)?)]),
                None,
            )),
            _ => Err(QueryError::invalid_key(&def.name, "compound key requires named values")),
        },
        KeyPredicate::Named(parts) => {
            let mut key = Vec::with_capacity(def.key_properties.len());
            for property in &def.key_properties {
                let value = predicate
                    .get(property)
                    .ok_or_else(|| QueryError::invalid_key(&def.name, format!("missing {}", property)))?;
                key.push((property.clone(), key_value(property, value)?));
            }
            let is_active = match predicate.get(IS_ACTIVE_ENTITY) {
                None => None,
                Some(value) => Some(value.as_bool().ok_or_else(|| {
                    QueryError::invalid_key(&def.name, format!("{} must be a boolean", IS_ACTIVE_ENTITY))
                })?),
            };
            for (name, _) in parts {
                if name != IS_ACTIVE_ENTITY && !def.is_key(name) {
                    return Err(QueryError::invalid_key(&def.name, format!("{} is not a key property", name)));
                }
            }
            Ok((EntityKey::new(key), is_active))
        }
    }
}

/// The entity set a path ends in, following navigation properties.
pub fn target_entity_set<'r>(registry: &'r Registry, path: &ResourcePath) -> QueryResult<&'r EntitySetDef> {
    let (first, rest) = path
        .segments
        .split_first()
        .ok_or_else(|| QueryError::invalid_path(path, "empty path"))?;
    let mut def = registry
        .entity_set(&first.name)
        .ok_or_else(|| QueryError::unknown_entity_set(&first.name))?;
    for segment in rest {
        def = navigation_target(registry, &def.name, &segment.name)?;
    }
    Ok(def)
}

/// The entity addressed by a path whose last segment carries a key.
///
/// Returns None for collection paths.
pub fn entity_address(registry: &Registry, path: &ResourcePath) -> QueryResult<Option<EntityAddress>> {
    let Some(PathSegment { key: Some(predicate), .. }) = path.last() else {
        return Ok(None);
    };
    let def = target_entity_set(registry, path)?;
    let (key, is_active) = entity_key(def, predicate)?;
    Ok(Some(EntityAddress {
        entity_set: def.name.clone(),
        key,
        is_active,
    }))
}

fn navigation_target<'r>(registry: &'r Registry, entity_set: &str, navigation: &str) -> QueryResult<&'r EntitySetDef> {
    let source = registry
        .entity_set(entity_set)
        .ok_or_else(|| QueryError::unknown_entity_set(entity_set))?;
    let navigation = source
        .navigation(navigation)
        .ok_or_else(|| QueryError::unknown_navigation(entity_set, navigation))?;
    registry
        .entity_set(&navigation.target_set)
        .ok_or_else(|| QueryError::unknown_entity_set(&navigation.target_set))
}

impl RecordSource for DraftStore {
    fn collection(&self, path: &ResourcePath) -> QueryResult<Vec<Record>> {
        let registry = self.registry();
        let (first, rest) = path
            .segments
            .split_first()
            .ok_or_else(|| QueryError::invalid_path(path, "empty path"))?;
        let def = registry
            .entity_set(&first.name)
            .ok_or_else(|| QueryError::unknown_entity_set(&first.name))?;

        let Some(predicate) = &first.key else {
            if rest.is_empty() {
                return Ok(self.rows(&def.name)?);
            }
            return Err(QueryError::invalid_path(path, "navigation requires a keyed entity"));
        };

        let (key, is_active) = entity_key(def, predicate)?;
        let mut current = EntityAddress {
            entity_set: def.name.clone(),
            key,
            is_active,
        };

        for (position, segment) in rest.iter().enumerate() {
            let children = self.children(
                &current.entity_set,
                &current.key,
                current.is_active,
                &segment.name,
            )?;
            let is_last = position + 1 == rest.len();
            let Some(predicate) = &segment.key else {
                if is_last {
                    return Ok(children);
                }
                return Err(QueryError::invalid_path(path, "navigation requires a keyed entity"));
            };

            let target = navigation_target(registry, &current.entity_set, &segment.name)?;
            let (key, wanted) = entity_key(target, predicate)?;
            let child = children
                .into_iter()
                .find(|child| {
                    child.key(&target.key_properties).as_ref() == Some(&key)
                        && wanted.map_or(true, |active| child.is_active() != Some(!active))
                })
                .ok_or_else(|| mockd_draft::DraftError::not_found(&target.name, &key))?;

            if is_last {
                return Ok(vec![child]);
            }
            current = EntityAddress {
                entity_set: target.name.clone(),
                is_active: child.is_active(),
                key,
            };
        }

        let record = match current.is_active {
            Some(active) => self.resolve_version(&current.entity_set, &current.key, active)?,
            None => self.resolve(&current.entity_set, &current.key)?,
        };
        Ok(vec![record])
    }
}
