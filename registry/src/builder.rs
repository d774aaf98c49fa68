//! RegistryBuilder for constructing an immutable Registry.

use crate::{EntitySetDef, HierarchyDef, NavigationDef, PropertyDef, PropertyType, Registry};
use mockd_core::names;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during registry construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate entity set name: {0}")]
    DuplicateEntitySet(String),

    #[error("Duplicate property {property} on entity set {set}")]
    DuplicateProperty { set: String, property: String },

    #[error("Entity set {0} declares no key properties")]
    MissingKey(String),

    #[error("Hierarchy {qualifier} on {set} references unknown property {property}")]
    UnknownHierarchyProperty {
        set: String,
        qualifier: String,
        property: String,
    },

    #[error("Navigation {navigation} on {set} targets unknown entity set {target}")]
    UnknownNavigationTarget {
        set: String,
        navigation: String,
        target: String,
    },

    #[error("Navigation {navigation} on {set} constrains unknown property {property}")]
    UnknownConstraintProperty {
        set: String,
        navigation: String,
        property: String,
    },
}

/// Builder for constructing an immutable Registry.
#[derive(Debug)]
pub struct RegistryBuilder {
    /// Service namespace (used to qualify bound actions).
    namespace: String,
    /// Entity sets being built.
    entity_sets: HashMap<String, EntitySetDef>,
    /// Declaration order of entity sets.
    order: Vec<String>,
    /// Vocabulary alias to namespace.
    aliases: HashMap<String, String>,
}

impl RegistryBuilder {
    /// Create a new builder for a service namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            entity_sets: HashMap::new(),
            order: Vec::new(),
            aliases: HashMap::new(),
        }
    }

    /// Declare an alias for a vocabulary namespace.
    pub fn vocabulary_alias(
        &mut self,
        alias: impl Into<String>,
        namespace: impl Into<String>,
    ) -> &mut Self {
        self.aliases.insert(alias.into(), namespace.into());
        self
    }

    /// Add an entity set definition.
    pub fn add_entity_set(&mut self, name: impl Into<String>) -> EntitySetBuilder<'_> {
        EntitySetBuilder {
            builder: self,
            name: name.into(),
            keys: Vec::new(),
            properties: Vec::new(),
            hierarchies: Vec::new(),
            navigations: Vec::new(),
            draft_enabled: false,
        }
    }

    /// Build the registry, validating cross-set references.
    pub fn build(self) -> Result<Registry, RegistryError> {
        for name in &self.order {
            let set = &self.entity_sets[name];
            for nav in set.navigations.values() {
                let Some(target) = self.entity_sets.get(&nav.target_set) else {
                    return Err(RegistryError::UnknownNavigationTarget {
                        set: set.name.clone(),
                        navigation: nav.name.clone(),
                        target: nav.target_set.clone(),
                    });
                };
                for (source_property, target_property) in &nav.constraints {
                    if !set.has_property(source_property) {
                        return Err(unknown_constraint(set, nav, source_property));
                    }
                    if !target.has_property(target_property) {
                        return Err(unknown_constraint(set, nav, target_property));
                    }
                }
            }
        }

        Ok(Registry::new(
            self.namespace,
            self.entity_sets,
            self.order,
            self.aliases,
        ))
    }
}

fn unknown_constraint(set: &EntitySetDef, nav: &NavigationDef, property: &str) -> RegistryError {
    RegistryError::UnknownConstraintProperty {
        set: set.name.clone(),
        navigation: nav.name.clone(),
        property: property.to_string(),
    }
}

/// Builder for an entity set definition.
pub struct EntitySetBuilder<'a> {
    builder: &'a mut RegistryBuilder,
    name: String,
    keys: Vec<String>,
    properties: Vec<PropertyDef>,
    hierarchies: Vec<HierarchyDef>,
    navigations: Vec<NavigationDef>,
    draft_enabled: bool,
}

impl<'a> EntitySetBuilder<'a> {
    /// Add a key property (not nullable).
    pub fn key(mut self, name: impl Into<String>, property_type: PropertyType) -> Self {
        let name = name.into();
        self.keys.push(name.clone());
        self.properties
            .push(PropertyDef::new(name, property_type).not_null());
        self
    }

    /// Add a regular property.
    pub fn property(mut self, name: impl Into<String>, property_type: PropertyType) -> Self {
        self.properties.push(PropertyDef::new(name, property_type));
        self
    }

    /// Add a fully specified property definition.
    pub fn property_def(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    /// Declare a recursive hierarchy.
    pub fn hierarchy(
        mut self,
        qualifier: impl Into<String>,
        node_property: impl Into<String>,
        parent_property: impl Into<String>,
    ) -> Self {
        self.hierarchies
            .push(HierarchyDef::new(qualifier, node_property, parent_property));
        self
    }

    /// Add a navigation property.
    pub fn navigation(mut self, navigation: NavigationDef) -> Self {
        self.navigations.push(navigation);
        self
    }

    /// Enable active/draft versions for this set.
    pub fn draft_enabled(mut self) -> Self {
        self.draft_enabled = true;
        self
    }

    /// Finish building this entity set.
    pub fn done(self) -> Result<(), RegistryError> {
        if self.builder.entity_sets.contains_key(&self.name) {
            return Err(RegistryError::DuplicateEntitySet(self.name));
        }
        if self.keys.is_empty() {
            return Err(RegistryError::MissingKey(self.name));
        }

        let mut properties = self.properties;
        if self.draft_enabled {
            for flag in names::DRAFT_FLAGS {
                properties.push(PropertyDef::new(flag, PropertyType::Boolean).computed());
            }
        }
        if !self.hierarchies.is_empty() {
            properties.push(PropertyDef::new(names::DISTANCE_FROM_ROOT, PropertyType::Int).computed());
            properties.push(PropertyDef::new(names::DRILL_STATE, PropertyType::String).computed());
            properties.push(
                PropertyDef::new(names::LIMITED_DESCENDANT_COUNT, PropertyType::Int).computed(),
            );
        }

        let mut property_index = HashMap::new();
        for (i, property) in properties.iter().enumerate() {
            if property_index.insert(property.name.clone(), i).is_some() {
                return Err(RegistryError::DuplicateProperty {
                    set: self.name,
                    property: property.name.clone(),
                });
            }
        }

        let mut hierarchies = HashMap::new();
        for hierarchy in self.hierarchies {
            for property in [&hierarchy.node_property, &hierarchy.parent_property] {
                if !property_index.contains_key(property) {
                    return Err(RegistryError::UnknownHierarchyProperty {
                        set: self.name,
                        qualifier: hierarchy.qualifier.clone(),
                        property: property.clone(),
                    });
                }
            }
            hierarchies.insert(hierarchy.qualifier.clone(), hierarchy);
        }

        let navigations = self
            .navigations
            .into_iter()
            .map(|nav| (nav.name.clone(), nav))
            .collect();

        let def = EntitySetDef {
            name: self.name.clone(),
            key_properties: self.keys,
            properties,
            property_index,
            hierarchies,
            navigations,
            draft_enabled: self.draft_enabled,
        };

        self.builder.order.push(self.name.clone());
        self.builder.entity_sets.insert(self.name, def);
        Ok(())
    }
}
