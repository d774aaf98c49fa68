//! The Registry - immutable schema lookup.

use crate::EntitySetDef;
use std::collections::HashMap;

/// Namespace of the hierarchy vocabulary.
pub const HIERARCHY_VOCABULARY: &str = "com.sap.vocabularies.Hierarchy.v1";

/// The Registry provides runtime lookup of schema definitions.
/// It is immutable after construction.
#[derive(Debug)]
pub struct Registry {
    /// Service namespace.
    namespace: String,
    /// Entity set definitions by name.
    entity_sets: HashMap<String, EntitySetDef>,
    /// Declaration order of entity sets.
    order: Vec<String>,
    /// Vocabulary alias to namespace.
    aliases: HashMap<String, String>,
}

impl Registry {
    pub(crate) fn new(
        namespace: String,
        entity_sets: HashMap<String, EntitySetDef>,
        order: Vec<String>,
        aliases: HashMap<String, String>,
    ) -> Self {
        Self {
            namespace,
            entity_sets,
            order,
            aliases,
        }
    }

    /// Service namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    // ==================== ENTITY SET LOOKUPS ====================

    /// Get an entity set definition by name.
    pub fn entity_set(&self, name: &str) -> Option<&EntitySetDef> {
        self.entity_sets.get(name)
    }

    /// Check if an entity set exists.
    pub fn has_entity_set(&self, name: &str) -> bool {
        self.entity_sets.contains_key(name)
    }

    /// Iterate entity sets in declaration order.
    pub fn entity_sets(&self) -> impl Iterator<Item = &EntitySetDef> {
        self.order.iter().filter_map(|name| self.entity_sets.get(name))
    }

    pub fn entity_set_count(&self) -> usize {
        self.entity_sets.len()
    }

    // ==================== NAME RESOLUTION ====================

    /// Expand a vocabulary alias prefix into its full namespace.
    ///
    /// `Hierarchy.TopLevels` becomes `com.sap.vocabularies.Hierarchy.v1.TopLevels`
    /// when `Hierarchy` is a declared alias. Names without a known alias are
    /// returned unchanged.
    pub fn resolve_qualified_name(&self, name: &str) -> String {
        if let Some((prefix, local)) = name.rsplit_once('.') {
            if let Some(namespace) = self.aliases.get(prefix) {
                return format!("{}.{}", namespace, local);
            }
        }
        name.to_string()
    }

    /// Strip the service namespace (or an alias of it) from an action name.
    ///
    /// Returns the bare name; unqualified names are returned as-is.
    pub fn local_action_name<'n>(&self, name: &'n str) -> &'n str {
        match name.rsplit_once('.') {
            Some((prefix, local))
                if prefix == self.namespace
                    || self.aliases.get(prefix).map(String::as_str) == Some(&self.namespace) =>
            {
                local
            }
            Some(_) => name,
            None => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{PropertyType, RegistryBuilder};

    use super::*;

    fn registry() -> Registry {
        let mut builder = RegistryBuilder::new("v4treedraft");
        builder.vocabulary_alias("Hierarchy", HIERARCHY_VOCABULARY);
        builder.vocabulary_alias("Svc", "v4treedraft");
        builder
            .add_entity_set("B")
            .key("ID", PropertyType::String)
            .done()
            .unwrap();
        builder
            .add_entity_set("A")
            .key("ID", PropertyType::String)
            .done()
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_entity_sets_keep_declaration_order() {
        let registry = registry();
        let names: Vec<_> = registry.entity_sets().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert!(registry.has_entity_set("A"));
        assert!(!registry.has_entity_set("C"));
    }

    #[test]
    fn test_resolve_alias() {
        let registry = registry();
        assert_eq!(
            registry.resolve_qualified_name("Hierarchy.TopLevels"),
            "com.sap.vocabularies.Hierarchy.v1.TopLevels"
        );
        assert_eq!(
            registry.resolve_qualified_name("com.sap.vocabularies.Hierarchy.v1.TopLevels"),
            "com.sap.vocabularies.Hierarchy.v1.TopLevels"
        );
        assert_eq!(registry.resolve_qualified_name("TopLevels"), "TopLevels");
    }

    #[test]
    fn test_local_action_name() {
        let registry = registry();
        assert_eq!(registry.local_action_name("v4treedraft.draftEdit"), "draftEdit");
        assert_eq!(registry.local_action_name("Svc.draftEdit"), "draftEdit");
        assert_eq!(registry.local_action_name("draftEdit"), "draftEdit");
        assert_eq!(registry.local_action_name("other.draftEdit"), "other.draftEdit");
    }
}
