//! Schema definition types.

use std::collections::HashMap;
use std::fmt;

/// Declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    String,
    Int,
    Decimal,
    Boolean,
    Date,
    DateTimeOffset,
    Guid,
}

impl PropertyType {
    /// Map an EDM primitive type name onto a property type.
    pub fn from_edm(name: &str) -> Option<Self> {
        let short = name.strip_prefix("Edm.").unwrap_or(name);
        match short {
            "String" => Some(PropertyType::String),
            "Int16" | "Int32" | "Int64" | "Byte" | "SByte" => Some(PropertyType::Int),
            "Decimal" | "Double" | "Single" => Some(PropertyType::Decimal),
            "Boolean" => Some(PropertyType::Boolean),
            "Date" => Some(PropertyType::Date),
            "DateTimeOffset" => Some(PropertyType::DateTimeOffset),
            "Guid" => Some(PropertyType::Guid),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PropertyType::String => "Edm.String",
            PropertyType::Int => "Edm.Int64",
            PropertyType::Decimal => "Edm.Decimal",
            PropertyType::Boolean => "Edm.Boolean",
            PropertyType::Date => "Edm.Date",
            PropertyType::DateTimeOffset => "Edm.DateTimeOffset",
            PropertyType::Guid => "Edm.Guid",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Property definition within an entity set.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    /// Property name.
    pub name: String,
    /// Declared type.
    pub property_type: PropertyType,
    /// Whether the property may be null.
    pub nullable: bool,
    /// Computed by the server (draft flags, hierarchy annotations).
    pub computed: bool,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            property_type,
            nullable: true,
            computed: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }
}

/// Recursive hierarchy declared on an entity set.
///
/// Identifies which property holds the node's own identifier and which
/// property references the parent node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyDef {
    /// Hierarchy qualifier (an entity set may declare several hierarchies).
    pub qualifier: String,
    /// Property holding the node identifier.
    pub node_property: String,
    /// Property holding the parent node identifier.
    pub parent_property: String,
}

impl HierarchyDef {
    pub fn new(
        qualifier: impl Into<String>,
        node_property: impl Into<String>,
        parent_property: impl Into<String>,
    ) -> Self {
        Self {
            qualifier: qualifier.into(),
            node_property: node_property.into(),
            parent_property: parent_property.into(),
        }
    }
}

/// Navigation property from one entity set to another.
#[derive(Debug, Clone)]
pub struct NavigationDef {
    /// Navigation property name (e.g. `_Products`).
    pub name: String,
    /// Target entity set name.
    pub target_set: String,
    /// Referential constraints: (source property, target property).
    pub constraints: Vec<(String, String)>,
    /// Targets are owned by the source (composition). Draft operations
    /// on the source extend to contained targets.
    pub containment: bool,
}

impl NavigationDef {
    pub fn new(name: impl Into<String>, target_set: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_set: target_set.into(),
            constraints: Vec::new(),
            containment: false,
        }
    }

    /// Add a referential constraint `source.property = target.property`.
    pub fn on(mut self, source_property: impl Into<String>, target_property: impl Into<String>) -> Self {
        self.constraints
            .push((source_property.into(), target_property.into()));
        self
    }

    pub fn containment(mut self) -> Self {
        self.containment = true;
        self
    }
}

/// Entity set definition.
#[derive(Debug, Clone)]
pub struct EntitySetDef {
    /// Entity set name.
    pub name: String,
    /// Business key properties in key order.
    pub key_properties: Vec<String>,
    /// Properties in declaration order.
    pub properties: Vec<PropertyDef>,
    /// Property position lookup by name.
    pub(crate) property_index: HashMap<String, usize>,
    /// Hierarchies by qualifier.
    pub hierarchies: HashMap<String, HierarchyDef>,
    /// Navigation properties by name.
    pub navigations: HashMap<String, NavigationDef>,
    /// Whether records of this set have active/draft versions.
    pub draft_enabled: bool,
}

impl EntitySetDef {
    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDef> {
        self.property_index.get(name).map(|&i| &self.properties[i])
    }

    /// Returns true if the property is declared.
    pub fn has_property(&self, name: &str) -> bool {
        self.property_index.contains_key(name)
    }

    /// Look up a hierarchy by qualifier.
    pub fn hierarchy(&self, qualifier: &str) -> Option<&HierarchyDef> {
        self.hierarchies.get(qualifier)
    }

    /// Look up a navigation property by name.
    pub fn navigation(&self, name: &str) -> Option<&NavigationDef> {
        self.navigations.get(name)
    }

    /// Navigation properties that contain their targets, in name order.
    pub fn contained_navigations(&self) -> Vec<&NavigationDef> {
        let mut navigations: Vec<_> = self
            .navigations
            .values()
            .filter(|nav| nav.containment)
            .collect();
        navigations.sort_by(|a, b| a.name.cmp(&b.name));
        navigations
    }

    /// Returns true if records of this set have draft versions.
    pub fn is_draft_enabled(&self) -> bool {
        self.draft_enabled
    }

    /// Returns true if the property is part of the business key.
    pub fn is_key(&self, name: &str) -> bool {
        self.key_properties.iter().any(|key| key == name)
    }
}
