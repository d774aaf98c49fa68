//! AST types for transformation pipelines and resource paths.

use mockd_core::Value;
use mockd_filter::FilterExpr;
use std::fmt;

/// Source location of a token or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

// ==================== TRANSFORMATIONS ====================

/// One step of a transformation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformationStep {
    /// `filter(expr)`
    Filter(FilterExpr),
    /// `ancestors(root, qualifier, nodeProperty, transformations, ...)`
    Ancestors(HierarchyTraversal),
    /// `descendants(root, qualifier, nodeProperty, transformations, ...)`
    Descendants(HierarchyTraversal),
    /// Qualified function call, e.g. `Hierarchy.TopLevels(...)`.
    CustomFunction {
        name: String,
        parameters: Vec<(String, ParamValue)>,
    },
    /// `orderby(prop [asc|desc], ...)`
    OrderBy(Vec<OrderTerm>),
    /// `skip(n)`
    Skip(usize),
    /// `top(n)`
    Top(usize),
}

impl TransformationStep {
    /// Short name of the step kind, for logging.
    pub fn kind(&self) -> &str {
        match self {
            TransformationStep::Filter(_) => "filter",
            TransformationStep::Ancestors(_) => "ancestors",
            TransformationStep::Descendants(_) => "descendants",
            TransformationStep::CustomFunction { name, .. } => name,
            TransformationStep::OrderBy(_) => "orderby",
            TransformationStep::Skip(_) => "skip",
            TransformationStep::Top(_) => "top",
        }
    }

    /// Look up a custom function parameter by name.
    pub fn parameter(&self, key: &str) -> Option<&ParamValue> {
        match self {
            TransformationStep::CustomFunction { parameters, .. } => parameters
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}

/// Arguments shared by `ancestors` and `descendants`.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyTraversal {
    /// Collection the hierarchy is built over (`$root/SalesOrganizations`).
    pub hierarchy_root: ResourcePath,
    /// Hierarchy qualifier.
    pub qualifier: String,
    /// Property holding the node identifier.
    pub node_property: String,
    /// Steps that select the start nodes.
    pub input_transformations: Vec<TransformationStep>,
    /// Maximum number of levels to walk, unlimited when absent.
    pub maximum_distance: Option<u32>,
    /// Whether the start nodes are part of the result.
    pub keep_start: bool,
}

/// Sort direction of an order term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One `property [asc|desc]` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTerm {
    pub property: String,
    pub direction: SortDirection,
}

/// Value of a custom function parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Scalar literal.
    Literal(Value),
    /// Resource path (`$root/SalesOrganizations`).
    Path(ResourcePath),
    /// Decoded `[...]` or `{...}` literal.
    Structured(Value),
}

impl ParamValue {
    /// The literal string, if this is a string literal.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Literal(value) => value.as_str(),
            _ => None,
        }
    }

    /// The value carried by a literal or structured parameter.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ParamValue::Literal(value) | ParamValue::Structured(value) => Some(value),
            ParamValue::Path(_) => None,
        }
    }

    pub fn as_path(&self) -> Option<&ResourcePath> {
        match self {
            ParamValue::Path(path) => Some(path),
            _ => None,
        }
    }
}

// ==================== RESOURCE PATHS ====================

/// Key predicate of a path segment.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyPredicate {
    /// `Set('US')`
    Single(Value),
    /// `Set(ID='US',IsActiveEntity=false)`
    Named(Vec<(String, Value)>),
}

impl KeyPredicate {
    /// Look up a named key value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            KeyPredicate::Single(_) => None,
            KeyPredicate::Named(parts) => parts
                .iter()
                .find(|(part, _)| part == name)
                .map(|(_, value)| value),
        }
    }
}

/// One `/`-separated segment of a resource path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    /// Entity set, navigation property or qualified action name.
    pub name: String,
    pub key: Option<KeyPredicate>,
}

impl PathSegment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
        }
    }

    pub fn with_key(mut self, key: KeyPredicate) -> Self {
        self.key = Some(key);
        self
    }
}

/// A resource path such as `$root/SalesOrganizations(ID='US',IsActiveEntity=false)/_Products`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourcePath {
    /// Written with a leading `$root`.
    pub rooted: bool,
    pub segments: Vec<PathSegment>,
}

impl ResourcePath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self {
            rooted: false,
            segments,
        }
    }

    /// Name of the first segment (the entity set).
    pub fn entity_set(&self) -> Option<&str> {
        self.segments.first().map(|s| s.name.as_str())
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rooted {
            write!(f, "$root")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 || self.rooted {
                write!(f, "/")?;
            }
            write!(f, "{}", segment.name)?;
            match &segment.key {
                None => {}
                Some(KeyPredicate::Single(value)) => write!(f, "({})", value)?,
                Some(KeyPredicate::Named(parts)) => {
                    write!(f, "(")?;
                    for (j, (name, value)) in parts.iter().enumerate() {
                        if j > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{}={}", name, value)?;
                    }
                    write!(f, ")")?;
                }
            }
        }
        Ok(())
    }
}
