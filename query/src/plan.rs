//! Resolution of qualified function calls into known hierarchy functions.

use mockd_core::{KeyValue, Value};
use mockd_hierarchy::{ExpandLevel, TopLevelsParams};
use mockd_parser::{ParamValue, ResourcePath};
use mockd_registry::{Registry, HIERARCHY_VOCABULARY};

use crate::{QueryError, QueryResult};

const TOP_LEVELS: &str = "TopLevels";

/// A custom function the evaluator knows how to run.
#[derive(Debug, Clone, PartialEq)]
pub enum HierarchyFunction {
    TopLevels(TopLevelsCall),
}

/// Validated arguments of `Hierarchy.TopLevels`.
#[derive(Debug, Clone, PartialEq)]
pub struct TopLevelsCall {
    pub qualifier: String,
    pub node_property: String,
    /// Collection whose schema declares the hierarchy; the current one when absent.
    pub hierarchy_nodes: Option<ResourcePath>,
    pub params: TopLevelsParams,
}

impl HierarchyFunction {
    /// Resolve a qualified function name (aliases expanded through the
    /// registry) and validate its parameters.
    pub fn resolve(registry: &Registry, name: &str, parameters: &[(String, ParamValue)]) -> QueryResult<Self> {
        let full_name = registry.resolve_qualified_name(name);
        match full_name.rsplit_once('.') {
            Some((HIERARCHY_VOCABULARY, TOP_LEVELS)) => {
                let args = Arguments { function: name, parameters };
                Ok(HierarchyFunction::TopLevels(TopLevelsCall {
                    qualifier: args.required_str("HierarchyQualifier")?.to_string(),
                    node_property: args.required_str("NodeProperty")?.to_string(),
                    hierarchy_nodes: args.optional_path("HierarchyNodes")?,
                    params: TopLevelsParams {
                        levels: args.optional_levels("Levels")?,
                        expand_levels: args.expand_levels("ExpandLevels")?,
                    },
                }))
            }
            _ => Err(QueryError::unsupported_transformation(name)),
        }
    }
}

struct Arguments<'a> {
    function: &'a str,
    parameters: &'a [(String, ParamValue)],
}

impl Arguments<'_> {
    fn get(&self, name: &str) -> Option<&ParamValue> {
        self.parameters
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    fn invalid(&self, parameter: &str, message: impl Into<String>) -> QueryError {
        QueryError::invalid_parameter(self.function, parameter, message)
    }

    fn required_str(&self, name: &str) -> QueryResult<&str> {
        let value = self
            .get(name)
            .ok_or_else(|| QueryError::missing_parameter(self.function, name))?;
        value.as_str().ok_or_else(|| self.invalid(name, "expected a string"))
    }

    fn optional_path(&self, name: &str) -> QueryResult<Option<ResourcePath>> {
        match self.get(name) {
            None => Ok(None),
            Some(ParamValue::Path(path)) => Ok(Some(path.clone())),
            Some(_) => Err(self.invalid(name, "expected a resource path")),
        }
    }

    fn optional_levels(&self, name: &str) -> QueryResult<Option<u32>> {
        match self.get(name).and_then(ParamValue::as_value) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => self.levels(name, value).map(Some),
        }
    }

    fn levels(&self, name: &str, value: &Value) -> QueryResult<u32> {
        value
            .as_int()
            .and_then(|levels| u32::try_from(levels).ok())
            .ok_or_else(|| self.invalid(name, format!("expected a non-negative integer, found {}", value)))
    }

    /// `[{"NodeID": ..., "Levels": n | null}, ...]`
    fn expand_levels(&self, name: &str) -> QueryResult<Vec<ExpandLevel>> {
        let Some(param) = self.get(name) else {
            return Ok(Vec::new());
        };
        let Some(Value::List(items)) = param.as_value() else {
            return Err(self.invalid(name, "expected a list"));
        };

        let mut expand_levels = Vec::with_capacity(items.len());
        for item in items {
            let entry = item
                .as_object()
                .ok_or_else(|| self.invalid(name, "entries must be objects"))?;
            let node_id = entry
                .get("NodeID")
                .and_then(KeyValue::from_value)
                .ok_or_else(|| self.invalid(name, "entry without a valid NodeID"))?;
            let levels = match entry.get("Levels") {
                None | Some(Value::Null) => None,
                Some(value) => Some(self.levels(name, value)?),
            };
            expand_levels.push(ExpandLevel { node_id, levels });
        }
        Ok(expand_levels)
    }
}
