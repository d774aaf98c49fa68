//! Filter compilation.
//!
//! Resolves identifiers against the entity set, coerces literals to the
//! declared property types and compiles regular expressions, so evaluation
//! itself can never fail.

use crate::{FilterError, FilterExpr, FilterOp, FilterResult, Predicate};
use mockd_core::{parse_date, parse_date_time, Value};
use mockd_registry::{EntitySetDef, PropertyType};
use regex_lite::Regex;

/// A filter ready for evaluation against records of one entity set.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    pub(crate) root: FilterNode,
}

#[derive(Debug, Clone)]
pub(crate) enum FilterNode {
    Compare {
        property: String,
        property_type: PropertyType,
        op: FilterOp,
        value: Value,
    },
    Text {
        property: String,
        op: FilterOp,
        needle: String,
    },
    Pattern {
        property: String,
        regex: Regex,
    },
    And(Box<FilterNode>, Box<FilterNode>),
    Or(Box<FilterNode>, Box<FilterNode>),
    Not(Box<FilterNode>),
}

impl CompiledFilter {
    /// Compile an expression against an entity set.
    pub fn compile(expr: &FilterExpr, entity_set: &EntitySetDef) -> FilterResult<Self> {
        let root = compile_node(expr, entity_set)?;
        tracing::trace!(entity_set = %entity_set.name, filter = %expr, "compiled filter");
        Ok(Self { root })
    }
}

fn compile_node(expr: &FilterExpr, entity_set: &EntitySetDef) -> FilterResult<FilterNode> {
    match expr {
        FilterExpr::Predicate(predicate) => compile_predicate(predicate, entity_set),
        FilterExpr::And(l, r) => Ok(FilterNode::And(
            Box::new(compile_node(l, entity_set)?),
            Box::new(compile_node(r, entity_set)?),
        )),
        FilterExpr::Or(l, r) => Ok(FilterNode::Or(
            Box::new(compile_node(l, entity_set)?),
            Box::new(compile_node(r, entity_set)?),
        )),
        FilterExpr::Not(inner) => Ok(FilterNode::Not(Box::new(compile_node(inner, entity_set)?))),
    }
}

fn compile_predicate(predicate: &Predicate, entity_set: &EntitySetDef) -> FilterResult<FilterNode> {
    let property = entity_set
        .property(&predicate.identifier)
        .ok_or_else(|| FilterError::unknown_property(&predicate.identifier, &entity_set.name))?;
    let name = property.name.clone();

    match predicate.operator {
        op if op.is_comparison() => {
            let value = coerce_literal(&name, property.property_type, &predicate.literal)?;
            Ok(FilterNode::Compare {
                property: name,
                property_type: property.property_type,
                op,
                value,
            })
        }
        FilterOp::MatchesPattern => {
            let pattern = text_operand(&name, property.property_type, &predicate.literal)?;
            let regex = Regex::new(&pattern)
                .map_err(|e| FilterError::invalid_pattern(&pattern, e.to_string()))?;
            Ok(FilterNode::Pattern {
                property: name,
                regex,
            })
        }
        op => {
            let needle = text_operand(&name, property.property_type, &predicate.literal)?;
            Ok(FilterNode::Text {
                property: name,
                op,
                needle,
            })
        }
    }
}

/// String functions only apply to textual properties with a string literal.
fn text_operand(property: &str, property_type: PropertyType, literal: &Value) -> FilterResult<String> {
    if !matches!(property_type, PropertyType::String | PropertyType::Guid) {
        return Err(FilterError::type_mismatch(
            property,
            PropertyType::String.name(),
            property_type.name(),
        ));
    }
    match literal {
        Value::String(s) => Ok(s.clone()),
        other => Err(FilterError::type_mismatch(
            property,
            PropertyType::String.name(),
            other.type_name(),
        )),
    }
}

/// Coerce a literal to the declared property type. Null is valid for any type.
fn coerce_literal(property: &str, property_type: PropertyType, literal: &Value) -> FilterResult<Value> {
    let mismatch = || FilterError::type_mismatch(property, property_type.name(), literal.type_name());

    match (property_type, literal) {
        (_, Value::Null) => Ok(Value::Null),
        (PropertyType::String | PropertyType::Guid, Value::String(_)) => Ok(literal.clone()),
        (PropertyType::Int, Value::Int(_)) => Ok(literal.clone()),
        (PropertyType::Decimal, Value::Int(_) | Value::Decimal(_)) => literal
            .as_decimal()
            .map(Value::Decimal)
            .ok_or_else(mismatch),
        (PropertyType::Boolean, Value::Bool(_)) => Ok(literal.clone()),
        (PropertyType::Date, Value::Date(_)) => Ok(literal.clone()),
        (PropertyType::Date, Value::String(text)) => {
            parse_date(text).map(Value::Date).map_err(|_| mismatch())
        }
        (PropertyType::DateTimeOffset, Value::DateTimeOffset(_)) => Ok(literal.clone()),
        (PropertyType::DateTimeOffset, Value::Date(days)) => {
            Ok(Value::DateTimeOffset(days * 86_400_000))
        }
        (PropertyType::DateTimeOffset, Value::String(text)) => parse_date_time(text)
            .map(Value::DateTimeOffset)
            .map_err(|_| mismatch()),
        _ => Err(mismatch()),
    }
}

/// Bring a stored property value into the representation literals were
/// coerced to. Fixture data often carries dates as strings.
pub(crate) fn normalize_stored(property_type: PropertyType, value: &Value) -> Option<Value> {
    match (property_type, value) {
        (PropertyType::Date, Value::String(text)) => parse_date(text).ok().map(Value::Date),
        (PropertyType::DateTimeOffset, Value::String(text)) => {
            parse_date_time(text).ok().map(Value::DateTimeOffset)
        }
        (PropertyType::Decimal, Value::Int(i)) => Some(Value::Decimal(*i as f64)),
        _ => None,
    }
}
