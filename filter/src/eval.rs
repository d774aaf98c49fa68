//! Filter evaluation.

use crate::compile::{normalize_stored, FilterNode};
use crate::{CompiledFilter, FilterExpr, FilterOp, FilterResult};
use mockd_core::{Record, Value};
use mockd_registry::EntitySetDef;
use std::cmp::Ordering;

impl CompiledFilter {
    /// Test a record against the filter.
    ///
    /// Missing properties read as null. `eq null` matches null values,
    /// ordering comparisons involving null never match.
    pub fn matches(&self, record: &Record) -> bool {
        eval_node(&self.root, record)
    }

    /// Keep the records that match, preserving order.
    pub fn retain(&self, rows: &mut Vec<Record>) {
        rows.retain(|row| self.matches(row));
    }
}

/// Compile and evaluate an expression against one record.
pub fn evaluate(expr: &FilterExpr, entity_set: &EntitySetDef, record: &Record) -> FilterResult<bool> {
    Ok(CompiledFilter::compile(expr, entity_set)?.matches(record))
}

fn eval_node(node: &FilterNode, record: &Record) -> bool {
    match node {
        FilterNode::Compare {
            property,
            property_type,
            op,
            value,
        } => {
            let stored = record.get(property).unwrap_or(&Value::Null);
            let normalized = normalize_stored(*property_type, stored);
            compare(*op, normalized.as_ref().unwrap_or(stored), value)
        }
        FilterNode::Text {
            property,
            op,
            needle,
        } => match record.get(property).and_then(Value::as_str) {
            Some(text) => match op {
                FilterOp::Contains => text.contains(needle.as_str()),
                FilterOp::StartsWith => text.starts_with(needle.as_str()),
                FilterOp::EndsWith => text.ends_with(needle.as_str()),
                _ => false,
            },
            None => false,
        },
        FilterNode::Pattern { property, regex } => record
            .get(property)
            .and_then(Value::as_str)
            .is_some_and(|text| regex.is_match(text)),
        FilterNode::And(l, r) => eval_node(l, record) && eval_node(r, record),
        FilterNode::Or(l, r) => eval_node(l, record) || eval_node(r, record),
        FilterNode::Not(inner) => !eval_node(inner, record),
    }
}

fn compare(op: FilterOp, stored: &Value, literal: &Value) -> bool {
    if stored.is_null() || literal.is_null() {
        let both_null = stored.is_null() && literal.is_null();
        return match op {
            FilterOp::Eq => both_null,
            FilterOp::Ne => !both_null,
            _ => false,
        };
    }

    let ordering = stored.compare(literal);
    match op {
        FilterOp::Eq => ordering == Some(Ordering::Equal),
        FilterOp::Ne => ordering != Some(Ordering::Equal),
        FilterOp::Gt => ordering == Some(Ordering::Greater),
        FilterOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        FilterOp::Lt => ordering == Some(Ordering::Less),
        FilterOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        _ => false,
    }
}
