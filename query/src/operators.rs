//! Row-set operators shared by pipeline steps and query options.
//!
//! Every operator preserves the relative order of the rows it keeps.

use mockd_core::names::IS_ACTIVE_ENTITY;
use mockd_core::{Record, Value};
use mockd_filter::{CompiledFilter, FilterError, FilterExpr};
use mockd_parser::{OrderTerm, SortDirection};
use mockd_registry::EntitySetDef;
use std::cmp::Ordering;

use crate::QueryResult;

/// Keep rows matching `expr`.
pub fn filter_rows(mut rows: Vec<Record>, expr: &FilterExpr, entity_set: &EntitySetDef) -> QueryResult<Vec<Record>> {
    let filter = CompiledFilter::compile(expr, entity_set)?;
    filter.retain(&mut rows);
    Ok(rows)
}

/// Stable sort by the given terms; missing values sort as null.
pub fn order_rows(rows: &mut [Record], terms: &[OrderTerm], entity_set: &EntitySetDef) -> QueryResult<()> {
    for term in terms {
        if !entity_set.has_property(&term.property) {
            return Err(FilterError::unknown_property(&term.property, &entity_set.name).into());
        }
    }

    rows.sort_by(|a, b| {
        for term in terms {
            let left = a.get(&term.property).unwrap_or(&Value::Null);
            let right = b.get(&term.property).unwrap_or(&Value::Null);
            let cmp = left.cmp_sortable(right);
            if cmp != Ordering::Equal {
                return match term.direction {
                    SortDirection::Asc => cmp,
                    SortDirection::Desc => cmp.reverse(),
                };
            }
        }
        Ordering::Equal
    });
    Ok(())
}

pub fn skip_rows(rows: Vec<Record>, count: usize) -> Vec<Record> {
    rows.into_iter().skip(count).collect()
}

pub fn top_rows(mut rows: Vec<Record>, count: usize) -> Vec<Record> {
    rows.truncate(count);
    rows
}

/// Project rows onto `names`, always keeping key properties and the
/// active flag.
pub fn select_rows(rows: Vec<Record>, names: &[String], entity_set: &EntitySetDef) -> QueryResult<Vec<Record>> {
    if names.iter().any(|name| name == "*") {
        return Ok(rows);
    }
    for name in names {
        if !entity_set.has_property(name) {
            return Err(FilterError::unknown_property(name, &entity_set.name).into());
        }
    }

    let mut kept: Vec<String> = entity_set.key_properties.clone();
    kept.push(IS_ACTIVE_ENTITY.to_string());
    for name in names {
        if !kept.contains(name) {
            kept.push(name.clone());
        }
    }
    Ok(rows.iter().map(|row| row.project(&kept)).collect())
}
