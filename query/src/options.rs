//! System query options applied after the pipeline.

use mockd_core::Record;
use mockd_filter::FilterExpr;
use mockd_parser::{parse_apply, parse_filter, parse_orderby, OrderTerm, TransformationStep};
use mockd_registry::EntitySetDef;

use crate::operators::{filter_rows, order_rows, select_rows, skip_rows, top_rows};
use crate::{QueryError, QueryResult};

/// Parsed `$apply $filter $orderby $count $skip $top $select`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub apply: Vec<TransformationStep>,
    pub filter: Option<FilterExpr>,
    pub orderby: Vec<OrderTerm>,
    pub count: bool,
    pub skip: Option<usize>,
    pub top: Option<usize>,
    pub select: Option<Vec<String>>,
}

/// Rows left after the options, with the total before paging when `$count` was asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage {
    pub rows: Vec<Record>,
    pub count: Option<usize>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse decoded `name=value` pairs. Unknown options are ignored; a
    /// repeated option replaces the earlier one.
    pub fn parse<'p>(pairs: impl IntoIterator<Item = (&'p str, &'p str)>) -> QueryResult<Self> {
        let mut options = Self::new();
        for (name, value) in pairs {
            match name {
                "$apply" => options.apply = parse_apply(value)?,
                "$filter" => options.filter = Some(parse_filter(value)?),
                "$orderby" => options.orderby = parse_orderby(value)?,
                "$count" => options.count = parse_flag(name, value)?,
                "$skip" => options.skip = Some(parse_count(name, value)?),
                "$top" => options.top = Some(parse_count(name, value)?),
                "$select" => {
                    options.select = Some(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|name| !name.is_empty())
                            .map(String::from)
                            .collect(),
                    )
                }
                _ => tracing::debug!(option = name, "ignoring query option"),
            }
        }
        Ok(options)
    }

    /// Cap `$top` at `max` (also applies when no `$top` was given).
    pub fn with_page_limit(mut self, max: Option<usize>) -> Self {
        if let Some(max) = max {
            self.top = Some(self.top.map_or(max, |top| top.min(max)));
        }
        self
    }

    /// Apply filter, order, count, paging and projection in that order.
    pub fn apply(&self, rows: Vec<Record>, entity_set: &EntitySetDef) -> QueryResult<QueryPage> {
        let mut rows = match &self.filter {
            Some(expr) => filter_rows(rows, expr, entity_set)?,
            None => rows,
        };
        if !self.orderby.is_empty() {
            order_rows(&mut rows, &self.orderby, entity_set)?;
        }
        let count = self.count.then_some(rows.len());
        if let Some(skip) = self.skip {
            rows = skip_rows(rows, skip);
        }
        if let Some(top) = self.top {
            rows = top_rows(rows, top);
        }
        if let Some(names) = &self.select {
            rows = select_rows(rows, names, entity_set)?;
        }
        Ok(QueryPage { rows, count })
    }
}

fn parse_flag(name: &str, value: &str) -> QueryResult<bool> {
    value
        .parse()
        .map_err(|_| QueryError::invalid_parameter("query", name, format!("expected true or false, found '{}'", value)))
}

fn parse_count(name: &str, value: &str) -> QueryResult<usize> {
    value.trim().parse().map_err(|_| {
        QueryError::invalid_parameter("query", name, format!("expected a non-negative integer, found '{}'", value))
    })
}
