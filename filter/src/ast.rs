//! Filter expression AST.

use mockd_core::Value;
use std::fmt;

/// Operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
    StartsWith,
    EndsWith,
    MatchesPattern,
}

impl FilterOp {
    /// Comparison operator for an infix keyword (`eq`, `lt`, ...).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "eq" => Some(FilterOp::Eq),
            "ne" => Some(FilterOp::Ne),
            "gt" => Some(FilterOp::Gt),
            "ge" => Some(FilterOp::Ge),
            "lt" => Some(FilterOp::Lt),
            "le" => Some(FilterOp::Le),
            _ => None,
        }
    }

    /// String predicate for a function name (`contains`, `startswith`, ...).
    pub fn from_function(name: &str) -> Option<Self> {
        match name {
            "contains" => Some(FilterOp::Contains),
            "startswith" => Some(FilterOp::StartsWith),
            "endswith" => Some(FilterOp::EndsWith),
            "matchesPattern" => Some(FilterOp::MatchesPattern),
            _ => None,
        }
    }

    /// Operator with its operands swapped (`5 lt Price` is `Price gt 5`).
    pub fn flip(self) -> Self {
        match self {
            FilterOp::Gt => FilterOp::Lt,
            FilterOp::Ge => FilterOp::Le,
            FilterOp::Lt => FilterOp::Gt,
            FilterOp::Le => FilterOp::Ge,
            other => other,
        }
    }

    /// Returns true for the infix comparison operators.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            FilterOp::Eq | FilterOp::Ne | FilterOp::Gt | FilterOp::Ge | FilterOp::Lt | FilterOp::Le
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Ne => "ne",
            FilterOp::Gt => "gt",
            FilterOp::Ge => "ge",
            FilterOp::Lt => "lt",
            FilterOp::Le => "le",
            FilterOp::Contains => "contains",
            FilterOp::StartsWith => "startswith",
            FilterOp::EndsWith => "endswith",
            FilterOp::MatchesPattern => "matchesPattern",
        }
    }
}

/// A single `identifier operator literal` test.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub identifier: String,
    pub operator: FilterOp,
    pub literal: Value,
}

/// A boolean filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    Predicate(Predicate),
    And(Box<FilterExpr>, Box<FilterExpr>),
    Or(Box<FilterExpr>, Box<FilterExpr>),
    Not(Box<FilterExpr>),
}

impl FilterExpr {
    pub fn predicate(
        identifier: impl Into<String>,
        operator: FilterOp,
        literal: impl Into<Value>,
    ) -> Self {
        FilterExpr::Predicate(Predicate {
            identifier: identifier.into(),
            operator,
            literal: literal.into(),
        })
    }

    pub fn and(self, other: FilterExpr) -> Self {
        FilterExpr::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: FilterExpr) -> Self {
        FilterExpr::Or(Box::new(self), Box::new(other))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        FilterExpr::Not(Box::new(self))
    }

    /// Identifiers referenced by the expression, in left-to-right order.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_identifiers(&mut out);
        out
    }

    fn collect_identifiers<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FilterExpr::Predicate(p) => out.push(&p.identifier),
            FilterExpr::And(l, r) | FilterExpr::Or(l, r) => {
                l.collect_identifiers(out);
                r.collect_identifiers(out);
            }
            FilterExpr::Not(inner) => inner.collect_identifiers(out),
        }
    }
}

impl fmt::Display for FilterExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpr::Predicate(p) if p.operator.is_comparison() => {
                write!(f, "{} {} {}", p.identifier, p.operator.as_str(), p.literal)
            }
            FilterExpr::Predicate(p) => {
                write!(f, "{}({},{})", p.operator.as_str(), p.identifier, p.literal)
            }
            FilterExpr::And(l, r) => write!(f, "({} and {})", l, r),
            FilterExpr::Or(l, r) => write!(f, "({} or {})", l, r),
            FilterExpr::Not(inner) => write!(f, "not ({})", inner),
        }
    }
}
