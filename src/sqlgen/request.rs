//! Deduplication aggregation requests.
//!
//! An [`AggregationRequest`] describes what to project, which fields define
//! a duplicate group, and how to break ties inside a group. It is assembled
//! once through [`AggregationRequestBuilder`] and is immutable afterwards.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DedupSqlError;
use crate::sqlgen::expr::{Expr, is_plain_identifier};

/// Which extreme of a tie-break field identifies the surviving row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterFunction {
    Max,
    Min,
}

impl FilterFunction {
    /// Sort direction that ranks the wanted extreme first.
    pub fn sort_direction(&self) -> &'static str {
        match self {
            FilterFunction::Max => "DESC",
            FilterFunction::Min => "ASC",
        }
    }
}

impl fmt::Display for FilterFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterFunction::Max => write!(f, "MAX"),
            FilterFunction::Min => write!(f, "MIN"),
        }
    }
}

impl FromStr for FilterFunction {
    type Err = DedupSqlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MAX" => Ok(FilterFunction::Max),
            "MIN" => Ok(FilterFunction::Min),
            other => Err(DedupSqlError::InvalidArgument(format!(
                "unknown filter function '{other}', expected MAX or MIN"
            ))),
        }
    }
}

/// One tie-break key: an expression plus the extreme that wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression {
    pub expression: Expr,
    pub function: FilterFunction,
}

impl FilterExpression {
    /// Pair an expression with the extreme that wins.
    pub fn new(expression: Expr, function: FilterFunction) -> Self {
        Self {
            expression,
            function,
        }
    }

    /// Keep the row holding the largest value.
    pub fn max(expression: Expr) -> Self {
        Self::new(expression, FilterFunction::Max)
    }

    /// Keep the row holding the smallest value.
    pub fn min(expression: Expr) -> Self {
        Self::new(expression, FilterFunction::Min)
    }
}

/// An immutable "pick one row per key" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationRequest {
    select_fields: Vec<(String, Expr)>,
    dedup_fields: Vec<Expr>,
    filter_fields: Vec<FilterExpression>,
}

impl AggregationRequest {
    /// Start an empty request.
    pub fn builder() -> AggregationRequestBuilder {
        AggregationRequestBuilder::default()
    }

    /// Output alias → expression, in output column order.
    pub fn select_fields(&self) -> &[(String, Expr)] {
        &self.select_fields
    }

    /// Partition key, in the order it was declared.
    pub fn dedup_fields(&self) -> &[Expr] {
        &self.dedup_fields
    }

    /// Tie-break keys, highest precedence first.
    pub fn filter_fields(&self) -> &[FilterExpression] {
        &self.filter_fields
    }
}

/// Accumulates the parts of an [`AggregationRequest`].
#[derive(Debug, Clone, Default)]
pub struct AggregationRequestBuilder {
    /// `None` alias: project under the column's own name.
    select_fields: Vec<(Option<String>, Expr)>,
    dedup_fields: Vec<Expr>,
    filter_fields: Vec<FilterExpression>,
}

impl AggregationRequestBuilder {
    /// Project `expr` under `alias`.
    pub fn select(mut self, alias: impl Into<String>, expr: Expr) -> Self {
        self.select_fields.push((Some(alias.into()), expr));
        self
    }

    /// Project a plain column under its own name.
    ///
    /// Any other expression has no usable name and makes [`build`](Self::build)
    /// fail; give it an alias with [`select`](Self::select) instead.
    pub fn select_expr(mut self, expr: Expr) -> Self {
        self.select_fields.push((None, expr));
        self
    }

    /// Project every `(alias, expr)` pair, in iteration order.
    pub fn select_all<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Expr)>,
        S: Into<String>,
    {
        self.select_fields
            .extend(fields.into_iter().map(|(alias, expr)| (Some(alias.into()), expr)));
        self
    }

    /// Add one field to the partition key.
    pub fn dedup_on(mut self, expr: Expr) -> Self {
        self.dedup_fields.push(expr);
        self
    }

    /// Add several fields to the partition key, in iteration order.
    pub fn dedup_on_all(mut self, exprs: impl IntoIterator<Item = Expr>) -> Self {
        self.dedup_fields.extend(exprs);
        self
    }

    /// Add a tie-break key below the ones already added.
    pub fn filter_duplicates_by(mut self, filter: FilterExpression) -> Self {
        self.filter_fields.push(filter);
        self
    }

    /// Add several tie-break keys, highest precedence first.
    pub fn filter_duplicates_by_all(
        mut self,
        filters: impl IntoIterator<Item = FilterExpression>,
    ) -> Self {
        self.filter_fields.extend(filters);
        self
    }

    /// Freeze the request.
    ///
    /// Every select alias must be a plain identifier (`[A-Za-z_][A-Za-z0-9_]*`),
    /// since aliases are emitted unquoted, and must be unique. Unaliased
    /// selects must be plain columns. A missing tie-break list is rejected.
    /// An empty partition key is accepted: the whole input then forms a
    /// single duplicate group.
    pub fn build(self) -> Result<AggregationRequest, DedupSqlError> {
        let mut select_fields = Vec::with_capacity(self.select_fields.len());
        for (alias, expr) in self.select_fields {
            let alias = match alias {
                Some(alias) => alias,
                None => match expr.column_name() {
                    Some(name) => name.to_string(),
                    None => {
                        return Err(DedupSqlError::InvalidArgument(format!(
                            "expression '{expr}' needs an explicit alias"
                        )));
                    }
                },
            };
            if alias.is_empty() {
                return Err(DedupSqlError::InvalidArgument(
                    "select alias must not be empty".into(),
                ));
            }
            if !is_plain_identifier(&alias) {
                return Err(DedupSqlError::InvalidIdentifier(alias));
            }
            select_fields.push((alias, expr));
        }

        let mut seen = HashSet::with_capacity(select_fields.len());
        for (alias, _) in &select_fields {
            if !seen.insert(alias.as_str()) {
                return Err(DedupSqlError::DuplicateAlias(alias.clone()));
            }
        }

        if self.filter_fields.is_empty() {
            return Err(DedupSqlError::InvalidArgument(
                "at least one filter field is required to rank duplicates".into(),
            ));
        }

        if self.dedup_fields.is_empty() {
            tracing::warn!(
                "deduplication request has no dedup fields; all rows form one group"
            );
        }

        Ok(AggregationRequest {
            select_fields,
            dedup_fields: self.dedup_fields,
            filter_fields: self.filter_fields,
        })
    }
}
