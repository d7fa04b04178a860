//! Deduplication query generation.
//!
//! Turns an [`AggregationRequest`] plus an upstream query into a single
//! statement that keeps one row per partition key:
//!
//! ```text
//! SELECT * EXCEPT(`rn`) FROM (
//!     SELECT <fields> ,
//!            ROW_NUMBER() OVER ( PARTITION BY <keys> ORDER BY <tie-breaks> ) AS `rn`
//!     FROM ( <base query> ) AS <alias>
//! ) WHERE `rn` = 1
//! ```
//!
//! Each tie-break is sorted so the wanted extreme ranks first with NULLs
//! last, so a present value always beats a missing one. The ranking column
//! is dropped from the final projection with `EXCEPT`.
//!
//! Rendering is a pure textual transform: nothing is validated, quoted or
//! re-escaped here beyond backtick-quoting the ranking column alias.

use crate::sqlgen::expr::Expr;
use crate::sqlgen::request::{AggregationRequest, FilterExpression};

/// Separator used between every list item in generated SQL.
pub const LIST_SEPARATOR: &str = " , ";

/// Renders the deduplication query for one request.
#[derive(Debug, Clone, Copy)]
pub struct DeduplicateSqlBuilder<'a> {
    request: &'a AggregationRequest,
    base_query: &'a str,
    subquery_alias: &'a str,
    row_number_alias: &'a str,
}

impl<'a> DeduplicateSqlBuilder<'a> {
    /// Bind a request to the base query and the two generated aliases.
    pub fn new(
        request: &'a AggregationRequest,
        base_query: &'a str,
        subquery_alias: &'a str,
        row_number_alias: &'a str,
    ) -> Self {
        Self {
            request,
            base_query,
            subquery_alias,
            row_number_alias,
        }
    }

    /// The complete deduplication query.
    pub fn query(&self) -> String {
        let rn = quote_backtick(self.row_number_alias);
        let sql = format!(
            "SELECT * EXCEPT({rn}) FROM ({inner}) WHERE {rn} = 1",
            inner = self.inner_select(),
        );
        tracing::debug!(
            select_fields = self.request.select_fields().len(),
            dedup_fields = self.request.dedup_fields().len(),
            filter_fields = self.request.filter_fields().len(),
            sql_len = sql.len(),
            "generated deduplication query"
        );
        sql
    }

    /// The ranked projection over the wrapped base query.
    pub fn inner_select(&self) -> String {
        format!(
            "SELECT {fields} FROM ( {base} ) AS {alias}",
            fields = self.selected_fields(),
            base = self.base_query,
            alias = self.subquery_alias,
        )
    }

    /// `<expr> AS <alias>` for every selected field, followed by the
    /// ranking column.
    pub fn selected_fields(&self) -> String {
        self.request
            .select_fields()
            .iter()
            .map(|(alias, expr)| format!("{} AS {alias}", expr.to_sql()))
            .chain(std::iter::once(self.row_number_column()))
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR)
    }

    /// `ROW_NUMBER() OVER ( ... ) AS `<alias>``.
    ///
    /// An empty partition key or tie-break list drops its keyword entirely.
    pub fn row_number_column(&self) -> String {
        let mut over_parts = Vec::with_capacity(2);
        if !self.request.dedup_fields().is_empty() {
            over_parts.push(format!(
                "PARTITION BY {}",
                partition_by_fields(self.request.dedup_fields())
            ));
        }
        if !self.request.filter_fields().is_empty() {
            over_parts.push(format!(
                "ORDER BY {}",
                order_by_fields(self.request.filter_fields())
            ));
        }

        format!(
            "ROW_NUMBER() OVER ( {} ) AS {}",
            over_parts.join(" "),
            quote_backtick(self.row_number_alias),
        )
    }
}

/// Partition key list, in declaration order.
pub fn partition_by_fields(fields: &[Expr]) -> String {
    fields
        .iter()
        .map(|e| e.to_sql())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Tie-break list, primary key first.
pub fn order_by_fields(fields: &[FilterExpression]) -> String {
    fields
        .iter()
        .map(order_by_field)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// `MAX` sorts descending and `MIN` ascending, both with NULLs last.
pub fn order_by_field(field: &FilterExpression) -> String {
    format!(
        "{} {} NULLS LAST",
        field.expression.to_sql(),
        field.function.sort_direction(),
    )
}

/// Wrap an identifier in backticks.
pub fn quote_backtick(name: &str) -> String {
    format!("`{name}`")
}
