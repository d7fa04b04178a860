//! Shared test helpers for SQL generation unit tests.

use crate::sqlgen::expr::Expr;
use crate::sqlgen::request::{AggregationRequest, FilterExpression};

// ── Expr builders ───────────────────────────────────────────────────────

/// Build an unqualified `ColumnRef`.
pub fn colref(name: &str) -> Expr {
    Expr::ColumnRef {
        table_alias: None,
        column_name: name.to_string(),
    }
}

/// Build a qualified `ColumnRef`.
pub fn qcolref(table: &str, name: &str) -> Expr {
    Expr::ColumnRef {
        table_alias: Some(table.to_string()),
        column_name: name.to_string(),
    }
}

// ── Request builders ────────────────────────────────────────────────────

/// Six selected fields, dedup on `c, d, e`, keep max `e` then min `f`.
pub fn req_abcdef() -> AggregationRequest {
    AggregationRequest::builder()
        .select("alias_a", colref("a"))
        .select("alias_b", colref("b"))
        .select("c", colref("c"))
        .select("d", colref("d"))
        .select("e", colref("e"))
        .select("f", colref("f"))
        .dedup_on_all([colref("c"), colref("d"), colref("e")])
        .filter_duplicates_by(FilterExpression::max(colref("e")))
        .filter_duplicates_by(FilterExpression::min(colref("f")))
        .build()
        .unwrap()
}

// ── Assertion helpers ───────────────────────────────────────────────────

/// Assert that the generated SQL contains a substring (case-sensitive).
pub fn assert_sql_contains(sql: &str, expected: &str) {
    assert!(
        sql.contains(expected),
        "Expected SQL to contain:\n  {expected}\nGot:\n  {sql}",
    );
}

/// Assert that the generated SQL does NOT contain a substring (case-sensitive).
pub fn assert_sql_not_contains(sql: &str, unexpected: &str) {
    assert!(
        !sql.contains(unexpected),
        "Expected SQL NOT to contain:\n  {unexpected}\nGot:\n  {sql}",
    );
}
