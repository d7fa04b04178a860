//! sqlengine_dedup — deduplication queries for analytical SQL engines.
//!
//! Translates a "pick one row per key" request into a single query built
//! around a `ROW_NUMBER()` window: rows are partitioned by the dedup key,
//! ranked by the tie-break fields, and only the first-ranked row of each
//! partition survives. The target dialect supports `NULLS LAST` ordering
//! and `SELECT * EXCEPT(col)` projection.
//!
//! ```
//! use sqlengine_dedup::sqlgen::{AggregationRequest, DeduplicateSqlBuilder, Expr, FilterExpression};
//!
//! let request = AggregationRequest::builder()
//!     .select_expr(Expr::compile("id"))
//!     .select_expr(Expr::compile("updated_at"))
//!     .dedup_on(Expr::compile("id"))
//!     .filter_duplicates_by(FilterExpression::max(Expr::compile("updated_at")))
//!     .build()
//!     .unwrap();
//!
//! let sql = DeduplicateSqlBuilder::new(&request, "select * from events", "ds", "rn").query();
//! assert!(sql.ends_with("WHERE `rn` = 1"));
//! ```

pub mod config;
pub mod error;
pub mod sqlgen;
