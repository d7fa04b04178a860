//! Deduplication SQL generation.
//!
//! - [`expr`] — compiled scalar expressions and their SQL rendering.
//! - [`request`] — the immutable "pick one row per key" request.
//! - [`dedup`] — the `ROW_NUMBER()`-based query builder.

pub mod dedup;
pub mod expr;
pub mod request;
#[cfg(test)]
pub(crate) mod test_helpers;

pub use dedup::DeduplicateSqlBuilder;
pub use expr::Expr;
pub use request::{AggregationRequest, AggregationRequestBuilder, FilterExpression, FilterFunction};
