//! Configuration for deduplication query generation.
//!
//! [`DedupConfig`] holds the naming parameters of the generated query.
//! [`DedupJob`] is a complete, serde-loadable description of one query:
//! the upstream query text, the request fields and optional naming
//! overrides. Job documents are JSON.

use serde::{Deserialize, Serialize};

use crate::error::DedupSqlError;
use crate::sqlgen::{AggregationRequest, DeduplicateSqlBuilder, Expr, FilterExpression, FilterFunction};

/// Default alias of the derived table wrapping the base query.
pub const DEFAULT_SUBQUERY_ALIAS: &str = "ds";

/// Default alias of the generated ranking column.
pub const DEFAULT_ROW_NUMBER_ALIAS: &str = "_row_num";

/// Naming parameters for the generated query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    pub subquery_alias: String,
    pub row_number_alias: String,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            subquery_alias: DEFAULT_SUBQUERY_ALIAS.to_string(),
            row_number_alias: DEFAULT_ROW_NUMBER_ALIAS.to_string(),
        }
    }
}

impl DedupConfig {
    /// Check that both aliases can be embedded in the generated SQL.
    ///
    /// The ranking alias is wrapped in backticks, so it must not contain
    /// one; the subquery alias is emitted bare, so it must not contain
    /// whitespace either.
    pub fn validate(&self) -> Result<(), DedupSqlError> {
        check_alias(&self.subquery_alias)?;
        check_alias(&self.row_number_alias)?;
        Ok(())
    }
}

fn check_alias(alias: &str) -> Result<(), DedupSqlError> {
    if alias.is_empty() || alias.chars().any(|c| c == '`' || c.is_whitespace()) {
        return Err(DedupSqlError::InvalidIdentifier(alias.to_string()));
    }
    Ok(())
}

/// One selected field of a job document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectField {
    /// Output alias; may be left out only when `expr` is a plain column.
    #[serde(default)]
    pub alias: Option<String>,
    pub expr: String,
}

/// One tie-break field of a job document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    pub expr: String,
    pub function: FilterFunction,
}

/// A complete deduplication job.
///
/// ```json
/// {
///   "base_query": "select * from tbl",
///   "select": [{"alias": "alias_a", "expr": "a"}, {"expr": "c"}],
///   "dedup_on": ["c"],
///   "filter_by": [{"expr": "e", "function": "MAX"}],
///   "row_number_alias": "the_row_number"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupJob {
    pub base_query: String,
    #[serde(default)]
    pub select: Vec<SelectField>,
    #[serde(default)]
    pub dedup_on: Vec<String>,
    #[serde(default)]
    pub filter_by: Vec<FilterField>,
    #[serde(default)]
    pub subquery_alias: Option<String>,
    #[serde(default)]
    pub row_number_alias: Option<String>,
}

impl DedupJob {
    /// Parse a JSON job document.
    pub fn from_json(text: &str) -> Result<Self, DedupSqlError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Naming parameters, with defaults for anything the job leaves out.
    pub fn config(&self) -> DedupConfig {
        let defaults = DedupConfig::default();
        DedupConfig {
            subquery_alias: self
                .subquery_alias
                .clone()
                .unwrap_or(defaults.subquery_alias),
            row_number_alias: self
                .row_number_alias
                .clone()
                .unwrap_or(defaults.row_number_alias),
        }
    }

    /// Compile every expression and build the request.
    pub fn to_request(&self) -> Result<AggregationRequest, DedupSqlError> {
        let mut builder = AggregationRequest::builder();
        for (i, field) in self.select.iter().enumerate() {
            let expr = Expr::compile(&field.expr);
            builder = match &field.alias {
                Some(alias) => builder.select(alias.clone(), expr),
                None if expr.column_name().is_some() => builder.select_expr(expr),
                None => {
                    return Err(DedupSqlError::InvalidArgument(format!(
                        "select[{i}]: expression '{expr}' is not a plain column and needs an alias"
                    )));
                }
            };
        }
        builder
            .dedup_on_all(self.dedup_on.iter().map(|e| Expr::compile(e)))
            .filter_duplicates_by_all(
                self.filter_by
                    .iter()
                    .map(|f| FilterExpression::new(Expr::compile(&f.expr), f.function)),
            )
            .build()
    }

    /// Validate the job and render its deduplication query.
    ///
    /// Select aliases are checked by the request builder; on top of that
    /// none of them may shadow the ranking column, which column-name rules
    /// of the target engine compare case-insensitively.
    pub fn render(&self) -> Result<String, DedupSqlError> {
        if self.base_query.trim().is_empty() {
            return Err(DedupSqlError::InvalidArgument(
                "base_query must not be empty".into(),
            ));
        }
        let config = self.config();
        config.validate()?;
        let request = self.to_request()?;
        if let Some((alias, _)) = request
            .select_fields()
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(&config.row_number_alias))
        {
            return Err(DedupSqlError::DuplicateAlias(alias.clone()));
        }
        Ok(DeduplicateSqlBuilder::new(
            &request,
            &self.base_query,
            &config.subquery_alias,
            &config.row_number_alias,
        )
        .query())
    }
}
