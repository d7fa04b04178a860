//! Compiled scalar expressions.
//!
//! An [`Expr`] is the already-compiled form of a field reference or scalar
//! expression. Rendering is verbatim: [`Expr::to_sql`] never adds quoting
//! or escaping, so whatever text went in is exactly what gets embedded in
//! the generated query.

use std::fmt;

/// A compiled field reference or scalar expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A plain column, optionally qualified by the relation it comes from.
    ColumnRef {
        table_alias: Option<String>,
        column_name: String,
    },
    /// Any other scalar expression, kept as written (`LOWER(x)`, `a + 1`).
    Raw(String),
}

impl Expr {
    /// Compile expression text.
    ///
    /// A bare identifier or a dotted `table.column` pair becomes a
    /// [`Expr::ColumnRef`]; anything else is kept as [`Expr::Raw`].
    /// Compilation never fails and never rewrites the text beyond trimming
    /// surrounding whitespace.
    pub fn compile(text: &str) -> Expr {
        let text = text.trim();
        let mut parts = text.split('.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(col), None, None) if is_plain_identifier(col) => Expr::ColumnRef {
                table_alias: None,
                column_name: col.to_string(),
            },
            (Some(tbl), Some(col), None)
                if is_plain_identifier(tbl) && is_plain_identifier(col) =>
            {
                Expr::ColumnRef {
                    table_alias: Some(tbl.to_string()),
                    column_name: col.to_string(),
                }
            }
            _ => Expr::Raw(text.to_string()),
        }
    }

    /// The SQL fragment embedded in generated queries.
    pub fn to_sql(&self) -> String {
        match self {
            Expr::ColumnRef {
                table_alias: Some(rel),
                column_name,
            } => format!("{rel}.{column_name}"),
            Expr::ColumnRef { column_name, .. } => column_name.clone(),
            Expr::Raw(sql) => sql.clone(),
        }
    }

    /// Name the column carries once projected out of a derived table.
    ///
    /// Only plain columns have one; `None` for anything else.
    pub fn column_name(&self) -> Option<&str> {
        match self {
            Expr::ColumnRef { column_name, .. } => Some(column_name),
            Expr::Raw(_) => None,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub(crate) fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlgen::test_helpers::*;

    #[test]
    fn test_compile_bare_column() {
        assert_eq!(Expr::compile("a"), colref("a"));
        assert_eq!(Expr::compile("  event_ts "), colref("event_ts"));
    }

    #[test]
    fn test_compile_qualified_column() {
        assert_eq!(Expr::compile("ds.user_id"), qcolref("ds", "user_id"));
        assert_eq!(Expr::compile("ds.user_id").to_sql(), "ds.user_id");
    }

    #[test]
    fn test_compile_falls_back_to_raw() {
        assert_eq!(
            Expr::compile("TIMESTAMP_MILLIS(ts)"),
            Expr::Raw("TIMESTAMP_MILLIS(ts)".to_string())
        );
        assert_eq!(Expr::compile("`my col`"), Expr::Raw("`my col`".to_string()));
        assert_eq!(Expr::compile("a.b.c"), Expr::Raw("a.b.c".to_string()));
        assert_eq!(Expr::compile("1abc"), Expr::Raw("1abc".to_string()));
        assert_eq!(Expr::compile(""), Expr::Raw(String::new()));
    }

    #[test]
    fn test_to_sql_is_verbatim() {
        // No quoting is ever added.
        assert_eq!(Expr::compile("`weird name`").to_sql(), "`weird name`");
        assert_eq!(Expr::compile("COALESCE(a, 0)").to_sql(), "COALESCE(a, 0)");
        assert_eq!(Expr::compile("(a + t.b)").to_string(), "(a + t.b)");
    }

    #[test]
    fn test_column_name() {
        assert_eq!(qcolref("t", "c").column_name(), Some("c"));
        assert_eq!(colref("c").column_name(), Some("c"));
        assert_eq!(Expr::compile("LOWER(x)").column_name(), None);
    }

    #[test]
    fn test_is_plain_identifier() {
        assert!(is_plain_identifier("_row_num"));
        assert!(is_plain_identifier("alias_a1"));
        assert!(!is_plain_identifier("bad alias"));
        assert!(!is_plain_identifier("LOWER(x)"));
        assert!(!is_plain_identifier("r`n"));
        assert!(!is_plain_identifier(""));
    }
}
