//! Best-effort reconstruction of a literal SQL string for log output.
//!
//! Substitutes bound values into placeholder positions, first textual match
//! per parameter, in parameter order. Diagnostic output only: values
//! containing quote characters are not escaped and the result is not
//! guaranteed to be valid SQL. Never used for execution.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt::Write as _;

use crate::params::ParamSet;
use crate::value::SqlValue;

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").expect("static regex");
}

/// Replace placeholders in `sql` with rendered parameter values.
///
/// Positional values consume successive `?` occurrences; named values replace
/// the first occurrence of their `:name` token (a name that never appears is
/// simply left unsubstituted).
#[must_use]
pub fn interpolate_query(sql: &str, params: &ParamSet) -> String {
    match params {
        ParamSet::Positional(values) => {
            let mut out = sql.to_string();
            for value in values {
                out = out.replacen('?', &render_value(value), 1);
            }
            out
        }
        ParamSet::Named(pairs) => {
            let mut out = sql.to_string();
            for (name, value) in pairs {
                out = out.replacen(&format!(":{name}"), &render_value(value), 1);
            }
            out
        }
    }
}

/// Collapse runs of whitespace to single spaces and trim, so a multi-line
/// statement logs as one line.
#[must_use]
pub fn collapse_whitespace(sql: &str) -> String {
    WHITESPACE_RE.replace_all(sql, " ").trim().to_string()
}

fn render_value(value: &SqlValue) -> String {
    match value {
        SqlValue::Int(i) => i.to_string(),
        SqlValue::Float(f) => f.to_string(),
        SqlValue::Bool(b) => i64::from(*b).to_string(),
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Text(s) => format!("'{s}'"),
        SqlValue::Timestamp(dt) => format!("'{}'", dt.format("%F %T%.f")),
        SqlValue::Json(jval) => format!("'{jval}'"),
        SqlValue::Blob(bytes) => {
            let mut out = String::with_capacity(bytes.len() * 2 + 3);
            out.push_str("X'");
            for b in bytes {
                let _ = write!(out, "{b:02x}");
            }
            out.push('\'');
            out
        }
        SqlValue::List(items) => items
            .iter()
            .map(|item| format!("'{}'", render_bare(item)))
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn render_bare(value: &SqlValue) -> String {
    match value {
        SqlValue::Text(s) => s.clone(),
        SqlValue::Null => "NULL".to_string(),
        other => render_value(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_int_renders_bare() {
        let sql = interpolate_query(
            "SELECT * FROM t WHERE id = ?",
            &ParamSet::positional(vec![SqlValue::Int(5)]),
        );
        assert_eq!(sql, "SELECT * FROM t WHERE id = 5");
    }

    #[test]
    fn named_text_renders_quoted_even_with_embedded_quote() {
        let sql = interpolate_query(
            "SELECT * FROM t WHERE name = :n",
            &ParamSet::named(vec![("n", SqlValue::Text("a'b".into()))]),
        );
        assert_eq!(sql, "SELECT * FROM t WHERE name = 'a'b'");
    }

    #[test]
    fn null_renders_literal() {
        let sql = interpolate_query(
            "UPDATE t SET a = ?, b = ?",
            &ParamSet::positional(vec![SqlValue::Null, SqlValue::Text("x".into())]),
        );
        assert_eq!(sql, "UPDATE t SET a = NULL, b = 'x'");
    }

    #[test]
    fn list_renders_comma_joined_quoted() {
        let sql = interpolate_query(
            "SELECT * FROM t WHERE id IN (:ids)",
            &ParamSet::named(vec![(
                "ids",
                SqlValue::List(vec![SqlValue::Int(1), SqlValue::Text("a".into())]),
            )]),
        );
        assert_eq!(sql, "SELECT * FROM t WHERE id IN ('1','a')");
    }

    #[test]
    fn only_first_occurrence_substituted_per_parameter() {
        let sql = interpolate_query(
            "SELECT ?, ?",
            &ParamSet::positional(vec![SqlValue::Int(1)]),
        );
        assert_eq!(sql, "SELECT 1, ?");
    }

    #[test]
    fn unused_named_parameter_left_alone() {
        let sql = interpolate_query(
            "SELECT :a",
            &ParamSet::named(vec![
                ("a", SqlValue::Int(1)),
                ("missing", SqlValue::Int(2)),
            ]),
        );
        assert_eq!(sql, "SELECT 1");
    }

    #[test]
    fn whitespace_collapses_to_single_line() {
        assert_eq!(
            collapse_whitespace("  SELECT *\n  FROM t\r\n WHERE a = 1  "),
            "SELECT * FROM t WHERE a = 1"
        );
    }
}
