use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::value::SqlValue;

lazy_static! {
    /// Word characters following `:`. Deliberately does not parse string
    /// literals or comments; a placeholder-like sequence inside a quoted
    /// literal is misdetected (accepted limitation).
    static ref NAMED_PLACEHOLDER_RE: Regex = Regex::new(r":\w+").expect("static regex");
}

/// Key of one entry in a mixed parameter collection, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKey {
    Index(usize),
    Name(String),
}

/// Parameters for one statement execution: either an ordered sequence bound
/// by position (zero-based at the API surface, 1-based toward the driver) or
/// a name → value mapping bound by `:name` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamSet {
    Positional(Vec<SqlValue>),
    Named(Vec<(String, SqlValue)>),
}

impl ParamSet {
    /// An empty positional set.
    #[must_use]
    pub fn empty() -> Self {
        ParamSet::Positional(Vec::new())
    }

    #[must_use]
    pub fn positional(values: Vec<SqlValue>) -> Self {
        ParamSet::Positional(values)
    }

    #[must_use]
    pub fn named<K: Into<String>>(pairs: Vec<(K, SqlValue)>) -> Self {
        ParamSet::Named(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Classify a mixed collection once, at construction.
    ///
    /// A non-empty collection is positional if and only if its keys are
    /// exactly `Index(0..n-1)` in order; an empty collection is positional.
    /// Anything else is named, with index keys stringified.
    #[must_use]
    pub fn from_entries(entries: Vec<(ParamKey, SqlValue)>) -> Self {
        let contiguous = entries
            .iter()
            .enumerate()
            .all(|(i, (key, _))| matches!(key, ParamKey::Index(n) if *n == i));
        if contiguous {
            return ParamSet::Positional(entries.into_iter().map(|(_, v)| v).collect());
        }
        ParamSet::Named(
            entries
                .into_iter()
                .map(|(key, value)| {
                    let name = match key {
                        ParamKey::Index(n) => n.to_string(),
                        ParamKey::Name(s) => s,
                    };
                    (name, value)
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            ParamSet::Positional(values) => values.is_empty(),
            ParamSet::Named(pairs) => pairs.is_empty(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ParamSet::Positional(values) => values.len(),
            ParamSet::Named(pairs) => pairs.len(),
        }
    }
}

impl From<Vec<SqlValue>> for ParamSet {
    fn from(values: Vec<SqlValue>) -> Self {
        ParamSet::Positional(values)
    }
}

/// Prefix named keys with `:` and drop every name that does not appear as a
/// `:word` token in `sql`, guarding against extra bound names the driver
/// would reject. When `sql` contains no `:word` token at all, nothing is
/// filtered and the driver surfaces whatever it raises.
pub(crate) fn named_values_for(sql: &str, pairs: &[(String, SqlValue)]) -> Vec<(String, SqlValue)> {
    let placeholders: HashSet<&str> = NAMED_PLACEHOLDER_RE
        .find_iter(sql)
        .map(|m| m.as_str())
        .collect();

    pairs
        .iter()
        .map(|(key, value)| (format!(":{key}"), value.clone()))
        .filter(|(key, _)| placeholders.is_empty() || placeholders.contains(key.as_str()))
        .collect()
}

/// Create a string like `?, ?, ?` for a variable-length `IN (?, ?, ?)`
/// predicate. `n = 0` yields an empty string.
#[must_use]
pub fn build_in_clause(n: usize) -> String {
    let mut clause = String::with_capacity(n.saturating_mul(3));
    for i in 0..n {
        if i > 0 {
            clause.push_str(", ");
        }
        clause.push('?');
    }
    clause
}
