//! Table-driven `WHERE` construction for listing endpoints.
//!
//! Each entity declares a [`FilterTable`] of the query-string keys it
//! understands. Every user-supplied value is bound as a parameter; only
//! column names (from the static table) are spliced into the SQL text.

use tracing::debug;

use super::query_builder::{quote_ident, QueryBuildError};
use crate::domain::value_objects::{FieldValue, FilterSpec};

/// Comparison emitted for a recognized filter key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// `col ILIKE $n` with the value wrapped in `%...%`
    Contains,
    /// `col >= $n`, integer value
    AtLeast,
    /// `col <= $n`, integer value
    AtMost,
    /// `col > 0` when the flag is truthy; nothing at all when falsy
    PositiveWhenTrue,
}

#[derive(Debug, Clone, Copy)]
pub struct FilterRule {
    pub key: &'static str,
    pub column: &'static str,
    pub predicate: Predicate,
}

impl FilterRule {
    pub const fn new(key: &'static str, column: &'static str, predicate: Predicate) -> Self {
        Self {
            key,
            column,
            predicate,
        }
    }
}

/// The filter keys an entity recognizes
#[derive(Debug, Clone, Copy)]
pub struct FilterTable {
    rules: &'static [FilterRule],
}

impl FilterTable {
    pub const fn new(rules: &'static [FilterRule]) -> Self {
        Self { rules }
    }

    pub fn rule(&self, key: &str) -> Option<&FilterRule> {
        self.rules.iter().find(|r| r.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.key)
    }
}

/// What to do with a filter key the table does not know
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFilterPolicy {
    #[default]
    Ignore,
    Reject,
}

impl UnknownFilterPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Reject
        } else {
            Self::Ignore
        }
    }
}

/// Conjunction of predicates plus the values bound to its placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereClause {
    pub sql: String,
    pub values: Vec<FieldValue>,
}

impl WhereClause {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// `WHERE <predicates>`, or an empty string when nothing was produced.
    pub fn to_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.sql)
        }
    }
}

pub fn build_where_clause(
    filters: &FilterSpec,
    table: &FilterTable,
    policy: UnknownFilterPolicy,
) -> Result<WhereClause, QueryBuildError> {
    let mut predicates = Vec::with_capacity(filters.len());
    let mut values = Vec::new();

    for (key, raw) in filters.iter() {
        let Some(rule) = table.rule(key) else {
            match policy {
                UnknownFilterPolicy::Ignore => {
                    debug!(filter = %key, "ignoring unrecognized filter");
                    continue;
                }
                UnknownFilterPolicy::Reject => {
                    return Err(QueryBuildError::UnknownFilter(key.to_string()));
                }
            }
        };

        let column = quote_ident(rule.column);
        let (operator, value) = match rule.predicate {
            Predicate::Contains => ("ILIKE", FieldValue::from(format!("%{}%", escape_like(raw)))),
            Predicate::AtLeast => (">=", FieldValue::from(parse_integer(key, raw)?)),
            Predicate::AtMost => ("<=", FieldValue::from(parse_integer(key, raw)?)),
            Predicate::PositiveWhenTrue => {
                if parse_flag(key, raw)? {
                    predicates.push(format!("{} > 0", column));
                }
                continue;
            }
        };

        values.push(value);
        predicates.push(format!("{} {} ${}", column, operator, values.len()));
    }

    Ok(WhereClause {
        sql: predicates.join(" AND "),
        values,
    })
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn parse_integer(key: &str, raw: &str) -> Result<i32, QueryBuildError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| invalid_value(key, raw))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, QueryBuildError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(invalid_value(key, raw)),
    }
}

fn invalid_value(key: &str, raw: &str) -> QueryBuildError {
    QueryBuildError::InvalidFilterValue {
        key: key.to_string(),
        value: raw.to_string(),
    }
}
