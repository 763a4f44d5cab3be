//! Partial-update SQL construction.
//!
//! Turns a sparse [`UpdatePayload`] into a `SET` fragment whose `$n`
//! placeholders line up with the returned value list, translating
//! application-level field names into column names on the way.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use thiserror::Error;

use crate::domain::value_objects::{FieldValue, UpdatePayload};

/// Client-caused failures while building SQL fragments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryBuildError {
    #[error("No data supplied for update")]
    EmptyPayload,

    #[error("Unrecognized filter: {0}")]
    UnknownFilter(String),

    #[error("Invalid value for filter {key}: {value:?}")]
    InvalidFilterValue { key: String, value: String },
}

/// Application field name -> storage column name.
///
/// Fields without an entry map to themselves. Built from a static table at
/// compile time; empty column names and duplicate fields fail the build.
#[derive(Debug, Clone, Copy)]
pub struct ColumnNameMap {
    entries: &'static [(&'static str, &'static str)],
}

impl ColumnNameMap {
    pub const EMPTY: Self = Self { entries: &[] };

    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        let mut i = 0;
        while i < entries.len() {
            assert!(!entries[i].1.is_empty(), "column name cannot be empty");
            let mut j = i + 1;
            while j < entries.len() {
                assert!(
                    !const_str_eq(entries[i].0, entries[j].0),
                    "field mapped twice"
                );
                j += 1;
            }
            i += 1;
        }
        Self { entries }
    }

    pub fn column_for<'a>(&self, field: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, column)| *column)
            .unwrap_or(field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const fn const_str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// `SET` fragment plus the values for its placeholders, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetClause {
    pub sql: String,
    pub values: Vec<FieldValue>,
}

impl SetClause {
    /// Index of the first placeholder free for the caller (e.g. the key predicate).
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Build `"<col>"=$1, "<col>"=$2, ...` from a partial update.
pub fn build_set_clause(
    payload: &UpdatePayload,
    columns: &ColumnNameMap,
) -> Result<SetClause, QueryBuildError> {
    if payload.is_empty() {
        return Err(QueryBuildError::EmptyPayload);
    }

    let (fragments, values): (Vec<String>, Vec<FieldValue>) = payload
        .iter()
        .enumerate()
        .map(|(idx, (field, value))| {
            let column = quote_ident(columns.column_for(field));
            (format!("{}=${}", column, idx + 1), value.clone())
        })
        .unzip();

    Ok(SetClause {
        sql: fragments.join(", "),
        values,
    })
}

/// Double-quote an identifier, escaping embedded quotes.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Bind values positionally, in the order the builders emitted them.
pub(crate) fn bind_values<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    values: &[FieldValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in values {
        query = match value.clone() {
            FieldValue::Text(v) => query.bind(v),
            FieldValue::Integer(v) => query.bind(v),
            FieldValue::Decimal(v) => query.bind(v),
            FieldValue::Boolean(v) => query.bind(v),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPANY_COLUMNS: ColumnNameMap = ColumnNameMap::new(&[
        ("numEmployees", "num_employees"),
        ("logoUrl", "logo_url"),
    ]);

    const USER_COLUMNS: ColumnNameMap = ColumnNameMap::new(&[
        ("firstName", "first_name"),
        ("lastName", "last_name"),
        ("isAdmin", "is_admin"),
    ]);

    #[test]
    fn test_company_update_scenario() {
        let payload = UpdatePayload::new()
            .with("numEmployees", 99)
            .with("name", "testCompany");

        let clause = build_set_clause(&payload, &COMPANY_COLUMNS).unwrap();

        assert_eq!(clause.sql, r#""num_employees"=$1, "name"=$2"#);
        assert_eq!(
            clause.values,
            vec![FieldValue::from(99), FieldValue::from("testCompany")]
        );
        assert_eq!(clause.next_placeholder(), 3);
    }

    #[test]
    fn test_company_update_all_fields() {
        let payload = UpdatePayload::new()
            .with("numEmployees", 99)
            .with("name", "testCompany")
            .with("description", "a company for testing")
            .with("logoUrl", "http://www.testUrl.com");

        let clause = build_set_clause(&payload, &COMPANY_COLUMNS).unwrap();

        assert_eq!(
            clause.sql,
            r#""num_employees"=$1, "name"=$2, "description"=$3, "logo_url"=$4"#
        );
        assert_eq!(clause.values.len(), 4);
    }

    #[test]
    fn test_user_update_translates_only_mapped_fields() {
        let payload = UpdatePayload::new()
            .with("password", "testPassword")
            .with("email", "email@test.com")
            .with("isAdmin", true);

        let clause = build_set_clause(&payload, &USER_COLUMNS).unwrap();

        assert_eq!(clause.sql, r#""password"=$1, "email"=$2, "is_admin"=$3"#);
        assert_eq!(
            clause.values,
            vec![
                FieldValue::from("testPassword"),
                FieldValue::from("email@test.com"),
                FieldValue::from(true),
            ]
        );
    }

    #[test]
    fn test_nulls_pass_through() {
        let payload = UpdatePayload::new()
            .with("numEmployees", None::<i32>)
            .with("logoUrl", None::<String>);

        let clause = build_set_clause(&payload, &COMPANY_COLUMNS).unwrap();

        assert_eq!(clause.sql, r#""num_employees"=$1, "logo_url"=$2"#);
        assert_eq!(
            clause.values,
            vec![FieldValue::Integer(None), FieldValue::Text(None)]
        );
    }

    #[test]
    fn test_empty_payload_is_bad_input() {
        let result = build_set_clause(&UpdatePayload::new(), &COMPANY_COLUMNS);
        assert_eq!(result, Err(QueryBuildError::EmptyPayload));
        assert_eq!(
            QueryBuildError::EmptyPayload.to_string(),
            "No data supplied for update"
        );
    }

    #[test]
    fn test_empty_map_uses_field_names_verbatim() {
        let payload = UpdatePayload::new().with("title", "j1").with("salary", 10);
        let clause = build_set_clause(&payload, &ColumnNameMap::EMPTY).unwrap();
        assert_eq!(clause.sql, r#""title"=$1, "salary"=$2"#);
    }

    #[test]
    fn test_identifier_quotes_are_escaped() {
        let payload = UpdatePayload::new().with("we\"ird", 1);
        let clause = build_set_clause(&payload, &ColumnNameMap::EMPTY).unwrap();
        assert_eq!(clause.sql, r#""we""ird"=$1"#);
    }

    #[test]
    fn test_is_deterministic() {
        let payload = UpdatePayload::new()
            .with("logoUrl", "x")
            .with("numEmployees", 3);
        let a = build_set_clause(&payload, &COMPANY_COLUMNS).unwrap();
        let b = build_set_clause(&payload, &COMPANY_COLUMNS).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_column_map_lookup() {
        assert_eq!(COMPANY_COLUMNS.column_for("numEmployees"), "num_employees");
        assert_eq!(COMPANY_COLUMNS.column_for("handle"), "handle");
        assert_eq!(COMPANY_COLUMNS.len(), 2);
        assert!(ColumnNameMap::EMPTY.is_empty());
    }
}
