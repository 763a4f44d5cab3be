mod filter_clause;
mod postgres_company_repository;
mod postgres_job_repository;
mod postgres_user_repository;
mod query_builder;

pub use filter_clause::{
    build_where_clause, FilterRule, FilterTable, Predicate, UnknownFilterPolicy, WhereClause,
};
pub use postgres_company_repository::{PostgresCompanyRepository, COMPANY_COLUMNS, COMPANY_FILTERS};
pub use postgres_job_repository::{PostgresJobRepository, JOB_COLUMNS, JOB_FILTERS};
pub use postgres_user_repository::{PostgresUserRepository, USER_COLUMNS};
pub use query_builder::{build_set_clause, ColumnNameMap, QueryBuildError, SetClause};

use crate::application::ports::RepositoryError;

impl From<QueryBuildError> for RepositoryError {
    fn from(err: QueryBuildError) -> Self {
        RepositoryError::BadInput(err.to_string())
    }
}

/// Constraint class of a failed write, if the database reported one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    Unique,
    ForeignKey,
    Check,
}

pub(crate) fn violation(err: &sqlx::Error) -> Option<Violation> {
    let sqlx::Error::Database(db) = err else {
        return None;
    };

    if db.is_unique_violation() {
        Some(Violation::Unique)
    } else if db.is_foreign_key_violation() {
        Some(Violation::ForeignKey)
    } else if db.is_check_violation() {
        Some(Violation::Check)
    } else {
        None
    }
}
