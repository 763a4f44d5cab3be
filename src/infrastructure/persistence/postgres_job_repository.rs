use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;

use super::filter_clause::{build_where_clause, FilterRule, FilterTable, Predicate, UnknownFilterPolicy};
use super::query_builder::{bind_values, build_set_clause, ColumnNameMap};
use super::{violation, Violation};
use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::entities::{Job, NewJob};
use crate::domain::value_objects::{CompanyHandle, FilterSpec, UpdatePayload};

/// Every updatable job field already has its column's name.
pub const JOB_COLUMNS: ColumnNameMap = ColumnNameMap::EMPTY;

pub const JOB_FILTERS: FilterTable = FilterTable::new(&[
    FilterRule::new("title", "title", Predicate::Contains),
    FilterRule::new("minSalary", "salary", Predicate::AtLeast),
    FilterRule::new("hasEquity", "equity", Predicate::PositiveWhenTrue),
]);

const JOB_FIELDS: &str = "id, title, salary, equity, company_handle";

pub struct PostgresJobRepository {
    pool: PgPool,
    filter_policy: UnknownFilterPolicy,
}

impl PostgresJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            filter_policy: UnknownFilterPolicy::default(),
        }
    }

    pub fn with_filter_policy(mut self, policy: UnknownFilterPolicy) -> Self {
        self.filter_policy = policy;
        self
    }
}

fn write_error(err: sqlx::Error, title: &str, handle: &str) -> RepositoryError {
    match violation(&err) {
        Some(Violation::Unique) => {
            RepositoryError::Duplicate(format!("Duplicate job: {} at {}", title, handle))
        }
        Some(Violation::ForeignKey) => RepositoryError::BadInput(format!("No company: {}", handle)),
        Some(Violation::Check) => {
            RepositoryError::BadInput("salary must be >= 0 and equity <= 1.0".to_string())
        }
        None => RepositoryError::Database(err),
    }
}

#[async_trait]
impl JobRepository for PostgresJobRepository {
    async fn create(&self, job: &NewJob) -> Result<Job, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO jobs (title, salary, equity, company_handle)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            JOB_FIELDS
        );

        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(&job.title)
            .bind(job.salary)
            .bind(job.equity)
            .bind(job.company_handle.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(e, &job.title, job.company_handle.as_str()))?;

        row.into_domain()
    }

    async fn list(&self, filters: &FilterSpec) -> Result<Vec<Job>, RepositoryError> {
        let (sql, values) = if filters.is_empty() {
            (
                format!("SELECT {} FROM jobs ORDER BY title", JOB_FIELDS),
                Vec::new(),
            )
        } else {
            let clause = build_where_clause(filters, &JOB_FILTERS, self.filter_policy)?;
            debug!(where_clause = %clause.sql, "filtering jobs");
            (
                format!(
                    "SELECT {} FROM jobs {} ORDER BY salary DESC NULLS LAST, title",
                    JOB_FIELDS,
                    clause.to_sql()
                ),
                clause.values,
            )
        };

        let rows = bind_values(sqlx::query_as::<_, JobRow>(&sql), &values)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }

    async fn list_for_company(&self, handle: &CompanyHandle) -> Result<Vec<Job>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM jobs WHERE company_handle = $1 ORDER BY id",
            JOB_FIELDS
        );

        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .bind(handle.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Job>, RepositoryError> {
        let sql = format!("SELECT {} FROM jobs WHERE id = $1", JOB_FIELDS);

        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_domain()).transpose()
    }

    async fn update(&self, id: i32, changes: &UpdatePayload) -> Result<Job, RepositoryError> {
        let set = build_set_clause(changes, &JOB_COLUMNS)?;
        debug!(set_clause = %set.sql, job_id = id, "updating job");

        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {}",
            set.sql,
            set.next_placeholder(),
            JOB_FIELDS
        );

        let row = bind_values(sqlx::query_as::<_, JobRow>(&sql), &set.values)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match violation(&e) {
                Some(Violation::Unique) => RepositoryError::Duplicate(
                    "Another job of this company already has that title".to_string(),
                ),
                Some(Violation::Check) => RepositoryError::BadInput(
                    "salary must be >= 0 and equity <= 1.0".to_string(),
                ),
                _ => RepositoryError::Database(e),
            })?;

        row.ok_or_else(|| RepositoryError::NotFound(format!("No job: {}", id)))?
            .into_domain()
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("No job: {}", id)));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct JobRow {
    id: i32,
    title: String,
    salary: Option<i32>,
    equity: Option<Decimal>,
    company_handle: String,
}

impl JobRow {
    fn into_domain(self) -> Result<Job, RepositoryError> {
        let company_handle = CompanyHandle::new(self.company_handle)
            .map_err(|e| RepositoryError::Internal(e.to_string()))?;

        Ok(Job {
            id: self.id,
            title: self.title,
            salary: self.salary,
            equity: self.equity,
            company_handle,
        })
    }
}
