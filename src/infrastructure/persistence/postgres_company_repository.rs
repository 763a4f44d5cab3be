use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::filter_clause::{build_where_clause, FilterRule, FilterTable, Predicate, UnknownFilterPolicy};
use super::query_builder::{bind_values, build_set_clause, ColumnNameMap};
use super::{violation, Violation};
use crate::application::ports::{CompanyRepository, RepositoryError};
use crate::domain::entities::Company;
use crate::domain::value_objects::{CompanyHandle, FilterSpec, UpdatePayload};

pub const COMPANY_COLUMNS: ColumnNameMap = ColumnNameMap::new(&[
    ("numEmployees", "num_employees"),
    ("logoUrl", "logo_url"),
]);

/// `nameLike` and `name` are the same case-insensitive substring search.
pub const COMPANY_FILTERS: FilterTable = FilterTable::new(&[
    FilterRule::new("nameLike", "name", Predicate::Contains),
    FilterRule::new("name", "name", Predicate::Contains),
    FilterRule::new("minEmployees", "num_employees", Predicate::AtLeast),
    FilterRule::new("maxEmployees", "num_employees", Predicate::AtMost),
]);

const COMPANY_FIELDS: &str = "handle, name, description, num_employees, logo_url";

pub struct PostgresCompanyRepository {
    pool: PgPool,
    filter_policy: UnknownFilterPolicy,
}

impl PostgresCompanyRepository {
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

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    async fn create(&self, company: &Company) -> Result<Company, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO companies (handle, name, description, num_employees, logo_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COMPANY_FIELDS
        );

        let row = sqlx::query_as::<_, CompanyRow>(&sql)
            .bind(company.handle.as_str())
            .bind(&company.name)
            .bind(&company.description)
            .bind(company.num_employees)
            .bind(&company.logo_url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match violation(&e) {
                Some(Violation::Unique) => {
                    RepositoryError::Duplicate(format!("Duplicate company: {}", company.handle))
                }
                Some(Violation::Check) => {
                    RepositoryError::BadInput("numEmployees cannot be negative".to_string())
                }
                _ => RepositoryError::Database(e),
            })?;

        row.into_domain()
    }

    async fn list(&self, filters: &FilterSpec) -> Result<Vec<Company>, RepositoryError> {
        let (sql, values) = if filters.is_empty() {
            (
                format!("SELECT {} FROM companies ORDER BY name", COMPANY_FIELDS),
                Vec::new(),
            )
        } else {
            let clause = build_where_clause(filters, &COMPANY_FILTERS, self.filter_policy)?;
            debug!(where_clause = %clause.sql, "filtering companies");
            (
                format!(
                    "SELECT {} FROM companies {} ORDER BY name",
                    COMPANY_FIELDS,
                    clause.to_sql()
                ),
                clause.values,
            )
        };

        let rows = bind_values(sqlx::query_as::<_, CompanyRow>(&sql), &values)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }

    async fn find_by_handle(
        &self,
        handle: &CompanyHandle,
    ) -> Result<Option<Company>, RepositoryError> {
        let sql = format!("SELECT {} FROM companies WHERE handle = $1", COMPANY_FIELDS);

        let row = sqlx::query_as::<_, CompanyRow>(&sql)
            .bind(handle.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_domain()).transpose()
    }

    async fn update(
        &self,
        handle: &CompanyHandle,
        changes: &UpdatePayload,
    ) -> Result<Company, RepositoryError> {
        let set = build_set_clause(changes, &COMPANY_COLUMNS)?;
        debug!(set_clause = %set.sql, handle = %handle, "updating company");

        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {}",
            set.sql,
            set.next_placeholder(),
            COMPANY_FIELDS
        );

        let row = bind_values(sqlx::query_as::<_, CompanyRow>(&sql), &set.values)
            .bind(handle.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match violation(&e) {
                Some(Violation::Unique) => {
                    RepositoryError::Duplicate("Duplicate company name".to_string())
                }
                Some(Violation::Check) => {
                    RepositoryError::BadInput("numEmployees cannot be negative".to_string())
                }
                _ => RepositoryError::Database(e),
            })?;

        row.ok_or_else(|| RepositoryError::NotFound(format!("No company: {}", handle)))?
            .into_domain()
    }

    async fn delete(&self, handle: &CompanyHandle) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM companies WHERE handle = $1")
            .bind(handle.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("No company: {}", handle)));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct CompanyRow {
    handle: String,
    name: String,
    description: String,
    num_employees: Option<i32>,
    logo_url: Option<String>,
}

impl CompanyRow {
    fn into_domain(self) -> Result<Company, RepositoryError> {
        let handle = CompanyHandle::new(self.handle)
            .map_err(|e| RepositoryError::Internal(e.to_string()))?;

        Ok(Company {
            handle,
            name: self.name,
            description: self.description,
            num_employees: self.num_employees,
            logo_url: self.logo_url,
        })
    }
}
