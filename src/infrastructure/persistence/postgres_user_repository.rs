use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::query_builder::{bind_values, build_set_clause, ColumnNameMap};
use super::{violation, Violation};
use crate::application::ports::{RepositoryError, UserRepository};
use crate::domain::entities::{NewUser, User, UserCredentials};
use crate::domain::value_objects::{UpdatePayload, Username};

pub const USER_COLUMNS: ColumnNameMap = ColumnNameMap::new(&[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
]);

const USER_FIELDS: &str = "username, first_name, last_name, email, is_admin";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO users (username, password, first_name, last_name, email, is_admin)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_FIELDS
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.username.as_str())
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(user.is_admin)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match violation(&e) {
                Some(Violation::Unique) => {
                    RepositoryError::Duplicate(format!("Duplicate username: {}", user.username))
                }
                Some(Violation::Check) => RepositoryError::BadInput("Invalid email".to_string()),
                _ => RepositoryError::Database(e),
            })?;

        row.into_domain()
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let sql = format!("SELECT {} FROM users ORDER BY username", USER_FIELDS);

        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.into_domain()).collect()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_FIELDS);

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_domain()).transpose()
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        let sql = format!(
            "SELECT {}, password FROM users WHERE username = $1",
            USER_FIELDS
        );

        let row = sqlx::query_as::<_, CredentialsRow>(&sql)
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_domain()).transpose()
    }

    async fn update(
        &self,
        username: &Username,
        changes: &UpdatePayload,
    ) -> Result<User, RepositoryError> {
        let set = build_set_clause(changes, &USER_COLUMNS)?;
        // column names only; values (password hashes included) are never logged
        debug!(set_clause = %set.sql, username = %username, "updating user");

        let sql = format!(
            "UPDATE users SET {} WHERE username = ${} RETURNING {}",
            set.sql,
            set.next_placeholder(),
            USER_FIELDS
        );

        let row = bind_values(sqlx::query_as::<_, UserRow>(&sql), &set.values)
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match violation(&e) {
                Some(Violation::Check) => RepositoryError::BadInput("Invalid email".to_string()),
                _ => RepositoryError::Database(e),
            })?;

        row.ok_or_else(|| RepositoryError::NotFound(format!("No user: {}", username)))?
            .into_domain()
    }

    async fn delete(&self, username: &Username) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("No user: {}", username)));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    is_admin: bool,
}

impl UserRow {
    fn into_domain(self) -> Result<User, RepositoryError> {
        let username =
            Username::new(self.username).map_err(|e| RepositoryError::Internal(e.to_string()))?;

        Ok(User {
            username,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            is_admin: self.is_admin,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password: String,
}

impl CredentialsRow {
    fn into_domain(self) -> Result<UserCredentials, RepositoryError> {
        Ok(UserCredentials {
            user: self.user.into_domain()?,
            password_hash: self.password,
        })
    }
}
