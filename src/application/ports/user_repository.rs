use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::entities::{NewUser, User, UserCredentials};
use crate::domain::value_objects::{UpdatePayload, Username};
#[cfg(test)]
use mockall::automock;

/// Port for user persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError>;

    /// Every user, ordered by username
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError>;

    /// User row together with its password hash, for login
    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<UserCredentials>, RepositoryError>;

    /// `changes` must already carry a hashed password if one is being set
    async fn update(
        &self,
        username: &Username,
        changes: &UpdatePayload,
    ) -> Result<User, RepositoryError>;

    async fn delete(&self, username: &Username) -> Result<(), RepositoryError>;
}
