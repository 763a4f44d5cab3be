use std::sync::Arc;

use tracing::info;

use crate::application::dto::{NewUserRequest, OrderedPatch, UserDto, UserPatch};
use crate::application::errors::UseCaseError;
use crate::application::ports::{PasswordHasher, UserRepository};
use crate::domain::entities::NewUser;
use crate::domain::value_objects::Username;

fn existing_username(raw: &str) -> Result<Username, UseCaseError> {
    Username::new(raw.to_string()).map_err(|_| UseCaseError::NotFound(format!("No user: {}", raw)))
}

/// Use case: Create a user (signup or admin-created)
pub struct CreateUserUseCase {
    user_repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CreateUserUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { user_repo, hasher }
    }

    pub async fn execute(&self, request: NewUserRequest) -> Result<UserDto, UseCaseError> {
        let username = Username::new(request.username)?;
        let password_hash = self.hasher.hash(&request.password).await?;

        let user = NewUser {
            username,
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            is_admin: request.is_admin,
        };

        let created = self.user_repo.create(&user).await?;
        info!(username = %created.username, is_admin = created.is_admin, "user created");

        Ok(UserDto::from(created))
    }
}

/// Use case: List all users
pub struct ListUsersUseCase {
    user_repo: Arc<dyn UserRepository>,
}

impl ListUsersUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self) -> Result<Vec<UserDto>, UseCaseError> {
        let users = self.user_repo.list().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }
}

/// Use case: Fetch one user
pub struct GetUserUseCase {
    user_repo: Arc<dyn UserRepository>,
}

impl GetUserUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, username: &str) -> Result<UserDto, UseCaseError> {
        let username = existing_username(username)?;

        self.user_repo
            .find_by_username(&username)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| UseCaseError::NotFound(format!("No user: {}", username)))
    }
}

/// Use case: Partially update a user; a new password is hashed first
pub struct UpdateUserUseCase {
    user_repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UpdateUserUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { user_repo, hasher }
    }

    pub async fn execute(
        &self,
        username: &str,
        patch: impl Into<OrderedPatch<UserPatch>>,
    ) -> Result<UserDto, UseCaseError> {
        let username = existing_username(username)?;
        let OrderedPatch { patch, key_order } = patch.into();
        let (mut changes, password) = patch.into_payload_without_password();

        if let Some(password) = password {
            let hash = self.hasher.hash(&password).await?;
            changes.set("password", hash);
        }
        let changes = changes.ordered_by(&key_order);

        let updated = self.user_repo.update(&username, &changes).await?;
        info!(username = %username, fields = changes.len(), "user updated");

        Ok(UserDto::from(updated))
    }
}

/// Use case: Delete a user
pub struct DeleteUserUseCase {
    user_repo: Arc<dyn UserRepository>,
}

impl DeleteUserUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, username: &str) -> Result<(), UseCaseError> {
        let username = existing_username(username)?;

        self.user_repo.delete(&username).await?;
        info!(username = %username, "user deleted");

        Ok(())
    }
}
