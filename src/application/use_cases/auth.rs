use std::sync::Arc;

use tracing::{info, warn};

use crate::application::dto::{LoginRequest, UserDto};
use crate::application::errors::UseCaseError;
use crate::application::ports::{PasswordHasher, UserRepository};
use crate::domain::value_objects::Username;

const INVALID_CREDENTIALS: &str = "Invalid username/password";

/// Use case: Check a username/password pair
pub struct AuthenticateUseCase {
    user_repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AuthenticateUseCase {
    pub fn new(user_repo: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { user_repo, hasher }
    }

    pub async fn execute(&self, request: LoginRequest) -> Result<UserDto, UseCaseError> {
        let unauthorized = || UseCaseError::Unauthorized(INVALID_CREDENTIALS.to_string());

        let username = Username::new(request.username).map_err(|_| unauthorized())?;

        let Some(credentials) = self.user_repo.find_credentials(&username).await? else {
            warn!(username = %username, "login for unknown user");
            return Err(unauthorized());
        };

        if !self
            .hasher
            .verify(&request.password, &credentials.password_hash)
            .await?
        {
            warn!(username = %username, "login with wrong password");
            return Err(unauthorized());
        }

        info!(username = %username, "user authenticated");
        Ok(UserDto::from(credentials.user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockPasswordHasher, MockUserRepository};
    use crate::domain::entities::{User, UserCredentials};

    fn credentials() -> UserCredentials {
        UserCredentials {
            user: User {
                username: Username::new("u1".to_string()).unwrap(),
                first_name: "U1F".to_string(),
                last_name: "U1L".to_string(),
                email: "user1@user.com".to_string(),
                is_admin: true,
            },
            password_hash: "hash-of-password1".to_string(),
        }
    }

    fn hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_verify()
            .returning(|password, hash| Ok(hash == format!("hash-of-{}", password)));
        hasher
    }

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_credentials()
            .times(1)
            .returning(|_| Ok(Some(credentials())));

        let use_case = AuthenticateUseCase::new(Arc::new(repo), Arc::new(hasher()));
        let user = use_case.execute(login("u1", "password1")).await.unwrap();

        assert_eq!(user.username, "u1");
        assert!(user.is_admin);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_credentials()
            .returning(|_| Ok(Some(credentials())));

        let use_case = AuthenticateUseCase::new(Arc::new(repo), Arc::new(hasher()));
        let err = use_case.execute(login("u1", "wrong")).await.unwrap_err();

        assert!(matches!(err, UseCaseError::Unauthorized(ref m) if m == INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_credentials().returning(|_| Ok(None));

        let use_case = AuthenticateUseCase::new(Arc::new(repo), Arc::new(MockPasswordHasher::new()));
        let err = use_case.execute(login("nope", "password1")).await.unwrap_err();

        assert!(matches!(err, UseCaseError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_authenticate_malformed_username_is_unauthorized() {
        let use_case = AuthenticateUseCase::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(MockPasswordHasher::new()),
        );
        let err = use_case.execute(login("not a user!", "x")).await.unwrap_err();

        assert!(matches!(err, UseCaseError::Unauthorized(_)));
    }
}
