use async_trait::async_trait;
use thiserror::Error;
#[cfg(test)]
use mockall::automock;

#[derive(Debug, Error)]
#[error("Password hashing failed: {0}")]
pub struct HashError(pub String);

/// Port for one-way password hashing
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, HashError>;

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, HashError>;
}
