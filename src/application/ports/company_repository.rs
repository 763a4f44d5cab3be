use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::entities::Company;
use crate::domain::value_objects::{CompanyHandle, FilterSpec, UpdatePayload};
#[cfg(test)]
use mockall::automock;

/// Port for company persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Insert a new company; a taken handle is `Duplicate`
    async fn create(&self, company: &Company) -> Result<Company, RepositoryError>;

    /// Companies matching the filters, ordered by name
    async fn list(&self, filters: &FilterSpec) -> Result<Vec<Company>, RepositoryError>;

    async fn find_by_handle(
        &self,
        handle: &CompanyHandle,
    ) -> Result<Option<Company>, RepositoryError>;

    /// Apply a partial update and return the stored row
    async fn update(
        &self,
        handle: &CompanyHandle,
        changes: &UpdatePayload,
    ) -> Result<Company, RepositoryError>;

    async fn delete(&self, handle: &CompanyHandle) -> Result<(), RepositoryError>;
}
