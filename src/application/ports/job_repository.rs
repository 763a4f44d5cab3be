use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::entities::{Job, NewJob};
use crate::domain::value_objects::{CompanyHandle, FilterSpec, UpdatePayload};
#[cfg(test)]
use mockall::automock;

/// Port for job persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a job; the same title twice for one company is `Duplicate`
    async fn create(&self, job: &NewJob) -> Result<Job, RepositoryError>;

    /// Jobs matching the filters. Unfiltered listings are ordered by title,
    /// filtered ones by salary (highest first) then title.
    async fn list(&self, filters: &FilterSpec) -> Result<Vec<Job>, RepositoryError>;

    /// All jobs of one company, ordered by id
    async fn list_for_company(&self, handle: &CompanyHandle) -> Result<Vec<Job>, RepositoryError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Job>, RepositoryError>;

    async fn update(&self, id: i32, changes: &UpdatePayload) -> Result<Job, RepositoryError>;

    async fn delete(&self, id: i32) -> Result<(), RepositoryError>;
}
