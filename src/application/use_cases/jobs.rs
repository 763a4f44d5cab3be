use std::sync::Arc;

use tracing::info;

use crate::application::dto::{JobDto, JobPatch, NewJobRequest, OrderedPatch};
use crate::application::errors::UseCaseError;
use crate::application::ports::JobRepository;
use crate::domain::entities::{Job, NewJob};
use crate::domain::value_objects::{CompanyHandle, FilterSpec};

/// Use case: Create a job posting
pub struct CreateJobUseCase {
    job_repo: Arc<dyn JobRepository>,
}

impl CreateJobUseCase {
    pub fn new(job_repo: Arc<dyn JobRepository>) -> Self {
        Self { job_repo }
    }

    pub async fn execute(&self, request: NewJobRequest) -> Result<JobDto, UseCaseError> {
        let company_handle = CompanyHandle::new(request.company_handle.clone())
            .map_err(|_| UseCaseError::BadInput(format!("No company: {}", request.company_handle)))?;

        let job = NewJob {
            title: request.title,
            salary: request.salary,
            equity: request.equity.map(Job::check_equity).transpose()?,
            company_handle,
        };

        let created = self.job_repo.create(&job).await?;
        info!(job_id = created.id, company = %created.company_handle, "job created");

        Ok(JobDto::from(created))
    }
}

/// Use case: List jobs, optionally filtered
pub struct ListJobsUseCase {
    job_repo: Arc<dyn JobRepository>,
}

impl ListJobsUseCase {
    pub fn new(job_repo: Arc<dyn JobRepository>) -> Self {
        Self { job_repo }
    }

    pub async fn execute(&self, filters: FilterSpec) -> Result<Vec<JobDto>, UseCaseError> {
        let jobs = self.job_repo.list(&filters).await?;
        Ok(jobs.into_iter().map(JobDto::from).collect())
    }
}

/// Use case: Fetch one job
pub struct GetJobUseCase {
    job_repo: Arc<dyn JobRepository>,
}

impl GetJobUseCase {
    pub fn new(job_repo: Arc<dyn JobRepository>) -> Self {
        Self { job_repo }
    }

    pub async fn execute(&self, id: i32) -> Result<JobDto, UseCaseError> {
        self.job_repo
            .find_by_id(id)
            .await?
            .map(JobDto::from)
            .ok_or_else(|| UseCaseError::NotFound(format!("No job: {}", id)))
    }
}

/// Use case: Partially update a job
pub struct UpdateJobUseCase {
    job_repo: Arc<dyn JobRepository>,
}

impl UpdateJobUseCase {
    pub fn new(job_repo: Arc<dyn JobRepository>) -> Self {
        Self { job_repo }
    }

    pub async fn execute(
        &self,
        id: i32,
        patch: impl Into<OrderedPatch<JobPatch>>,
    ) -> Result<JobDto, UseCaseError> {
        let OrderedPatch { patch, key_order } = patch.into();
        if let Some(Some(equity)) = patch.equity {
            Job::check_equity(equity)?;
        }

        let changes = patch.into_payload().ordered_by(&key_order);
        let updated = self.job_repo.update(id, &changes).await?;
        info!(job_id = id, fields = changes.len(), "job updated");

        Ok(JobDto::from(updated))
    }
}

/// Use case: Delete a job
pub struct DeleteJobUseCase {
    job_repo: Arc<dyn JobRepository>,
}

impl DeleteJobUseCase {
    pub fn new(job_repo: Arc<dyn JobRepository>) -> Self {
        Self { job_repo }
    }

    pub async fn execute(&self, id: i32) -> Result<(), UseCaseError> {
        self.job_repo.delete(id).await?;
        info!(job_id = id, "job deleted");
        Ok(())
    }
}
