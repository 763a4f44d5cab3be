use std::sync::Arc;

use tracing::info;

use crate::application::dto::{
    CompanyDetailDto, CompanyDto, CompanyPatch, NewCompanyRequest, OrderedPatch,
};
use crate::application::errors::UseCaseError;
use crate::application::ports::{CompanyRepository, JobRepository};
use crate::domain::entities::Company;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{CompanyHandle, FilterSpec};

/// A handle that fails validation cannot exist in storage.
fn existing_handle(raw: &str) -> Result<CompanyHandle, UseCaseError> {
    CompanyHandle::new(raw.to_string())
        .map_err(|_| UseCaseError::NotFound(format!("No company: {}", raw)))
}

/// Use case: Create a company
pub struct CreateCompanyUseCase {
    company_repo: Arc<dyn CompanyRepository>,
}

impl CreateCompanyUseCase {
    pub fn new(company_repo: Arc<dyn CompanyRepository>) -> Self {
        Self { company_repo }
    }

    pub async fn execute(&self, request: NewCompanyRequest) -> Result<CompanyDto, UseCaseError> {
        let company = Company {
            handle: CompanyHandle::new(request.handle)?,
            name: request.name,
            description: request.description,
            num_employees: request.num_employees,
            logo_url: request.logo_url,
        };

        let created = self.company_repo.create(&company).await?;
        info!(handle = %created.handle, "company created");

        Ok(CompanyDto::from(created))
    }
}

/// Use case: List companies, optionally filtered
pub struct ListCompaniesUseCase {
    company_repo: Arc<dyn CompanyRepository>,
}

impl ListCompaniesUseCase {
    pub fn new(company_repo: Arc<dyn CompanyRepository>) -> Self {
        Self { company_repo }
    }

    pub async fn execute(&self, filters: FilterSpec) -> Result<Vec<CompanyDto>, UseCaseError> {
        check_employee_range(&filters)?;

        let companies = self.company_repo.list(&filters).await?;
        Ok(companies.into_iter().map(CompanyDto::from).collect())
    }
}

/// Reject `minEmployees > maxEmployees` before touching the database.
/// Unparseable bounds are left for the filter builder to report.
fn check_employee_range(filters: &FilterSpec) -> Result<(), DomainError> {
    let bound = |key: &str| filters.get(key).and_then(|v| v.trim().parse::<i32>().ok());

    match (bound("minEmployees"), bound("maxEmployees")) {
        (Some(min), Some(max)) if min > max => {
            Err(DomainError::InvertedEmployeeRange { min, max })
        }
        _ => Ok(()),
    }
}

/// Use case: Fetch one company together with its jobs
pub struct GetCompanyUseCase {
    company_repo: Arc<dyn CompanyRepository>,
    job_repo: Arc<dyn JobRepository>,
}

impl GetCompanyUseCase {
    pub fn new(company_repo: Arc<dyn CompanyRepository>, job_repo: Arc<dyn JobRepository>) -> Self {
        Self {
            company_repo,
            job_repo,
        }
    }

    pub async fn execute(&self, handle: &str) -> Result<CompanyDetailDto, UseCaseError> {
        let handle = existing_handle(handle)?;

        let company = self
            .company_repo
            .find_by_handle(&handle)
            .await?
            .ok_or_else(|| UseCaseError::NotFound(format!("No company: {}", handle)))?;

        let jobs = self.job_repo.list_for_company(&handle).await?;

        Ok(CompanyDetailDto::new(company, jobs))
    }
}

/// Use case: Partially update a company
pub struct UpdateCompanyUseCase {
    company_repo: Arc<dyn CompanyRepository>,
}

impl UpdateCompanyUseCase {
    pub fn new(company_repo: Arc<dyn CompanyRepository>) -> Self {
        Self { company_repo }
    }

    pub async fn execute(
        &self,
        handle: &str,
        patch: impl Into<OrderedPatch<CompanyPatch>>,
    ) -> Result<CompanyDto, UseCaseError> {
        let handle = existing_handle(handle)?;
        let OrderedPatch { patch, key_order } = patch.into();
        let changes = patch.into_payload().ordered_by(&key_order);

        let updated = self.company_repo.update(&handle, &changes).await?;
        info!(handle = %handle, fields = changes.len(), "company updated");

        Ok(CompanyDto::from(updated))
    }
}

/// Use case: Delete a company (its jobs go with it)
pub struct DeleteCompanyUseCase {
    company_repo: Arc<dyn CompanyRepository>,
}

impl DeleteCompanyUseCase {
    pub fn new(company_repo: Arc<dyn CompanyRepository>) -> Self {
        Self { company_repo }
    }

    pub async fn execute(&self, handle: &str) -> Result<(), UseCaseError> {
        let handle = existing_handle(handle)?;

        self.company_repo.delete(&handle).await?;
        info!(handle = %handle, "company deleted");

        Ok(())
    }
}
