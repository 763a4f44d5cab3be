use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::errors::ApiError;
use crate::api::middleware::ValidJson;
use crate::application::dto::{JobDto, JobPatch, NewJobRequest, OrderedPatch};
use crate::application::use_cases::{
    CreateJobUseCase, DeleteJobUseCase, GetJobUseCase, ListJobsUseCase, UpdateJobUseCase,
};
use crate::domain::value_objects::FilterSpec;

#[derive(Serialize, ToSchema)]
pub struct JobResponse {
    pub job: JobDto,
}

/// `{jobs: [...]}` for the plain listing, `{filteredJobs: [...]}` once any
/// query parameter is given
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum JobsResponse {
    Jobs(Vec<JobDto>),
    FilteredJobs(Vec<JobDto>),
}

impl JobsResponse {
    pub fn new(jobs: Vec<JobDto>, filtered: bool) -> Self {
        if filtered {
            Self::FilteredJobs(jobs)
        } else {
            Self::Jobs(jobs)
        }
    }
}

/// The deleted id, as a string
#[derive(Serialize, ToSchema)]
pub struct JobDeletedResponse {
    pub deleted: String,
}

/// Non-numeric ids cannot name a job
fn parse_job_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::not_found(format!("No job: {}", raw)))
}

/// POST /jobs
#[utoipa::path(
    post,
    path = "/jobs",
    tag = "jobs",
    request_body = NewJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Invalid body, unknown company or duplicate title"),
        (status = 401, description = "Admin token required")
    ),
    security(("bearer" = []))
)]
pub async fn create_job_handler(
    State(use_case): State<Arc<CreateJobUseCase>>,
    ValidJson(request): ValidJson<NewJobRequest>,
) -> Result<(StatusCode, Json<JobResponse>), ApiError> {
    let job = use_case.execute(request).await?;
    Ok((StatusCode::CREATED, Json(JobResponse { job })))
}

/// GET /jobs
/// Filters: `title` (case-insensitive substring), `minSalary`, `hasEquity`
#[utoipa::path(
    get,
    path = "/jobs",
    tag = "jobs",
    params(
        ("title" = Option<String>, Query, description = "Case-insensitive title substring"),
        ("minSalary" = Option<i32>, Query, description = "Minimum salary"),
        ("hasEquity" = Option<bool>, Query, description = "Only jobs with non-zero equity when true")
    ),
    responses(
        (status = 200, description = "`jobs`, or `filteredJobs` when filtered", body = JobsResponse),
        (status = 400, description = "Invalid filter value")
    )
)]
pub async fn list_jobs_handler(
    State(use_case): State<Arc<ListJobsUseCase>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<JobsResponse>, ApiError> {
    let filters = FilterSpec::from(pairs);
    let filtered = !filters.is_empty();
    let jobs = use_case.execute(filters).await?;
    Ok(Json(JobsResponse::new(jobs, filtered)))
}

/// GET /jobs/{id}
#[utoipa::path(
    get,
    path = "/jobs/{id}",
    tag = "jobs",
    params(("id" = i32, Path, description = "Job id")),
    responses(
        (status = 200, description = "The job", body = JobResponse),
        (status = 404, description = "No such job")
    )
)]
pub async fn get_job_handler(
    State(use_case): State<Arc<GetJobUseCase>>,
    Path(id): Path<String>,
) -> Result<Json<JobResponse>, ApiError> {
    let job = use_case.execute(parse_job_id(&id)?).await?;
    Ok(Json(JobResponse { job }))
}

/// PATCH /jobs/{id}
#[utoipa::path(
    patch,
    path = "/jobs/{id}",
    tag = "jobs",
    params(("id" = i32, Path, description = "Job id")),
    request_body = JobPatch,
    responses(
        (status = 200, description = "Updated job", body = JobResponse),
        (status = 400, description = "Invalid or empty body"),
        (status = 401, description = "Admin token required"),
        (status = 404, description = "No such job")
    ),
    security(("bearer" = []))
)]
pub async fn update_job_handler(
    State(use_case): State<Arc<UpdateJobUseCase>>,
    Path(id): Path<String>,
    ValidJson(patch): ValidJson<OrderedPatch<JobPatch>>,
) -> Result<Json<JobResponse>, ApiError> {
    let job = use_case.execute(parse_job_id(&id)?, patch).await?;
    Ok(Json(JobResponse { job }))
}

/// DELETE /jobs/{id}
#[utoipa::path(
    delete,
    path = "/jobs/{id}",
    tag = "jobs",
    params(("id" = i32, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job deleted", body = JobDeletedResponse),
        (status = 401, description = "Admin token required"),
        (status = 404, description = "No such job")
    ),
    security(("bearer" = []))
)]
pub async fn delete_job_handler(
    State(use_case): State<Arc<DeleteJobUseCase>>,
    Path(id): Path<String>,
) -> Result<Json<JobDeletedResponse>, ApiError> {
    let id = parse_job_id(&id)?;
    use_case.execute(id).await?;
    Ok(Json(JobDeletedResponse {
        deleted: id.to_string(),
    }))
}
