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
use crate::application::dto::{
    CompanyDetailDto, CompanyDto, CompanyPatch, NewCompanyRequest, OrderedPatch,
};
use crate::application::use_cases::{
    CreateCompanyUseCase, DeleteCompanyUseCase, GetCompanyUseCase, ListCompaniesUseCase,
    UpdateCompanyUseCase,
};
use crate::domain::value_objects::FilterSpec;

#[derive(Serialize, ToSchema)]
pub struct CompanyResponse {
    pub company: CompanyDto,
}

#[derive(Serialize, ToSchema)]
pub struct CompanyDetailResponse {
    pub company: CompanyDetailDto,
}

#[derive(Serialize, ToSchema)]
pub struct CompaniesResponse {
    pub companies: Vec<CompanyDto>,
}

#[derive(Serialize, ToSchema)]
pub struct CompanyDeletedResponse {
    pub deleted: String,
}

/// POST /companies
#[utoipa::path(
    post,
    path = "/companies",
    tag = "companies",
    request_body = NewCompanyRequest,
    responses(
        (status = 201, description = "Company created", body = CompanyResponse),
        (status = 400, description = "Invalid body or duplicate handle"),
        (status = 401, description = "Admin token required")
    ),
    security(("bearer" = []))
)]
pub async fn create_company_handler(
    State(use_case): State<Arc<CreateCompanyUseCase>>,
    ValidJson(request): ValidJson<NewCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), ApiError> {
    let company = use_case.execute(request).await?;
    Ok((StatusCode::CREATED, Json(CompanyResponse { company })))
}

/// GET /companies
/// Filters: `name` (case-insensitive substring), `minEmployees`, `maxEmployees`
#[utoipa::path(
    get,
    path = "/companies",
    tag = "companies",
    params(
        ("name" = Option<String>, Query, description = "Case-insensitive name substring"),
        ("minEmployees" = Option<i32>, Query, description = "Minimum number of employees"),
        ("maxEmployees" = Option<i32>, Query, description = "Maximum number of employees")
    ),
    responses(
        (status = 200, description = "Companies ordered by name", body = CompaniesResponse),
        (status = 400, description = "Invalid filter value or minEmployees > maxEmployees")
    )
)]
pub async fn list_companies_handler(
    State(use_case): State<Arc<ListCompaniesUseCase>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<CompaniesResponse>, ApiError> {
    let companies = use_case.execute(FilterSpec::from(pairs)).await?;
    Ok(Json(CompaniesResponse { companies }))
}

/// GET /companies/{handle}
#[utoipa::path(
    get,
    path = "/companies/{handle}",
    tag = "companies",
    params(("handle" = String, Path, description = "Company handle")),
    responses(
        (status = 200, description = "Company with its jobs", body = CompanyDetailResponse),
        (status = 404, description = "No such company")
    )
)]
pub async fn get_company_handler(
    State(use_case): State<Arc<GetCompanyUseCase>>,
    Path(handle): Path<String>,
) -> Result<Json<CompanyDetailResponse>, ApiError> {
    let company = use_case.execute(&handle).await?;
    Ok(Json(CompanyDetailResponse { company }))
}

/// PATCH /companies/{handle}
#[utoipa::path(
    patch,
    path = "/companies/{handle}",
    tag = "companies",
    params(("handle" = String, Path, description = "Company handle")),
    request_body = CompanyPatch,
    responses(
        (status = 200, description = "Updated company", body = CompanyResponse),
        (status = 400, description = "Invalid or empty body"),
        (status = 401, description = "Admin token required"),
        (status = 404, description = "No such company")
    ),
    security(("bearer" = []))
)]
pub async fn update_company_handler(
    State(use_case): State<Arc<UpdateCompanyUseCase>>,
    Path(handle): Path<String>,
    ValidJson(patch): ValidJson<OrderedPatch<CompanyPatch>>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let company = use_case.execute(&handle, patch).await?;
    Ok(Json(CompanyResponse { company }))
}

/// DELETE /companies/{handle}
#[utoipa::path(
    delete,
    path = "/companies/{handle}",
    tag = "companies",
    params(("handle" = String, Path, description = "Company handle")),
    responses(
        (status = 200, description = "Company deleted", body = CompanyDeletedResponse),
        (status = 401, description = "Admin token required"),
        (status = 404, description = "No such company")
    ),
    security(("bearer" = []))
)]
pub async fn delete_company_handler(
    State(use_case): State<Arc<DeleteCompanyUseCase>>,
    Path(handle): Path<String>,
) -> Result<Json<CompanyDeletedResponse>, ApiError> {
    use_case.execute(&handle).await?;
    Ok(Json(CompanyDeletedResponse { deleted: handle }))
}
