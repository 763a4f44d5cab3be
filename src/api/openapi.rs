use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers::{
    auth::TokenResponse,
    companies::{CompaniesResponse, CompanyDeletedResponse, CompanyDetailResponse, CompanyResponse},
    health::{HealthResponse, ReadinessResponse},
    jobs::{JobDeletedResponse, JobResponse, JobsResponse},
    users::{UserDeletedResponse, UserResponse, UserTokenResponse, UsersResponse},
};
use crate::application::dto::{
    CompanyDetailDto, CompanyDto, CompanyJobDto, CompanyPatch, JobDto, JobPatch, LoginRequest,
    NewCompanyRequest, NewJobRequest, NewUserRequest, RegisterRequest, UserDto, UserPatch,
};

/// OpenAPI document for the Jobboard API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Jobboard API",
        version = "1.0.0",
        description = "Companies, job postings and users with filtered listings and partial updates"
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server")
    ),
    paths(
        crate::api::handlers::health::health_handler,
        crate::api::handlers::health::readiness_handler,
        crate::api::handlers::auth::token_handler,
        crate::api::handlers::auth::register_handler,
        crate::api::handlers::companies::create_company_handler,
        crate::api::handlers::companies::list_companies_handler,
        crate::api::handlers::companies::get_company_handler,
        crate::api::handlers::companies::update_company_handler,
        crate::api::handlers::companies::delete_company_handler,
        crate::api::handlers::jobs::create_job_handler,
        crate::api::handlers::jobs::list_jobs_handler,
        crate::api::handlers::jobs::get_job_handler,
        crate::api::handlers::jobs::update_job_handler,
        crate::api::handlers::jobs::delete_job_handler,
        crate::api::handlers::users::create_user_handler,
        crate::api::handlers::users::list_users_handler,
        crate::api::handlers::users::get_user_handler,
        crate::api::handlers::users::update_user_handler,
        crate::api::handlers::users::delete_user_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ReadinessResponse,
            TokenResponse,
            LoginRequest,
            RegisterRequest,
            CompanyDto,
            CompanyJobDto,
            CompanyDetailDto,
            NewCompanyRequest,
            CompanyPatch,
            CompanyResponse,
            CompanyDetailResponse,
            CompaniesResponse,
            CompanyDeletedResponse,
            JobDto,
            NewJobRequest,
            JobPatch,
            JobResponse,
            JobsResponse,
            JobDeletedResponse,
            UserDto,
            NewUserRequest,
            UserPatch,
            UserResponse,
            UserTokenResponse,
            UsersResponse,
            UserDeletedResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Token issuing and self-registration"),
        (name = "companies", description = "Company operations"),
        (name = "jobs", description = "Job posting operations"),
        (name = "users", description = "User account operations")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the Swagger UI route
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
