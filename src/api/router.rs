use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

use crate::api::handlers::{
    create_company_handler, create_job_handler, create_user_handler, delete_company_handler,
    delete_job_handler, delete_user_handler, get_company_handler, get_job_handler,
    get_user_handler, health_handler, list_companies_handler, list_jobs_handler,
    list_users_handler, readiness_handler, register_handler, token_handler,
    update_company_handler, update_job_handler, update_user_handler,
};
use crate::api::middleware::{
    auth_middleware, create_cors_layer, metrics_middleware, require_admin, require_self_or_admin,
    JwtService,
};
use crate::api::openapi::swagger_ui;
use crate::application::use_cases::{
    AuthenticateUseCase, CreateCompanyUseCase, CreateJobUseCase, CreateUserUseCase,
    DeleteCompanyUseCase, DeleteJobUseCase, DeleteUserUseCase, GetCompanyUseCase, GetJobUseCase,
    GetUserUseCase, ListCompaniesUseCase, ListJobsUseCase, ListUsersUseCase,
    UpdateCompanyUseCase, UpdateJobUseCase, UpdateUserUseCase,
};
use crate::config::Config;

/// Application state container
pub struct AppState {
    pub pool: Arc<PgPool>,
    pub jwt: Arc<JwtService>,
    pub config: Config,
    // Auth
    pub authenticate_use_case: Arc<AuthenticateUseCase>,
    // Companies
    pub create_company_use_case: Arc<CreateCompanyUseCase>,
    pub list_companies_use_case: Arc<ListCompaniesUseCase>,
    pub get_company_use_case: Arc<GetCompanyUseCase>,
    pub update_company_use_case: Arc<UpdateCompanyUseCase>,
    pub delete_company_use_case: Arc<DeleteCompanyUseCase>,
    // Jobs
    pub create_job_use_case: Arc<CreateJobUseCase>,
    pub list_jobs_use_case: Arc<ListJobsUseCase>,
    pub get_job_use_case: Arc<GetJobUseCase>,
    pub update_job_use_case: Arc<UpdateJobUseCase>,
    pub delete_job_use_case: Arc<DeleteJobUseCase>,
    // Users
    pub create_user_use_case: Arc<CreateUserUseCase>,
    pub list_users_use_case: Arc<ListUsersUseCase>,
    pub get_user_use_case: Arc<GetUserUseCase>,
    pub update_user_use_case: Arc<UpdateUserUseCase>,
    pub delete_user_use_case: Arc<DeleteUserUseCase>,
}

/// Create router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let jwt = Arc::clone(&state.jwt);

    Router::new()
        // Health check (no auth required)
        .route("/health", get(health_handler))
        .route(
            "/health/ready",
            get(readiness_handler).with_state(Arc::clone(&state.pool)),
        )
        // Auth
        .route(
            "/auth/token",
            post(token_handler).with_state((state.authenticate_use_case, Arc::clone(&jwt))),
        )
        .route(
            "/auth/register",
            post(register_handler)
                .with_state((Arc::clone(&state.create_user_use_case), Arc::clone(&jwt))),
        )
        // Companies
        .route(
            "/companies",
            post(create_company_handler)
                .with_state(state.create_company_use_case)
                .route_layer(axum_middleware::from_fn(require_admin)),
        )
        .route(
            "/companies",
            get(list_companies_handler).with_state(state.list_companies_use_case),
        )
        .route(
            "/companies/{handle}",
            get(get_company_handler).with_state(state.get_company_use_case),
        )
        .route(
            "/companies/{handle}",
            patch(update_company_handler)
                .with_state(state.update_company_use_case)
                .route_layer(axum_middleware::from_fn(require_admin)),
        )
        .route(
            "/companies/{handle}",
            delete(delete_company_handler)
                .with_state(state.delete_company_use_case)
                .route_layer(axum_middleware::from_fn(require_admin)),
        )
        // Jobs
        .route(
            "/jobs",
            post(create_job_handler)
                .with_state(state.create_job_use_case)
                .route_layer(axum_middleware::from_fn(require_admin)),
        )
        .route(
            "/jobs",
            get(list_jobs_handler).with_state(state.list_jobs_use_case),
        )
        .route(
            "/jobs/{id}",
            get(get_job_handler).with_state(state.get_job_use_case),
        )
        .route(
            "/jobs/{id}",
            patch(update_job_handler)
                .with_state(state.update_job_use_case)
                .route_layer(axum_middleware::from_fn(require_admin)),
        )
        .route(
            "/jobs/{id}",
            delete(delete_job_handler)
                .with_state(state.delete_job_use_case)
                .route_layer(axum_middleware::from_fn(require_admin)),
        )
        // Users
        .route(
            "/users",
            post(create_user_handler)
                .with_state((state.create_user_use_case, Arc::clone(&jwt)))
                .route_layer(axum_middleware::from_fn(require_admin)),
        )
        .route(
            "/users",
            get(list_users_handler)
                .with_state(state.list_users_use_case)
                .route_layer(axum_middleware::from_fn(require_admin)),
        )
        .route(
            "/users/{username}",
            get(get_user_handler)
                .with_state(state.get_user_use_case)
                .route_layer(axum_middleware::from_fn(require_self_or_admin)),
        )
        .route(
            "/users/{username}",
            patch(update_user_handler)
                .with_state(state.update_user_use_case)
                .route_layer(axum_middleware::from_fn(require_self_or_admin)),
        )
        .route(
            "/users/{username}",
            delete(delete_user_handler)
                .with_state(state.delete_user_use_case)
                .route_layer(axum_middleware::from_fn(require_self_or_admin)),
        )
        .merge(swagger_ui())
        // Apply middleware layers (auth, body limit, cors, metrics)
        .layer(axum_middleware::from_fn_with_state(jwt, auth_middleware))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_bytes))
        .layer(create_cors_layer(&state.config.allowed_origins))
        .layer(axum_middleware::from_fn(metrics_middleware))
}
