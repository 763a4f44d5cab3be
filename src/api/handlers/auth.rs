use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::errors::ApiError;
use crate::api::middleware::{JwtService, ValidJson};
use crate::application::dto::{LoginRequest, RegisterRequest};
use crate::application::use_cases::{AuthenticateUseCase, CreateUserUseCase};

#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /auth/token
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed token", body = TokenResponse),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Invalid username/password")
    )
)]
pub async fn token_handler(
    State((use_case, jwt)): State<(Arc<AuthenticateUseCase>, Arc<JwtService>)>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = use_case.execute(request).await?;
    let token = jwt.encode_token(&user)?;
    Ok(Json(TokenResponse { token }))
}

/// POST /auth/register
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = TokenResponse),
        (status = 400, description = "Invalid body or duplicate username")
    )
)]
pub async fn register_handler(
    State((use_case, jwt)): State<(Arc<CreateUserUseCase>, Arc<JwtService>)>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let user = use_case.execute(request.into()).await?;
    let token = jwt.encode_token(&user)?;
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}
