use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::errors::ApiError;
use crate::api::middleware::{CurrentUser, JwtService, ValidJson};
use crate::application::dto::{NewUserRequest, OrderedPatch, UserDto, UserPatch};
use crate::application::use_cases::{
    CreateUserUseCase, DeleteUserUseCase, GetUserUseCase, ListUsersUseCase, UpdateUserUseCase,
};

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub user: UserDto,
}

#[derive(Serialize, ToSchema)]
pub struct UserTokenResponse {
    pub user: UserDto,
    pub token: String,
}

#[derive(Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<UserDto>,
}

#[derive(Serialize, ToSchema)]
pub struct UserDeletedResponse {
    pub deleted: String,
}

/// POST /users
///
/// Admin-only account creation. Unlike `/auth/register` this may create
/// another admin.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = NewUserRequest,
    responses(
        (status = 201, description = "User created", body = UserTokenResponse),
        (status = 400, description = "Invalid body or duplicate username"),
        (status = 401, description = "Admin token required")
    ),
    security(("bearer" = []))
)]
pub async fn create_user_handler(
    State((use_case, jwt)): State<(Arc<CreateUserUseCase>, Arc<JwtService>)>,
    ValidJson(request): ValidJson<NewUserRequest>,
) -> Result<(StatusCode, Json<UserTokenResponse>), ApiError> {
    let user = use_case.execute(request).await?;
    let token = jwt.encode_token(&user)?;
    Ok((StatusCode::CREATED, Json(UserTokenResponse { user, token })))
}

/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users ordered by username", body = UsersResponse),
        (status = 401, description = "Admin token required")
    ),
    security(("bearer" = []))
)]
pub async fn list_users_handler(
    State(use_case): State<Arc<ListUsersUseCase>>,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = use_case.execute().await?;
    Ok(Json(UsersResponse { users }))
}

/// GET /users/{username}
#[utoipa::path(
    get,
    path = "/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 401, description = "Admin or same-user token required"),
        (status = 404, description = "No such user")
    ),
    security(("bearer" = []))
)]
pub async fn get_user_handler(
    State(use_case): State<Arc<GetUserUseCase>>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = use_case.execute(&username).await?;
    Ok(Json(UserResponse { user }))
}

/// PATCH /users/{username}
///
/// Only admins may change `isAdmin`.
#[utoipa::path(
    patch,
    path = "/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid or empty body"),
        (status = 401, description = "Admin or same-user token required"),
        (status = 404, description = "No such user")
    ),
    security(("bearer" = []))
)]
pub async fn update_user_handler(
    State(use_case): State<Arc<UpdateUserUseCase>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(username): Path<String>,
    ValidJson(body): ValidJson<OrderedPatch<UserPatch>>,
) -> Result<Json<UserResponse>, ApiError> {
    let caller = current_user.require_user()?;
    if body.patch.is_admin.is_some() && !caller.is_admin {
        return Err(ApiError::unauthorized());
    }

    let user = use_case.execute(&username, body).await?;
    Ok(Json(UserResponse { user }))
}

/// DELETE /users/{username}
#[utoipa::path(
    delete,
    path = "/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User deleted", body = UserDeletedResponse),
        (status = 401, description = "Admin or same-user token required"),
        (status = 404, description = "No such user")
    ),
    security(("bearer" = []))
)]
pub async fn delete_user_handler(
    State(use_case): State<Arc<DeleteUserUseCase>>,
    Path(username): Path<String>,
) -> Result<Json<UserDeletedResponse>, ApiError> {
    use_case.execute(&username).await?;
    Ok(Json(UserDeletedResponse { deleted: username }))
}
