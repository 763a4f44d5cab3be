use axum::{
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
    Extension,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::api::errors::ApiError;
use crate::application::dto::UserDto;
use crate::domain::authorization::UserContext;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

/// HS256 token issuing and verification
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiration_hours: i64,
}

impl JwtService {
    pub fn new(secret: &str, expiration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiration_hours,
        }
    }

    pub fn encode_token(&self, user: &UserDto) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            username: user.username.clone(),
            is_admin: user.is_admin,
            exp: (now + Duration::hours(self.expiration_hours)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "failed to sign token");
            ApiError::internal_error("Internal server error")
        })
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }
}

/// Who sent the request, if anyone. Always present in request extensions
/// once [`auth_middleware`] has run.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<UserContext>);

impl CurrentUser {
    pub fn require_user(&self) -> Result<&UserContext, ApiError> {
        self.0.as_ref().ok_or_else(ApiError::unauthorized)
    }

    pub fn require_admin(&self) -> Result<&UserContext, ApiError> {
        match self.require_user()? {
            user if user.is_admin => Ok(user),
            _ => Err(ApiError::unauthorized()),
        }
    }

    /// Admins, or the user named in the path
    pub fn require_self_or_admin(&self, username: &str) -> Result<&UserContext, ApiError> {
        match self.require_user()? {
            user if user.can_act_for(username) => Ok(user),
            _ => Err(ApiError::unauthorized()),
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Decode the bearer token when there is one. Requests without a valid token
/// continue anonymously; handlers decide what needs a user.
pub async fn auth_middleware(
    State(jwt): State<Arc<JwtService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = bearer_token(request.headers()).and_then(|token| match jwt.decode_token(token) {
        Ok(claims) => Some(UserContext::new(claims.username, claims.is_admin)),
        Err(e) => {
            debug!(error = %e, "ignoring invalid bearer token");
            None
        }
    });

    request.extensions_mut().insert(CurrentUser(user));
    next.run(request).await
}

/// Route guard for admin-only routes. Runs before the handler reads the body.
pub async fn require_admin(
    Extension(current_user): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    current_user.require_admin()?;
    Ok(next.run(request).await)
}

/// Route guard for `/users/{username}`: admins, or that user
pub async fn require_self_or_admin(
    Extension(current_user): Extension<CurrentUser>,
    Path(username): Path<String>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    current_user.require_self_or_admin(&username)?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::StatusCode,
        middleware as axum_middleware,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    fn user(username: &str, is_admin: bool) -> UserDto {
        UserDto {
            username: username.to_string(),
            first_name: "F".to_string(),
            last_name: "L".to_string(),
            email: "u@user.com".to_string(),
            is_admin,
        }
    }

    #[test]
    fn test_token_carries_username_and_admin_flag() {
        let jwt = JwtService::new("secret", 24);
        let token = jwt.encode_token(&user("u1", true)).unwrap();

        let claims = jwt.decode_token(&token).unwrap();
        assert_eq!(claims.username, "u1");
        assert!(claims.is_admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = JwtService::new("other", 24)
            .encode_token(&user("u1", true))
            .unwrap();
        assert!(JwtService::new("secret", 24).decode_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = JwtService::new("secret", -2);
        let token = jwt.encode_token(&user("u1", false)).unwrap();
        assert!(jwt.decode_token(&token).is_err());
    }

    #[test]
    fn test_guards() {
        let anon = CurrentUser(None);
        let admin = CurrentUser(Some(UserContext::new("u1", true)));
        let plain = CurrentUser(Some(UserContext::new("u2", false)));

        assert!(anon.require_user().is_err());
        assert!(admin.require_admin().is_ok());
        assert!(plain.require_admin().is_err());
        assert!(plain.require_self_or_admin("u2").is_ok());
        assert!(plain.require_self_or_admin("u1").is_err());
        assert!(admin.require_self_or_admin("u2").is_ok());
    }

    async fn whoami(Extension(current): Extension<CurrentUser>) -> String {
        current
            .0
            .map(|u| u.username)
            .unwrap_or_else(|| "anonymous".to_string())
    }

    async fn call(jwt: Arc<JwtService>, auth: Option<String>) -> String {
        let app = Router::new()
            .route("/", get(whoami))
            .layer(axum_middleware::from_fn_with_state(jwt, auth_middleware));

        let mut request = axum::http::Request::builder().uri("/");
        if let Some(value) = auth {
            request = request.header(AUTHORIZATION, value);
        }

        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_middleware_attaches_user() {
        let jwt = Arc::new(JwtService::new("secret", 24));
        let token = jwt.encode_token(&user("u2", false)).unwrap();

        assert_eq!(call(jwt, Some(format!("Bearer {}", token))).await, "u2");
    }

    async fn echo(Path(name): Path<String>, body: String) -> String {
        format!("{}:{}", name, body)
    }

    fn guarded(jwt: Arc<JwtService>) -> Router {
        Router::new()
            .route(
                "/admin/{name}",
                axum::routing::post(echo).route_layer(axum_middleware::from_fn(require_admin)),
            )
            .route(
                "/users/{name}",
                axum::routing::post(echo)
                    .route_layer(axum_middleware::from_fn(require_self_or_admin)),
            )
            .layer(axum_middleware::from_fn_with_state(jwt, auth_middleware))
    }

    async fn post_status(app: Router, uri: &str, token: Option<String>) -> StatusCode {
        let mut request = axum::http::Request::builder().method("POST").uri(uri);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        app.oneshot(request.body(Body::from("not json")).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_route_guards_run_before_handler() {
        let jwt = Arc::new(JwtService::new("secret", 24));
        let admin = jwt.encode_token(&user("u1", true)).unwrap();
        let plain = jwt.encode_token(&user("u2", false)).unwrap();
        let app = guarded(jwt);

        assert_eq!(post_status(app.clone(), "/admin/x", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            post_status(app.clone(), "/admin/x", Some(plain.clone())).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(post_status(app.clone(), "/admin/x", Some(admin.clone())).await, StatusCode::OK);

        assert_eq!(post_status(app.clone(), "/users/u2", None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            post_status(app.clone(), "/users/u1", Some(plain.clone())).await,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(post_status(app.clone(), "/users/u2", Some(plain)).await, StatusCode::OK);
        assert_eq!(post_status(app, "/users/u2", Some(admin)).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_middleware_bad_or_missing_token_is_anonymous() {
        let jwt = Arc::new(JwtService::new("secret", 24));

        assert_eq!(call(jwt.clone(), None).await, "anonymous");
        assert_eq!(call(jwt.clone(), Some("Bearer garbage".to_string())).await, "anonymous");
        assert_eq!(call(jwt, Some("Basic dTE6cHc=".to_string())).await, "anonymous");
    }
}
