pub mod auth;
pub mod cors;
pub mod metrics;
pub mod validation;

pub use auth::{
    auth_middleware, require_admin, require_self_or_admin, CurrentUser, JwtService,
};
pub use cors::create_cors_layer;
pub use metrics::metrics_middleware;
pub use validation::{validate_and_respond, ValidJson};
