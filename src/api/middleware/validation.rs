use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::api::errors::ApiError;

/// JSON body that has been deserialized and validated. Both failures come
/// back as the standard 400 error body, except oversized bodies (413).
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => {
                    ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, rejection.body_text())
                }
                _ => ApiError::bad_request(rejection.body_text()),
            })?;

        validate_and_respond(&value)?;
        Ok(Self(value))
    }
}

/// Validate a request body, turning field errors into a 400 whose message
/// lists each offending field.
pub fn validate_and_respond<T>(payload: &T) -> Result<(), ApiError>
where
    T: Validate,
{
    payload.validate().map_err(|validation_errors| {
        let mut field_errors: Vec<String> = validation_errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|cow| cow.to_string())
                        .unwrap_or_else(|| format!("failed {} check", error.code));
                    format!("{}: {}", field, message)
                })
            })
            .collect();
        field_errors.sort();

        ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("Validation failed: {}", field_errors.join("; ")),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1))]
        name: String,
        #[validate(range(min = 0))]
        count: i32,
    }

    #[test]
    fn test_valid_payload_passes() {
        let sample = Sample {
            name: "ok".to_string(),
            count: 1,
        };
        assert!(validate_and_respond(&sample).is_ok());
    }

    #[test]
    fn test_every_invalid_field_is_reported() {
        let sample = Sample {
            name: String::new(),
            count: -1,
        };
        let err = validate_and_respond(&sample).unwrap_err();

        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().starts_with("Validation failed: "));
        assert!(err.message().contains("count: failed range check"));
        assert!(err.message().contains("name: failed length check"));
    }
}
