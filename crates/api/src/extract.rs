//! Request body extraction with validation.

use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use flowiq_core::error::CoreError;
use flowiq_core::validation::flatten_errors;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has been deserialized and validated.
///
/// Malformed JSON and unknown enum values are rejected with 400 and the
/// deserializer's message; validation failures with 400 and every field
/// message joined by `", "`.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        validate(&value)?;
        Ok(ValidJson(value))
    }
}

/// Query string extractor whose rejection uses the error envelope.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        Ok(ApiQuery(value))
    }
}

/// Run `validator` rules on a value built outside [`ValidJson`].
pub fn validate<T: Validate>(value: &T) -> Result<(), AppError> {
    value
        .validate()
        .map_err(|errors| AppError::Core(CoreError::Validation(flatten_errors(&errors))))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::body::Body;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 2, message = "name must be at least 2 characters"))]
        name: String,
        #[validate(range(min = 0, message = "count must not be negative"))]
        count: i32,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let ValidJson(payload) =
            ValidJson::<Payload>::from_request(json_request(r#"{"name":"ok","count":1}"#), &())
                .await
                .unwrap();
        assert_eq!(payload.name, "ok");
    }

    #[tokio::test]
    async fn test_all_field_messages_are_joined() {
        let result =
            ValidJson::<Payload>::from_request(json_request(r#"{"name":"x","count":-1}"#), &())
                .await;
        let err = result.err().unwrap();
        assert_matches!(
            err,
            AppError::Core(CoreError::Validation(msg))
                if msg == "count: count must not be negative, name: name must be at least 2 characters"
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let result = ValidJson::<Payload>::from_request(json_request("{"), &()).await;
        assert_matches!(result.err(), Some(AppError::BadRequest(_)));
    }
}
