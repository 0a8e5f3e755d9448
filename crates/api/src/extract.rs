//! Request extractors that reject with [`AppError`].

use std::fmt::Display;
use std::str::FromStr;

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::request::Parts;

use catalogos_core::ValidationErrors;

use crate::error::AppError;

/// JSON request body. Malformed JSON, wrong field types and unknown fields
/// become `400` responses in the service's error format; bodies over the
/// size limit stay `413`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Query string parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

/// A single `{id}` path segment parsed into a typed id.
///
/// Non-numeric and non-positive ids are validation errors on the `id` field.
#[derive(Debug, Clone, Copy)]
pub struct PathId<T>(pub T);

impl<S, T> FromRequestParts<S> for PathId<T>
where
    S: Send + Sync,
    T: FromStr,
    T::Err: Display,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state).await?;
        raw.parse::<T>()
            .map(Self)
            .map_err(|e| AppError::Validation(ValidationErrors::single("id", e.to_string())))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::extract::DefaultBodyLimit;
    use axum::http::{Request, StatusCode, header};
    use axum::routing::{get, post};
    use tower::ServiceExt;

    use catalogos_core::{ProductId, ProductPayload};

    use super::*;

    async fn status_for(uri: &str) -> StatusCode {
        let app = Router::new().route(
            "/productos/{id}",
            get(|PathId(id): PathId<ProductId>| async move { id.to_string() }),
        );
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_path_id_parsing() {
        assert_eq!(status_for("/productos/7").await, StatusCode::OK);
        assert_eq!(status_for("/productos/abc").await, StatusCode::BAD_REQUEST);
        assert_eq!(status_for("/productos/0").await, StatusCode::BAD_REQUEST);
        assert_eq!(status_for("/productos/-3").await, StatusCode::BAD_REQUEST);
    }

    async fn json_status_for(body: &str) -> StatusCode {
        let app = Router::new()
            .route(
                "/productos",
                post(|JsonBody(payload): JsonBody<ProductPayload>| async move {
                    payload.name.unwrap_or_default()
                }),
            )
            .layer(DefaultBodyLimit::max(64));
        let request = Request::builder()
            .method("POST")
            .uri("/productos")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_json_body_rejections() {
        assert_eq!(json_status_for(r#"{"name":"Widget"}"#).await, StatusCode::OK);
        assert_eq!(json_status_for("{not json").await, StatusCode::BAD_REQUEST);
        assert_eq!(
            json_status_for(r#"{"name":"Widget","colour":"red"}"#).await,
            StatusCode::BAD_REQUEST
        );

        let oversized = format!(r#"{{"name":"{}"}}"#, "x".repeat(200));
        assert_eq!(
            json_status_for(&oversized).await,
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
