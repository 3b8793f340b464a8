//! Request-boundary error type and its HTTP mapping.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{store::StoreError, validation::FieldError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed body, missing/mistyped field or bad email.
    #[error("validation failed: {0}")]
    Validation(#[from] FieldError),

    /// Duplicate email on register.
    #[error("Email already registered")]
    Conflict,

    /// Unknown email or wrong password; the two are deliberately indistinguishable.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Missing, invalid or expired bearer token, or a subject that no longer exists.
    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("database not available")]
    StoreUnavailable,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn unauthenticated() -> Self {
        Self::Unauthorized("Not authenticated")
    }

    pub fn bad_credentials() -> Self {
        Self::Unauthorized("Could not validate credentials")
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Conflict | Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Conflict => "conflict",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Unauthorized(_) => "unauthorized",
            Self::StoreUnavailable => "store_unavailable",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { .. } => Self::Conflict,
            StoreError::Invalid(field) => Self::Validation(field),
            other => Self::Internal(other.into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (detail, field) = match &self {
            Self::Validation(f) => (f.message.clone(), Some(f.field.clone())),
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                ("An internal error occurred".to_string(), None)
            }
            other => (other.to_string(), None),
        };

        let body = ErrorBody {
            error: self.kind(),
            detail,
            field,
        };

        let mut res = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            res.headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(ApiError::Conflict.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::bad_credentials().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::StoreUnavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ApiError::Validation(FieldError::new("email", "bad")).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn validation_error_carries_field() {
        let res = ApiError::Validation(FieldError::new("email", "not an email")).into_response();
        let json = body_json(res).await;
        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["field"], "email");
        assert_eq!(json["detail"], "not an email");
    }

    #[tokio::test]
    async fn internal_error_hides_cause() {
        let res = ApiError::Internal(anyhow::anyhow!("pool timed out")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(res).await;
        assert!(!json["detail"].as_str().unwrap().contains("pool"));
    }

    #[test]
    fn unauthorized_sets_challenge_header() {
        let res = ApiError::unauthenticated().into_response();
        assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Bearer");
    }

    #[test]
    fn duplicate_maps_to_conflict() {
        let err: ApiError = StoreError::Duplicate {
            collection: "user".into(),
            field: "email".into(),
        }
        .into();
        assert!(matches!(err, ApiError::Conflict));
    }
}
