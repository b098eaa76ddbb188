//! API error type

use achievingcoach_shared::EntitlementError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<EntitlementError> for ApiError {
    fn from(err: EntitlementError) -> Self {
        match err {
            EntitlementError::UnknownFeature(_) => ApiError::NotFound(err.to_string()),
            EntitlementError::Config(_) => ApiError::Internal(err.to_string()),
            EntitlementError::InvalidTier(_)
            | EntitlementError::InvalidCategory(_)
            | EntitlementError::InvalidLimitKey(_)
            | EntitlementError::InvalidStatus(_) => ApiError::Validation(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_feature_is_404() {
        let err: ApiError = EntitlementError::UnknownFeature("crm.x".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_parse_errors_are_400() {
        for err in [
            EntitlementError::InvalidTier("gold".to_string()),
            EntitlementError::InvalidCategory("x".to_string()),
            EntitlementError::InvalidLimitKey("maxWidgets".to_string()),
        ] {
            let api: ApiError = err.into();
            assert_eq!(api.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_internal_hides_detail() {
        let err = ApiError::Internal("table poisoned".to_string());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
