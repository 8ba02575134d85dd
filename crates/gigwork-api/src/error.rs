//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use gigwork_store::StoreError;

use crate::services::HireError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Store(e) if e.is_conflict() => StatusCode::CONFLICT,
            ApiError::Internal(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<HireError> for ApiError {
    fn from(err: HireError) -> Self {
        match err {
            HireError::BidNotFound(id) => ApiError::not_found(format!("Bid not found: {}", id)),
            HireError::GigNotFound(id) => ApiError::not_found(format!("Gig not found: {}", id)),
            HireError::Unauthorized => ApiError::forbidden("Not authorized to hire"),
            HireError::AlreadyAssigned => ApiError::Conflict("Gig already assigned".to_string()),
            HireError::Txn(e) => ApiError::Store(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            ApiError::Internal(_) | ApiError::Store(_) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production"
                    && status == StatusCode::INTERNAL_SERVER_ERROR
                {
                    "An internal error occurred".to_string()
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse { detail };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gigwork_models::{BidId, GigId};

    #[test]
    fn test_hire_error_mapping() {
        let api: ApiError = HireError::BidNotFound(BidId::from("b1")).into();
        assert_eq!(api.status_code(), StatusCode::NOT_FOUND);

        let api: ApiError = HireError::GigNotFound(GigId::from("g1")).into();
        assert_eq!(api.status_code(), StatusCode::NOT_FOUND);

        let api: ApiError = HireError::Unauthorized.into();
        assert_eq!(api.status_code(), StatusCode::FORBIDDEN);

        let api: ApiError = HireError::AlreadyAssigned.into();
        assert_eq!(api.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_commit_conflict_maps_to_conflict() {
        let api: ApiError = HireError::Txn(StoreError::txn_conflict("gig g1 changed")).into();
        assert_eq!(api.status_code(), StatusCode::CONFLICT);
    }
}
