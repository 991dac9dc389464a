use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0}")]
    InvalidRequest(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        match self {
            RegistryError::InvalidRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            RegistryError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            RegistryError::Store(e) => {
                error!(error = %e, "Store failure");
                internal_error(e.to_string())
            }
            RegistryError::Internal(details) => {
                error!(error = %details, "Internal failure");
                internal_error(details)
            }
        }
    }
}

fn internal_error(details: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal Server Error",
            "details": details,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        let cases = [
            (RegistryError::InvalidRequest("nope"), StatusCode::BAD_REQUEST),
            (RegistryError::NotFound("gone"), StatusCode::NOT_FOUND),
            (
                RegistryError::Store(StoreError::Duplicate("shortId abc123".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                RegistryError::Internal("bad header".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
