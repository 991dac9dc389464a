use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info, instrument, warn};

use crate::{
    error::RegistryError,
    state::AppState,
    types::{ShortenRequest, ShortenResponse, UserUrlsRequest},
    utils::encode_location,
};

fn reject(rejection: JsonRejection) -> Response {
    let error_message = match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            json!({"error": "Expected 'Content-Type: application/json' header"})
        }
        JsonRejection::JsonSyntaxError(_) => json!({"error": "JSON syntax error"}),
        JsonRejection::JsonDataError(_) => json!({"error": "JSON data structure mismatch"}),
        _ => json!({"error": "Unknown JSON parsing error"}),
    };
    error!(error = ?rejection, "JSON parsing error");
    (StatusCode::BAD_REQUEST, Json(error_message)).into_response()
}

#[instrument]
pub async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello, world!" }))
}

#[instrument(skip(state, payload))]
pub async fn shorten(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return reject(rejection),
    };

    match state
        .registry
        .shorten(payload.url.as_deref(), payload.id.as_deref())
        .await
    {
        Ok(shortened) => {
            let status = if shortened.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            let response = ShortenResponse {
                shortened_url: shortened.shortened_url,
            };
            (status, Json(response)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Shorten failed");
            e.into_response()
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn user_urls(
    State(state): State<AppState>,
    payload: Result<Json<UserUrlsRequest>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return reject(rejection),
    };

    match state.registry.list_user_urls(payload.user_id.as_deref()).await {
        Ok(urls) => {
            info!(count = urls.len(), "Listed user URLs");
            (StatusCode::OK, Json(urls)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "User URL listing failed");
            e.into_response()
        }
    }
}

#[instrument(skip(state))]
pub async fn redirect(State(state): State<AppState>, Path(short_id): Path<String>) -> Response {
    let location = state
        .registry
        .resolve(&short_id)
        .await
        .and_then(|original_url| {
            HeaderValue::try_from(encode_location(&original_url))
                .map_err(|e| RegistryError::Internal(e.to_string()))
        });

    match location {
        Ok(location) => {
            info!(short_id = %short_id, "Redirecting to original URL");
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        Err(e) => {
            warn!(short_id = %short_id, error = %e, "Redirect failed");
            e.into_response()
        }
    }
}
