use serde::{Deserialize, Serialize};

/// Body of `POST /shorten`. Presence is checked by the registry so that a
/// missing field and an empty one get the same answer.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub shortened_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUrlsRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUrl {
    pub original_url: String,
    pub shortened_url: String,
}
