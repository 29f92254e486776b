use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use definer_types::WordEntry;

use crate::fetch::{FetchError, PageSource};
use crate::user_agents::UserAgentPool;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn PageSource>,
    pub user_agents: Arc<UserAgentPool>,
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/word/{word}", get(define))
        .route("/random", get(random_user_agent))
        .route("/ping", get(ping))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn ping() -> impl IntoResponse {
    "hello there"
}

async fn random_user_agent(State(state): State<AppState>) -> Json<String> {
    Json(state.user_agents.choose().to_string())
}

async fn define(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<WordEntry>, ApiError> {
    let word = parse_word(&raw)?;
    let html = state.source.fetch_definition_page(&word).await?;

    // The parsed document is !Send; it lives and dies inside this call.
    let entry = definer_extract::extract_html(&html);
    if !entry.is_found() {
        debug!(word = %word, "no definition on page");
        return Err(ApiError::NotFound);
    }
    Ok(Json(entry))
}

/// Lowercase `raw`, accepting only ASCII letters, whitespace and `-`.
pub fn parse_word(raw: &str) -> Result<String, ApiError> {
    let valid = !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_ascii_whitespace() || c == '-');
    if !valid {
        return Err(ApiError::InvalidWord);
    }
    Ok(raw.to_ascii_lowercase())
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Please provide word containing letters only.")]
    InvalidWord,
    #[error("No Definition found.")]
    NotFound,
    #[error("Too many request.")]
    TooManyRequests,
    #[error("Could not reach the dictionary source.")]
    Upstream(#[source] FetchError),
}

impl From<FetchError> for ApiError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::RateLimited => ApiError::TooManyRequests,
            other => ApiError::Upstream(other),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidWord => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Upstream(err) = &self {
            warn!("definition page fetch failed: {err}");
        }
        let body = Json(ErrorResponse {
            message: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_word_lowercases_and_validates() {
        assert_eq!(parse_word("Run").unwrap(), "run");
        assert_eq!(parse_word("ice cream").unwrap(), "ice cream");
        assert_eq!(parse_word("Well-Being").unwrap(), "well-being");
        assert!(matches!(parse_word(""), Err(ApiError::InvalidWord)));
        assert!(matches!(parse_word("r2d2"), Err(ApiError::InvalidWord)));
        assert!(matches!(parse_word("café"), Err(ApiError::InvalidWord)));
    }

    #[test]
    fn fetch_errors_map_to_statuses() {
        assert_eq!(
            ApiError::from(FetchError::RateLimited).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::from(FetchError::Status(503)).status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
