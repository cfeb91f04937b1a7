//! HTTP API for the wealth data service.

use crate::cache::CacheHandle;
use crate::config::ApiConfig;
use crate::error::Error;
use crate::models::{BillionaireRecord, BillionairesSnapshot, DataSource, WealthResponse};
use crate::upstream::BillionaireApi;
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Header the hosting platform's scheduler attaches to cron invocations.
pub const TRUSTED_SCHEDULER_HEADER: &str = "x-vercel-cron";

/// Shared state for request handlers.
pub struct AppState {
    pub config: ApiConfig,
    pub cache: CacheHandle,
    pub upstream: BillionaireApi,
}

type SharedState = Arc<AppState>;

/// Build the API router.
pub fn build_router(state: SharedState) -> Router {
    // CORS layer for browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/wealth", get(get_wealth))
        .route(
            "/api/cron/update-wealth",
            get(update_wealth).post(update_wealth),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

// --- Wealth query ---

async fn get_wealth(State(state): State<SharedState>) -> Json<WealthResponse> {
    let (source, data) = match state.cache.read_billionaires().await {
        Some(snapshot) => (DataSource::Cache, snapshot),
        None => (DataSource::Fallback, BillionairesSnapshot::fallback(Utc::now())),
    };

    Json(WealthResponse {
        success: true,
        source,
        data,
    })
}

// --- Refresh trigger ---

/// Whether a refresh request may proceed.
///
/// With no secret configured the endpoint is open.
pub fn is_authorized(headers: &HeaderMap, secret: Option<&str>) -> bool {
    let Some(secret) = secret else {
        return true;
    };
    if headers.contains_key(TRUSTED_SCHEDULER_HEADER) {
        return true;
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| tokens_match(token.as_bytes(), secret.as_bytes()))
        .unwrap_or(false)
}

/// Byte comparison whose running time depends only on the secret's length.
fn tokens_match(given: &[u8], secret: &[u8]) -> bool {
    let mut diff = given.len() ^ secret.len();
    for (i, byte) in secret.iter().enumerate() {
        diff |= usize::from(byte ^ given.get(i).copied().unwrap_or(0));
    }
    diff == 0
}

#[derive(Debug, Serialize)]
struct ParseDebug {
    fields: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug: Option<ParseDebug>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            debug: None,
        }
    }

    fn with_message(mut self, message: impl ToString) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

#[derive(Debug, Serialize)]
struct UpdateResponse {
    success: bool,
    data: BillionaireRecord,
}

fn refresh_error(err: Error) -> Response {
    let (status, body) = match err {
        Error::ParseFailure { message, fields } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody {
                debug: Some(ParseDebug { fields }),
                ..ErrorBody::new("Could not parse net worth").with_message(message)
            },
        ),
        Error::RemoteFetchFailed(message) => (
            StatusCode::BAD_GATEWAY,
            ErrorBody::new("Upstream fetch failed").with_message(message),
        ),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::new("Wealth update failed").with_message(other),
        ),
    };
    (status, Json(body)).into_response()
}

async fn update_wealth(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if !is_authorized(&headers, state.config.cron_secret.as_deref()) {
        tracing::warn!("Rejected unauthorized wealth refresh");
        return (StatusCode::UNAUTHORIZED, Json(ErrorBody::new("Unauthorized"))).into_response();
    }

    let record = match state.upstream.fetch_record().await {
        Ok(record) => record,
        Err(e) => {
            tracing::error!("Wealth refresh failed: {}", e);
            return refresh_error(e);
        }
    };

    match state.cache.write_billionaire(record).await {
        Ok(snapshot) => Json(UpdateResponse {
            success: true,
            data: snapshot.elon_musk,
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Could not store refreshed wealth: {}", e);
            refresh_error(e)
        }
    }
}
