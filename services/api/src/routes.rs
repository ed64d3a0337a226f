use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::atomic::Ordering;
use workforce_analytics::error::AppError;
use workforce_analytics::scrapers::{
    parse_listings, FetchMode, JobBoardScraper, JobListing, ListingSelectors, ScanReport,
    ScanSummary,
};

#[derive(Debug, Deserialize)]
pub(crate) struct ScanRequest {
    pub(crate) url: String,
    #[serde(default)]
    pub(crate) selectors: Option<ListingSelectors>,
    #[serde(default)]
    pub(crate) static_only: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ParseRequest {
    pub(crate) html: String,
    pub(crate) base_url: String,
    #[serde(default)]
    pub(crate) selectors: Option<ListingSelectors>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScanResponse {
    #[serde(flatten)]
    pub(crate) report: ScanReport,
    /// Listings kept by this board's scraper since the service started.
    pub(crate) positions_analyzed: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct ParseResponse {
    pub(crate) listings: Vec<JobListing>,
    pub(crate) summary: ScanSummary,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/scans", post(scan_endpoint))
        .route("/api/v1/listings/parse", post(parse_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn scan_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, AppError> {
    let ScanRequest {
        url,
        selectors,
        static_only,
    } = payload;

    if url.trim().is_empty() {
        return Err(AppError::Input("url is required".to_string()));
    }

    let selectors = selectors.unwrap_or_default();
    let mode = if static_only {
        FetchMode::Static
    } else {
        FetchMode::Rendered
    };
    let scraper = state
        .scrapers
        .get_or_create(&url, mode, &selectors, &state.fetcher)?;

    let response = tokio::task::spawn_blocking(move || -> Result<ScanResponse, AppError> {
        let report = scraper.scan()?;
        Ok(ScanResponse {
            report,
            positions_analyzed: scraper.positions_analyzed(),
        })
    })
    .await
    .map_err(|err| AppError::Server(axum::Error::new(err)))??;

    Ok(Json(response))
}

pub(crate) async fn parse_endpoint(
    Json(payload): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, AppError> {
    let ParseRequest {
        html,
        base_url,
        selectors,
    } = payload;

    let listings = parse_listings(&html, &base_url, &selectors.unwrap_or_default())?;
    let summary = ScanSummary::from_listings(&listings);

    Ok(Json(ParseResponse { listings, summary }))
}
