// Axum API Server Module
//
// Purpose: REST surface over the thermochron pipeline
// - POST /api/curve computes a curve for caller-supplied highs (no I/O)
// - GET /api/thermochron runs geocode + archive + engine for a ZIP code

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::engine::{self, ThermochronCurve};
use crate::error::ThermochronError;
use crate::pipeline::RunRequest;
use crate::types::ThermochronResult;
use crate::{open_meteo_runner, OpenMeteoRunner};

/// Longest series `/api/curve` accepts (~55 years of days); cost is O(n²)
pub const MAX_SERIES_LEN: usize = 20_000;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<OpenMeteoRunner>,
    /// Full pipeline responses keyed by request
    pub cache: Cache<String, Arc<Vec<ThermochronResult>>>,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        tracing::info!("Initializing Open-Meteo runner (cache dir {:?})...", config.cache_dir);
        let runner = Arc::new(open_meteo_runner(config)?);

        tracing::info!("Initializing Moka cache...");
        let cache = Cache::builder()
            .max_capacity(1_000)
            .time_to_live(Duration::from_secs(3600)) // matches recent-archive expiry
            .build();

        Ok(Self { runner, cache })
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/curve", post(compute_curve))
        .route("/api/thermochron", get(get_thermochron))
        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Curve for an arbitrary series
///
/// POST /api/curve  {"daily_highs": [30, 20, 40, 10, 50]}
async fn compute_curve(Json(payload): Json<CurveRequest>) -> Result<Json<ThermochronCurve>, AppError> {
    if payload.daily_highs.len() > MAX_SERIES_LEN {
        return Err(AppError::BadRequest(format!(
            "daily_highs has {} readings (max {})",
            payload.daily_highs.len(),
            MAX_SERIES_LEN
        )));
    }
    if let Some(i) = payload.daily_highs.iter().position(|v| !v.is_finite()) {
        return Err(AppError::BadRequest(format!("daily_highs[{}] is not a finite number", i)));
    }

    tracing::debug!("Computing curve for {} readings", payload.daily_highs.len());

    // CPU-bound: O(n²) in the series length
    let curve = tokio::task::spawn_blocking(move || engine::compute(&payload.daily_highs))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    Ok(Json(curve))
}

/// Curves for a ZIP code
///
/// GET /api/thermochron?zip=06515&seasons=2022,2023&reference_date=2024-03-01
async fn get_thermochron(
    State(state): State<AppState>,
    Query(params): Query<ThermochronQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let request = params.into_request()?;
    let cache_key = format!(
        "thermochron:{}:{:?}:{:?}",
        request.zip_code, request.seasons, request.reference_date
    );

    let results = match state.cache.get(&cache_key).await {
        Some(cached) => {
            tracing::debug!("Cache hit for {}", cache_key);
            cached
        }
        None => {
            let results = Arc::new(state.runner.run(&request).await?);
            state.cache.insert(cache_key, results.clone()).await;
            results
        }
    };

    Ok(Json(serde_json::json!({
        "rows": results.len(),
        "data": results.as_slice(),
    })))
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(serde::Deserialize, Debug)]
struct CurveRequest {
    daily_highs: Vec<f64>,
}

#[derive(serde::Deserialize, Debug)]
struct ThermochronQuery {
    zip: String,
    /// Comma-separated season start years (e.g., "2021,2022,2023")
    seasons: Option<String>,
    reference_date: Option<NaiveDate>,
}

impl ThermochronQuery {
    fn into_request(self) -> Result<RunRequest, AppError> {
        let seasons = match self.seasons.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(list) => Some(
                list.split(',')
                    .map(|s| {
                        s.trim()
                            .parse::<i32>()
                            .map_err(|_| AppError::BadRequest(format!("Invalid season year: {:?}", s)))
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };

        Ok(RunRequest {
            zip_code: self.zip,
            seasons,
            reference_date: self.reference_date,
        })
    }
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Upstream(String),
    Unavailable(String),
    Internal(String),
}

impl From<ThermochronError> for AppError {
    fn from(err: ThermochronError) -> Self {
        let message = err.to_string();
        if err.is_transient() {
            return AppError::Unavailable(message);
        }
        match err {
            ThermochronError::NotFound { .. } => AppError::NotFound(message),
            ThermochronError::SeasonNotStarted { .. } | ThermochronError::InvalidInput(_) => {
                AppError::BadRequest(message)
            }
            ThermochronError::Http { .. } | ThermochronError::Data(_) => AppError::Upstream(message),
            ThermochronError::Cache(_) | ThermochronError::Json(_) | ThermochronError::Task(_) => {
                AppError::Internal(message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            tracing::warn!("{}: {}", status, message);
        }

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
