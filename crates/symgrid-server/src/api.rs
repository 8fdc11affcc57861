//! API handlers for the server.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use symgrid_core::{CellState, Metrics, SeedMode, Thresholds};
use symgrid_world::{ExportedState, SharedEngine};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub engine: SharedEngine,
}

/// Build the API router around the live engine
pub fn router(engine: SharedEngine) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/grid", get(get_grid))
        .route("/grid/set", post(set_cell))
        .route("/grid/reset", post(reset_grid))
        .route("/grid/size/:n", post(set_grid_size))
        .route("/grid/step", post(step_grid))
        .route("/grid/seed", post(set_seed))
        .route("/grid/thresholds", get(get_thresholds).post(set_thresholds))
        .route("/grid/import", post(import_grid))
        .route("/grid/export", get(export_grid))
        .route("/metrics", get(get_metrics))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { engine })
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[derive(Serialize)]
pub struct SuccessResponse {
    success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Exported state plus the matrix repeated under `grid`, the key the
/// browser client reads. Import prefers `cells` when both are present.
#[derive(Serialize)]
pub struct StateResponse {
    #[serde(flatten)]
    state: ExportedState,
    grid: Vec<Vec<CellState>>,
}

impl From<ExportedState> for StateResponse {
    fn from(state: ExportedState) -> Self {
        let grid = state.cells.clone();
        Self { state, grid }
    }
}

/// Current exported state
pub async fn get_grid(State(state): State<AppState>) -> Json<StateResponse> {
    Json(state.engine.export_state().into())
}

/// Same payload as `get_grid`, kept as a separate route for clients that save patterns
pub async fn export_grid(State(state): State<AppState>) -> Json<StateResponse> {
    Json(state.engine.export_state().into())
}

#[derive(Deserialize)]
pub struct SetCellRequest {
    x: i64,
    y: i64,
    value: i64,
}

pub async fn set_cell(
    State(state): State<AppState>,
    Json(req): Json<SetCellRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state
        .engine
        .with(|engine| engine.set_cell(req.x, req.y, req.value))?;
    Ok(SuccessResponse::ok())
}

pub async fn reset_grid(State(state): State<AppState>) -> Json<SuccessResponse> {
    state.engine.with(|engine| engine.reset());
    SuccessResponse::ok()
}

pub async fn set_grid_size(
    State(state): State<AppState>,
    Path(n): Path<usize>,
) -> Result<Json<SuccessResponse>, ApiError> {
    info!("Grid resize requested: {}", n);
    state.engine.with(|engine| engine.set_size(n))?;
    Ok(SuccessResponse::ok())
}

/// Advance one generation and return the new state
pub async fn step_grid(State(state): State<AppState>) -> Json<StateResponse> {
    let exported = state.engine.with(|engine| {
        engine.step();
        engine.export_state()
    });
    Json(exported.into())
}

pub async fn get_metrics(State(state): State<AppState>) -> Json<Metrics> {
    Json(state.engine.with(|engine| engine.metrics()))
}

#[derive(Deserialize)]
pub struct SetSeedRequest {
    mode: String,
}

pub async fn set_seed(
    State(state): State<AppState>,
    Json(req): Json<SetSeedRequest>,
) -> Json<StateResponse> {
    let mode = SeedMode::from(req.mode.as_str());
    if mode == SeedMode::Clear && req.mode != "clear" {
        warn!("Unknown seed mode {:?}, resetting grid", req.mode);
    }

    let exported = state.engine.with(|engine| {
        engine.set_seed(mode);
        engine.export_state()
    });
    Json(exported.into())
}

pub async fn get_thresholds(State(state): State<AppState>) -> Json<Thresholds> {
    Json(state.engine.with(|engine| engine.thresholds()))
}

#[derive(Serialize)]
pub struct ThresholdsResponse {
    success: bool,
    #[serde(flatten)]
    thresholds: Thresholds,
}

pub async fn set_thresholds(
    State(state): State<AppState>,
    Json(req): Json<Thresholds>,
) -> Json<ThresholdsResponse> {
    let thresholds = state.engine.with(|engine| {
        engine.set_thresholds(req.pos_threshold, req.neg_threshold);
        engine.thresholds()
    });
    Json(ThresholdsResponse {
        success: true,
        thresholds,
    })
}

/// Replace the live state; rejected blobs leave it untouched
pub async fn import_grid(
    State(state): State<AppState>,
    Json(blob): Json<serde_json::Value>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.engine.with(|engine| engine.import_json(blob))?;
    Ok(SuccessResponse::ok())
}

// Error handling
pub enum ApiError {
    BadRequest(String),
    Unprocessable(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = ErrorBody {
            success: false,
            error: message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<symgrid_core::Error> for ApiError {
    fn from(err: symgrid_core::Error) -> Self {
        use symgrid_core::Error;

        match err {
            Error::MalformedState(_) => {
                warn!("Rejected import: {}", err);
                ApiError::Unprocessable(err.to_string())
            }
            Error::InvalidCell(_) | Error::InvalidSize(_) => {
                warn!("Rejected request: {}", err);
                ApiError::BadRequest(err.to_string())
            }
            Error::Config(_) => {
                error!("Engine error: {}", err);
                ApiError::Internal(err.to_string())
            }
        }
    }
}
