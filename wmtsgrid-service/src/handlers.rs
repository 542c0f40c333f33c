//! HTTP request handlers for the tile-grid service.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, MutexGuard};
use utoipa::{IntoParams, ToSchema};
use wmtsgrid::{
    Command, FixedSelection, GridError, GridOffset, GridReport, GridUrls, TileEngine,
};

use crate::viewer::VIEWER_HTML;
use crate::AppState;

/// Layer/format picks sent by the viewer.
///
/// A missing value keeps the engine's current one.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SelectionQuery {
    /// Layer identifier (e.g., "ORTHO").
    pub layer: Option<String>,
    /// Image format (e.g., "image/jpeg").
    pub format: Option<String>,
}

/// Query parameters for the single-tile endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TileQuery {
    /// Row offset from the centre tile (-1, 0 or 1).
    #[serde(default)]
    pub row_offset: i64,
    /// Column offset from the centre tile (-1, 0 or 1).
    #[serde(default)]
    pub col_offset: i64,
}

/// Current viewport.
#[derive(Debug, Serialize, ToSchema)]
pub struct StateResponse {
    /// Centre tile column.
    pub column: i64,
    /// Centre tile row.
    pub row: i64,
    /// Zoom level (0-10).
    pub zoom: u8,
    /// Tile matrix identifier for the zoom level.
    pub matrix: String,
    /// Current layer.
    pub layer: String,
    /// Current format.
    pub format: String,
}

/// Viewport plus the 3×3 tile URLs around it.
#[derive(Debug, Serialize, ToSchema)]
pub struct GridResponse {
    /// Viewport the grid was drawn for.
    pub state: StateResponse,
    /// Tile URLs, top row first, each row left to right.
    pub tiles: Vec<Vec<String>>,
    /// Element ids of slots that could not be filled.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

/// A single tile URL.
#[derive(Debug, Serialize, ToSchema)]
pub struct TileResponse {
    pub row_offset: i64,
    pub col_offset: i64,
    pub url: String,
}

/// One zoom level of the tile pyramid.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatrixLevel {
    /// Zoom level.
    pub zoom: u8,
    /// Tile matrix identifier.
    pub identifier: String,
    /// Whether this is the engine's current level.
    pub current: bool,
}

/// The zoom matrix, shallowest level first.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatrixResponse {
    pub levels: Vec<MatrixLevel>,
}

/// Values offered by the viewer's pickers.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OptionsResponse {
    pub layers: Vec<String>,
    pub formats: Vec<String>,
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

impl StateResponse {
    fn from_engine(engine: &TileEngine) -> Self {
        let state = engine.state();
        Self {
            column: state.column,
            row: state.row,
            zoom: state.zoom,
            matrix: engine.current_matrix().unwrap_or_default().to_string(),
            layer: state.layer.clone(),
            format: state.format.clone(),
        }
    }
}

impl GridResponse {
    fn new(engine: &TileEngine, display: &GridUrls, report: &GridReport) -> Self {
        Self {
            state: StateResponse::from_engine(engine),
            tiles: display
                .rows()
                .iter()
                .map(|row| row.iter().map(|url| url.clone().unwrap_or_default()).collect())
                .collect(),
            missing: report.missing.iter().map(|s| s.element_id()).collect(),
        }
    }
}

fn lock_engine(state: &AppState) -> MutexGuard<'_, TileEngine> {
    // Every engine operation leaves the state valid, poisoned or not
    state.engine.lock().unwrap_or_else(|e| e.into_inner())
}

fn selection_for(engine: &TileEngine, query: SelectionQuery) -> FixedSelection {
    let current = engine.state();
    FixedSelection::new(
        query.layer.unwrap_or_else(|| current.layer.clone()),
        query.format.unwrap_or_else(|| current.format.clone()),
    )
}

/// Serve the browser viewer page.
#[utoipa::path(
    get,
    path = "/",
    tag = "viewer",
    responses((status = 200, description = "Viewer page", body = String, content_type = "text/html"))
)]
pub async fn viewer() -> Html<&'static str> {
    Html(VIEWER_HTML)
}

/// Get the current viewport.
#[utoipa::path(
    get,
    path = "/state",
    tag = "viewport",
    responses((status = 200, description = "Current viewport", body = StateResponse))
)]
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    let engine = lock_engine(&state);
    Json(StateResponse::from_engine(&engine))
}

/// Redraw the grid with the given layer/format picks.
#[utoipa::path(
    get,
    path = "/grid",
    tag = "viewport",
    params(SelectionQuery),
    responses(
        (status = 200, description = "Grid redrawn", body = GridResponse),
        (status = 500, description = "Engine error", body = ErrorResponse)
    )
)]
pub async fn get_grid(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SelectionQuery>,
) -> impl IntoResponse {
    let mut engine = lock_engine(&state);
    let selection = selection_for(&engine, query);
    let mut display = GridUrls::new();

    match engine.refresh_grid(&selection, &mut display) {
        Ok(report) => {
            tracing::debug!(
                layer = %selection.layer,
                format = %selection.format,
                "Grid redrawn"
            );
            (
                StatusCode::OK,
                Json(GridResponse::new(&engine, &display, &report)),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Apply a navigation command, then redraw.
///
/// # Path Parameters
///
/// - `command`: `left`, `right`, `up`, `down`, `zoom-in` or `zoom-out`
///
/// # Returns
///
/// - `200 OK` with the redrawn grid
/// - `400 Bad Request` for an unknown command, or a move that would push a
///   grid tile past the ends of `i64`
/// - `409 Conflict` when zooming past either end of the pyramid
#[utoipa::path(
    post,
    path = "/navigate/{command}",
    tag = "viewport",
    params(
        ("command" = String, Path, description = "Navigation command"),
        SelectionQuery
    ),
    responses(
        (status = 200, description = "Command applied", body = GridResponse),
        (status = 400, description = "Unknown command or tile coordinate overflow", body = ErrorResponse),
        (status = 409, description = "Zoom limit reached", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn navigate(
    State(state): State<Arc<AppState>>,
    Path(command): Path<String>,
    Query(query): Query<SelectionQuery>,
) -> impl IntoResponse {
    let command: Command = match command.parse() {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    let mut engine = lock_engine(&state);
    let selection = selection_for(&engine, query);
    let mut display = GridUrls::new();

    match engine.apply(command, &selection, &mut display) {
        Ok(report) => {
            tracing::info!(
                command = %command,
                col = engine.state().column,
                row = engine.state().row,
                zoom = engine.state().zoom,
                "Navigated"
            );
            (
                StatusCode::OK,
                Json(GridResponse::new(&engine, &display, &report)),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Build one tile URL relative to the centre tile.
#[utoipa::path(
    get,
    path = "/tile",
    tag = "viewport",
    params(TileQuery),
    responses(
        (status = 200, description = "Tile URL", body = TileResponse),
        (status = 400, description = "Offset out of range", body = ErrorResponse)
    )
)]
pub async fn get_tile(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TileQuery>,
) -> impl IntoResponse {
    let offset = match GridOffset::new(query.row_offset, query.col_offset) {
        Ok(o) => o,
        Err(e) => return error_response(e),
    };

    let engine = lock_engine(&state);
    match engine.build_tile_url(offset) {
        Ok(url) => (
            StatusCode::OK,
            Json(TileResponse {
                row_offset: query.row_offset,
                col_offset: query.col_offset,
                url,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// List the zoom matrix.
#[utoipa::path(
    get,
    path = "/matrix",
    tag = "viewport",
    responses((status = 200, description = "Zoom matrix", body = MatrixResponse))
)]
pub async fn get_matrix(State(state): State<Arc<AppState>>) -> Json<MatrixResponse> {
    let engine = lock_engine(&state);
    let current = engine.state().zoom;
    Json(MatrixResponse {
        levels: engine
            .matrix()
            .iter()
            .map(|(zoom, identifier)| MatrixLevel {
                zoom,
                identifier: identifier.to_string(),
                current: zoom == current,
            })
            .collect(),
    })
}

/// Layer and format values for the viewer's pickers.
#[utoipa::path(
    get,
    path = "/options",
    tag = "viewer",
    responses((status = 200, description = "Picker values", body = OptionsResponse))
)]
pub async fn get_options(State(state): State<Arc<AppState>>) -> Json<OptionsResponse> {
    Json(state.options.clone())
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Map an engine error to a status code and JSON body.
fn error_response(e: GridError) -> axum::response::Response {
    let status = match &e {
        GridError::MaxZoom { .. } | GridError::MinZoom { .. } => StatusCode::CONFLICT,
        GridError::InvalidOffset { .. }
        | GridError::UnknownCommand(_)
        | GridError::ZoomOutOfRange { .. }
        | GridError::CoordinateOverflow { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if e.is_boundary() {
        tracing::info!(error = %e, "Navigation refused");
    } else {
        tracing::warn!(error = %e, "Request failed");
    }

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_query_deserialize() {
        let json = r#"{"layer": "ORTHO"}"#;
        let query: SelectionQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.layer.as_deref(), Some("ORTHO"));
        assert!(query.format.is_none());
    }

    #[test]
    fn test_tile_query_defaults() {
        let query: TileQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.row_offset, 0);
        assert_eq!(query.col_offset, 0);
    }

    #[test]
    fn test_selection_falls_back_to_state() {
        let engine = TileEngine::builder()
            .layer("ORTHO")
            .format("image/png")
            .build()
            .unwrap();
        let sel = selection_for(
            &engine,
            SelectionQuery {
                layer: None,
                format: Some("image/jpeg".to_string()),
            },
        );
        assert_eq!(sel.layer, "ORTHO");
        assert_eq!(sel.format, "image/jpeg");
    }

    #[test]
    fn test_grid_response_omits_empty_missing() {
        let engine = TileEngine::default();
        let display = engine.grid_urls().unwrap();
        let response = GridResponse::new(&engine, &display, &GridReport::default());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("missing").is_none());
        assert_eq!(json["tiles"].as_array().unwrap().len(), 3);
        assert_eq!(json["state"]["matrix"], "1");
    }

    #[test]
    fn test_error_status_mapping() {
        let resp = error_response(GridError::MaxZoom { max: 10 });
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = error_response(GridError::UnknownCommand("x".to_string()));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = error_response(GridError::MissingMatrix { zoom: 3 });
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
