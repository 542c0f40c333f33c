//! wmtsgrid Service Library
//!
//! HTTP handlers, router and OpenAPI document for the tile-grid service.
//! This library is used by both the wmtsgrid-service binary and integration tests.

pub mod handlers;
mod viewer;

use std::sync::{Arc, Mutex};

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use wmtsgrid::TileEngine;

/// Picker values used when `WMTSGRID_LAYERS` is not set.
pub const DEFAULT_LAYERS: &[&str] = &["ORTHO", "ORTHO_RAW", "ORTHO_TIFF"];

/// Picker values used when `WMTSGRID_FORMATS` is not set.
pub const DEFAULT_FORMATS: &[&str] = &["image/jpeg", "image/png", "image/tiff"];

/// Application state shared across handlers.
pub struct AppState {
    /// The single navigation engine; each request runs one operation on it.
    pub engine: Mutex<TileEngine>,
    /// Values offered by the viewer's layer/format pickers.
    pub options: OptionsResponse,
}

impl AppState {
    pub fn new(engine: TileEngine, options: OptionsResponse) -> Self {
        Self {
            engine: Mutex::new(engine),
            options,
        }
    }
}

impl OptionsResponse {
    /// Picker values from `WMTSGRID_LAYERS` / `WMTSGRID_FORMATS`
    /// (comma-separated), falling back to the defaults.
    pub fn from_env() -> Self {
        Self {
            layers: list_from_env("WMTSGRID_LAYERS", DEFAULT_LAYERS),
            formats: list_from_env("WMTSGRID_FORMATS", DEFAULT_FORMATS),
        }
    }
}

impl Default for OptionsResponse {
    fn default() -> Self {
        Self {
            layers: DEFAULT_LAYERS.iter().map(|s| s.to_string()).collect(),
            formats: DEFAULT_FORMATS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn list_from_env(name: &str, default: &[&str]) -> Vec<String> {
    let values = std::env::var(name)
        .map(|v| parse_list(&v))
        .unwrap_or_default();
    if values.is_empty() {
        default.iter().map(|s| s.to_string()).collect()
    } else {
        values
    }
}

/// Split a comma-separated list, dropping empty entries.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// OpenAPI documentation for the wmtsgrid service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "wmtsgrid Tile Grid Service",
        version = "0.1.0",
        description = "Browser viewer and JSON API for navigating a 3x3 WMTS tile grid.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::viewer,
        handlers::get_state,
        handlers::get_grid,
        handlers::navigate,
        handlers::get_tile,
        handlers::get_matrix,
        handlers::get_options,
        handlers::health_check,
    ),
    components(
        schemas(
            handlers::StateResponse,
            handlers::GridResponse,
            handlers::TileResponse,
            handlers::MatrixLevel,
            handlers::MatrixResponse,
            handlers::OptionsResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "viewport", description = "Navigation and tile URL endpoints"),
        (name = "viewer", description = "Browser viewer"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::viewer))
        .route("/state", get(handlers::get_state))
        .route("/grid", get(handlers::get_grid))
        .route("/navigate/:command", post(handlers::navigate))
        .route("/tile", get(handlers::get_tile))
        .route("/matrix", get(handlers::get_matrix))
        .route("/options", get(handlers::get_options))
        .route("/health", get(handlers::health_check))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{
    ErrorResponse, GridResponse, HealthResponse, MatrixResponse, OptionsResponse,
    StateResponse, TileResponse,
};
