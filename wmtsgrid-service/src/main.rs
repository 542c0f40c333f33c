//! wmtsgrid Service - browser viewer and JSON API for WMTS tile-grid navigation.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `WMTSGRID_PORT` | HTTP server port | 8080 |
//! | `WMTSGRID_URL_TEMPLATE` | Tile URL template | ROK4 GetTile |
//! | `WMTSGRID_MATRIX` | 11 comma-separated matrix identifiers, level 0 first | `512,...,1,0_5` |
//! | `WMTSGRID_COL` / `WMTSGRID_ROW` | Starting tile | 3715 / 40025 |
//! | `WMTSGRID_ZOOM` | Starting zoom level | 9 |
//! | `WMTSGRID_LAYER` / `WMTSGRID_FORMAT` | Starting layer/format | placeholders |
//! | `WMTSGRID_LAYERS` | Layer picker values | `ORTHO,ORTHO_RAW,ORTHO_TIFF` |
//! | `WMTSGRID_FORMATS` | Format picker values | `image/jpeg,image/png,image/tiff` |
//! | `WMTSGRID_DEBUG` | Log engine state after every operation | false |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /` - Viewer page
//! - `GET /state` - Current viewport
//! - `GET /grid?layer=&format=` - Redraw the 3×3 grid
//! - `POST /navigate/{command}` - left, right, up, down, zoom-in, zoom-out
//! - `GET /tile?row_offset=&col_offset=` - Single tile URL
//! - `GET /matrix` - Zoom matrix
//! - `GET /options` - Picker values
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wmtsgrid::EngineBuilder;
use wmtsgrid_service::{router, AppState, OptionsResponse};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wmtsgrid_service=info,wmtsgrid=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("WMTSGRID_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let engine = EngineBuilder::from_env()?.build()?;
    let options = OptionsResponse::from_env();

    tracing::info!(
        template = %engine.template(),
        col = engine.state().column,
        row = engine.state().row,
        zoom = engine.state().zoom,
        diagnostics = engine.diagnostics(),
        layers = options.layers.len(),
        formats = options.formats.len(),
        port = port,
        "Starting wmtsgrid service"
    );

    let app = router(Arc::new(AppState::new(engine, options)));

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Viewer on http://{}/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
