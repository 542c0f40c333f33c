pub mod batch;
pub mod grid;
pub mod matrix;
pub mod navigate;
pub mod url;

use anyhow::{Context, Result};
use std::io::Write;
use wmtsgrid::{EngineBuilder, FixedSelection, GridError, GridUrls, TileEngine, ZoomMatrix};

use crate::EngineArgs;

/// Build the engine from command-line arguments (which already fall back to
/// the `WMTSGRID_*` environment variables).
pub fn builder_from_args(args: &EngineArgs) -> Result<EngineBuilder> {
    let mut builder = EngineBuilder::new().diagnostics(args.debug);

    if let Some(template) = &args.template {
        builder = builder.template(template.as_str());
    }
    if let Some(matrix) = &args.matrix {
        let matrix: ZoomMatrix = matrix.parse().context("Invalid zoom matrix")?;
        builder = builder.matrix(matrix);
    }
    if args.col.is_some() || args.row.is_some() {
        let default = wmtsgrid::ViewportState::default();
        builder = builder.position(
            args.col.unwrap_or(default.column),
            args.row.unwrap_or(default.row),
        );
    }
    if let Some(zoom) = args.zoom {
        builder = builder.zoom(zoom);
    }
    if let Some(layer) = &args.layer {
        builder = builder.layer(layer.as_str());
    }
    if let Some(format) = &args.format {
        builder = builder.format(format.as_str());
    }

    Ok(builder)
}

pub fn engine_from_args(args: &EngineArgs) -> Result<TileEngine> {
    builder_from_args(args)?
        .build()
        .context("Failed to create tile engine")
}

/// Selection that keeps whatever layer/format the engine started with.
pub fn current_selection(engine: &TileEngine) -> FixedSelection {
    FixedSelection::new(engine.state().layer.clone(), engine.state().format.clone())
}

/// Moves the engine refused without changing anything; reported, not fatal.
pub fn is_refused(e: &GridError) -> bool {
    e.is_boundary() || matches!(e, GridError::CoordinateOverflow { .. })
}

/// Write the viewport line followed by the nine slot URLs, top row first.
pub fn write_grid<W: Write>(out: &mut W, engine: &TileEngine, display: &GridUrls) -> Result<()> {
    let state = engine.state();
    writeln!(
        out,
        "col={} row={} zoom={} ({}) layer={} format={}",
        state.column,
        state.row,
        state.zoom,
        engine.current_matrix()?,
        state.layer,
        state.format
    )?;
    for (i, row) in display.rows().iter().enumerate() {
        for (j, url) in row.iter().enumerate() {
            writeln!(out, "  img{}{}  {}", i, j, url.as_deref().unwrap_or("-"))?;
        }
    }
    Ok(())
}
