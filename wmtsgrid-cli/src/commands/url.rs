use anyhow::{Context, Result};
use serde::Serialize;
use wmtsgrid::GridOffset;

use super::engine_from_args;
use crate::EngineArgs;

#[derive(Serialize)]
struct TileUrl {
    col: i64,
    row: i64,
    zoom: u8,
    matrix: String,
    url: String,
}

pub fn run(args: &EngineArgs, row_offset: i64, col_offset: i64, json: bool) -> Result<()> {
    let engine = engine_from_args(args)?;
    let offset = GridOffset::new(row_offset, col_offset)?;

    let url = engine
        .build_tile_url(offset)
        .context("Failed to build tile URL")?;

    if json {
        let state = engine.state();
        let (col, row) = state.tile_at(offset.col(), offset.row())?;
        let response = TileUrl {
            col,
            row,
            zoom: state.zoom,
            matrix: engine.current_matrix()?.to_string(),
            url,
        };
        println!("{}", serde_json::to_string(&response)?);
    } else {
        println!("{}", url);
    }

    Ok(())
}
