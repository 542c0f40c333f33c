use anyhow::Result;
use serde::Serialize;
use wmtsgrid::grid::GRID_SIZE;
use wmtsgrid::{Command, GridUrls, ViewportState};

use super::{current_selection, engine_from_args, is_refused, write_grid};
use crate::EngineArgs;

#[derive(Serialize)]
struct GridOutput<'a> {
    state: &'a ViewportState,
    matrix: &'a str,
    tiles: &'a [[Option<String>; GRID_SIZE]; GRID_SIZE],
}

pub fn run(args: &EngineArgs, moves: &[String], json: bool) -> Result<()> {
    let mut engine = engine_from_args(args)?;
    let selection = current_selection(&engine);

    // Parse everything first so a typo does not leave a half-applied route
    let commands = moves
        .iter()
        .map(|m| m.parse::<Command>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut display = GridUrls::new();
    engine.refresh_grid(&selection, &mut display)?;

    for cmd in commands {
        match engine.apply(cmd, &selection, &mut display) {
            Ok(_) => {}
            Err(e) if is_refused(&e) => eprintln!("{}: {}", cmd, e),
            Err(e) => return Err(e.into()),
        }
    }

    if json {
        let output = GridOutput {
            state: engine.state(),
            matrix: engine.current_matrix()?,
            tiles: display.rows(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        write_grid(&mut std::io::stdout().lock(), &engine, &display)?;
    }

    Ok(())
}
