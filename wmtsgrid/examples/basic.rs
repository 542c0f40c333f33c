//! Basic example demonstrating wmtsgrid library usage.
//!
//! Run with: cargo run --example basic -- ORTHO image/jpeg

use std::env;
use wmtsgrid::{Command, FixedSelection, GridError, GridUrls, TileEngine};

fn main() -> Result<(), GridError> {
    let mut args = env::args().skip(1);
    let layer = args.next().unwrap_or_else(|| "ORTHO".to_string());
    let format = args.next().unwrap_or_else(|| "image/jpeg".to_string());

    let mut engine = TileEngine::default();
    let selection = FixedSelection::new(layer, format);
    let mut display = GridUrls::new();

    // Walk a short route, zooming past the deepest level on purpose
    let route = [
        Command::Right,
        Command::Down,
        Command::ZoomIn,
        Command::ZoomIn,
        Command::ZoomOut,
    ];

    for cmd in route {
        match engine.apply(cmd, &selection, &mut display) {
            Ok(_) => {
                let state = engine.state();
                println!(
                    "{:<9} col={} row={} matrix={}",
                    cmd,
                    state.column,
                    state.row,
                    engine.current_matrix()?
                );
            }
            Err(e) if e.is_boundary() => println!("{:<9} {}", cmd, e),
            Err(e) => return Err(e),
        }
    }

    println!("\nTile grid:");
    println!("{:-<50}", "");
    for row in display.rows() {
        for url in row.iter().flatten() {
            println!("{}", url);
        }
    }

    Ok(())
}
