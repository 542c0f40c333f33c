use anyhow::Result;
use std::io::{self, BufRead, Write};
use wmtsgrid::{Command, FixedSelection, GridUrls, TileEngine};

use super::{current_selection, engine_from_args, is_refused, write_grid};
use crate::EngineArgs;

const HELP: &str = "\
moves:   left/h  right/l  up/k  down/j  zoom-in/+  zoom-out/-
picks:   layer <id>  format <mime>
other:   redraw  help  quit";

pub fn run(args: &EngineArgs) -> Result<()> {
    let mut engine = engine_from_args(args)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    session(&mut engine, stdin.lock(), stdout.lock())
}

/// Read one instruction per line and redraw after each.
fn session<R: BufRead, W: Write>(engine: &mut TileEngine, input: R, mut out: W) -> Result<()> {
    let mut selection = current_selection(engine);
    let mut display = GridUrls::new();

    writeln!(out, "{}", HELP)?;
    engine.refresh_grid(&selection, &mut display)?;
    write_grid(&mut out, engine, &display)?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));

        match word {
            "" => {}
            "q" | "quit" | "exit" => break,
            "help" | "?" => writeln!(out, "{}", HELP)?,
            "redraw" | "r" => {
                engine.refresh_grid(&selection, &mut display)?;
                write_grid(&mut out, engine, &display)?;
            }
            "layer" | "format" => {
                let value = rest.trim();
                if value.is_empty() {
                    writeln!(out, "usage: {} <value>", word)?;
                } else {
                    selection = update_selection(selection, word, value);
                    engine.refresh_grid(&selection, &mut display)?;
                    write_grid(&mut out, engine, &display)?;
                }
            }
            _ => match word.parse::<Command>() {
                Ok(cmd) => match engine.apply(cmd, &selection, &mut display) {
                    Ok(_) => write_grid(&mut out, engine, &display)?,
                    Err(e) if is_refused(&e) => writeln!(out, "{}", e)?,
                    Err(e) => return Err(e.into()),
                },
                Err(e) => writeln!(out, "{} (type 'help')", e)?,
            },
        }

        write!(out, "> ")?;
        out.flush()?;
    }

    writeln!(out)?;
    Ok(())
}

fn update_selection(current: FixedSelection, which: &str, value: &str) -> FixedSelection {
    match which {
        "layer" => FixedSelection::new(value, current.format),
        _ => FixedSelection::new(current.layer, value),
    }
}
