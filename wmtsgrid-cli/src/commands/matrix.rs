use anyhow::Result;

use super::engine_from_args;
use crate::EngineArgs;

pub fn run(args: &EngineArgs) -> Result<()> {
    let engine = engine_from_args(args)?;
    let current = engine.state().zoom;

    println!("{:>5}  {:<12}", "ZOOM", "MATRIX");
    println!("{}", "-".repeat(20));

    for (zoom, identifier) in engine.matrix().iter() {
        let marker = if zoom == current { "  <" } else { "" };
        println!("{:>5}  {:<12}{}", zoom, identifier, marker);
    }

    Ok(())
}
