use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use wmtsgrid::{TileEngine, TileRequest, ViewportState};

use super::engine_from_args;
use crate::EngineArgs;

pub fn run(args: &EngineArgs, input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let engine = engine_from_args(args)?;

    let output_path = output.unwrap_or_else(|| default_output(&input));

    let file = File::open(&input).context("Failed to open input file")?;
    let output_file = File::create(&output_path).context("Failed to create output file")?;

    let written = process_csv(&engine, BufReader::new(file), BufWriter::new(output_file), true)?;
    tracing::debug!(
        input = %input.display(),
        output = %output_path.display(),
        rows = written,
        "Batch complete"
    );

    println!(
        "{} tile URLs written to: {}",
        written,
        output_path.display()
    );
    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tiles".to_string());
    input.with_file_name(format!("{}_urls.csv", stem))
}

/// Append a `url` column to every record; returns the number of rows written.
///
/// Each record is rendered with the engine's template and matrix at its own
/// `col`/`row`/`zoom`. Missing `layer`/`format` cells fall back to the
/// engine's current values.
fn process_csv<R: Read, W: Write>(
    engine: &TileEngine,
    input: R,
    output: W,
    progress: bool,
) -> Result<u64> {
    let mut reader = csv::Reader::from_reader(input);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let col_idx = column("col").context("Column 'col' not found in CSV")?;
    let row_idx = column("row").context("Column 'row' not found in CSV")?;
    let zoom_idx = column("zoom").context("Column 'zoom' not found in CSV")?;
    let layer_idx = column("layer");
    let format_idx = column("format");

    // Collect records for progress bar
    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;
    let total = records.len() as u64;

    let pb = if progress {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut writer = csv::Writer::from_writer(output);

    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.push("url");
    writer.write_record(&new_headers)?;

    let defaults = engine.state();
    for (line, record) in records.iter().enumerate() {
        // Header is line 1
        let line = line + 2;
        let field = |idx: usize, name: &str| {
            record
                .get(idx)
                .map(str::trim)
                .with_context(|| format!("Missing {} on line {}", name, line))
        };

        let col: i64 = field(col_idx, "col")?
            .parse()
            .with_context(|| format!("Invalid col on line {}", line))?;
        let row: i64 = field(row_idx, "row")?
            .parse()
            .with_context(|| format!("Invalid row on line {}", line))?;
        let zoom: u8 = field(zoom_idx, "zoom")?
            .parse()
            .with_context(|| format!("Invalid zoom on line {}", line))?;

        let state = ViewportState::new(col, row, zoom)
            .with_context(|| format!("Invalid position on line {}", line))?;
        let layer = optional_cell(record, layer_idx).unwrap_or(defaults.layer.as_str());
        let format = optional_cell(record, format_idx).unwrap_or(defaults.format.as_str());

        let url = engine.template().render(&TileRequest {
            column: state.column,
            row: state.row,
            matrix: engine.matrix().identifier(state.zoom)?,
            layer,
            format,
        });

        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.push(&url);
        writer.write_record(&new_record)?;

        pb.inc(1);
    }

    pb.finish_with_message("done");
    writer.flush()?;

    Ok(total)
}

fn optional_cell(record: &csv::StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use wmtsgrid::EngineBuilder;

    fn engine() -> TileEngine {
        EngineBuilder::new()
            .template("__LAYER__/__ZOOM__/__COL__/__ROW__.__FORMAT__")
            .layer("ORTHO")
            .format("jpg")
            .build()
            .unwrap()
    }

    fn process(input: &str) -> Result<String> {
        let mut out = Vec::new();
        process_csv(&engine(), input.as_bytes(), &mut out, false)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_appends_url_column() {
        let out = process("name,col,row,zoom\nA,3715,40025,9\nB,-1,2,10\n").unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "name,col,row,zoom,url");
        assert_eq!(lines[1], "A,3715,40025,9,ORTHO/1/3715/40025.jpg");
        assert_eq!(lines[2], "B,-1,2,10,ORTHO/0_5/-1/2.jpg");
    }

    #[test]
    fn test_per_row_layer_and_format() {
        let out = process("col,row,zoom,layer,format\n1,2,0,ORTHO_RAW,png\n1,2,0,,\n").unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "1,2,0,ORTHO_RAW,png,ORTHO_RAW/512/1/2.png");
        assert_eq!(lines[2], "1,2,0,,,ORTHO/512/1/2.jpg");
    }

    #[test]
    fn test_missing_column() {
        let err = process("col,row\n1,2\n").unwrap_err();
        assert!(err.to_string().contains("zoom"));
    }

    #[test]
    fn test_zoom_out_of_range() {
        let err = process("col,row,zoom\n1,2,11\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_run_writes_default_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("positions.csv");
        fs::write(&input, "col,row,zoom\n3715,40025,9\n").unwrap();

        run(&EngineArgs::default(), input, None).unwrap();

        let written = fs::read_to_string(temp_dir.path().join("positions_urls.csv")).unwrap();
        assert!(written.contains("tileCol=3715&tileRow=40025&tileMatrix=1"));
    }
}
