use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// WMTS tile-grid navigation tool
#[derive(Parser)]
#[command(name = "wmtsgrid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Starting configuration of the navigation engine.
#[derive(Args, Debug, Clone, Default)]
pub struct EngineArgs {
    /// Tile URL template (__COL__, __ROW__, __ZOOM__, __LAYER__, __FORMAT__)
    #[arg(short, long, env = "WMTSGRID_URL_TEMPLATE", global = true)]
    pub template: Option<String>,

    /// Zoom matrix: 11 comma-separated identifiers, level 0 first
    #[arg(long, env = "WMTSGRID_MATRIX", global = true)]
    pub matrix: Option<String>,

    /// Starting tile column
    #[arg(long, env = "WMTSGRID_COL", global = true, allow_hyphen_values = true)]
    pub col: Option<i64>,

    /// Starting tile row
    #[arg(long, env = "WMTSGRID_ROW", global = true, allow_hyphen_values = true)]
    pub row: Option<i64>,

    /// Starting zoom level (0-10)
    #[arg(short, long, env = "WMTSGRID_ZOOM", global = true)]
    pub zoom: Option<u8>,

    /// Layer identifier
    #[arg(short, long, env = "WMTSGRID_LAYER", global = true)]
    pub layer: Option<String>,

    /// Image format
    #[arg(short, long, env = "WMTSGRID_FORMAT", global = true)]
    pub format: Option<String>,

    /// Print the engine state after every operation (stderr)
    #[arg(short, long, env = "WMTSGRID_DEBUG", global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the URL of one tile around the centre
    Url {
        /// Row offset from the centre tile (-1, 0, 1)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        row_offset: i64,

        /// Column offset from the centre tile (-1, 0, 1)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        col_offset: i64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Apply navigation moves, then print the 3x3 grid
    Grid {
        /// Moves to apply in order (left, right, up, down, zoom-in, zoom-out)
        #[arg(allow_hyphen_values = true)]
        moves: Vec<String>,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Navigate interactively, reading one move per line from stdin
    Navigate,

    /// Display the zoom matrix
    Matrix,

    /// Build tile URLs for every position in a CSV file
    Batch {
        /// Input CSV with col, row and zoom columns (layer, format optional)
        input: PathBuf,

        /// Output file (defaults to <input>_urls.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.engine.debug {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("wmtsgrid=debug"))
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Url {
            row_offset,
            col_offset,
            json,
        } => commands::url::run(&cli.engine, row_offset, col_offset, json),
        Commands::Grid { moves, json } => commands::grid::run(&cli.engine, &moves, json),
        Commands::Navigate => commands::navigate::run(&cli.engine),
        Commands::Matrix => commands::matrix::run(&cli.engine),
        Commands::Batch { input, output } => commands::batch::run(&cli.engine, input, output),
    }
}
