//! # wmtsgrid - WMTS tile-grid navigation
//!
//! Builds tile request URLs from a template string and numeric tile
//! coordinates, and drives a 3×3 neighbourhood of image slots around the
//! current position through arrow-style navigation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use wmtsgrid::{Command, FixedSelection, GridOffset, GridUrls, TileEngine};
//!
//! let mut engine = TileEngine::default();
//! let selection = FixedSelection::new("ORTHO", "image/jpeg");
//! let mut display = GridUrls::new();
//!
//! engine.apply(Command::ZoomIn, &selection, &mut display)?;
//! println!("{}", engine.build_tile_url(GridOffset::CENTER)?);
//! ```
//!
//! ## Tile Pyramid
//!
//! Zoom levels run from 0 to 10. Each level is addressed on the server by a
//! tile matrix identifier taken from a [`ZoomMatrix`]; the default pyramid
//! names them after their resolution in metres per pixel, from `"512"` at
//! level 0 to `"0_5"` at level 10.
//!
//! Zooming in doubles the tile column and row. Zooming out halves them,
//! rounding odd values up first.
//!
//! ## URL Templates
//!
//! Templates are opaque strings. `__COL__`, `__ROW__`, `__ZOOM__`,
//! `__LAYER__` and `__FORMAT__` are replaced wherever they occur.

pub mod command;
pub mod engine;
pub mod error;
pub mod grid;
pub mod matrix;
pub mod template;
pub mod viewport;

// Re-export main types at crate root for convenience
pub use command::Command;
pub use engine::{EngineBuilder, TileEngine};
pub use error::{GridError, Result};
pub use grid::{FixedSelection, GridOffset, GridReport, GridUrls, Selection, Slot, TileDisplay};
pub use matrix::{ZoomMatrix, MAX_ZOOM, MIN_ZOOM};
pub use template::{TileRequest, UrlTemplate};
pub use viewport::ViewportState;

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn test_state_serialize() {
        let json = serde_json::to_value(ViewportState::default()).unwrap();
        assert_eq!(json["column"], 3715);
        assert_eq!(json["zoom"], 9);
        assert_eq!(json["layer"], "__NOLAYER__");
    }

    #[test]
    fn test_command_kebab_case() {
        let json = serde_json::to_string(&Command::ZoomOut).unwrap();
        assert_eq!(json, "\"zoom-out\"");
        let cmd: Command = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(cmd, Command::Left);
    }

    #[test]
    fn test_template_transparent() {
        let json = serde_json::to_string(&UrlTemplate::new("a/__COL__")).unwrap();
        assert_eq!(json, "\"a/__COL__\"");
    }
}
