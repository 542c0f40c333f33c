//! Error types for the wmtsgrid library.

use thiserror::Error;

/// Errors that can occur while navigating a tile grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Zoom-in requested at the deepest level.
    #[error("Cannot zoom in any further (already at level {max})")]
    MaxZoom { max: u8 },

    /// Zoom-out requested at the shallowest level.
    #[error("Cannot zoom out any further (already at level {min})")]
    MinZoom { min: u8 },

    /// A zoom level outside the supported pyramid.
    #[error("Zoom level {zoom} out of range (valid: 0-10)")]
    ZoomOutOfRange { zoom: u8 },

    /// The zoom matrix has no identifier for this level.
    #[error("No tile matrix identifier for zoom level {zoom}")]
    MissingMatrix { zoom: u8 },

    /// Grid offsets must each be -1, 0 or 1.
    #[error("Grid offset out of range: row={row}, col={col} (valid: -1..=1)")]
    InvalidOffset { row: i64, col: i64 },

    /// The display has no image slot at this grid position.
    #[error("Image slot img{row}{col} absent")]
    MissingSlot { row: u8, col: u8 },

    /// A pan, zoom-in or neighbouring tile would leave the `i64` range.
    #[error("Tile coordinate overflow from col={col}, row={row}")]
    CoordinateOverflow { col: i64, row: i64 },

    /// Text that does not name a navigation command.
    #[error("Unknown navigation command: {0}")]
    UnknownCommand(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GridError {
    /// True for the two user-misuse errors raised at the ends of the zoom range.
    pub fn is_boundary(&self) -> bool {
        matches!(self, GridError::MaxZoom { .. } | GridError::MinZoom { .. })
    }
}

/// Result type alias using [`GridError`].
pub type Result<T> = std::result::Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridError::MaxZoom { max: 10 };
        assert!(err.to_string().contains("10"));

        let err = GridError::MissingSlot { row: 1, col: 2 };
        assert!(err.to_string().contains("img12"));

        let err = GridError::InvalidOffset { row: 2, col: 0 };
        assert!(err.to_string().contains("row=2"));

        let err = GridError::UnknownCommand("sideways".to_string());
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn test_is_boundary() {
        assert!(GridError::MaxZoom { max: 10 }.is_boundary());
        assert!(GridError::MinZoom { min: 0 }.is_boundary());
        assert!(!GridError::MissingMatrix { zoom: 3 }.is_boundary());
        assert!(!GridError::Config("x".to_string()).is_boundary());
    }
}
