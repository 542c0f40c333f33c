//! Viewport state and the navigation arithmetic on it.
//!
//! Panning moves the centre tile by one column or row. Indices may go
//! negative; only a step past the ends of `i64` is refused. Zooming moves between pyramid levels: each
//! zoom-in halves the tile size, so the same ground point maps to coordinates
//! scaled by two.

use crate::error::{GridError, Result};
use crate::matrix::{MAX_ZOOM, MIN_ZOOM};

/// Layer placeholder used until a selection has been read.
pub const NO_LAYER: &str = "__NOLAYER__";

/// Format placeholder used until a selection has been read.
pub const NO_FORMAT: &str = "__NOFORMAT__";

/// Current position in the tile pyramid.
///
/// `zoom` is always within `MIN_ZOOM..=MAX_ZOOM`; every mutator preserves that.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    /// Tile column of the centre tile.
    pub column: i64,
    /// Tile row of the centre tile.
    pub row: i64,
    /// Zoom level (0 = shallowest).
    pub zoom: u8,
    /// Layer identifier substituted into tile URLs.
    pub layer: String,
    /// Image format substituted into tile URLs.
    pub format: String,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            column: 3715,
            row: 40025,
            zoom: 9,
            layer: NO_LAYER.to_string(),
            format: NO_FORMAT.to_string(),
        }
    }
}

impl ViewportState {
    /// Create a state at the given position with placeholder layer/format.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ZoomOutOfRange`] if `zoom` exceeds [`MAX_ZOOM`].
    pub fn new(column: i64, row: i64, zoom: u8) -> Result<Self> {
        if zoom > MAX_ZOOM {
            return Err(GridError::ZoomOutOfRange { zoom });
        }
        Ok(Self {
            column,
            row,
            zoom,
            ..Self::default()
        })
    }

    /// Move one column left.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CoordinateOverflow`] at `i64::MIN`; the state is
    /// untouched.
    pub fn pan_left(&mut self) -> Result<()> {
        self.column = self.shift(self.column, -1)?;
        Ok(())
    }

    pub fn pan_right(&mut self) -> Result<()> {
        self.column = self.shift(self.column, 1)?;
        Ok(())
    }

    pub fn pan_up(&mut self) -> Result<()> {
        self.row = self.shift(self.row, -1)?;
        Ok(())
    }

    pub fn pan_down(&mut self) -> Result<()> {
        self.row = self.shift(self.row, 1)?;
        Ok(())
    }

    /// Column and row of the tile `col_offset`/`row_offset` away from the
    /// centre.
    pub fn tile_at(&self, col_offset: i64, row_offset: i64) -> Result<(i64, i64)> {
        Ok((
            self.shift(self.column, col_offset)?,
            self.shift(self.row, row_offset)?,
        ))
    }

    fn shift(&self, value: i64, delta: i64) -> Result<i64> {
        value
            .checked_add(delta)
            .ok_or(GridError::CoordinateOverflow {
                col: self.column,
                row: self.row,
            })
    }

    /// Go one level deeper, doubling column and row.
    ///
    /// # Errors
    ///
    /// - [`GridError::MaxZoom`] at [`MAX_ZOOM`]
    /// - [`GridError::CoordinateOverflow`] if doubling overflows `i64`
    ///
    /// The state is untouched on error.
    pub fn zoom_in(&mut self) -> Result<()> {
        if self.zoom >= MAX_ZOOM {
            return Err(GridError::MaxZoom { max: MAX_ZOOM });
        }
        let overflow = GridError::CoordinateOverflow {
            col: self.column,
            row: self.row,
        };
        let column = self.column.checked_mul(2).ok_or_else(|| overflow.clone())?;
        let row = self.row.checked_mul(2).ok_or(overflow)?;

        self.zoom += 1;
        self.column = column;
        self.row = row;
        Ok(())
    }

    /// Go one level shallower, halving column and row.
    ///
    /// An odd coordinate is bumped up by one before halving, so `5` becomes
    /// `3` and `4` becomes `2`. Zooming in and back out therefore does not
    /// always land on the starting tile.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::MinZoom`] at [`MIN_ZOOM`]; the state is untouched.
    pub fn zoom_out(&mut self) -> Result<()> {
        if self.zoom == MIN_ZOOM {
            return Err(GridError::MinZoom { min: MIN_ZOOM });
        }
        self.zoom -= 1;
        self.column = halve_rounding_up(self.column);
        self.row = halve_rounding_up(self.row);
        Ok(())
    }
}

/// Odd values (including negative ones) count as the next even value, so
/// `5` gives `3` and `-3` gives `-1`.
fn halve_rounding_up(value: i64) -> i64 {
    value.div_euclid(2) + value.rem_euclid(2)
}
