//! The 3×3 tile neighbourhood and the collaborators it is drawn into.
//!
//! The engine never owns the image slots or the layer/format pickers. It
//! writes URLs through [`TileDisplay`] and reads the current picks through
//! [`Selection`]; [`GridUrls`] and [`FixedSelection`] are in-memory versions
//! used by the CLI, the HTTP service and tests.

use crate::error::{GridError, Result};

/// Side length of the tile grid.
pub const GRID_SIZE: usize = 3;

/// Position of a tile relative to the centre tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridOffset {
    row: i8,
    col: i8,
}

impl GridOffset {
    /// The centre tile.
    pub const CENTER: GridOffset = GridOffset { row: 0, col: 0 };

    /// Create an offset; both components must be -1, 0 or 1.
    pub fn new(row: i64, col: i64) -> Result<Self> {
        if !(-1..=1).contains(&row) || !(-1..=1).contains(&col) {
            return Err(GridError::InvalidOffset { row, col });
        }
        Ok(Self {
            row: row as i8,
            col: col as i8,
        })
    }

    /// All nine offsets, row-major from the top-left tile.
    pub fn all() -> impl Iterator<Item = GridOffset> {
        (-1..=1i8).flat_map(|row| (-1..=1i8).map(move |col| GridOffset { row, col }))
    }

    pub fn row(&self) -> i64 {
        self.row as i64
    }

    pub fn col(&self) -> i64 {
        self.col as i64
    }

    /// Display slot this offset is drawn into.
    pub fn slot(&self) -> Slot {
        Slot {
            row: (self.row + 1) as u8,
            col: (self.col + 1) as u8,
        }
    }
}

/// Index of an image slot in the 3×3 display, `(0, 0)` top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    pub row: u8,
    pub col: u8,
}

impl Slot {
    /// Element id of the slot in the viewer page (`img00` .. `img22`).
    pub fn element_id(&self) -> String {
        format!("img{}{}", self.row, self.col)
    }
}

/// Externally owned image slots that tile URLs are assigned to.
pub trait TileDisplay {
    /// Point `slot` at `url`.
    ///
    /// Returns [`GridError::MissingSlot`] if the display has no such slot.
    fn assign(&mut self, slot: Slot, url: String) -> Result<()>;
}

/// Source of the currently selected layer and format.
pub trait Selection {
    fn layer(&self) -> String;
    fn format(&self) -> String;
}

/// A selection that never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSelection {
    pub layer: String,
    pub format: String,
}

impl FixedSelection {
    pub fn new(layer: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            layer: layer.into(),
            format: format.into(),
        }
    }
}

impl Selection for FixedSelection {
    fn layer(&self) -> String {
        self.layer.clone()
    }

    fn format(&self) -> String {
        self.format.clone()
    }
}

/// In-memory 3×3 display.
///
/// Slots can be removed to mimic a page that lacks some image elements; a
/// removed slot rejects assignments with [`GridError::MissingSlot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridUrls {
    slots: [[Option<String>; GRID_SIZE]; GRID_SIZE],
    present: [[bool; GRID_SIZE]; GRID_SIZE],
}

impl Default for GridUrls {
    fn default() -> Self {
        Self {
            slots: Default::default(),
            present: [[true; GRID_SIZE]; GRID_SIZE],
        }
    }
}

impl GridUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a slot from the display.
    pub fn without_slot(mut self, slot: Slot) -> Self {
        if let Some(present) = self
            .present
            .get_mut(slot.row as usize)
            .and_then(|r| r.get_mut(slot.col as usize))
        {
            *present = false;
        }
        self
    }

    /// URL currently assigned to a slot.
    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.slots
            .get(slot.row as usize)?
            .get(slot.col as usize)?
            .as_deref()
    }

    /// Rows of assigned URLs, top row first.
    pub fn rows(&self) -> &[[Option<String>; GRID_SIZE]; GRID_SIZE] {
        &self.slots
    }
}

impl TileDisplay for GridUrls {
    fn assign(&mut self, slot: Slot, url: String) -> Result<()> {
        let (r, c) = (slot.row as usize, slot.col as usize);
        let present = self
            .present
            .get(r)
            .and_then(|row| row.get(c))
            .copied()
            .unwrap_or(false);
        if !present {
            return Err(GridError::MissingSlot {
                row: slot.row,
                col: slot.col,
            });
        }
        self.slots[r][c] = Some(url);
        Ok(())
    }
}

/// Outcome of one grid refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridReport {
    /// The nine URLs built, row-major from the top-left tile.
    pub urls: Vec<String>,
    /// Slots the display did not have.
    pub missing: Vec<Slot>,
}

impl GridReport {
    /// True when every URL reached its slot.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_bounds() {
        assert!(GridOffset::new(-1, 1).is_ok());
        assert_eq!(
            GridOffset::new(2, 0),
            Err(GridError::InvalidOffset { row: 2, col: 0 })
        );
        assert!(GridOffset::new(0, -2).is_err());
    }

    #[test]
    fn test_all_offsets_row_major() {
        let offsets: Vec<(i64, i64)> = GridOffset::all().map(|o| (o.row(), o.col())).collect();
        assert_eq!(offsets.len(), 9);
        assert_eq!(offsets[0], (-1, -1));
        assert_eq!(offsets[1], (-1, 0));
        assert_eq!(offsets[4], (0, 0));
        assert_eq!(offsets[8], (1, 1));
    }

    #[test]
    fn test_offset_to_slot() {
        let slot = GridOffset::new(1, -1).unwrap().slot();
        assert_eq!(slot, Slot { row: 2, col: 0 });
        assert_eq!(slot.element_id(), "img20");
        assert_eq!(GridOffset::CENTER.slot().element_id(), "img11");
    }

    #[test]
    fn test_grid_urls_assign() {
        let mut grid = GridUrls::new();
        let slot = Slot { row: 0, col: 2 };
        grid.assign(slot, "a".to_string()).unwrap();
        assert_eq!(grid.get(slot), Some("a"));
        assert_eq!(grid.rows()[0][2].as_deref(), Some("a"));
        assert_eq!(grid.get(Slot { row: 1, col: 1 }), None);
    }

    #[test]
    fn test_grid_urls_missing_slot() {
        let slot = Slot { row: 1, col: 1 };
        let mut grid = GridUrls::new().without_slot(slot);
        assert_eq!(
            grid.assign(slot, "a".to_string()),
            Err(GridError::MissingSlot { row: 1, col: 1 })
        );
        assert!(grid
            .assign(Slot { row: 3, col: 0 }, "b".to_string())
            .is_err());
    }

    #[test]
    fn test_fixed_selection() {
        let sel = FixedSelection::new("ORTHO", "image/png");
        assert_eq!(sel.layer(), "ORTHO");
        assert_eq!(sel.format(), "image/png");
    }
}
