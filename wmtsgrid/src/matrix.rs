//! Zoom level to tile matrix identifier mapping.
//!
//! WMTS tile matrices are addressed by an identifier string that need not be
//! numeric or dense (`"0_5"` is a valid identifier). [`ZoomMatrix`] maps every
//! navigable zoom level to one of those identifiers and is validated once at
//! construction so lookups never hit a gap.

use std::fmt;
use std::str::FromStr;

use crate::error::{GridError, Result};

/// Shallowest navigable zoom level.
pub const MIN_ZOOM: u8 = 0;

/// Deepest navigable zoom level.
pub const MAX_ZOOM: u8 = 10;

/// Number of zoom levels in the pyramid.
pub const LEVELS: usize = (MAX_ZOOM - MIN_ZOOM) as usize + 1;

/// Identifiers of the default pyramid, level 0 first. Each level halves the
/// resolution in metres per pixel, the deepest being half a metre.
const DEFAULT_IDENTIFIERS: [&str; LEVELS] = [
    "512", "256", "128", "64", "32", "16", "8", "4", "2", "1", "0_5",
];

/// Dense, read-only mapping from zoom level (0..=10) to matrix identifier.
///
/// # Example
///
/// ```
/// use wmtsgrid::ZoomMatrix;
///
/// let matrix = ZoomMatrix::default();
/// assert_eq!(matrix.identifier(9).unwrap(), "1");
/// assert_eq!(matrix.identifier(10).unwrap(), "0_5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoomMatrix {
    identifiers: Vec<String>,
}

impl ZoomMatrix {
    /// Build a matrix from `(level, identifier)` pairs in any order.
    ///
    /// # Errors
    ///
    /// - [`GridError::ZoomOutOfRange`] if a level is above [`MAX_ZOOM`]
    /// - [`GridError::MissingMatrix`] for the first level left undefined
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, S)>,
        S: Into<String>,
    {
        let mut slots: Vec<Option<String>> = vec![None; LEVELS];
        for (zoom, identifier) in entries {
            let slot = slots
                .get_mut(zoom as usize)
                .ok_or(GridError::ZoomOutOfRange { zoom })?;
            *slot = Some(identifier.into());
        }

        let identifiers = slots
            .into_iter()
            .enumerate()
            .map(|(zoom, id)| id.ok_or(GridError::MissingMatrix { zoom: zoom as u8 }))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { identifiers })
    }

    /// Look up the identifier for a zoom level.
    pub fn identifier(&self, zoom: u8) -> Result<&str> {
        self.identifiers
            .get(zoom as usize)
            .map(String::as_str)
            .ok_or(GridError::MissingMatrix { zoom })
    }

    /// Iterate over `(level, identifier)` pairs, shallowest level first.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.identifiers
            .iter()
            .enumerate()
            .map(|(zoom, id)| (zoom as u8, id.as_str()))
    }
}

impl Default for ZoomMatrix {
    fn default() -> Self {
        Self {
            identifiers: DEFAULT_IDENTIFIERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Parses a comma-separated list of identifiers, level 0 first.
impl FromStr for ZoomMatrix {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        let ids: Vec<&str> = s.split(',').map(str::trim).collect();
        if ids.len() != LEVELS || ids.iter().any(|id| id.is_empty()) {
            return Err(GridError::Config(format!(
                "zoom matrix needs {} non-empty comma-separated identifiers, got {:?}",
                LEVELS, s
            )));
        }
        Self::from_entries(ids.into_iter().enumerate().map(|(z, id)| (z as u8, id)))
    }
}

impl fmt::Display for ZoomMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifiers.join(","))
    }
}
