//! Tile request URL templates.
//!
//! A template is an opaque string with placeholder tokens. Rendering is plain
//! text replacement of every occurrence of each token; nothing about the URL
//! is parsed or validated.
//!
//! # Placeholders
//!
//! - `__COL__` - Tile column
//! - `__ROW__` - Tile row
//! - `__ZOOM__` - Tile matrix identifier for the zoom level (e.g., "0_5")
//! - `__LAYER__` - Layer identifier
//! - `__FORMAT__` - Image format (e.g., "image/png")

use std::fmt;

/// Column placeholder.
pub const COL_TOKEN: &str = "__COL__";
/// Row placeholder.
pub const ROW_TOKEN: &str = "__ROW__";
/// Tile matrix placeholder.
pub const ZOOM_TOKEN: &str = "__ZOOM__";
/// Layer placeholder.
pub const LAYER_TOKEN: &str = "__LAYER__";
/// Format placeholder.
pub const FORMAT_TOKEN: &str = "__FORMAT__";

/// KVP GetTile request against a ROK4 WMTS server.
pub const DEFAULT_TEMPLATE: &str = "http://obernai.ign.fr/rok4/bin/rok4?SERVICE=WMTS&REQUEST=GetTile&tileCol=__COL__&tileRow=__ROW__&tileMatrix=__ZOOM__&LAYER=__LAYER__&STYLES=&FORMAT=__FORMAT__&DPI=96&TRANSPARENT=TRUE";

/// Values substituted into a template for one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRequest<'a> {
    pub column: i64,
    pub row: i64,
    pub matrix: &'a str,
    pub layer: &'a str,
    pub format: &'a str,
}

/// Immutable URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UrlTemplate(String);

impl UrlTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute every placeholder occurrence with the request's values.
    pub fn render(&self, request: &TileRequest<'_>) -> String {
        self.0
            .replace(COL_TOKEN, &request.column.to_string())
            .replace(ROW_TOKEN, &request.row.to_string())
            .replace(LAYER_TOKEN, request.layer)
            .replace(FORMAT_TOKEN, request.format)
            .replace(ZOOM_TOKEN, request.matrix)
    }

    /// Placeholder tokens the template actually contains.
    pub fn tokens(&self) -> Vec<&'static str> {
        [COL_TOKEN, ROW_TOKEN, ZOOM_TOKEN, LAYER_TOKEN, FORMAT_TOKEN]
            .into_iter()
            .filter(|token| self.0.contains(token))
            .collect()
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UrlTemplate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UrlTemplate {
    fn from(s: String) -> Self {
        Self(s)
    }
}
