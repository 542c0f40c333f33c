//! Tile navigation engine with builder-based configuration.
//!
//! [`TileEngine`] owns one [`ViewportState`] together with the URL template
//! and zoom matrix it is rendered through. Every operation runs to completion
//! synchronously; callers that share an engine across threads wrap it in a
//! lock.
//!
//! ```
//! use wmtsgrid::{Command, EngineBuilder, FixedSelection, GridUrls};
//!
//! let mut engine = EngineBuilder::new()
//!     .template("https://example.com/wmts/__LAYER__/__ZOOM__/__ROW__/__COL__.__FORMAT__")
//!     .position(10, 20)
//!     .zoom(9)
//!     .build()?;
//!
//! let selection = FixedSelection::new("ORTHO", "png");
//! let mut display = GridUrls::new();
//! engine.apply(Command::Right, &selection, &mut display)?;
//!
//! assert_eq!(engine.state().column, 11);
//! # Ok::<(), wmtsgrid::GridError>(())
//! ```

use crate::command::Command;
use crate::error::{GridError, Result};
use crate::grid::{GridOffset, GridReport, GridUrls, Selection, Slot, TileDisplay};
use crate::matrix::{ZoomMatrix, MAX_ZOOM};
use crate::template::{TileRequest, UrlTemplate};
use crate::viewport::ViewportState;

/// Navigation engine for a 3×3 tile neighbourhood.
#[derive(Debug, Clone)]
pub struct TileEngine {
    template: UrlTemplate,
    matrix: ZoomMatrix,
    state: ViewportState,
    diagnostics: bool,
}

impl Default for TileEngine {
    fn default() -> Self {
        Self::new(UrlTemplate::default(), ZoomMatrix::default(), ViewportState::default())
    }
}

impl TileEngine {
    /// Create an engine from its parts with diagnostics off.
    pub fn new(template: UrlTemplate, matrix: ZoomMatrix, state: ViewportState) -> Self {
        Self {
            template,
            matrix,
            state,
            diagnostics: false,
        }
    }

    /// Create a builder with default settings.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }

    pub fn matrix(&self) -> &ZoomMatrix {
        &self.matrix
    }

    pub fn diagnostics(&self) -> bool {
        self.diagnostics
    }

    /// Turn diagnostic mode on or off.
    pub fn set_diagnostics(&mut self, enabled: bool) {
        self.diagnostics = enabled;
    }

    /// Matrix identifier for the current zoom level.
    pub fn current_matrix(&self) -> Result<&str> {
        self.matrix.identifier(self.state.zoom)
    }

    /// See [`ViewportState::pan_left`]; all four pans refuse to step past
    /// the ends of `i64`.
    pub fn pan_left(&mut self) -> Result<()> {
        let result = self.state.pan_left();
        self.trace("pan-left");
        result
    }

    pub fn pan_right(&mut self) -> Result<()> {
        let result = self.state.pan_right();
        self.trace("pan-right");
        result
    }

    pub fn pan_up(&mut self) -> Result<()> {
        let result = self.state.pan_up();
        self.trace("pan-up");
        result
    }

    pub fn pan_down(&mut self) -> Result<()> {
        let result = self.state.pan_down();
        self.trace("pan-down");
        result
    }

    /// See [`ViewportState::zoom_in`].
    pub fn zoom_in(&mut self) -> Result<()> {
        let result = self.state.zoom_in();
        self.trace("zoom-in");
        result
    }

    /// See [`ViewportState::zoom_out`].
    pub fn zoom_out(&mut self) -> Result<()> {
        let result = self.state.zoom_out();
        self.trace("zoom-out");
        result
    }

    /// Build the request URL for the tile at `offset` from the centre.
    ///
    /// # Errors
    ///
    /// - [`GridError::MissingMatrix`] if the current zoom level has no
    ///   matrix identifier
    /// - [`GridError::CoordinateOverflow`] if the neighbour lies past the
    ///   ends of `i64`
    pub fn build_tile_url(&self, offset: GridOffset) -> Result<String> {
        let (column, row) = self.state.tile_at(offset.col(), offset.row())?;
        let request = TileRequest {
            column,
            row,
            matrix: self.current_matrix()?,
            layer: &self.state.layer,
            format: &self.state.format,
        };
        Ok(self.template.render(&request))
    }

    /// Read the current selection, then assign all nine tile URLs.
    ///
    /// A slot the display lacks is recorded in the report and the remaining
    /// slots are still filled. If any URL cannot be built, no slot is
    /// assigned.
    pub fn refresh_grid<S, D>(&mut self, selection: &S, display: &mut D) -> Result<GridReport>
    where
        S: Selection + ?Sized,
        D: TileDisplay + ?Sized,
    {
        self.state.format = selection.format();
        self.state.layer = selection.layer();
        if self.diagnostics {
            tracing::debug!(
                layer = %self.state.layer,
                format = %self.state.format,
                "Selection read"
            );
        }

        // All nine URLs are built before any slot is touched
        let tiles = GridOffset::all()
            .map(|offset| self.build_tile_url(offset).map(|url| (offset.slot(), url)))
            .collect::<Result<Vec<_>>>()?;

        let mut report = GridReport::default();
        for (slot, url) in tiles {
            if self.diagnostics {
                tracing::debug!(slot = %slot.element_id(), url = %url, "Tile assigned");
            }
            match display.assign(slot, url.clone()) {
                Ok(()) => {}
                Err(GridError::MissingSlot { .. }) => {
                    tracing::warn!(slot = %slot.element_id(), "Image slot absent");
                    report.missing.push(slot);
                }
                Err(e) => return Err(e),
            }
            report.urls.push(url);
        }
        Ok(report)
    }

    /// Run one navigation command and redraw.
    ///
    /// A command that fails (zooming past the edge of the pyramid, or moving
    /// so that a grid tile would lie past the ends of `i64`) leaves the state
    /// untouched and the display unchanged.
    pub fn apply<S, D>(
        &mut self,
        command: Command,
        selection: &S,
        display: &mut D,
    ) -> Result<GridReport>
    where
        S: Selection + ?Sized,
        D: TileDisplay + ?Sized,
    {
        let previous = self.state.clone();
        let moved = match command {
            Command::Left => self.pan_left(),
            Command::Right => self.pan_right(),
            Command::Up => self.pan_up(),
            Command::Down => self.pan_down(),
            Command::ZoomIn => self.zoom_in(),
            Command::ZoomOut => self.zoom_out(),
        };
        let result = moved.and_then(|()| self.refresh_grid(selection, display));
        if result.is_err() {
            self.state = previous;
        }
        result
    }

    /// Render the current grid without touching any external display.
    pub fn grid_urls(&self) -> Result<GridUrls> {
        let mut grid = GridUrls::new();
        for offset in GridOffset::all() {
            grid.assign(offset.slot(), self.build_tile_url(offset)?)?;
        }
        Ok(grid)
    }

    fn trace(&self, op: &str) {
        if !self.diagnostics {
            return;
        }
        tracing::debug!(
            op,
            col = self.state.column,
            row = self.state.row,
            layer = %self.state.layer,
            format = %self.state.format,
            zoom = self.current_matrix().unwrap_or("?"),
            "Viewport state"
        );
    }
}

/// Builder for creating a [`TileEngine`] with custom configuration.
///
/// # Example
///
/// ```ignore
/// use wmtsgrid::EngineBuilder;
///
/// let engine = EngineBuilder::from_env()?
///     .layer("ORTHO")
///     .diagnostics(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    template: UrlTemplate,
    matrix: ZoomMatrix,
    state: ViewportState,
    diagnostics: bool,
}

impl EngineBuilder {
    /// Create a builder with the default template, matrix and position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `WMTSGRID_URL_TEMPLATE` | Tile URL template | ROK4 GetTile |
    /// | `WMTSGRID_MATRIX` | 11 comma-separated identifiers, level 0 first | `512,...,1,0_5` |
    /// | `WMTSGRID_COL` | Starting tile column | 3715 |
    /// | `WMTSGRID_ROW` | Starting tile row | 40025 |
    /// | `WMTSGRID_ZOOM` | Starting zoom level | 9 |
    /// | `WMTSGRID_LAYER` | Starting layer | `__NOLAYER__` |
    /// | `WMTSGRID_FORMAT` | Starting format | `__NOFORMAT__` |
    /// | `WMTSGRID_DEBUG` | Diagnostic mode (`true`/`1`) | false |
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Config`] if a value is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`EngineBuilder::from_env`] with a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::new();

        if let Some(template) = lookup("WMTSGRID_URL_TEMPLATE") {
            builder = builder.template(template);
        }
        if let Some(matrix) = lookup("WMTSGRID_MATRIX") {
            builder = builder.matrix(matrix.parse()?);
        }
        if let Some(col) = parse_var(&lookup, "WMTSGRID_COL")? {
            builder.state.column = col;
        }
        if let Some(row) = parse_var(&lookup, "WMTSGRID_ROW")? {
            builder.state.row = row;
        }
        if let Some(zoom) = parse_var(&lookup, "WMTSGRID_ZOOM")? {
            builder = builder.zoom(zoom);
        }
        if let Some(layer) = lookup("WMTSGRID_LAYER") {
            builder = builder.layer(layer);
        }
        if let Some(format) = lookup("WMTSGRID_FORMAT") {
            builder = builder.format(format);
        }
        if let Some(debug) = lookup("WMTSGRID_DEBUG") {
            builder = builder.diagnostics(debug.eq_ignore_ascii_case("true") || debug == "1");
        }

        Ok(builder)
    }

    pub fn template(mut self, template: impl Into<UrlTemplate>) -> Self {
        self.template = template.into();
        self
    }

    pub fn matrix(mut self, matrix: ZoomMatrix) -> Self {
        self.matrix = matrix;
        self
    }

    /// Set the starting centre tile.
    pub fn position(mut self, column: i64, row: i64) -> Self {
        self.state.column = column;
        self.state.row = row;
        self
    }

    /// Set the starting zoom level. Checked in [`EngineBuilder::build`].
    pub fn zoom(mut self, zoom: u8) -> Self {
        self.state.zoom = zoom;
        self
    }

    pub fn layer(mut self, layer: impl Into<String>) -> Self {
        self.state.layer = layer.into();
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.state.format = format.into();
        self
    }

    /// Enable diagnostic mode: the engine logs its full state at debug level
    /// after every operation.
    pub fn diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Build the [`TileEngine`].
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ZoomOutOfRange`] if the starting zoom is above
    /// level 10.
    pub fn build(self) -> Result<TileEngine> {
        if self.state.zoom > MAX_ZOOM {
            return Err(GridError::ZoomOutOfRange {
                zoom: self.state.zoom,
            });
        }
        let mut engine = TileEngine::new(self.template, self.matrix, self.state);
        engine.set_diagnostics(self.diagnostics);
        Ok(engine)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| GridError::Config(format!("{} has an invalid value: {:?}", name, value))),
        None => Ok(None),
    }
}
