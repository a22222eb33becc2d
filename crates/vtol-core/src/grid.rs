//! Bounded occupancy grid over the restricted-zone region.
//!
//! Cells are stored row-major in one flat allocation. Rows grow northwards
//! and columns eastwards from the south-west corner of the zones' bounding
//! box, which is also the grid's projection reference. Occupancy only ever
//! goes from free to occupied.

use crate::error::ConfigError;
use crate::models::{GeoPoint, PlanarPoint};
use crate::spatial::{to_geo, to_planar};
use crate::zones::ZoneCatalog;
use tracing::debug;

/// Row/column index of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True when `other` is one of the 8 neighbours of `self`.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        let drow = self.row.abs_diff(other.row);
        let dcol = self.col.abs_diff(other.col);
        drow <= 1 && dcol <= 1 && (drow, dcol) != (0, 0)
    }
}

#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    reference: GeoPoint,
    resolution_m: f64,
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Allocate a free grid that covers every zone in `catalog`, padded by
    /// `margin_m` on each side.
    ///
    /// The cell budget is checked before anything is allocated.
    pub fn build(
        catalog: &ZoneCatalog,
        resolution_m: f64,
        margin_m: f64,
        max_cells: usize,
    ) -> Result<Self, ConfigError> {
        if !resolution_m.is_finite() || resolution_m <= 0.0 {
            return Err(ConfigError::InvalidResolution(resolution_m));
        }
        if !margin_m.is_finite() || margin_m < 0.0 {
            return Err(ConfigError::InvalidMargin(margin_m));
        }
        let bounds = catalog.bounds(margin_m);
        let reference = bounds.south_west();
        let extent = to_planar(reference, bounds.north_east());

        let width = (extent.x / resolution_m).ceil();
        let height = (extent.y / resolution_m).ceil();
        if !width.is_finite() || !height.is_finite() || width * height > max_cells as f64 {
            return Err(ConfigError::GridTooLarge {
                cells: (width * height) as u128,
                max: max_cells,
            });
        }

        let grid = Self::with_dimensions(
            reference,
            resolution_m,
            width.max(0.0) as usize,
            height.max(0.0) as usize,
            max_cells,
        )?;
        debug!(
            width = grid.width,
            height = grid.height,
            resolution_m,
            ref_lat = reference.lat,
            ref_lon = reference.lon,
            "allocated occupancy grid"
        );
        Ok(grid)
    }

    /// Allocate a free grid with explicit dimensions.
    pub fn with_dimensions(
        reference: GeoPoint,
        resolution_m: f64,
        width: usize,
        height: usize,
        max_cells: usize,
    ) -> Result<Self, ConfigError> {
        if !resolution_m.is_finite() || resolution_m <= 0.0 {
            return Err(ConfigError::InvalidResolution(resolution_m));
        }
        if width == 0 || height == 0 {
            return Err(ConfigError::DegenerateGrid { width, height });
        }
        let cells = width as u128 * height as u128;
        if cells > max_cells as u128 {
            return Err(ConfigError::GridTooLarge {
                cells,
                max: max_cells,
            });
        }
        Ok(Self {
            reference,
            resolution_m,
            width,
            height,
            cells: vec![false; width * height],
        })
    }

    pub fn reference(&self) -> GeoPoint {
        self.reference
    }

    pub fn resolution_m(&self) -> f64 {
        self.resolution_m
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Flat index of `cell`, or `None` when it lies outside the grid.
    pub fn index(&self, cell: Cell) -> Option<usize> {
        (cell.row < self.height && cell.col < self.width).then(|| cell.row * self.width + cell.col)
    }

    /// Cell at a signed offset from `cell`, if it is inside the grid.
    pub fn offset(&self, cell: Cell, drow: isize, dcol: isize) -> Option<Cell> {
        let row = cell.row.checked_add_signed(drow)?;
        let col = cell.col.checked_add_signed(dcol)?;
        (row < self.height && col < self.width).then_some(Cell { row, col })
    }

    /// Out-of-bounds cells report as occupied.
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.index(cell).map(|idx| self.cells[idx]).unwrap_or(true)
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        !self.is_occupied(cell)
    }

    /// Mark `cell` occupied. Returns true if it was free before.
    pub fn occupy(&mut self, cell: Cell) -> bool {
        match self.index(cell) {
            Some(idx) if !self.cells[idx] => {
                self.cells[idx] = true;
                true
            }
            _ => false,
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|occupied| **occupied).count()
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(move |(idx, _)| Cell::new(idx / width, idx % width))
    }

    /// Copy of the current occupancy, row-major.
    pub(crate) fn snapshot(&self) -> Vec<bool> {
        self.cells.clone()
    }

    /// Planar position of `point` in this grid's frame.
    pub fn project(&self, point: GeoPoint) -> PlanarPoint {
        to_planar(self.reference, point)
    }

    /// Cell index containing `point` without bounds checks.
    ///
    /// May be negative or beyond the grid; callers clip as needed.
    pub fn raw_index(&self, point: GeoPoint) -> (i64, i64) {
        let planar = self.project(point);
        (
            (planar.y / self.resolution_m).floor() as i64,
            (planar.x / self.resolution_m).floor() as i64,
        )
    }

    /// Cell containing `point`, or `None` when it falls outside the grid.
    pub fn cell_of(&self, point: GeoPoint) -> Option<Cell> {
        if !point.is_finite() {
            return None;
        }
        let planar = self.project(point);
        let row = (planar.y / self.resolution_m).floor();
        let col = (planar.x / self.resolution_m).floor();
        if row < 0.0 || col < 0.0 || row >= self.height as f64 || col >= self.width as f64 {
            return None;
        }
        Some(Cell::new(row as usize, col as usize))
    }

    /// Geographic position of the south-west corner of `cell`.
    pub fn cell_origin(&self, cell: Cell) -> GeoPoint {
        to_geo(
            self.reference,
            PlanarPoint {
                x: cell.col as f64 * self.resolution_m,
                y: cell.row as f64 * self.resolution_m,
            },
        )
    }
}
