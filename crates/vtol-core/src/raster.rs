//! Zone rasterization and turn-radius buffering.
//!
//! Both passes use an index-space circle: a cell is inside when
//! `Δrow² + Δcol² <= r²` with `r = floor(radius_m / resolution)`, a
//! quantization of the true metric circle. A 150 m turn radius on a 100 m
//! grid therefore buffers by a plus shape, not a 3x3 block.

use crate::grid::{Cell, OccupancyGrid};
use crate::zones::ZoneCatalog;
use tracing::debug;

/// Whole cells covered by `radius_m`. `None` for NaN or negative input.
pub fn radius_in_cells(radius_m: f64, resolution_m: f64) -> Option<usize> {
    let cells = (radius_m / resolution_m).floor();
    if cells.is_nan() || cells < 0.0 {
        return None;
    }
    Some(cells as usize)
}

/// Offsets `(drow, dcol)` inside a circle of `radius_cells`.
///
/// Offsets further than `max_reach` along either axis are left out; callers
/// pass the larger grid dimension, beyond which every offset is off-grid.
fn disc_offsets(radius_cells: usize, max_reach: usize) -> Vec<(isize, isize)> {
    let reach = radius_cells.min(max_reach) as isize;
    let limit = (radius_cells as u128) * (radius_cells as u128);
    let mut offsets = Vec::new();
    for drow in -reach..=reach {
        for dcol in -reach..=reach {
            let dist_sq = (drow * drow) as u128 + (dcol * dcol) as u128;
            if dist_sq <= limit {
                offsets.push((drow, dcol));
            }
        }
    }
    offsets
}

/// True when a disc of `radius_cells` around any cell reaches every other cell.
fn covers_grid(radius_cells: usize, width: usize, height: usize) -> bool {
    let dw = width.saturating_sub(1) as u128;
    let dh = height.saturating_sub(1) as u128;
    let radius = radius_cells as u128;
    radius * radius >= dw * dw + dh * dh
}

/// Mark every cell inside each zone as occupied.
///
/// Returns the number of cells that changed from free to occupied.
pub fn mark_zones(grid: &mut OccupancyGrid, catalog: &ZoneCatalog) -> usize {
    let max_reach = grid.width().max(grid.height());
    let mut marked = 0usize;
    for zone in catalog.zones() {
        let Some(radius_cells) = radius_in_cells(zone.radius_m, grid.resolution_m()) else {
            continue;
        };
        let (center_row, center_col) = grid.raw_index(zone.center);
        for (drow, dcol) in disc_offsets(radius_cells, max_reach) {
            let row = center_row + drow as i64;
            let col = center_col + dcol as i64;
            if row < 0 || col < 0 {
                continue;
            }
            if grid.occupy(Cell::new(row as usize, col as usize)) {
                marked += 1;
            }
        }
    }
    debug!(zones = catalog.len(), marked, "rasterized restricted zones");
    marked
}

/// Dilate occupied cells by `turn_radius_m`.
///
/// Growth is computed from a snapshot taken before the pass, so cells
/// occupied by this call never seed further growth. Only occupied cells on
/// the edge of the snapshot seed growth: any cell within reach of an
/// interior cell is also within reach of an edge cell or already occupied.
pub fn dilate(grid: &mut OccupancyGrid, turn_radius_m: f64) -> usize {
    let radius_cells = match radius_in_cells(turn_radius_m, grid.resolution_m()) {
        Some(cells) if cells > 0 => cells,
        _ => return 0,
    };
    let snapshot = grid.snapshot();
    if !snapshot.iter().any(|occupied| *occupied) {
        return 0;
    }
    let (width, height) = (grid.width(), grid.height());

    let mut marked = 0usize;
    if covers_grid(radius_cells, width, height) {
        for idx in 0..snapshot.len() {
            if grid.occupy(Cell::new(idx / width, idx % width)) {
                marked += 1;
            }
        }
        debug!(turn_radius_m, radius_cells, marked, "turn-radius buffer covers the grid");
        return marked;
    }

    let offsets = disc_offsets(radius_cells, width.max(height));
    for idx in 0..snapshot.len() {
        if !snapshot[idx] || !on_edge(&snapshot, width, height, idx) {
            continue;
        }
        let cell = Cell::new(idx / width, idx % width);
        for &(drow, dcol) in &offsets {
            if let Some(neighbor) = grid.offset(cell, drow, dcol) {
                if grid.occupy(neighbor) {
                    marked += 1;
                }
            }
        }
    }
    debug!(turn_radius_m, radius_cells, marked, "buffered obstacles by turn radius");
    marked
}

/// Occupied cell with a free 4-neighbour or on the grid border.
fn on_edge(snapshot: &[bool], width: usize, height: usize, idx: usize) -> bool {
    let (row, col) = (idx / width, idx % width);
    if row == 0 || col == 0 || row + 1 == height || col + 1 == width {
        return true;
    }
    !snapshot[idx - 1] || !snapshot[idx + 1] || !snapshot[idx - width] || !snapshot[idx + width]
}
