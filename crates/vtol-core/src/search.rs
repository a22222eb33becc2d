//! Grid A* over the buffered occupancy grid.
//!
//! 8-connected moves: axis steps cost 1, diagonals cost √2, heuristic is the
//! Euclidean distance in cell indices (admissible and consistent for these
//! costs). Ties on f are broken by the lower `row + col`, then row, then
//! column, so the same inputs always produce the same path.

use crate::error::FeasibilityError;
use crate::grid::{Cell, OccupancyGrid};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::f64::consts::SQRT_2;
use tracing::debug;

const NEIGHBORS: [(isize, isize, f64); 8] = [
    (0, 1, 1.0),
    (1, 0, 1.0),
    (0, -1, 1.0),
    (-1, 0, 1.0),
    (1, 1, SQRT_2),
    (1, -1, SQRT_2),
    (-1, 1, SQRT_2),
    (-1, -1, SQRT_2),
];

const NO_PARENT: usize = usize::MAX;

/// Cells from start to goal inclusive, plus search statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPath {
    pub cells: Vec<Cell>,
    /// Cost in cell units
    pub cost: f64,
    pub nodes_visited: usize,
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    f_score: FloatOrd,
    g_score: FloatOrd,
    cell: Cell,
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| (self.cell.row + self.cell.col).cmp(&(other.cell.row + other.cell.col)))
            .then_with(|| self.cell.row.cmp(&other.cell.row))
            .then_with(|| self.cell.col.cmp(&other.cell.col))
            .then_with(|| self.g_score.cmp(&other.g_score))
    }
}

fn heuristic(from: Cell, goal: Cell) -> f64 {
    let drow = from.row as f64 - goal.row as f64;
    let dcol = from.col as f64 - goal.col as f64;
    (drow * drow + dcol * dcol).sqrt()
}

/// Search for a path from `start` to `goal`.
///
/// Returns `Ok(None)` when the frontier empties without reaching the goal
/// (including a start or goal outside the grid), and an error once more
/// than `max_steps` nodes would be expanded. Accepting the goal is not an
/// expansion. The start cell may itself be occupied; an occupied goal is
/// only reachable when it equals the start.
pub fn find_path(
    grid: &OccupancyGrid,
    start: Cell,
    goal: Cell,
    max_steps: usize,
) -> Result<Option<GridPath>, FeasibilityError> {
    let (Some(start_idx), Some(_)) = (grid.index(start), grid.index(goal)) else {
        return Ok(None);
    };

    let cell_count = grid.cell_count();
    let mut g_score = vec![f64::INFINITY; cell_count];
    let mut came_from = vec![NO_PARENT; cell_count];
    let mut closed = vec![false; cell_count];

    let mut open_set: BinaryHeap<Reverse<OpenNode>> = BinaryHeap::new();
    g_score[start_idx] = 0.0;
    open_set.push(Reverse(OpenNode {
        f_score: FloatOrd(heuristic(start, goal)),
        g_score: FloatOrd(0.0),
        cell: start,
    }));

    let mut nodes_visited = 0usize;

    while let Some(Reverse(current)) = open_set.pop() {
        let Some(current_idx) = grid.index(current.cell) else {
            continue;
        };
        if closed[current_idx] {
            continue;
        }
        let best_g = g_score[current_idx];
        if current.g_score.0 > best_g + 1e-9 {
            continue;
        }

        if current.cell == goal {
            nodes_visited += 1;
            let cells = reconstruct(grid, &came_from, current_idx);
            debug!(nodes_visited, path_cells = cells.len(), cost = best_g, "A* reached goal");
            return Ok(Some(GridPath {
                cells,
                cost: best_g,
                nodes_visited,
            }));
        }

        if nodes_visited >= max_steps {
            debug!(max_steps, "search budget exhausted");
            return Err(FeasibilityError::SearchBudgetExceeded { steps: max_steps });
        }
        nodes_visited += 1;
        closed[current_idx] = true;

        for (drow, dcol, step_cost) in NEIGHBORS {
            let Some(next) = grid.offset(current.cell, drow, dcol) else {
                continue;
            };
            if grid.is_occupied(next) {
                continue;
            }
            let Some(next_idx) = grid.index(next) else {
                continue;
            };
            if closed[next_idx] {
                continue;
            }
            let tentative_g = best_g + step_cost;
            if tentative_g < g_score[next_idx] {
                came_from[next_idx] = current_idx;
                g_score[next_idx] = tentative_g;
                open_set.push(Reverse(OpenNode {
                    f_score: FloatOrd(tentative_g + heuristic(next, goal)),
                    g_score: FloatOrd(tentative_g),
                    cell: next,
                }));
            }
        }
    }

    debug!(nodes_visited, "A* frontier exhausted without reaching goal");
    Ok(None)
}

fn reconstruct(grid: &OccupancyGrid, came_from: &[usize], goal_idx: usize) -> Vec<Cell> {
    let width = grid.width();
    let mut cells = Vec::new();
    let mut current = goal_idx;
    loop {
        cells.push(Cell::new(current / width, current % width));
        let parent = came_from[current];
        if parent == NO_PARENT {
            break;
        }
        current = parent;
    }
    cells.reverse();
    cells
}
