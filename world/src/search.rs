//! A* search over the tile grid with retained bookkeeping.
//!
//! The search keeps its open-set heap and dense per-cell arrays between runs
//! so repeated recomputations on the same grid reuse their allocations. Open
//! set ties on `f` break by insertion sequence, earlier insertion first, and
//! neighbors expand in the grid's fixed order, so identical inputs always
//! yield identical paths.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use wayfinder_core::{GridCoord, GridError, TileCost};

use crate::grid::Grid;

const UNSEEN: u32 = u32::MAX;

/// Route produced by a successful search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathResult {
    cells: Vec<GridCoord>,
    cost: u32,
}

impl PathResult {
    /// Ordered cells from start to goal, both endpoints included.
    #[must_use]
    pub fn cells(&self) -> &[GridCoord] {
        &self.cells
    }

    /// Sum of tile costs along the route, excluding the start tile.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }

    /// Number of cells in the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the route is empty.
    ///
    /// A successful search never produces an empty route; this exists for
    /// the conventional pairing with [`PathResult::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Frontier entry ordered for a min-heap with stable tie-breaking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    sequence: u64,
    cell: GridCoord,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the std max-heap pops the lowest f; equal f prefers
        // the entry inserted earlier.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Retained search bookkeeping, valid only during or just after a run.
#[derive(Debug, Default)]
pub(crate) struct SearchState {
    open: BinaryHeap<OpenEntry>,
    g_scores: Vec<u32>,
    closed: Vec<bool>,
    predecessors: Vec<Option<GridCoord>>,
    sequence: u64,
}

impl SearchState {
    fn prepare(&mut self, cell_count: usize) {
        self.open.clear();
        self.sequence = 0;

        if self.g_scores.len() != cell_count {
            self.g_scores = vec![UNSEEN; cell_count];
            self.closed = vec![false; cell_count];
            self.predecessors = vec![None; cell_count];
        } else {
            self.g_scores.fill(UNSEEN);
            self.closed.fill(false);
            self.predecessors.fill(None);
        }
    }

    fn push_open(&mut self, f: u32, cell: GridCoord) {
        self.sequence = self.sequence.wrapping_add(1);
        self.open.push(OpenEntry {
            f,
            sequence: self.sequence,
            cell,
        });
    }
}

/// Computes the lowest-cost route from `start` to `goal`, or proves none
/// exists.
///
/// Out-of-bounds or impassable endpoints are reported as errors; an
/// exhausted frontier is the normal `Ok(None)` outcome. The edge cost of a
/// step is the cost of the tile being entered.
pub(crate) fn shortest_path(
    grid: &Grid,
    start: GridCoord,
    goal: GridCoord,
    state: &mut SearchState,
) -> Result<Option<PathResult>, GridError> {
    validate_endpoint(grid, start)?;
    validate_endpoint(grid, goal)?;

    let dims = grid.dimensions();
    state.prepare(dims.cell_count());

    let Some(start_index) = dims.index_of(start) else {
        return Ok(None);
    };
    state.g_scores[start_index] = 0;
    state.push_open(start.manhattan_distance(goal), start);

    while let Some(entry) = state.open.pop() {
        let Some(index) = dims.index_of(entry.cell) else {
            continue;
        };

        if state.closed[index] {
            continue;
        }

        let g = state.g_scores[index];
        if entry.f != g.saturating_add(entry.cell.manhattan_distance(goal)) {
            // Stale entry left behind by a later g improvement.
            continue;
        }

        if entry.cell == goal {
            return Ok(Some(reconstruct(state, grid, start, goal)));
        }

        state.closed[index] = true;

        for neighbor in grid.neighbors(entry.cell) {
            let Some(neighbor_index) = dims.index_of(neighbor) else {
                continue;
            };

            if state.closed[neighbor_index] {
                continue;
            }

            let Some(step_cost) = grid.cost_at(neighbor).filter(TileCost::is_passable) else {
                debug_assert!(false, "neighbor iterator yielded an unenterable cell");
                continue;
            };

            let tentative = g.saturating_add(u32::from(step_cost.get()));
            if tentative < state.g_scores[neighbor_index] {
                state.g_scores[neighbor_index] = tentative;
                state.predecessors[neighbor_index] = Some(entry.cell);
                state.push_open(
                    tentative.saturating_add(neighbor.manhattan_distance(goal)),
                    neighbor,
                );
            }
        }
    }

    Ok(None)
}

fn validate_endpoint(grid: &Grid, cell: GridCoord) -> Result<(), GridError> {
    let tile = grid.tile_at(cell)?;
    if !tile.cost().is_passable() {
        return Err(GridError::Impassable { cell });
    }
    Ok(())
}

fn reconstruct(state: &SearchState, grid: &Grid, start: GridCoord, goal: GridCoord) -> PathResult {
    let dims = grid.dimensions();
    let cost = dims
        .index_of(goal)
        .map_or(0, |index| state.g_scores[index]);

    let mut cells = Vec::new();
    let mut cursor = goal;
    cells.push(cursor);

    while cursor != start {
        let Some(index) = dims.index_of(cursor) else {
            break;
        };
        let Some(previous) = state.predecessors[index] else {
            break;
        };
        cursor = previous;
        cells.push(cursor);
    }

    cells.reverse();
    PathResult { cells, cost }
}
