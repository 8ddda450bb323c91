//! Tile grid storage and deterministic terrain generation.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use wayfinder_core::{Direction, GridCoord, GridDimensions, GridError, TileCost};

/// Chance, in permille, that a generated tile is impassable.
const BLOCKED_PERMILLE: u32 = 250;

/// Highest traversal cost the generator assigns to a passable tile.
const MAX_GENERATED_COST: u16 = 4;

/// Single cell of the grid, immutable after generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    coord: GridCoord,
    cost: TileCost,
    shade: u8,
}

impl Tile {
    /// Coordinate the tile occupies within its grid.
    #[must_use]
    pub const fn coord(&self) -> GridCoord {
        self.coord
    }

    /// Cost of entering the tile, or the blocked sentinel.
    #[must_use]
    pub const fn cost(&self) -> TileCost {
        self.cost
    }

    /// Visual jitter channel used only when rendering terrain.
    #[must_use]
    pub const fn shade(&self) -> u8 {
        self.shade
    }
}

/// Dense rectangular tile grid covering every cell of its dimensions.
///
/// Grids are created whole and never mutated; regeneration replaces the grid
/// wholesale so readers can never observe a partially updated terrain.
#[derive(Clone, Debug)]
pub struct Grid {
    dims: GridDimensions,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Generates a grid with pseudo-random terrain, deterministic per seed.
    ///
    /// Roughly a quarter of the tiles come out impassable; the rest carry a
    /// traversal cost between one and [`MAX_GENERATED_COST`].
    #[must_use]
    pub fn generate(dims: GridDimensions, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut tiles = Vec::with_capacity(dims.cell_count());

        for y in 0..dims.height() {
            for x in 0..dims.width() {
                let roll: u32 = rng.gen_range(0..1000);
                let cost = if roll < BLOCKED_PERMILLE {
                    TileCost::BLOCKED
                } else {
                    TileCost::new(rng.gen_range(1..=MAX_GENERATED_COST))
                };
                let shade: u8 = rng.gen_range(0..32);

                tiles.push(Tile {
                    coord: GridCoord::new(x, y),
                    cost,
                    shade,
                });
            }
        }

        Self { dims, tiles }
    }

    /// Builds a grid from explicit per-tile costs in row-major order.
    ///
    /// Hosts that ship their own maps use this instead of the generator. The
    /// cost slice must cover every cell of the dimensions exactly once; the
    /// first unrepresentable coordinate is reported otherwise.
    pub fn from_costs(dims: GridDimensions, costs: &[TileCost]) -> Result<Self, GridError> {
        if costs.len() != dims.cell_count() {
            return Err(GridError::OutOfBounds {
                cell: GridCoord::new(dims.width(), dims.height()),
                dims,
            });
        }

        let mut tiles = Vec::with_capacity(costs.len());
        for y in 0..dims.height() {
            for x in 0..dims.width() {
                let coord = GridCoord::new(x, y);
                let index = dims.index_of(coord).ok_or(GridError::OutOfBounds {
                    cell: coord,
                    dims,
                })?;
                tiles.push(Tile {
                    coord,
                    cost: costs[index],
                    shade: 0,
                });
            }
        }

        Ok(Self { dims, tiles })
    }

    /// Dimensions of the grid in whole cells.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dims
    }

    /// Tile stored at the coordinate.
    pub fn tile_at(&self, cell: GridCoord) -> Result<&Tile, GridError> {
        let index = self.dims.index_of(cell).ok_or(GridError::OutOfBounds {
            cell,
            dims: self.dims,
        })?;
        self.tiles.get(index).ok_or(GridError::OutOfBounds {
            cell,
            dims: self.dims,
        })
    }

    /// Cost of the tile at the coordinate, if it lies within bounds.
    #[must_use]
    pub fn cost_at(&self, cell: GridCoord) -> Option<TileCost> {
        let index = self.dims.index_of(cell)?;
        self.tiles.get(index).map(Tile::cost)
    }

    /// Reports whether the coordinate references an enterable tile.
    #[must_use]
    pub fn is_passable(&self, cell: GridCoord) -> bool {
        self.cost_at(cell).map_or(false, |cost| cost.is_passable())
    }

    /// In-bounds, passable cells adjacent to the coordinate.
    ///
    /// The iteration order is fixed north, east, south, west so downstream
    /// tie-breaking stays reproducible across runs.
    #[must_use]
    pub fn neighbors(&self, cell: GridCoord) -> NeighborIter {
        let mut neighbors = NeighborIter::default();

        for direction in Direction::ALL {
            if let Some(stepped) = direction.step_from(cell, self.dims) {
                if self.is_passable(stepped) {
                    neighbors.push(stepped);
                }
            }
        }

        neighbors
    }

    /// Iterator over every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}

/// Fixed-capacity iterator over a cell's traversable neighbors.
#[derive(Clone, Debug, Default)]
pub struct NeighborIter {
    buffer: [Option<GridCoord>; 4],
    len: usize,
    cursor: usize,
}

impl NeighborIter {
    fn push(&mut self, cell: GridCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(cell);
            self.len += 1;
        }
    }
}

impl Iterator for NeighborIter {
    type Item = GridCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}
