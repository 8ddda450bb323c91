#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Wayfinder.
//!
//! The world owns the tile grid, the search endpoints, and the most recently
//! computed path. All mutations flow through [`apply`]; read access flows
//! through the [`query`] module. The boundary layer drives both and never
//! reaches into the state directly.

mod grid;
mod search;

pub use grid::{Grid, NeighborIter, Tile};
pub use search::PathResult;

use search::SearchState;
use wayfinder_core::{Command, Event, GridCoord, GridDimensions, GridError, SearchOutcome};

/// Grid extent used when the world boots before any regeneration.
pub const DEFAULT_GRID_DIMENSIONS: GridDimensions = GridDimensions::new(24, 18);

const DEFAULT_SEED: u64 = 0x5706_9d1c_a8c4_21b7;

/// Represents the authoritative Wayfinder world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    seed: u64,
    start: Option<GridCoord>,
    goal: Option<GridCoord>,
    outcome: Option<SearchOutcome>,
    path: Option<PathResult>,
    search: SearchState,
    path_dirty: bool,
}

impl World {
    /// Creates a new world with the default dimensions and seed.
    #[must_use]
    pub fn new() -> Self {
        let mut world = Self {
            grid: Grid::generate(DEFAULT_GRID_DIMENSIONS, DEFAULT_SEED),
            seed: DEFAULT_SEED,
            start: None,
            goal: None,
            outcome: None,
            path: None,
            search: SearchState::default(),
            path_dirty: false,
        };
        world.derive_endpoints();
        world.path_dirty = true;
        world
    }

    /// Creates a world around an explicit grid and endpoint pair.
    ///
    /// Both endpoints must reference in-bounds, passable tiles.
    pub fn from_parts(grid: Grid, start: GridCoord, goal: GridCoord) -> Result<Self, GridError> {
        validate_cell(&grid, start)?;
        validate_cell(&grid, goal)?;

        Ok(Self {
            grid,
            seed: 0,
            start: Some(start),
            goal: Some(goal),
            outcome: None,
            path: None,
            search: SearchState::default(),
            path_dirty: true,
        })
    }

    /// Picks deterministic endpoints after the grid changed wholesale.
    ///
    /// The start becomes the first passable cell in row-major order and the
    /// goal the last one. A grid without passable cells leaves both unset,
    /// which every later search reports as `NoPathFound`.
    fn derive_endpoints(&mut self) {
        let dims = self.grid.dimensions();
        let mut first = None;
        let mut last = None;

        for y in 0..dims.height() {
            for x in 0..dims.width() {
                let cell = GridCoord::new(x, y);
                if self.grid.is_passable(cell) {
                    if first.is_none() {
                        first = Some(cell);
                    }
                    last = Some(cell);
                }
            }
        }

        self.start = first;
        self.goal = last;
    }

    fn invalidate_path(&mut self) {
        self.path = None;
        self.outcome = None;
        self.path_dirty = true;
    }

    fn run_search(&mut self) -> SearchOutcome {
        self.path_dirty = false;

        let (Some(start), Some(goal)) = (self.start, self.goal) else {
            self.path = None;
            self.outcome = Some(SearchOutcome::NoPathFound);
            return SearchOutcome::NoPathFound;
        };

        match search::shortest_path(&self.grid, start, goal, &mut self.search) {
            Ok(Some(path)) => {
                let outcome = SearchOutcome::PathFound {
                    cost: path.cost(),
                    length: u32::try_from(path.len()).unwrap_or(u32::MAX),
                };
                self.path = Some(path);
                self.outcome = Some(outcome);
                outcome
            }
            Ok(None) => {
                self.path = None;
                self.outcome = Some(SearchOutcome::NoPathFound);
                SearchOutcome::NoPathFound
            }
            Err(_) => {
                // Endpoints are validated before they are stored and
                // re-derived on regeneration, so the search can only see
                // valid ones.
                debug_assert!(false, "stored endpoints failed search validation");
                self.path = None;
                self.outcome = Some(SearchOutcome::NoPathFound);
                SearchOutcome::NoPathFound
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::RegenerateGrid { seed } => {
            world.grid = Grid::generate(world.grid.dimensions(), seed);
            world.seed = seed;
            world.derive_endpoints();
            world.invalidate_path();
            out_events.push(Event::GridRegenerated { seed });
            if let Some(cell) = world.start {
                out_events.push(Event::StartChanged { cell });
            }
            if let Some(cell) = world.goal {
                out_events.push(Event::GoalChanged { cell });
            }
        }
        Command::SetStart { cell } => match validate_cell(&world.grid, cell) {
            Ok(()) => {
                if world.start != Some(cell) {
                    world.start = Some(cell);
                    world.invalidate_path();
                    out_events.push(Event::StartChanged { cell });
                }
            }
            Err(reason) => out_events.push(Event::RequestRejected { reason }),
        },
        Command::SetGoal { cell } => match validate_cell(&world.grid, cell) {
            Ok(()) => {
                if world.goal != Some(cell) {
                    world.goal = Some(cell);
                    world.invalidate_path();
                    out_events.push(Event::GoalChanged { cell });
                }
            }
            Err(reason) => out_events.push(Event::RequestRejected { reason }),
        },
        Command::RecomputePath => {
            let outcome = world.run_search();
            out_events.push(Event::PathUpdated { outcome });
        }
    }
}

fn validate_cell(grid: &Grid, cell: GridCoord) -> Result<(), GridError> {
    let tile = grid.tile_at(cell)?;
    if !tile.cost().is_passable() {
        return Err(GridError::Impassable { cell });
    }
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Grid, PathResult, World};
    use wayfinder_core::{GridCoord, GridDimensions, SearchOutcome};

    /// Provides read-only access to the world's tile grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Dimensions of the active grid.
    #[must_use]
    pub fn dimensions(world: &World) -> GridDimensions {
        world.grid.dimensions()
    }

    /// Seed that produced the active grid.
    #[must_use]
    pub fn seed(world: &World) -> u64 {
        world.seed
    }

    /// Current search origin, if the grid has one.
    #[must_use]
    pub fn start(world: &World) -> Option<GridCoord> {
        world.start
    }

    /// Current search destination, if the grid has one.
    #[must_use]
    pub fn goal(world: &World) -> Option<GridCoord> {
        world.goal
    }

    /// Most recently computed path, if the last search found one.
    #[must_use]
    pub fn path(world: &World) -> Option<&PathResult> {
        world.path.as_ref()
    }

    /// Outcome of the most recent search, or `None` if none ran yet.
    ///
    /// This is how callers distinguish "searched and found nothing"
    /// (`Some(NoPathFound)`) from "search never ran" (`None`).
    #[must_use]
    pub fn latest_outcome(world: &World) -> Option<SearchOutcome> {
        world.outcome
    }

    /// Reports whether state changed since the last search completed.
    #[must_use]
    pub fn path_is_dirty(world: &World) -> bool {
        world.path_dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfinder_core::TileCost;

    fn open_world(width: u32, height: u32) -> World {
        let dims = GridDimensions::new(width, height);
        let costs = vec![TileCost::new(1); dims.cell_count()];
        let grid = Grid::from_costs(dims, &costs).expect("grid");
        World::from_parts(grid, GridCoord::new(0, 0), GridCoord::new(width - 1, height - 1))
            .expect("world")
    }

    #[test]
    fn new_world_derives_passable_endpoints() {
        let world = World::new();

        let start = query::start(&world).expect("start derived");
        let goal = query::goal(&world).expect("goal derived");
        assert!(query::grid(&world).is_passable(start));
        assert!(query::grid(&world).is_passable(goal));
        assert!(query::path_is_dirty(&world));
        assert!(query::latest_outcome(&world).is_none());
    }

    #[test]
    fn regeneration_is_deterministic_for_same_seed() {
        let mut first_world = World::new();
        let mut second_world = World::new();
        let mut first_events = Vec::new();
        let mut second_events = Vec::new();

        apply(
            &mut first_world,
            Command::RegenerateGrid { seed: 99 },
            &mut first_events,
        );
        apply(
            &mut second_world,
            Command::RegenerateGrid { seed: 99 },
            &mut second_events,
        );

        assert_eq!(first_events, second_events);
        assert_eq!(query::start(&first_world), query::start(&second_world));
        assert_eq!(query::goal(&first_world), query::goal(&second_world));
        for (a, b) in query::grid(&first_world)
            .tiles()
            .zip(query::grid(&second_world).tiles())
        {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn regeneration_invalidates_previous_path() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(&mut world, Command::RecomputePath, &mut events);
        assert!(query::latest_outcome(&world).is_some());

        apply(&mut world, Command::RegenerateGrid { seed: 7 }, &mut events);

        assert!(query::path(&world).is_none());
        assert!(query::latest_outcome(&world).is_none());
        assert!(query::path_is_dirty(&world));
    }

    #[test]
    fn set_goal_rejects_out_of_bounds_without_mutating() {
        let mut world = open_world(4, 4);
        let before = query::goal(&world);
        let mut events = Vec::new();
        let outside = GridCoord::new(9, 9);

        apply(&mut world, Command::SetGoal { cell: outside }, &mut events);

        assert_eq!(query::goal(&world), before);
        assert_eq!(
            events,
            vec![Event::RequestRejected {
                reason: GridError::OutOfBounds {
                    cell: outside,
                    dims: GridDimensions::new(4, 4),
                },
            }]
        );
    }

    #[test]
    fn set_goal_rejects_impassable_cell() {
        let dims = GridDimensions::new(3, 3);
        let mut costs = vec![TileCost::new(1); 9];
        let blocked = GridCoord::new(1, 1);
        costs[dims.index_of(blocked).expect("in bounds")] = TileCost::BLOCKED;
        let grid = Grid::from_costs(dims, &costs).expect("grid");
        let mut world =
            World::from_parts(grid, GridCoord::new(0, 0), GridCoord::new(2, 2)).expect("world");
        let mut events = Vec::new();

        apply(&mut world, Command::SetGoal { cell: blocked }, &mut events);

        assert_eq!(query::goal(&world), Some(GridCoord::new(2, 2)));
        assert_eq!(
            events,
            vec![Event::RequestRejected {
                reason: GridError::Impassable { cell: blocked },
            }]
        );
    }

    #[test]
    fn redundant_set_goal_is_silent() {
        let mut world = open_world(4, 4);
        let goal = query::goal(&world).expect("goal");
        let mut events = Vec::new();

        apply(&mut world, Command::SetGoal { cell: goal }, &mut events);

        assert!(events.is_empty());
    }

    #[test]
    fn recompute_path_reports_outcome_and_stores_path() {
        let mut world = open_world(5, 5);
        let mut events = Vec::new();

        apply(&mut world, Command::RecomputePath, &mut events);

        assert_eq!(
            events,
            vec![Event::PathUpdated {
                outcome: SearchOutcome::PathFound { cost: 8, length: 9 },
            }]
        );
        let path = query::path(&world).expect("path stored");
        assert_eq!(path.cells().first(), Some(&GridCoord::new(0, 0)));
        assert_eq!(path.cells().last(), Some(&GridCoord::new(4, 4)));
        assert!(!query::path_is_dirty(&world));
    }

    #[test]
    fn moving_the_goal_marks_the_path_dirty() {
        let mut world = open_world(5, 5);
        let mut events = Vec::new();

        apply(&mut world, Command::RecomputePath, &mut events);
        assert!(!query::path_is_dirty(&world));

        apply(
            &mut world,
            Command::SetGoal {
                cell: GridCoord::new(2, 2),
            },
            &mut events,
        );

        assert!(query::path_is_dirty(&world));
        assert!(query::path(&world).is_none());
    }
}
