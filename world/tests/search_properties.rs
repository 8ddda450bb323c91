//! Property-style checks comparing the search against brute force.

use wayfinder_core::{Command, Event, GridCoord, GridDimensions, SearchOutcome, TileCost};
use wayfinder_world::{apply, query, Grid, World};

/// Exhaustive relaxation over the whole grid. Slow but obviously correct on
/// the small grids these tests use.
fn brute_force_cost(grid: &Grid, start: GridCoord, goal: GridCoord) -> Option<u32> {
    let dims = grid.dimensions();
    let mut best = vec![u32::MAX; dims.cell_count()];
    let start_index = dims.index_of(start)?;
    best[start_index] = 0;

    let mut changed = true;
    while changed {
        changed = false;
        for y in 0..dims.height() {
            for x in 0..dims.width() {
                let cell = GridCoord::new(x, y);
                let Some(index) = dims.index_of(cell) else {
                    continue;
                };
                let current = best[index];
                if current == u32::MAX {
                    continue;
                }

                for neighbor in grid.neighbors(cell) {
                    let neighbor_index = dims.index_of(neighbor).expect("neighbor in bounds");
                    let step = grid.cost_at(neighbor).expect("neighbor exists");
                    let tentative = current + u32::from(step.get());
                    if tentative < best[neighbor_index] {
                        best[neighbor_index] = tentative;
                        changed = true;
                    }
                }
            }
        }
    }

    let goal_best = best[dims.index_of(goal)?];
    (goal_best != u32::MAX).then_some(goal_best)
}

fn derived_endpoints(grid: &Grid) -> Option<(GridCoord, GridCoord)> {
    let dims = grid.dimensions();
    let mut first = None;
    let mut last = None;

    for y in 0..dims.height() {
        for x in 0..dims.width() {
            let cell = GridCoord::new(x, y);
            if grid.is_passable(cell) {
                if first.is_none() {
                    first = Some(cell);
                }
                last = Some(cell);
            }
        }
    }

    Some((first?, last?))
}

#[test]
fn search_cost_matches_brute_force_on_generated_grids() {
    for seed in 0..16u64 {
        let grid = Grid::generate(GridDimensions::new(7, 6), seed);
        let Some((start, goal)) = derived_endpoints(&grid) else {
            continue;
        };

        let expected = brute_force_cost(&grid, start, goal);

        let mut world = World::from_parts(grid, start, goal).expect("valid endpoints");
        let mut events = Vec::new();
        apply(&mut world, Command::RecomputePath, &mut events);

        match query::latest_outcome(&world).expect("search ran") {
            SearchOutcome::PathFound { cost, length } => {
                assert_eq!(Some(cost), expected, "seed {seed} found a non-optimal path");
                let path = query::path(&world).expect("path stored");
                assert_eq!(path.len() as u32, length);
                assert_path_well_formed(&world, start, goal);
            }
            SearchOutcome::NoPathFound => {
                assert_eq!(expected, None, "seed {seed} missed an existing path");
            }
        }
    }
}

#[test]
fn path_cells_are_contiguous_and_passable() {
    for seed in 16..24u64 {
        let grid = Grid::generate(GridDimensions::new(9, 9), seed);
        let Some((start, goal)) = derived_endpoints(&grid) else {
            continue;
        };

        let mut world = World::from_parts(grid, start, goal).expect("valid endpoints");
        let mut events = Vec::new();
        apply(&mut world, Command::RecomputePath, &mut events);

        if query::path(&world).is_some() {
            assert_path_well_formed(&world, start, goal);
        }
    }
}

#[test]
fn blocked_column_detour_stays_optimal() {
    let dims = GridDimensions::new(5, 5);
    let mut costs = vec![TileCost::new(1); dims.cell_count()];
    for y in 0..4 {
        let index = dims.index_of(GridCoord::new(2, y)).expect("in bounds");
        costs[index] = TileCost::BLOCKED;
    }
    let grid = Grid::from_costs(dims, &costs).expect("grid");
    let start = GridCoord::new(0, 0);
    let goal = GridCoord::new(4, 4);

    let expected = brute_force_cost(&grid, start, goal);

    let mut world = World::from_parts(grid, start, goal).expect("world");
    let mut events = Vec::new();
    apply(&mut world, Command::RecomputePath, &mut events);

    let path = query::path(&world).expect("path exists");
    assert_eq!(Some(path.cost()), expected);
    // The only crossing of the blocked column is its southern opening.
    assert!(path.cells().contains(&GridCoord::new(2, 4)));
    assert_path_well_formed(&world, start, goal);
}

#[test]
fn recompute_after_retarget_follows_the_new_goal() {
    let dims = GridDimensions::new(6, 6);
    let costs = vec![TileCost::new(1); dims.cell_count()];
    let grid = Grid::from_costs(dims, &costs).expect("grid");
    let mut world =
        World::from_parts(grid, GridCoord::new(0, 0), GridCoord::new(5, 5)).expect("world");
    let mut events = Vec::new();

    apply(&mut world, Command::RecomputePath, &mut events);
    apply(
        &mut world,
        Command::SetGoal {
            cell: GridCoord::new(3, 0),
        },
        &mut events,
    );
    apply(&mut world, Command::RecomputePath, &mut events);

    let path = query::path(&world).expect("path exists");
    assert_eq!(path.cells().last(), Some(&GridCoord::new(3, 0)));
    assert_eq!(path.cost(), 3);
    assert!(events.contains(&Event::GoalChanged {
        cell: GridCoord::new(3, 0),
    }));
}

fn assert_path_well_formed(world: &World, start: GridCoord, goal: GridCoord) {
    let path = query::path(world).expect("path stored");
    let cells = path.cells();

    assert_eq!(cells.first(), Some(&start));
    assert_eq!(cells.last(), Some(&goal));

    for pair in cells.windows(2) {
        assert_eq!(
            pair[0].manhattan_distance(pair[1]),
            1,
            "path cells must be grid-adjacent"
        );
    }

    for cell in cells {
        assert!(query::grid(world).is_passable(*cell));
    }
}
