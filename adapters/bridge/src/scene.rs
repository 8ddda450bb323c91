//! Draw-pass population from world and engine state.
//!
//! Purely a projection: the functions here read queries and emit
//! [`DrawPrimitive`] messages in a deterministic order, terrain first, then
//! the path, then overlay markers. The host decides what the layers mean.

use wayfinder_core::{
    DrawPrimitive, GridCoord, GridDimensions, HslColor, LayerId, ModuleConfig, TileCost, Viewport,
};
use wayfinder_system_frame::Engine;
use wayfinder_world::{query, World};

const TERRAIN_HUE: u16 = 110;
const BLOCKED_COLOR: HslColor = HslColor::new(220, 12, 16);
const PATH_COLOR: HslColor = HslColor::new(210, 85, 55);
const START_COLOR: HslColor = HslColor::new(130, 90, 45);
const GOAL_COLOR: HslColor = HslColor::new(0, 90, 50);
const POINTER_COLOR: HslColor = HslColor::new(45, 95, 70);

/// Emits the full draw pass for the current state into `out`.
pub(crate) fn populate(
    world: &World,
    engine: &Engine,
    config: &ModuleConfig,
    out: &mut Vec<DrawPrimitive>,
) {
    let dims = query::dimensions(world);
    let Some(metrics) = CellMetrics::fit(config.viewport, dims) else {
        return;
    };

    for tile in query::grid(world).tiles() {
        out.push(metrics.square(
            LayerId::TERRAIN,
            tile.coord(),
            1.0,
            terrain_color(tile.cost(), tile.shade()),
            1.0,
        ));
    }

    if let Some(path) = query::path(world) {
        for cell in path.cells() {
            out.push(metrics.square(LayerId::PATH, *cell, 0.6, PATH_COLOR, 0.9));
        }
    }

    if let Some(start) = query::start(world) {
        out.push(metrics.square(LayerId::OVERLAY, start, 0.8, START_COLOR, 1.0));
    }
    if let Some(goal) = query::goal(world) {
        out.push(metrics.square(LayerId::OVERLAY, goal, 0.8, GOAL_COLOR, 1.0));
    }
    if let Some(cell) = engine.pointer_cell(config.viewport, dims) {
        out.push(metrics.square(LayerId::OVERLAY, cell, 1.0, POINTER_COLOR, 0.35));
    }
}

fn terrain_color(cost: TileCost, shade: u8) -> HslColor {
    if !cost.is_passable() {
        return BLOCKED_COLOR;
    }

    // Cheaper tiles render lighter; shade adds per-tile jitter.
    let base = 76_u8.saturating_sub(cost.get().min(8) as u8 * 6);
    let lightness = base.saturating_sub(shade / 8).clamp(20, 90);
    HslColor::new(TERRAIN_HUE, 35, lightness)
}

/// Projection from grid cells to viewport-space squares.
#[derive(Clone, Copy, Debug)]
struct CellMetrics {
    cell_width: f32,
    cell_height: f32,
    size: f32,
}

impl CellMetrics {
    fn fit(viewport: Viewport, dims: GridDimensions) -> Option<Self> {
        if viewport.width() == 0 || viewport.height() == 0 {
            return None;
        }
        if dims.width() == 0 || dims.height() == 0 {
            return None;
        }

        let cell_width = viewport.width() as f32 / dims.width() as f32;
        let cell_height = viewport.height() as f32 / dims.height() as f32;

        Some(Self {
            cell_width,
            cell_height,
            size: cell_width.min(cell_height),
        })
    }

    fn square(
        &self,
        layer: LayerId,
        cell: GridCoord,
        scale: f32,
        color: HslColor,
        alpha: f32,
    ) -> DrawPrimitive {
        let size = self.size * scale;
        let inset_x = (self.cell_width - size) * 0.5;
        let inset_y = (self.cell_height - size) * 0.5;

        DrawPrimitive {
            layer,
            x: cell.x() as f32 * self.cell_width + inset_x,
            y: cell.y() as f32 * self.cell_height + inset_y,
            size,
            color,
            alpha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wayfinder_core::{Command, GridDimensions, TileCost};
    use wayfinder_world::{apply, Grid};

    fn test_config() -> ModuleConfig {
        ModuleConfig::from_raw(0, 0, 100, 100)
    }

    fn open_world(width: u32, height: u32) -> World {
        let dims = GridDimensions::new(width, height);
        let costs = vec![TileCost::new(1); dims.cell_count()];
        let grid = Grid::from_costs(dims, &costs).expect("grid");
        World::from_parts(grid, GridCoord::new(0, 0), GridCoord::new(width - 1, height - 1))
            .expect("world")
    }

    #[test]
    fn terrain_layer_covers_every_tile() {
        let world = open_world(10, 10);
        let engine = Engine::new(Duration::ZERO);
        let mut out = Vec::new();

        populate(&world, &engine, &test_config(), &mut out);

        let terrain = out
            .iter()
            .filter(|primitive| primitive.layer == LayerId::TERRAIN)
            .count();
        assert_eq!(terrain, 100);
    }

    #[test]
    fn path_layer_appears_after_recompute() {
        let mut world = open_world(5, 5);
        let engine = Engine::new(Duration::ZERO);
        let mut events = Vec::new();
        apply(&mut world, Command::RecomputePath, &mut events);
        let mut out = Vec::new();

        populate(&world, &engine, &ModuleConfig::from_raw(0, 0, 50, 50), &mut out);

        let path = out
            .iter()
            .filter(|primitive| primitive.layer == LayerId::PATH)
            .count();
        assert_eq!(path, 9);
    }

    #[test]
    fn overlay_includes_start_goal_and_pointer() {
        let world = open_world(10, 10);
        let mut engine = Engine::new(Duration::ZERO);
        engine.pointer_moved(glam::Vec2::new(55.0, 55.0));
        let mut out = Vec::new();

        populate(&world, &engine, &test_config(), &mut out);

        let overlay = out
            .iter()
            .filter(|primitive| primitive.layer == LayerId::OVERLAY)
            .count();
        assert_eq!(overlay, 3);
    }

    #[test]
    fn degenerate_viewport_draws_nothing() {
        let world = open_world(4, 4);
        let engine = Engine::new(Duration::ZERO);
        let mut out = Vec::new();

        populate(
            &world,
            &engine,
            &ModuleConfig::from_raw(0, 0, 0, 100),
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn blocked_tiles_use_the_blocked_color() {
        assert_eq!(terrain_color(TileCost::BLOCKED, 31), BLOCKED_COLOR);
        assert_ne!(terrain_color(TileCost::new(1), 0), BLOCKED_COLOR);
    }
}
