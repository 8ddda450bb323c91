#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wayfinder engine.
//!
//! This crate defines the message surface that connects the host call
//! boundary, the authoritative world, and the frame system. The boundary
//! submits [`Command`] values describing desired mutations, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values describing what actually changed. Rendering requests
//! travel the other way as [`DrawPrimitive`] messages the host consumes
//! without any knowledge of the world's internals.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner logged through the host when the module boots.
pub const BOOT_BANNER: &str = "Wayfinder module online.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the tile grid wholesale using the provided seed.
    RegenerateGrid {
        /// Seed fed to the deterministic terrain generator.
        seed: u64,
    },
    /// Moves the search origin to the provided cell.
    SetStart {
        /// Cell the search should depart from.
        cell: GridCoord,
    },
    /// Moves the search destination to the provided cell.
    SetGoal {
        /// Cell the search should steer toward.
        cell: GridCoord,
    },
    /// Runs the path search over the current grid and endpoints.
    RecomputePath,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was replaced by a freshly generated one.
    GridRegenerated {
        /// Seed that produced the new terrain.
        seed: u64,
    },
    /// Confirms that the search origin moved.
    StartChanged {
        /// Cell now acting as the search origin.
        cell: GridCoord,
    },
    /// Confirms that the search destination moved.
    GoalChanged {
        /// Cell now acting as the search destination.
        cell: GridCoord,
    },
    /// Reports the outcome of a completed path search.
    PathUpdated {
        /// Result of the search, including the no-path case.
        outcome: SearchOutcome,
    },
    /// Reports that a command was rejected without mutating state.
    RequestRejected {
        /// Specific reason the command could not be applied.
        reason: GridError,
    },
}

/// Location of a single grid cell expressed as x and y indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    x: u32,
    y: u32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: GridCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Extent of a rectangular tile grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    width: u32,
    height: u32,
}

impl GridDimensions {
    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the coordinate lies inside the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: GridCoord) -> bool {
        cell.x() < self.width && cell.y() < self.height
    }

    /// Row-major index of the cell, or `None` when out of bounds.
    #[must_use]
    pub fn index_of(&self, cell: GridCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }

        let row = usize::try_from(cell.y()).ok()?;
        let column = usize::try_from(cell.x()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Total number of cells covered by the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let count = u64::from(self.width) * u64::from(self.height);
        usize::try_from(count).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Cost of entering a tile, with an explicit impassable sentinel.
///
/// All values below [`TileCost::BLOCKED`] are valid traversal costs. The
/// generator never produces passable tiles cheaper than one step, which keeps
/// the Manhattan heuristic admissible for the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCost(u16);

impl TileCost {
    /// Sentinel marking a tile that can never be entered.
    pub const BLOCKED: TileCost = TileCost(u16::MAX);

    /// Creates a new tile cost from a raw value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the raw cost value.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }

    /// Reports whether the tile can be entered at all.
    #[must_use]
    pub const fn is_passable(&self) -> bool {
        self.0 != u16::MAX
    }
}

/// Cardinal movement directions available to the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing y indices.
    North,
    /// Movement toward increasing x indices.
    East,
    /// Movement toward increasing y indices.
    South,
    /// Movement toward decreasing x indices.
    West,
}

impl Direction {
    /// All directions in the fixed expansion order used by the search.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Cell reached by stepping once from `cell`, if it stays in bounds.
    #[must_use]
    pub fn step_from(self, cell: GridCoord, dims: GridDimensions) -> Option<GridCoord> {
        let stepped = match self {
            Direction::North => GridCoord::new(cell.x(), cell.y().checked_sub(1)?),
            Direction::East => GridCoord::new(cell.x().checked_add(1)?, cell.y()),
            Direction::South => GridCoord::new(cell.x(), cell.y().checked_add(1)?),
            Direction::West => GridCoord::new(cell.x().checked_sub(1)?, cell.y()),
        };

        if dims.contains(stepped) {
            Some(stepped)
        } else {
            None
        }
    }
}

/// Identifier of a physical key reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(i32);

impl KeyCode {
    /// Key that requests a grid regeneration on the next gated tick.
    pub const RESET: KeyCode = KeyCode(82);

    /// Creates a new key code wrapper.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the raw key code value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

/// Named rendering layer a draw request targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u32);

impl LayerId {
    /// Layer holding one square per grid tile.
    pub const TERRAIN: LayerId = LayerId(0);
    /// Layer holding the most recently computed path.
    pub const PATH: LayerId = LayerId(1);
    /// Layer holding start, goal, and pointer markers.
    pub const OVERLAY: LayerId = LayerId(2);

    /// Creates a new layer identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the raw layer value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Color expressed in hue, saturation, and lightness channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HslColor {
    hue: u16,
    saturation: u8,
    lightness: u8,
}

impl HslColor {
    /// Creates a new color from channel values.
    ///
    /// Hue is measured in degrees, saturation and lightness in percent.
    #[must_use]
    pub const fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Hue channel in degrees.
    #[must_use]
    pub const fn hue(&self) -> u16 {
        self.hue
    }

    /// Saturation channel in percent.
    #[must_use]
    pub const fn saturation(&self) -> u8 {
        self.saturation
    }

    /// Lightness channel in percent.
    #[must_use]
    pub const fn lightness(&self) -> u8 {
        self.lightness
    }
}

/// Request to render one shape on a named layer.
///
/// The core has no knowledge of how the host realises the request; the
/// message carries everything the host needs and expects no reply.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawPrimitive {
    /// Layer the shape belongs to.
    pub layer: LayerId,
    /// Horizontal position of the shape's top-left corner in viewport units.
    pub x: f32,
    /// Vertical position of the shape's top-left corner in viewport units.
    pub y: f32,
    /// Side length of the square shape in viewport units.
    pub size: f32,
    /// Fill color of the shape.
    pub color: HslColor,
    /// Opacity of the shape in the range 0.0..=1.0.
    pub alpha: f32,
}

/// Result of the most recent path search.
///
/// `NoPathFound` is a normal outcome, not an error: it means the search ran
/// to completion and proved that no route exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// A lowest-cost route between the endpoints was found.
    PathFound {
        /// Sum of tile costs along the route, excluding the start tile.
        cost: u32,
        /// Number of cells in the route, including both endpoints.
        length: u32,
    },
    /// The search exhausted the frontier without reaching the goal.
    NoPathFound,
}

/// Reasons a grid-addressed command may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum GridError {
    /// The coordinate lies outside the grid bounds.
    #[error("cell {cell} lies outside the {dims} grid")]
    OutOfBounds {
        /// Coordinate that failed the bounds check.
        cell: GridCoord,
        /// Dimensions of the grid that rejected it.
        dims: GridDimensions,
    },
    /// The coordinate references a tile that can never be entered.
    #[error("cell {cell} is impassable")]
    Impassable {
        /// Coordinate of the blocked tile.
        cell: GridCoord,
    },
}

/// Reasons an inbound entry point may be rejected by the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum LifecycleError {
    /// An entry point ran before `initialize` constructed the module state.
    #[error("module entry point called before initialize")]
    NotInitialized,
    /// `initialize` ran a second time without an explicit reset.
    #[error("module already initialized; call ignored")]
    AlreadyInitialized,
}

/// Pixel extent of the host-side drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Creates a new viewport descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the drawing surface in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the drawing surface in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Host-supplied configuration captured once at initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModuleConfig {
    /// Enables diagnostic logging, including periodic FPS reports.
    pub debug: bool,
    /// Minimum simulated time between render-triggering ticks.
    pub render_interval: Duration,
    /// Extent of the host drawing surface.
    pub viewport: Viewport,
    /// Routes pointer movement into goal retargeting when enabled.
    pub pointer_retarget: bool,
}

impl ModuleConfig {
    /// Builds a typed configuration from the raw `initialize` parameters.
    ///
    /// Negative render intervals collapse to zero so the gate can never be
    /// armed with an unrepresentable duration.
    #[must_use]
    pub fn from_raw(
        debug: i32,
        render_interval_ms: i32,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Self {
        let interval_ms = u64::try_from(render_interval_ms.max(0)).unwrap_or(0);

        Self {
            debug: debug != 0,
            render_interval: Duration::from_millis(interval_ms),
            viewport: Viewport::new(viewport_width, viewport_height),
            pointer_retarget: true,
        }
    }
}
