//! Linear-memory snapshot the host may copy out of the module.

use serde::{Deserialize, Serialize};

use wayfinder_core::{GridCoord, GridDimensions, SearchOutcome, TileCost};
use wayfinder_world::{query, Tile, World};

/// Serialized view of the world, rebuilt after every gated tick.
///
/// Hosts decode the frame on their side of the boundary; the module only
/// promises a stable bincode layout for one build of the module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFrame {
    /// Dimensions of the active grid.
    pub dims: GridDimensions,
    /// Row-major tile costs, blocked sentinel included.
    pub costs: Vec<TileCost>,
    /// Current search origin, if the grid has one.
    pub start: Option<GridCoord>,
    /// Current search destination, if the grid has one.
    pub goal: Option<GridCoord>,
    /// Outcome of the most recent search, or `None` if none ran yet.
    pub outcome: Option<SearchOutcome>,
    /// Cells of the most recent path, empty when there is none.
    pub path: Vec<GridCoord>,
}

impl SnapshotFrame {
    /// Captures the current world state into a decodable frame.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        Self {
            dims: query::dimensions(world),
            costs: query::grid(world).tiles().map(Tile::cost).collect(),
            start: query::start(world),
            goal: query::goal(world),
            outcome: query::latest_outcome(world),
            path: query::path(world)
                .map(|path| path.cells().to_vec())
                .unwrap_or_default(),
        }
    }

    /// Decodes a frame previously copied out of the module.
    pub fn decode(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

/// Contiguous byte region owned by the module.
#[derive(Debug, Default)]
pub(crate) struct SnapshotBuffer {
    bytes: Vec<u8>,
}

impl SnapshotBuffer {
    /// Re-encodes the world into the retained buffer.
    ///
    /// Returns `false` when encoding fails; the previous frame stays intact
    /// so the host never observes a torn buffer.
    pub(crate) fn rebuild(&mut self, world: &World) -> bool {
        match bincode::serialize(&SnapshotFrame::capture(world)) {
            Ok(bytes) => {
                self.bytes = bytes;
                true
            }
            Err(_) => false,
        }
    }

    /// Length of the encoded frame in bytes.
    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Copies the frame into `dest`, returning the number of bytes written.
    pub(crate) fn copy_into(&self, dest: &mut [u8]) -> usize {
        let count = self.bytes.len().min(dest.len());
        dest[..count].copy_from_slice(&self.bytes[..count]);
        count
    }
}
