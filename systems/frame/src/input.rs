//! Pressed-key and pointer snapshots sampled between ticks.

use std::collections::HashSet;

use glam::Vec2;
use wayfinder_core::{GridCoord, GridDimensions, KeyCode, Viewport};

/// Input state mutated by host events and read back on gated ticks.
///
/// Handlers only update the snapshot; deciding what the input means is the
/// tick's job, which keeps input sampling decoupled from the render cadence.
#[derive(Debug, Default)]
pub struct InputTracker {
    pressed: HashSet<KeyCode>,
    just_pressed: HashSet<KeyCode>,
    pointer: Option<Vec2>,
}

impl InputTracker {
    /// Creates a tracker with nothing pressed and no pointer position.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key press, latching it for edge-triggered consumers.
    ///
    /// Host key-repeat events for an already-held key do not re-latch.
    pub fn key_down(&mut self, code: KeyCode) {
        if self.pressed.insert(code) {
            let _ = self.just_pressed.insert(code);
        }
    }

    /// Records a key release.
    pub fn key_up(&mut self, code: KeyCode) {
        let _ = self.pressed.remove(&code);
    }

    /// Reports whether the key is currently held.
    #[must_use]
    pub fn is_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    /// Consumes the edge latch for the key, firing at most once per press.
    pub fn take_just_pressed(&mut self, code: KeyCode) -> bool {
        self.just_pressed.remove(&code)
    }

    /// Records the last known pointer position in viewport units.
    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer = Some(position);
    }

    /// Last known pointer position, if the host reported one.
    #[must_use]
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Grid cell under the pointer, if it lies inside the viewport.
    #[must_use]
    pub fn pointer_cell(&self, viewport: Viewport, dims: GridDimensions) -> Option<GridCoord> {
        let pointer = self.pointer?;

        if viewport.width() == 0
            || viewport.height() == 0
            || dims.width() == 0
            || dims.height() == 0
        {
            return None;
        }

        if pointer.x < 0.0
            || pointer.y < 0.0
            || pointer.x >= viewport.width() as f32
            || pointer.y >= viewport.height() as f32
        {
            return None;
        }

        let cell_width = viewport.width() as f32 / dims.width() as f32;
        let cell_height = viewport.height() as f32 / dims.height() as f32;
        let x = (pointer.x / cell_width) as u32;
        let y = (pointer.y / cell_height) as u32;
        let cell = GridCoord::new(x.min(dims.width() - 1), y.min(dims.height() - 1));

        Some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_repeat_does_not_relatch() {
        let mut input = InputTracker::new();
        input.key_down(KeyCode::RESET);
        input.key_down(KeyCode::RESET);

        assert!(input.take_just_pressed(KeyCode::RESET));
        assert!(!input.take_just_pressed(KeyCode::RESET));
        assert!(input.is_pressed(KeyCode::RESET));
    }

    #[test]
    fn release_and_press_latches_again() {
        let mut input = InputTracker::new();
        input.key_down(KeyCode::new(32));
        assert!(input.take_just_pressed(KeyCode::new(32)));

        input.key_up(KeyCode::new(32));
        assert!(!input.is_pressed(KeyCode::new(32)));

        input.key_down(KeyCode::new(32));
        assert!(input.take_just_pressed(KeyCode::new(32)));
    }

    #[test]
    fn pointer_cell_maps_viewport_to_grid() {
        let mut input = InputTracker::new();
        let viewport = Viewport::new(100, 100);
        let dims = GridDimensions::new(10, 10);

        input.pointer_moved(Vec2::new(55.0, 12.0));

        assert_eq!(
            input.pointer_cell(viewport, dims),
            Some(GridCoord::new(5, 1))
        );
    }

    #[test]
    fn pointer_outside_viewport_maps_to_nothing() {
        let mut input = InputTracker::new();
        let viewport = Viewport::new(100, 100);
        let dims = GridDimensions::new(10, 10);

        input.pointer_moved(Vec2::new(-1.0, 50.0));
        assert_eq!(input.pointer_cell(viewport, dims), None);

        input.pointer_moved(Vec2::new(50.0, 100.0));
        assert_eq!(input.pointer_cell(viewport, dims), None);
    }

    #[test]
    fn missing_pointer_maps_to_nothing() {
        let input = InputTracker::new();
        assert_eq!(
            input.pointer_cell(Viewport::new(100, 100), GridDimensions::new(10, 10)),
            None
        );
    }
}
