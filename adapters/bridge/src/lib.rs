#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Host call boundary for the Wayfinder module.
//!
//! The boundary is deliberately narrow: the host drives the module through
//! five synchronous entry points, and the module reaches back only through
//! the [`HostBridge`] capability it was constructed with. Every entry point
//! acquires exclusive access to the process-wide state for its full
//! duration, runs to completion, and returns before the host's next call.
//! Boundary-adjacent misuse is logged through the host and degrades to a
//! no-op; the module never terminates the host process.

mod scene;
mod snapshot;

pub use snapshot::SnapshotFrame;

use std::sync::{Mutex, MutexGuard, PoisonError};

use glam::Vec2;
use snapshot::SnapshotBuffer;
use wayfinder_core::{
    Command, DrawPrimitive, Event, KeyCode, LifecycleError, ModuleConfig, SearchOutcome,
    BOOT_BANNER,
};
use wayfinder_system_frame::Engine;
use wayfinder_world::{self as world, query, World};

/// Capability surface the module uses to reach back into its host.
///
/// Both calls are fire-and-forget: the module never consults a return value
/// and expects the host to return promptly, since the module is
/// single-threaded and cannot make progress while an outbound call blocks.
pub trait HostBridge {
    /// Renders one shape on a named layer.
    fn draw_primitive(&mut self, primitive: DrawPrimitive);

    /// Emits one diagnostic line.
    fn log(&mut self, message: &str);
}

/// Process-wide container owning the module state for its lifetime.
///
/// The host capability is injected at construction so even pre-initialize
/// misuse can be reported. World and engine state come into existence on the
/// first `initialize` call and live until the process ends.
#[derive(Debug)]
pub struct Module<H: HostBridge> {
    slot: Mutex<Slot<H>>,
}

#[derive(Debug)]
struct Slot<H> {
    host: H,
    pointer_retarget: bool,
    instance: Option<Instance>,
}

#[derive(Debug)]
struct Instance {
    config: ModuleConfig,
    world: World,
    engine: Engine,
    snapshot: SnapshotBuffer,
    next_seed: u64,
    events: Vec<Event>,
    primitives: Vec<DrawPrimitive>,
}

impl<H: HostBridge> Module<H> {
    /// Creates the container around the injected host capability.
    #[must_use]
    pub fn new(host: H) -> Self {
        Self {
            slot: Mutex::new(Slot {
                host,
                pointer_retarget: true,
                instance: None,
            }),
        }
    }

    /// Configures whether pointer movement retargets the search goal.
    ///
    /// Takes effect at the next `initialize`; hosts call this before
    /// handing the module its first tick.
    #[must_use]
    pub fn with_pointer_retarget(self, enabled: bool) -> Self {
        let mut slot = self.slot.into_inner().unwrap_or_else(PoisonError::into_inner);
        slot.pointer_retarget = enabled;
        Self {
            slot: Mutex::new(slot),
        }
    }

    /// Constructs world and engine state exactly once.
    ///
    /// A second call without a reset logs a diagnostic and leaves the
    /// existing state untouched.
    pub fn initialize(
        &self,
        debug: i32,
        render_interval_ms: i32,
        viewport_width: u32,
        viewport_height: u32,
    ) {
        let mut slot = self.lock();

        if slot.instance.is_some() {
            let message = LifecycleError::AlreadyInitialized.to_string();
            slot.host.log(&message);
            return;
        }

        let mut config =
            ModuleConfig::from_raw(debug, render_interval_ms, viewport_width, viewport_height);
        config.pointer_retarget = slot.pointer_retarget;
        let world = World::new();
        let next_seed = query::seed(&world).wrapping_add(1);

        slot.host.log(BOOT_BANNER);
        if config.debug {
            slot.host.log(&format!(
                "grid {} seeded with {:#018x}",
                query::dimensions(&world),
                query::seed(&world),
            ));
        }

        slot.instance = Some(Instance {
            engine: Engine::new(config.render_interval),
            config,
            world,
            snapshot: SnapshotBuffer::default(),
            next_seed,
            events: Vec::new(),
            primitives: Vec::new(),
        });
    }

    /// Advances the simulation to the host's timestamp in milliseconds.
    ///
    /// May trigger a grid regeneration, a path recomputation, and a render
    /// pass, in that order, when the render-interval gate opens.
    pub fn tick(&self, elapsed_timestamp: f64) {
        let mut slot = self.lock();
        let Slot { host, instance, .. } = &mut *slot;
        let Some(instance) = instance.as_mut() else {
            host.log(&LifecycleError::NotInitialized.to_string());
            return;
        };

        instance.tick(host, elapsed_timestamp);
    }

    /// Records a key press in the input snapshot.
    pub fn key_down(&self, code: i32) {
        let mut slot = self.lock();
        let Slot { host, instance, .. } = &mut *slot;
        let Some(instance) = instance.as_mut() else {
            host.log(&LifecycleError::NotInitialized.to_string());
            return;
        };

        instance.engine.key_down(KeyCode::new(code));
    }

    /// Records a key release in the input snapshot.
    pub fn key_up(&self, code: i32) {
        let mut slot = self.lock();
        let Slot { host, instance, .. } = &mut *slot;
        let Some(instance) = instance.as_mut() else {
            host.log(&LifecycleError::NotInitialized.to_string());
            return;
        };

        instance.engine.key_up(KeyCode::new(code));
    }

    /// Records the pointer position and, when retargeting is enabled,
    /// steers the search goal toward the cell under the pointer.
    ///
    /// The search itself stays deferred to the next gated tick.
    pub fn mouse_move(&self, x: f32, y: f32) {
        let mut slot = self.lock();
        let Slot { host, instance, .. } = &mut *slot;
        let Some(instance) = instance.as_mut() else {
            host.log(&LifecycleError::NotInitialized.to_string());
            return;
        };

        instance.engine.pointer_moved(Vec2::new(x, y));

        if instance.config.pointer_retarget {
            let dims = query::dimensions(&instance.world);
            if let Some(cell) = instance.engine.pointer_cell(instance.config.viewport, dims) {
                instance.apply(Command::SetGoal { cell }, host);
            }
        }
    }

    /// Length in bytes of the retained snapshot frame.
    ///
    /// Zero before `initialize` or before the first gated tick encodes one.
    #[must_use]
    pub fn snapshot_len(&self) -> usize {
        let slot = self.lock();
        slot.instance
            .as_ref()
            .map_or(0, |instance| instance.snapshot.len())
    }

    /// Copies the retained snapshot frame into `dest`.
    ///
    /// Returns the number of bytes written, truncated to `dest`'s length.
    pub fn read_snapshot(&self, dest: &mut [u8]) -> usize {
        let slot = self.lock();
        slot.instance
            .as_ref()
            .map_or(0, |instance| instance.snapshot.copy_into(dest))
    }

    fn lock(&self) -> MutexGuard<'_, Slot<H>> {
        // A panicking host callback must not wedge the module for the rest
        // of the process.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Instance {
    fn tick<H: HostBridge>(&mut self, host: &mut H, timestamp: f64) {
        let report = self.engine.tick(timestamp);

        if self.config.debug && report.fps_report_due {
            host.log(&format!("fps {:.1}", report.frames_per_second));
        }

        if !report.render_due {
            return;
        }

        if self.engine.take_just_pressed(KeyCode::RESET) {
            let seed = self.next_seed;
            self.next_seed = seed.wrapping_add(1);
            self.apply(Command::RegenerateGrid { seed }, host);
        }

        if query::path_is_dirty(&self.world) {
            self.apply(Command::RecomputePath, host);
        }

        if !self.snapshot.rebuild(&self.world) {
            host.log("snapshot encoding failed; previous frame retained");
        }

        self.primitives.clear();
        scene::populate(&self.world, &self.engine, &self.config, &mut self.primitives);
        for primitive in self.primitives.drain(..) {
            host.draw_primitive(primitive);
        }
    }

    fn apply<H: HostBridge>(&mut self, command: Command, host: &mut H) {
        self.events.clear();
        world::apply(&mut self.world, command, &mut self.events);

        for event in self.events.drain(..) {
            match event {
                Event::RequestRejected { reason } => host.log(&reason.to_string()),
                Event::PathUpdated { outcome } if self.config.debug => {
                    host.log(&describe_outcome(outcome));
                }
                Event::GridRegenerated { seed } if self.config.debug => {
                    host.log(&format!("grid regenerated with seed {seed:#018x}"));
                }
                _ => {}
            }
        }
    }
}

fn describe_outcome(outcome: SearchOutcome) -> String {
    match outcome {
        SearchOutcome::PathFound { cost, length } => {
            format!("path found: {length} cells, cost {cost}")
        }
        SearchOutcome::NoPathFound => String::from("no path between the current endpoints"),
    }
}
