#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Console host that drives the Wayfinder module headlessly.
//!
//! The binary stands in for a real rendering host: it injects a bridge that
//! tallies draw calls and forwards module logs to standard error, pumps a
//! fixed-timestep tick loop, then decodes the module's snapshot buffer and
//! prints the resulting path as an ASCII grid.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{ensure, Context, Result};
use clap::Parser;

use wayfinder_bridge::{HostBridge, Module, SnapshotFrame};
use wayfinder_core::{DrawPrimitive, GridCoord, SearchOutcome};

/// Command-line options for the headless Wayfinder host.
#[derive(Debug, Parser)]
#[command(name = "wayfinder", about = "Drives the Wayfinder module from the console")]
struct Options {
    /// Number of simulation ticks to drive.
    #[arg(long, default_value_t = 120)]
    ticks: u32,

    /// Milliseconds of simulated time per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u32,

    /// Minimum milliseconds between render passes.
    #[arg(long, default_value_t = 100)]
    render_interval_ms: i32,

    /// Viewport width handed to the module in pixels.
    #[arg(long, default_value_t = 480)]
    viewport_width: u32,

    /// Viewport height handed to the module in pixels.
    #[arg(long, default_value_t = 360)]
    viewport_height: u32,

    /// Enables the module's debug logging.
    #[arg(long)]
    debug: bool,

    /// Presses the reset key halfway through the run.
    #[arg(long)]
    regenerate: bool,

    /// Keeps the goal fixed instead of following the pointer.
    #[arg(long)]
    static_goal: bool,
}

/// Bridge implementation that tallies draw calls per layer.
#[derive(Debug)]
struct ConsoleHost {
    tallies: Arc<Mutex<BTreeMap<u32, usize>>>,
}

impl HostBridge for ConsoleHost {
    fn draw_primitive(&mut self, primitive: DrawPrimitive) {
        let mut tallies = self
            .tallies
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *tallies.entry(primitive.layer.get()).or_insert(0) += 1;
    }

    fn log(&mut self, message: &str) {
        eprintln!("[wayfinder] {message}");
    }
}

/// Entry point for the headless Wayfinder host.
fn main() -> Result<()> {
    let options = Options::parse();

    let tallies = Arc::new(Mutex::new(BTreeMap::new()));
    let module = Module::new(ConsoleHost {
        tallies: Arc::clone(&tallies),
    })
    .with_pointer_retarget(!options.static_goal);

    module.initialize(
        i32::from(options.debug),
        options.render_interval_ms,
        options.viewport_width,
        options.viewport_height,
    );

    for step in 0..options.ticks {
        if options.regenerate && step == options.ticks / 2 {
            module.key_down(82);
            module.key_up(82);
        }
        module.tick(f64::from(step) * f64::from(options.tick_ms));
    }

    let mut bytes = vec![0_u8; module.snapshot_len()];
    ensure!(
        !bytes.is_empty(),
        "module produced no snapshot; no tick opened the render gate"
    );
    let copied = module.read_snapshot(&mut bytes);
    ensure!(copied == bytes.len(), "snapshot read was truncated");

    let frame = SnapshotFrame::decode(&bytes).context("snapshot frame did not decode")?;

    print_summary(&frame, &tallies.lock().unwrap_or_else(PoisonError::into_inner));
    print_grid(&frame);

    Ok(())
}

fn print_summary(frame: &SnapshotFrame, tallies: &BTreeMap<u32, usize>) {
    println!("grid {}", frame.dims);
    match frame.outcome {
        Some(SearchOutcome::PathFound { cost, length }) => {
            println!("path found: {length} cells, cost {cost}");
        }
        Some(SearchOutcome::NoPathFound) => println!("no path between the current endpoints"),
        None => println!("no search has run yet"),
    }
    for (layer, count) in tallies {
        println!("layer {layer}: {count} draw calls");
    }
}

fn print_grid(frame: &SnapshotFrame) {
    for y in 0..frame.dims.height() {
        let mut line = String::new();
        for x in 0..frame.dims.width() {
            line.push(glyph_for(frame, GridCoord::new(x, y)));
        }
        println!("{line}");
    }
}

fn glyph_for(frame: &SnapshotFrame, cell: GridCoord) -> char {
    if frame.start == Some(cell) {
        return 'S';
    }
    if frame.goal == Some(cell) {
        return 'G';
    }
    if frame.path.contains(&cell) {
        return '*';
    }

    let passable = frame
        .dims
        .index_of(cell)
        .and_then(|index| frame.costs.get(index))
        .map_or(false, |cost| cost.is_passable());

    if passable {
        '.'
    } else {
        '#'
    }
}
