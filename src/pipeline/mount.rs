//! Mount API - Application lifecycle and the visibility effect.
//!
//! This module wires the three behaviors together:
//! - `arm_block` connects a block's one-shot observer to the reveal
//!   animator (with an immediate check so blocks already in view on load
//!   reveal without a scroll event)
//! - `mount` creates the effect that re-runs visibility checks whenever
//!   the viewport rect changes, and enables mouse capture
//! - `tick`/`run` drive the event loop: poll input, advance the
//!   animation clock, flush the signal graph
//!
//! # Example
//!
//! ```ignore
//! use reveal_tui::pipeline::mount;
//!
//! let handle = mount::mount()?;
//! let _disarm = mount::arm_block(intro);
//!
//! mount::run(&handle)?;   // Blocks until Ctrl+C or handle.stop()
//! handle.unmount();
//! ```

use std::cell::Cell;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use spark_signals::{effect, flush_sync};
use tracing::debug;

use crate::input;
use crate::observe;
use crate::state::clock;
use crate::state::reveal;
use crate::types::REVEAL_THRESHOLD;

use super::viewport;

// =============================================================================
// Arming
// =============================================================================

/// Wire a block's one-shot in-view signal to its reveal.
///
/// Registers an observer at [`REVEAL_THRESHOLD`] whose callback triggers
/// the reveal at the current animation time, then performs an immediate
/// check against the current viewport. Returns a cleanup that disarms the
/// block if it has not revealed yet.
pub fn arm_block(index: usize) -> impl FnOnce() {
    let cleanup = observe::observe(index, REVEAL_THRESHOLD, move || {
        reveal::trigger(index, clock::clock_now());
    });

    // Blocks already in view must reveal without waiting for a scroll
    observe::check_block(index, &viewport::viewport_rect());

    cleanup
}

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by [`mount`] that allows unmounting.
pub struct MountHandle {
    stop_effect: Option<Box<dyn FnOnce()>>,
    stop_keys: Option<Box<dyn FnOnce()>>,
    running: Arc<AtomicBool>,
    last_tick: Cell<Instant>,
}

impl MountHandle {
    /// Stop the visibility effect and clean up.
    pub fn unmount(mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(stop) = self.stop_keys.take() {
            stop();
        }

        let _ = input::disable_mouse();

        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
        debug!("unmounted");
    }

    /// Check if still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request graceful shutdown (the next tick returns false).
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        // Best effort release if unmount() was never called
        let _ = input::disable_mouse();

        if let Some(stop) = self.stop_keys.take() {
            stop();
        }
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }
}

// =============================================================================
// Mount
// =============================================================================

/// Mount the animation layer.
///
/// Sets up:
/// 1. Mouse capture (pointer moves and wheel scrolls)
/// 2. The visibility effect: every viewport change re-dispatches the
///    pending one-shot observers
/// 3. A Ctrl+C handler for graceful shutdown
pub fn mount() -> io::Result<MountHandle> {
    let running = Arc::new(AtomicBool::new(true));

    let viewport_derived = viewport::create_viewport_derived();
    let running_for_effect = running.clone();
    let stop_effect = effect(move || {
        // Read the derived (creates the reactive dependency)
        let rect = viewport_derived.get();
        if !running_for_effect.load(Ordering::SeqCst) {
            return;
        }
        observe::dispatch_viewport_change(&rect);
    });

    // Force the initial visibility pass; effects are batched otherwise
    flush_sync();

    input::enable_mouse()?;

    let running_for_keys = running.clone();
    let stop_keys = input::on_key(move |press| {
        if press.ctrl && press.key == "c" {
            running_for_keys.store(false, Ordering::SeqCst);
            return true;
        }
        false
    });

    debug!("mounted");
    Ok(MountHandle {
        stop_effect: Some(Box::new(stop_effect)),
        stop_keys: Some(Box::new(stop_keys)),
        running,
        last_tick: Cell::new(Instant::now()),
    })
}

// =============================================================================
// Event Loop
// =============================================================================

/// Run the event loop once.
///
/// Polls input with a short timeout (~60 fps), routes any event, advances
/// the animation clock by the real elapsed time and flushes the signal
/// graph so effects observe the new state.
///
/// # Returns
///
/// * `Ok(true)` - Continue running
/// * `Ok(false)` - Stop requested (Ctrl+C or `handle.stop()`)
/// * `Err(e)` - I/O error while polling
pub fn tick(handle: &MountHandle) -> io::Result<bool> {
    if !handle.is_running() {
        return Ok(false);
    }

    if let Some(event) = input::poll_event(Duration::from_millis(16))? {
        input::route_event(event);
    }

    let now = Instant::now();
    let elapsed = now - handle.last_tick.get();
    handle.last_tick.set(now);
    clock::advance_clock(elapsed);

    flush_sync();

    Ok(handle.is_running())
}

/// Run the event loop, blocking until stopped.
pub fn run(handle: &MountHandle) -> io::Result<()> {
    while tick(handle)? {
        // Keep processing events
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
