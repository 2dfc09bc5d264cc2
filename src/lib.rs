//! # reveal-tui
//!
//! Scroll-reveal animation layer for terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! Three cooperating behaviors, each independent and stateless across runs:
//!
//! ```text
//! Visibility Observer --(one-shot in-view signal)--> Reveal Animator
//! Pointer Tracker     --(latest sample)------------> glow position
//! ```
//!
//! Every content block owns one one-shot observer; the first time 20% of
//! the block intersects the viewport it fires, the Reveal Animator takes
//! the block's single `Hidden -> Visible` transition (staggering child
//! items when configured), and the observer is gone. The Pointer Tracker
//! converts pointer coordinates to region-local ones inside one tracked
//! region and keeps only the latest sample for the decorative glow.
//!
//! ## Modules
//!
//! - [`types`] - Geometry, block flags, motion constants
//! - [`engine`] - Block registry
//! - [`observe`] - Intersection math, one-shot in-view observers
//! - [`state`] - Animation clock, stagger schedules, reveal sampling,
//!   pointer tracking
//! - [`pipeline`] - Viewport state, mount/tick/run lifecycle
//! - [`input`] - crossterm event bridge and key handler registry

pub mod engine;
pub mod input;
pub mod observe;
pub mod pipeline;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use engine::{
    allocate_block, allocated_blocks, block_flags, block_id, block_rect, content_height,
    find_block, is_allocated, item_count, release_block, reset_registry, set_block_rect,
    set_item_count,
};

pub use observe::{
    check_block, dispatch_viewport_change, intersection_ratio, is_pending, observe,
    pending_count, reset_observer_state,
};

pub use state::{
    // Clock
    advance_clock, clock_now, reset_clock, set_clock,
    // Reveal
    is_visible, item_start, phase, reveal_generation, sample_block, sample_item, trigger,
    // Stagger
    build_schedule, StaggerStep,
    // Pointer
    dispatch_pointer_move, glow_position, is_tracked, latest_sample, track_region,
    tracked_count, PointerSample,
};

pub use pipeline::{
    arm_block, mount, run, scroll_by, scroll_to_block, scroll_y, set_scroll_y,
    set_viewport_size, tick, viewport_rect, viewport_size, MountHandle,
};

pub use input::{
    convert_event, dispatch_key, on_key, poll_event, read_event, route_event, InputEvent,
    KeyPress,
};
