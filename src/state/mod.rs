//! State Module - Runtime animation state systems.
//!
//! - **clock** - Animation clock advanced by the event loop
//! - **stagger** - Explicit (delay, target) schedules for child reveals
//! - **reveal** - The Hidden -> Visible state machine and sampling
//! - **pointer** - Region-local pointer samples and glow position

pub mod clock;
pub mod pointer;
pub mod reveal;
pub mod stagger;

pub use clock::{advance_clock, clock_now, reset_clock, set_clock};
pub use pointer::{
    dispatch_pointer_move, glow_position, is_tracked, latest_sample, track_region,
    tracked_count, PointerSample,
};
pub use reveal::{
    is_visible, item_start, phase, reveal_generation, sample_block, sample_item, trigger,
};
pub use stagger::{build_schedule, StaggerStep};
