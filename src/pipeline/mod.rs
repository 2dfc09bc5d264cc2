//! Pipeline Module - Viewport state and application lifecycle.
//!
//! - **viewport** - Reactive viewport size/scroll and anchor navigation
//! - **mount** - arm_block wiring, mount/tick/run event loop

pub mod mount;
pub mod viewport;

pub use mount::{arm_block, mount, run, tick, MountHandle};
pub use viewport::{
    create_viewport_derived, max_scroll, scroll_by, scroll_to_block, scroll_y,
    set_scroll_y, set_viewport_size, viewport_rect, viewport_size, LINE_SCROLL, WHEEL_SCROLL,
};
