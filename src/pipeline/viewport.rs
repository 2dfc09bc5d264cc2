//! Viewport State - Reactive window over the document.
//!
//! The viewport has a size (usually the terminal size) and a vertical
//! scroll offset, both reactive signals. The viewport rectangle derived
//! from them is what visibility checks intersect block rects against.
//! Scrolling is always clamped to `[0, content_height - viewport_height]`.

use spark_signals::{derived, signal, Derived, Signal};

use crate::engine;
use crate::types::Rect;

// =============================================================================
// Scroll Constants
// =============================================================================

/// Scroll amount for one mouse wheel notch.
pub const WHEEL_SCROLL: f32 = 3.0;

/// Scroll amount for arrow keys.
pub const LINE_SCROLL: f32 = 1.0;

// =============================================================================
// Reactive State
// =============================================================================

thread_local! {
    static VIEWPORT_WIDTH: Signal<f32> = signal(80.0);
    static VIEWPORT_HEIGHT: Signal<f32> = signal(24.0);
    static SCROLL_Y: Signal<f32> = signal(0.0);
}

/// Set the viewport size. Re-clamps the scroll offset: growing the
/// viewport near the end of the document pulls the offset back into
/// range.
pub fn set_viewport_size(width: f32, height: f32) {
    VIEWPORT_WIDTH.with(|w| w.set(width));
    VIEWPORT_HEIGHT.with(|h| h.set(height));
    set_scroll_y(scroll_y());
}

/// Current viewport size (width, height).
pub fn viewport_size() -> (f32, f32) {
    (
        VIEWPORT_WIDTH.with(|w| w.get()),
        VIEWPORT_HEIGHT.with(|h| h.get()),
    )
}

/// Current vertical scroll offset.
pub fn scroll_y() -> f32 {
    SCROLL_Y.with(|s| s.get())
}

/// Maximum valid scroll offset for the current content and viewport.
pub fn max_scroll() -> f32 {
    let (_, height) = viewport_size();
    (engine::content_height() - height).max(0.0)
}

/// Set the scroll offset, clamped to the valid range.
pub fn set_scroll_y(y: f32) {
    let clamped = y.clamp(0.0, max_scroll());
    SCROLL_Y.with(|s| s.set(clamped));
}

/// Scroll by a delta (negative scrolls up).
///
/// Returns `true` if the offset actually moved, `false` at a boundary.
pub fn scroll_by(dy: f32) -> bool {
    let current = scroll_y();
    let next = (current + dy).clamp(0.0, max_scroll());
    if next == current {
        return false;
    }
    SCROLL_Y.with(|s| s.set(next));
    true
}

/// In-page anchor navigation: scroll so the named block's top edge sits
/// at the top of the viewport (clamped near the end of the document).
///
/// Returns `false` if no block with that ID exists or it has no geometry.
pub fn scroll_to_block(id: &str) -> bool {
    let Some(index) = engine::find_block(id) else {
        return false;
    };
    let Some(rect) = engine::block_rect(index) else {
        return false;
    };
    set_scroll_y(rect.y);
    true
}

// =============================================================================
// Viewport Rect
// =============================================================================

/// The viewport rectangle in document space.
pub fn viewport_rect() -> Rect {
    let (width, height) = viewport_size();
    Rect::new(0.0, scroll_y(), width, height)
}

/// Create a derived that recomputes the viewport rect whenever the size
/// or scroll offset changes. Effects reading it re-run on every scroll.
pub fn create_viewport_derived() -> Derived<Rect> {
    let width = VIEWPORT_WIDTH.with(|w| w.clone());
    let height = VIEWPORT_HEIGHT.with(|h| h.clone());
    let scroll = SCROLL_Y.with(|s| s.clone());

    derived(move || Rect::new(0.0, scroll.get(), width.get(), height.get()))
}

// =============================================================================
// Reset
// =============================================================================

/// Reset viewport state (for testing).
pub fn reset_viewport_state() {
    VIEWPORT_WIDTH.with(|w| w.set(80.0));
    VIEWPORT_HEIGHT.with(|h| h.set(24.0));
    SCROLL_Y.with(|s| s.set(0.0));
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_block, reset_registry, set_block_rect};
    use crate::types::BlockFlags;

    fn setup() {
        reset_registry();
        reset_viewport_state();
    }

    fn tall_document() {
        let idx = allocate_block("doc", BlockFlags::NONE);
        set_block_rect(idx, Rect::new(0.0, 0.0, 80.0, 200.0));
    }

    #[test]
    fn test_scroll_clamps_to_content() {
        setup();
        tall_document();
        set_viewport_size(80.0, 24.0);

        // Max scroll = 200 - 24
        set_scroll_y(1000.0);
        assert_eq!(scroll_y(), 176.0);

        set_scroll_y(-10.0);
        assert_eq!(scroll_y(), 0.0);
    }

    #[test]
    fn test_scroll_with_no_content() {
        setup();
        set_viewport_size(80.0, 24.0);

        assert_eq!(max_scroll(), 0.0);
        set_scroll_y(50.0);
        assert_eq!(scroll_y(), 0.0);
    }

    #[test]
    fn test_scroll_by_reports_boundary() {
        setup();
        tall_document();
        set_viewport_size(80.0, 24.0);

        assert!(scroll_by(10.0));
        assert_eq!(scroll_y(), 10.0);

        // Up past the top: moves, then stops
        assert!(scroll_by(-30.0));
        assert_eq!(scroll_y(), 0.0);
        assert!(!scroll_by(-1.0));

        // Down past the bottom
        assert!(scroll_by(1000.0));
        assert_eq!(scroll_y(), 176.0);
        assert!(!scroll_by(1.0));
    }

    #[test]
    fn test_resize_reclamps_scroll() {
        setup();
        tall_document();
        set_viewport_size(80.0, 24.0);
        set_scroll_y(176.0);

        // Taller viewport shrinks the valid range; offset is pulled back
        set_viewport_size(80.0, 100.0);
        assert_eq!(scroll_y(), 100.0);
    }

    #[test]
    fn test_scroll_to_block() {
        setup();
        tall_document();
        set_viewport_size(80.0, 24.0);

        let contact = allocate_block("contact", BlockFlags::NONE);
        set_block_rect(contact, Rect::new(0.0, 150.0, 80.0, 30.0));

        assert!(scroll_to_block("contact"));
        assert_eq!(scroll_y(), 150.0);

        // Unknown anchor
        assert!(!scroll_to_block("missing"));

        // Block without geometry
        let bare = allocate_block("bare", BlockFlags::NONE);
        let _ = bare;
        assert!(!scroll_to_block("bare"));
    }

    #[test]
    fn test_viewport_derived_tracks_scroll() {
        setup();
        tall_document();
        set_viewport_size(80.0, 24.0);

        let vp = create_viewport_derived();
        assert_eq!(vp.get(), Rect::new(0.0, 0.0, 80.0, 24.0));

        set_scroll_y(30.0);
        assert_eq!(vp.get(), Rect::new(0.0, 30.0, 80.0, 24.0));
    }
}
