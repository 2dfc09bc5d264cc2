//! Pointer Tracker - Region-local pointer samples and the decorative glow.
//!
//! One designated region (the skills block in the portfolio) converts raw
//! pointer coordinates into region-local coordinates on every move and
//! keeps only the latest sample. A decorative glow element is drawn at the
//! latest sample minus a fixed half-size offset so it stays centered on
//! the pointer.
//!
//! Attachment is scoped: `track_region` returns a cleanup closure that
//! detaches unconditionally, and a move dispatched after detach never
//! alters the stored sample. If the region has no geometry yet when
//! attachment is attempted, attachment is skipped for that cycle - the
//! host's next build pass retries naturally.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use spark_signals::{signal, Signal};
use tracing::{debug, trace};

use crate::engine;
use crate::pipeline::viewport::scroll_y;
use crate::types::GLOW_RADIUS;

// =============================================================================
// Types
// =============================================================================

/// An ephemeral region-local pointer position. Only the most recent
/// sample per region is retained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

// =============================================================================
// Tracker State
// =============================================================================

thread_local! {
    /// Regions currently listening for pointer moves.
    static TRACKED: RefCell<HashSet<usize>> = RefCell::new(HashSet::new());

    /// Latest sample per region, in reactive signals so render effects
    /// re-run as the pointer moves.
    static SAMPLES: RefCell<HashMap<usize, Signal<Option<PointerSample>>>> =
        RefCell::new(HashMap::new());
}

// =============================================================================
// Attach / Detach
// =============================================================================

/// Attach pointer tracking to a block's region.
///
/// Returns a cleanup closure; call it on teardown. Attaching to a block
/// with no registered rectangle is skipped (the returned cleanup is a
/// no-op).
pub fn track_region(index: usize) -> Box<dyn FnOnce()> {
    if engine::block_rect(index).is_none() {
        trace!(block = index, "pointer attach skipped: region not available");
        return Box::new(|| {});
    }

    debug!(block = index, "pointer tracker attached");
    TRACKED.with(|tracked| {
        tracked.borrow_mut().insert(index);
    });

    Box::new(move || {
        let removed = TRACKED.with(|tracked| tracked.borrow_mut().remove(&index));
        if removed {
            debug!(block = index, "pointer tracker detached");
        }
    })
}

/// Check whether a region is currently tracked.
pub fn is_tracked(index: usize) -> bool {
    TRACKED.with(|tracked| tracked.borrow().contains(&index))
}

/// Number of attached trackers.
pub fn tracked_count() -> usize {
    TRACKED.with(|tracked| tracked.borrow().len())
}

// =============================================================================
// Dispatch
// =============================================================================

/// Dispatch a pointer move at screen coordinates.
///
/// For every tracked region the region's current on-screen rectangle is
/// read (document rect shifted by the scroll offset); if the pointer is
/// inside, the region-local sample is stored. Regions the pointer is not
/// over keep their previous sample.
pub fn dispatch_pointer_move(x: f32, y: f32) {
    let tracked: Vec<usize> = TRACKED.with(|tracked| tracked.borrow().iter().copied().collect());
    if tracked.is_empty() {
        return;
    }

    let scroll = scroll_y();
    for index in tracked {
        let Some(rect) = engine::block_rect(index) else {
            continue;
        };
        let screen_rect = rect.shifted_y(-scroll);
        if !screen_rect.contains(x, y) {
            continue;
        }

        let sample = PointerSample {
            x: x - screen_rect.x,
            y: y - screen_rect.y,
        };
        sample_signal(index).set(Some(sample));
    }
}

// =============================================================================
// Queries
// =============================================================================

/// Latest sample for a region, if any move landed inside it yet.
pub fn latest_sample(index: usize) -> Option<PointerSample> {
    SAMPLES.with(|samples| samples.borrow().get(&index).map(|s| s.get()))?
}

/// Where to draw the glow for a region: the latest sample shifted by
/// [`GLOW_RADIUS`] on each axis so the element is centered on the
/// pointer. Coordinates may go negative near the region's edges.
pub fn glow_position(index: usize) -> Option<(f32, f32)> {
    latest_sample(index).map(|sample| (sample.x - GLOW_RADIUS, sample.y - GLOW_RADIUS))
}

fn sample_signal(index: usize) -> Signal<Option<PointerSample>> {
    SAMPLES.with(|samples| {
        samples
            .borrow_mut()
            .entry(index)
            .or_insert_with(|| signal(None))
            .clone()
    })
}

// =============================================================================
// Cleanup
// =============================================================================

/// Drop tracker and sample for a block (called on block release).
pub fn cleanup_index(index: usize) {
    TRACKED.with(|tracked| {
        tracked.borrow_mut().remove(&index);
    });
    SAMPLES.with(|samples| {
        samples.borrow_mut().remove(&index);
    });
}

/// Reset pointer state (for testing).
pub fn reset_pointer_state() {
    TRACKED.with(|tracked| tracked.borrow_mut().clear());
    SAMPLES.with(|samples| samples.borrow_mut().clear());
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{allocate_block, reset_registry, set_block_rect};
    use crate::pipeline::viewport::{reset_viewport_state, set_scroll_y, set_viewport_size};
    use crate::types::{BlockFlags, Rect};

    fn setup() {
        reset_registry();
        reset_pointer_state();
        reset_viewport_state();
    }

    fn skills_block() -> usize {
        let idx = allocate_block("skills", BlockFlags::TRACK_POINTER);
        set_block_rect(idx, Rect::new(100.0, 50.0, 200.0, 200.0));
        idx
    }

    #[test]
    fn test_local_coordinates_and_glow_offset() {
        setup();

        let idx = skills_block();
        let _cleanup = track_region(idx);

        // Region rect {left: 100, top: 50, width: 200, height: 200},
        // pointer at (150, 120)
        dispatch_pointer_move(150.0, 120.0);

        let sample = latest_sample(idx).unwrap();
        assert_eq!(sample, PointerSample { x: 50.0, y: 70.0 });
        assert_eq!(glow_position(idx), Some((2.0, 22.0)));
    }

    #[test]
    fn test_only_latest_sample_retained() {
        setup();

        let idx = skills_block();
        let _cleanup = track_region(idx);

        dispatch_pointer_move(150.0, 120.0);
        dispatch_pointer_move(110.0, 60.0);

        assert_eq!(latest_sample(idx), Some(PointerSample { x: 10.0, y: 10.0 }));
        // Glow can go negative near the edges
        assert_eq!(glow_position(idx), Some((-38.0, -38.0)));
    }

    #[test]
    fn test_moves_outside_region_ignored() {
        setup();

        let idx = skills_block();
        let _cleanup = track_region(idx);

        dispatch_pointer_move(10.0, 10.0);
        assert_eq!(latest_sample(idx), None);

        dispatch_pointer_move(150.0, 120.0);
        dispatch_pointer_move(500.0, 500.0);
        // Sample from the inside move survives
        assert_eq!(latest_sample(idx), Some(PointerSample { x: 50.0, y: 70.0 }));
    }

    #[test]
    fn test_detach_leaves_no_residual_listener() {
        setup();

        let idx = skills_block();
        let cleanup = track_region(idx);

        dispatch_pointer_move(150.0, 120.0);
        let before = latest_sample(idx);

        cleanup();
        assert_eq!(tracked_count(), 0);

        // A move dispatched after detach must not alter the stored sample
        dispatch_pointer_move(200.0, 200.0);
        assert_eq!(latest_sample(idx), before);
    }

    #[test]
    fn test_attach_detach_cycle_repeats_cleanly() {
        setup();

        let idx = skills_block();

        for _ in 0..3 {
            let cleanup = track_region(idx);
            assert!(is_tracked(idx));
            cleanup();
            assert!(!is_tracked(idx));
        }
        assert_eq!(tracked_count(), 0);
    }

    #[test]
    fn test_attach_without_rect_is_skipped() {
        setup();

        let idx = allocate_block("skills", BlockFlags::TRACK_POINTER);
        let cleanup = track_region(idx);

        assert!(!is_tracked(idx));
        cleanup();

        // Geometry arrives; the next attach cycle succeeds
        set_block_rect(idx, Rect::new(0.0, 0.0, 50.0, 50.0));
        let _cleanup = track_region(idx);
        assert!(is_tracked(idx));
    }

    #[test]
    fn test_scroll_shifts_screen_rect() {
        setup();
        set_viewport_size(300.0, 100.0);

        let idx = allocate_block("skills", BlockFlags::TRACK_POINTER);
        // Document-space rect below the fold
        set_block_rect(idx, Rect::new(0.0, 150.0, 200.0, 100.0));
        let _cleanup = track_region(idx);

        // Unscrolled, screen y 150..250 - a move at y 30 misses
        dispatch_pointer_move(20.0, 30.0);
        assert_eq!(latest_sample(idx), None);

        // Scrolled down 140, the region's top edge sits at screen y 10
        set_scroll_y(140.0);
        dispatch_pointer_move(20.0, 30.0);
        assert_eq!(latest_sample(idx), Some(PointerSample { x: 20.0, y: 20.0 }));
    }
}
