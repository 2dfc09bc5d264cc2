//! Visibility Observer - One-shot in-view signals.
//!
//! Each block owns at most one pending observer. The first time the
//! block's intersection ratio with the viewport reaches the configured
//! threshold, the observer's callback fires and the entry is removed -
//! a single-fire notification channel, not a persistent subscription.
//! After that the block can never signal again, regardless of scroll
//! position. If the ratio never reaches the threshold the entry simply
//! stays pending and the block stays hidden; that is an acceptable
//! terminal state, not an error.
//!
//! # Example
//!
//! ```ignore
//! use reveal_tui::observe;
//!
//! let cleanup = observe::observe(block, 0.2, move || {
//!     // fire the reveal exactly once
//! });
//!
//! // On every viewport change:
//! observe::dispatch_viewport_change(viewport_rect);
//!
//! // Tearing down before the signal fires deregisters silently
//! cleanup();
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::engine;
use crate::types::Rect;

use super::intersection::intersection_ratio;

// =============================================================================
// Pending Registry
// =============================================================================

struct PendingObserver {
    threshold: f32,
    /// FnOnce in an Option: taking it enforces at-most-once delivery
    /// structurally.
    on_enter: Option<Box<dyn FnOnce()>>,
}

thread_local! {
    static PENDING: RefCell<HashMap<usize, PendingObserver>> = RefCell::new(HashMap::new());
}

// =============================================================================
// Registration
// =============================================================================

/// Register a one-shot in-view observer for a block.
///
/// Exactly one observer per block: registering again replaces any pending
/// entry. Returns a cleanup function that deregisters the observer if it
/// has not fired yet (calling it after the fire is a no-op).
pub fn observe<F>(index: usize, threshold: f32, on_enter: F) -> impl FnOnce()
where
    F: FnOnce() + 'static,
{
    trace!(block = index, threshold, "observer registered");
    PENDING.with(|pending| {
        pending.borrow_mut().insert(
            index,
            PendingObserver {
                threshold,
                on_enter: Some(Box::new(on_enter)),
            },
        );
    });

    move || {
        let removed = PENDING.with(|pending| pending.borrow_mut().remove(&index).is_some());
        if removed {
            trace!(block = index, "observer deregistered before firing");
        }
    }
}

/// Check whether a block still has a pending (unfired) observer.
pub fn is_pending(index: usize) -> bool {
    PENDING.with(|pending| pending.borrow().contains_key(&index))
}

/// Number of pending observers.
pub fn pending_count() -> usize {
    PENDING.with(|pending| pending.borrow().len())
}

// =============================================================================
// Dispatch
// =============================================================================

/// Evaluate one block's pending observer against a viewport rect.
///
/// Fires and removes the entry when the intersection ratio reaches the
/// threshold. Blocks without a registered rect are skipped (their entry
/// stays pending until geometry arrives). Returns `true` if the signal
/// fired.
pub fn check_block(index: usize, viewport: &Rect) -> bool {
    let Some(rect) = engine::block_rect(index) else {
        return false;
    };

    let threshold = match PENDING.with(|pending| {
        pending.borrow().get(&index).map(|entry| entry.threshold)
    }) {
        Some(threshold) => threshold,
        None => return false,
    };

    let ratio = intersection_ratio(&rect, viewport);
    if ratio < threshold {
        return false;
    }

    // Take the callback out of the registry before invoking it so the
    // callback may freely re-enter observe/registry APIs.
    let on_enter = PENDING.with(|pending| {
        pending
            .borrow_mut()
            .remove(&index)
            .and_then(|mut entry| entry.on_enter.take())
    });

    if let Some(on_enter) = on_enter {
        debug!(block = index, ratio, "in-view signal fired");
        on_enter();
        true
    } else {
        false
    }
}

/// Evaluate every pending observer against a viewport rect.
///
/// Called whenever the viewport scrolls or resizes.
pub fn dispatch_viewport_change(viewport: &Rect) {
    let indices: Vec<usize> =
        PENDING.with(|pending| pending.borrow().keys().copied().collect());

    for index in indices {
        check_block(index, viewport);
    }
}

// =============================================================================
// Cleanup
// =============================================================================

/// Remove any pending observer for a block (called on block release).
pub fn cleanup_index(index: usize) {
    PENDING.with(|pending| {
        pending.borrow_mut().remove(&index);
    });
}

/// Reset observer state (for testing).
pub fn reset_observer_state() {
    PENDING.with(|pending| pending.borrow_mut().clear());
}

// =============================================================================
// Tests
// =============================================================================
