//! Reveal Animator - The Hidden -> Visible state machine.
//!
//! Consumes the one-shot in-view signal for a block and runs a single
//! forward transition: opacity 0 -> 1 and a vertical offset easing to 0.
//! A block's phase is monotonic - there is no API that produces
//! Visible -> Hidden - and `trigger` is idempotent, so the end state is
//! stable and terminal. Blocks with staggered items play their stagger
//! schedule relative to the block's own start, which guarantees the block
//! transition happens-before any item stagger.
//!
//! This is a pure presentation transform: sampling has no effect on any
//! other state.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use spark_signals::{signal, Signal};
use tracing::{debug, trace};

use crate::engine;
use crate::types::{
    BlockFlags, RevealPhase, RevealTransition, BLOCK_HIDDEN_OFFSET, BLOCK_REVEAL_DURATION,
    ITEM_HIDDEN_OFFSET, ITEM_REVEAL_DURATION,
};

use super::stagger::build_schedule;

// =============================================================================
// Animation Records
// =============================================================================

/// An in-flight (or completed) transition. Presence of a record is what
/// makes a block Visible; records are never removed by animation.
#[derive(Debug, Clone, Copy)]
struct RevealAnim {
    start: Duration,
    from_offset: f32,
    duration: Duration,
}

impl RevealAnim {
    /// Sample the transition at a timestamp. Linear from
    /// (opacity 0, from_offset) to (opacity 1, 0) over `duration`;
    /// pinned at the endpoints outside that window.
    fn sample(&self, now: Duration) -> RevealTransition {
        if now < self.start {
            return RevealTransition::hidden(self.from_offset);
        }
        let elapsed = now - self.start;
        if elapsed >= self.duration {
            return RevealTransition::VISIBLE;
        }
        let progress = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        RevealTransition {
            opacity: progress,
            offset_y: self.from_offset * (1.0 - progress),
        }
    }
}

thread_local! {
    /// Block-level transitions, keyed by block index.
    static BLOCK_ANIMS: RefCell<HashMap<usize, RevealAnim>> = RefCell::new(HashMap::new());

    /// Item-level transitions, keyed by (block, item).
    static ITEM_ANIMS: RefCell<HashMap<(usize, usize), RevealAnim>> = RefCell::new(HashMap::new());

    /// Bumped on every trigger so render effects re-run when the set of
    /// visible blocks changes.
    static REVEAL_GENERATION: Signal<usize> = signal(0);
}

// =============================================================================
// State Machine
// =============================================================================

/// Current phase of a block. Hidden until triggered; Visible forever after.
pub fn phase(index: usize) -> RevealPhase {
    BLOCK_ANIMS.with(|anims| {
        if anims.borrow().contains_key(&index) {
            RevealPhase::Visible
        } else {
            RevealPhase::Hidden
        }
    })
}

/// Check whether a block has entered its terminal Visible phase.
pub fn is_visible(index: usize) -> bool {
    phase(index) == RevealPhase::Visible
}

/// Take the Hidden -> Visible transition for a block.
///
/// The first call records the transition start and, for blocks flagged
/// `STAGGER_ITEMS`, plays the stagger schedule by recording each item's
/// start relative to `now`. Repeated calls do not restart or alter the
/// animation. Returns `true` if this call performed the transition.
pub fn trigger(index: usize, now: Duration) -> bool {
    let already_visible = BLOCK_ANIMS.with(|anims| anims.borrow().contains_key(&index));
    if already_visible {
        trace!(block = index, "trigger ignored: already visible");
        return false;
    }

    debug!(block = index, at_ms = now.as_millis() as u64, "reveal triggered");
    BLOCK_ANIMS.with(|anims| {
        anims.borrow_mut().insert(
            index,
            RevealAnim {
                start: now,
                from_offset: BLOCK_HIDDEN_OFFSET,
                duration: BLOCK_REVEAL_DURATION,
            },
        );
    });

    if engine::block_flags(index).contains(BlockFlags::STAGGER_ITEMS) {
        let schedule = build_schedule(engine::item_count(index));
        ITEM_ANIMS.with(|anims| {
            let mut anims = anims.borrow_mut();
            for (item, step) in schedule.iter().enumerate() {
                anims.insert(
                    (index, item),
                    RevealAnim {
                        start: now + step.delay,
                        from_offset: step.from.offset_y,
                        duration: ITEM_REVEAL_DURATION,
                    },
                );
            }
        });
    }

    REVEAL_GENERATION.with(|generation| generation.set(generation.get() + 1));
    true
}

// =============================================================================
// Sampling
// =============================================================================

/// Sample a block's transition at a timestamp.
pub fn sample_block(index: usize, now: Duration) -> RevealTransition {
    BLOCK_ANIMS.with(|anims| {
        anims
            .borrow()
            .get(&index)
            .map(|anim| anim.sample(now))
            .unwrap_or(RevealTransition::hidden(BLOCK_HIDDEN_OFFSET))
    })
}

/// Sample one child item's transition at a timestamp.
///
/// Items of a staggered block follow their scheduled entry. Items of a
/// non-staggered block have no transition of their own: they are simply
/// converged once the block is visible, hidden before.
pub fn sample_item(index: usize, item: usize, now: Duration) -> RevealTransition {
    let scheduled = ITEM_ANIMS.with(|anims| anims.borrow().get(&(index, item)).copied());
    if let Some(anim) = scheduled {
        return anim.sample(now);
    }

    if is_visible(index) {
        RevealTransition::VISIBLE
    } else {
        RevealTransition::hidden(ITEM_HIDDEN_OFFSET)
    }
}

/// Start timestamp of a scheduled item reveal, if any.
pub fn item_start(index: usize, item: usize) -> Option<Duration> {
    ITEM_ANIMS.with(|anims| anims.borrow().get(&(index, item)).map(|anim| anim.start))
}

/// Reactive read: changes whenever any block becomes visible. Reading it
/// inside an effect makes the effect re-run on reveal triggers.
pub fn reveal_generation() -> usize {
    REVEAL_GENERATION.with(|generation| generation.get())
}

// =============================================================================
// Cleanup
// =============================================================================

/// Remove all reveal records for a block (called on block release).
pub fn cleanup_index(index: usize) {
    BLOCK_ANIMS.with(|anims| {
        anims.borrow_mut().remove(&index);
    });
    ITEM_ANIMS.with(|anims| {
        anims.borrow_mut().retain(|(block, _), _| *block != index);
    });
}

/// Reset reveal state (for testing).
pub fn reset_reveal_state() {
    BLOCK_ANIMS.with(|anims| anims.borrow_mut().clear());
    ITEM_ANIMS.with(|anims| anims.borrow_mut().clear());
    REVEAL_GENERATION.with(|generation| generation.set(0));
}

// =============================================================================
// Tests
// =============================================================================
