//! Stagger Schedules - Ordered (delay, target) pairs for child reveals.
//!
//! When a block with staggered items reveals, its children do not animate
//! from a declarative description; the schedule is an explicit ordered
//! list computed once and played sequentially. Item *i* starts
//! `i * STAGGER_DELAY` after the parent's own transition begins, and every
//! item converges to the same visible end state.

use std::time::Duration;

use crate::types::{RevealTransition, ITEM_HIDDEN_OFFSET, STAGGER_DELAY};

// =============================================================================
// Types
// =============================================================================

/// One step of a stagger schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaggerStep {
    /// Delay relative to the parent block's transition start.
    pub delay: Duration,
    /// The state this item animates from.
    pub from: RevealTransition,
    /// The state this item converges to.
    pub target: RevealTransition,
}

// =============================================================================
// Schedule
// =============================================================================

/// Build the reveal schedule for `item_count` ordered children.
///
/// Steps come back in item order; the delay between consecutive steps is
/// the fixed [`STAGGER_DELAY`].
pub fn build_schedule(item_count: usize) -> Vec<StaggerStep> {
    (0..item_count)
        .map(|i| StaggerStep {
            delay: STAGGER_DELAY * i as u32,
            from: RevealTransition::hidden(ITEM_HIDDEN_OFFSET),
            target: RevealTransition::VISIBLE,
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_schedule() {
        assert!(build_schedule(0).is_empty());
    }

    #[test]
    fn test_delays_are_sequential() {
        let schedule = build_schedule(3);

        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0].delay, Duration::ZERO);
        assert_eq!(schedule[1].delay, STAGGER_DELAY);
        assert_eq!(schedule[2].delay, STAGGER_DELAY * 2);

        // Each step is delayed by the same fixed constant relative to the
        // previous one
        for pair in schedule.windows(2) {
            assert_eq!(pair[1].delay - pair[0].delay, STAGGER_DELAY);
        }
    }

    #[test]
    fn test_all_targets_converge() {
        for step in build_schedule(5) {
            assert_eq!(step.target, RevealTransition::VISIBLE);
            assert_eq!(step.from, RevealTransition::hidden(ITEM_HIDDEN_OFFSET));
        }
    }
}
