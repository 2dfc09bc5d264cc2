//! Block Registry - Index allocation for content blocks.
//!
//! A block is a content region with its own reveal animation (intro,
//! experience, ...). The registry manages block lifecycle:
//! - ID <-> index bidirectional mapping (anchor navigation looks up by ID)
//! - Free index pool for reuse
//! - Per-block record: capability flags, document rect, child item count
//!
//! Blocks are created at page build time and released on teardown; nothing
//! else about a block persists.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::types::{BlockFlags, Rect};

// =============================================================================
// Registry State
// =============================================================================

/// Per-block data held by the registry.
#[derive(Debug, Clone, Default)]
struct BlockRecord {
    flags: BlockFlags,
    /// Document-space rectangle. None until the host supplies geometry.
    rect: Option<Rect>,
    /// Number of ordered child items (0 for leaf blocks).
    item_count: usize,
}

thread_local! {
    /// Map block ID to index.
    static ID_TO_INDEX: RefCell<HashMap<String, usize>> = RefCell::new(HashMap::new());

    /// Map index to block ID.
    static INDEX_TO_ID: RefCell<HashMap<usize, String>> = RefCell::new(HashMap::new());

    /// Per-index block records.
    static RECORDS: RefCell<HashMap<usize, BlockRecord>> = RefCell::new(HashMap::new());

    /// Pool of freed indices for reuse.
    static FREE_INDICES: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Next index to allocate if the pool is empty.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };
}

// =============================================================================
// Allocation
// =============================================================================

/// Allocate an index for a new block.
///
/// Allocating an ID that already exists returns the existing index.
///
/// # Arguments
/// * `id` - Section identifier (e.g. "intro", "skills").
/// * `flags` - Block capabilities.
///
/// # Returns
/// The allocated index.
pub fn allocate_block(id: &str, flags: BlockFlags) -> usize {
    let existing = ID_TO_INDEX.with(|map| map.borrow().get(id).copied());
    if let Some(index) = existing {
        return index;
    }

    let index = FREE_INDICES.with(|free| {
        let mut free = free.borrow_mut();
        if let Some(index) = free.pop() {
            index
        } else {
            NEXT_INDEX.with(|next| {
                let mut next = next.borrow_mut();
                let index = *next;
                *next += 1;
                index
            })
        }
    });

    ID_TO_INDEX.with(|map| {
        map.borrow_mut().insert(id.to_string(), index);
    });
    INDEX_TO_ID.with(|map| {
        map.borrow_mut().insert(index, id.to_string());
    });
    RECORDS.with(|records| {
        records.borrow_mut().insert(
            index,
            BlockRecord {
                flags,
                rect: None,
                item_count: 0,
            },
        );
    });

    index
}

/// Release a block index back to the pool.
///
/// Scrubs all dependent state: pending observers, reveal records and the
/// pointer tracker for this index. Releasing an unknown index is a no-op.
pub fn release_block(index: usize) {
    let id = INDEX_TO_ID.with(|map| map.borrow_mut().remove(&index));
    let Some(id) = id else { return };

    ID_TO_INDEX.with(|map| {
        map.borrow_mut().remove(&id);
    });
    RECORDS.with(|records| {
        records.borrow_mut().remove(&index);
    });
    FREE_INDICES.with(|free| {
        free.borrow_mut().push(index);
    });

    // Dependent state must not outlive the block.
    crate::observe::cleanup_index(index);
    crate::state::reveal::cleanup_index(index);
    crate::state::pointer::cleanup_index(index);
}

// =============================================================================
// Accessors
// =============================================================================

/// Check whether an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    RECORDS.with(|records| records.borrow().contains_key(&index))
}

/// Get the block ID for an index.
pub fn block_id(index: usize) -> Option<String> {
    INDEX_TO_ID.with(|map| map.borrow().get(&index).cloned())
}

/// Look up a block index by ID (anchor navigation).
pub fn find_block(id: &str) -> Option<usize> {
    ID_TO_INDEX.with(|map| map.borrow().get(id).copied())
}

/// Get the capability flags of a block.
pub fn block_flags(index: usize) -> BlockFlags {
    RECORDS.with(|records| {
        records
            .borrow()
            .get(&index)
            .map(|r| r.flags)
            .unwrap_or_default()
    })
}

/// Supply or update a block's document-space rectangle.
pub fn set_block_rect(index: usize, rect: Rect) {
    RECORDS.with(|records| {
        if let Some(record) = records.borrow_mut().get_mut(&index) {
            record.rect = Some(rect);
        }
    });
}

/// Get a block's document-space rectangle, if the host has supplied one.
pub fn block_rect(index: usize) -> Option<Rect> {
    RECORDS.with(|records| records.borrow().get(&index).and_then(|r| r.rect))
}

/// Set the number of ordered child items of a block.
pub fn set_item_count(index: usize, count: usize) {
    RECORDS.with(|records| {
        if let Some(record) = records.borrow_mut().get_mut(&index) {
            record.item_count = count;
        }
    });
}

/// Get the number of ordered child items of a block.
pub fn item_count(index: usize) -> usize {
    RECORDS.with(|records| {
        records
            .borrow()
            .get(&index)
            .map(|r| r.item_count)
            .unwrap_or(0)
    })
}

/// All currently allocated block indices (unordered).
pub fn allocated_blocks() -> Vec<usize> {
    RECORDS.with(|records| records.borrow().keys().copied().collect())
}

/// Total document height: the lowest bottom edge over all block rects.
pub fn content_height() -> f32 {
    RECORDS.with(|records| {
        records
            .borrow()
            .values()
            .filter_map(|r| r.rect)
            .map(|rect| rect.bottom())
            .fold(0.0, f32::max)
    })
}

// =============================================================================
// Reset
// =============================================================================

/// Reset the registry (for testing).
pub fn reset_registry() {
    ID_TO_INDEX.with(|map| map.borrow_mut().clear());
    INDEX_TO_ID.with(|map| map.borrow_mut().clear());
    RECORDS.with(|records| records.borrow_mut().clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() {
        reset_registry();
        crate::observe::reset_observer_state();
        crate::state::reveal::reset_reveal_state();
        crate::state::pointer::reset_pointer_state();
    }

    #[test]
    fn test_allocate_and_lookup() {
        setup();

        let intro = allocate_block("intro", BlockFlags::NONE);
        let skills = allocate_block("skills", BlockFlags::STAGGER_ITEMS);

        assert_ne!(intro, skills);
        assert_eq!(find_block("intro"), Some(intro));
        assert_eq!(find_block("skills"), Some(skills));
        assert_eq!(block_id(intro).as_deref(), Some("intro"));
        assert_eq!(block_flags(skills), BlockFlags::STAGGER_ITEMS);
    }

    #[test]
    fn test_allocate_same_id_returns_existing() {
        setup();

        let a = allocate_block("intro", BlockFlags::NONE);
        let b = allocate_block("intro", BlockFlags::STAGGER_ITEMS);

        assert_eq!(a, b);
        // Flags from the first allocation win
        assert_eq!(block_flags(a), BlockFlags::NONE);
    }

    #[test]
    fn test_release_frees_index_for_reuse() {
        setup();

        let a = allocate_block("a", BlockFlags::NONE);
        release_block(a);

        assert!(!is_allocated(a));
        assert_eq!(find_block("a"), None);

        // Freed index is reused
        let b = allocate_block("b", BlockFlags::NONE);
        assert_eq!(a, b);
    }

    #[test]
    fn test_release_unknown_is_noop() {
        setup();
        release_block(42);
    }

    #[test]
    fn test_rect_and_items() {
        setup();

        let idx = allocate_block("projects", BlockFlags::STAGGER_ITEMS);

        assert_eq!(block_rect(idx), None);
        set_block_rect(idx, Rect::new(0.0, 100.0, 80.0, 20.0));
        assert_eq!(block_rect(idx), Some(Rect::new(0.0, 100.0, 80.0, 20.0)));

        assert_eq!(item_count(idx), 0);
        set_item_count(idx, 4);
        assert_eq!(item_count(idx), 4);
    }

    #[test]
    fn test_content_height() {
        setup();

        assert_eq!(content_height(), 0.0);

        let a = allocate_block("a", BlockFlags::NONE);
        let b = allocate_block("b", BlockFlags::NONE);
        set_block_rect(a, Rect::new(0.0, 0.0, 80.0, 30.0));
        set_block_rect(b, Rect::new(0.0, 40.0, 80.0, 25.0));

        assert_eq!(content_height(), 65.0);
    }

    #[test]
    fn test_release_scrubs_dependent_state() {
        setup();

        let idx = allocate_block("skills", BlockFlags::TRACK_POINTER);
        set_block_rect(idx, Rect::new(0.0, 0.0, 80.0, 20.0));

        let _cleanup = crate::state::pointer::track_region(idx);
        crate::state::pointer::dispatch_pointer_move(5.0, 5.0);
        assert!(crate::state::pointer::latest_sample(idx).is_some());

        release_block(idx);
        assert!(crate::state::pointer::latest_sample(idx).is_none());
    }
}
