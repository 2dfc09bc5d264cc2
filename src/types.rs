//! Core types for reveal-tui.
//!
//! Geometry, block capability flags, and the fixed motion constants that
//! drive every reveal. Units are deliberately unspecified f32 - the host
//! decides whether a unit is a terminal cell or a pixel; the math is the
//! same either way.

use std::time::Duration;

// =============================================================================
// Motion Constants
// =============================================================================

/// Fraction of a block's area that must intersect the viewport before its
/// one-shot in-view signal fires.
pub const REVEAL_THRESHOLD: f32 = 0.2;

/// Duration of a block-level reveal transition.
pub const BLOCK_REVEAL_DURATION: Duration = Duration::from_millis(600);

/// Duration of a staggered child item's reveal transition.
pub const ITEM_REVEAL_DURATION: Duration = Duration::from_millis(300);

/// Delay between successive child items in a staggered reveal.
pub const STAGGER_DELAY: Duration = Duration::from_millis(300);

/// Vertical offset a hidden block starts from.
pub const BLOCK_HIDDEN_OFFSET: f32 = 50.0;

/// Vertical offset a hidden child item starts from.
pub const ITEM_HIDDEN_OFFSET: f32 = 30.0;

/// Half-size of the decorative glow element. The glow is drawn at the
/// latest pointer sample minus this radius on each axis, centering it on
/// the pointer.
pub const GLOW_RADIUS: f32 = 48.0;

// =============================================================================
// Rect
// =============================================================================

/// An axis-aligned rectangle.
///
/// Blocks live in document space (y grows downward with the document);
/// the viewport and pointer events live in screen space. Conversion
/// between the two is a vertical shift by the scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge (x + width).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (y + height).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Area of the rectangle.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Check whether a point lies inside the rectangle.
    ///
    /// Edges are half-open: the left/top edge is inside, the
    /// right/bottom edge is not.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Area of the overlap with another rectangle (0.0 when disjoint).
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            return 0.0;
        }
        w * h
    }

    /// Shift the rectangle vertically by `dy`.
    pub fn shifted_y(&self, dy: f32) -> Rect {
        Rect::new(self.x, self.y + dy, self.width, self.height)
    }
}

// =============================================================================
// Block Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Capabilities of a registered block.
    ///
    /// Combine with bitwise OR: `BlockFlags::STAGGER_ITEMS | BlockFlags::TRACK_POINTER`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockFlags: u8 {
        const NONE = 0;
        /// Reveal child items one by one with a fixed inter-item delay.
        const STAGGER_ITEMS = 1 << 0;
        /// The block is a pointer-tracked region with a decorative glow.
        const TRACK_POINTER = 1 << 1;
    }
}

// =============================================================================
// Reveal Phase
// =============================================================================

/// Animation state of a block.
///
/// The only transition is `Hidden -> Visible`, taken at most once.
/// `Visible` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealPhase {
    #[default]
    Hidden,
    Visible,
}

// =============================================================================
// Reveal Transition
// =============================================================================

/// A sampled presentation state: where a block (or item) is drawn right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealTransition {
    /// 0.0 = fully transparent, 1.0 = fully opaque.
    pub opacity: f32,
    /// Vertical displacement from the resting position.
    pub offset_y: f32,
}

impl RevealTransition {
    /// The stable end state every reveal converges to.
    pub const VISIBLE: Self = Self { opacity: 1.0, offset_y: 0.0 };

    /// The start state for a given hidden offset.
    pub const fn hidden(offset_y: f32) -> Self {
        Self { opacity: 0.0, offset_y }
    }
}

// =============================================================================
// Tests
// =============================================================================
