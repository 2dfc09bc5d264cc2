//! Intersection math for visibility checks.
//!
//! A block is "in view" when the fraction of its area overlapping the
//! viewport reaches the reveal threshold. Pure functions, no state.

use crate::types::Rect;

/// Fraction of `rect`'s area that overlaps `viewport`, in `[0.0, 1.0]`.
///
/// A zero-area rect can never intersect and yields 0.0.
pub fn intersection_ratio(rect: &Rect, viewport: &Rect) -> f32 {
    let area = rect.area();
    if area <= 0.0 {
        return 0.0;
    }
    rect.intersection_area(viewport) / area
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_inside() {
        let block = Rect::new(10.0, 10.0, 20.0, 20.0);
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);

        assert_eq!(intersection_ratio(&block, &viewport), 1.0);
    }

    #[test]
    fn test_fully_outside() {
        let block = Rect::new(0.0, 200.0, 20.0, 20.0);
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);

        assert_eq!(intersection_ratio(&block, &viewport), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // Bottom half of the block is above the viewport's top edge
        let block = Rect::new(0.0, 90.0, 100.0, 20.0);
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);

        let ratio = intersection_ratio(&block, &viewport);
        assert!((ratio - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_crossing() {
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);

        // 10 of 100 rows visible: ratio 0.1, below the 0.2 threshold
        let barely = Rect::new(0.0, 90.0, 100.0, 100.0);
        assert!(intersection_ratio(&barely, &viewport) < crate::types::REVEAL_THRESHOLD);

        // 25 of 100 rows visible: ratio 0.25, above threshold
        let quarter = Rect::new(0.0, 75.0, 100.0, 100.0);
        assert!(intersection_ratio(&quarter, &viewport) >= crate::types::REVEAL_THRESHOLD);
    }

    #[test]
    fn test_zero_area_rect() {
        let degenerate = Rect::new(10.0, 10.0, 0.0, 20.0);
        let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);

        assert_eq!(intersection_ratio(&degenerate, &viewport), 0.0);
    }
}
