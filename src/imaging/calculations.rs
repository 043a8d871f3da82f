//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Intermediate products are computed in `u64` so that `width * height`
//! cannot overflow for any `u32` dimensions.

use super::params::Size;

/// Height of `original` scaled to `width`, rounded down.
///
/// Returns 0 for a zero-width original.
pub fn height_for_width(original: Size, width: u32) -> u32 {
    if original.width == 0 {
        return 0;
    }
    let height = u64::from(width) * u64::from(original.height) / u64::from(original.width);
    u32::try_from(height).unwrap_or(u32::MAX)
}

/// Rough floor for the budget search: the widest image that would fit even
/// if every pixel cost 4 bytes uncompressed.
///
/// `budget / (4 * height)`, clamped to `original.width`. Zero for a
/// degenerate original.
///
/// # Examples
/// ```
/// # use budget_resize::imaging::{Size, heuristic_lower_bound};
/// // 524288 / (4 * 3000) = 43
/// assert_eq!(heuristic_lower_bound(Size::new(4000, 3000), 524_288), 43);
/// ```
pub fn heuristic_lower_bound(original: Size, budget: u64) -> u32 {
    if original.is_degenerate() {
        return 0;
    }
    let floor = budget / (4 * u64::from(original.height));
    u32::try_from(floor)
        .unwrap_or(u32::MAX)
        .min(original.width)
}

/// Dimensions of `source` scaled to fit inside `bound`, keeping its aspect ratio.
///
/// Fits by width when the width-scaled height stays within `bound.height`,
/// otherwise fits by height. A target produced by [`Size::with_width`] on the
/// same source therefore maps back onto itself. Each axis of a non-degenerate
/// source is clamped to at least one pixel so the result is always encodable.
///
/// # Examples
/// ```
/// # use budget_resize::imaging::{Size, max_fit_dimensions};
/// // Landscape into a square box: width is the limiting axis
/// assert_eq!(max_fit_dimensions(Size::new(800, 600), Size::new(400, 400)), Size::new(400, 300));
///
/// // Portrait into a square box: height is the limiting axis
/// assert_eq!(max_fit_dimensions(Size::new(600, 800), Size::new(400, 400)), Size::new(300, 400));
/// ```
pub fn max_fit_dimensions(source: Size, bound: Size) -> Size {
    if source.is_degenerate() {
        return Size::default();
    }

    let width_fit_height = height_for_width(source, bound.width);
    let fitted = if width_fit_height <= bound.height {
        Size::new(bound.width, width_fit_height)
    } else {
        let width = u64::from(bound.height) * u64::from(source.width) / u64::from(source.height);
        Size::new(u32::try_from(width).unwrap_or(u32::MAX), bound.height)
    };

    Size::new(fitted.width.max(1), fitted.height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // height_for_width tests
    // =========================================================================

    #[test]
    fn height_scales_proportionally() {
        assert_eq!(height_for_width(Size::new(2000, 1500), 1000), 750);
    }

    #[test]
    fn height_rounds_down() {
        // 7 * 2 / 3 = 4.67
        assert_eq!(height_for_width(Size::new(3, 2), 7), 4);
    }

    #[test]
    fn height_for_zero_width_original_is_zero() {
        assert_eq!(height_for_width(Size::new(0, 100), 50), 0);
    }

    #[test]
    fn height_does_not_overflow() {
        let huge = Size::new(u32::MAX, u32::MAX);
        assert_eq!(height_for_width(huge, u32::MAX), u32::MAX);
    }

    // =========================================================================
    // heuristic_lower_bound tests
    // =========================================================================

    #[test]
    fn lower_bound_four_bytes_per_pixel() {
        // 524288 / (4 * 3000) = 43.69
        assert_eq!(heuristic_lower_bound(Size::new(4000, 3000), 524_288), 43);
    }

    #[test]
    fn lower_bound_clamped_to_original_width() {
        assert_eq!(heuristic_lower_bound(Size::new(10, 10), 1_000_000), 10);
    }

    #[test]
    fn lower_bound_zero_for_tiny_budget() {
        assert_eq!(heuristic_lower_bound(Size::new(100, 100), 399), 0);
    }

    #[test]
    fn lower_bound_zero_for_degenerate() {
        assert_eq!(heuristic_lower_bound(Size::new(0, 100), 524_288), 0);
        assert_eq!(heuristic_lower_bound(Size::new(100, 0), 524_288), 0);
    }

    // =========================================================================
    // max_fit_dimensions tests
    // =========================================================================

    #[test]
    fn fit_landscape_by_width() {
        assert_eq!(
            max_fit_dimensions(Size::new(800, 600), Size::new(400, 400)),
            Size::new(400, 300)
        );
    }

    #[test]
    fn fit_portrait_by_height() {
        assert_eq!(
            max_fit_dimensions(Size::new(600, 800), Size::new(400, 400)),
            Size::new(300, 400)
        );
    }

    #[test]
    fn fit_maps_derived_target_onto_itself() {
        // Ratios that do not divide evenly: the floored height must not
        // flip the fit over to the height axis.
        let source = Size::new(3, 2);
        let target = source.with_width(2);
        assert_eq!(target, Size::new(2, 1));
        assert_eq!(max_fit_dimensions(source, target), target);

        let source = Size::new(4000, 3000);
        for width in [1, 43, 333, 1999, 2001, 3999, 4000] {
            let target = source.with_width(width);
            assert_eq!(max_fit_dimensions(source, target), target);
        }
    }

    #[test]
    fn fit_never_exceeds_bound() {
        let source = Size::new(1920, 1080);
        let bound = Size::new(500, 200);
        let fitted = max_fit_dimensions(source, bound);
        assert!(fitted.width <= bound.width);
        assert!(fitted.height <= bound.height);
        assert_eq!(fitted, Size::new(355, 200));
    }

    #[test]
    fn fit_is_idempotent() {
        let source = Size::new(1920, 1080);
        let bound = Size::new(640, 640);
        let once = max_fit_dimensions(source, bound);
        let twice = max_fit_dimensions(once, bound);
        assert_eq!(once, twice);
    }

    #[test]
    fn fit_clamps_to_one_pixel() {
        // Very wide image scaled to width 1 would have height 0
        assert_eq!(
            max_fit_dimensions(Size::new(1000, 10), Size::new(1, 0)),
            Size::new(1, 1)
        );
    }

    #[test]
    fn fit_degenerate_source_is_empty() {
        assert_eq!(
            max_fit_dimensions(Size::new(0, 10), Size::new(100, 100)),
            Size::default()
        );
    }
}
