//! Viewport visibility checks, in viewport-relative pixels.

/// An element's bounding box as reported by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
        }
    }

    pub fn height(&self) -> f64 {
        (self.bottom - self.top).max(0.0)
    }

    /// The same box after the page scrolled down by `delta` pixels.
    pub fn scrolled_by(&self, delta: f64) -> Self {
        Self {
            top: self.top - delta,
            bottom: self.bottom - delta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Lenient fold check: anything whose top edge is above the bottom of the
/// viewport counts, even if most of it is still below. Detached elements
/// (`None`) never do.
pub fn is_already_visible(rect: Option<Rect>, viewport: Viewport) -> bool {
    match rect {
        Some(rect) => rect.top < viewport.height,
        None => false,
    }
}

/// Whether `rect` overlaps the viewport.
pub fn intersects_viewport(rect: Rect, viewport: Viewport) -> bool {
    rect.bottom > 0.0 && rect.top < viewport.height
}

/// Intersection test used by the reveal watcher.
///
/// The root box is the viewport with its bottom edge pushed down by `margin`
/// (a negative margin pulls it up instead). Like `isIntersecting`, any overlap
/// with that box counts, however tall the element is.
pub fn proximity_hit(rect: Rect, viewport: Viewport, margin: f64) -> bool {
    let root_bottom = viewport.height + margin;
    if rect.height() == 0.0 {
        return rect.top >= 0.0 && rect.top <= root_bottom;
    }
    let overlap = rect.bottom.min(root_bottom) - rect.top.max(0.0);
    overlap > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1280.0,
        height: 800.0,
    };

    #[test]
    fn element_straddling_the_fold_is_already_visible() {
        assert!(is_already_visible(Some(Rect::new(790.0, 400.0)), VIEWPORT));
        assert!(is_already_visible(Some(Rect::new(-200.0, 100.0)), VIEWPORT));
        assert!(!is_already_visible(Some(Rect::new(800.0, 400.0)), VIEWPORT));
    }

    #[test]
    fn detached_element_is_not_visible() {
        assert!(!is_already_visible(None, VIEWPORT));
    }

    #[test]
    fn positive_margin_fires_before_entry() {
        let rect = Rect::new(830.0, 100.0);
        assert!(!proximity_hit(rect, VIEWPORT, 0.0));
        assert!(proximity_hit(rect, VIEWPORT, 50.0));
    }

    #[test]
    fn negative_margin_waits_until_inside() {
        let rect = Rect::new(770.0, 100.0);
        assert!(proximity_hit(rect, VIEWPORT, 0.0));
        assert!(!proximity_hit(rect, VIEWPORT, -50.0));
    }

    #[test]
    fn first_pixel_of_overlap_counts() {
        assert!(proximity_hit(Rect::new(849.0, 100.0), VIEWPORT, 50.0));
        assert!(!proximity_hit(Rect::new(850.0, 100.0), VIEWPORT, 50.0));
    }

    #[test]
    fn section_much_taller_than_viewport_hits_on_entry() {
        let section = Rect::new(1500.0, 9000.0);
        assert!(!proximity_hit(section, VIEWPORT, 50.0));
        assert!(proximity_hit(section.scrolled_by(660.0), VIEWPORT, 50.0));
        assert!(proximity_hit(section.scrolled_by(6000.0), VIEWPORT, 50.0));
    }

    #[test]
    fn scrolled_past_element_does_not_hit() {
        let rect = Rect::new(-300.0, 200.0);
        assert!(!proximity_hit(rect, VIEWPORT, 50.0));
        assert!(!intersects_viewport(rect, VIEWPORT));
    }

    #[test]
    fn zero_height_element_hits_when_inside_root() {
        assert!(proximity_hit(Rect::new(820.0, 0.0), VIEWPORT, 50.0));
        assert!(!proximity_hit(Rect::new(900.0, 0.0), VIEWPORT, 50.0));
    }
}
