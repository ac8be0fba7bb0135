/// Viewport size in CSS pixels.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// Vertical extent of a section in document coordinates, measured on mount
/// and on resize/content-load. Never persisted.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct SectionBounds {
    /// Document offset of the section's top edge.
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn new(top: f64, height: f64) -> Self {
        SectionBounds {
            top,
            height: height.max(0.0),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Scroll distance travelled inside the section (may be negative before it).
    pub fn scrolled(&self, scroll_y: f64) -> f64 {
        scroll_y - self.top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_sizes_are_clamped() {
        let v = Viewport::new(-1.0, 600.0);
        assert_eq!(v.width, 0.0);
        let s = SectionBounds::new(100.0, -5.0);
        assert_eq!(s.height, 0.0);
        assert_eq!(s.bottom(), 100.0);
    }

    #[test]
    fn scrolled_is_relative_to_top() {
        let s = SectionBounds::new(400.0, 1000.0);
        assert_eq!(s.scrolled(350.0), -50.0);
        assert_eq!(s.scrolled(900.0), 500.0);
    }
}
