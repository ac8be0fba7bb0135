//! Pinned services section: a scrolling text stack coupled to an image swap.

use foundation::easing::clamp01;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ServicesGeometry {
    /// Document offset of the sticky container's top edge.
    pub container_top: f64,
    pub container_height: f64,
    pub viewport_height: f64,
    pub item_count: usize,
}

impl ServicesGeometry {
    pub fn sticky_start(&self) -> f64 {
        self.container_top
    }

    pub fn sticky_end(&self) -> f64 {
        self.container_top + self.container_height - self.viewport_height
    }

    /// Scroll distance over which the section stays pinned.
    pub fn sticky_range(&self) -> f64 {
        (self.container_height - self.viewport_height).max(0.0)
    }

    /// Presentation state for `scroll_y`.
    pub fn frame(&self, scroll_y: f64) -> ServicesFrame {
        let range = self.sticky_range();
        let last = self.item_count.checked_sub(1);

        if scroll_y < self.sticky_start() {
            return ServicesFrame {
                translate_y: 0.0,
                progress: 0.0,
                active_index: last.map(|_| 0),
            };
        }
        if range <= 0.0 || scroll_y >= self.sticky_end() {
            return ServicesFrame {
                translate_y: range,
                progress: 1.0,
                active_index: last,
            };
        }

        let translate_y = scroll_y - self.sticky_start();
        let progress = clamp01(translate_y / range);
        ServicesFrame {
            translate_y,
            progress,
            active_index: last.map(|last| {
                ((progress * self.item_count as f64).floor() as usize).min(last)
            }),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ServicesFrame {
    /// Raw pixels scrolled inside the sticky region (not normalised).
    pub translate_y: f64,
    pub progress: f64,
    /// Image to show; `None` when there are no services.
    pub active_index: Option<usize>,
}

/// Tracks the active image so the DOM only toggles classes on change.
#[derive(Debug, Clone, Default)]
pub struct ServicesSwap {
    geometry: ServicesGeometry,
    active: Option<usize>,
}

impl ServicesSwap {
    pub fn new(geometry: ServicesGeometry) -> Self {
        Self {
            geometry,
            active: None,
        }
    }

    pub fn geometry(&self) -> &ServicesGeometry {
        &self.geometry
    }

    pub fn set_geometry(&mut self, geometry: ServicesGeometry) {
        self.geometry = geometry;
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Returns the frame and whether the active image changed.
    pub fn on_scroll(&mut self, scroll_y: f64) -> (ServicesFrame, bool) {
        let frame = self.geometry.frame(scroll_y);
        let changed = frame.active_index != self.active;
        self.active = frame.active_index;
        (frame, changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(n: usize) -> ServicesGeometry {
        ServicesGeometry {
            container_top: 1000.0,
            container_height: 3000.0,
            viewport_height: 800.0,
            item_count: n,
        }
    }

    #[test]
    fn before_and_after_the_sticky_region() {
        let g = geometry(3);
        let before = g.frame(500.0);
        assert_eq!(before.translate_y, 0.0);
        assert_eq!(before.active_index, Some(0));

        let after = g.frame(1000.0 + 2200.0 + 1.0);
        assert_eq!(after.translate_y, 2200.0);
        assert_eq!(after.active_index, Some(2));
    }

    #[test]
    fn translate_is_raw_pixels() {
        let f = geometry(3).frame(1000.0 + 123.0);
        assert_eq!(f.translate_y, 123.0);
    }

    #[test]
    fn each_index_appears_once_in_order() {
        let g = geometry(3);
        let mut seen: Vec<usize> = Vec::new();
        let mut y = 0.0;
        while y <= 4000.0 {
            let idx = g.frame(y).active_index.unwrap();
            if seen.last() != Some(&idx) {
                seen.push(idx);
            }
            y += 5.0;
        }
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn index_steps_at_even_fractions() {
        let g = geometry(4);
        // range 2200 -> steps every 550px
        assert_eq!(g.frame(1000.0 + 549.0).active_index, Some(0));
        assert_eq!(g.frame(1000.0 + 550.0).active_index, Some(1));
        assert_eq!(g.frame(1000.0 + 1650.0).active_index, Some(3));
    }

    #[test]
    fn no_services_means_no_index() {
        let g = geometry(0);
        assert_eq!(g.frame(0.0).active_index, None);
        assert_eq!(g.frame(2000.0).active_index, None);
        assert_eq!(g.frame(9000.0).active_index, None);
    }

    #[test]
    fn short_container_jumps_to_end() {
        let mut g = geometry(3);
        g.container_height = 600.0;
        let f = g.frame(1000.0);
        assert_eq!(f.translate_y, 0.0);
        assert_eq!(f.active_index, Some(2));
    }

    #[test]
    fn swap_reports_changes_only() {
        let mut swap = ServicesSwap::new(geometry(3));
        assert!(swap.on_scroll(0.0).1);
        assert!(!swap.on_scroll(10.0).1);
        let (frame, changed) = swap.on_scroll(1000.0 + 1000.0);
        assert!(changed);
        assert_eq!(frame.active_index, Some(1));
        assert_eq!(swap.active(), Some(1));
    }
}
