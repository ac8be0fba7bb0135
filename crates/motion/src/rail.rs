//! Pinned horizontal project rail.
//!
//! The rail's container is made tall enough that native vertical scrolling
//! drives the whole horizontal gesture; the track is translated along X as a
//! function of how far the page has scrolled inside the container.

use foundation::easing::clamp01;
use foundation::geometry::Viewport;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RailConfig {
    /// Vertical scroll consumed before horizontal motion begins, as a
    /// fraction of the viewport height.
    pub start_buffer_vh: f64,
}

impl Default for RailConfig {
    fn default() -> Self {
        Self {
            start_buffer_vh: 0.5,
        }
    }
}

/// Live element measurements the layout is derived from.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct RailMeasurements {
    pub viewport: Viewport,
    /// Document offset of the pinned container's top edge.
    pub container_top: f64,
    /// Width of the first rail item (0 when the rail is empty).
    pub first_item_width: f64,
    /// Full scroll width of the track.
    pub track_scroll_width: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RailPhase {
    /// Pinned at `initial_x`.
    Before,
    /// Translating; `progress` in `[0, 1)`.
    Active { progress: f64 },
    /// Clamped at `initial_x - max_scroll`.
    After,
}

/// Derived rail geometry (`HorizontalTrackState` minus the live offset).
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct RailLayout {
    pub container_top: f64,
    /// Offset that centres the first item in the viewport.
    pub initial_x: f64,
    pub max_scroll: f64,
    pub start_buffer: f64,
    /// Height the container must be given so native scrolling has room.
    pub container_height: f64,
}

impl RailLayout {
    pub fn measure(m: RailMeasurements, config: RailConfig) -> Self {
        let initial_x = ((m.viewport.width - m.first_item_width) / 2.0).max(0.0);
        let max_scroll = (m.track_scroll_width - m.viewport.width + initial_x).max(0.0);
        // Nothing to scroll: no buffer either, the section is one screen tall.
        let start_buffer = if max_scroll > 0.0 {
            config.start_buffer_vh * m.viewport.height
        } else {
            0.0
        };
        Self {
            container_top: m.container_top,
            initial_x,
            max_scroll,
            start_buffer,
            container_height: m.viewport.height + start_buffer + max_scroll,
        }
    }

    pub fn scroll_in_container(&self, scroll_y: f64) -> f64 {
        scroll_y - self.container_top
    }

    pub fn phase(&self, scroll_in_container: f64) -> RailPhase {
        if self.max_scroll <= 0.0 || scroll_in_container < self.start_buffer {
            return RailPhase::Before;
        }
        let travelled = scroll_in_container - self.start_buffer;
        if travelled < self.max_scroll {
            RailPhase::Active {
                progress: clamp01(travelled / self.max_scroll),
            }
        } else {
            RailPhase::After
        }
    }

    /// Track translation for a scroll position inside the container. Always
    /// within `[initial_x - max_scroll, initial_x]`.
    pub fn translate_x(&self, scroll_in_container: f64) -> f64 {
        match self.phase(scroll_in_container) {
            RailPhase::Before => self.initial_x,
            RailPhase::Active { progress } => self.initial_x - progress * self.max_scroll,
            RailPhase::After => self.initial_x - self.max_scroll,
        }
    }

    /// Window scroll target for a wheel gesture, or `None` when the gesture
    /// should fall through to native scrolling.
    ///
    /// Only the active phase intercepts. The target stays inside the active
    /// range; a gesture that cannot move inside the range (pushing past the
    /// start) is released so the page can scroll out of the pin.
    pub fn wheel_target(&self, scroll_y: f64, delta_y: f64) -> Option<f64> {
        let current = self.scroll_in_container(scroll_y);
        if !matches!(self.phase(current), RailPhase::Active { .. }) {
            return None;
        }
        let lo = self.start_buffer;
        let hi = self.start_buffer + self.max_scroll;
        let next = (current + delta_y).clamp(lo, hi);
        if next == current {
            return None;
        }
        Some(self.container_top + next)
    }
}

/// Live rail state: layout plus the currently applied offset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RailTrack {
    layout: RailLayout,
    translate_x: f64,
}

impl RailTrack {
    pub fn new(layout: RailLayout) -> Self {
        Self {
            translate_x: layout.initial_x,
            layout,
        }
    }

    pub fn layout(&self) -> &RailLayout {
        &self.layout
    }

    pub fn translate_x(&self) -> f64 {
        self.translate_x
    }

    /// Replace the layout after a resize, item-count change or late image
    /// load, re-deriving the offset for the current scroll position.
    pub fn relayout(&mut self, layout: RailLayout, scroll_y: f64) -> f64 {
        self.layout = layout;
        self.on_scroll(scroll_y)
    }

    pub fn on_scroll(&mut self, scroll_y: f64) -> f64 {
        let inside = self.layout.scroll_in_container(scroll_y);
        self.translate_x = self.layout.translate_x(inside);
        self.translate_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurements(items: usize) -> RailMeasurements {
        RailMeasurements {
            viewport: Viewport::new(1200.0, 800.0),
            container_top: 2000.0,
            first_item_width: if items == 0 { 0.0 } else { 600.0 },
            track_scroll_width: items as f64 * 640.0,
        }
    }

    fn layout(items: usize) -> RailLayout {
        RailLayout::measure(measurements(items), RailConfig::default())
    }

    #[test]
    fn geometry_centres_first_item() {
        let l = layout(5);
        assert_eq!(l.initial_x, 300.0);
        // 3200 - 1200 + 300
        assert_eq!(l.max_scroll, 2300.0);
        assert_eq!(l.start_buffer, 400.0);
        assert_eq!(l.container_height, 800.0 + 400.0 + 2300.0);
    }

    #[test]
    fn endpoints_of_the_active_phase() {
        let l = layout(5);
        assert_eq!(l.translate_x(l.start_buffer), l.initial_x);
        assert_eq!(
            l.translate_x(l.start_buffer + l.max_scroll),
            l.initial_x - l.max_scroll
        );
        assert_eq!(l.phase(l.start_buffer + l.max_scroll), RailPhase::After);
        assert_eq!(l.phase(l.start_buffer - 1.0), RailPhase::Before);
    }

    #[test]
    fn translate_stays_in_bounds_everywhere() {
        let l = layout(7);
        let lo = l.initial_x - l.max_scroll;
        let mut s = -1000.0;
        while s < l.container_height + 1000.0 {
            let x = l.translate_x(s);
            assert!(x >= lo && x <= l.initial_x, "x={x} at s={s}");
            s += 13.0;
        }
    }

    #[test]
    fn interpolates_linearly_while_active() {
        let l = layout(5);
        let mid = l.start_buffer + l.max_scroll / 2.0;
        assert_eq!(l.translate_x(mid), l.initial_x - l.max_scroll / 2.0);
        match l.phase(mid) {
            RailPhase::Active { progress } => assert_eq!(progress, 0.5),
            other => panic!("expected active phase, got {other:?}"),
        }
    }

    #[test]
    fn empty_rail_collapses_and_never_redirects_wheel() {
        let l = layout(0);
        assert_eq!(l.max_scroll, 0.0);
        assert_eq!(l.start_buffer, 0.0);
        assert_eq!(l.container_height, 800.0);
        for y in [0.0, 2000.0, 2400.0, 5000.0] {
            for delta in [-120.0, 0.0, 120.0] {
                assert_eq!(l.wheel_target(y, delta), None);
            }
            assert_eq!(l.translate_x(l.scroll_in_container(y)), l.initial_x);
        }
    }

    #[test]
    fn wheel_is_only_redirected_while_active() {
        let l = layout(5);
        let top = l.container_top;
        assert_eq!(l.wheel_target(top + 10.0, 100.0), None);
        let active_y = top + l.start_buffer + 100.0;
        assert_eq!(l.wheel_target(active_y, 100.0), Some(active_y + 100.0));
        let after_y = top + l.start_buffer + l.max_scroll + 5.0;
        assert_eq!(l.wheel_target(after_y, 100.0), None);
    }

    #[test]
    fn wheel_target_is_clamped_to_active_range() {
        let l = layout(5);
        let top = l.container_top;
        let near_end = top + l.start_buffer + l.max_scroll - 10.0;
        assert_eq!(
            l.wheel_target(near_end, 500.0),
            Some(top + l.start_buffer + l.max_scroll)
        );
        let near_start = top + l.start_buffer + 10.0;
        assert_eq!(l.wheel_target(near_start, -500.0), Some(top + l.start_buffer));
        // Already at the start and pushing up: released to native scrolling.
        assert_eq!(l.wheel_target(top + l.start_buffer, -50.0), None);
    }

    #[test]
    fn relayout_recomputes_offset_for_current_scroll() {
        let mut track = RailTrack::new(layout(3));
        assert_eq!(track.translate_x(), 300.0);
        let y = 2000.0 + 400.0 + 200.0;
        let before = track.on_scroll(y);
        // Images finished loading and the track grew.
        let after = track.relayout(layout(8), y);
        assert!((before - 100.0).abs() < 1e-9);
        assert!((after - 100.0).abs() < 1e-9);
        assert_eq!(track.layout().max_scroll, 8.0 * 640.0 - 1200.0 + 300.0);
        let end = track.on_scroll(1_000_000.0);
        assert_eq!(end, track.layout().initial_x - track.layout().max_scroll);
    }

    #[test]
    fn first_item_wider_than_viewport_starts_flush() {
        let mut m = measurements(2);
        m.first_item_width = 1500.0;
        let l = RailLayout::measure(m, RailConfig::default());
        assert_eq!(l.initial_x, 0.0);
        assert_eq!(l.max_scroll, 1280.0 - 1200.0);
    }
}
