//! Continuously scrolling gallery strip with drag override.

use runtime::frame::Frame;

/// Number of copies of the item list rendered in the track.
pub const MARQUEE_COPIES: usize = 3;
pub const DEFAULT_MARQUEE_SPEED_PX_S: f64 = 40.0;

/// Repeat `items` [`MARQUEE_COPIES`] times so the wrap point is never visible.
pub fn tripled<T: Clone>(items: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len() * MARQUEE_COPIES);
    for _ in 0..MARQUEE_COPIES {
        out.extend_from_slice(items);
    }
    out
}

/// Normalise `offset` into `(-copy_width, 0]`.
pub fn wrap_offset(offset: f64, copy_width: f64) -> f64 {
    if copy_width <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    let m = offset % copy_width;
    if m > 0.0 { m - copy_width } else { m }
}

/// Conditions under which the strip is visually frozen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct MarqueeFlags {
    pub reduced_motion: bool,
    pub intersecting: bool,
    pub hovered: bool,
    pub focused: bool,
    pub dragging: bool,
}

impl MarqueeFlags {
    pub fn paused(&self) -> bool {
        self.reduced_motion || !self.intersecting || self.hovered || self.focused || self.dragging
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct DragStart {
    offset: f64,
    pointer_x: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marquee {
    offset: f64,
    copy_width: f64,
    speed_px_s: f64,
    flags: MarqueeFlags,
    drag: Option<DragStart>,
    hover_capable: bool,
}

impl Marquee {
    pub fn new(speed_px_s: f64) -> Self {
        Self {
            offset: 0.0,
            copy_width: 0.0,
            speed_px_s,
            flags: MarqueeFlags::default(),
            drag: None,
            hover_capable: true,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn copy_width(&self) -> f64 {
        self.copy_width
    }

    pub fn flags(&self) -> MarqueeFlags {
        self.flags
    }

    pub fn flags_mut(&mut self) -> &mut MarqueeFlags {
        &mut self.flags
    }

    pub fn is_paused(&self) -> bool {
        self.flags.paused()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Width of one copy of the items, i.e. a third of the track.
    pub fn set_copy_width(&mut self, copy_width: f64) {
        self.copy_width = copy_width.max(0.0);
        self.offset = wrap_offset(self.offset, self.copy_width);
    }

    /// Advance by one frame. While paused the offset is left exactly where it is.
    pub fn on_frame(&mut self, frame: Frame) -> f64 {
        if !self.is_paused() {
            self.offset = wrap_offset(self.offset - self.speed_px_s * frame.dt_s, self.copy_width);
        }
        self.offset
    }

    /// Whether the primary input can hover. Touch screens report a sticky
    /// hover after a tap, so hovering only pauses on hover-capable input.
    pub fn set_hover_capable(&mut self, capable: bool) {
        self.hover_capable = capable;
        if !capable {
            self.flags.hovered = false;
        }
    }

    pub fn hover(&mut self, hovered: bool) {
        self.flags.hovered = hovered && self.hover_capable;
    }

    /// Focus pauses only when it came from the keyboard; a pointer press
    /// focuses the strip too.
    pub fn focus(&mut self, focused: bool, keyboard: bool) {
        self.flags.focused = focused && keyboard;
    }

    pub fn pointer_down(&mut self, pointer_x: f64) {
        self.drag = Some(DragStart {
            offset: self.offset,
            pointer_x,
        });
        self.flags.dragging = true;
    }

    pub fn pointer_move(&mut self, pointer_x: f64) -> Option<f64> {
        let start = self.drag?;
        self.offset = wrap_offset(start.offset + (pointer_x - start.pointer_x), self.copy_width);
        Some(self.offset)
    }

    /// Pointer up or leave: time-driven motion resumes from the current offset.
    pub fn pointer_up(&mut self) {
        self.drag = None;
        self.flags.dragging = false;
        self.flags.focused = false;
    }
}

impl Default for Marquee {
    fn default() -> Self {
        Self::new(DEFAULT_MARQUEE_SPEED_PX_S)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::time::Time;
    use runtime::frame::FrameClock;

    fn running(copy_width: f64) -> Marquee {
        let mut m = Marquee::default();
        m.set_copy_width(copy_width);
        m.flags_mut().intersecting = true;
        m
    }

    fn frame(dt_s: f64) -> Frame {
        Frame::new(1, dt_s, Time(0.0))
    }

    #[test]
    fn tripled_repeats_three_times() {
        assert_eq!(tripled(&[1, 2]), vec![1, 2, 1, 2, 1, 2]);
        assert!(tripled::<u8>(&[]).is_empty());
    }

    #[test]
    fn wrap_stays_in_half_open_range() {
        assert_eq!(wrap_offset(0.0, 100.0), 0.0);
        assert_eq!(wrap_offset(-100.0, 100.0), 0.0);
        assert_eq!(wrap_offset(-130.0, 100.0), -30.0);
        assert_eq!(wrap_offset(30.0, 100.0), -70.0);
        assert_eq!(wrap_offset(250.0, 100.0), -50.0);
        assert_eq!(wrap_offset(-30.0, 0.0), 0.0);
    }

    #[test]
    fn offset_moves_by_elapsed_time_not_frames() {
        let mut m = running(1000.0);
        m.on_frame(frame(0.5));
        assert_eq!(m.offset(), -20.0);
        let mut n = running(1000.0);
        for _ in 0..10 {
            n.on_frame(frame(0.05));
        }
        assert!((n.offset() - -20.0).abs() < 1e-9);
    }

    #[test]
    fn offset_magnitude_always_below_copy_width() {
        let mut m = running(300.0);
        let mut clock = FrameClock::new();
        clock.start();
        let mut t = 0.0;
        for _ in 0..5_000 {
            t += 37.0;
            let f = clock.advance(t).unwrap();
            let off = m.on_frame(f);
            assert!(off.abs() < 300.0, "offset {off}");
        }
    }

    #[test]
    fn pause_then_resume_keeps_offset() {
        let mut m = running(1000.0);
        m.on_frame(frame(1.0));
        let before = m.offset();
        m.flags_mut().hovered = true;
        for _ in 0..10 {
            assert_eq!(m.on_frame(frame(0.1)), before);
        }
        m.flags_mut().hovered = false;
        assert_eq!(m.offset(), before);
        m.on_frame(frame(0.0));
        assert_eq!(m.offset(), before);
    }

    #[test]
    fn every_flag_pauses() {
        let cases: [fn(&mut MarqueeFlags); 4] = [
            |f| f.reduced_motion = true,
            |f| f.intersecting = false,
            |f| f.focused = true,
            |f| f.dragging = true,
        ];
        for set in cases {
            let mut m = running(1000.0);
            set(m.flags_mut());
            m.on_frame(frame(1.0));
            assert_eq!(m.offset(), 0.0);
        }
    }

    #[test]
    fn drag_sets_offset_from_start_and_resumes() {
        let mut m = running(500.0);
        m.on_frame(frame(1.0)); // -40
        m.pointer_down(100.0);
        assert!(m.is_paused());
        assert_eq!(m.pointer_move(160.0), Some(-480.0)); // -40 + 60 wraps
        assert_eq!(m.pointer_move(40.0), Some(-100.0));
        // time does not move the strip mid-drag
        m.on_frame(frame(1.0));
        assert_eq!(m.offset(), -100.0);
        m.pointer_up();
        assert!(!m.is_dragging());
        m.on_frame(frame(1.0));
        assert_eq!(m.offset(), -140.0);
    }

    #[test]
    fn pointer_focus_does_not_outlive_the_drag() {
        let mut m = running(500.0);
        m.pointer_down(100.0);
        m.focus(true, false);
        m.pointer_move(90.0);
        m.pointer_up();
        assert!(!m.is_paused());
        m.on_frame(frame(1.0));
        assert_eq!(m.offset(), -50.0);
    }

    #[test]
    fn release_clears_keyboard_focus_too() {
        let mut m = running(500.0);
        m.focus(true, true);
        assert!(m.is_paused());
        m.pointer_down(0.0);
        m.pointer_up();
        assert!(!m.is_paused());
    }

    #[test]
    fn hover_pauses_only_on_hover_capable_input() {
        let mut m = running(500.0);
        m.hover(true);
        assert!(m.is_paused());
        m.set_hover_capable(false);
        assert!(!m.is_paused());
        m.hover(true);
        assert!(!m.is_paused());
        m.set_hover_capable(true);
        m.hover(true);
        assert!(m.is_paused());
        m.hover(false);
        assert!(!m.is_paused());
    }

    #[test]
    fn move_without_drag_is_ignored() {
        let mut m = running(500.0);
        assert_eq!(m.pointer_move(10.0), None);
        assert_eq!(m.offset(), 0.0);
    }

    #[test]
    fn shrinking_copy_width_rewraps() {
        let mut m = running(1000.0);
        m.on_frame(frame(10.0)); // -400
        m.set_copy_width(300.0);
        assert_eq!(m.offset(), -100.0);
    }
}
