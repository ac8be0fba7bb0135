use foundation::time::Time;

/// Largest frame delta handed to consumers, in seconds. Backgrounded tabs stop
/// delivering animation frames; without a cap the first frame after returning
/// would move time-driven animations by the whole gap.
pub const MAX_FRAME_DT_S: f64 = 0.1;

/// Frame metadata handed to time-driven consumers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index since the clock last started.
    pub index: u64,
    /// Delta since the previous frame (seconds), clamped to [`MAX_FRAME_DT_S`].
    pub dt_s: f64,
    /// Wall-clock timestamp of the frame.
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64, time: Time) -> Self {
        Self { index, dt_s, time }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ClockState {
    #[default]
    Stopped,
    Running,
}

/// Turns animation-frame timestamps into [`Frame`]s.
///
/// The clock is either fully stopped (its owner has cancelled the frame
/// loop) or running. Consumers that want to freeze visually while the loop
/// keeps polling their flags simply skip positional updates; the clock keeps
/// ticking so the next resumed frame only sees one frame's worth of time.
#[derive(Debug, Default)]
pub struct FrameClock {
    state: ClockState,
    index: u64,
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.state = ClockState::Running;
        self.index = 0;
        self.last_ms = None;
    }

    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
        self.last_ms = None;
    }

    /// Advance to the frame at `timestamp_ms`.
    ///
    /// Returns `None` while stopped. The first frame after `start` has a zero
    /// delta; timestamps that go backwards are treated as zero deltas.
    pub fn advance(&mut self, timestamp_ms: f64) -> Option<Frame> {
        if !self.is_running() {
            return None;
        }
        let dt_s = match self.last_ms {
            Some(prev) => ((timestamp_ms - prev) / 1000.0).clamp(0.0, MAX_FRAME_DT_S),
            None => 0.0,
        };
        let frame = Frame::new(self.index, dt_s, Time::from_millis(timestamp_ms));
        self.index += 1;
        self.last_ms = Some(timestamp_ms);
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_clock_yields_nothing() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(16.0), None);
        assert_eq!(clock.state(), ClockState::Stopped);
    }

    #[test]
    fn first_frame_has_zero_delta() {
        let mut clock = FrameClock::new();
        clock.start();
        let f0 = clock.advance(1000.0).unwrap();
        assert_eq!(f0.index, 0);
        assert_eq!(f0.dt_s, 0.0);
        let f1 = clock.advance(1016.0).unwrap();
        assert_eq!(f1.index, 1);
        assert!((f1.dt_s - 0.016).abs() < 1e-9);
        assert_eq!(f1.time, Time(1.016));
    }

    #[test]
    fn large_gaps_are_clamped() {
        let mut clock = FrameClock::new();
        clock.start();
        clock.advance(0.0);
        let f = clock.advance(5_000.0).unwrap();
        assert_eq!(f.dt_s, MAX_FRAME_DT_S);
    }

    #[test]
    fn backwards_timestamps_are_zero_delta() {
        let mut clock = FrameClock::new();
        clock.start();
        clock.advance(100.0);
        assert_eq!(clock.advance(50.0).unwrap().dt_s, 0.0);
    }

    #[test]
    fn restart_resets_index_and_delta() {
        let mut clock = FrameClock::new();
        clock.start();
        clock.advance(0.0);
        clock.advance(16.0);
        clock.stop();
        assert_eq!(clock.advance(32.0), None);
        clock.start();
        let f = clock.advance(2_000.0).unwrap();
        assert_eq!(f.index, 0);
        assert_eq!(f.dt_s, 0.0);
    }

    #[test]
    fn start_while_running_keeps_history() {
        let mut clock = FrameClock::new();
        clock.start();
        clock.advance(0.0);
        clock.start();
        assert_eq!(clock.advance(10.0).unwrap().index, 1);
    }
}
