//! Edge Auto-scroll
//!
//! A fixed-rate ticker that produces scroll deltas while the pointer rests in
//! an edge zone. Ticks are counted against the caller's clock, so a late poll
//! catches up with every missed tick instead of drifting.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Towards the start of the list (pointer at the left edge)
    Backward,
    /// Towards the end of the list (pointer at the right edge)
    Forward,
}

impl ScrollDirection {
    fn sign(self) -> f32 {
        match self {
            ScrollDirection::Backward => -1.0,
            ScrollDirection::Forward => 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AutoScroll {
    interval: Duration,
    step: f32,
    active: Option<(ScrollDirection, Instant)>,
}

impl AutoScroll {
    /// `rate_hz` ticks per second, each moving `step` pixels
    pub fn new(rate_hz: u32, step: f32) -> Self {
        let rate = rate_hz.max(1);
        Self {
            interval: Duration::from_secs(1) / rate,
            step,
            active: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Begin scrolling; restarting in the same direction keeps the cadence
    pub fn start(&mut self, direction: ScrollDirection, now: Instant) {
        match self.active {
            Some((current, _)) if current == direction => {}
            _ => self.active = Some((direction, now + self.interval)),
        }
    }

    pub fn stop(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn direction(&self) -> Option<ScrollDirection> {
        self.active.map(|(d, _)| d)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.map(|(_, next)| next)
    }

    /// Signed scroll delta accumulated since the last poll
    pub fn poll(&mut self, now: Instant) -> f32 {
        let Some((direction, mut next)) = self.active else {
            return 0.0;
        };
        let mut ticks = 0u32;
        while next <= now {
            ticks += 1;
            next += self.interval;
        }
        self.active = Some((direction, next));
        ticks as f32 * self.step * direction.sign()
    }
}

/// Clamp a scroll offset to `[0, content - viewport]`
pub fn clamp_scroll_offset(offset: f32, content_width: f32, viewport_width: f32) -> f32 {
    let max = (content_width - viewport_width).max(0.0);
    offset.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_delta_before_first_tick() {
        let t = Instant::now();
        let mut scroll = AutoScroll::new(60, 8.0);
        scroll.start(ScrollDirection::Forward, t);
        assert_eq!(scroll.poll(t), 0.0);
    }

    #[test]
    fn test_catches_up_missed_ticks() {
        let t = Instant::now();
        let mut scroll = AutoScroll::new(10, 5.0);
        scroll.start(ScrollDirection::Forward, t);
        // 100ms interval, 350ms elapsed -> 3 ticks
        assert_eq!(scroll.poll(t + Duration::from_millis(350)), 15.0);
        assert_eq!(scroll.poll(t + Duration::from_millis(399)), 0.0);
        assert_eq!(scroll.poll(t + Duration::from_millis(400)), 5.0);
    }

    #[test]
    fn test_backward_is_negative_and_stop_halts() {
        let t = Instant::now();
        let mut scroll = AutoScroll::new(10, 5.0);
        scroll.start(ScrollDirection::Backward, t);
        assert_eq!(scroll.poll(t + Duration::from_millis(100)), -5.0);
        scroll.stop();
        assert_eq!(scroll.poll(t + Duration::from_secs(5)), 0.0);
        assert!(!scroll.is_active());
    }

    #[test]
    fn test_same_direction_restart_keeps_cadence() {
        let t = Instant::now();
        let mut scroll = AutoScroll::new(10, 1.0);
        scroll.start(ScrollDirection::Forward, t);
        scroll.start(ScrollDirection::Forward, t + Duration::from_millis(90));
        assert_eq!(scroll.next_deadline(), Some(t + Duration::from_millis(100)));
        scroll.start(ScrollDirection::Backward, t + Duration::from_millis(90));
        assert_eq!(scroll.next_deadline(), Some(t + Duration::from_millis(190)));
    }

    #[test]
    fn test_clamp_scroll_offset() {
        assert_eq!(clamp_scroll_offset(-10.0, 500.0, 300.0), 0.0);
        assert_eq!(clamp_scroll_offset(250.0, 500.0, 300.0), 200.0);
        assert_eq!(clamp_scroll_offset(40.0, 100.0, 300.0), 0.0);
    }
}
