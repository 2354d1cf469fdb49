//! Frame tick sources
//!
//! Animations are stepped by frames delivered from a [`TickSource`]. The host
//! platform backs it with its vsync callback or a timer; tests use the
//! deterministic [`ManualTicker`].

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// One display frame
///
/// `timestamp` is when the frame started, `target_timestamp` when it will be
/// displayed. Both are in seconds on the source's clock.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTick {
    pub timestamp: f64,
    pub target_timestamp: f64,
}

impl FrameTick {
    pub fn new(timestamp: f64, target_timestamp: f64) -> Self {
        Self {
            timestamp,
            target_timestamp,
        }
    }

    /// A frame starting at `timestamp` for a display refreshing at `fps`
    pub fn at_fps(timestamp: f64, fps: u32) -> Self {
        let fps = fps.max(1) as f64;
        Self::new(timestamp, timestamp + 1.0 / fps)
    }

    /// Integration step for this frame in seconds
    pub fn duration(&self) -> f32 {
        (self.target_timestamp - self.timestamp).max(0.0) as f32
    }
}

/// A source of display frames
///
/// The controller starts the source when an animation begins and stops it
/// when the animation ends. While running, the host delivers each frame by
/// calling the controller's `tick`, or the controller polls the source.
pub trait TickSource {
    /// Begin delivering frames
    fn start(&mut self);

    /// Stop delivering frames
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// The next frame, if the source is running
    fn poll(&mut self) -> Option<FrameTick>;
}

/// A tick source that never produces frames on its own
///
/// For hosts that push frames into the controller directly.
#[derive(Debug, Default)]
pub struct ExternalTicker {
    running: bool,
}

impl TickSource for ExternalTicker {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn poll(&mut self) -> Option<FrameTick> {
        None
    }
}

#[derive(Debug)]
struct ManualState {
    running: bool,
    now: f64,
    fps: u32,
    starts: usize,
    stops: usize,
}

/// A deterministic tick source advancing a fixed frame at a time
///
/// Clones share the same clock, so a test can keep a handle while the
/// controller owns another.
#[derive(Clone, Debug)]
pub struct ManualTicker {
    state: Rc<RefCell<ManualState>>,
}

impl ManualTicker {
    pub fn at_fps(fps: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(ManualState {
                running: false,
                now: 0.0,
                fps: fps.max(1),
                starts: 0,
                stops: 0,
            })),
        }
    }

    /// Current clock time in seconds
    pub fn now(&self) -> f64 {
        self.state.borrow().now
    }

    /// Number of times the source was started
    pub fn start_count(&self) -> usize {
        self.state.borrow().starts
    }

    /// Number of times the source was stopped
    pub fn stop_count(&self) -> usize {
        self.state.borrow().stops
    }

    /// Produce the next frame regardless of the running flag
    pub fn next_frame(&self) -> FrameTick {
        let mut state = self.state.borrow_mut();
        let frame = FrameTick::at_fps(state.now, state.fps);
        state.now = frame.target_timestamp;
        frame
    }
}

impl Default for ManualTicker {
    fn default() -> Self {
        Self::at_fps(60)
    }
}

impl TickSource for ManualTicker {
    fn start(&mut self) {
        let mut state = self.state.borrow_mut();
        state.running = true;
        state.starts += 1;
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.running {
            state.stops += 1;
        }
        state.running = false;
    }

    fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    fn poll(&mut self) -> Option<FrameTick> {
        if !self.is_running() {
            return None;
        }
        Some(self.next_frame())
    }
}

/// A tick source measuring real elapsed time between polls
#[derive(Debug)]
pub struct IntervalTicker {
    origin: Instant,
    last_frame: Instant,
    max_step: f64,
    running: bool,
}

impl IntervalTicker {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            last_frame: now,
            max_step: 0.1,
            running: false,
        }
    }

    /// Cap a single step so a stalled host does not make the spring jump
    pub fn with_max_step(mut self, seconds: f64) -> Self {
        self.max_step = seconds;
        self
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for IntervalTicker {
    fn start(&mut self) {
        self.last_frame = Instant::now();
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn poll(&mut self) -> Option<FrameTick> {
        if !self.running {
            return None;
        }
        let now = Instant::now();
        let timestamp = (self.last_frame - self.origin).as_secs_f64();
        let dt = (now - self.last_frame).as_secs_f64().min(self.max_step);
        self.last_frame = now;
        Some(FrameTick::new(timestamp, timestamp + dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_duration() {
        let frame = FrameTick::at_fps(1.0, 120);
        assert!((frame.duration() - 1.0 / 120.0).abs() < 1e-6);
        assert_eq!(FrameTick::new(2.0, 1.0).duration(), 0.0);
    }

    #[test]
    fn test_manual_ticker_only_polls_when_running() {
        let mut ticker = ManualTicker::at_fps(60);
        assert_eq!(ticker.poll(), None);
        ticker.start();
        let a = ticker.poll().unwrap();
        let b = ticker.poll().unwrap();
        assert_eq!(a.target_timestamp, b.timestamp);
        ticker.stop();
        ticker.stop();
        assert_eq!(ticker.poll(), None);
        assert_eq!(ticker.start_count(), 1);
        assert_eq!(ticker.stop_count(), 1);
    }

    #[test]
    fn test_manual_ticker_clones_share_clock() {
        let handle = ManualTicker::at_fps(60);
        let mut owned = handle.clone();
        owned.start();
        owned.poll();
        assert!(handle.is_running());
        assert!(handle.now() > 0.0);
    }

    #[test]
    fn test_interval_ticker() {
        let mut ticker = IntervalTicker::new();
        assert!(ticker.poll().is_none());
        ticker.start();
        let frame = ticker.poll().unwrap();
        assert!(frame.target_timestamp >= frame.timestamp);
        assert!(frame.duration() <= 0.1);
    }

    #[test]
    fn test_external_ticker_never_polls() {
        let mut ticker = ExternalTicker::default();
        ticker.start();
        assert!(ticker.is_running());
        assert_eq!(ticker.poll(), None);
    }
}
