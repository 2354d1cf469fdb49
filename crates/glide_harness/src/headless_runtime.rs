//! Headless runtime primitives for scenario execution.

use anyhow::{bail, Result};
use glide_animation::FrameTick;

/// Configuration for deterministic headless frame execution.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRunConfig {
    /// Number of frames to execute.
    pub max_frames: u32,
    /// Logical milliseconds between frames.
    pub tick_ms: u64,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            max_frames: 1,
            tick_ms: 16,
        }
    }
}

/// Frame context passed to headless frame callbacks.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessContext {
    pub frame_index: u32,
    /// Logical time at the start of the run
    pub start_ms: u64,
    /// Logical time at the start of this frame
    pub elapsed_ms: u64,
    pub tick_ms: u64,
}

impl HeadlessContext {
    /// The display frame for this step of the logical clock.
    pub fn frame(&self) -> FrameTick {
        let start = self.elapsed_ms as f64 / 1000.0;
        FrameTick::new(start, start + self.tick_ms as f64 / 1000.0)
    }
}

/// Deterministic headless runtime loop.
pub struct HeadlessRuntime;

impl HeadlessRuntime {
    /// Run a fixed frame budget starting at `start_ms` on the logical clock.
    ///
    /// The callback returns whether to keep going; returns the number of
    /// frames run.
    pub fn run<F>(cfg: HeadlessRunConfig, start_ms: u64, mut on_frame: F) -> Result<u32>
    where
        F: FnMut(&HeadlessContext) -> bool,
    {
        if cfg.max_frames == 0 {
            bail!("headless max_frames must be > 0");
        }
        if cfg.tick_ms == 0 {
            bail!("headless tick_ms must be > 0");
        }

        for frame in 0..cfg.max_frames {
            let elapsed_ms = start_ms.saturating_add(cfg.tick_ms.saturating_mul(frame as u64));
            let keep_going = on_frame(&HeadlessContext {
                frame_index: frame,
                start_ms,
                elapsed_ms,
                tick_ms: cfg.tick_ms,
            });
            if !keep_going {
                return Ok(frame + 1);
            }
        }

        Ok(cfg.max_frames)
    }
}
