//! Glide Animation System
//!
//! Numeric spring integration and frame tick sources.
//!
//! # Features
//!
//! - **Spring Animator**: semi-implicit damped spring tuned by deceleration rate
//!   and response time, stopping within one physical pixel of its target
//! - **Tick Sources**: pluggable frame clocks (host vsync, real time, manual)
//! - **Interruptible**: animators can be stopped mid-flight without completing

pub mod spring;
pub mod ticker;

pub use spring::{DecelerationRate, SpringAnimator, SpringConfig, SpringStep};
pub use ticker::{ExternalTicker, FrameTick, IntervalTicker, ManualTicker, TickSource};
