//! Glide Floating Panel
//!
//! A draggable panel that snaps between the anchors of a layout.
//!
//! - **Panel**: pan gesture handling, momentum projection and attraction
//! - **Scroll hand-off**: locking, pinning and sharing drags with one tracked
//!   scroll view
//! - **Arbitration**: answers to recognizer queries, with interceptors
//! - **Observer**: state, movement and drag lifecycle notifications
//!
//! # Example
//!
//! ```rust
//! use glide_core::{PanelState, Size};
//! use glide_layout::{BottomLayout, LayoutEnvironment};
//! use glide_panel::FloatingPanel;
//!
//! let env = LayoutEnvironment::new(Size::new(375.0, 667.0));
//! let mut panel = FloatingPanel::new(BottomLayout, env).unwrap();
//! panel.show(false).unwrap();
//! assert_eq!(panel.state(), PanelState::HALF);
//!
//! panel.move_to(PanelState::FULL, true).unwrap();
//! while panel.tick(1.0 / 60.0) {}
//! assert_eq!(panel.surface_location(), panel.surface_location_for(&PanelState::FULL));
//! ```

pub mod config;
pub mod interceptor;
pub mod observer;
pub mod panel;
pub mod phase;
pub mod scroll;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::PanelConfig;
pub use interceptor::{ArbitrationQuery, GestureInterceptor, Interception};
pub use observer::{NoopObserver, PanelObserver, PanelSnapshot};
pub use panel::{project, Completion, FloatingPanel};
pub use phase::InteractionPhase;
pub use scroll::{default_pinning_offset, TrackedScrollView};
