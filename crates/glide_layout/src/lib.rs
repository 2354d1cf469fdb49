//! Glide Layout Engine
//!
//! Resolves panel states to main-axis coordinates.
//!
//! - **Anchors**: fixed insets, intrinsic content size, adaptive content
//! - **Layouts**: the states of a panel, its position and backdrop
//! - **Adapter**: the committed coordinate, segments and drag offsets
//! - **Behavior**: spring, projection and removal tunables
//!
//! # Example
//!
//! ```rust
//! use glide_core::{PanelState, Size};
//! use glide_layout::{BottomLayout, LayoutAdapter, LayoutEnvironment};
//!
//! let env = LayoutEnvironment::new(Size::new(375.0, 667.0));
//! let mut adapter = LayoutAdapter::new(Box::new(BottomLayout), Box::new(env)).unwrap();
//! adapter.activate_layout(&PanelState::TIP);
//! assert_eq!(adapter.surface_location(), 667.0 - 69.0);
//! ```

pub mod adapter;
pub mod anchor;
pub mod behavior;
pub mod environment;
pub mod layout;

pub use adapter::{rubber_band, LayoutAdapter, LayoutSegment, StateList};
pub use anchor::{
    AdaptiveAnchor, AnchorSet, DistanceFn, FixedAnchor, IntrinsicAnchor, LayoutAnchoring,
    HIDDEN_INSET,
};
pub use behavior::{
    spring_config, Behavior, BehaviorConfig, ConfigError, ConfiguredBehavior, DefaultBehavior,
};
pub use environment::{LayoutEnvironment, SharedMetrics, SurfaceMetrics};
pub use layout::{BottomLayout, Layout, StaticLayout, TopLayout, DEFAULT_BACKDROP_ALPHA};
