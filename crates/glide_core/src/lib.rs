//! Glide Core
//!
//! Foundational types for the Glide floating panel engine:
//!
//! - **Geometry**: points, sizes, rectangles and insets in logical points
//! - **States**: named, ordered panel display states
//! - **Positions**: the host edge a panel is attached to, and its main axis
//! - **Gesture input**: pan samples and competing gesture kinds
//!
//! # Example
//!
//! ```rust
//! use glide_core::{PanelState, Position, Size};
//!
//! let states = [PanelState::FULL, PanelState::HALF, PanelState::TIP];
//! assert_eq!(PanelState::HALF.next_in(&states), PanelState::TIP);
//! assert_eq!(Position::Bottom.main_dimension(Size::new(375.0, 667.0)), 667.0);
//! ```

pub mod error;
pub mod events;
pub mod geometry;
pub mod position;
pub mod state;

pub use error::{LayoutError, Result};
pub use events::{event_types, EventType, GestureKind, PanGesture, PanPhase};
pub use geometry::{round_to_pixel, EdgeInsets, Point, Rect, RectEdge, Size, Vector};
pub use position::{BoundingGuide, Position, ReferenceEdge, ReferenceGuide};
pub use state::PanelState;
