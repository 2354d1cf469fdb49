//! Gesture input
//!
//! Platform-agnostic pointer-drag input delivered by the host, plus the event
//! identifiers used to drive the interaction state machine.

use crate::geometry::{Point, Vector};

/// Event type identifier
pub type EventType = u32;

/// Interaction events
pub mod event_types {
    use super::EventType;

    /// A drag gesture began, or a running animation was interrupted by a touch
    pub const DRAG_BEGIN: EventType = 1;
    /// A drag ended without animation (target equals the current location)
    pub const DRAG_SETTLE: EventType = 2;
    /// A drag ended and the panel starts moving toward its target
    pub const ATTRACT_BEGIN: EventType = 3;
    /// The attraction animation finished
    pub const ATTRACT_END: EventType = 4;
    /// A removal was decided (drag end or host request)
    pub const REMOVE_BEGIN: EventType = 5;
    /// The panel reached its hidden anchor after a removal
    pub const REMOVE_END: EventType = 6;
    /// A running animation was stopped without finishing
    pub const INTERRUPT: EventType = 7;
}

/// Phase of a continuous pan gesture
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PanPhase {
    /// Not recognized yet
    #[default]
    Possible,
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

impl PanPhase {
    /// Whether the gesture is over
    pub fn is_terminal(self) -> bool {
        matches!(self, PanPhase::Ended | PanPhase::Cancelled | PanPhase::Failed)
    }

    /// Whether the gesture is currently tracking a pointer
    pub fn is_active(self) -> bool {
        matches!(self, PanPhase::Began | PanPhase::Changed)
    }
}

/// One sample of a pan gesture
///
/// `translation` is accumulated since the gesture began, `velocity` is in
/// points per second and `location` is in panel-surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanGesture {
    pub phase: PanPhase,
    #[cfg_attr(feature = "serde", serde(default))]
    pub translation: Vector,
    #[cfg_attr(feature = "serde", serde(default))]
    pub velocity: Vector,
    #[cfg_attr(feature = "serde", serde(default))]
    pub location: Point,
}

impl PanGesture {
    pub fn new(phase: PanPhase, translation: Vector, velocity: Vector, location: Point) -> Self {
        Self {
            phase,
            translation,
            velocity,
            location,
        }
    }

    pub fn began(location: Point) -> Self {
        Self::new(PanPhase::Began, Vector::ZERO, Vector::ZERO, location)
    }

    pub fn changed(translation: Vector, velocity: Vector, location: Point) -> Self {
        Self::new(PanPhase::Changed, translation, velocity, location)
    }

    pub fn ended(translation: Vector, velocity: Vector, location: Point) -> Self {
        Self::new(PanPhase::Ended, translation, velocity, location)
    }
}

/// The kind of a gesture competing with the panel's own pan gesture
///
/// Used when the host asks the panel how two recognizers should interact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GestureKind {
    /// The pan gesture of this panel
    PanelPan,
    /// The pan gesture of another floating panel
    OtherPanelPan {
        /// Whether this panel's surface is nested inside the other panel
        contains_this_panel: bool,
    },
    /// The pan gesture of the tracked scroll view
    TrackedScrollPan,
    /// Any other gesture owned by the tracked scroll view (swipe actions, drag auto-scroll)
    TrackedScrollSecondary,
    /// The background dismiss gesture of a modal sheet
    SheetDismiss,
    /// Pan, swipe, rotation, edge-pan or pinch gestures of the host
    Continuous,
    /// Tap or long-press gestures
    Discrete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_classification() {
        assert!(PanPhase::Ended.is_terminal());
        assert!(PanPhase::Failed.is_terminal());
        assert!(!PanPhase::Changed.is_terminal());
        assert!(PanPhase::Began.is_active());
        assert!(!PanPhase::Possible.is_active());
    }

    #[test]
    fn test_constructors() {
        let g = PanGesture::changed(Vector::new(0.0, 10.0), Vector::new(0.0, 50.0), Point::ZERO);
        assert_eq!(g.phase, PanPhase::Changed);
        assert_eq!(g.translation.dy, 10.0);
        assert_eq!(PanGesture::began(Point::new(1.0, 2.0)).translation, Vector::ZERO);
    }
}
