//! Interaction phases
//!
//! The controller moves between phases on the events in
//! [`glide_core::event_types`]. Events with no transition from the current
//! phase are ignored.

use glide_core::{event_types, EventType};

/// What the panel is doing right now
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InteractionPhase {
    /// Resting, or running a programmatic move
    #[default]
    Idle,
    /// Following the pointer
    Dragging,
    /// Pulled toward the target of a release by the spring
    Attracting,
    /// Animating to `hidden` after a removal gesture
    Removing,
}

impl InteractionPhase {
    /// Handle an event and return the new phase, or None if no transition
    pub fn on_event(&self, event: EventType) -> Option<Self> {
        use event_types::*;
        match (self, event) {
            (InteractionPhase::Idle, DRAG_BEGIN) => Some(InteractionPhase::Dragging),
            (InteractionPhase::Attracting, DRAG_BEGIN) => Some(InteractionPhase::Dragging),
            (InteractionPhase::Dragging, DRAG_SETTLE) => Some(InteractionPhase::Idle),
            (InteractionPhase::Dragging, ATTRACT_BEGIN) => Some(InteractionPhase::Attracting),
            (InteractionPhase::Dragging, REMOVE_BEGIN) => Some(InteractionPhase::Removing),
            (InteractionPhase::Attracting, REMOVE_BEGIN) => Some(InteractionPhase::Removing),
            (InteractionPhase::Attracting, ATTRACT_END) => Some(InteractionPhase::Idle),
            (InteractionPhase::Attracting, INTERRUPT) => Some(InteractionPhase::Idle),
            (InteractionPhase::Removing, REMOVE_END) => Some(InteractionPhase::Idle),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, InteractionPhase::Dragging)
    }

    pub fn is_attracting(&self) -> bool {
        matches!(self, InteractionPhase::Attracting)
    }

    pub fn is_removing(&self) -> bool {
        matches!(self, InteractionPhase::Removing)
    }
}
