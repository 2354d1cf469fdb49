//! Panel notifications
//!
//! Hosts observe a panel through a [`PanelObserver`] handed over at
//! construction. Every method has a no-op default, and [`NoopObserver`] is the
//! observer of a panel nobody listens to. Observers receive a
//! [`PanelSnapshot`] rather than the panel itself, so they never hold a
//! reference back into the controller.

use glide_core::{PanelState, Point, Vector};

use crate::phase::InteractionPhase;
use crate::scroll::TrackedScrollView;

/// The observable state of a panel at the time of a notification
#[derive(Clone, Debug, PartialEq)]
pub struct PanelSnapshot {
    pub state: PanelState,
    /// Committed main-axis coordinate of the panel
    pub surface_location: f32,
    pub backdrop_alpha: f32,
    pub phase: InteractionPhase,
}

/// Listener and override points of a floating panel
#[allow(unused_variables)]
pub trait PanelObserver {
    fn did_change_state(&mut self, panel: &PanelSnapshot) {}

    /// Veto a drag before it starts
    fn should_begin_dragging(&mut self, panel: &PanelSnapshot) -> bool {
        true
    }

    /// The surface location changed
    fn did_move(&mut self, panel: &PanelSnapshot) {}

    fn will_begin_dragging(&mut self, panel: &PanelSnapshot) {}

    /// Called on release with the computed target; assign to override it
    fn will_end_dragging(&mut self, panel: &PanelSnapshot, velocity: Vector, target: &mut PanelState) {}

    fn did_end_dragging(&mut self, panel: &PanelSnapshot, will_attract: bool) {}

    fn will_begin_attracting(&mut self, panel: &PanelSnapshot, to: &PanelState) {}

    fn did_end_attracting(&mut self, panel: &PanelSnapshot) {}

    /// Decide whether a release removes the panel
    ///
    /// `velocity` is the release velocity divided by the distance to the
    /// hidden anchor. `None` applies the behavior's velocity threshold.
    fn should_remove_at(&mut self, panel: &PanelSnapshot, velocity: Vector) -> Option<bool> {
        None
    }

    fn will_remove(&mut self, panel: &PanelSnapshot) {}

    fn did_remove(&mut self, panel: &PanelSnapshot) {}

    /// Offset the tracked scroll view is pinned to while the panel moves
    fn content_offset_for_pinning(
        &mut self,
        panel: &PanelSnapshot,
        scroll_view: &dyn TrackedScrollView,
    ) -> Option<Point> {
        None
    }

    /// Whether the tracked scroll view may scroll at `state`. `None` allows
    /// scrolling at the most expanded state only.
    fn should_allow_scroll(&mut self, panel: &PanelSnapshot, state: &PanelState) -> Option<bool> {
        None
    }
}

/// An observer that ignores everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl PanelObserver for NoopObserver {}
