//! Tracked scroll view
//!
//! The panel can track one scrollable content region. While the panel is
//! below its most expanded anchor the region is "locked" (no bounce, no
//! indicator, directional lock on) and its offset is pinned; at the most
//! expanded anchor it scrolls freely and drags hand off between the two.

use tracing::debug;

use glide_core::{EdgeInsets, PanPhase, Point, Position, Rect, Size};

/// The scrollable content region a panel cooperates with
///
/// All geometry is in points. `frame_in_surface` is the region's frame in
/// panel-surface coordinates.
pub trait TrackedScrollView {
    fn content_offset(&self) -> Point;

    /// Jump to an offset, stopping any deceleration
    fn set_content_offset(&mut self, offset: Point);

    fn content_size(&self) -> Size;

    /// Content inset including any safe-area adjustment
    fn content_inset(&self) -> EdgeInsets;

    fn bounds_size(&self) -> Size;

    fn frame_in_surface(&self) -> Rect;

    fn bounces(&self) -> bool;

    fn set_bounces(&mut self, bounces: bool);

    fn shows_indicator(&self) -> bool;

    fn set_shows_indicator(&mut self, shows: bool);

    fn is_directional_lock_enabled(&self) -> bool;

    fn set_directional_lock_enabled(&mut self, enabled: bool);

    fn is_scroll_enabled(&self) -> bool;

    fn set_scroll_enabled(&mut self, enabled: bool);

    fn is_decelerating(&self) -> bool;

    /// Whether the region is in an editing mode (e.g. reordering rows)
    fn is_editing(&self) -> bool;

    fn always_bounces_vertical(&self) -> bool;

    fn always_bounces_horizontal(&self) -> bool;

    /// Phase of the region's own pan gesture
    fn pan_phase(&self) -> PanPhase;

    /// Whether another gesture of the region (swipe actions, drag auto-scroll)
    /// is active
    fn is_secondary_gesture_active(&self) -> bool;

    fn is_locked(&self) -> bool {
        !self.shows_indicator() && !self.bounces() && self.is_directional_lock_enabled()
    }

    /// The largest offset that keeps content in view
    fn content_offset_max(&self) -> Point {
        let size = self.content_size();
        let inset = self.content_inset();
        let bounds = self.bounds_size();
        Point::new(
            ((size.width + inset.right) - bounds.width).max(0.0),
            ((size.height + inset.bottom) - bounds.height).max(0.0),
        )
    }

    /// Whether content can scroll along the main axis of `position`
    fn is_scrollable_along(&self, position: Position) -> bool {
        let content = position.main_dimension(self.content_size());
        let bounds = position.main_dimension(self.bounds_size());
        let always = if position.is_vertical() {
            self.always_bounces_vertical()
        } else {
            self.always_bounces_horizontal()
        };
        content > bounds || always
    }
}

/// Default offset the content is pinned to while the panel moves
pub fn default_pinning_offset(view: &dyn TrackedScrollView, position: Position) -> Point {
    match position {
        Position::Top => Point::new(0.0, view.content_offset_max().y),
        Position::Left => Point::new(view.content_offset_max().x, 0.0),
        Position::Bottom => Point::new(0.0, -view.content_inset().top),
        Position::Right => Point::new(-view.content_inset().left, 0.0),
    }
}

/// A tracked scroll view plus the settings locking overrides
pub(crate) struct ScrollTracker {
    view: Box<dyn TrackedScrollView>,
    saved_bounces: bool,
    saved_indicator: bool,
}

impl ScrollTracker {
    pub(crate) fn attach(view: Box<dyn TrackedScrollView>) -> Self {
        Self {
            saved_bounces: view.bounces(),
            saved_indicator: view.shows_indicator(),
            view,
        }
    }

    /// Restore the settings the panel changed and hand the view back
    pub(crate) fn detach(mut self) -> Box<dyn TrackedScrollView> {
        self.view.set_directional_lock_enabled(false);
        self.view.set_bounces(self.saved_bounces);
        self.view.set_shows_indicator(self.saved_indicator);
        self.view
    }

    pub(crate) fn view(&self) -> &dyn TrackedScrollView {
        self.view.as_ref()
    }

    pub(crate) fn view_mut(&mut self) -> &mut dyn TrackedScrollView {
        self.view.as_mut()
    }

    pub(crate) fn lock(&mut self) {
        if self.view.is_locked() {
            return;
        }
        debug!("lock scroll view");
        self.saved_bounces = self.view.bounces();
        self.saved_indicator = self.view.shows_indicator();
        self.view.set_directional_lock_enabled(true);
        self.view.set_bounces(false);
        self.view.set_shows_indicator(false);
    }

    pub(crate) fn unlock(&mut self) {
        if !self.view.is_locked() {
            return;
        }
        debug!("unlock scroll view");
        self.view.set_directional_lock_enabled(false);
        self.view.set_bounces(self.saved_bounces);
        self.view.set_shows_indicator(self.saved_indicator);
    }

    /// Pin the main-axis offset, keeping the cross-axis offset
    pub(crate) fn stop_scrolling(&mut self, at: Point, position: Position) {
        let current = self.view.content_offset();
        let value = position.main_location(at);
        self.view
            .set_content_offset(position.with_main_location(current, value));
    }
}
