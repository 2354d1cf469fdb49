//! Tracked scroll view tests
//!
//! Covers:
//! - Locking below the most expanded state and unlocking at it
//! - Pinning the content offset while the panel is not fully expanded
//! - Sharing a drag between the content and the panel at the top of the content
//! - Restoring the view settings when tracking stops

use glide_core::{PanGesture, PanelState, Point, Position, Rect, ReferenceEdge, ReferenceGuide, Size, Vector};
use glide_layout::{FixedAnchor, LayoutEnvironment, StaticLayout};
use glide_panel::testing::{MockScrollView, RecordingObserver};
use glide_panel::{FloatingPanel, InteractionPhase, TrackedScrollView};

const FRAME: f32 = 1.0 / 60.0;
const CONTENT: Point = Point::new(100.0, 200.0);

fn panel_with_scroll() -> (FloatingPanel, MockScrollView) {
    let layout = StaticLayout::new(Position::Bottom, PanelState::HALF)
        .anchor(
            PanelState::FULL,
            FixedAnchor::absolute(20.0, ReferenceEdge::Top, ReferenceGuide::Superview),
        )
        .anchor(
            PanelState::HALF,
            FixedAnchor::absolute(250.0, ReferenceEdge::Bottom, ReferenceGuide::Superview),
        )
        .anchor(
            PanelState::TIP,
            FixedAnchor::absolute(60.0, ReferenceEdge::Bottom, ReferenceGuide::Superview),
        );
    let mut panel = FloatingPanel::new(layout, LayoutEnvironment::new(Size::new(375.0, 667.0))).unwrap();
    let scroll = MockScrollView::new(Rect::new(0.0, 36.0, 375.0, 611.0), Size::new(375.0, 2000.0));
    assert!(panel.track_scroll_view(scroll.boxed()).is_none());
    (panel, scroll)
}

fn settle(panel: &mut FloatingPanel) {
    let mut frames = 0;
    while panel.tick(FRAME) {
        frames += 1;
        assert!(frames < 1000, "animation did not settle");
    }
}

#[test]
fn test_locked_below_most_expanded_state() {
    let (mut panel, scroll) = panel_with_scroll();
    assert!(!scroll.is_locked());

    panel.show(false).unwrap();
    assert!(scroll.is_locked());
    assert!(!scroll.bounces());
    assert!(!scroll.shows_indicator());

    panel.move_to(PanelState::FULL, false).unwrap();
    assert!(!scroll.is_locked());
    assert!(scroll.bounces());
    assert!(scroll.shows_indicator());

    panel.move_to(PanelState::HALF, true).unwrap();
    settle(&mut panel);
    assert!(scroll.is_locked());
}

#[test]
fn test_scrollable_states_override() {
    let (panel, scroll) = panel_with_scroll();
    let observer = RecordingObserver::new();
    observer.set_scrollable_states(&[PanelState::FULL, PanelState::HALF]);
    let mut panel = panel.with_observer(observer);

    panel.show(false).unwrap();
    assert!(!scroll.is_locked());
    panel.move_to(PanelState::TIP, false).unwrap();
    assert!(scroll.is_locked());
}

#[test]
fn test_untrack_restores_settings() {
    let (mut panel, scroll) = panel_with_scroll();
    panel.show(false).unwrap();
    assert!(scroll.is_locked());

    let view = panel.untrack_scroll_view();
    assert!(view.is_some());
    assert!(panel.scroll_view().is_none());
    assert!(scroll.bounces());
    assert!(scroll.shows_indicator());
    assert!(!scroll.is_directional_lock_enabled());
}

#[test]
fn test_content_pinned_below_most_expanded_state() {
    let (mut panel, scroll) = panel_with_scroll();
    panel.show(false).unwrap();

    scroll.scroll_to(Point::new(0.0, 50.0));
    panel.handle_scroll_pan(PanGesture::changed(
        Vector::new(0.0, -50.0),
        Vector::new(0.0, -300.0),
        CONTENT,
    ));
    assert_eq!(scroll.content_offset(), Point::ZERO);
}

#[test]
fn test_scrolled_content_keeps_the_touch() {
    let (mut panel, scroll) = panel_with_scroll();
    panel.move_to(PanelState::FULL, false).unwrap();
    scroll.scroll_to(Point::new(0.0, 100.0));

    panel.handle_pan(PanGesture::began(CONTENT));
    panel.handle_pan(PanGesture::changed(
        Vector::new(0.0, -10.0),
        Vector::new(0.0, -500.0),
        Point::new(100.0, 190.0),
    ));
    panel.handle_pan(PanGesture::changed(
        Vector::new(0.0, -60.0),
        Vector::new(0.0, -500.0),
        Point::new(100.0, 140.0),
    ));

    assert_eq!(panel.phase(), InteractionPhase::Idle);
    assert_eq!(panel.surface_location(), 20.0);
    assert_eq!(scroll.content_offset(), Point::new(0.0, 100.0));
}

#[test]
fn test_secondary_gesture_keeps_the_touch() {
    let (mut panel, scroll) = panel_with_scroll();
    panel.move_to(PanelState::FULL, false).unwrap();
    scroll.set_secondary_gesture_active(true);

    panel.handle_pan(PanGesture::began(CONTENT));
    panel.handle_pan(PanGesture::changed(Vector::new(0.0, 10.0), Vector::new(0.0, 500.0), CONTENT));
    panel.handle_pan(PanGesture::changed(Vector::new(0.0, 110.0), Vector::new(0.0, 500.0), CONTENT));
    assert_eq!(panel.surface_location(), 20.0);
}

#[test]
fn test_panel_takes_over_at_top_of_content() {
    let (mut panel, scroll) = panel_with_scroll();
    panel.move_to(PanelState::FULL, false).unwrap();
    assert!(!scroll.is_locked());

    panel.handle_pan(PanGesture::began(CONTENT));
    panel.handle_pan(PanGesture::changed(
        Vector::new(0.0, 10.0),
        Vector::new(0.0, 500.0),
        Point::new(100.0, 210.0),
    ));
    assert!(panel.is_interacting());
    assert!(scroll.is_locked());

    panel.handle_pan(PanGesture::changed(
        Vector::new(0.0, 110.0),
        Vector::new(0.0, 500.0),
        Point::new(100.0, 310.0),
    ));
    assert_eq!(panel.surface_location(), 120.0);

    panel.handle_pan(PanGesture::ended(
        Vector::new(0.0, 110.0),
        Vector::ZERO,
        Point::new(100.0, 310.0),
    ));
    assert!(panel.is_attracting());
    assert_eq!(scroll.content_offset(), Point::ZERO);

    settle(&mut panel);
    assert_eq!(panel.state(), PanelState::FULL);
    assert_eq!(panel.surface_location(), 20.0);
    assert!(!scroll.is_locked());
}

#[test]
fn test_retracking_returns_previous_view() {
    let (mut panel, first) = panel_with_scroll();
    panel.show(false).unwrap();
    assert!(first.is_locked());

    let second = MockScrollView::new(Rect::new(0.0, 36.0, 375.0, 611.0), Size::new(375.0, 300.0));
    let previous = panel.track_scroll_view(second.boxed());
    assert!(previous.is_some());
    assert!(!first.is_locked());
    assert_eq!(
        panel.scroll_view().map(|view| view.content_size()),
        Some(Size::new(375.0, 300.0))
    );
}
