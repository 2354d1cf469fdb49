//! Gesture arbitration tests

use std::cell::RefCell;
use std::rc::Rc;

use glide_core::{GestureKind, PanGesture, PanelState, Point, Rect, Size, Vector};
use glide_layout::{BottomLayout, LayoutEnvironment, TopLayout};
use glide_panel::testing::MockScrollView;
use glide_panel::{ArbitrationQuery, FloatingPanel, Interception};

const GRABBER: Point = Point::new(100.0, 10.0);
const CONTENT: Point = Point::new(100.0, 200.0);

fn env() -> LayoutEnvironment {
    LayoutEnvironment::new(Size::new(375.0, 667.0))
}

fn shown_panel() -> FloatingPanel {
    let mut panel = FloatingPanel::new(BottomLayout, env()).unwrap();
    panel.show(false).unwrap();
    panel
}

#[test]
fn test_simultaneous_recognition() {
    let mut panel = shown_panel();
    assert!(!panel.should_recognize_simultaneously(GestureKind::PanelPan, CONTENT));
    assert!(panel.should_recognize_simultaneously(
        GestureKind::OtherPanelPan {
            contains_this_panel: false
        },
        CONTENT
    ));
    assert!(panel.should_recognize_simultaneously(GestureKind::TrackedScrollPan, CONTENT));
    assert!(panel.should_recognize_simultaneously(GestureKind::Continuous, GRABBER));
    assert!(!panel.should_recognize_simultaneously(GestureKind::Continuous, CONTENT));
    assert!(panel.should_recognize_simultaneously(GestureKind::Discrete, CONTENT));
}

#[test]
fn test_taps_are_exclusive_while_moving() {
    let mut panel = shown_panel();
    panel.handle_pan(PanGesture::began(GRABBER));
    panel.handle_pan(PanGesture::changed(Vector::new(0.0, 1.0), Vector::ZERO, GRABBER));
    panel.handle_pan(PanGesture::changed(Vector::new(0.0, 41.0), Vector::ZERO, GRABBER));
    assert!(!panel.should_recognize_simultaneously(GestureKind::Discrete, CONTENT));
}

#[test]
fn test_required_to_fail() {
    let mut panel = shown_panel();
    assert!(panel.should_be_required_to_fail_by(GestureKind::SheetDismiss, CONTENT));
    assert!(panel.should_be_required_to_fail_by(
        GestureKind::OtherPanelPan {
            contains_this_panel: true
        },
        CONTENT
    ));
    assert!(!panel.should_be_required_to_fail_by(
        GestureKind::OtherPanelPan {
            contains_this_panel: false
        },
        CONTENT
    ));
    assert!(panel.should_be_required_to_fail_by(GestureKind::Continuous, GRABBER));
    assert!(!panel.should_be_required_to_fail_by(GestureKind::Continuous, CONTENT));
}

#[test]
fn test_require_failure_without_scroll_view() {
    let mut panel = shown_panel();
    assert!(!panel.should_require_failure_of(GestureKind::PanelPan, CONTENT));
    assert!(panel.should_require_failure_of(
        GestureKind::OtherPanelPan {
            contains_this_panel: false
        },
        CONTENT
    ));
    assert!(!panel.should_require_failure_of(GestureKind::SheetDismiss, CONTENT));
    assert!(panel.should_require_failure_of(GestureKind::Continuous, CONTENT));
    assert!(!panel.should_require_failure_of(GestureKind::Continuous, GRABBER));
    assert!(panel.should_require_failure_of(GestureKind::TrackedScrollPan, CONTENT));
    assert!(!panel.should_require_failure_of(GestureKind::Discrete, CONTENT));
}

#[test]
fn test_require_failure_of_tracked_scroll_pan() {
    let mut panel = shown_panel();
    let scroll = MockScrollView::new(Rect::new(0.0, 36.0, 375.0, 600.0), Size::new(375.0, 2000.0));
    panel.track_scroll_view(scroll.boxed());

    // Not fully expanded: the panel always gets the pan
    scroll.scroll_to(Point::new(0.0, 50.0));
    assert!(!panel.should_require_failure_of(GestureKind::TrackedScrollPan, CONTENT));

    panel.move_to(PanelState::FULL, false).unwrap();
    scroll.scroll_to(Point::ZERO);
    assert!(!panel.should_require_failure_of(GestureKind::TrackedScrollPan, CONTENT));

    scroll.scroll_to(Point::new(0.0, 50.0));
    assert!(panel.should_require_failure_of(GestureKind::TrackedScrollPan, CONTENT));
    assert!(!panel.should_require_failure_of(GestureKind::TrackedScrollPan, GRABBER));

    // Bounced past the bounce threshold
    scroll.scroll_to(Point::new(0.0, -40.0));
    assert!(panel.should_require_failure_of(GestureKind::TrackedScrollPan, CONTENT));

    assert!(!panel.should_require_failure_of(GestureKind::TrackedScrollSecondary, CONTENT));
}

#[test]
fn test_interceptors_are_consulted_in_order() {
    let queries = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&queries);
    let mut panel = FloatingPanel::new(BottomLayout, env())
        .unwrap()
        .with_interceptor(move |query: ArbitrationQuery, other: GestureKind| {
            log.borrow_mut().push((query, other));
            Interception::PassThrough
        })
        .with_interceptor(|query: ArbitrationQuery, other: GestureKind| {
            if query == ArbitrationQuery::Simultaneous && other == GestureKind::PanelPan {
                Interception::Handled(true)
            } else {
                Interception::PassThrough
            }
        });
    panel.show(false).unwrap();

    assert!(panel.should_recognize_simultaneously(GestureKind::PanelPan, CONTENT));
    // Passed through to the panel's own rule
    assert!(panel.should_be_required_to_fail_by(GestureKind::SheetDismiss, CONTENT));
    assert_eq!(
        *queries.borrow(),
        vec![
            (ArbitrationQuery::Simultaneous, GestureKind::PanelPan),
            (ArbitrationQuery::RequiredToFailBy, GestureKind::SheetDismiss),
        ]
    );
}

#[test]
fn test_grabber_area_follows_position() {
    let bottom = shown_panel();
    assert_eq!(bottom.grabber_area().min_y(), 0.0);
    assert_eq!(bottom.grabber_area().size.height, 36.0);

    let top = FloatingPanel::new(TopLayout, env()).unwrap();
    let bounds = top.surface_bounds();
    assert_eq!(
        top.grabber_area(),
        Rect::new(0.0, bounds.max_y() - 36.0, bounds.size.width, 36.0)
    );
}
