//! Panel states and main-axis helpers
//!
//! Covers custom states ordered among the built-in ones and the main-axis
//! mapping of every position.

use glide_core::{
    EdgeInsets, PanelState, Point, Position, Rect, RectEdge, ReferenceGuide, Size, Vector,
};

#[test]
fn test_custom_state_sorts_between_builtins() {
    let peek = PanelState::new("peek", 300);
    let mut states = vec![PanelState::FULL, PanelState::TIP, peek.clone(), PanelState::HALF];
    states.sort_by_key(|s| s.order());

    assert_eq!(
        states,
        vec![PanelState::TIP, peek.clone(), PanelState::HALF, PanelState::FULL]
    );
    assert_eq!(peek.next_in(&states), PanelState::HALF);
    assert_eq!(peek.pre_in(&states), PanelState::TIP);
    assert_eq!(peek.to_string(), "peek");
    assert!(!peek.is_hidden());
}

#[test]
fn test_states_compare_by_name_and_order() {
    assert_eq!(PanelState::new("full", 1000), PanelState::FULL);
    assert_ne!(PanelState::new("full", 999), PanelState::FULL);
    assert_eq!(PanelState::builtin("hidden"), Some(PanelState::HIDDEN));
    assert_eq!(PanelState::builtin("peek"), None);
}

#[test]
fn test_main_axis_for_every_position() {
    let vector = Vector::new(3.0, -4.0);
    for (position, main, leading, trailing) in [
        (Position::Top, -4.0, RectEdge::Top, RectEdge::Bottom),
        (Position::Bottom, -4.0, RectEdge::Top, RectEdge::Bottom),
        (Position::Left, 3.0, RectEdge::Left, RectEdge::Right),
        (Position::Right, 3.0, RectEdge::Left, RectEdge::Right),
    ] {
        assert_eq!(position.main_component(vector), main, "{:?}", position);
        assert_eq!(position.leading_edge(), leading);
        assert_eq!(position.trailing_edge(), trailing);
        assert_eq!(position.main_component(position.main_vector(7.0)), 7.0);
    }
    assert!(Position::Top.is_leading());
    assert!(Position::Left.is_leading());
    assert!(!Position::Bottom.is_leading());
    assert!(!Position::Right.is_leading());
}

#[test]
fn test_guides_resolve_against_safe_area() {
    let bounds = Rect::from_size(Size::new(375.0, 667.0));
    let safe_area = EdgeInsets::new(44.0, 0.0, 34.0, 0.0);

    assert_eq!(ReferenceGuide::Superview.rect(bounds, safe_area), bounds);
    let safe = ReferenceGuide::SafeArea.rect(bounds, safe_area);
    assert_eq!(safe, Rect::new(0.0, 44.0, 375.0, 589.0));
    assert!(safe.contains(Point::new(0.0, 44.0)));
    assert!(!safe.contains(Point::new(0.0, 633.0)));
}
