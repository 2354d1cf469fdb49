//! Test doubles for hosts and integration tests
//!
//! [`MockScrollView`] and [`RecordingObserver`] are shared handles: clones see
//! the same state, so a test keeps one clone while the panel owns another.

use std::cell::RefCell;
use std::rc::Rc;

use glide_core::{EdgeInsets, PanPhase, PanelState, Point, Rect, Size, Vector};

use crate::observer::{PanelObserver, PanelSnapshot};
use crate::scroll::TrackedScrollView;

pub use glide_layout::SharedMetrics;

#[derive(Clone, Debug)]
struct ScrollState {
    content_offset: Point,
    content_size: Size,
    content_inset: EdgeInsets,
    frame: Rect,
    bounces: bool,
    shows_indicator: bool,
    directional_lock: bool,
    scroll_enabled: bool,
    decelerating: bool,
    editing: bool,
    always_bounces_vertical: bool,
    always_bounces_horizontal: bool,
    pan_phase: PanPhase,
    secondary_active: bool,
    offset_writes: usize,
}

/// An in-memory scroll view
#[derive(Clone, Debug)]
pub struct MockScrollView {
    state: Rc<RefCell<ScrollState>>,
}

impl MockScrollView {
    /// A scroll view filling `frame` with content of `content_size`
    pub fn new(frame: Rect, content_size: Size) -> Self {
        Self {
            state: Rc::new(RefCell::new(ScrollState {
                content_offset: Point::ZERO,
                content_size,
                content_inset: EdgeInsets::ZERO,
                frame,
                bounces: true,
                shows_indicator: true,
                directional_lock: false,
                scroll_enabled: true,
                decelerating: false,
                editing: false,
                always_bounces_vertical: false,
                always_bounces_horizontal: false,
                pan_phase: PanPhase::Possible,
                secondary_active: false,
                offset_writes: 0,
            })),
        }
    }

    pub fn boxed(&self) -> Box<dyn TrackedScrollView> {
        Box::new(self.clone())
    }

    /// Scroll to `offset` as the user would
    pub fn scroll_to(&self, offset: Point) {
        self.state.borrow_mut().content_offset = offset;
    }

    pub fn set_pan_phase(&self, phase: PanPhase) {
        self.state.borrow_mut().pan_phase = phase;
    }

    pub fn set_decelerating(&self, decelerating: bool) {
        self.state.borrow_mut().decelerating = decelerating;
    }

    pub fn set_editing(&self, editing: bool) {
        self.state.borrow_mut().editing = editing;
    }

    pub fn set_secondary_gesture_active(&self, active: bool) {
        self.state.borrow_mut().secondary_active = active;
    }

    pub fn set_content_inset(&self, inset: EdgeInsets) {
        self.state.borrow_mut().content_inset = inset;
    }

    /// How many times the panel pinned the offset
    pub fn offset_writes(&self) -> usize {
        self.state.borrow().offset_writes
    }
}

impl TrackedScrollView for MockScrollView {
    fn content_offset(&self) -> Point {
        self.state.borrow().content_offset
    }

    fn set_content_offset(&mut self, offset: Point) {
        let mut state = self.state.borrow_mut();
        state.content_offset = offset;
        state.decelerating = false;
        state.offset_writes += 1;
    }

    fn content_size(&self) -> Size {
        self.state.borrow().content_size
    }

    fn content_inset(&self) -> EdgeInsets {
        self.state.borrow().content_inset
    }

    fn bounds_size(&self) -> Size {
        self.state.borrow().frame.size
    }

    fn frame_in_surface(&self) -> Rect {
        self.state.borrow().frame
    }

    fn bounces(&self) -> bool {
        self.state.borrow().bounces
    }

    fn set_bounces(&mut self, bounces: bool) {
        self.state.borrow_mut().bounces = bounces;
    }

    fn shows_indicator(&self) -> bool {
        self.state.borrow().shows_indicator
    }

    fn set_shows_indicator(&mut self, shows: bool) {
        self.state.borrow_mut().shows_indicator = shows;
    }

    fn is_directional_lock_enabled(&self) -> bool {
        self.state.borrow().directional_lock
    }

    fn set_directional_lock_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().directional_lock = enabled;
    }

    fn is_scroll_enabled(&self) -> bool {
        self.state.borrow().scroll_enabled
    }

    fn set_scroll_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().scroll_enabled = enabled;
    }

    fn is_decelerating(&self) -> bool {
        self.state.borrow().decelerating
    }

    fn is_editing(&self) -> bool {
        self.state.borrow().editing
    }

    fn always_bounces_vertical(&self) -> bool {
        self.state.borrow().always_bounces_vertical
    }

    fn always_bounces_horizontal(&self) -> bool {
        self.state.borrow().always_bounces_horizontal
    }

    fn pan_phase(&self) -> PanPhase {
        self.state.borrow().pan_phase
    }

    fn is_secondary_gesture_active(&self) -> bool {
        self.state.borrow().secondary_active
    }
}

/// A notification received by a [`RecordingObserver`]
#[derive(Clone, Debug, PartialEq)]
pub enum PanelEvent {
    DidChangeState(PanelState),
    DidMove(f32),
    WillBeginDragging(PanelState),
    WillEndDragging { velocity: Vector, target: PanelState },
    DidEndDragging { will_attract: bool },
    WillBeginAttracting(PanelState),
    DidEndAttracting(PanelState),
    WillRemove,
    DidRemove,
}

#[derive(Debug, Default)]
struct Recording {
    events: Vec<PanelEvent>,
    allow_drag: Option<bool>,
    remove: Option<bool>,
    target_override: Option<PanelState>,
    allow_scroll: Option<Box<[PanelState]>>,
}

/// An observer recording every notification, with optional overrides
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PanelEvent> {
        self.inner.borrow().events.clone()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().events.clear();
    }

    /// Number of recorded events matching `f`
    pub fn count(&self, f: impl Fn(&PanelEvent) -> bool) -> usize {
        self.inner.borrow().events.iter().filter(|e| f(e)).count()
    }

    /// The recorded state changes, in order
    pub fn state_changes(&self) -> Vec<PanelState> {
        self.inner
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                PanelEvent::DidChangeState(state) => Some(state.clone()),
                _ => None,
            })
            .collect()
    }

    /// Veto (false) or allow (true) drags
    pub fn set_allow_drag(&self, allow: bool) {
        self.inner.borrow_mut().allow_drag = Some(allow);
    }

    /// Force the removal decision
    pub fn set_remove(&self, remove: Option<bool>) {
        self.inner.borrow_mut().remove = remove;
    }

    /// Replace the target of every release
    pub fn set_target_override(&self, target: Option<PanelState>) {
        self.inner.borrow_mut().target_override = target;
    }

    /// Allow scrolling at exactly these states
    pub fn set_scrollable_states(&self, states: &[PanelState]) {
        self.inner.borrow_mut().allow_scroll = Some(states.into());
    }

    fn push(&self, event: PanelEvent) {
        self.inner.borrow_mut().events.push(event);
    }
}

impl PanelObserver for RecordingObserver {
    fn did_change_state(&mut self, panel: &PanelSnapshot) {
        self.push(PanelEvent::DidChangeState(panel.state.clone()));
    }

    fn should_begin_dragging(&mut self, _panel: &PanelSnapshot) -> bool {
        self.inner.borrow().allow_drag.unwrap_or(true)
    }

    fn did_move(&mut self, panel: &PanelSnapshot) {
        self.push(PanelEvent::DidMove(panel.surface_location));
    }

    fn will_begin_dragging(&mut self, panel: &PanelSnapshot) {
        self.push(PanelEvent::WillBeginDragging(panel.state.clone()));
    }

    fn will_end_dragging(&mut self, _panel: &PanelSnapshot, velocity: Vector, target: &mut PanelState) {
        if let Some(state) = self.inner.borrow().target_override.clone() {
            *target = state;
        }
        self.push(PanelEvent::WillEndDragging {
            velocity,
            target: target.clone(),
        });
    }

    fn did_end_dragging(&mut self, _panel: &PanelSnapshot, will_attract: bool) {
        self.push(PanelEvent::DidEndDragging { will_attract });
    }

    fn will_begin_attracting(&mut self, _panel: &PanelSnapshot, to: &PanelState) {
        self.push(PanelEvent::WillBeginAttracting(to.clone()));
    }

    fn did_end_attracting(&mut self, panel: &PanelSnapshot) {
        self.push(PanelEvent::DidEndAttracting(panel.state.clone()));
    }

    fn should_remove_at(&mut self, _panel: &PanelSnapshot, _velocity: Vector) -> Option<bool> {
        self.inner.borrow().remove
    }

    fn will_remove(&mut self, _panel: &PanelSnapshot) {
        self.push(PanelEvent::WillRemove);
    }

    fn did_remove(&mut self, _panel: &PanelSnapshot) {
        self.push(PanelEvent::DidRemove);
    }

    fn should_allow_scroll(&mut self, _panel: &PanelSnapshot, state: &PanelState) -> Option<bool> {
        self.inner
            .borrow()
            .allow_scroll
            .as_ref()
            .map(|states| states.contains(state))
    }
}
