//! Floating panel interaction controller
//!
//! [`FloatingPanel`] consumes the panel's pan gesture and the tracked scroll
//! view's pan gesture, decides which of the two owns each delta, projects the
//! release velocity onto the anchors, and drives the attraction spring.
//!
//! The controller is single-threaded and purely event driven: the host calls
//! `handle_pan`, `handle_scroll_pan`, `touches_began`, `move_to` and delivers
//! frames with `tick`/`on_frame` (or lets the panel poll its [`TickSource`]).

use tracing::{debug, trace, warn, Span};

use glide_animation::{ExternalTicker, FrameTick, SpringAnimator, SpringConfig, SpringStep, TickSource};
use glide_core::{
    event_types, EventType, GestureKind, LayoutError, PanGesture, PanPhase, PanelState, Point,
    Position, Rect, Result, Vector,
};
use glide_layout::{
    spring_config, Behavior, DefaultBehavior, Layout, LayoutAdapter, SurfaceMetrics,
};

use crate::config::PanelConfig;
use crate::interceptor::{consult, ArbitrationQuery, GestureInterceptor};
use crate::observer::{NoopObserver, PanelObserver, PanelSnapshot};
use crate::phase::InteractionPhase;
use crate::scroll::{default_pinning_offset, ScrollTracker, TrackedScrollView};

/// Callback run once when a programmatic move finishes
pub type Completion = Box<dyn FnOnce()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MoveOrigin {
    /// Pulled toward the target of a release
    Attraction,
    /// Started by `move_to`
    Programmatic,
    /// Removal after a fling toward hidden
    Removal,
}

struct MoveAnimation {
    animator: SpringAnimator,
    target: PanelState,
    initial_value: f32,
    origin: MoveOrigin,
    completion: Option<Completion>,
}

/// Transient values of one drag gesture
#[derive(Clone, Copy, Debug, Default)]
struct DragContext {
    initial_surface_location: f32,
    initial_translation: Vector,
    initial_location: Point,
    initial_scroll_offset: Point,
    removal_vector: Vector,
    /// A touch-down was reported for the current gesture
    touch_down: bool,
    /// The current gesture was torn down by a programmatic move
    cancelled: bool,
}

/// A draggable panel snapping between the anchors of a layout
pub struct FloatingPanel {
    adapter: LayoutAdapter,
    behavior: Box<dyn Behavior>,
    /// Set by `with_behavior`; the config's behavior table is then ignored
    custom_behavior: bool,
    observer: Box<dyn PanelObserver>,
    ticker: Box<dyn TickSource>,
    scroll: Option<ScrollTracker>,
    interceptors: Vec<Box<dyn GestureInterceptor>>,
    config: PanelConfig,
    state: PanelState,
    phase: InteractionPhase,
    animation: Option<MoveAnimation>,
    backdrop_alpha: f32,
    drag: DragContext,
    span: Span,
}

impl FloatingPanel {
    /// Create a hidden panel
    ///
    /// Fails when the layout does not validate. Call [`show`](Self::show) to
    /// present it at the layout's initial state.
    pub fn new(
        layout: impl Layout + 'static,
        metrics: impl SurfaceMetrics + 'static,
    ) -> Result<Self> {
        Self::from_boxed(Box::new(layout), Box::new(metrics))
    }

    pub fn from_boxed(layout: Box<dyn Layout>, metrics: Box<dyn SurfaceMetrics>) -> Result<Self> {
        let adapter = LayoutAdapter::new(layout, metrics)?;
        let span = tracing::debug_span!("panel", position = ?adapter.position());
        Ok(Self {
            adapter,
            behavior: Box::new(DefaultBehavior),
            custom_behavior: false,
            observer: Box::new(NoopObserver),
            ticker: Box::new(ExternalTicker::default()),
            scroll: None,
            interceptors: Vec::new(),
            config: PanelConfig::default(),
            state: PanelState::HIDDEN,
            phase: InteractionPhase::Idle,
            animation: None,
            backdrop_alpha: 0.0,
            drag: DragContext::default(),
            span,
        })
    }

    /// Apply a configuration
    ///
    /// Its behavior table replaces the default behavior, but not one set with
    /// [`with_behavior`](Self::with_behavior), in either order.
    pub fn with_config(mut self, config: PanelConfig) -> Self {
        if !self.custom_behavior {
            self.behavior = Box::new(config.configured_behavior());
        }
        self.adapter
            .set_extends_to_hidden(config.removal_interaction_enabled);
        self.config = config;
        self
    }

    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Box::new(behavior);
        self.custom_behavior = true;
        self
    }

    pub fn with_observer(mut self, observer: impl PanelObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_ticker(mut self, ticker: impl TickSource + 'static) -> Self {
        self.ticker = Box::new(ticker);
        self
    }

    /// Add a gesture interceptor after the existing ones
    pub fn with_interceptor(mut self, interceptor: impl GestureInterceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> PanelState {
        self.state.clone()
    }

    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    /// Committed main-axis coordinate of the panel
    pub fn surface_location(&self) -> f32 {
        self.adapter.surface_location()
    }

    /// Coordinate of `state` on the pixel grid
    pub fn surface_location_for(&self, state: &PanelState) -> f32 {
        self.adapter.surface_location_for(state)
    }

    pub fn backdrop_alpha(&self) -> f32 {
        self.backdrop_alpha
    }

    pub fn is_interacting(&self) -> bool {
        self.phase.is_dragging()
    }

    pub fn is_attracting(&self) -> bool {
        self.phase.is_attracting()
    }

    /// Whether any move animation is running
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn layout_adapter(&self) -> &LayoutAdapter {
        &self.adapter
    }

    pub fn position(&self) -> Position {
        self.adapter.position()
    }

    /// The state a release without momentum would settle at
    pub fn nearby_state(&self) -> PanelState {
        self.target_state(self.adapter.surface_location(), 0.0)
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            state: self.state.clone(),
            surface_location: self.adapter.surface_location(),
            backdrop_alpha: self.backdrop_alpha,
            phase: self.phase,
        }
    }

    /// The panel surface in its own coordinates
    pub fn surface_bounds(&self) -> Rect {
        Rect::from_size(self.adapter.surface_size())
    }

    /// The strip along the panel's leading edge that always drags the panel
    pub fn grabber_area(&self) -> Rect {
        let bounds = self.surface_bounds();
        let length = self.config.grabber_area_length;
        match self.position() {
            Position::Top => Rect::new(
                bounds.min_x(),
                bounds.max_y() - length,
                bounds.size.width,
                length,
            ),
            Position::Left => Rect::new(
                bounds.max_x() - length,
                bounds.min_y(),
                length,
                bounds.size.height,
            ),
            Position::Bottom => Rect::new(bounds.min_x(), bounds.min_y(), bounds.size.width, length),
            Position::Right => Rect::new(bounds.min_x(), bounds.min_y(), length, bounds.size.height),
        }
    }

    /// Whether the tracked scroll view may scroll at `state`
    pub fn is_scrollable(&mut self, state: &PanelState) -> bool {
        let snapshot = self.snapshot();
        self.observer
            .should_allow_scroll(&snapshot, state)
            .unwrap_or_else(|| *state == self.adapter.most_expanded_state())
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Replace the layout
    ///
    /// On error the current layout stays active. A state the new layout does
    /// not declare falls back to its initial state.
    pub fn set_layout(&mut self, layout: impl Layout + 'static) -> Result<()> {
        let _span = self.span.clone().entered();
        self.adapter.set_layout(Box::new(layout))?;
        self.activate_layout();
        Ok(())
    }

    /// Re-resolve the anchors after the host measurements changed
    pub fn activate_layout(&mut self) {
        if self.phase.is_dragging() || self.animation.is_some() {
            return;
        }
        let state = if self.adapter.is_valid_state(&self.state) {
            self.state.clone()
        } else {
            self.adapter.initial_state()
        };
        self.adapter.activate_layout(&state);
        self.backdrop_alpha = self.adapter.backdrop_alpha(&state);
        self.set_state(state);
    }

    // =========================================================================
    // Tracked scroll view
    // =========================================================================

    /// Track a scroll view, returning the previously tracked one
    pub fn track_scroll_view(
        &mut self,
        view: Box<dyn TrackedScrollView>,
    ) -> Option<Box<dyn TrackedScrollView>> {
        let previous = self.untrack_scroll_view();
        self.drag.initial_scroll_offset = view.content_offset();
        self.scroll = Some(ScrollTracker::attach(view));
        previous
    }

    /// Stop tracking the scroll view, restoring the settings the panel changed
    pub fn untrack_scroll_view(&mut self) -> Option<Box<dyn TrackedScrollView>> {
        self.scroll.take().map(ScrollTracker::detach)
    }

    pub fn scroll_view(&self) -> Option<&dyn TrackedScrollView> {
        self.scroll.as_ref().map(|tracker| tracker.view())
    }

    fn lock_scroll_view(&mut self) {
        if let Some(tracker) = self.scroll.as_mut() {
            tracker.lock();
        }
    }

    fn unlock_scroll_view(&mut self) {
        if let Some(tracker) = self.scroll.as_mut() {
            tracker.unlock();
        }
    }

    fn stop_scrolling(&mut self, at: Point) {
        let position = self.position();
        if let Some(tracker) = self.scroll.as_mut() {
            tracker.stop_scrolling(at, position);
        }
    }

    fn content_offset_for_pinning(&mut self) -> Option<Point> {
        let snapshot = self.snapshot();
        let position = self.position();
        let tracker = self.scroll.as_ref()?;
        Some(
            self.observer
                .content_offset_for_pinning(&snapshot, tracker.view())
                .unwrap_or_else(|| default_pinning_offset(tracker.view(), position)),
        )
    }

    /// Main-axis distance of the content offset from its pinned offset
    fn scroll_offset_diff(&mut self) -> Option<f32> {
        let pinning = self.content_offset_for_pinning()?;
        let offset = self.scroll.as_ref()?.view().content_offset();
        Some(self.position().main_location(offset) - self.position().main_location(pinning))
    }

    fn allow_scroll_pan(&mut self) -> bool {
        if self.state != self.adapter.most_expanded_state() {
            return false;
        }
        let position = self.position();
        let offset = match position {
            Position::Top | Position::Left => {
                let Some(tracker) = self.scroll.as_ref() else {
                    return false;
                };
                let view = tracker.view();
                position.main_location(view.content_offset_max())
                    - position.main_location(view.content_offset())
            }
            Position::Bottom | Position::Right => match self.scroll_offset_diff() {
                Some(diff) => diff,
                None => return false,
            },
        };
        offset <= self.config.scroll_bounce_threshold || offset > 0.0
    }

    // =========================================================================
    // Programmatic moves
    // =========================================================================

    /// Present the panel at the layout's initial state
    pub fn show(&mut self, animated: bool) -> Result<()> {
        let initial = self.adapter.initial_state();
        self.move_to(initial, animated)
    }

    /// Move to `hidden`
    pub fn hide(&mut self, animated: bool) -> Result<()> {
        self.move_to(PanelState::HIDDEN, animated)
    }

    /// Move to a state
    ///
    /// A drag in progress is cancelled and a running animation stops where it
    /// is. An animated move changes the state when it finishes. Fails without
    /// side effects when the layout does not know `to`.
    pub fn move_to(&mut self, to: PanelState, animated: bool) -> Result<()> {
        self.move_to_with(to, animated, None)
    }

    /// Move to a state and run `completion` when the move finishes
    ///
    /// An interrupted animated move never runs its completion.
    pub fn move_to_with(
        &mut self,
        to: PanelState,
        animated: bool,
        completion: Option<Completion>,
    ) -> Result<()> {
        let _span = self.span.clone().entered();
        if !self.adapter.is_valid_state(&to) {
            warn!("can't move to '{}': not a state of the layout", to);
            return Err(LayoutError::InvalidState(to));
        }
        debug!("move from {} to {} animated={}", self.state, to, animated);

        if self.state != self.adapter.most_expanded_state() {
            self.lock_scroll_view();
        }
        self.tear_down_active_interaction();
        self.interrupt_animation(true);

        if animated {
            let config = if self.state.is_hidden() || to.is_hidden() {
                SpringConfig::snappy().with_display_scale(self.adapter.display_scale())
            } else {
                self.spring_config()
            };
            self.start_move(to, 0.0, config, MoveOrigin::Programmatic, completion);
        } else {
            self.adapter.activate_layout(&to);
            self.backdrop_alpha = self.adapter.backdrop_alpha(&to);
            self.set_state(to.clone());
            if self.is_scrollable(&to) {
                self.unlock_scroll_view();
            } else {
                self.lock_scroll_view();
            }
            self.notify_did_move();
            if let Some(completion) = completion {
                completion();
            }
        }
        Ok(())
    }

    fn spring_config(&self) -> SpringConfig {
        spring_config(self.behavior.as_ref(), self.adapter.display_scale())
    }

    /// Cancel a drag in progress so a programmatic move can take over
    fn tear_down_active_interaction(&mut self) {
        if !self.phase.is_dragging() {
            return;
        }
        debug!("tear down the active drag");
        let state = self.state.clone();
        self.adapter.end_interaction(&state);
        self.transition(event_types::DRAG_SETTLE);
        self.drag.cancelled = true;
        let snapshot = self.snapshot();
        self.observer.did_end_dragging(&snapshot, false);
    }

    // =========================================================================
    // Animation
    // =========================================================================

    fn start_move(
        &mut self,
        target: PanelState,
        velocity: f32,
        config: SpringConfig,
        origin: MoveOrigin,
        completion: Option<Completion>,
    ) {
        let (current, target_location) = self.adapter.set_up_attraction(&target);
        let mut animator = SpringAnimator::new(current, velocity, target_location, config);
        animator.start();
        trace!(
            "start move to {} from {} (velocity {}, zeta {})",
            target,
            current,
            velocity,
            animator.zeta()
        );
        self.animation = Some(MoveAnimation {
            animator,
            target: target.clone(),
            initial_value: current,
            origin,
            completion,
        });
        self.ticker.start();
    }

    /// Advance the running animation by `dt` seconds
    ///
    /// Returns whether an animation is still running afterwards.
    pub fn tick(&mut self, dt: f32) -> bool {
        let _span = self.span.clone().entered();
        let step = match self.animation.as_mut() {
            Some(animation) => animation.animator.step(dt),
            None => return false,
        };
        match step {
            SpringStep::Idle => {}
            SpringStep::Update(value) => self.apply_animation_value(value),
            SpringStep::Finished(value) => {
                self.apply_animation_value(value);
                self.finish_animation();
            }
        }
        self.animation.is_some()
    }

    /// Advance the running animation by one display frame
    pub fn on_frame(&mut self, frame: FrameTick) -> bool {
        self.tick(frame.duration())
    }

    /// Poll the tick source once and step with the frame it produces
    pub fn pump(&mut self) -> bool {
        match self.ticker.poll() {
            Some(frame) => self.on_frame(frame),
            None => self.animation.is_some(),
        }
    }

    fn apply_animation_value(&mut self, value: f32) {
        let Some(initial) = self.animation.as_ref().map(|a| a.initial_value) else {
            return;
        };
        self.adapter.set_surface_location(value);
        self.backdrop_alpha = self.adapter.backdrop_alpha_at(value, value - initial);
        self.notify_did_move();
    }

    fn finish_animation(&mut self) {
        let Some(animation) = self.animation.take() else {
            return;
        };
        self.ticker.stop();
        self.adapter.activate_layout(&animation.target);
        self.backdrop_alpha = self.adapter.backdrop_alpha(&animation.target);
        debug!("move to {} finished", animation.target);
        self.set_state(animation.target.clone());

        match animation.origin {
            MoveOrigin::Attraction => self.end_attraction(true),
            MoveOrigin::Programmatic => {
                let state = self.state.clone();
                if self.is_scrollable(&state)
                    && self.adapter.offset_from_most_expanded_anchor().abs() <= 1.0
                {
                    self.unlock_scroll_view();
                } else {
                    self.lock_scroll_view();
                }
            }
            MoveOrigin::Removal => {
                self.transition(event_types::REMOVE_END);
                let snapshot = self.snapshot();
                self.observer.did_remove(&snapshot);
            }
        }
        if let Some(completion) = animation.completion {
            completion();
        }
    }

    /// Stop a running animation where it is
    ///
    /// The state stays the one the move started from. Removal animations only
    /// stop for programmatic moves.
    fn interrupt_animation(&mut self, programmatic: bool) {
        let origin = match self.animation.as_ref() {
            Some(animation) if animation.animator.is_running() => animation.origin,
            _ => return,
        };
        if origin == MoveOrigin::Removal && !programmatic {
            return;
        }
        debug!("animation to {:?} interrupted", self.animation.as_ref().map(|a| &a.target));
        if let Some(mut animation) = self.animation.take() {
            animation.animator.stop(true);
        }
        self.ticker.stop();
        match origin {
            MoveOrigin::Attraction => self.end_attraction(false),
            MoveOrigin::Programmatic => {}
            MoveOrigin::Removal => self.transition(event_types::REMOVE_END),
        }
    }

    fn end_attraction(&mut self, finished: bool) {
        self.transition(if finished {
            event_types::ATTRACT_END
        } else {
            event_types::INTERRUPT
        });
        let snapshot = self.snapshot();
        self.observer.did_end_attracting(&snapshot);

        let state = self.state.clone();
        if finished
            && self.is_scrollable(&state)
            && self.adapter.offset_from_most_expanded_anchor().abs() <= 1.0
        {
            self.unlock_scroll_view();
        }
    }

    // =========================================================================
    // Panel pan gesture
    // =========================================================================

    /// A touch went down on the panel surface
    ///
    /// Touching a moving panel stops it: the gesture begins immediately.
    pub fn touches_began(&mut self, location: Point) {
        if self.phase.is_removing() {
            return;
        }
        self.drag.initial_location = location;
        self.drag.touch_down = true;
        if self.animation.is_some() {
            self.handle_pan(PanGesture::began(location));
        }
    }

    /// Handle a sample of the panel's pan gesture
    ///
    /// `location` is in surface coordinates, `translation` and `velocity` in
    /// host coordinates.
    pub fn handle_pan(&mut self, gesture: PanGesture) {
        let _span = self.span.clone().entered();
        let position = self.position();
        debug!(
            "panel gesture({}:{:?}) translation={} location={} velocity={}",
            self.state,
            gesture.phase,
            position.main_component(gesture.translation),
            position.main_location(gesture.location),
            position.main_component(gesture.velocity),
        );

        if self.phase.is_removing() {
            return;
        }
        if gesture.phase == PanPhase::Began {
            self.drag.cancelled = false;
            if !self.drag.touch_down {
                self.drag.initial_location = gesture.location;
            }
        } else if self.drag.cancelled {
            return;
        }

        if !self.phase.is_dragging() && !self.phase.is_attracting() {
            let snapshot = self.snapshot();
            if !self.observer.should_begin_dragging(&snapshot) {
                return;
            }
        }

        self.interrupt_animation(false);

        if gesture.phase == PanPhase::Began {
            self.panning_began(gesture.location);
            return;
        }

        let velocity = position.main_component(gesture.velocity);
        if self.should_scroll_view_handle_touch(gesture.location, velocity) {
            return;
        }

        match gesture.phase {
            PanPhase::Changed => {
                if !self.phase.is_dragging() {
                    self.start_interaction(gesture.translation, gesture.location);
                }
                self.panning_change(gesture.translation);
            }
            PanPhase::Ended | PanPhase::Cancelled | PanPhase::Failed => {
                if !self.phase.is_dragging() {
                    self.start_interaction(gesture.translation, gesture.location);
                    let diff = position.main_component(gesture.translation);
                    let behavior = &self.behavior;
                    self.adapter
                        .update_interactive_offset(diff, true, |edge| behavior.allows_rubber_banding(edge));
                }
                self.panning_end(gesture.velocity);
                self.drag.touch_down = false;
            }
            PanPhase::Possible | PanPhase::Began => {}
        }
    }

    fn panning_began(&mut self, location: Point) {
        debug!("panning began at {:?}", location);
        let Some(offset) = self.scroll.as_ref().map(|t| t.view().content_offset()) else {
            return;
        };
        if self.state == self.adapter.most_expanded_state() {
            if self.grabber_area().contains(location) {
                self.drag.initial_scroll_offset = offset;
            }
        } else {
            self.drag.initial_scroll_offset = offset;
        }
    }

    fn panning_change(&mut self, translation: Vector) {
        let position = self.position();
        let pre = self.adapter.surface_location();
        let diff = position.main_component(translation) - position.main_component(self.drag.initial_translation);
        let overflow = self.should_overflow(pre, pre + diff);

        let behavior = &self.behavior;
        self.adapter
            .update_interactive_offset(diff, overflow, |edge| behavior.allows_rubber_banding(edge));

        let current = self.adapter.surface_location();
        self.backdrop_alpha = self
            .adapter
            .backdrop_alpha_at(current, position.main_component(translation));

        if pre != current {
            self.notify_did_move();
        }
    }

    /// Whether the panel may rubber-band past its extreme anchors
    ///
    /// Not while the scroll view's own pan is dragging scrollable content
    /// toward the expanded side.
    fn should_overflow(&self, pre: f32, next: f32) -> bool {
        let position = self.position();
        if let Some(tracker) = self.scroll.as_ref() {
            let view = tracker.view();
            if view.pan_phase() == PanPhase::Changed {
                let toward_expanded = match position {
                    Position::Top | Position::Left => pre < next,
                    Position::Bottom | Position::Right => pre > next,
                };
                if pre > 0.0 && toward_expanded && view.is_scrollable_along(position) {
                    return false;
                }
            }
        }
        true
    }

    fn panning_end(&mut self, velocity: Vector) {
        let position = self.position();
        let main_velocity = position.main_component(velocity);
        debug!(
            "panning end: started at {} velocity={}",
            self.drag.initial_surface_location, main_velocity
        );

        // A presentation interrupted by this drag is still `hidden` but on screen
        let resting_hidden = self.state.is_hidden()
            && self.drag.initial_surface_location
                == self.adapter.surface_location_for(&PanelState::HIDDEN);
        if resting_hidden {
            debug!("already hidden");
            let state = self.state.clone();
            self.adapter.end_interaction(&state);
            self.transition(event_types::DRAG_SETTLE);
            return;
        }

        if self.is_below_most_expanded_anchor() {
            let offset = self.drag.initial_scroll_offset;
            self.stop_scrolling(offset);
        }

        let current = self.adapter.surface_location();
        let mut target = self.target_state(current, main_velocity);

        self.end_interaction(&target);

        if self.config.removal_interaction_enabled {
            let distance = (current - self.adapter.position_for(&PanelState::HIDDEN)).abs();
            self.drag.removal_vector = if distance != 0.0 {
                position.main_vector(main_velocity / distance)
            } else {
                Vector::ZERO
            };
            if self.should_remove(self.drag.removal_vector, current) {
                self.remove(main_velocity);
                return;
            }
        }

        let proposed = target.clone();
        let snapshot = self.snapshot();
        self.observer.will_end_dragging(&snapshot, velocity, &mut target);
        if !self.adapter.is_valid_state(&target) {
            warn!("ignoring target override '{}': not a state of the layout", target);
            target = proposed;
        }

        if self.adapter.position_for(&target) == current {
            self.end_without_attraction(target);
            return;
        }

        let snapshot = self.snapshot();
        self.observer.did_end_dragging(&snapshot, true);

        let most = self.adapter.most_expanded_state();
        let restore_scroll = if self.config.attraction_lock_scroll && target != most {
            self.scroll.as_mut().map(|tracker| {
                let view = tracker.view_mut();
                let enabled = view.is_scroll_enabled();
                view.set_scroll_enabled(false);
                enabled
            })
        } else {
            None
        };

        self.start_attraction(target, main_velocity);

        if let (Some(enabled), Some(tracker)) = (restore_scroll, self.scroll.as_mut()) {
            tracker.view_mut().set_scroll_enabled(enabled);
        }
    }

    /// Commit `state` right away, the panel already being at its anchor
    fn end_without_attraction(&mut self, state: PanelState) {
        self.transition(event_types::DRAG_SETTLE);
        let snapshot = self.snapshot();
        self.observer.did_end_dragging(&snapshot, false);

        self.adapter.activate_layout(&state);
        self.backdrop_alpha = self.adapter.backdrop_alpha(&state);
        self.set_state(state.clone());
        if self.is_scrollable(&state) {
            self.unlock_scroll_view();
        }
    }

    fn start_interaction(&mut self, translation: Vector, location: Point) {
        if self.phase.is_dragging() {
            return;
        }
        let position = self.position();
        debug!(
            "start interaction translation={} location={}",
            position.main_component(translation),
            position.main_location(location)
        );

        let mut offset = 0.0;
        self.drag.initial_surface_location = self.adapter.surface_location();

        let scroll_offset = self.scroll.as_ref().map(|t| t.view().content_offset());
        let at_most = self.state == self.adapter.most_expanded_state();
        if let (true, Some(scroll_offset)) = (at_most, scroll_offset) {
            self.drag.initial_scroll_offset = scroll_offset;
            if !self.grabber_area().contains(location) {
                let diff = self.scroll_offset_diff().unwrap_or(0.0);
                match position {
                    Position::Top | Position::Left => {
                        if diff > 0.0 {
                            offset = -diff;
                        }
                    }
                    Position::Bottom | Position::Right => {
                        if diff < 0.0 {
                            offset = -diff;
                        }
                    }
                }
            }
            trace!("initial scroll offset {:?}", self.drag.initial_scroll_offset);
        }

        self.drag.initial_translation = translation;

        let snapshot = self.snapshot();
        self.observer.will_begin_dragging(&snapshot);

        let state = self.state.clone();
        self.adapter.start_interaction(&state, offset);
        self.transition(event_types::DRAG_BEGIN);

        self.lock_scroll_view();
    }

    fn end_interaction(&mut self, target: &PanelState) {
        debug!("end interaction to {}", target);
        if !self.is_scrollable(target) {
            self.lock_scroll_view();
        }
        let state = self.state.clone();
        self.adapter.end_interaction(&state);
    }

    fn start_attraction(&mut self, target: PanelState, velocity: f32) {
        debug!("start attraction to {} velocity={}", target, velocity);
        self.transition(event_types::ATTRACT_BEGIN);
        let snapshot = self.snapshot();
        self.observer.will_begin_attracting(&snapshot, &target);
        let config = self.spring_config();
        self.start_move(target, velocity, config, MoveOrigin::Attraction, None);
    }

    // =========================================================================
    // Removal
    // =========================================================================

    fn should_remove(&mut self, velocity: Vector, current: f32) -> bool {
        let snapshot = self.snapshot();
        if let Some(result) = self.observer.should_remove_at(&snapshot, velocity) {
            return result;
        }
        let threshold = self.behavior.removal_interaction_velocity_threshold();
        let flung = match self.position() {
            Position::Top => velocity.dy <= -threshold,
            Position::Left => velocity.dx <= -threshold,
            Position::Bottom => velocity.dy >= threshold,
            Position::Right => velocity.dx >= threshold,
        };
        flung || self.removal_progress(current) >= self.behavior.removal_interaction_progress_threshold()
    }

    /// How far past the least expanded anchor toward hidden `current` is (0..=1)
    fn removal_progress(&self, current: f32) -> f32 {
        let least = self.adapter.least_expanded_state();
        if least.is_hidden() {
            return 0.0;
        }
        let from = self.adapter.position_for(&least);
        let hidden = self.adapter.position_for(&PanelState::HIDDEN);
        let span = hidden - from;
        if span == 0.0 {
            return 0.0;
        }
        ((current - from) / span).clamp(0.0, 1.0)
    }

    fn remove(&mut self, velocity: f32) {
        debug!("remove with vector {:?}", self.drag.removal_vector);
        self.transition(event_types::REMOVE_BEGIN);
        let snapshot = self.snapshot();
        self.observer.will_remove(&snapshot);
        let config = SpringConfig::snappy().with_display_scale(self.adapter.display_scale());
        self.start_move(PanelState::HIDDEN, velocity, config, MoveOrigin::Removal, None);
    }

    // =========================================================================
    // Target state
    // =========================================================================

    /// The state a release at `current` with main-axis `velocity` settles at
    pub fn target_state(&self, current: f32, velocity: f32) -> PanelState {
        let sorted = self.adapter.sorted_states_by_coordinate();
        let (first, last) = match (sorted.first(), sorted.last()) {
            (Some(first), Some(last)) if sorted.len() > 1 => (first.clone(), last.clone()),
            _ => return self.state.clone(),
        };
        let position_of = |state: &PanelState| self.adapter.position_for(state);

        // Projection
        let rate = self.behavior.momentum_projection_rate();
        let base = (position_of(&self.adapter.least_expanded_state())
            - position_of(&self.adapter.most_expanded_state()))
        .abs();
        let mut projected = if base > 0.0 {
            project(velocity / base, rate) * base + current
        } else {
            current
        };

        let distance = current - position_of(&self.state);
        let forward = if velocity == 0.0 { distance > 0.0 } else { velocity > 0.0 };

        let segment = self.adapter.segment(projected, forward);
        let lower = segment.lower.unwrap_or_else(|| first.clone());
        let upper = segment.upper.unwrap_or_else(|| last.clone());
        let (mut from, mut to) = if forward { (lower, upper) } else { (upper, lower) };

        if !self.behavior.should_project_momentum(&to) {
            trace!("negate projection: distance={}", distance);
            let segment = self.adapter.segment(current, forward);
            let mut lower = segment.lower.unwrap_or_else(|| first.clone());
            let mut upper = segment.upper.unwrap_or_else(|| last.clone());
            // Out of the extreme anchors, use the extreme segment
            if lower == upper {
                if forward {
                    upper = lower.next_in(&sorted);
                } else {
                    lower = lower.pre_in(&sorted);
                }
            }
            (from, to) = if forward { (lower, upper) } else { (upper, lower) };
            // Do not skip past the segment next to the current one
            projected = if forward {
                projected
                    .max(position_of(&from))
                    .min(position_of(&to.next_in(&sorted)))
            } else {
                projected
                    .min(position_of(&from))
                    .max(position_of(&to.pre_in(&sorted)))
            };
        }

        // Redirection
        let threshold = self.behavior.redirectional_progress(&from, &to).clamp(0.0, 1.0);
        let progress =
            (projected - position_of(&from)).abs() / (position_of(&from) - position_of(&to)).abs();
        if progress > threshold {
            to
        } else {
            from
        }
    }

    // =========================================================================
    // Scroll hand-off
    // =========================================================================

    fn is_below_most_expanded_anchor(&self) -> bool {
        0.0 > self.adapter.offset_from_most_expanded_anchor() + 1.0 / self.adapter.display_scale()
    }

    /// Whether the tracked scroll view keeps this touch instead of the panel
    fn should_scroll_view_handle_touch(&mut self, point: Point, velocity: f32) -> bool {
        let Some(tracker) = self.scroll.as_ref() else {
            return false;
        };
        let view = tracker.view();
        if view.is_secondary_gesture_active() {
            return true;
        }
        let frame = view.frame_in_surface();
        let decelerating = view.is_decelerating();
        let editing = view.is_editing();

        if self.state != self.adapter.most_expanded_state()
            || self.phase.is_dragging()
            || self.adapter.offset_from_most_expanded_anchor() != 0.0
        {
            return false;
        }

        let grabber = self.grabber_area();
        let initial = self.drag.initial_location;
        if grabber.contains(point) && !grabber.contains(initial) {
            return true;
        }
        if grabber.contains(initial) && !self.surface_bounds().contains(point) {
            return false;
        }
        if !frame.contains(initial) || grabber.contains(point) {
            return false;
        }

        let offset = self.scroll_offset_diff().unwrap_or(0.0);
        match self.position() {
            Position::Top | Position::Left => {
                if offset < 0.0 || velocity >= 0.0 {
                    return true;
                }
            }
            Position::Bottom | Position::Right => {
                if offset > 0.0 || velocity <= 0.0 {
                    return true;
                }
            }
        }

        decelerating || editing
    }

    /// Handle a sample of the tracked scroll view's own pan gesture
    ///
    /// `location` is in surface coordinates.
    pub fn handle_scroll_pan(&mut self, gesture: PanGesture) {
        let _span = self.span.clone().entered();
        if self.scroll.is_none() {
            return;
        }
        let position = self.position();
        let velocity = position.main_component(gesture.velocity);
        let location = gesture.location;
        let below_edge_most = self.is_below_most_expanded_anchor();
        let interacting = self.phase.is_dragging();
        let at_most = self.state == self.adapter.most_expanded_state();
        let offset_diff = self.scroll_offset_diff().unwrap_or(0.0);
        let initial_offset = self.drag.initial_scroll_offset;
        let grabber = self.grabber_area();

        debug!(
            "scroll gesture({}:{:?}) below_edge_most={} interacting={} offset_diff={} velocity={}",
            self.state, gesture.phase, below_edge_most, interacting, offset_diff, velocity
        );

        if below_edge_most {
            // Pin the content while the panel is not at its most expanded anchor
            if !at_most || interacting || grabber.contains(location) {
                self.stop_scrolling(initial_offset);
            }

            if interacting {
                self.lock_scroll_view();
            } else if at_most && !self.is_programmatic_move_running() {
                let unlock = match position {
                    Position::Top | Position::Left => offset_diff < 0.0 && velocity > 0.0,
                    Position::Bottom | Position::Right => offset_diff > 0.0 && velocity < 0.0,
                };
                if unlock {
                    self.unlock_scroll_view();
                }
            }
        } else if interacting {
            let at_edge = match position {
                Position::Top | Position::Left => offset_diff <= 0.0 && velocity >= 0.0,
                Position::Bottom | Position::Right => offset_diff >= 0.0 && velocity <= 0.0,
            };
            if at_edge {
                self.unlock_scroll_view();
                return;
            }
            if at_most && grabber.contains(location) && grabber.contains(self.drag.initial_location) {
                self.stop_scrolling(initial_offset);
            }
        } else if at_most {
            let allow = self.allow_scroll_pan();
            let (lock, unlock) = match position {
                Position::Top | Position::Left => (velocity < 0.0 && !allow, velocity > 0.0 && allow),
                Position::Bottom | Position::Right => (velocity > 0.0 && !allow, velocity < 0.0 && allow),
            };
            if lock {
                self.lock_scroll_view();
            }
            if unlock {
                self.unlock_scroll_view();
            }
            if grabber.contains(location) && grabber.contains(self.drag.initial_location) {
                self.stop_scrolling(initial_offset);
            }
        }
    }

    fn is_programmatic_move_running(&self) -> bool {
        self.animation
            .as_ref()
            .map(|animation| animation.origin == MoveOrigin::Programmatic)
            .unwrap_or(false)
    }

    // =========================================================================
    // Gesture arbitration
    // =========================================================================

    /// Whether the panel pan and `other` may be recognized together
    ///
    /// `location` is the panel pan's location in surface coordinates.
    pub fn should_recognize_simultaneously(&mut self, other: GestureKind, location: Point) -> bool {
        if let Some(result) = consult(&mut self.interceptors, ArbitrationQuery::Simultaneous, other) {
            return result;
        }
        match other {
            GestureKind::PanelPan => false,
            GestureKind::OtherPanelPan { .. } => true,
            GestureKind::TrackedScrollPan | GestureKind::TrackedScrollSecondary => true,
            GestureKind::Continuous | GestureKind::SheetDismiss => {
                self.grabber_area().contains(location)
            }
            GestureKind::Discrete => {
                let anchor = self.adapter.position_for(&self.state);
                (self.adapter.surface_location() - anchor).abs() < 1.0 / self.adapter.display_scale()
            }
        }
    }

    /// Whether `other` must wait for the panel pan to fail
    pub fn should_be_required_to_fail_by(&mut self, other: GestureKind, location: Point) -> bool {
        if let Some(result) = consult(&mut self.interceptors, ArbitrationQuery::RequiredToFailBy, other) {
            return result;
        }
        match other {
            GestureKind::OtherPanelPan {
                contains_this_panel: true,
            } => true,
            GestureKind::SheetDismiss => true,
            _ => self.grabber_area().contains(location),
        }
    }

    /// Whether the panel pan must wait for `other` to fail
    pub fn should_require_failure_of(&mut self, other: GestureKind, location: Point) -> bool {
        if let Some(result) = consult(&mut self.interceptors, ArbitrationQuery::RequireFailureOf, other) {
            return result;
        }
        let in_grabber = self.grabber_area().contains(location);
        match other {
            GestureKind::TrackedScrollPan if self.scroll.is_some() => {
                !in_grabber && self.allow_scroll_pan()
            }
            GestureKind::TrackedScrollSecondary => false,
            GestureKind::PanelPan => false,
            GestureKind::OtherPanelPan { contains_this_panel } => !contains_this_panel,
            GestureKind::SheetDismiss => false,
            GestureKind::Continuous | GestureKind::TrackedScrollPan => !in_grabber,
            GestureKind::Discrete => false,
        }
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    fn transition(&mut self, event: EventType) {
        if let Some(next) = self.phase.on_event(event) {
            debug!("phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }

    fn set_state(&mut self, state: PanelState) {
        if self.state == state {
            return;
        }
        debug!("state changed: {} -> {}", self.state, state);
        self.state = state;
        let snapshot = self.snapshot();
        self.observer.did_change_state(&snapshot);
    }

    fn notify_did_move(&mut self) {
        let snapshot = self.snapshot();
        self.observer.did_move(&snapshot);
    }
}

impl Drop for FloatingPanel {
    fn drop(&mut self) {
        if self.animation.is_some() {
            self.ticker.stop();
        }
    }
}

impl std::fmt::Debug for FloatingPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatingPanel")
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("surface_location", &self.adapter.surface_location())
            .field("animating", &self.animation.is_some())
            .field("scroll_tracked", &self.scroll.is_some())
            .finish_non_exhaustive()
    }
}

/// Distance travelled decelerating from `velocity` (points/s) to rest at a
/// constant per-millisecond `rate`
pub fn project(velocity: f32, rate: f32) -> f32 {
    (velocity / 1000.0) * rate / (1.0 - rate)
}
