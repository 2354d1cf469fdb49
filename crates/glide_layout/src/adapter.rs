//! Layout adapter
//!
//! Owns the active layout and the panel's committed main-axis coordinate.
//! Resolves states to coordinates against fresh host measurements, finds the
//! pair of anchors bracketing a coordinate, and applies interactive drag
//! offsets with clamping or rubber-banding at the travel extremes.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, error, trace, warn};

use glide_core::{round_to_pixel, LayoutError, PanelState, Position, RectEdge, Result, Size};

use crate::anchor::{AnchorSet, FixedAnchor, LayoutAnchoring};
use crate::environment::{LayoutEnvironment, SurfaceMetrics};
use crate::layout::Layout;

/// States of one layout; most layouts declare four or fewer
pub type StateList = SmallVec<[PanelState; 4]>;

/// Scroll views bounce with this resistance; so do panels
const RUBBER_BAND_COEFFICIENT: f32 = 0.55;

/// The pair of anchors bracketing a coordinate, in coordinate order
///
/// Either end is `None` past the extreme anchors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutSegment {
    pub lower: Option<PanelState>,
    pub upper: Option<PanelState>,
}

/// Compress `buffer` points of overflow into fewer points of travel
///
/// The result is always below `base` and approaches it as the buffer grows.
pub fn rubber_band(buffer: f32, base: f32) -> f32 {
    if base <= 0.0 {
        return 0.0;
    }
    (1.0 - (1.0 / ((buffer * RUBBER_BAND_COEFFICIENT / base) + 1.0))) * base
}

/// Resolves a [`Layout`] against host measurements
pub struct LayoutAdapter {
    layout: Box<dyn Layout>,
    metrics: Box<dyn SurfaceMetrics>,
    position: Position,
    initial_state: PanelState,
    anchors: AnchorSet,
    hidden_anchor: Arc<dyn LayoutAnchoring>,
    /// Committed coordinate of the panel's leading edge
    surface_location: f32,
    /// Coordinate an interactive drag started from
    initial_location: f32,
    interacting: bool,
    extend_to_hidden: bool,
}

impl LayoutAdapter {
    /// Wrap a layout, validating it first
    pub fn new(layout: Box<dyn Layout>, metrics: Box<dyn SurfaceMetrics>) -> Result<Self> {
        let position = layout.position();
        let mut adapter = Self {
            initial_state: layout.initial_state(),
            anchors: layout.anchors(),
            hidden_anchor: Arc::new(FixedAnchor::hidden(position)),
            layout,
            metrics,
            position,
            surface_location: 0.0,
            initial_location: 0.0,
            interacting: false,
            extend_to_hidden: false,
        };
        adapter.check_layout()?;
        adapter.surface_location = adapter.surface_location_for(&PanelState::HIDDEN);
        Ok(adapter)
    }

    /// Replace the layout, e.g. on rotation
    ///
    /// The new layout is validated before it replaces the current one; on
    /// error the current layout stays active.
    pub fn set_layout(&mut self, layout: Box<dyn Layout>) -> Result<()> {
        let previous = std::mem::replace(&mut self.layout, layout);
        let saved = (
            self.position,
            self.initial_state.clone(),
            std::mem::take(&mut self.anchors),
            Arc::clone(&self.hidden_anchor),
        );
        self.load_layout();
        if let Err(err) = self.check_layout() {
            self.layout = previous;
            self.position = saved.0;
            self.initial_state = saved.1;
            self.anchors = saved.2;
            self.hidden_anchor = saved.3;
            return Err(err);
        }
        Ok(())
    }

    fn load_layout(&mut self) {
        self.position = self.layout.position();
        self.initial_state = self.layout.initial_state();
        self.anchors = self.layout.anchors();
        self.hidden_anchor = Arc::new(FixedAnchor::hidden(self.position));
    }

    /// Re-read the anchors of the current layout
    pub fn reload_layout(&mut self) -> Result<()> {
        let saved = std::mem::take(&mut self.anchors);
        self.load_layout();
        if let Err(err) = self.check_layout() {
            self.anchors = saved;
            return Err(err);
        }
        Ok(())
    }

    pub fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn initial_state(&self) -> PanelState {
        self.initial_state.clone()
    }

    /// Sample the host measurements
    pub fn environment(&self) -> LayoutEnvironment {
        self.metrics.sample()
    }

    pub fn display_scale(&self) -> f32 {
        let scale = self.metrics.display_scale();
        if scale > 0.0 {
            scale
        } else {
            1.0
        }
    }

    /// Allow dragging all the way to the hidden anchor
    pub fn set_extends_to_hidden(&mut self, enabled: bool) {
        self.extend_to_hidden = enabled;
    }

    // =========================================================================
    // States
    // =========================================================================

    /// Declared states by ascending order key
    pub fn ordered_states(&self) -> StateList {
        let mut states: StateList = self.anchors.states().cloned().collect();
        states.sort_by_key(|s| s.order());
        states
    }

    /// Declared states plus `hidden`
    pub fn valid_states(&self) -> StateList {
        let mut states = self.ordered_states();
        if !self.anchors.contains(&PanelState::HIDDEN) {
            states.insert(0, PanelState::HIDDEN);
        }
        states
    }

    pub fn is_valid_state(&self, state: &PanelState) -> bool {
        state.is_hidden() || self.anchors.contains(state)
    }

    /// Declared states by ascending coordinate
    ///
    /// Top and left panels grow with the order key; bottom and right panels
    /// shrink with it.
    pub fn sorted_states_by_coordinate(&self) -> StateList {
        let mut states = self.ordered_states();
        if !self.position.is_leading() {
            states.reverse();
        }
        states
    }

    /// The most expanded state (the only one in a single-anchor layout)
    pub fn most_expanded_state(&self) -> PanelState {
        let states = self.ordered_states();
        states.last().cloned().unwrap_or(PanelState::HIDDEN)
    }

    /// The least expanded state (`hidden` in a single-anchor layout)
    pub fn least_expanded_state(&self) -> PanelState {
        let states = self.ordered_states();
        if states.len() == 1 {
            return PanelState::HIDDEN;
        }
        states.first().cloned().unwrap_or(PanelState::HIDDEN)
    }

    /// Whether the anchor of `state` depends on a content measurement
    pub fn is_intrinsic_anchor(&self, state: &PanelState) -> bool {
        self.anchors
            .get(state)
            .map(|anchor| anchor.requires_content_measurement())
            .unwrap_or(false)
    }

    fn anchor(&self, state: &PanelState) -> &Arc<dyn LayoutAnchoring> {
        self.anchors.get(state).unwrap_or(&self.hidden_anchor)
    }

    // =========================================================================
    // Coordinates
    // =========================================================================

    /// Resolve a state to a coordinate
    ///
    /// Undeclared states resolve with the off-screen hidden anchor.
    pub fn position_for(&self, state: &PanelState) -> f32 {
        let env = self.metrics.sample();
        self.anchor(state).resolve(&env, self.position)
    }

    /// Resolve a state to a coordinate on the physical pixel grid
    pub fn surface_location_for(&self, state: &PanelState) -> f32 {
        round_to_pixel(self.position_for(state), self.display_scale())
    }

    /// The committed coordinate of the panel
    pub fn surface_location(&self) -> f32 {
        self.surface_location
    }

    pub fn set_surface_location(&mut self, location: f32) {
        self.surface_location = location;
    }

    /// Distance from the most expanded anchor
    ///
    /// Negative while the panel is less expanded than its most expanded
    /// anchor, positive when dragged beyond it.
    pub fn offset_from_most_expanded_anchor(&self) -> f32 {
        let sorted = self.sorted_states_by_coordinate();
        match self.position {
            Position::Top | Position::Left => match sorted.last() {
                Some(state) => self.surface_location - self.position_for(state),
                None => 0.0,
            },
            Position::Bottom | Position::Right => match sorted.first() {
                Some(state) => self.position_for(state) - self.surface_location,
                None => 0.0,
            },
        }
    }

    /// Size of the panel surface
    ///
    /// The surface spans the host's cross axis and reaches from the most
    /// expanded anchor to the host edge the panel is attached to.
    pub fn surface_size(&self) -> Size {
        let bounds = self.metrics.bounds();
        let sorted = self.sorted_states_by_coordinate();
        let main = match self.position {
            Position::Top | Position::Left => sorted
                .last()
                .map(|state| self.position_for(state) - self.position.main_location(bounds.origin))
                .unwrap_or(0.0),
            Position::Bottom | Position::Right => sorted
                .first()
                .map(|state| {
                    let far_edge = if self.position.is_vertical() {
                        bounds.max_y()
                    } else {
                        bounds.max_x()
                    };
                    far_edge - self.position_for(state)
                })
                .unwrap_or(0.0),
        }
        .max(0.0);
        let cross = self.position.cross_dimension(bounds.size);
        if self.position.is_vertical() {
            Size::new(cross, main)
        } else {
            Size::new(main, cross)
        }
    }

    /// Travel bounds of an interactive drag
    fn travel_bounds(&self) -> (f32, f32) {
        let sorted = self.sorted_states_by_coordinate();
        let (mut min, mut max) = match (sorted.first(), sorted.last()) {
            (Some(first), Some(last)) => (self.position_for(first), self.position_for(last)),
            _ => (self.surface_location, self.surface_location),
        };
        if self.extend_to_hidden {
            let hidden = self.position_for(&PanelState::HIDDEN);
            min = min.min(hidden);
            max = max.max(hidden);
        }
        (min, max)
    }

    /// Find the anchors bracketing `pos` in the direction of travel
    ///
    /// Moving forward the upper bound is the first anchor strictly beyond
    /// `pos`; moving backward an anchor exactly at `pos` is the upper bound.
    pub fn segment(&self, pos: f32, forward: bool) -> LayoutSegment {
        let sorted = self.sorted_states_by_coordinate();
        let upper_index = sorted.iter().position(|state| {
            let anchor = self.position_for(state);
            if forward {
                pos < anchor
            } else {
                pos <= anchor
            }
        });

        match upper_index {
            Some(0) => LayoutSegment {
                lower: None,
                upper: sorted.first().cloned(),
            },
            Some(index) => LayoutSegment {
                lower: Some(sorted[index - 1].clone()),
                upper: Some(sorted[index].clone()),
            },
            None => LayoutSegment {
                lower: sorted.last().cloned(),
                upper: None,
            },
        }
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    /// Begin an interactive drag from the current coordinate
    ///
    /// `offset` shifts the starting point, used to fit the panel to a scroll
    /// offset overshooting its pinned edge. A drag already in progress is
    /// re-based on the current coordinate.
    pub fn start_interaction(&mut self, state: &PanelState, offset: f32) {
        if self.interacting {
            self.initial_location = self.surface_location;
            return;
        }
        trace!("start interaction at {} offset={}", state, offset);
        self.initial_location = self.surface_location + offset;
        self.surface_location = self.initial_location;
        self.interacting = true;
    }

    /// Finish an interactive drag
    ///
    /// The panel keeps its interactive coordinate until a layout or an
    /// attraction takes over.
    pub fn end_interaction(&mut self, state: &PanelState) {
        if !self.interacting {
            self.start_interaction(state, 0.0);
        }
    }

    /// Move the panel by `diff` from where the drag started
    ///
    /// The result stops at the extreme anchors except on the edges for which
    /// `allows_rubber_banding` returns true, where overflow is compressed to
    /// less than the panel's cross-axis extent. Without `overflow` every edge
    /// stops hard.
    pub fn update_interactive_offset(
        &mut self,
        diff: f32,
        overflow: bool,
        allows_rubber_banding: impl Fn(RectEdge) -> bool,
    ) {
        let (min, max) = self.travel_bounds();
        let mut location = self.initial_location + diff;

        let base = self.position.cross_dimension(self.metrics.bounds().size);
        if location < min {
            location = if overflow && allows_rubber_banding(self.position.leading_edge()) {
                min - rubber_band(min - location, base)
            } else {
                min
            };
        }
        if location > max {
            location = if overflow && allows_rubber_banding(self.position.trailing_edge()) {
                max + rubber_band(location - max, base)
            } else {
                max
            };
        }

        trace!("update surface location = {}", location);
        self.surface_location = location;
    }

    /// Hand the coordinate over to an attraction toward `state`
    ///
    /// Returns the current coordinate and the target coordinate.
    pub fn set_up_attraction(&mut self, state: &PanelState) -> (f32, f32) {
        self.interacting = false;
        (self.surface_location, self.position_for(state))
    }

    /// Rest the panel at `state` (falling back to the initial state when the
    /// layout does not know it)
    pub fn activate_layout(&mut self, state: &PanelState) {
        self.interacting = false;
        let state = if self.is_valid_state(state) {
            state.clone()
        } else {
            self.initial_state.clone()
        };
        self.surface_location = self.surface_location_for(&state);
        debug!("activate layout for {} at {}", state, self.surface_location);
    }

    // =========================================================================
    // Backdrop
    // =========================================================================

    pub fn backdrop_alpha(&self, state: &PanelState) -> f32 {
        if state.is_hidden() {
            0.0
        } else {
            self.layout.backdrop_alpha(state)
        }
    }

    /// Interpolate the backdrop alpha between the anchors bracketing `current`
    pub fn backdrop_alpha_at(&self, current: f32, translation: f32) -> f32 {
        let forward = translation >= 0.0;
        let segment = self.segment(current, forward);

        let lower = segment.lower.unwrap_or_else(|| self.most_expanded_state());
        let upper = segment.upper.unwrap_or_else(|| self.least_expanded_state());

        let (pre_state, next_state) = if forward {
            (lower, upper)
        } else {
            (upper, lower)
        };

        let next = self.surface_location_for(&next_state);
        let pre = self.surface_location_for(&pre_state);
        let next_alpha = self.backdrop_alpha(&next_state);
        let pre_alpha = self.backdrop_alpha(&pre_state);

        if pre == next {
            return pre_alpha;
        }
        let progress = (1.0 - (next - current) / (next - pre)).clamp(0.0, 1.0);
        pre_alpha + progress * (next_alpha - pre_alpha)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate the active anchors
    pub fn check_layout(&self) -> Result<()> {
        let result = self.validate();
        if let Err(ref err) = result {
            error!("invalid layout: {}", err);
        }
        result
    }

    fn validate(&self) -> Result<()> {
        if self.anchors.is_empty() {
            return Err(LayoutError::EmptyAnchors);
        }
        if !self.is_valid_state(&self.initial_state) {
            return Err(LayoutError::MissingInitialState(self.initial_state.clone()));
        }

        let ordered = self.ordered_states();
        for pair in ordered.windows(2) {
            if pair[0].order() == pair[1].order() {
                return Err(LayoutError::DuplicateOrder {
                    a: pair[0].clone(),
                    b: pair[1].clone(),
                    order: pair[0].order(),
                });
            }
        }

        let env = self.metrics.sample();
        let mut resolved: SmallVec<[(PanelState, f32); 4]> = SmallVec::new();
        for state in &ordered {
            let value = self.anchor(state).resolve(&env, self.position);
            if !value.is_finite() {
                return Err(LayoutError::NonFiniteAnchor {
                    state: state.clone(),
                    value,
                });
            }
            resolved.push((state.clone(), value));
        }

        let sorted = self.sorted_states_by_coordinate();
        resolved.sort_by(|a, b| a.1.total_cmp(&b.1));
        if resolved.iter().map(|(s, _)| s).ne(sorted.iter()) {
            warn!(
                "anchor coordinates {:?} disagree with the state order {:?}",
                resolved.iter().map(|(s, _)| s.name()).collect::<Vec<_>>(),
                sorted.iter().map(|s| s.name()).collect::<Vec<_>>(),
            );
        }
        Ok(())
    }
}

impl std::fmt::Debug for LayoutAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutAdapter")
            .field("position", &self.position)
            .field("initial_state", &self.initial_state)
            .field("anchors", &self.anchors)
            .field("surface_location", &self.surface_location)
            .field("interacting", &self.interacting)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::IntrinsicAnchor;
    use crate::layout::{BottomLayout, StaticLayout};
    use glide_core::{ReferenceEdge, ReferenceGuide};

    fn bottom_layout() -> StaticLayout {
        StaticLayout::new(Position::Bottom, PanelState::HALF)
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
            )
    }

    fn adapter(layout: StaticLayout) -> LayoutAdapter {
        LayoutAdapter::new(
            Box::new(layout),
            Box::new(LayoutEnvironment::new(Size::new(375.0, 667.0))),
        )
        .unwrap()
    }

    #[test]
    fn test_positions() {
        let adapter = adapter(bottom_layout());
        assert_eq!(adapter.position_for(&PanelState::FULL), 20.0);
        assert_eq!(adapter.position_for(&PanelState::HALF), 417.0);
        assert_eq!(adapter.position_for(&PanelState::TIP), 607.0);
        assert_eq!(adapter.position_for(&PanelState::HIDDEN), 767.0);
        assert_eq!(adapter.surface_location(), 767.0);
    }

    #[test]
    fn test_surface_size() {
        let adapter = adapter(bottom_layout());
        assert_eq!(adapter.surface_size(), Size::new(375.0, 647.0));
    }

    #[test]
    fn test_state_orders() {
        let adapter = adapter(bottom_layout());
        assert_eq!(
            adapter.ordered_states().as_slice(),
            &[PanelState::TIP, PanelState::HALF, PanelState::FULL]
        );
        assert_eq!(
            adapter.sorted_states_by_coordinate().as_slice(),
            &[PanelState::FULL, PanelState::HALF, PanelState::TIP]
        );
        assert_eq!(adapter.most_expanded_state(), PanelState::FULL);
        assert_eq!(adapter.least_expanded_state(), PanelState::TIP);
        assert_eq!(adapter.valid_states().len(), 4);
        assert!(adapter.is_valid_state(&PanelState::HIDDEN));
    }

    #[test]
    fn test_single_anchor_layout() {
        let layout = StaticLayout::new(Position::Bottom, PanelState::FULL).anchor(
            PanelState::FULL,
            FixedAnchor::absolute(20.0, ReferenceEdge::Top, ReferenceGuide::Superview),
        );
        let adapter = adapter(layout);
        assert_eq!(adapter.most_expanded_state(), PanelState::FULL);
        assert_eq!(adapter.least_expanded_state(), PanelState::HIDDEN);
    }

    #[test]
    fn test_segment_tie_break() {
        let adapter = adapter(bottom_layout());
        let at_half = adapter.segment(417.0, true);
        assert_eq!(at_half.lower, Some(PanelState::HALF));
        assert_eq!(at_half.upper, Some(PanelState::TIP));

        let at_half = adapter.segment(417.0, false);
        assert_eq!(at_half.lower, Some(PanelState::FULL));
        assert_eq!(at_half.upper, Some(PanelState::HALF));

        let above = adapter.segment(0.0, true);
        assert_eq!(above.lower, None);
        assert_eq!(above.upper, Some(PanelState::FULL));

        let below = adapter.segment(700.0, false);
        assert_eq!(below.lower, Some(PanelState::TIP));
        assert_eq!(below.upper, None);
    }

    #[test]
    fn test_segment_of_every_anchor() {
        let adapter = adapter(bottom_layout());
        for state in adapter.ordered_states() {
            let pos = adapter.position_for(&state);
            assert_eq!(adapter.segment(pos, true).lower, Some(state.clone()));
            assert_eq!(adapter.segment(pos, false).upper, Some(state.clone()));
        }
    }

    #[test]
    fn test_interactive_offset_clamps() {
        let mut adapter = adapter(bottom_layout());
        adapter.activate_layout(&PanelState::HALF);
        adapter.start_interaction(&PanelState::HALF, 0.0);
        adapter.update_interactive_offset(-1000.0, false, |_| false);
        assert_eq!(adapter.surface_location(), 20.0);
        adapter.update_interactive_offset(1000.0, false, |_| false);
        assert_eq!(adapter.surface_location(), 607.0);
        // Overflow alone does not pass an edge that does not rubber-band
        adapter.update_interactive_offset(1000.0, true, |_| false);
        assert_eq!(adapter.surface_location(), 607.0);
        adapter.update_interactive_offset(-1000.0, true, |_| false);
        assert_eq!(adapter.surface_location(), 20.0);
    }

    #[test]
    fn test_interactive_offset_rubber_bands() {
        let mut adapter = adapter(bottom_layout());
        adapter.activate_layout(&PanelState::FULL);
        adapter.start_interaction(&PanelState::FULL, 0.0);
        adapter.update_interactive_offset(-100.0, true, |edge| edge == RectEdge::Top);
        let location = adapter.surface_location();
        assert!(location < 20.0 && location > -80.0, "location {}", location);
        // Compressed against the 375 point width
        assert!((20.0 - location - rubber_band(100.0, 375.0)).abs() < 1e-3);

        adapter.update_interactive_offset(-100_000.0, true, |edge| edge == RectEdge::Top);
        assert!(adapter.surface_location() > 20.0 - 375.0);

        // Clamping wins over rubber-banding
        adapter.update_interactive_offset(-100.0, false, |edge| edge == RectEdge::Top);
        assert_eq!(adapter.surface_location(), 20.0);

        // The bottom edge does not rubber-band
        adapter.update_interactive_offset(1000.0, true, |edge| edge == RectEdge::Top);
        assert_eq!(adapter.surface_location(), 607.0);
    }

    #[test]
    fn test_extend_to_hidden() {
        let mut adapter = adapter(bottom_layout());
        adapter.set_extends_to_hidden(true);
        adapter.activate_layout(&PanelState::TIP);
        adapter.start_interaction(&PanelState::TIP, 0.0);
        adapter.update_interactive_offset(500.0, false, |_| false);
        assert_eq!(adapter.surface_location(), 767.0);
    }

    #[test]
    fn test_rubber_band_bound() {
        let base = 667.0;
        let mut previous = 0.0;
        for buffer in [0.0, 1.0, 10.0, 100.0, 1_000.0, 100_000.0] {
            let value = rubber_band(buffer, base);
            assert!(value < base);
            assert!(value >= previous);
            previous = value;
        }
        assert_eq!(rubber_band(0.0, base), 0.0);
        assert!(rubber_band(1.0e7, base) > base * 0.99);
    }

    #[test]
    fn test_offset_from_most_expanded_anchor() {
        let mut adapter = adapter(bottom_layout());
        adapter.activate_layout(&PanelState::FULL);
        assert_eq!(adapter.offset_from_most_expanded_anchor(), 0.0);
        adapter.activate_layout(&PanelState::HALF);
        assert_eq!(adapter.offset_from_most_expanded_anchor(), -397.0);
    }

    #[test]
    fn test_backdrop_alpha_interpolation() {
        let layout = bottom_layout().backdrop(PanelState::FULL, 0.4);
        let adapter = adapter(layout);
        assert_eq!(adapter.backdrop_alpha_at(20.0, -1.0), 0.4);
        assert_eq!(adapter.backdrop_alpha_at(417.0, 1.0), 0.0);
        let midway = adapter.backdrop_alpha_at(218.5, -1.0);
        assert!((midway - 0.2).abs() < 1e-4, "alpha {}", midway);
        assert_eq!(adapter.backdrop_alpha(&PanelState::HIDDEN), 0.0);
    }

    #[test]
    fn test_check_layout_errors() {
        let env = || Box::new(LayoutEnvironment::default());

        let empty = StaticLayout::new(Position::Bottom, PanelState::HALF);
        assert_eq!(
            LayoutAdapter::new(Box::new(empty), env()).unwrap_err(),
            LayoutError::EmptyAnchors
        );

        let missing = StaticLayout::new(Position::Bottom, PanelState::HALF).anchor(
            PanelState::FULL,
            FixedAnchor::absolute(20.0, ReferenceEdge::Top, ReferenceGuide::Superview),
        );
        assert_eq!(
            LayoutAdapter::new(Box::new(missing), env()).unwrap_err(),
            LayoutError::MissingInitialState(PanelState::HALF)
        );

        let nan = StaticLayout::new(Position::Bottom, PanelState::FULL).anchor(
            PanelState::FULL,
            FixedAnchor::absolute(f32::NAN, ReferenceEdge::Top, ReferenceGuide::Superview),
        );
        assert!(matches!(
            LayoutAdapter::new(Box::new(nan), env()).unwrap_err(),
            LayoutError::NonFiniteAnchor { .. }
        ));

        let duplicate = StaticLayout::new(Position::Bottom, PanelState::FULL)
            .anchor(
                PanelState::FULL,
                FixedAnchor::absolute(20.0, ReferenceEdge::Top, ReferenceGuide::Superview),
            )
            .anchor(
                PanelState::new("peek", 1000),
                FixedAnchor::absolute(40.0, ReferenceEdge::Top, ReferenceGuide::Superview),
            );
        assert!(matches!(
            LayoutAdapter::new(Box::new(duplicate), env()).unwrap_err(),
            LayoutError::DuplicateOrder { order: 1000, .. }
        ));
    }

    #[test]
    fn test_hidden_initial_state_is_valid() {
        let layout = StaticLayout::new(Position::Bottom, PanelState::HIDDEN).anchor(
            PanelState::FULL,
            FixedAnchor::absolute(20.0, ReferenceEdge::Top, ReferenceGuide::Superview),
        );
        assert!(LayoutAdapter::new(Box::new(layout), Box::new(LayoutEnvironment::default())).is_ok());
    }

    #[test]
    fn test_set_layout_keeps_previous_on_error() {
        let mut adapter = adapter(bottom_layout());
        let err = adapter
            .set_layout(Box::new(StaticLayout::new(Position::Top, PanelState::HALF)))
            .unwrap_err();
        assert_eq!(err, LayoutError::EmptyAnchors);
        assert_eq!(adapter.position(), Position::Bottom);
        assert_eq!(adapter.position_for(&PanelState::HALF), 417.0);

        adapter.set_layout(Box::new(BottomLayout)).unwrap();
        assert_eq!(adapter.ordered_states().len(), 3);
    }

    #[test]
    fn test_intrinsic_anchor_detection() {
        let layout = bottom_layout().anchor(
            PanelState::FULL,
            IntrinsicAnchor::absolute(0.0, ReferenceGuide::Superview),
        );
        let adapter = LayoutAdapter::new(
            Box::new(layout),
            Box::new(
                LayoutEnvironment::new(Size::new(375.0, 667.0))
                    .with_intrinsic_size(Size::new(375.0, 500.0)),
            ),
        )
        .unwrap();
        assert!(adapter.is_intrinsic_anchor(&PanelState::FULL));
        assert!(!adapter.is_intrinsic_anchor(&PanelState::HALF));
        assert_eq!(adapter.position_for(&PanelState::FULL), 167.0);
    }

    #[test]
    fn test_surface_location_rounds_to_pixels() {
        let layout = StaticLayout::new(Position::Bottom, PanelState::HALF).anchor(
            PanelState::HALF,
            FixedAnchor::fractional(0.3, ReferenceEdge::Bottom, ReferenceGuide::Superview),
        );
        let adapter = LayoutAdapter::new(
            Box::new(layout),
            Box::new(LayoutEnvironment::new(Size::new(375.0, 667.0)).with_display_scale(2.0)),
        )
        .unwrap();
        // 667 - 200.1
        assert!((adapter.position_for(&PanelState::HALF) - 466.9).abs() < 1e-3);
        assert_eq!(adapter.surface_location_for(&PanelState::HALF), 467.0);
    }
}
