//! Panel layouts
//!
//! A [`Layout`] declares where a panel is attached, which states it can rest
//! at and where each of them is. Every method is required; hosts that only
//! want to tweak a stock layout wrap [`BottomLayout`] or build a
//! [`StaticLayout`].

use rustc_hash::FxHashMap;

use glide_core::{PanelState, Position, ReferenceEdge, ReferenceGuide};

use crate::anchor::{AnchorSet, FixedAnchor, LayoutAnchoring};

/// Backdrop alpha of a stock layout at its fully expanded state
pub const DEFAULT_BACKDROP_ALPHA: f32 = 0.3;

/// Describes the states of a panel and their anchors
pub trait Layout {
    /// The host edge the panel is attached to
    fn position(&self) -> Position;

    /// The state the panel shows when presented
    fn initial_state(&self) -> PanelState;

    /// Anchors of every declared state
    fn anchors(&self) -> AnchorSet;

    /// Opacity of the backdrop when resting at `state`
    fn backdrop_alpha(&self, state: &PanelState) -> f32;
}

/// A bottom sheet with full, half and tip states
#[derive(Clone, Copy, Debug, Default)]
pub struct BottomLayout;

impl Layout for BottomLayout {
    fn position(&self) -> Position {
        Position::Bottom
    }

    fn initial_state(&self) -> PanelState {
        PanelState::HALF
    }

    fn anchors(&self) -> AnchorSet {
        AnchorSet::new()
            .with(
                PanelState::FULL,
                FixedAnchor::absolute(18.0, ReferenceEdge::Top, ReferenceGuide::SafeArea),
            )
            .with(
                PanelState::HALF,
                FixedAnchor::fractional(0.5, ReferenceEdge::Bottom, ReferenceGuide::SafeArea),
            )
            .with(
                PanelState::TIP,
                FixedAnchor::absolute(69.0, ReferenceEdge::Bottom, ReferenceGuide::SafeArea),
            )
    }

    fn backdrop_alpha(&self, state: &PanelState) -> f32 {
        if *state == PanelState::FULL {
            DEFAULT_BACKDROP_ALPHA
        } else {
            0.0
        }
    }
}

/// A top sheet with full, half and tip states
#[derive(Clone, Copy, Debug, Default)]
pub struct TopLayout;

impl Layout for TopLayout {
    fn position(&self) -> Position {
        Position::Top
    }

    fn initial_state(&self) -> PanelState {
        PanelState::HALF
    }

    fn anchors(&self) -> AnchorSet {
        AnchorSet::new()
            .with(
                PanelState::FULL,
                FixedAnchor::absolute(18.0, ReferenceEdge::Bottom, ReferenceGuide::SafeArea),
            )
            .with(
                PanelState::HALF,
                FixedAnchor::fractional(0.5, ReferenceEdge::Top, ReferenceGuide::SafeArea),
            )
            .with(
                PanelState::TIP,
                FixedAnchor::absolute(69.0, ReferenceEdge::Top, ReferenceGuide::SafeArea),
            )
    }

    fn backdrop_alpha(&self, state: &PanelState) -> f32 {
        if *state == PanelState::FULL {
            DEFAULT_BACKDROP_ALPHA
        } else {
            0.0
        }
    }
}

/// A layout assembled from data
///
/// ```rust
/// use glide_core::{PanelState, Position, ReferenceEdge, ReferenceGuide};
/// use glide_layout::{FixedAnchor, Layout, StaticLayout};
///
/// let layout = StaticLayout::new(Position::Bottom, PanelState::TIP)
///     .anchor(PanelState::FULL, FixedAnchor::absolute(20.0, ReferenceEdge::Top, ReferenceGuide::Superview))
///     .anchor(PanelState::TIP, FixedAnchor::absolute(60.0, ReferenceEdge::Bottom, ReferenceGuide::Superview))
///     .backdrop(PanelState::FULL, 0.4);
/// assert_eq!(layout.backdrop_alpha(&PanelState::FULL), 0.4);
/// assert_eq!(layout.backdrop_alpha(&PanelState::TIP), 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct StaticLayout {
    position: Position,
    initial_state: PanelState,
    anchors: AnchorSet,
    backdrop: FxHashMap<PanelState, f32>,
}

impl StaticLayout {
    pub fn new(position: Position, initial_state: PanelState) -> Self {
        Self {
            position,
            initial_state,
            anchors: AnchorSet::new(),
            backdrop: FxHashMap::default(),
        }
    }

    /// Declare a state
    pub fn anchor(mut self, state: PanelState, anchor: impl LayoutAnchoring + 'static) -> Self {
        self.anchors.insert(state, anchor);
        self
    }

    /// Replace all anchors
    pub fn with_anchors(mut self, anchors: AnchorSet) -> Self {
        self.anchors = anchors;
        self
    }

    /// Backdrop alpha at a state (0 when unset)
    pub fn backdrop(mut self, state: PanelState, alpha: f32) -> Self {
        self.backdrop.insert(state, alpha);
        self
    }

    /// Snapshot an existing layout
    pub fn from_layout(layout: &dyn Layout) -> Self {
        let anchors = layout.anchors();
        let backdrop = anchors
            .states()
            .map(|state| (state.clone(), layout.backdrop_alpha(state)))
            .collect();
        Self {
            position: layout.position(),
            initial_state: layout.initial_state(),
            anchors,
            backdrop,
        }
    }
}

impl Layout for StaticLayout {
    fn position(&self) -> Position {
        self.position
    }

    fn initial_state(&self) -> PanelState {
        self.initial_state.clone()
    }

    fn anchors(&self) -> AnchorSet {
        self.anchors.clone()
    }

    fn backdrop_alpha(&self, state: &PanelState) -> f32 {
        self.backdrop.get(state).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_layout() {
        let layout = BottomLayout;
        assert_eq!(layout.position(), Position::Bottom);
        assert_eq!(layout.initial_state(), PanelState::HALF);
        assert_eq!(layout.anchors().len(), 3);
        assert_eq!(layout.backdrop_alpha(&PanelState::FULL), 0.3);
        assert_eq!(layout.backdrop_alpha(&PanelState::HALF), 0.0);
    }

    #[test]
    fn test_static_layout_from_layout() {
        let layout = StaticLayout::from_layout(&TopLayout);
        assert_eq!(layout.position(), Position::Top);
        assert_eq!(layout.anchors().len(), 3);
        assert_eq!(layout.backdrop_alpha(&PanelState::FULL), 0.3);
    }
}
