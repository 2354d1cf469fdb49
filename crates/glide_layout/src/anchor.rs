//! Layout anchors
//!
//! An anchor maps a panel state to a main-axis coordinate of the panel's
//! leading edge (the edge facing away from the position it is attached to).
//!
//! - [`FixedAnchor`]: an absolute or fractional inset from an edge of the host
//! - [`IntrinsicAnchor`]: shows the panel's natural content size
//! - [`AdaptiveAnchor`]: shows a distance computed from external content

use std::fmt;
use std::sync::Arc;

use glide_core::{BoundingGuide, PanelState, Position, Rect, ReferenceEdge, ReferenceGuide};
use rustc_hash::FxHashMap;

use crate::environment::LayoutEnvironment;

/// Inset of the synthetic hidden anchor, beyond the panel's own edge
pub const HIDDEN_INSET: f32 = -100.0;

/// A policy computing a main-axis coordinate for a state
pub trait LayoutAnchoring: fmt::Debug {
    /// Region the anchor is measured against
    fn reference_guide(&self) -> ReferenceGuide;

    /// Edge of the reference region the anchor is measured from
    fn reference_edge(&self, position: Position) -> ReferenceEdge;

    /// Whether resolving needs a fresh content measurement
    fn requires_content_measurement(&self) -> bool;

    /// Resolve to a coordinate in the host region
    fn resolve(&self, env: &LayoutEnvironment, position: Position) -> f32;
}

/// Place `visible` points of the panel inside the guide, measured from the
/// guide edge matching `position`.
fn place_from_position_edge(guide: Rect, position: Position, visible: f32) -> f32 {
    match position {
        Position::Top => guide.min_y() + visible,
        Position::Left => guide.min_x() + visible,
        Position::Bottom => guide.max_y() - visible,
        Position::Right => guide.max_x() - visible,
    }
}

/// An inset from one edge of the host region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAnchor {
    pub inset: f32,
    pub is_absolute: bool,
    pub edge: ReferenceEdge,
    pub reference_guide: ReferenceGuide,
}

impl FixedAnchor {
    /// An inset in points from `edge`
    pub fn absolute(inset: f32, edge: ReferenceEdge, reference_guide: ReferenceGuide) -> Self {
        Self {
            inset,
            is_absolute: true,
            edge,
            reference_guide,
        }
    }

    /// An inset as a fraction of the reference region's main-axis length
    pub fn fractional(inset: f32, edge: ReferenceEdge, reference_guide: ReferenceGuide) -> Self {
        Self {
            inset,
            is_absolute: false,
            edge,
            reference_guide,
        }
    }

    /// The off-screen anchor used for `hidden` when a layout does not declare it
    pub fn hidden(position: Position) -> Self {
        Self::absolute(
            HIDDEN_INSET,
            position.reference_edge(),
            ReferenceGuide::Superview,
        )
    }
}

impl LayoutAnchoring for FixedAnchor {
    fn reference_guide(&self) -> ReferenceGuide {
        self.reference_guide
    }

    fn reference_edge(&self, _position: Position) -> ReferenceEdge {
        self.edge
    }

    fn requires_content_measurement(&self) -> bool {
        false
    }

    fn resolve(&self, env: &LayoutEnvironment, position: Position) -> f32 {
        let reference = self.reference_guide.rect(env.bounds, env.safe_area);
        let diff = if self.is_absolute {
            self.inset
        } else {
            position.main_dimension(reference.size) * self.inset
        };
        match self.edge {
            ReferenceEdge::Top => reference.min_y() + diff,
            ReferenceEdge::Left => reference.min_x() + diff,
            ReferenceEdge::Bottom => reference.max_y() - diff,
            ReferenceEdge::Right => reference.max_x() - diff,
        }
    }
}

/// Shows the panel's natural content size, less an offset
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntrinsicAnchor {
    pub offset: f32,
    pub is_absolute: bool,
    pub reference_guide: ReferenceGuide,
}

impl IntrinsicAnchor {
    /// Hide `offset` points of the content
    pub fn absolute(offset: f32, reference_guide: ReferenceGuide) -> Self {
        Self {
            offset,
            is_absolute: true,
            reference_guide,
        }
    }

    /// Hide a fraction of the content
    pub fn fractional(offset: f32, reference_guide: ReferenceGuide) -> Self {
        Self {
            offset,
            is_absolute: false,
            reference_guide,
        }
    }

    /// Length of content left visible for a content length
    pub fn visible_length(&self, length: f32) -> f32 {
        if self.is_absolute {
            length - self.offset
        } else {
            length * (1.0 - self.offset)
        }
    }
}

impl LayoutAnchoring for IntrinsicAnchor {
    fn reference_guide(&self) -> ReferenceGuide {
        self.reference_guide
    }

    fn reference_edge(&self, position: Position) -> ReferenceEdge {
        position.reference_edge()
    }

    fn requires_content_measurement(&self) -> bool {
        true
    }

    fn resolve(&self, env: &LayoutEnvironment, position: Position) -> f32 {
        let guide = self.reference_guide.rect(env.bounds, env.safe_area);
        let length = position.main_dimension(env.intrinsic_size);
        place_from_position_edge(guide, position, self.visible_length(length))
    }
}

/// Distance function of an adaptive anchor
pub type DistanceFn = Arc<dyn Fn(f32) -> f32 + Send + Sync>;

/// Shows a distance derived from an external content measurement
///
/// The measured length is clamped to the bounding region before the distance
/// function is applied.
#[derive(Clone)]
pub struct AdaptiveAnchor {
    distance: DistanceFn,
    pub reference_guide: ReferenceGuide,
    pub bounding_guide: BoundingGuide,
}

impl AdaptiveAnchor {
    pub fn new(
        distance: impl Fn(f32) -> f32 + Send + Sync + 'static,
        reference_guide: ReferenceGuide,
        bounding_guide: BoundingGuide,
    ) -> Self {
        Self {
            distance: Arc::new(distance),
            reference_guide,
            bounding_guide,
        }
    }

    /// Show the content less `offset` points
    pub fn absolute(offset: f32, reference_guide: ReferenceGuide, bounding_guide: BoundingGuide) -> Self {
        Self::new(move |length| length - offset, reference_guide, bounding_guide)
    }

    /// Show the content less a fraction of it
    pub fn fractional(offset: f32, reference_guide: ReferenceGuide, bounding_guide: BoundingGuide) -> Self {
        Self::new(
            move |length| length * (1.0 - offset),
            reference_guide,
            bounding_guide,
        )
    }

    /// Content length clamped to the bounding region
    pub fn measured_length(&self, env: &LayoutEnvironment, position: Position) -> f32 {
        let length = position.main_dimension(env.content_size);
        match self.bounding_guide.rect(env.bounds, env.safe_area) {
            Some(bounding) => length.min(position.main_dimension(bounding.size)),
            None => length,
        }
    }
}

impl fmt::Debug for AdaptiveAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptiveAnchor")
            .field("reference_guide", &self.reference_guide)
            .field("bounding_guide", &self.bounding_guide)
            .finish_non_exhaustive()
    }
}

impl LayoutAnchoring for AdaptiveAnchor {
    fn reference_guide(&self) -> ReferenceGuide {
        self.reference_guide
    }

    fn reference_edge(&self, position: Position) -> ReferenceEdge {
        position.reference_edge()
    }

    fn requires_content_measurement(&self) -> bool {
        true
    }

    fn resolve(&self, env: &LayoutEnvironment, position: Position) -> f32 {
        let guide = self.reference_guide.rect(env.bounds, env.safe_area);
        let visible = (self.distance)(self.measured_length(env, position));
        place_from_position_edge(guide, position, visible)
    }
}

/// The anchors of a layout, keyed by state
#[derive(Clone, Debug, Default)]
pub struct AnchorSet {
    anchors: FxHashMap<PanelState, Arc<dyn LayoutAnchoring>>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, state: PanelState, anchor: impl LayoutAnchoring + 'static) -> Self {
        self.insert(state, anchor);
        self
    }

    /// Insert or replace the anchor of a state
    pub fn insert(&mut self, state: PanelState, anchor: impl LayoutAnchoring + 'static) {
        self.anchors.insert(state, Arc::new(anchor));
    }

    pub fn insert_shared(&mut self, state: PanelState, anchor: Arc<dyn LayoutAnchoring>) {
        self.anchors.insert(state, anchor);
    }

    pub fn remove(&mut self, state: &PanelState) -> Option<Arc<dyn LayoutAnchoring>> {
        self.anchors.remove(state)
    }

    pub fn get(&self, state: &PanelState) -> Option<&Arc<dyn LayoutAnchoring>> {
        self.anchors.get(state)
    }

    pub fn contains(&self, state: &PanelState) -> bool {
        self.anchors.contains_key(state)
    }

    /// Declared states, in no particular order
    pub fn states(&self) -> impl Iterator<Item = &PanelState> {
        self.anchors.keys()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}
