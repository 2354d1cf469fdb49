//! Panel positions and reference guides
//!
//! The [`Position`] of a panel is the host edge it is attached to. It decides
//! the panel's main axis: vertical for top/bottom, horizontal for left/right.

use crate::geometry::{EdgeInsets, Point, Rect, RectEdge, Size, Vector};

/// The host edge a panel is attached to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Position {
    Top,
    Left,
    #[default]
    Bottom,
    Right,
}

impl Position {
    /// Whether the main axis is vertical
    pub fn is_vertical(self) -> bool {
        matches!(self, Position::Top | Position::Bottom)
    }

    /// Main-axis component of a point
    pub fn main_location(self, point: Point) -> f32 {
        if self.is_vertical() {
            point.y
        } else {
            point.x
        }
    }

    /// Main-axis component of a vector
    pub fn main_component(self, vector: Vector) -> f32 {
        if self.is_vertical() {
            vector.dy
        } else {
            vector.dx
        }
    }

    /// Main-axis extent of a size
    pub fn main_dimension(self, size: Size) -> f32 {
        if self.is_vertical() {
            size.height
        } else {
            size.width
        }
    }

    /// Cross-axis extent of a size
    pub fn cross_dimension(self, size: Size) -> f32 {
        if self.is_vertical() {
            size.width
        } else {
            size.height
        }
    }

    /// Inset on the edge matching this position
    pub fn inset(self, insets: EdgeInsets) -> f32 {
        match self {
            Position::Top => insets.top,
            Position::Left => insets.left,
            Position::Bottom => insets.bottom,
            Position::Right => insets.right,
        }
    }

    /// Replace the main-axis component of a point
    pub fn with_main_location(self, point: Point, value: f32) -> Point {
        if self.is_vertical() {
            Point::new(point.x, value)
        } else {
            Point::new(value, point.y)
        }
    }

    /// Build a vector that only moves along the main axis
    pub fn main_vector(self, value: f32) -> Vector {
        if self.is_vertical() {
            Vector::new(0.0, value)
        } else {
            Vector::new(value, 0.0)
        }
    }

    /// Edge of the host region at the low end of the main axis
    pub fn leading_edge(self) -> RectEdge {
        if self.is_vertical() {
            RectEdge::Top
        } else {
            RectEdge::Left
        }
    }

    /// Edge of the host region at the high end of the main axis
    pub fn trailing_edge(self) -> RectEdge {
        if self.is_vertical() {
            RectEdge::Bottom
        } else {
            RectEdge::Right
        }
    }

    /// Whether the panel is attached to the low end of the main axis (top/left)
    pub fn is_leading(self) -> bool {
        matches!(self, Position::Top | Position::Left)
    }

    /// The reference edge a panel at this position measures its own anchors from
    pub fn reference_edge(self) -> ReferenceEdge {
        match self {
            Position::Top => ReferenceEdge::Top,
            Position::Left => ReferenceEdge::Left,
            Position::Bottom => ReferenceEdge::Bottom,
            Position::Right => ReferenceEdge::Right,
        }
    }
}

/// The edge an anchor inset is measured from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReferenceEdge {
    Top,
    Left,
    Bottom,
    Right,
}

impl ReferenceEdge {
    pub fn inset(self, insets: EdgeInsets) -> f32 {
        match self {
            ReferenceEdge::Top => insets.top,
            ReferenceEdge::Left => insets.left,
            ReferenceEdge::Bottom => insets.bottom,
            ReferenceEdge::Right => insets.right,
        }
    }

    pub fn main_dimension(self, size: Size) -> f32 {
        match self {
            ReferenceEdge::Top | ReferenceEdge::Bottom => size.height,
            ReferenceEdge::Left | ReferenceEdge::Right => size.width,
        }
    }
}

/// Region an anchor is measured against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReferenceGuide {
    #[default]
    Superview,
    SafeArea,
}

impl ReferenceGuide {
    /// Resolve the guide to a rectangle of the host region
    pub fn rect(self, bounds: Rect, safe_area: EdgeInsets) -> Rect {
        match self {
            ReferenceGuide::Superview => bounds,
            ReferenceGuide::SafeArea => bounds.inset_by(safe_area),
        }
    }
}

/// Region an adaptive anchor clamps its content measurement to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoundingGuide {
    #[default]
    None,
    Superview,
    SafeArea,
}

impl BoundingGuide {
    /// Rectangle the measurement is clamped to, if any
    pub fn rect(self, bounds: Rect, safe_area: EdgeInsets) -> Option<Rect> {
        match self {
            BoundingGuide::None => None,
            BoundingGuide::Superview => Some(bounds),
            BoundingGuide::SafeArea => Some(bounds.inset_by(safe_area)),
        }
    }
}
