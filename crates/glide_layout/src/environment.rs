//! Host measurements
//!
//! Anchors resolve against the host region's bounds, safe-area insets and
//! content measurements. These are sampled from a [`SurfaceMetrics`]
//! provider every time a coordinate is resolved, never cached across frames.

use std::cell::RefCell;
use std::rc::Rc;

use glide_core::{EdgeInsets, Rect, Size};

/// A snapshot of host measurements
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutEnvironment {
    /// Bounds of the host region the panel moves in
    pub bounds: Rect,
    /// Safe-area insets of the host region
    pub safe_area: EdgeInsets,
    /// Natural size of the panel's content (intrinsic anchors)
    pub intrinsic_size: Size,
    /// Measured size of external content (adaptive anchors)
    pub content_size: Size,
    /// Physical pixels per point
    pub display_scale: f32,
}

impl LayoutEnvironment {
    pub fn new(bounds: Size) -> Self {
        Self {
            bounds: Rect::from_size(bounds),
            safe_area: EdgeInsets::ZERO,
            intrinsic_size: Size::ZERO,
            content_size: Size::ZERO,
            display_scale: 1.0,
        }
    }

    pub fn with_safe_area(mut self, safe_area: EdgeInsets) -> Self {
        self.safe_area = safe_area;
        self
    }

    pub fn with_intrinsic_size(mut self, size: Size) -> Self {
        self.intrinsic_size = size;
        self
    }

    pub fn with_content_size(mut self, size: Size) -> Self {
        self.content_size = size;
        self
    }

    pub fn with_display_scale(mut self, scale: f32) -> Self {
        self.display_scale = scale;
        self
    }
}

impl Default for LayoutEnvironment {
    fn default() -> Self {
        Self::new(Size::new(375.0, 667.0))
    }
}

/// Provider of host measurements
pub trait SurfaceMetrics {
    fn bounds(&self) -> Rect;

    fn safe_area(&self) -> EdgeInsets;

    fn intrinsic_size(&self) -> Size;

    fn content_size(&self) -> Size;

    fn display_scale(&self) -> f32;

    /// Sample every measurement at once
    fn sample(&self) -> LayoutEnvironment {
        LayoutEnvironment {
            bounds: self.bounds(),
            safe_area: self.safe_area(),
            intrinsic_size: self.intrinsic_size(),
            content_size: self.content_size(),
            display_scale: self.display_scale(),
        }
    }
}

impl SurfaceMetrics for LayoutEnvironment {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn safe_area(&self) -> EdgeInsets {
        self.safe_area
    }

    fn intrinsic_size(&self) -> Size {
        self.intrinsic_size
    }

    fn content_size(&self) -> Size {
        self.content_size
    }

    fn display_scale(&self) -> f32 {
        self.display_scale
    }
}

/// Measurements the host can update after handing them to a panel
///
/// Clones share one environment, e.g. to apply a rotation.
#[derive(Clone, Debug, Default)]
pub struct SharedMetrics {
    inner: Rc<RefCell<LayoutEnvironment>>,
}

impl SharedMetrics {
    pub fn new(env: LayoutEnvironment) -> Self {
        Self {
            inner: Rc::new(RefCell::new(env)),
        }
    }

    /// Replace the environment
    pub fn set(&self, env: LayoutEnvironment) {
        *self.inner.borrow_mut() = env;
    }

    /// Modify the environment in place
    pub fn update(&self, f: impl FnOnce(&mut LayoutEnvironment)) {
        f(&mut self.inner.borrow_mut());
    }

    pub fn get(&self) -> LayoutEnvironment {
        *self.inner.borrow()
    }
}

impl SurfaceMetrics for SharedMetrics {
    fn bounds(&self) -> Rect {
        self.inner.borrow().bounds
    }

    fn safe_area(&self) -> EdgeInsets {
        self.inner.borrow().safe_area
    }

    fn intrinsic_size(&self) -> Size {
        self.inner.borrow().intrinsic_size
    }

    fn content_size(&self) -> Size {
        self.inner.borrow().content_size
    }

    fn display_scale(&self) -> f32 {
        self.inner.borrow().display_scale
    }

    fn sample(&self) -> LayoutEnvironment {
        self.get()
    }
}
