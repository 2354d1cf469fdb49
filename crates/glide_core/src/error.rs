//! Layout error types

use thiserror::Error;

use crate::state::PanelState;

/// Layout configuration errors
///
/// These indicate a host programming error: a panel refuses to activate a
/// layout that fails validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The layout declares no anchors
    #[error("Layout has no anchors")]
    EmptyAnchors,

    /// The initial state is neither declared nor hidden
    #[error("Initial state '{0}' is not a valid state of the layout")]
    MissingInitialState(PanelState),

    /// An anchor resolved to NaN or infinity
    #[error("Anchor for '{state}' resolved to a non-finite coordinate: {value}")]
    NonFiniteAnchor { state: PanelState, value: f32 },

    /// Two declared states share one order key
    #[error("States '{a}' and '{b}' share the order {order}")]
    DuplicateOrder {
        a: PanelState,
        b: PanelState,
        order: i32,
    },

    /// A move was requested to a state the layout does not know
    #[error("State '{0}' is not valid in the layout")]
    InvalidState(PanelState),
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
