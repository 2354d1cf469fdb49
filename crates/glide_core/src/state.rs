//! Panel display states
//!
//! A [`PanelState`] names a place the panel can rest at. States are ordered by
//! an integer key: the higher the order, the more expanded the panel is.
//! Hosts can define their own states next to the built-in ones.

use std::borrow::Cow;
use std::fmt;

/// A named, ordered display state of a panel
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelState {
    name: Cow<'static, str>,
    order: i32,
}

impl PanelState {
    /// Fully expanded state
    pub const FULL: PanelState = PanelState::from_static("full", 1000);
    /// Half expanded state
    pub const HALF: PanelState = PanelState::from_static("half", 500);
    /// Only the tip of the panel is visible
    pub const TIP: PanelState = PanelState::from_static("tip", 100);
    /// The panel is off-screen. Always valid, even when not declared by a layout.
    pub const HIDDEN: PanelState = PanelState::from_static("hidden", 0);

    /// Create a custom state
    pub fn new(name: impl Into<Cow<'static, str>>, order: i32) -> Self {
        Self {
            name: name.into(),
            order,
        }
    }

    /// Create a state from a static name (usable in const context)
    pub const fn from_static(name: &'static str, order: i32) -> Self {
        Self {
            name: Cow::Borrowed(name),
            order,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn is_hidden(&self) -> bool {
        *self == Self::HIDDEN
    }

    /// Look up a built-in state by name
    pub fn builtin(name: &str) -> Option<PanelState> {
        match name {
            "full" => Some(Self::FULL),
            "half" => Some(Self::HALF),
            "tip" => Some(Self::TIP),
            "hidden" => Some(Self::HIDDEN),
            _ => None,
        }
    }

    /// The state after this one in `states`, or this state at the end.
    ///
    /// Never wraps around.
    pub fn next_in(&self, states: &[PanelState]) -> PanelState {
        match states.iter().position(|s| s == self) {
            Some(index) if index + 1 < states.len() => states[index + 1].clone(),
            _ => self.clone(),
        }
    }

    /// The state before this one in `states`, or this state at the start.
    pub fn pre_in(&self, states: &[PanelState]) -> PanelState {
        match states.iter().position(|s| s == self) {
            Some(index) if index > 0 => states[index - 1].clone(),
            _ => self.clone(),
        }
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        assert!(PanelState::FULL.order() > PanelState::HALF.order());
        assert!(PanelState::HALF.order() > PanelState::TIP.order());
        assert!(PanelState::TIP.order() > PanelState::HIDDEN.order());
    }

    #[test]
    fn test_next_pre_do_not_wrap() {
        let states = [PanelState::FULL, PanelState::HIDDEN];
        assert_eq!(PanelState::FULL.next_in(&states), PanelState::HIDDEN);
        assert_eq!(PanelState::HIDDEN.pre_in(&states), PanelState::FULL);
        assert_eq!(PanelState::HIDDEN.next_in(&states), PanelState::HIDDEN);
        assert_eq!(PanelState::FULL.pre_in(&states), PanelState::FULL);
    }

    #[test]
    fn test_next_of_absent_state_is_itself() {
        let states = [PanelState::FULL, PanelState::HALF];
        assert_eq!(PanelState::TIP.next_in(&states), PanelState::TIP);
    }

    #[test]
    fn test_custom_state() {
        let peek = PanelState::new(String::from("peek"), 300);
        assert_eq!(peek.name(), "peek");
        assert_eq!(peek.to_string(), "peek");
        assert_ne!(peek, PanelState::HALF);
        assert_eq!(PanelState::builtin("tip"), Some(PanelState::TIP));
        assert_eq!(PanelState::builtin("peek"), None);
    }
}
