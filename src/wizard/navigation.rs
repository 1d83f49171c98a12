//! Wizard navigation
//!
//! Back / Reset / Next availability as a pure function of the selection and
//! the step states.

use serde::Serialize;

use crate::step::StepState;

/// Navigation control shown in the wizard header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NavButton {
    Back,
    Reset,
    Next,
}

impl NavButton {
    /// All controls in header order
    pub const ALL: [NavButton; 3] = [NavButton::Back, NavButton::Reset, NavButton::Next];

    pub fn label(self) -> &'static str {
        match self {
            NavButton::Back => "Previous step",
            NavButton::Reset => "Reset",
            NavButton::Next => "Next step",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            NavButton::Back => "step-backward",
            NavButton::Reset => "undo",
            NavButton::Next => "step-forward",
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            NavButton::Back => "Go to the previous step.",
            NavButton::Reset => "Reset the app to start over (if possible)",
            NavButton::Next => "Go to the next step.",
        }
    }
}

/// Enablement of the navigation controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Navigation {
    pub back_enabled: bool,
    pub reset_enabled: bool,
    pub next_enabled: bool,
}

impl Navigation {
    /// Compute control availability.
    ///
    /// Everything is disabled while no step is selected.
    pub fn compute(selected: Option<usize>, states: &[StepState], can_reset: bool) -> Self {
        let Some(index) = selected else {
            return Self::default();
        };
        let Some(state) = states.get(index) else {
            return Self::default();
        };

        let first_step_selected = index == 0;
        let last_step_selected = index + 1 == states.len();

        Self {
            back_enabled: !first_step_selected && !state.locks_back_navigation(),
            reset_enabled: can_reset,
            next_enabled: !last_step_selected && *state == StepState::Success,
        }
    }

    pub fn is_enabled(&self, button: NavButton) -> bool {
        match button {
            NavButton::Back => self.back_enabled,
            NavButton::Reset => self.reset_enabled,
            NavButton::Next => self.next_enabled,
        }
    }
}

/// Outcome of clicking a navigation control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationResult {
    /// Selection moved to another step
    Moved { from: usize, to: usize },

    /// All steps were reset and the first step selected
    Reset,

    /// Control was disabled
    Blocked { reason: String },
}

impl NavigationResult {
    pub(crate) fn blocked(button: NavButton) -> Self {
        NavigationResult::Blocked {
            reason: format!("{} is not available", button.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states(list: &[StepState]) -> Vec<StepState> {
        list.to_vec()
    }

    #[test]
    fn test_nothing_selected_disables_everything() {
        let states = states(&[StepState::Success, StepState::Init]);
        let nav = Navigation::compute(None, &states, true);
        assert_eq!(nav, Navigation::default());
    }

    #[test]
    fn test_first_step_cannot_go_back() {
        let states = states(&[StepState::Ready, StepState::Init]);
        let nav = Navigation::compute(Some(0), &states, false);
        assert!(!nav.back_enabled);
        assert!(!nav.next_enabled);
    }

    #[test]
    fn test_next_requires_success() {
        let mut list = states(&[StepState::Success, StepState::Init, StepState::Init]);
        assert!(Navigation::compute(Some(0), &list, false).next_enabled);

        for state in [
            StepState::Init,
            StepState::Configured,
            StepState::Ready,
            StepState::Active,
            StepState::Fail,
            StepState::Other("success-ish".to_string()),
        ] {
            list[0] = state.clone();
            assert!(
                !Navigation::compute(Some(0), &list, false).next_enabled,
                "next should be disabled in {}",
                state
            );
        }
    }

    #[test]
    fn test_last_step_cannot_go_next() {
        let states = states(&[StepState::Success, StepState::Success]);
        let nav = Navigation::compute(Some(1), &states, false);
        assert!(!nav.next_enabled);
    }

    #[test]
    fn test_back_locked_while_running_or_finished() {
        let mut list = states(&[StepState::Success, StepState::Ready]);
        assert!(Navigation::compute(Some(1), &list, false).back_enabled);

        for state in [StepState::Active, StepState::Success, StepState::Fail] {
            list[1] = state;
            assert!(!Navigation::compute(Some(1), &list, false).back_enabled);
        }
    }

    #[test]
    fn test_reset_follows_flag() {
        let states = states(&[StepState::Init, StepState::Init]);
        assert!(Navigation::compute(Some(0), &states, true).reset_enabled);
        assert!(!Navigation::compute(Some(0), &states, false).reset_enabled);
    }

    #[test]
    fn test_out_of_range_selection_disables_everything() {
        let states = states(&[StepState::Success, StepState::Init]);
        assert_eq!(
            Navigation::compute(Some(5), &states, true),
            Navigation::default()
        );
    }

    #[test]
    fn test_button_metadata() {
        assert_eq!(NavButton::Back.label(), "Previous step");
        assert_eq!(NavButton::Reset.icon(), "undo");
        assert_eq!(NavButton::Next.tooltip(), "Go to the next step.");
        assert_eq!(NavButton::ALL.len(), 3);
    }

    #[test]
    fn test_is_enabled() {
        let nav = Navigation {
            back_enabled: true,
            reset_enabled: false,
            next_enabled: true,
        };
        assert!(nav.is_enabled(NavButton::Back));
        assert!(!nav.is_enabled(NavButton::Reset));
        assert!(nav.is_enabled(NavButton::Next));
    }
}
