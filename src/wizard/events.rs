//! Wizard events
//!
//! Events represent things that have happened (past tense).
//! They are broadcast to all subscribers of the controller's event bus.

use serde::Serialize;

use super::navigation::Navigation;
use crate::step::StepState;

/// Controller events
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WizardEvent {
    /// One or more step header titles changed
    TitlesChanged { titles: Vec<String> },

    /// The selected step changed
    SelectionChanged {
        old: Option<usize>,
        new: Option<usize>,
    },

    /// Back / Reset / Next availability changed
    ButtonsChanged { navigation: Navigation },

    /// A step reported a new state
    StepStateChanged {
        index: usize,
        old: StepState,
        new: StepState,
    },

    /// The selection moved forward because a step succeeded
    AutoAdvanced { from: usize, to: usize },

    /// Steps from `from_index` onwards were reset
    Reset { from_index: usize },

    /// The controller is shutting down
    Shutdown,
}

impl WizardEvent {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            WizardEvent::TitlesChanged { titles } => {
                format!("Titles changed ({} steps)", titles.len())
            }
            WizardEvent::SelectionChanged { new, .. } => match new {
                Some(index) => format!("Selected step {}", index + 1),
                None => "Selection cleared".to_string(),
            },
            WizardEvent::ButtonsChanged { navigation } => format!(
                "Buttons: back={} reset={} next={}",
                navigation.back_enabled, navigation.reset_enabled, navigation.next_enabled
            ),
            WizardEvent::StepStateChanged { index, new, .. } => {
                format!("Step {} is now {}", index + 1, new)
            }
            WizardEvent::AutoAdvanced { from, to } => {
                format!("Auto-advanced from step {} to step {}", from + 1, to + 1)
            }
            WizardEvent::Reset { from_index } => {
                format!("Reset from step {}", from_index + 1)
            }
            WizardEvent::Shutdown => "Shutting down".to_string(),
        }
    }
}
