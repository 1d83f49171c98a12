//! Wizard steps
//!
//! A step is one unit of user-facing work. The controller never looks inside
//! a step; it only reads the step's state, its auto-advance flag and whether
//! the step can be reset.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wizard_app::step::{BasicStep, StepState, WizardStep};
//!
//! let step = BasicStep::new().with_auto_advance(true).resettable(true);
//! step.set_state(StepState::Active);
//! // ... do the work
//! step.set_state(StepState::Success);
//! ```

pub mod cell;
pub mod state;

pub use cell::{ListenerId, StateCell, StateChange, StateListener};
pub use state::StepState;

/// Optional capability: a step that can be torn down to start over
pub trait Resettable {
    /// Return the step to its initial state
    fn reset(&self);
}

/// One step of a wizard
pub trait WizardStep: Send + Sync {
    /// The observable state of this step
    fn state_cell(&self) -> &StateCell;

    /// Current state
    fn state(&self) -> StepState {
        self.state_cell().get()
    }

    /// Whether the wizard should move on by itself once this step succeeds
    fn auto_advance(&self) -> bool {
        false
    }

    /// Reset capability, if the step has one
    fn as_resettable(&self) -> Option<&dyn Resettable> {
        None
    }

    fn can_reset(&self) -> bool {
        self.as_resettable().is_some()
    }
}

/// Ready-made step for applications that drive state transitions themselves
#[derive(Debug, Default)]
pub struct BasicStep {
    cell: StateCell,
    auto_advance: bool,
    resettable: bool,
}

impl BasicStep {
    /// Create a step in the INIT state
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the auto-advance flag
    pub fn with_auto_advance(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }

    /// Enable or disable the reset capability
    pub fn resettable(mut self, resettable: bool) -> Self {
        self.resettable = resettable;
        self
    }

    /// Report a new state
    pub fn set_state(&self, state: StepState) {
        self.cell.set(state);
    }
}

impl Resettable for BasicStep {
    fn reset(&self) {
        self.cell.set(StepState::Init);
    }
}

impl WizardStep for BasicStep {
    fn state_cell(&self) -> &StateCell {
        &self.cell
    }

    fn auto_advance(&self) -> bool {
        self.auto_advance
    }

    fn as_resettable(&self) -> Option<&dyn Resettable> {
        if self.resettable {
            Some(self)
        } else {
            None
        }
    }
}
