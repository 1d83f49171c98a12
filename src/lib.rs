//! Step-state machine for multi-step wizard flows.
//!
//! An application hands [`WizardController`] an ordered list of titled
//! steps. The controller watches each step's state, renders step headers,
//! decides which navigation controls are available and moves on by itself
//! when an auto-advancing step succeeds.

pub mod config;
pub mod error;
pub mod logging;
pub mod step;
pub mod wizard;

pub use config::WizardConfig;
pub use error::{AppResult, ConfigError, WizardError};
pub use step::{BasicStep, Resettable, StateCell, StepState, WizardStep};
pub use wizard::{NavigationResult, WizardController, WizardEvent};
