//! Multi-step wizard controller
//!
//! Drives step headers and Back / Reset / Next availability from the states
//! reported by the wizard's steps.
//!
//! ## Architecture
//!
//! ```text
//! WizardController
//!   ├── steps (Arc<dyn WizardStep>, observed through their StateCell)
//!   ├── view (selected index, rendered titles, Navigation) behind one lock
//!   ├── Spinner (re-renders titles so running steps animate)
//!   └── EventBus (WizardEvent broadcast to front ends)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wizard_app::step::{BasicStep, StepState, WizardStep};
//! use wizard_app::wizard::WizardController;
//!
//! let select: Arc<dyn WizardStep> = Arc::new(BasicStep::new().with_auto_advance(true));
//! let submit: Arc<dyn WizardStep> = Arc::new(BasicStep::new());
//! let wizard = WizardController::new(vec![("Select", select.clone()), ("Submit", submit)])?;
//!
//! let (events, _subscription) = wizard.subscribe();
//! select.state_cell().set(StepState::Success);   // auto-advances to "Submit"
//!
//! for event in events.try_iter() {
//!     // redraw headers / buttons
//! }
//! ```

pub mod bus;
pub mod controller;
pub mod events;
pub mod icons;
pub mod navigation;
pub mod spinner;

// Re-export commonly used types
pub use bus::{EventBus, SubscriptionId};
pub use controller::{StepEntry, WizardController, WizardSnapshot};
pub use events::WizardEvent;
pub use navigation::{NavButton, Navigation, NavigationResult};
pub use spinner::Spinner;
