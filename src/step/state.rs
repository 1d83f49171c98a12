//! Step state definitions
//!
//! The lifecycle every wizard step reports to the controller.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// State of a single wizard step
///
/// Transitions are driven by the step itself. The controller only reacts to
/// whatever state is reported, in whatever order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum StepState {
    /// Not yet configured
    #[default]
    Init,

    /// Inputs accepted, not yet runnable
    Configured,

    /// Runnable, awaiting activation
    Ready,

    /// Currently executing
    Active,

    /// Completed correctly
    Success,

    /// Completed with an error
    Fail,

    /// A state value outside the modelled set, kept for display
    Other(String),
}

impl StepState {
    /// Numeric code of the state. Failure states are the only negative codes.
    pub fn code(&self) -> Option<i8> {
        match self {
            StepState::Init => Some(0),
            StepState::Configured => Some(1),
            StepState::Ready => Some(2),
            StepState::Active => Some(3),
            StepState::Success => Some(4),
            StepState::Fail => Some(-1),
            StepState::Other(_) => None,
        }
    }

    /// Check if this is a failure state
    pub fn is_failure(&self) -> bool {
        matches!(self, StepState::Fail)
    }

    /// Check if no further transitions are expected (other than a reset)
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepState::Success | StepState::Fail)
    }

    /// Check if the step is still in its initial state
    pub fn is_init(&self) -> bool {
        matches!(self, StepState::Init)
    }

    /// Check if the step is running or finished.
    ///
    /// Going back is not offered from these states.
    pub fn locks_back_navigation(&self) -> bool {
        matches!(self, StepState::Active | StepState::Success | StepState::Fail)
    }

    /// Upper-case display name
    pub fn name(&self) -> String {
        match self {
            StepState::Init => "INIT".to_string(),
            StepState::Configured => "CONFIGURED".to_string(),
            StepState::Ready => "READY".to_string(),
            StepState::Active => "ACTIVE".to_string(),
            StepState::Success => "SUCCESS".to_string(),
            StepState::Fail => "FAIL".to_string(),
            StepState::Other(raw) => raw.to_uppercase(),
        }
    }

    /// Parse a state name. Unknown names are kept as [`StepState::Other`].
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "INIT" => StepState::Init,
            "CONFIGURED" => StepState::Configured,
            "READY" => StepState::Ready,
            "ACTIVE" => StepState::Active,
            "SUCCESS" => StepState::Success,
            "FAIL" => StepState::Fail,
            _ => StepState::Other(name.to_string()),
        }
    }
}

impl std::fmt::Display for StepState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for StepState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for StepState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(StepState::from_name(&raw))
    }
}
