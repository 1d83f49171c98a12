use thiserror::Error;

/// Library errors using thiserror for structured error handling.
///
/// Construction and navigation failures are reported immediately; no partial
/// controller is ever returned.

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("A wizard needs at least two steps, got {count}")]
    TooFewSteps { count: usize },

    #[error("Step index {index} is out of range for a wizard with {len} steps")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to create config directory: {path}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine the platform config directory")]
    NoConfigDir,
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;
