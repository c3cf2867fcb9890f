use thiserror::Error;

/// Unified error type for release-prep operations
///
/// Every variant is terminal for the current invocation - nothing is
/// retried automatically, and already-completed steps are not rolled back.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Invalid version format: {0}")]
    InvalidVersionFormat(String),

    #[error("Already at version {version}")]
    NoOpVersion { version: String },

    #[error("Version {version} of {crate_name} is already published. Please update the version and try again.")]
    AlreadyPublished { crate_name: String, version: String },

    #[error("Manifest field not found: {0}")]
    FieldNotFound(String),

    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),

    #[error("External command `{command}` failed: {detail}")]
    ExternalCommand { command: String, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in release-prep
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create an invalid-version error with context
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidVersionFormat(msg.into())
    }

    /// Create a no-op version error
    pub fn noop_version(version: impl Into<String>) -> Self {
        ReleaseError::NoOpVersion {
            version: version.into(),
        }
    }

    /// Create an already-published error
    pub fn already_published(crate_name: impl Into<String>, version: impl Into<String>) -> Self {
        ReleaseError::AlreadyPublished {
            crate_name: crate_name.into(),
            version: version.into(),
        }
    }

    /// Create a missing-field error
    pub fn field_not_found(msg: impl Into<String>) -> Self {
        ReleaseError::FieldNotFound(msg.into())
    }

    /// Create a registry error with context
    pub fn registry(msg: impl Into<String>) -> Self {
        ReleaseError::RegistryUnavailable(msg.into())
    }

    /// Create an external-command error with context
    pub fn command(command: impl Into<String>, detail: impl Into<String>) -> Self {
        ReleaseError::ExternalCommand {
            command: command.into(),
            detail: detail.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }
}
