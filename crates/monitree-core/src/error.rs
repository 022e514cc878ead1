//! Shared error type across monitree crates.

use thiserror::Error;

/// Stable short codes for error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Name slot already taken, or a metric sits on the path.
    NameCollision,
    /// Dotted name with an empty segment.
    InvalidName,
    /// Malformed or out-of-range configuration.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Bootstrap / IO failure.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs and tests.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NameCollision => "NAME_COLLISION",
            ErrorKind::InvalidName => "INVALID_NAME",
            ErrorKind::BadConfig => "BAD_CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MonitreeError>;

/// Unified error type used by core and agent.
#[derive(Debug, Error)]
pub enum MonitreeError {
    #[error("name collision: {name}")]
    NameCollision { name: String },
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version: {0}")]
    UnsupportedVersion(u32),
    #[error("internal: {0}")]
    Internal(String),
}

impl MonitreeError {
    pub(crate) fn collision(name: &str) -> Self {
        MonitreeError::NameCollision { name: name.to_string() }
    }

    /// Map the error to its stable category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MonitreeError::NameCollision { .. } => ErrorKind::NameCollision,
            MonitreeError::InvalidName(_) => ErrorKind::InvalidName,
            MonitreeError::BadConfig(_) => ErrorKind::BadConfig,
            MonitreeError::UnsupportedVersion(_) => ErrorKind::UnsupportedVersion,
            MonitreeError::Internal(_) => ErrorKind::Internal,
        }
    }
}
