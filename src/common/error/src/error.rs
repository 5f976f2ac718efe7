//! Core error types for Halo.

use thiserror::Error;

/// Result type alias using `HaloError`.
pub type HaloResult<T> = std::result::Result<T, HaloError>;

/// Core error type for Halo operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HaloError {
    /// Caller passed an argument outside its contract (e.g. a negative border size).
    #[error("InvalidArgument: {0}")]
    InvalidArgument(String),

    /// A crop or placement fell outside the tile or canvas it addresses.
    #[error("BoundsError: {0}")]
    BoundsError(String),

    /// More than one slice arrived for the same key and direction.
    #[error("DuplicateContribution: {0}")]
    DuplicateContribution(String),

    /// Partition task or thread pool failure.
    #[error("ExecutionError: {0}")]
    ExecutionError(String),

    /// Malformed configuration.
    #[error("ConfigError: {0}")]
    ConfigError(String),

    /// Internal error (bug in Halo).
    #[error("InternalError: {0}")]
    InternalError(String),

    /// IO error.
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl HaloError {
    /// Create a new `InvalidArgument` error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a new `BoundsError`.
    pub fn bounds<S: Into<String>>(msg: S) -> Self {
        Self::BoundsError(msg.into())
    }

    /// Create a new `DuplicateContribution` error.
    pub fn duplicate<S: Into<String>>(msg: S) -> Self {
        Self::DuplicateContribution(msg.into())
    }

    /// Create a new `ExecutionError`.
    pub fn execution<S: Into<String>>(msg: S) -> Self {
        Self::ExecutionError(msg.into())
    }

    /// Create a new `ConfigError`.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a new `InternalError`.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::InternalError(msg.into())
    }

    /// Whether this error is a caller contract violation rather than a runtime failure.
    pub const fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::BoundsError(_) | Self::DuplicateContribution(_)
        )
    }
}

/// Ensure a condition holds, returning an `InvalidArgument` error if not.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $variant:ident: $($msg:tt)*) => {
        if !$cond {
            return Err($crate::HaloError::$variant(format!($($msg)*)));
        }
    };
    ($cond:expr, $msg:expr) => {
        if !$cond {
            return Err($crate::HaloError::InvalidArgument($msg.to_string()));
        }
    };
}

/// Return early with an `InvalidArgument` error.
#[macro_export]
macro_rules! invalid_arg_err {
    ($($arg:tt)*) => {
        return Err($crate::HaloError::InvalidArgument(format!($($arg)*)))
    };
}

/// Return early with a `BoundsError`.
#[macro_export]
macro_rules! bounds_err {
    ($($arg:tt)*) => {
        return Err($crate::HaloError::BoundsError(format!($($arg)*)))
    };
}
