//! Spin and layout errors

use thiserror::Error;

/// Why a wheel operation was refused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpinError {
    /// Fewer than two entries on the wheel (no state change)
    #[error("need at least 2 entries to spin, have {count}")]
    InsufficientEntries { count: usize },

    /// A spin is already in flight (no state change)
    #[error("a spin is already in progress")]
    AlreadySpinning,

    /// Caller passed malformed numeric input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// `complete_spin` called while idle
    #[error("no spin in progress")]
    NoSpinInFlight,

    /// `complete_spin` called with a plan the engine did not issue for this spin
    #[error("plan {got} does not match in-flight spin {expected}")]
    PlanMismatch { expected: u64, got: u64 },
}

impl SpinError {
    /// Recoverable rejections a host should show or ignore, as opposed to
    /// caller contract violations
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            SpinError::InsufficientEntries { .. } | SpinError::AlreadySpinning
        )
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SpinError::InvalidArgument(msg.into())
    }
}
