//! Common error infrastructure for game-core.
//!
//! This module provides shared types and traits used across all error types in game-core.
//! The concrete combat error lives in [`crate::engine`] next to the pipeline that raises it.
//!
//! # Design Principles
//!
//! - **Stable kinds**: every error maps onto one [`ErrorKind`] that callers can match on
//! - **Severity Classification**: errors are categorized for recovery strategies
//! - **Reject before mutate**: semantic errors are raised during pre-validation only

/// Stable classification surfaced to collaborators.
///
/// The first four kinds are semantic (caller or data errors, never retried by the
/// engine). `Internal` covers unexpected failures such as an unavailable provider
/// and may be retried by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Session, hero, quest, or enemy identity does not exist.
    NotFound,
    /// Malformed input (empty party, unknown class, out-of-range dice or intensity).
    InvalidRequest,
    /// Action attempted outside its legal turn or status.
    InvalidState,
    /// Concurrent action on the same session, or rewards claimed twice.
    Conflict,
    /// Unexpected failure outside the semantic taxonomy.
    Internal,
}

impl ErrorKind {
    /// Returns true for failures the caller may retry unchanged.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: legal again once the session reaches the right turn or status
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same request can succeed later (e.g. waiting for the hero's turn).
    Recoverable,

    /// Invalid input or identity, should not retry without changes.
    Validation,

    /// Broken invariant. These indicate bugs and should be investigated.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all game-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Keep `error_code` values stable; they are logged and asserted in tests
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the stable kind reported to collaborators.
    fn kind(&self) -> ErrorKind;

    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::NotFound | ErrorKind::InvalidRequest => ErrorSeverity::Validation,
            ErrorKind::InvalidState | ErrorKind::Conflict => ErrorSeverity::Recoverable,
            ErrorKind::Internal => ErrorSeverity::Internal,
        }
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
