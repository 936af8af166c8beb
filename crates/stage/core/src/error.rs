//! Common error infrastructure for stage-core.
//!
//! Domain-specific errors (`OccupancyError`, `GroundError`, `TurnError`, ...)
//! live next to the structures whose invariants they report. This module only
//! holds the classification shared by all of them.
//!
//! # Design Principles
//!
//! - **Type Safety**: each index has its own error type with specific variants
//! - **Severity Classification**: errors are categorized for recovery strategies
//! - **Fail Fast**: invariant violations are returned to the caller, never absorbed

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: temporary conditions that may succeed with another request
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: index desync or caller bug; must be investigated
/// - **Fatal**: the stage cannot continue (e.g., a required oracle is missing)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative request.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: position outside the grid, item handle never deposited
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: occupancy desync, removing an entity from a cell it does not hold
    Internal,

    /// Fatal error - cannot continue.
    ///
    /// Examples: missing required oracle
    Fatal,
}

impl ErrorSeverity {
    /// Returns true if this error indicates a caller bug or corrupted index.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all stage-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait StageFault: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
