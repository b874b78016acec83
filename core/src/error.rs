//! Error types for schema conversion.
//!
//! Conversion is atomic: any of these errors aborts the whole
//! conversion with no partial output. All are deterministic functions
//! of the input, so retrying without changing the input reproduces the
//! identical failure.

use thiserror::Error;

/// Errors that can occur during schema conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The structural type cannot be represented in the target schema
    /// (tuple or dynamic). Names the offending type kind.
    #[error("cannot convert unsupported type: {0}")]
    UnsupportedType(String),

    /// The nesting mode is outside the four known values. This is a
    /// contract violation between the introspection source and this
    /// converter, not a recoverable runtime condition.
    #[error("unhandled nesting mode: {0}")]
    UnhandledNestingMode(String),

    /// The schema version does not fit a signed 64-bit integer.
    #[error("schema version {0} overflows the representable range")]
    VersionOverflow(u64),

    /// Input nesting exceeds the hardening depth limit.
    #[error("schema nesting exceeds maximum depth of {0}")]
    NestingTooDeep(usize),
}

/// Convenience alias for results with [`ConvertError`].
pub type Result<T> = std::result::Result<T, ConvertError>;
