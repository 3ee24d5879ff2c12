//! Error types for repeater_rows operations.
//!
//! The error surface is deliberately narrow. Traversal itself never fails:
//! an unknown field or record is an empty iteration and an unknown sub-field
//! name is `None`, because a caller of the original check-then-advance idiom
//! cannot distinguish "missing" from "empty" either. Only loading fixture
//! manifests from TOML can actually go wrong, and those failures are
//! propagated transparently.

use thiserror::Error;

/// Result type alias for repeater_rows operations.
pub type RepeaterResult<T> = Result<T, RepeaterError>;

/// The error type for repeater_rows operations.
#[derive(Error, Debug)]
pub enum RepeaterError {
    /// I/O failure while reading a fixture manifest from disk.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// A fixture manifest that is not valid TOML or does not match the
    /// expected document shape.
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
}
