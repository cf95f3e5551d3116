//! Error types for subkit
//!
//! This module defines the single error type shared by every subkit crate.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::client::EditConflict;
use crate::item::ItemKind;
use std::io;
use thiserror::Error;

/// Result type alias for subkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for subkit
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied argument (symbol, unit, filter kind, setting) is not recognised
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A predicate asked an item for an attribute it does not carry
    #[error("Attribute not found: {kind} has no attribute {attribute:?}")]
    AttributeNotFound {
        /// Variant of the item that was inspected
        kind: ItemKind,
        /// Requested attribute name
        attribute: String,
    },

    /// An attribute exists but cannot take part in the requested operation
    #[error("Type mismatch on {attribute:?}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Attribute being evaluated
        attribute: String,
        /// What the operation needed
        expected: &'static str,
        /// What the attribute held
        actual: &'static str,
    },

    /// Edit rejected because the page moved past the assumed revision
    #[error("Edit conflict: page is now at revision {}", .0.revision)]
    Conflict(EditConflict),

    /// Bounded update policy gave up
    #[error("Gave up after {attempts} conflicting edit attempts")]
    ConflictLimitExceeded {
        /// Number of submissions made, all of which conflicted
        attempts: usize,
    },

    /// Any other failure reported by the wrapped platform client
    #[error("Client error: {0}")]
    Client(String),

    /// Malformed payload from the platform client
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration file could not be parsed or holds invalid values
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error (configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Build an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Build an attribute-not-found error for an item variant
    pub fn attribute_not_found(kind: ItemKind, attribute: impl Into<String>) -> Self {
        Error::AttributeNotFound {
            kind,
            attribute: attribute.into(),
        }
    }

    /// Build a client error from any displayable failure
    pub fn client(message: impl std::fmt::Display) -> Self {
        Error::Client(message.to_string())
    }

    /// True when the error is a precondition conflict on an edit
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
