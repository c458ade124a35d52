//! Core error types.

use thiserror::Error;

/// Registry errors.
///
/// Every failure aborts the single operation that produced it; the hierarchy
/// is never left partially mutated.
#[derive(Debug, Error)]
pub enum Error {
    /// Repository id is unknown, or the directory returned mismatching info.
    #[error("unknown repository: {0}")]
    RepositoryNotFound(String),

    /// Type id is unknown.
    #[error("unknown type id: {0}")]
    NotFound(String),

    /// Malformed input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A type with the same id (or query name) already exists.
    #[error("type already exists: {0}")]
    Conflict(String),

    /// Parent type is missing or cannot hold the candidate.
    #[error("invalid parent type {parent}: {reason}")]
    InvalidParent {
        /// Declared parent id (empty if none was declared).
        parent: String,
        /// Why the parent was rejected.
        reason: String,
    },

    /// Structural or property-level inconsistency.
    #[error("validation failed for {type_id}: {message}")]
    Validation {
        /// Type being validated.
        type_id: String,
        /// First violation found.
        message: String,
    },

    /// Type still has subtypes.
    #[error("type {0} has child types and cannot be removed")]
    HasChildren(String),

    /// Stored objects still reference the type.
    #[error("type definition {0} cannot be deleted, type is in use")]
    TypeInUse(String),

    /// The injected access policy rejected the call.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Error kind, for callers mapping errors onto their own codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    RepositoryNotFound,
    NotFound,
    InvalidArgument,
    Conflict,
    InvalidParent,
    Validation,
    HasChildren,
    TypeInUse,
    PermissionDenied,
    Config,
}

impl Error {
    /// Build a validation error.
    pub fn validation(type_id: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            type_id: type_id.into(),
            message: message.into(),
        }
    }

    /// Build an invalid-parent error.
    pub fn invalid_parent(parent: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidParent {
            parent: parent.into(),
            reason: reason.into(),
        }
    }

    /// The semantic kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RepositoryNotFound(_) => ErrorKind::RepositoryNotFound,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::Conflict(_) => ErrorKind::Conflict,
            Error::InvalidParent { .. } => ErrorKind::InvalidParent,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::HasChildren(_) => ErrorKind::HasChildren,
            Error::TypeInUse(_) => ErrorKind::TypeInUse,
            Error::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Error::Config(_) => ErrorKind::Config,
        }
    }
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, Error>;
