use std::fmt;
use std::io;

/// Operation attempted against a field, used when reporting a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Unified error type for store operations.
///
/// The first four variants are the failures a path operation can produce.
/// They are terminal: the engine never retries, and they propagate straight
/// to the caller of `read`/`write`. The remaining variants cover the
/// configuration and schema-loading surface.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The effective permission of `key` forbids the attempted operation
    #[error("Permission denied: cannot {operation} '{key}'")]
    PermissionDenied { operation: AccessKind, key: String },

    /// Traversal reached an undefined or null node before the path ended
    #[error("Path not found: segment '{0}'")]
    PathNotFound(String),

    /// A write tried to create a nested key beneath a non-object value
    #[error("Type mismatch: '{key}' holds {found}, expected an object")]
    TypeMismatch { key: String, found: &'static str },

    /// The admin store refused a multi-segment path
    #[error("Nested access denied: admin store forbids nested access to '{0}' outside the user/function cases")]
    NestedAccessDenied(String),

    /// A path led back into a store that is already being accessed
    #[error("Store at '{0}' is already borrowed along this path")]
    Reentrant(String),

    /// Errors related to schema definitions and the schema registry
    #[error("Schema error: {0}")]
    Schema(String),

    /// Errors related to configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to IO operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub(crate) fn denied(operation: AccessKind, key: &str) -> Self {
        Self::PermissionDenied {
            operation,
            key: key.to_string(),
        }
    }
}

/// Conversion from serde_json::Error to StoreError
impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        StoreError::Serialization(error.to_string())
    }
}

/// Conversion from toml::de::Error to StoreError
impl From<toml::de::Error> for StoreError {
    fn from(error: toml::de::Error) -> Self {
        StoreError::Serialization(error.to_string())
    }
}

/// Conversion from toml::ser::Error to StoreError
impl From<toml::ser::Error> for StoreError {
    fn from(error: toml::ser::Error) -> Self {
        StoreError::Serialization(error.to_string())
    }
}

/// Result type alias for operations that can result in a StoreError
pub type StoreResult<T> = Result<T, StoreError>;
