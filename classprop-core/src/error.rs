//! Error types for classprop.
//!
//! Computation failures are never wrapped here: a cache hands the
//! computation's own error back to the caller. `ClassPropError` only covers
//! what the cache itself rejects.

use std::fmt;

use thiserror::Error;

/// Result type alias using `ClassPropError`.
pub type Result<T> = std::result::Result<T, ClassPropError>;

/// A mutation attempted on a read-only class property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOp {
    /// Assigning a new value.
    Set,
    /// Deleting the value.
    Delete,
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOp::Set => f.write_str("set"),
            WriteOp::Delete => f.write_str("delete"),
        }
    }
}

/// Main error type for classprop operations.
#[derive(Debug, Error)]
pub enum ClassPropError {
    /// The property is a read-only view over cached values.
    #[error("Cannot {operation} read-only class property '{property}' on {class}")]
    ReadOnly {
        /// Name of the property.
        property: String,
        /// Type name of the class the write went through.
        class: String,
        /// Rejected operation.
        operation: WriteOp,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClassPropError {
    /// Returns true if this error rejects a write or delete.
    pub fn is_read_only(&self) -> bool {
        matches!(self, ClassPropError::ReadOnly { .. })
    }

    /// Returns true if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(self, ClassPropError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_only_display() {
        let err = ClassPropError::ReadOnly {
            property: "value".into(),
            class: "app::MyClass".into(),
            operation: WriteOp::Delete,
        };
        let msg = err.to_string();
        assert!(msg.contains("delete"));
        assert!(msg.contains("'value'"));
        assert!(msg.contains("app::MyClass"));
    }

    #[test]
    fn test_error_classification() {
        let read_only = ClassPropError::ReadOnly {
            property: "value".into(),
            class: "C".into(),
            operation: WriteOp::Set,
        };
        assert!(read_only.is_read_only());
        assert!(!read_only.is_config_error());

        let config = ClassPropError::Config("bad timeout".into());
        assert!(config.is_config_error());
        assert!(!config.is_read_only());
    }
}
