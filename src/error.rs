//! Error types for schemadict
//!
//! This module defines all error types used throughout the library.
//! Every container error names the container kind and the offending key,
//! since those are the anchors needed when hundreds of similarly spelled
//! attributes live in one schema.

use std::fmt;
use thiserror::Error;

use crate::normalize::NormalizationPolicy;

/// Result type alias using schemadict Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for container and schema operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A mutation was attempted on a frozen container
    #[error(
        "{container} is frozen: cannot {operation}{}{}",
        key_suffix(.key),
        normalized_suffix(.normalized)
    )]
    ContainerFrozen {
        /// Printable name of the container
        container: &'static str,
        /// Name of the rejected operation
        operation: &'static str,
        /// Offending key or value, if the operation had one
        key: Option<String>,
        /// Normalized form of the key (case-insensitive containers only)
        normalized: Option<String>,
    },

    /// Lookup, delete or pop of an absent key
    #[error("key {key}{} not found in {container}", normalized_suffix(.normalized))]
    KeyMissing {
        /// Printable name of the container
        container: &'static str,
        /// Key as given by the caller
        key: String,
        /// Normalized form of the key (case-insensitive containers only)
        normalized: Option<String>,
    },

    /// Positional access with an invalid index
    #[error("index {index} out of range for {container} of length {len}")]
    IndexOutOfRange {
        /// Printable name of the container
        container: &'static str,
        /// Requested index
        index: usize,
        /// Length of the container at the time of the access
        len: usize,
    },

    /// A value searched by equality is not in a list
    #[error("value {value} not found in {container}")]
    ValueMissing {
        /// Printable name of the container
        container: &'static str,
        /// Searched value
        value: String,
    },

    /// Two case-insensitive containers with different policies were merged
    #[error("{container} uses {expected} normalization but the other container uses {found}")]
    PolicyMismatch {
        /// Printable name of the container
        container: &'static str,
        /// Policy of the receiving container
        expected: NormalizationPolicy,
        /// Policy of the other container
        found: NormalizationPolicy,
    },

    /// Value error (invalid token for a policy or length)
    #[error("value error: {0}")]
    InvalidValue(String),

    /// Structural inconsistency in a schema description
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl Error {
    /// Build a `ContainerFrozen` error
    pub fn frozen(container: &'static str, operation: &'static str) -> Self {
        Error::ContainerFrozen {
            container,
            operation,
            key: None,
            normalized: None,
        }
    }

    /// Build a `ContainerFrozen` error naming the offending key
    pub fn frozen_key(
        container: &'static str,
        operation: &'static str,
        key: impl fmt::Debug,
    ) -> Self {
        Error::ContainerFrozen {
            container,
            operation,
            key: Some(format!("{:?}", key)),
            normalized: None,
        }
    }

    /// Build a `ContainerFrozen` error for a key of a case-insensitive container
    pub fn frozen_normalized(
        container: &'static str,
        operation: &'static str,
        key: &str,
        normalized: &str,
    ) -> Self {
        Error::ContainerFrozen {
            container,
            operation,
            key: Some(format!("{:?}", key)),
            normalized: Some(format!("{:?}", normalized)),
        }
    }

    /// Build a `KeyMissing` error for a container without normalization
    pub fn missing(container: &'static str, key: impl fmt::Debug) -> Self {
        Error::KeyMissing {
            container,
            key: format!("{:?}", key),
            normalized: None,
        }
    }

    /// Build a `KeyMissing` error for a case-insensitive container
    pub fn missing_normalized(container: &'static str, key: &str, normalized: &str) -> Self {
        Error::KeyMissing {
            container,
            key: format!("{:?}", key),
            normalized: Some(format!("{:?}", normalized)),
        }
    }

    /// Check whether this error signals a frozen container
    pub fn is_frozen(&self) -> bool {
        matches!(self, Error::ContainerFrozen { .. })
    }

    /// Check whether this error signals a missing key
    pub fn is_missing(&self) -> bool {
        matches!(self, Error::KeyMissing { .. })
    }
}

fn key_suffix(key: &Option<String>) -> String {
    match key {
        Some(key) => format!(" {}", key),
        None => String::new(),
    }
}

fn normalized_suffix(normalized: &Option<String>) -> String {
    match normalized {
        Some(normalized) => format!(" (normalized {})", normalized),
        None => String::new(),
    }
}

/// Consistency error found while checking a schema description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    /// Error message
    pub message: String,
    /// Tag path the error refers to
    pub path: Option<String>,
    /// Tag or attribute name the error refers to
    pub name: Option<String>,
}

impl SchemaError {
    /// Create a new schema error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            name: None,
        }
    }

    /// Set the path the error refers to
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the tag or attribute name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref name) = self.name {
            write!(f, "\n\nName: {}", name)?;
        }

        if let Some(ref path) = self.path {
            write!(f, "\n\nPath: {}", path)?;
        }

        Ok(())
    }
}

impl std::error::Error for SchemaError {}
