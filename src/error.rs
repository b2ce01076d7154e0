//! Error types for catalog construction and configuration
//!
//! Filtering itself never fails: unknown labels are ignored and an empty
//! catalog simply yields an empty result. Errors only arise at the
//! boundaries, when a catalog is built or loaded and when configuration is
//! read.

use thiserror::Error;

use crate::types::Attribute;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    /// Catalog construction or loading error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Catalog errors
///
/// Raised while building category indexes or decoding a catalog document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The same label appears twice in one attribute's vocabulary
    #[error("Duplicate {attribute} label '{label}' at positions {first} and {second}")]
    DuplicateLabel {
        /// Attribute whose vocabulary is invalid
        attribute: Attribute,
        /// The repeated label
        label: String,
        /// Position of the first occurrence
        first: u32,
        /// Position of the repeated occurrence
        second: u32,
    },

    /// A vocabulary has more labels than its bitset can address
    #[error("{attribute} vocabulary has {len} labels, capacity is {capacity}")]
    VocabularyOverflow {
        /// Attribute whose vocabulary is too large
        attribute: Attribute,
        /// Number of labels supplied
        len: usize,
        /// Maximum number of addressable positions
        capacity: u32,
    },

    /// A record was encoded with a label missing from the vocabulary
    #[error("Unknown {attribute} label '{label}'")]
    UnknownLabel {
        /// Attribute being encoded
        attribute: Attribute,
        /// The unrecognised label
        label: String,
    },

    /// A catalog row does not have the expected shape
    #[error("Malformed record at row {row}: {reason}")]
    MalformedRecord {
        /// Zero-based row number in the source document
        row: usize,
        /// Description of the shape violation
        reason: String,
    },

    /// The catalog document itself could not be decoded
    #[error("Invalid catalog document: {0}")]
    InvalidDocument(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Catalog(CatalogError::InvalidDocument(e.to_string()))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
