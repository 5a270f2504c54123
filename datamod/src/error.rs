use std::num::ParseIntError;

use thiserror::Error;

/// Reasons a single type descriptor fails to resolve.
///
/// Every variant carries the descriptor as it was written so callers can
/// report failures without keeping their own copy around.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("malformed size suffix in type {descriptor:?}")]
    MalformedDescriptor {
        descriptor: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid {what} size {size} in type {descriptor:?}")]
    InvalidSize {
        descriptor: String,
        what: SizeKind,
        size: i64,
    },
    #[error("{descriptor:?} is not supported, use uint256 and track the sign separately")]
    UnsupportedSignedWide { descriptor: String },
    #[error("invalid table name {name:?} in type {descriptor:?}")]
    InvalidIdentifier { descriptor: String, name: String },
    #[error("unknown field type {descriptor:?}")]
    UnknownType { descriptor: String },
}

impl TypeError {
    /// The descriptor that failed to resolve.
    pub fn descriptor(&self) -> &str {
        match self {
            Self::MalformedDescriptor { descriptor, .. }
            | Self::InvalidSize { descriptor, .. }
            | Self::UnsupportedSignedWide { descriptor }
            | Self::InvalidIdentifier { descriptor, .. }
            | Self::UnknownType { descriptor } => descriptor,
        }
    }
}

/// Which bound an [`TypeError::InvalidSize`] violated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SizeKind {
    /// `bytesN`, N in 1..=32
    Bytes,
    /// `uintN`/`intN`, N in 8..=64 step 8, or 256
    Integer,
}

impl std::fmt::Display for SizeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytes => f.write_str("bytes"),
            Self::Integer => f.write_str("integer"),
        }
    }
}
