//! Error types for range partitioning.
//!
//! Everything in here is a caller-correctable validation failure. Broken
//! internal invariants (a split remainder that is not below the split count,
//! a digest value that falls outside every partition of a built map) are
//! program faults and panic instead of showing up as an [`Error`].

use thiserror::Error;

/// Result type alias for partitioning operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for partitioning operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A range can only be split into more than one partition.
    #[error("invalid split count {0}: a range can only be split into more than one partition")]
    InvalidSplitCount(usize),

    /// The interval failed validation.
    #[error("invalid interval {label:?}: {reason}")]
    InvalidInterval { label: String, reason: String },

    /// Keys must contain at least one byte.
    #[error("invalid key: keys must be non-empty byte sequences")]
    EmptyKey,

    /// A serialized bound is not a valid hexadecimal number.
    #[error("malformed {field} bound {value:?} for partition {label:?}")]
    MalformedBound {
        label: String,
        field: &'static str,
        value: String,
    },

    /// No digest space is known under this name.
    #[error("unknown hash function: {0}")]
    UnknownAlgorithm(String),

    /// A record was decoded against a digest space of a different hash
    /// function.
    #[error("hash function mismatch: record uses {record} but space is {space}")]
    AlgorithmMismatch { record: String, space: String },

    /// Decoded partitions do not tile the digest space.
    #[error("coverage error: {0}")]
    Coverage(String),

    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),

    /// Encoding or decoding a partition map record failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub(crate) fn invalid_interval(label: &str, reason: impl Into<String>) -> Self {
        Error::InvalidInterval {
            label: label.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::InvalidSplitCount(1).to_string(),
            "invalid split count 1: a range can only be split into more than one partition"
        );
        assert_eq!(
            Error::invalid_interval("p", "blank label").to_string(),
            "invalid interval \"p\": blank label"
        );
        let err = Error::MalformedBound {
            label: "p-0".into(),
            field: "lower",
            value: "zz".into(),
        };
        assert_eq!(err.to_string(), "malformed lower bound \"zz\" for partition \"p-0\"");
        let err = Error::AlgorithmMismatch {
            record: "XXH64".into(),
            space: "MD5".into(),
        };
        assert_eq!(err.to_string(), "hash function mismatch: record uses XXH64 but space is MD5");
    }

    #[test]
    fn test_from_serde_json() {
        let err: Error = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
