//! Recoverable layout errors.
//!
//! These are the failures a caller is expected to handle, usually by
//! rejecting the customization request that produced them. Broken
//! preconditions on the starting table (no `/` mount) are not represented
//! here: they panic inside the allocator.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The partition table type cannot hold another partition.
    #[error("maximum number of partitions reached ({max})")]
    TooManyPartitions { max: usize },

    /// No base partition table exists for the architecture.
    #[error("unknown arch: {0}")]
    UnknownArch(String),

    /// Requested mountpoints rejected by the allow-list.
    #[error("the following custom mountpoints are not supported {0:?}")]
    InvalidMountpoints(Vec<String>),

    #[error("invalid size '{0}'")]
    InvalidSize(String),

    /// Laying out a size of this many bytes overflows the disk offsets.
    #[error("size of {0} bytes is too large to lay out")]
    SizeOverflow(u64),

    /// A mounted filesystem has neither a UUID nor a label.
    #[error("filesystem mounted at '{0}' has no UUID or label")]
    Unidentified(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
