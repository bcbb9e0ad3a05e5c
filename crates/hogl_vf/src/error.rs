//! # VF Error Types
//!
//! All errors that can occur while building, reading or writing a virtual file.

use thiserror::Error;

/// Errors that can occur in the virtual file system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VfError {
    /// The file could not be opened.
    #[error("failed to open {path}: {reason}")]
    BadPath {
        /// Path that failed to open.
        path: String,
        /// Rendered I/O cause.
        reason: String,
    },

    /// A read returned fewer bytes than the layout requires.
    #[error("short read while reading {section}: {reason}")]
    BadRead {
        /// Which part of the layout was being read.
        section: &'static str,
        /// Rendered I/O cause.
        reason: String,
    },

    /// A write did not complete.
    #[error("short write while writing {section}: {reason}")]
    BadWrite {
        /// Which part of the layout was being written.
        section: &'static str,
        /// Rendered I/O cause.
        reason: String,
    },

    /// The file was produced on a machine with the other byte order.
    #[error("virtual file and machine endianness don't match")]
    EndianMismatch,

    /// An argument was rejected before the store was touched.
    #[error("bad argument: {0}")]
    BadArgument(String),

    /// Growing an internal buffer failed. The store is unchanged.
    #[error("failed to grow virtual file buffers by {requested} bytes")]
    Memory {
        /// Number of additional bytes that could not be reserved.
        requested: usize,
    },

    /// Item index is not below the item count.
    #[error("item index {index} out of range (item count {count})")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Current item count.
        count: u64,
    },

    /// The item map has not been built since the last structural change.
    #[error("item map is not built, call map_items first")]
    VfiMapMissing,

    /// No item carries the requested name.
    #[error("no item named {0:?}")]
    VfBadName(String),

    /// A new name does not fit into the name stride.
    #[error("name of {len} bytes does not fit into {max} byte slot")]
    NameTooLong {
        /// Length of the rejected name.
        len: usize,
        /// Current name stride.
        max: u32,
    },

    /// Item headers in the data region do not line up with its size.
    #[error("data region corrupted at offset {offset}: {reason}")]
    Corrupted {
        /// Byte offset into the data region where the walk failed.
        offset: u64,
        /// What was wrong.
        reason: String,
    },

    /// A typed read asked for a size the payload does not have.
    #[error("item {index} holds {actual} bytes, expected {expected}")]
    SizeMismatch {
        /// Item index.
        index: usize,
        /// Size required by the requested type.
        expected: u64,
        /// Stored payload length.
        actual: u64,
    },
}

/// Result type for virtual file operations.
pub type VfResult<T> = Result<T, VfError>;
