//! # Tool Error Types

use std::path::PathBuf;

use hogl_vf::VfError;
use thiserror::Error;

/// Errors reported by the `hvf` tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The virtual file layer failed.
    #[error(transparent)]
    Vf(#[from] VfError),

    /// A manifest or input file could not be read, or output written.
    #[error("{path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest is not valid TOML or does not match the schema.
    #[error("invalid manifest {path}: {source}")]
    ManifestSyntax {
        /// Manifest path.
        path: PathBuf,
        /// Parser error.
        source: toml::de::Error,
    },

    /// The manifest parsed but describes an impossible file.
    #[error("invalid manifest: {0}")]
    Manifest(String),
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;
