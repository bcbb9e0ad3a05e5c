//! # HOGL VF Tool
//!
//! Library side of the `hvf` command: manifest parsing and the subcommand
//! implementations, kept out of the binary so they can be tested directly.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod commands;
pub mod error;
pub mod manifest;

pub use commands::PackSummary;
pub use error::{ToolError, ToolResult};
pub use manifest::{ItemSource, ManifestItem, PackManifest};
