//! # HOGL Virtual File
//!
//! A self-describing container of named, typed binary blobs, used to ship
//! shaders, meshes, textures and sounds as a single asset file.
//!
//! ## Design Principles
//!
//! 1. **Bit-compatible layout** - files written by older tooling load unchanged
//! 2. **Explicit item map** - item boundaries are resolved by [`VirtualFile::map_items`]
//!    and dropped on structural change, so stale views fail instead of dangling
//! 3. **All-or-nothing mutation** - a failed add or restride leaves the store as it was
//!
//! ## Example
//!
//! ```rust,no_run
//! use hogl_vf::VirtualFile;
//!
//! let mut vf = VirtualFile::new(1, 32);
//! vf.add_item("shader.vert", 1, b"#version 330 core\n")?;
//! vf.save("assets.hvf")?;
//!
//! let loaded = VirtualFile::read("assets.hvf")?;
//! let index = loaded.get_item_index("shader.vert")?;
//! let source = loaded.map_item(index)?;
//! # let _ = source;
//! # Ok::<(), hogl_vf::VfError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod header;
mod io;
pub mod item;
mod legacy;
pub mod store;
mod typed;

pub use error::{VfError, VfResult};
pub use header::{Endianness, VfHeader, ENDIAN_CHECK_VAL};
pub use item::ItemRef;
pub use store::VirtualFile;
