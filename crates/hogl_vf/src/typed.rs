//! # Typed Items
//!
//! Plain-old-data helpers for asset payloads. Values are stored byte for
//! byte, so struct padding and byte order are the caller's concern.

use bytemuck::Pod;

use crate::error::{VfError, VfResult};
use crate::store::VirtualFile;

impl VirtualFile {
    /// Appends a single POD value as an item.
    ///
    /// # Errors
    ///
    /// Same as [`VirtualFile::add_item`].
    pub fn add_pod_item<T: Pod>(&mut self, name: &str, kind: u32, value: &T) -> VfResult<()> {
        self.add_item(name, kind, bytemuck::bytes_of(value))
    }

    /// Appends a slice of POD values as one item.
    ///
    /// # Errors
    ///
    /// Same as [`VirtualFile::add_item`].
    pub fn add_pod_slice<T: Pod>(&mut self, name: &str, kind: u32, values: &[T]) -> VfResult<()> {
        self.add_item(name, kind, bytemuck::cast_slice(values))
    }

    /// Copies the payload at `index` out as a `T`.
    ///
    /// The payload does not need to be aligned.
    ///
    /// # Errors
    ///
    /// * [`VfError::SizeMismatch`] - payload length differs from `size_of::<T>()`
    /// * anything [`VirtualFile::map_item`] returns
    pub fn read_item_as<T: Pod>(&self, index: usize) -> VfResult<T> {
        let data = self.map_item(index)?;
        let expected = std::mem::size_of::<T>();
        if data.len() != expected {
            return Err(VfError::SizeMismatch {
                index,
                expected: expected as u64,
                actual: data.len() as u64,
            });
        }
        Ok(bytemuck::pod_read_unaligned(data))
    }

    /// Copies the payload at `index` out as a vector of `T`.
    ///
    /// # Errors
    ///
    /// * [`VfError::SizeMismatch`] - payload is not a whole number of `T`
    /// * anything [`VirtualFile::map_item`] returns
    pub fn read_slice_as<T: Pod>(&self, index: usize) -> VfResult<Vec<T>> {
        let data = self.map_item(index)?;
        let size = std::mem::size_of::<T>();
        if size == 0 || data.len() % size != 0 {
            return Err(VfError::SizeMismatch {
                index,
                expected: (data.len() / size.max(1) * size) as u64,
                actual: data.len() as u64,
            });
        }
        Ok(data
            .chunks_exact(size)
            .map(bytemuck::pod_read_unaligned)
            .collect())
    }
}
