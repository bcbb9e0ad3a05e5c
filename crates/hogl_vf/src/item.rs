//! # Item Map
//!
//! The index built by [`crate::VirtualFile::map_items`]. Entries hold byte
//! offsets into the store's buffers rather than pointers, so a stale map can
//! never dangle; it is simply dropped on structural change.

use std::borrow::Cow;

/// One mapped item, resolved against the store's buffers on access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ItemEntry {
    /// Caller-defined type tag.
    pub kind: u32,
    /// Logical name length inside the name slot.
    pub name_len: usize,
    /// Offset of the payload inside the data region.
    pub data_offset: usize,
    /// Payload length.
    pub data_len: usize,
}

impl ItemEntry {
    /// Byte range of the payload inside the data region.
    #[inline]
    pub fn data_range(&self) -> std::ops::Range<usize> {
        self.data_offset..self.data_offset + self.data_len
    }
}

/// Logical length of a zero-padded name slot.
#[inline]
pub(crate) fn slot_name_len(slot: &[u8]) -> usize {
    slot.iter().position(|&b| b == 0).unwrap_or(slot.len())
}

/// Borrowed view of a single item.
///
/// Holding an `ItemRef` borrows the store immutably, so the compiler
/// rejects any mutation while it is alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemRef<'a> {
    /// Position of the item in the store.
    pub index: usize,
    /// Caller-defined type tag.
    pub kind: u32,
    /// Raw name bytes without padding.
    pub name: &'a [u8],
    /// Payload bytes.
    pub data: &'a [u8],
}

impl ItemRef<'_> {
    /// Name as text, replacing invalid UTF-8.
    #[must_use]
    pub fn name_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.name)
    }

    /// Payload length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Returns true if the payload is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_name_len() {
        assert_eq!(slot_name_len(b"abc\0\0\0"), 3);
        assert_eq!(slot_name_len(b"abcdef"), 6);
        assert_eq!(slot_name_len(b"\0\0"), 0);
        assert_eq!(slot_name_len(b""), 0);
    }

    #[test]
    fn test_data_range() {
        let entry = ItemEntry {
            kind: 0,
            name_len: 1,
            data_offset: 12,
            data_len: 4,
        };
        assert_eq!(entry.data_range(), 12..16);
    }
}
