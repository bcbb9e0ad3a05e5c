//! # Legacy Layout
//!
//! Reader for VF files written before the fixed-stride name table, as
//! still produced by `utility/hvf_converter.py`:
//!
//! ```text
//! [endian: 4][version: u32][item_count: u64][buffer_size: u64]
//! item: [type: u32][name_len: u32][name][data_len: u64][data]
//! ```
//!
//! Loading converts to the current layout; saving the result upgrades the
//! file.

use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{VfError, VfResult};
use crate::io::{bad_read, check_marker, open, read_block};
use crate::store::VirtualFile;

/// Header length of the legacy layout, after the endian marker.
const LEGACY_HEADER_LEN: usize = 4 + 8 + 8;

/// Cursor over the legacy data region.
struct LegacyWalk<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> LegacyWalk<'a> {
    fn take(&mut self, len: usize, what: &str) -> VfResult<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| VfError::Corrupted {
                offset: self.offset as u64,
                reason: format!("{what} of {len} bytes runs past the end"),
            })?;
        let data = self.data;
        let bytes = &data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn u32(&mut self, what: &str) -> VfResult<u32> {
        let b = self.take(4, what)?;
        Ok(u32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn u64(&mut self, what: &str) -> VfResult<u64> {
        let b = self.take(8, what)?;
        Ok(u64::from_ne_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
    }

    fn length(&mut self, what: &str) -> VfResult<usize> {
        let len = self.u64(what)?;
        usize::try_from(len).map_err(|_| VfError::Corrupted {
            offset: self.offset as u64,
            reason: format!("{what} {len} does not fit in memory"),
        })
    }
}

/// One item decoded from the legacy data region.
struct LegacyItem<'a> {
    kind: u32,
    name: &'a [u8],
    data: &'a [u8],
}

impl VirtualFile {
    /// Reads a legacy-layout file at `path` into a current store.
    ///
    /// # Errors
    ///
    /// Same as [`VirtualFile::read`].
    pub fn read_legacy(path: impl AsRef<Path>) -> VfResult<Self> {
        let path = path.as_ref();
        tracing::trace!(path = %path.display(), "Reading legacy virtual file");
        let file = open(path)?;
        Self::read_legacy_from(BufReader::new(file))
    }

    /// Reads a legacy-layout file from any byte stream.
    ///
    /// The name stride is set to the longest stored name (at least 1) and
    /// the returned store is already mapped.
    ///
    /// # Errors
    ///
    /// Same as [`VirtualFile::read_from`].
    pub fn read_legacy_from<R: Read>(mut reader: R) -> VfResult<Self> {
        check_marker(&mut reader)?;

        let mut header = [0u8; LEGACY_HEADER_LEN];
        reader
            .read_exact(&mut header)
            .map_err(|e| bad_read("header", &e))?;
        let version = u32::from_ne_bytes([header[0], header[1], header[2], header[3]]);
        let mut count_bytes = [0u8; 8];
        count_bytes.copy_from_slice(&header[4..12]);
        let item_count = u64::from_ne_bytes(count_bytes);
        let mut size_bytes = [0u8; 8];
        size_bytes.copy_from_slice(&header[12..20]);
        let buffer_size = u64::from_ne_bytes(size_bytes);

        let data = read_block(&mut reader, buffer_size, "data")?;

        let mut walk = LegacyWalk { data: &data, offset: 0 };
        let mut items = Vec::new();
        for _ in 0..item_count {
            let kind = walk.u32("item type")?;
            let name_len = walk.u32("name length")? as usize;
            let name = walk.take(name_len, "name")?;
            let data_len = walk.length("data length")?;
            let data = walk.take(data_len, "data")?;
            items.push(LegacyItem { kind, name, data });
        }
        if walk.offset != data.len() {
            return Err(VfError::Corrupted {
                offset: walk.offset as u64,
                reason: format!("{} trailing bytes after last item", data.len() - walk.offset),
            });
        }

        let stride = items.iter().map(|item| item.name.len()).max().unwrap_or(0).max(1);
        let stride = u32::try_from(stride).map_err(|_| VfError::Corrupted {
            offset: 0,
            reason: format!("name of {stride} bytes is too long"),
        })?;

        let mut vf = VirtualFile::new(version, stride);
        for item in &items {
            vf.push_item(item.name, item.kind, item.data)?;
        }
        vf.map_items()?;

        tracing::debug!(items = items.len(), stride, "Upgraded legacy virtual file");
        Ok(vf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::ENDIAN_CHECK_VAL;
    use std::io::Cursor;

    /// Same bytes as the python converter writes, in host byte order.
    fn converter_output() -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&ENDIAN_CHECK_VAL.to_ne_bytes());
        out.extend_from_slice(&0u32.to_ne_bytes());
        out.extend_from_slice(&1u64.to_ne_bytes());
        out.extend_from_slice(&(4u64 + 4 + 4 + 8 + 4).to_ne_bytes());
        out.extend_from_slice(&0u32.to_ne_bytes());
        out.extend_from_slice(&4u32.to_ne_bytes());
        out.extend_from_slice(b"test");
        out.extend_from_slice(&4u64.to_ne_bytes());
        out.extend_from_slice(&50u32.to_ne_bytes());
        out
    }

    #[test]
    fn test_converter_file() {
        let vf = VirtualFile::read_legacy_from(Cursor::new(converter_output())).unwrap();
        assert_eq!(vf.version(), 0);
        assert_eq!(vf.item_count(), 1);
        assert_eq!(vf.max_name_len(), 4);
        assert_eq!(vf.get_item_index("test").unwrap(), 0);
        assert_eq!(vf.read_item_as::<u32>(0).unwrap(), 50);
        assert_eq!(vf.buffer_size(), 4 + 8 + 4);
    }

    #[test]
    fn test_name_past_end() {
        let mut bytes = converter_output();
        // name_len = 200
        bytes[28..32].copy_from_slice(&200u32.to_ne_bytes());
        assert!(matches!(
            VirtualFile::read_legacy_from(Cursor::new(bytes)),
            Err(VfError::Corrupted { offset: 8, .. })
        ));
    }

    #[test]
    fn test_empty_legacy_file() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&ENDIAN_CHECK_VAL.to_ne_bytes());
        bytes.extend_from_slice(&[0u8; LEGACY_HEADER_LEN]);
        let vf = VirtualFile::read_legacy_from(Cursor::new(bytes)).unwrap();
        assert_eq!(vf.item_count(), 0);
        assert_eq!(vf.max_name_len(), 1);
        assert!(vf.is_mapped());
    }
}
