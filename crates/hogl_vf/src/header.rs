//! # VF File Header
//!
//! Fixed-size framing shared by the reader and the writer.
//!
//! ## Format
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ Endian marker (4)  0x01234567 in producer byte order     │
//! ├──────────────────────────────────────────────────────────┤
//! │ Version (4) │ Item count (8) │ Buffer size (8) │ Stride (4)│
//! ├──────────────────────────────────────────────────────────┤
//! │ Name table: item_count * stride bytes, zero padded       │
//! ├──────────────────────────────────────────────────────────┤
//! │ Data region: buffer_size bytes of                        │
//! │   [type: u32][length: u64][payload: length bytes] ...    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are stored in the producer's native byte order. The
//! marker only tells the reader whether that order matches its own.

/// Sentinel written at offset 0 of every VF file.
pub const ENDIAN_CHECK_VAL: u32 = 0x0123_4567;

/// Size of the endian marker in bytes.
pub const ENDIAN_MARKER_LEN: usize = 4;

/// Size of one item header (`type` + `length`) inside the data region.
pub const ITEM_HEADER_LEN: usize = 4 + 8;

/// Byte order tag derived from an endian marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endianness {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

impl Endianness {
    /// Byte order of the running machine.
    #[must_use]
    pub const fn host() -> Self {
        if cfg!(target_endian = "little") {
            Self::Little
        } else {
            Self::Big
        }
    }

    /// Derives the producer byte order from raw marker bytes.
    ///
    /// Only the first byte is inspected: `0x67` means the marker was laid
    /// down little-endian, anything else is treated as big-endian.
    #[must_use]
    pub const fn from_marker(marker: [u8; ENDIAN_MARKER_LEN]) -> Self {
        if marker[0] == 0x67 {
            Self::Little
        } else {
            Self::Big
        }
    }
}

/// Marker bytes as written by this machine.
#[must_use]
pub const fn host_marker() -> [u8; ENDIAN_MARKER_LEN] {
    ENDIAN_CHECK_VAL.to_ne_bytes()
}

/// The fixed header that follows the endian marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VfHeader {
    /// Caller-defined format version.
    pub version: u32,
    /// Number of items in the file.
    pub item_count: u64,
    /// Length of the data region in bytes.
    pub buffer_size: u64,
    /// Bytes reserved per name slot.
    pub max_name_len: u32,
}

impl VfHeader {
    /// Size of header in bytes.
    pub const SIZE: usize = 4 + 8 + 8 + 4;

    /// Serializes the header in native byte order.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.version.to_ne_bytes());
        bytes[4..12].copy_from_slice(&self.item_count.to_ne_bytes());
        bytes[12..20].copy_from_slice(&self.buffer_size.to_ne_bytes());
        bytes[20..24].copy_from_slice(&self.max_name_len.to_ne_bytes());
        bytes
    }

    /// Deserializes a header written in native byte order.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        Self {
            version: u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            item_count: u64::from_ne_bytes([
                bytes[4], bytes[5], bytes[6], bytes[7],
                bytes[8], bytes[9], bytes[10], bytes[11],
            ]),
            buffer_size: u64::from_ne_bytes([
                bytes[12], bytes[13], bytes[14], bytes[15],
                bytes[16], bytes[17], bytes[18], bytes[19],
            ]),
            max_name_len: u32::from_ne_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]),
        }
    }

    /// Size of the name table this header describes, if it fits in memory.
    #[must_use]
    pub fn name_table_len(&self) -> Option<usize> {
        let count = usize::try_from(self.item_count).ok()?;
        count.checked_mul(self.max_name_len as usize)
    }
}

/// Encodes an item header (`type`, `length`) in native byte order.
#[must_use]
pub fn encode_item_header(kind: u32, length: u64) -> [u8; ITEM_HEADER_LEN] {
    let mut bytes = [0u8; ITEM_HEADER_LEN];
    bytes[0..4].copy_from_slice(&kind.to_ne_bytes());
    bytes[4..12].copy_from_slice(&length.to_ne_bytes());
    bytes
}

/// Decodes an item header from the start of `data`.
///
/// Returns `None` when fewer than [`ITEM_HEADER_LEN`] bytes remain.
#[must_use]
pub fn decode_item_header(data: &[u8]) -> Option<(u32, u64)> {
    let head = data.get(..ITEM_HEADER_LEN)?;
    let kind = u32::from_ne_bytes([head[0], head[1], head[2], head[3]]);
    let length = u64::from_ne_bytes([
        head[4], head[5], head[6], head[7],
        head[8], head[9], head[10], head[11],
    ]);
    Some((kind, length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_marker_matches_host_endianness() {
        assert_eq!(Endianness::from_marker(host_marker()), Endianness::host());
    }

    #[test]
    fn test_swapped_marker_is_foreign() {
        let swapped = ENDIAN_CHECK_VAL.swap_bytes().to_ne_bytes();
        assert_ne!(Endianness::from_marker(swapped), Endianness::host());
    }

    #[test]
    fn test_header_layout() {
        let header = VfHeader {
            version: 7,
            item_count: 2,
            buffer_size: 30,
            max_name_len: 16,
        };
        let bytes = header.to_bytes();

        assert_eq!(&bytes[0..4], &7u32.to_ne_bytes());
        assert_eq!(&bytes[4..12], &2u64.to_ne_bytes());
        assert_eq!(&bytes[12..20], &30u64.to_ne_bytes());
        assert_eq!(&bytes[20..24], &16u32.to_ne_bytes());
        assert_eq!(VfHeader::from_bytes(&bytes), header);
    }

    #[test]
    fn test_name_table_len_overflow() {
        let header = VfHeader {
            item_count: u64::MAX,
            max_name_len: 16,
            ..VfHeader::default()
        };
        assert_eq!(header.name_table_len(), None);
    }

    #[test]
    fn test_item_header_short_input() {
        let bytes = encode_item_header(3, 9);
        assert_eq!(decode_item_header(&bytes), Some((3, 9)));
        assert_eq!(decode_item_header(&bytes[..11]), None);
    }
}
