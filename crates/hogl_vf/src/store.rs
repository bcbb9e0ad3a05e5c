//! # VF Store
//!
//! In-memory virtual file: a fixed-stride name table plus a data region of
//! back-to-back `[type][length][payload]` triples.
//!
//! ## Item Map States
//!
//! ```text
//!   Unmapped ──map_items()──▶ Mapped
//!      ▲                        │
//!      └──add_item()────────────┘
//! ```
//!
//! Accessors that need item boundaries fail with
//! [`VfError::VfiMapMissing`] while the store is unmapped. `rename_item`
//! keeps the map, `change_name_len` rebuilds it before returning.
//!
//! ## Thread Safety
//!
//! The store has no interior mutability. Share it across threads the usual
//! way (`&` for readers, a lock for a writer).

use std::borrow::Cow;
use std::fmt;

use crate::error::{VfError, VfResult};
use crate::header::{decode_item_header, encode_item_header, VfHeader, ITEM_HEADER_LEN};
use crate::item::{slot_name_len, ItemEntry, ItemRef};

/// A virtual file held in memory.
///
/// # Example
///
/// ```rust
/// use hogl_vf::VirtualFile;
///
/// let mut vf = VirtualFile::new(1, 16);
/// vf.add_item("alpha", 0, &[1, 2, 3, 4])?;
/// vf.add_item("beta", 1, &[9, 9])?;
/// vf.map_items()?;
///
/// assert_eq!(vf.get_item_index("beta")?, 1);
/// assert_eq!(vf.map_item(1)?, &[9, 9]);
/// # Ok::<(), hogl_vf::VfError>(())
/// ```
#[derive(Clone)]
pub struct VirtualFile {
    /// Caller-defined format version.
    version: u32,
    /// Number of stored items.
    item_count: u64,
    /// Bytes reserved per name slot.
    max_name_len: u32,
    /// `item_count * max_name_len` bytes, one zero-padded slot per item.
    name_buffer: Vec<u8>,
    /// Concatenated item triples.
    buffer: Vec<u8>,
    /// Item map, `None` until built or after a structural change.
    items: Option<Vec<ItemEntry>>,
}

impl VirtualFile {
    /// Creates an empty virtual file.
    ///
    /// # Arguments
    ///
    /// * `version` - Caller-defined format version
    /// * `max_name_len` - Bytes reserved per item name, must be non-zero
    ///   for items to be addable
    #[must_use]
    pub fn new(version: u32, max_name_len: u32) -> Self {
        Self {
            version,
            item_count: 0,
            max_name_len,
            name_buffer: Vec::new(),
            buffer: Vec::new(),
            items: None,
        }
    }

    /// Assembles a store from buffers read off disk and maps it.
    pub(crate) fn from_parts(
        header: VfHeader,
        name_buffer: Vec<u8>,
        buffer: Vec<u8>,
    ) -> VfResult<Self> {
        let mut vf = Self {
            version: header.version,
            item_count: header.item_count,
            max_name_len: header.max_name_len,
            name_buffer,
            buffer,
            items: None,
        };
        vf.map_items()?;
        Ok(vf)
    }

    /// Returns the format version.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Sets the format version.
    ///
    /// Lowering the version is allowed but logged.
    pub fn set_version(&mut self, version: u32) {
        if version < self.version {
            tracing::warn!(
                old = self.version,
                new = version,
                "Setting new virtual file version to lower than the existing one"
            );
        }
        self.version = version;
    }

    /// Returns the number of stored items.
    #[inline]
    #[must_use]
    pub const fn item_count(&self) -> u64 {
        self.item_count
    }

    /// Returns the data region length in bytes.
    #[inline]
    #[must_use]
    pub fn buffer_size(&self) -> u64 {
        self.buffer.len() as u64
    }

    /// Returns the name stride.
    #[inline]
    #[must_use]
    pub const fn max_name_len(&self) -> u32 {
        self.max_name_len
    }

    /// Returns true if the item map is current.
    #[inline]
    #[must_use]
    pub const fn is_mapped(&self) -> bool {
        self.items.is_some()
    }

    /// Header describing the current contents.
    #[must_use]
    pub fn header(&self) -> VfHeader {
        VfHeader {
            version: self.version,
            item_count: self.item_count,
            buffer_size: self.buffer_size(),
            max_name_len: self.max_name_len,
        }
    }

    pub(crate) fn name_buffer(&self) -> &[u8] {
        &self.name_buffer
    }

    pub(crate) fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Appends an item.
    ///
    /// The item map is dropped; call [`Self::map_items`] before reading
    /// items again. On failure the store is left untouched.
    ///
    /// # Errors
    ///
    /// * [`VfError::BadArgument`] - name longer than the stride, containing
    ///   a NUL byte, or the stride is zero
    /// * [`VfError::Memory`] - buffers could not grow
    pub fn add_item(&mut self, name: &str, kind: u32, data: &[u8]) -> VfResult<()> {
        if self.max_name_len == 0 {
            return Err(VfError::BadArgument(
                "virtual file has a zero name stride".to_string(),
            ));
        }
        if name.len() > self.max_name_len as usize {
            return Err(VfError::BadArgument(format!(
                "name {name:?} is {} bytes, stride is {}",
                name.len(),
                self.max_name_len
            )));
        }
        check_no_nul(name)?;

        self.push_item(name.as_bytes(), kind, data)?;
        tracing::debug!(item = name, kind, len = data.len(), index = self.item_count - 1, "Added item");
        Ok(())
    }

    /// Appends an item whose name is already known to fit.
    pub(crate) fn push_item(&mut self, name: &[u8], kind: u32, data: &[u8]) -> VfResult<()> {
        let stride = self.max_name_len as usize;
        debug_assert!(name.len() <= stride);

        let grow = ITEM_HEADER_LEN
            .checked_add(data.len())
            .ok_or(VfError::Memory { requested: usize::MAX })?;

        // Reserve both regions before writing either.
        self.name_buffer
            .try_reserve_exact(stride)
            .map_err(|_| VfError::Memory { requested: stride })?;
        self.buffer
            .try_reserve_exact(grow)
            .map_err(|_| VfError::Memory { requested: grow })?;

        let slot_start = self.name_buffer.len();
        self.name_buffer.resize(slot_start + stride, 0);
        self.name_buffer[slot_start..slot_start + name.len()].copy_from_slice(name);

        self.buffer
            .extend_from_slice(&encode_item_header(kind, data.len() as u64));
        self.buffer.extend_from_slice(data);

        self.item_count += 1;
        self.items = None;
        Ok(())
    }

    /// Renames the item at `index`.
    ///
    /// The item map stays valid since slot sizes do not change.
    ///
    /// # Errors
    ///
    /// * [`VfError::OutOfRange`] - no such item
    /// * [`VfError::NameTooLong`] - name does not fit into the stride
    /// * [`VfError::BadArgument`] - name contains a NUL byte
    /// * [`VfError::VfiMapMissing`] - the map has not been built
    pub fn rename_item(&mut self, index: usize, new_name: &str) -> VfResult<()> {
        self.check_index(index)?;
        if new_name.len() > self.max_name_len as usize {
            return Err(VfError::NameTooLong {
                len: new_name.len(),
                max: self.max_name_len,
            });
        }
        check_no_nul(new_name)?;

        let items = self.items.as_mut().ok_or(VfError::VfiMapMissing)?;
        let entry = items.get_mut(index).ok_or(VfError::VfiMapMissing)?;

        let stride = self.max_name_len as usize;
        let slot = &mut self.name_buffer[index * stride..(index + 1) * stride];
        slot.fill(0);
        slot[..new_name.len()].copy_from_slice(new_name.as_bytes());
        entry.name_len = new_name.len();

        tracing::debug!(index, new_name, "Renamed item");
        Ok(())
    }

    /// Changes the name stride, truncating or zero-padding every name.
    ///
    /// The name table is rebuilt and the item map is remapped before
    /// returning. On failure the store is left untouched.
    ///
    /// # Errors
    ///
    /// * [`VfError::Memory`] - the new name table could not be allocated
    /// * [`VfError::Corrupted`] - the data region does not walk cleanly
    pub fn change_name_len(&mut self, new_name_len: u32) -> VfResult<()> {
        let count = self.count_usize()?;
        let old_stride = self.max_name_len as usize;
        let new_stride = new_name_len as usize;
        let table_len = count
            .checked_mul(new_stride)
            .ok_or(VfError::Memory { requested: usize::MAX })?;

        let mut names = Vec::new();
        names
            .try_reserve_exact(table_len)
            .map_err(|_| VfError::Memory { requested: table_len })?;
        names.resize(table_len, 0);

        let keep = old_stride.min(new_stride);
        if keep > 0 {
            for (old, new) in self
                .name_buffer
                .chunks_exact(old_stride)
                .zip(names.chunks_exact_mut(new_stride))
            {
                new[..keep].copy_from_slice(&old[..keep]);
            }
        }

        let items = scan_items(&self.buffer, &names, new_stride, count)?;

        self.name_buffer = names;
        self.max_name_len = new_name_len;
        self.items = Some(items);

        tracing::debug!(old_stride, new_stride, "Changed name stride");
        Ok(())
    }

    /// Rebuilds the item map by walking the data region.
    ///
    /// Any previous map is discarded first, so a failed walk leaves the
    /// store unmapped.
    ///
    /// # Errors
    ///
    /// * [`VfError::Corrupted`] - an item runs past the end of the data
    ///   region, or items do not fill it exactly
    pub fn map_items(&mut self) -> VfResult<()> {
        self.items = None;
        let count = self.count_usize()?;
        let items = scan_items(
            &self.buffer,
            &self.name_buffer,
            self.max_name_len as usize,
            count,
        )?;
        tracing::debug!(count, "Mapped virtual file items");
        self.items = Some(items);
        Ok(())
    }

    /// Finds the first item named `name`.
    ///
    /// # Errors
    ///
    /// * [`VfError::VfiMapMissing`] - the map has not been built
    /// * [`VfError::VfBadName`] - no item carries that name
    pub fn get_item_index(&self, name: &str) -> VfResult<usize> {
        let items = self.items.as_ref().ok_or(VfError::VfiMapMissing)?;
        items
            .iter()
            .enumerate()
            .position(|(index, entry)| self.slot_name(index, entry) == name.as_bytes())
            .ok_or_else(|| VfError::VfBadName(name.to_string()))
    }

    /// Borrows the payload of the item at `index` without copying.
    ///
    /// # Errors
    ///
    /// * [`VfError::OutOfRange`] - no such item
    /// * [`VfError::VfiMapMissing`] - the map has not been built
    pub fn map_item(&self, index: usize) -> VfResult<&[u8]> {
        let entry = self.entry(index)?;
        Ok(&self.buffer[entry.data_range()])
    }

    /// Mutably borrows the payload of the item at `index`.
    ///
    /// Writes go straight into the store; the payload length is fixed.
    ///
    /// # Errors
    ///
    /// Same as [`Self::map_item`].
    pub fn map_item_mut(&mut self, index: usize) -> VfResult<&mut [u8]> {
        let range = self.entry(index)?.data_range();
        Ok(&mut self.buffer[range])
    }

    /// Returns the payload length of the item at `index`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::map_item`].
    pub fn item_size(&self, index: usize) -> VfResult<u64> {
        self.entry(index).map(|entry| entry.data_len as u64)
    }

    /// Returns the type tag of the item at `index`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::map_item`].
    pub fn item_type(&self, index: usize) -> VfResult<u32> {
        self.entry(index).map(|entry| entry.kind)
    }

    /// Returns the name of the item at `index`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::map_item`].
    pub fn item_name(&self, index: usize) -> VfResult<Cow<'_, str>> {
        let entry = self.entry(index)?;
        Ok(String::from_utf8_lossy(self.slot_name(index, entry)))
    }

    /// Iterates over all items in index order.
    ///
    /// # Errors
    ///
    /// * [`VfError::VfiMapMissing`] - the map has not been built
    pub fn items(&self) -> VfResult<impl Iterator<Item = ItemRef<'_>> + '_> {
        let items = self.items.as_ref().ok_or(VfError::VfiMapMissing)?;
        Ok(items.iter().enumerate().map(move |(index, entry)| ItemRef {
            index,
            kind: entry.kind,
            name: self.slot_name(index, entry),
            data: &self.buffer[entry.data_range()],
        }))
    }

    /// Looks up a mapped entry, checking range before map presence.
    fn entry(&self, index: usize) -> VfResult<&ItemEntry> {
        self.check_index(index)?;
        self.items
            .as_ref()
            .ok_or(VfError::VfiMapMissing)?
            .get(index)
            .ok_or(VfError::VfiMapMissing)
    }

    fn check_index(&self, index: usize) -> VfResult<()> {
        if index as u64 >= self.item_count {
            tracing::warn!(index, count = self.item_count, "Tried to access invalid virtual file item");
            return Err(VfError::OutOfRange {
                index,
                count: self.item_count,
            });
        }
        Ok(())
    }

    fn slot_name(&self, index: usize, entry: &ItemEntry) -> &[u8] {
        let start = index * self.max_name_len as usize;
        &self.name_buffer[start..start + entry.name_len]
    }

    fn count_usize(&self) -> VfResult<usize> {
        usize::try_from(self.item_count).map_err(|_| VfError::Corrupted {
            offset: 0,
            reason: format!("item count {} does not fit in memory", self.item_count),
        })
    }
}

impl fmt::Debug for VirtualFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualFile")
            .field("version", &self.version)
            .field("item_count", &self.item_count)
            .field("buffer_size", &self.buffer.len())
            .field("max_name_len", &self.max_name_len)
            .field("mapped", &self.items.is_some())
            .finish()
    }
}

fn check_no_nul(name: &str) -> VfResult<()> {
    if name.as_bytes().contains(&0) {
        return Err(VfError::BadArgument(format!(
            "name {name:?} contains a NUL byte"
        )));
    }
    Ok(())
}

/// Walks `count` item triples from the start of `buffer`.
fn scan_items(
    buffer: &[u8],
    name_buffer: &[u8],
    stride: usize,
    count: usize,
) -> VfResult<Vec<ItemEntry>> {
    if name_buffer.len() != count.saturating_mul(stride) {
        return Err(VfError::Corrupted {
            offset: 0,
            reason: format!(
                "name table is {} bytes, expected {count} slots of {stride}",
                name_buffer.len()
            ),
        });
    }

    let mut items = Vec::new();
    items
        .try_reserve_exact(count)
        .map_err(|_| VfError::Memory {
            requested: count.saturating_mul(std::mem::size_of::<ItemEntry>()),
        })?;

    let mut offset = 0usize;
    for index in 0..count {
        let (kind, length) =
            decode_item_header(&buffer[offset..]).ok_or_else(|| VfError::Corrupted {
                offset: offset as u64,
                reason: format!("item {index} header is truncated"),
            })?;
        offset += ITEM_HEADER_LEN;

        let data_len = usize::try_from(length)
            .ok()
            .filter(|len| offset.checked_add(*len).is_some_and(|end| end <= buffer.len()))
            .ok_or_else(|| VfError::Corrupted {
                offset: offset as u64,
                reason: format!("item {index} payload of {length} bytes runs past the end"),
            })?;

        let slot = &name_buffer[index * stride..(index + 1) * stride];
        items.push(ItemEntry {
            kind,
            name_len: slot_name_len(slot),
            data_offset: offset,
            data_len,
        });
        offset += data_len;
    }

    if offset != buffer.len() {
        return Err(VfError::Corrupted {
            offset: offset as u64,
            reason: format!("{} trailing bytes after last item", buffer.len() - offset),
        });
    }

    Ok(items)
}
