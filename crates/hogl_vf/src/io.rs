//! # VF File I/O
//!
//! Reads and writes the layout described in [`crate::header`]. Every block
//! is read or written in one piece; a short transfer is reported with the
//! name of the block that failed.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{VfError, VfResult};
use crate::header::{host_marker, Endianness, VfHeader, ENDIAN_MARKER_LEN};
use crate::store::VirtualFile;

impl VirtualFile {
    /// Reads the virtual file at `path`.
    ///
    /// The returned store is already mapped.
    ///
    /// # Errors
    ///
    /// * [`VfError::BadPath`] - the file could not be opened
    /// * [`VfError::BadRead`] - the file ended early
    /// * [`VfError::EndianMismatch`] - the file was written with the other byte order
    /// * [`VfError::Corrupted`] - the data region does not walk cleanly
    pub fn read(path: impl AsRef<Path>) -> VfResult<Self> {
        let path = path.as_ref();
        tracing::trace!(path = %path.display(), "Reading virtual file");

        let file = open(path)?;
        Self::read_from(BufReader::new(file)).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to read virtual file");
            e
        })
    }

    /// Reads a virtual file from any byte stream.
    ///
    /// # Errors
    ///
    /// Same as [`Self::read`], minus [`VfError::BadPath`].
    pub fn read_from<R: Read>(mut reader: R) -> VfResult<Self> {
        check_marker(&mut reader)?;

        let mut header_bytes = [0u8; VfHeader::SIZE];
        reader
            .read_exact(&mut header_bytes)
            .map_err(|e| bad_read("header", &e))?;
        let header = VfHeader::from_bytes(&header_bytes);

        let name_len = header.name_table_len().ok_or_else(|| VfError::BadRead {
            section: "name table",
            reason: format!(
                "{} names of {} bytes do not fit in memory",
                header.item_count, header.max_name_len
            ),
        })?;
        let name_buffer = read_block(&mut reader, name_len as u64, "name table")?;
        let buffer = read_block(&mut reader, header.buffer_size, "data")?;

        Self::from_parts(header, name_buffer, buffer)
    }

    /// Saves the virtual file to `path`, replacing any existing file.
    ///
    /// The write is not atomic; a failure may leave a partial file behind.
    ///
    /// # Errors
    ///
    /// * [`VfError::BadPath`] - the file could not be created
    /// * [`VfError::BadWrite`] - a block could not be written
    pub fn save(&self, path: impl AsRef<Path>) -> VfResult<()> {
        let path = path.as_ref();
        tracing::trace!(path = %path.display(), "Saving virtual file");

        let file = File::create(path).map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to open virtual file for writing");
            VfError::BadPath {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;

        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush().map_err(|e| bad_write("data", &e))?;
        Ok(())
    }

    /// Writes the virtual file to any byte sink.
    ///
    /// # Errors
    ///
    /// * [`VfError::BadWrite`] - a block could not be written
    pub fn write_to<W: Write>(&self, mut writer: W) -> VfResult<()> {
        writer
            .write_all(&host_marker())
            .map_err(|e| bad_write("endian marker", &e))?;
        writer
            .write_all(&self.header().to_bytes())
            .map_err(|e| bad_write("header", &e))?;
        writer
            .write_all(self.name_buffer())
            .map_err(|e| bad_write("name table", &e))?;
        writer
            .write_all(self.buffer())
            .map_err(|e| bad_write("data", &e))?;
        Ok(())
    }
}

pub(crate) fn open(path: &Path) -> VfResult<File> {
    File::open(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to open virtual file");
        VfError::BadPath {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    })
}

/// Reads the endian marker and compares it to the host byte order.
pub(crate) fn check_marker<R: Read>(reader: &mut R) -> VfResult<()> {
    let mut marker = [0u8; ENDIAN_MARKER_LEN];
    reader
        .read_exact(&mut marker)
        .map_err(|e| bad_read("endian marker", &e))?;

    if Endianness::from_marker(marker) != Endianness::host() {
        tracing::error!(
            file = ?Endianness::from_marker(marker),
            host = ?Endianness::host(),
            "Virtual file and machine endianness don't match"
        );
        return Err(VfError::EndianMismatch);
    }
    Ok(())
}

/// Reads exactly `len` bytes.
///
/// The buffer grows with the data actually read, so a corrupted length
/// field fails as a short read instead of a giant allocation.
pub(crate) fn read_block<R: Read>(reader: &mut R, len: u64, section: &'static str) -> VfResult<Vec<u8>> {
    let mut block = Vec::new();
    let read = reader
        .by_ref()
        .take(len)
        .read_to_end(&mut block)
        .map_err(|e| bad_read(section, &e))?;

    if read as u64 != len {
        return Err(VfError::BadRead {
            section,
            reason: format!("expected {len} bytes, got {read}"),
        });
    }
    Ok(block)
}

pub(crate) fn bad_read(section: &'static str, e: &std::io::Error) -> VfError {
    VfError::BadRead {
        section,
        reason: e.to_string(),
    }
}

fn bad_write(section: &'static str, e: &std::io::Error) -> VfError {
    VfError::BadWrite {
        section,
        reason: e.to_string(),
    }
}
