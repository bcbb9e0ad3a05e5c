//! # Commands
//!
//! One function per `hvf` subcommand. Each reads its inputs, performs the
//! operation through [`hogl_vf::VirtualFile`] and writes its outputs; the
//! binary only parses arguments and reports errors.

use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};

use hogl_vf::VirtualFile;

use crate::error::{ToolError, ToolResult};
use crate::manifest::{ItemSource, PackManifest};

/// Totals of a finished pack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackSummary {
    /// Number of items written.
    pub items: u64,
    /// Size of the data region.
    pub buffer_size: u64,
}

/// Builds a virtual file from the manifest at `manifest_path` and saves it to `out`.
///
/// # Errors
///
/// Manifest, input file and virtual file errors; nothing is written to
/// `out` unless every item was loaded.
pub fn pack(manifest_path: &Path, out: &Path) -> ToolResult<PackSummary> {
    let manifest = PackManifest::load(manifest_path)?;
    let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));

    let mut vf = VirtualFile::new(manifest.version, manifest.max_name_len);
    for item in &manifest.items {
        let data: Cow<'_, [u8]> = match item.source()? {
            ItemSource::File(file) => {
                let path = base.join(file);
                let bytes = std::fs::read(&path).map_err(|source| ToolError::Io { path, source })?;
                Cow::Owned(bytes)
            }
            ItemSource::Text(text) => Cow::Borrowed(text.as_bytes()),
        };
        vf.add_item(&item.name, item.kind, &data)?;
    }

    vf.save(out)?;
    tracing::info!(out = %out.display(), items = vf.item_count(), "Packed virtual file");

    Ok(PackSummary {
        items: vf.item_count(),
        buffer_size: vf.buffer_size(),
    })
}

/// Writes a human-readable listing of `path` to `out`.
///
/// # Errors
///
/// Virtual file errors, or [`ToolError::Io`] when `out` fails.
pub fn list(path: &Path, out: &mut impl Write) -> ToolResult<()> {
    let vf = VirtualFile::read(path)?;
    let stdout_err = |source| ToolError::Io {
        path: PathBuf::from("<output>"),
        source,
    };

    writeln!(out, "{}", path.display()).map_err(stdout_err)?;
    writeln!(
        out,
        "version {}  items {}  data {} bytes  name stride {}",
        vf.version(),
        vf.item_count(),
        vf.buffer_size(),
        vf.max_name_len()
    )
    .map_err(stdout_err)?;

    for item in vf.items()? {
        writeln!(
            out,
            "{:>5}  {:<width$}  type {:>5}  {:>10} bytes",
            item.index,
            item.name_lossy(),
            item.kind,
            item.len(),
            width = vf.max_name_len() as usize
        )
        .map_err(stdout_err)?;
    }
    Ok(())
}

/// Writes the payload of the item named `name` to `out`.
///
/// # Errors
///
/// [`hogl_vf::VfError::VfBadName`] if no such item exists, plus the usual
/// read/write errors.
pub fn extract(path: &Path, name: &str, out: &Path) -> ToolResult<u64> {
    let vf = VirtualFile::read(path)?;
    let index = vf.get_item_index(name)?;
    let data = vf.map_item(index)?;

    std::fs::write(out, data).map_err(|source| ToolError::Io {
        path: out.to_path_buf(),
        source,
    })?;
    tracing::info!(item = name, out = %out.display(), "Extracted item");
    Ok(data.len() as u64)
}

/// Renames item `index` of the file at `path` in place.
///
/// # Errors
///
/// Virtual file errors, including a name that does not fit the stride.
pub fn rename(path: &Path, index: usize, new_name: &str) -> ToolResult<()> {
    let mut vf = VirtualFile::read(path)?;
    vf.rename_item(index, new_name)?;
    vf.save(path)?;
    Ok(())
}

/// Changes the name stride of the file at `path` in place.
///
/// # Errors
///
/// Virtual file errors.
pub fn restride(path: &Path, new_len: u32) -> ToolResult<()> {
    let mut vf = VirtualFile::read(path)?;
    let truncated = vf
        .items()?
        .filter(|item| item.name.len() > new_len as usize)
        .count();
    if truncated > 0 {
        tracing::warn!(truncated, new_len, "Shrinking stride truncates item names");
    }
    vf.change_name_len(new_len)?;
    vf.save(path)?;
    Ok(())
}

/// Converts a legacy-layout file to the current layout.
///
/// # Errors
///
/// Virtual file errors.
pub fn upgrade(legacy: &Path, out: &Path) -> ToolResult<u64> {
    let vf = VirtualFile::read_legacy(legacy)?;
    vf.save(out)?;
    tracing::info!(out = %out.display(), items = vf.item_count(), "Upgraded virtual file");
    Ok(vf.item_count())
}
