//! # Pack Manifest
//!
//! TOML description of a virtual file to build.
//!
//! ```toml
//! version = 3
//! max_name_len = 32
//!
//! [[item]]
//! name = "shader.vert"
//! type = 1
//! file = "shaders/basic.vert"
//!
//! [[item]]
//! name = "greeting"
//! text = "hello"
//! ```
//!
//! `file` paths are relative to the manifest's directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ToolError, ToolResult};

/// Name stride used when the manifest does not set one.
pub const DEFAULT_MAX_NAME_LEN: u32 = 64;

fn default_max_name_len() -> u32 {
    DEFAULT_MAX_NAME_LEN
}

/// A complete pack manifest.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackManifest {
    /// Version written into the file header.
    #[serde(default)]
    pub version: u32,
    /// Name stride of the produced file.
    #[serde(default = "default_max_name_len")]
    pub max_name_len: u32,
    /// Items in output order.
    #[serde(default, rename = "item")]
    pub items: Vec<ManifestItem>,
}

/// One `[[item]]` table.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestItem {
    /// Item name.
    pub name: String,
    /// Caller-defined type tag.
    #[serde(default, rename = "type")]
    pub kind: u32,
    /// File whose bytes become the payload.
    pub file: Option<PathBuf>,
    /// Inline UTF-8 payload.
    pub text: Option<String>,
}

/// Where an item's payload comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemSource<'a> {
    /// Read from a file, relative to the manifest directory.
    File(&'a Path),
    /// Inline text.
    Text(&'a str),
}

impl ManifestItem {
    /// Returns the payload source, requiring exactly one of `file`/`text`.
    ///
    /// # Errors
    ///
    /// [`ToolError::Manifest`] when both or neither are set.
    pub fn source(&self) -> ToolResult<ItemSource<'_>> {
        match (&self.file, &self.text) {
            (Some(file), None) => Ok(ItemSource::File(file)),
            (None, Some(text)) => Ok(ItemSource::Text(text)),
            (Some(_), Some(_)) => Err(ToolError::Manifest(format!(
                "item {:?} sets both `file` and `text`",
                self.name
            ))),
            (None, None) => Err(ToolError::Manifest(format!(
                "item {:?} needs `file` or `text`",
                self.name
            ))),
        }
    }
}

impl PackManifest {
    /// Parses a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the parser error on malformed input.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Loads and validates a manifest file.
    ///
    /// # Errors
    ///
    /// * [`ToolError::Io`] - the file could not be read
    /// * [`ToolError::ManifestSyntax`] - the file is not a valid manifest
    /// * [`ToolError::Manifest`] - see [`Self::validate`]
    pub fn load(path: &Path) -> ToolResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ToolError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_toml_str(&text).map_err(|source| ToolError::ManifestSyntax {
            path: path.to_path_buf(),
            source,
        })?;
        manifest.validate()?;
        tracing::debug!(path = %path.display(), items = manifest.items.len(), "Loaded pack manifest");
        Ok(manifest)
    }

    /// Checks everything that can be checked without touching item files.
    ///
    /// # Errors
    ///
    /// [`ToolError::Manifest`] on a zero stride, a name that does not fit,
    /// a duplicate name, or an item without exactly one payload source.
    pub fn validate(&self) -> ToolResult<()> {
        if self.max_name_len == 0 {
            return Err(ToolError::Manifest("max_name_len must be positive".to_string()));
        }

        let mut seen = HashSet::new();
        for item in &self.items {
            if item.name.len() > self.max_name_len as usize {
                return Err(ToolError::Manifest(format!(
                    "item name {:?} is {} bytes, max_name_len is {}",
                    item.name,
                    item.name.len(),
                    self.max_name_len
                )));
            }
            if !seen.insert(item.name.as_str()) {
                return Err(ToolError::Manifest(format!(
                    "item name {:?} appears twice",
                    item.name
                )));
            }
            item.source()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_manifest() {
        let manifest = PackManifest::from_toml_str(
            r#"
            version = 3
            max_name_len = 32

            [[item]]
            name = "shader.vert"
            type = 1
            file = "shaders/basic.vert"

            [[item]]
            name = "greeting"
            text = "hello"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.version, 3);
        assert_eq!(manifest.max_name_len, 32);
        assert_eq!(manifest.items.len(), 2);
        assert_eq!(
            manifest.items[0].source().unwrap(),
            ItemSource::File(Path::new("shaders/basic.vert"))
        );
        assert_eq!(manifest.items[1].kind, 0);
        assert_eq!(manifest.items[1].source().unwrap(), ItemSource::Text("hello"));
        manifest.validate().unwrap();
    }

    #[test]
    fn test_defaults() {
        let manifest = PackManifest::from_toml_str("").unwrap();
        assert_eq!(manifest.version, 0);
        assert_eq!(manifest.max_name_len, DEFAULT_MAX_NAME_LEN);
        assert!(manifest.items.is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(PackManifest::from_toml_str("compress = true").is_err());
    }

    #[test]
    fn test_validate_rejects_long_name() {
        let manifest = PackManifest::from_toml_str(
            r#"
            max_name_len = 4
            [[item]]
            name = "too_long"
            text = ""
            "#,
        )
        .unwrap();
        assert!(matches!(manifest.validate(), Err(ToolError::Manifest(_))));
    }

    #[test]
    fn test_validate_rejects_duplicates_and_missing_source() {
        let duplicate = PackManifest::from_toml_str(
            r#"
            [[item]]
            name = "a"
            text = "1"
            [[item]]
            name = "a"
            text = "2"
            "#,
        )
        .unwrap();
        assert!(matches!(duplicate.validate(), Err(ToolError::Manifest(_))));

        let no_source = PackManifest::from_toml_str(
            r#"
            [[item]]
            name = "a"
            "#,
        )
        .unwrap();
        assert!(matches!(no_source.validate(), Err(ToolError::Manifest(_))));
    }
}
