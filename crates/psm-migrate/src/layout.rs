//! Persisted layout constants
//!
//! [`LayoutTable`] holds every literal and width the rewrite rules depend on.
//! It is built once (from [`Default`] or a TOML file) and handed to the
//! [`Migrator`](crate::Migrator); nothing reads these values from globals.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::revision::{SchemaRevision, LEGACY_SOURCE_REVISION};

/// Entry widths per revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EntryWidths {
    /// Foreign legacy records
    pub legacy: usize,
    pub v1: usize,
    pub v2: usize,
    pub v3: usize,
    /// Adds the rescale flag
    pub v4: usize,
    /// Adds the load choice and object name
    pub v5: usize,
}

impl Default for EntryWidths {
    fn default() -> Self {
        Self {
            legacy: 2,
            v1: 2,
            v2: 2,
            v3: 2,
            v4: 3,
            v5: 5,
        }
    }
}

/// Conventions of the foreign legacy format and of revision 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LegacyConventions {
    /// Path sentinel meaning the default input folder
    pub default_input_sentinel: char,
    /// Path sentinel meaning the default output folder
    pub default_output_sentinel: char,
    /// Image name marking an entry that is not used
    pub unused_image_name: String,
    /// Revision 1 tag for a custom folder
    pub custom_folder_tag: String,
    /// Revision 1 tag for a custom folder with metadata
    pub custom_with_metadata_tag: String,
    /// Revision 1 prefix for the old default image folder tag
    pub image_folder_alias: String,
}

impl Default for LegacyConventions {
    fn default() -> Self {
        Self {
            default_input_sentinel: '.',
            default_output_sentinel: '&',
            unused_image_name: "Do not use".to_string(),
            custom_folder_tag: "Custom folder".to_string(),
            custom_with_metadata_tag: "Custom with metadata".to_string(),
            image_folder_alias: "Default image".to_string(),
        }
    }
}

/// Literals written into fields added by later revisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldDefaults {
    pub yes: String,
    pub no: String,
    /// Load choice for image data
    pub images_choice: String,
    /// Load choice for label matrices
    pub objects_choice: String,
    pub file_name: String,
    pub image_name: String,
    pub object_name: String,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            yes: "Yes".to_string(),
            no: "No".to_string(),
            images_choice: "Images".to_string(),
            objects_choice: "Objects".to_string(),
            file_name: "None".to_string(),
            image_name: "OrigBlue".to_string(),
            object_name: "Nuclei".to_string(),
        }
    }
}

/// Shape of a record at one revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordShape {
    /// Fixed fields before the repeating tail
    pub prefix: usize,
    /// Fields per file entry
    pub width: usize,
    /// Whether field 0 is a compound `tag|path` location
    pub compound_location: bool,
}

/// Table of layout constants
///
/// [`Migrator::new`](crate::Migrator::new) and the TOML loaders reject a table
/// that fails [`LayoutTable::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutTable {
    pub widths: EntryWidths,
    pub legacy: LegacyConventions,
    pub defaults: FieldDefaults,
}

impl LayoutTable {
    /// Parse from TOML; missing keys keep their defaults
    ///
    /// # Errors
    /// Returns error if the TOML is invalid or the table is inconsistent
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let table: Self = toml::from_str(source)?;
        table.validate()?;
        Ok(table)
    }

    /// Read from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Serialize to TOML
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialization(e.to_string()))
    }

    /// Check the widths agree with what each rewrite adds
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first inconsistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.widths;
        if w.legacy < 2 || w.v1 < 2 {
            return Err(ConfigError::Invalid(
                "legacy and v1 entries need a file name and an image name".to_string(),
            ));
        }
        if w.v1 != w.v2 || w.v2 != w.v3 {
            return Err(ConfigError::Invalid(format!(
                "v1..v3 entry widths must match (got {}, {}, {})",
                w.v1, w.v2, w.v3
            )));
        }
        if w.v4 != w.v3 + 1 {
            return Err(ConfigError::Invalid(format!(
                "v4 entries add one field to v3 (expected {}, got {})",
                w.v3 + 1,
                w.v4
            )));
        }
        if w.v5 != w.v4 + 2 {
            return Err(ConfigError::Invalid(format!(
                "v5 entries add two fields to v4 (expected {}, got {})",
                w.v4 + 2,
                w.v5
            )));
        }
        let l = &self.legacy;
        if l.default_input_sentinel == l.default_output_sentinel {
            return Err(ConfigError::Invalid(
                "default input and output sentinels must differ".to_string(),
            ));
        }
        if self.defaults.yes == self.defaults.no {
            return Err(ConfigError::Invalid("yes and no literals must differ".to_string()));
        }
        if self.defaults.images_choice == self.defaults.objects_choice {
            return Err(ConfigError::Invalid(
                "images and objects choices must differ".to_string(),
            ));
        }
        Ok(())
    }

    /// Shape of a record at `revision`, or `None` for an unsupported pair
    #[must_use]
    pub fn shape(&self, revision: SchemaRevision, legacy: bool) -> Option<RecordShape> {
        let w = &self.widths;
        let (prefix, width, compound_location) = match (revision.number(), legacy) {
            (_, true) if revision == LEGACY_SOURCE_REVISION => (2, w.legacy, false),
            (_, true) => return None,
            (1, false) => (2, w.v1, false),
            (2, false) => (1, w.v2, true),
            (3, false) => (1, w.v3, true),
            (4, false) => (1, w.v4, true),
            (5, false) => (1, w.v5, true),
            _ => return None,
        };
        Some(RecordShape {
            prefix,
            width,
            compound_location,
        })
    }
}

/// Errors loading a layout table
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Layout file unreadable
    #[error("failed to read layout file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Layout TOML invalid
    #[error("invalid layout TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Serialization failed
    #[error("layout serialization failed: {0}")]
    Serialization(String),

    /// Values inconsistent with the rewrite rules
    #[error("invalid layout: {0}")]
    Invalid(String),
}
