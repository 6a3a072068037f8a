//! Typed view of a current-revision record
//!
//! [`LoaderSettings`] is what the consumption layer works with once a record
//! has been migrated: one location plus a list of [`FileSpec`] groups.

use psm_record::{
    decode, encode, join, split, upgrade_legacy_tag, FileEntry, LocationDescriptor,
    RecordError, SettingsRecord,
};

use crate::driver::Migrator;
use crate::error::MigrationError;
use crate::layout::LayoutTable;
use crate::revision::SchemaRevision;

/// Whether a file is loaded as image data or as objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadChoice {
    /// Intensity image
    #[default]
    Images,
    /// Label matrix defining objects
    Objects,
}

/// One file to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    /// File name (a URL when the location is URL-based)
    pub file_name: String,
    pub load_as: LoadChoice,
    /// Name given to the image; used only for [`LoadChoice::Images`]
    pub image_name: String,
    /// Rescale by the format's maximum intensity; used only for images
    pub rescale: bool,
    /// Name given to the objects; used only for [`LoadChoice::Objects`]
    pub object_name: String,
}

impl FileSpec {
    /// Defaults for a newly added file
    #[must_use]
    pub fn with_defaults(layout: &LayoutTable) -> Self {
        let defaults = &layout.defaults;
        Self {
            file_name: defaults.file_name.clone(),
            load_as: LoadChoice::Images,
            image_name: defaults.image_name.clone(),
            rescale: true,
            object_name: defaults.object_name.clone(),
        }
    }

    /// Check if this file produces an image
    #[inline]
    #[must_use]
    pub fn wants_images(&self) -> bool {
        self.load_as == LoadChoice::Images
    }

    fn from_entry(index: usize, entry: &FileEntry, layout: &LayoutTable) -> Result<Self, SettingsError> {
        let defaults = &layout.defaults;
        let field = |position: usize| entry.get(position).unwrap_or_default().to_string();

        let choice = field(1);
        let load_as = if choice == defaults.images_choice {
            LoadChoice::Images
        } else if choice == defaults.objects_choice {
            LoadChoice::Objects
        } else {
            return Err(SettingsError::InvalidValue {
                index,
                field: "load choice",
                value: choice,
            });
        };

        let flag = field(3);
        let rescale = if flag == defaults.yes {
            true
        } else if flag == defaults.no {
            false
        } else {
            return Err(SettingsError::InvalidValue {
                index,
                field: "rescale",
                value: flag,
            });
        };

        Ok(Self {
            file_name: field(0),
            load_as,
            image_name: field(2),
            rescale,
            object_name: field(4),
        })
    }

    fn to_entry(&self, layout: &LayoutTable) -> FileEntry {
        let defaults = &layout.defaults;
        let choice = match self.load_as {
            LoadChoice::Images => &defaults.images_choice,
            LoadChoice::Objects => &defaults.objects_choice,
        };
        let flag = if self.rescale { &defaults.yes } else { &defaults.no };
        FileEntry::new(vec![
            self.file_name.clone(),
            choice.clone(),
            self.image_name.clone(),
            flag.clone(),
            self.object_name.clone(),
        ])
    }
}

/// Live configuration of a single-image loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderSettings {
    pub directory: LocationDescriptor,
    pub files: Vec<FileSpec>,
}

impl LoaderSettings {
    /// Default configuration: default input folder, one file
    #[must_use]
    pub fn with_defaults(layout: &LayoutTable) -> Self {
        Self {
            directory: LocationDescriptor::default_input(),
            files: vec![FileSpec::with_defaults(layout)],
        }
    }

    /// Read a record already at [`CURRENT_REVISION`](crate::CURRENT_REVISION)
    ///
    /// # Errors
    /// Returns error if the record is not a valid current-revision record
    pub fn from_record(record: &SettingsRecord, layout: &LayoutTable) -> Result<Self, SettingsError> {
        let width = layout.widths.v5;
        let (prefix, tail) = record.split_prefix(1, width)?;
        let directory = decode(&upgrade_legacy_tag(&prefix[0]))?;
        let files = split(tail, width)?
            .iter()
            .enumerate()
            .map(|(index, entry)| FileSpec::from_entry(index, entry, layout))
            .collect::<Result<_, _>>()?;
        Ok(Self { directory, files })
    }

    /// Migrate a record from any supported revision, then read it
    ///
    /// # Errors
    /// Returns error if migration fails or the result cannot be read
    pub fn load(
        record: SettingsRecord,
        revision: SchemaRevision,
        legacy: bool,
        migrator: &Migrator,
    ) -> Result<Self, SettingsError> {
        let migrated = migrator.migrate_to_current(record, revision, legacy)?;
        Self::from_record(&migrated, migrator.layout())
    }

    /// Serialize in settings order at [`CURRENT_REVISION`](crate::CURRENT_REVISION)
    #[must_use]
    pub fn to_record(&self, layout: &LayoutTable) -> SettingsRecord {
        let entries = self.files.iter().map(|file| file.to_entry(layout)).collect();
        SettingsRecord::from_parts([encode(&self.directory)], join(entries))
    }

    /// Number of file groups a current-revision record of `len` fields holds
    ///
    /// Zero when the layout's entry width is zero.
    #[inline]
    #[must_use]
    pub fn entry_count(len: usize, layout: &LayoutTable) -> usize {
        len.saturating_sub(1)
            .checked_div(layout.widths.v5)
            .unwrap_or_default()
    }

    /// Check if file names are URLs
    #[inline]
    #[must_use]
    pub fn is_url_based(&self) -> bool {
        self.directory.is_url()
    }

    /// Files loaded as images
    pub fn image_files(&self) -> impl Iterator<Item = &FileSpec> {
        self.files.iter().filter(|file| file.wants_images())
    }

    /// Files loaded as objects
    pub fn object_files(&self) -> impl Iterator<Item = &FileSpec> {
        self.files.iter().filter(|file| !file.wants_images())
    }
}

/// Errors reading typed settings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// Record could not be migrated or is structurally invalid
    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// A field holds a literal the layout does not define
    #[error("invalid {field} '{value}' for file {index}")]
    InvalidValue {
        index: usize,
        field: &'static str,
        value: String,
    },
}

impl From<RecordError> for SettingsError {
    fn from(err: RecordError) -> Self {
        Self::Migration(err.into())
    }
}
