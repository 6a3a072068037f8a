//! Revision rewrite rules
//!
//! Provides [`RewriteRule`], one variant per adjacent revision pair. Each
//! rule is a pure function from a record at its source revision to a new
//! record at its target revision.

use std::fmt::{self, Display, Formatter};

use psm_record::{
    decode, encode, join, reshape, split, upgrade_legacy_tag, FileEntry, FolderChoice,
    LocationDescriptor, SettingsRecord,
};

use crate::error::MigrationError;
use crate::layout::{LayoutTable, RecordShape};
use crate::revision::{SchemaRevision, LEGACY_SOURCE_REVISION};

/// Position of the file name in every entry revision
const FILE_NAME: usize = 0;
/// Position of the image name in legacy through v4 entries
const IMAGE_NAME: usize = 1;

/// One step of the revision chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewriteRule {
    /// Foreign legacy format to revision 1
    LegacyToV1,
    /// Compound location field
    V1ToV2,
    /// URL entries absorb the base path
    V2ToV3,
    /// Rescale flag per entry
    V3ToV4,
    /// Image/objects choice and object name per entry
    V4ToV5,
}

impl RewriteRule {
    /// Every rule, in historical order
    pub const CHAIN: [Self; 5] = [
        Self::LegacyToV1,
        Self::V1ToV2,
        Self::V2ToV3,
        Self::V3ToV4,
        Self::V4ToV5,
    ];

    /// Revision and legacy flag this rule reads
    #[must_use]
    pub const fn source(self) -> (SchemaRevision, bool) {
        match self {
            Self::LegacyToV1 => (LEGACY_SOURCE_REVISION, true),
            Self::V1ToV2 => (SchemaRevision::new(1), false),
            Self::V2ToV3 => (SchemaRevision::new(2), false),
            Self::V3ToV4 => (SchemaRevision::new(3), false),
            Self::V4ToV5 => (SchemaRevision::new(4), false),
        }
    }

    /// Revision this rule writes; the result is never legacy
    #[must_use]
    pub const fn target(self) -> SchemaRevision {
        match self {
            Self::LegacyToV1 => SchemaRevision::new(1),
            Self::V1ToV2 => SchemaRevision::new(2),
            Self::V2ToV3 => SchemaRevision::new(3),
            Self::V3ToV4 => SchemaRevision::new(4),
            Self::V4ToV5 => SchemaRevision::new(5),
        }
    }

    /// The single rule registered for `(revision, legacy)`
    #[must_use]
    pub fn for_source(revision: SchemaRevision, legacy: bool) -> Option<Self> {
        Self::CHAIN
            .into_iter()
            .find(|rule| rule.source() == (revision, legacy))
    }

    /// Short description for logs
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::LegacyToV1 => "explicit folder tag, drop unused legacy entries",
            Self::V1ToV2 => "encode folder tag and path as one location field",
            Self::V2ToV3 => "fold URL base path into file names",
            Self::V3ToV4 => "add rescale flag to each file",
            Self::V4ToV5 => "add image/objects choice and object name to each file",
        }
    }

    /// Rewrite `record` from this rule's source revision to its target
    ///
    /// # Errors
    /// - [`MigrationError::MisalignedRecord`] if the record does not have the
    ///   source revision's shape
    /// - [`MigrationError::MalformedDescriptor`] if the location cannot be read
    pub fn apply(
        self,
        record: &SettingsRecord,
        layout: &LayoutTable,
    ) -> Result<SettingsRecord, MigrationError> {
        let (revision, legacy) = self.source();
        let shape = layout
            .shape(revision, legacy)
            .ok_or(MigrationError::UnknownRevision {
                revision,
                legacy,
                target: self.target(),
            })?;
        match self {
            Self::LegacyToV1 => legacy_to_v1(record, shape, layout),
            Self::V1ToV2 => v1_to_v2(record, shape, layout),
            Self::V2ToV3 => v2_to_v3(record, shape),
            Self::V3ToV4 => v3_to_v4(record, shape, layout),
            Self::V4ToV5 => v4_to_v5(record, shape, layout),
        }
    }
}

impl Display for RewriteRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (revision, legacy) = self.source();
        if legacy {
            write!(f, "legacy {revision} -> {}", self.target())
        } else {
            write!(f, "{revision} -> {}", self.target())
        }
    }
}

fn is_sentinel(field: &str, sentinel: char) -> bool {
    let mut chars = field.chars();
    chars.next() == Some(sentinel) && chars.next().is_none()
}

fn legacy_to_v1(
    record: &SettingsRecord,
    shape: RecordShape,
    layout: &LayoutTable,
) -> Result<SettingsRecord, MigrationError> {
    let conventions = &layout.legacy;
    let (prefix, tail) = record.split_prefix(shape.prefix, shape.width)?;
    let path = &prefix[1];

    let tag = if is_sentinel(path, conventions.default_input_sentinel) {
        FolderChoice::DefaultInput.tag()
    } else if is_sentinel(path, conventions.default_output_sentinel) {
        FolderChoice::DefaultOutput.tag()
    } else {
        conventions.custom_folder_tag.as_str()
    };

    let mut entries = split(tail, shape.width)?;
    let before = entries.len();
    entries.retain(|entry| entry.get(IMAGE_NAME) != Some(conventions.unused_image_name.as_str()));
    let dropped = before - entries.len();
    if dropped > 0 {
        tracing::warn!(
            "Dropped {} legacy file entries marked '{}'",
            dropped,
            conventions.unused_image_name
        );
    }

    Ok(SettingsRecord::from_parts(
        [tag.to_string(), path.clone()],
        join(entries),
    ))
}

fn custom_folder(path: &str, layout: &LayoutTable) -> LocationDescriptor {
    let conventions = &layout.legacy;
    if path.starts_with(conventions.default_input_sentinel) {
        LocationDescriptor::new(FolderChoice::DefaultInputSubfolder, path)
    } else if let Some(rest) = path.strip_prefix(conventions.default_output_sentinel) {
        LocationDescriptor::new(FolderChoice::DefaultOutputSubfolder, format!(".{rest}"))
    } else {
        LocationDescriptor::new(FolderChoice::Absolute, path)
    }
}

fn v1_to_v2(
    record: &SettingsRecord,
    shape: RecordShape,
    layout: &LayoutTable,
) -> Result<SettingsRecord, MigrationError> {
    let conventions = &layout.legacy;
    let (prefix, tail) = record.split_prefix(shape.prefix, shape.width)?;
    let (tag, path) = (prefix[0].as_str(), prefix[1].as_str());

    let alias = conventions.image_folder_alias.to_lowercase();
    let is_custom =
        tag == conventions.custom_folder_tag || tag == conventions.custom_with_metadata_tag;
    let descriptor = if is_custom {
        custom_folder(path, layout)
    } else if let Some(choice) = FolderChoice::from_tag(&upgrade_legacy_tag(tag)) {
        LocationDescriptor::new(choice, path)
    } else if tag.to_lowercase().starts_with(&alias) {
        LocationDescriptor::new(FolderChoice::DefaultInput, path)
    } else {
        return Err(MigrationError::MalformedDescriptor {
            raw: tag.to_string(),
            reason: format!("unknown revision 1 folder tag '{tag}'"),
        });
    };

    Ok(SettingsRecord::from_parts(
        [encode(&descriptor)],
        tail.to_vec(),
    ))
}

fn v2_to_v3(record: &SettingsRecord, shape: RecordShape) -> Result<SettingsRecord, MigrationError> {
    let (prefix, tail) = record.split_prefix(shape.prefix, shape.width)?;
    let descriptor = decode(&upgrade_legacy_tag(&prefix[0]))?;
    if !descriptor.is_url() {
        return Ok(record.clone());
    }

    let base = descriptor.custom_path().unwrap_or_default().to_string();
    let entries = reshape(split(tail, shape.width)?, shape.width, shape.width, |entry| {
        let file_name = format!("{base}/{}", entry.get(FILE_NAME).unwrap_or_default());
        entry.with_field(FILE_NAME, file_name)
    })?;

    Ok(SettingsRecord::from_parts(
        [encode(&descriptor.with_custom_path(""))],
        join(entries),
    ))
}

fn v3_to_v4(
    record: &SettingsRecord,
    shape: RecordShape,
    layout: &LayoutTable,
) -> Result<SettingsRecord, MigrationError> {
    let (prefix, tail) = record.split_prefix(shape.prefix, shape.width)?;
    let entries = reshape(
        split(tail, shape.width)?,
        shape.width,
        layout.widths.v4,
        |entry| {
            let mut fields = entry.into_fields();
            fields.push(layout.defaults.yes.clone());
            FileEntry::new(fields)
        },
    )?;
    Ok(SettingsRecord::from_parts(prefix.to_vec(), join(entries)))
}

fn v4_to_v5(
    record: &SettingsRecord,
    shape: RecordShape,
    layout: &LayoutTable,
) -> Result<SettingsRecord, MigrationError> {
    let (prefix, tail) = record.split_prefix(shape.prefix, shape.width)?;
    let entries = reshape(
        split(tail, shape.width)?,
        shape.width,
        layout.widths.v5,
        |entry| {
            let mut fields = entry.into_fields();
            // {file, image, rescale} -> {file, choice, image, rescale, object}
            fields.insert(FILE_NAME + 1, layout.defaults.images_choice.clone());
            fields.push(layout.defaults.object_name.clone());
            FileEntry::new(fields)
        },
    )?;
    Ok(SettingsRecord::from_parts(prefix.to_vec(), join(entries)))
}
