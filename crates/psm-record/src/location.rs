//! Location descriptors
//!
//! Provides [`LocationDescriptor`] and its single-field wire form `tag|path`.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Separator between the folder tag and the custom path
pub const TAG_DELIMITER: char = '|';

/// Where a module's files live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FolderChoice {
    /// The pipeline's default input folder
    DefaultInput,
    /// The pipeline's default output folder
    DefaultOutput,
    /// An absolute custom folder
    Absolute,
    /// A custom folder below the default input folder
    DefaultInputSubfolder,
    /// A custom folder below the default output folder
    DefaultOutputSubfolder,
    /// Files addressed by URL
    Url,
}

impl FolderChoice {
    /// Every choice, in persisted tag order
    pub const ALL: [Self; 6] = [
        Self::DefaultInput,
        Self::DefaultOutput,
        Self::Absolute,
        Self::DefaultInputSubfolder,
        Self::DefaultOutputSubfolder,
        Self::Url,
    ];

    /// Persisted tag literal
    #[inline]
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::DefaultInput => "Default Input Folder",
            Self::DefaultOutput => "Default Output Folder",
            Self::Absolute => "Elsewhere...",
            Self::DefaultInputSubfolder => "Default Input Folder sub-folder",
            Self::DefaultOutputSubfolder => "Default Output Folder sub-folder",
            Self::Url => "URL",
        }
    }

    /// Look up a choice by its exact tag literal
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|choice| choice.tag() == tag)
    }

    /// Check if this choice carries a custom path
    #[inline]
    #[must_use]
    pub const fn requires_path(self) -> bool {
        !matches!(self, Self::DefaultInput | Self::DefaultOutput)
    }
}

impl Display for FolderChoice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Folder choice plus the custom path it needs
///
/// # Invariants
/// - `custom_path` is `Some` iff [`FolderChoice::requires_path`]
/// - a [`FolderChoice::Url`] descriptor carries the URL as its path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LocationDescriptor {
    choice: FolderChoice,
    custom_path: Option<String>,
}

impl LocationDescriptor {
    /// Create descriptor; the path is dropped for choices that take none
    #[must_use]
    pub fn new(choice: FolderChoice, custom_path: impl Into<String>) -> Self {
        let custom_path = choice.requires_path().then(|| custom_path.into());
        Self {
            choice,
            custom_path,
        }
    }

    /// Descriptor for a path-less choice
    #[inline]
    #[must_use]
    pub fn bare(choice: FolderChoice) -> Self {
        Self::new(choice, String::new())
    }

    /// The default input folder
    #[inline]
    #[must_use]
    pub fn default_input() -> Self {
        Self::bare(FolderChoice::DefaultInput)
    }

    /// Folder choice
    #[inline]
    #[must_use]
    pub fn choice(&self) -> FolderChoice {
        self.choice
    }

    /// Custom path, if the choice carries one
    #[inline]
    #[must_use]
    pub fn custom_path(&self) -> Option<&str> {
        self.custom_path.as_deref()
    }

    /// Check if files are addressed by URL
    #[inline]
    #[must_use]
    pub fn is_url(&self) -> bool {
        self.choice == FolderChoice::Url
    }

    /// Same choice with a different custom path
    #[inline]
    #[must_use]
    pub fn with_custom_path(&self, custom_path: impl Into<String>) -> Self {
        Self::new(self.choice, custom_path)
    }
}

impl Default for LocationDescriptor {
    fn default() -> Self {
        Self::default_input()
    }
}

impl Display for LocationDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for LocationDescriptor {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// Decode a `tag|path` field
///
/// Text after the delimiter is ignored for choices that take no path.
///
/// # Errors
/// Returns [`RecordError::MalformedDescriptor`] if the delimiter is missing
/// or the tag is unknown.
pub fn decode(raw: &str) -> Result<LocationDescriptor, RecordError> {
    let (tag, path) = raw
        .split_once(TAG_DELIMITER)
        .ok_or_else(|| RecordError::malformed(raw, "missing tag delimiter"))?;
    let choice = FolderChoice::from_tag(tag)
        .ok_or_else(|| RecordError::malformed(raw, format!("unknown folder tag '{tag}'")))?;
    Ok(LocationDescriptor::new(choice, path))
}

/// Encode a descriptor as a single `tag|path` field
#[must_use]
pub fn encode(descriptor: &LocationDescriptor) -> String {
    format!(
        "{}{}{}",
        descriptor.choice.tag(),
        TAG_DELIMITER,
        descriptor.custom_path().unwrap_or_default()
    )
}

/// Exact deprecated spellings, checked before the prefix aliases
const LEGACY_TAG_TRANSLATIONS: [(&str, FolderChoice); 5] = [
    ("Default input directory", FolderChoice::DefaultInput),
    ("Default output directory", FolderChoice::DefaultOutput),
    ("Absolute path elsewhere", FolderChoice::Absolute),
    ("Default input directory sub-folder", FolderChoice::DefaultInputSubfolder),
    ("Default output directory sub-folder", FolderChoice::DefaultOutputSubfolder),
];

const INPUT_ALIAS_PREFIXES: [&str; 2] = ["default image", "default input"];
const OUTPUT_ALIAS_PREFIXES: [&str; 1] = ["default output"];
const SUBFOLDER_SUFFIX: &str = "sub-folder";

/// Rewrite deprecated tag spellings to current tags
///
/// Only the tag is touched; the path after the delimiter is kept verbatim.
/// A value without a delimiter is treated as a bare tag. Exact deprecated
/// spellings are translated first; otherwise a tag starting with
/// `Default Image`, `Default input` or `Default output` (any case) maps to
/// the matching default folder, or to its sub-folder choice when the tag
/// ends in `sub-folder`.
///
/// # Examples
/// - `Default Image Folder|x` → `Default Input Folder|x`
/// - `Default output directory sub-folder|./res` → `Default Output Folder sub-folder|./res`
/// - `Absolute path elsewhere|/data` → `Elsewhere...|/data`
#[must_use]
pub fn upgrade_legacy_tag(raw: &str) -> String {
    let (tag, rest) = match raw.split_once(TAG_DELIMITER) {
        Some((tag, path)) => (tag, Some(path)),
        None => (raw, None),
    };
    let upgraded = canonical_tag(tag);
    match rest {
        Some(path) => format!("{upgraded}{TAG_DELIMITER}{path}"),
        None => upgraded.to_string(),
    }
}

fn canonical_tag(tag: &str) -> &str {
    if FolderChoice::from_tag(tag).is_some() {
        return tag;
    }
    if let Some((_, choice)) = LEGACY_TAG_TRANSLATIONS.iter().find(|(old, _)| *old == tag) {
        return choice.tag();
    }
    let lowered = tag.to_lowercase();
    let subfolder = lowered.trim_end().ends_with(SUBFOLDER_SUFFIX);
    if INPUT_ALIAS_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
        if subfolder {
            FolderChoice::DefaultInputSubfolder.tag()
        } else {
            FolderChoice::DefaultInput.tag()
        }
    } else if OUTPUT_ALIAS_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
        if subfolder {
            FolderChoice::DefaultOutputSubfolder.tag()
        } else {
            FolderChoice::DefaultOutput.tag()
        }
    } else {
        tag
    }
}
