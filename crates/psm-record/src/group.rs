//! Repeating file-entry groups
//!
//! A record's tail is a run of fixed-width [`FileEntry`] tuples. [`split`],
//! [`reshape`] and [`join`] convert between the flat tail and typed entries
//! so rewrites never do index arithmetic on the raw field list.

use crate::error::RecordError;

/// One fixed-width repeated sub-record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileEntry(Vec<String>);

impl FileEntry {
    /// Create new entry from fields
    #[inline]
    #[must_use]
    pub fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.0.len()
    }

    /// Get one field
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Replace one field, returning the entry
    ///
    /// Out-of-range indices leave the entry unchanged.
    #[must_use]
    pub fn with_field(mut self, index: usize, value: impl Into<String>) -> Self {
        if let Some(field) = self.0.get_mut(index) {
            *field = value.into();
        }
        self
    }

    /// Take ownership of the fields
    #[inline]
    #[must_use]
    pub fn into_fields(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for FileEntry {
    fn from(fields: Vec<String>) -> Self {
        Self(fields)
    }
}

impl<const N: usize> From<[&str; N]> for FileEntry {
    fn from(fields: [&str; N]) -> Self {
        Self(fields.iter().map(|f| (*f).to_string()).collect())
    }
}

/// Cut a flat tail into `width`-field entries
///
/// # Errors
/// Returns [`RecordError::MisalignedRecord`] if `width` is zero or does not
/// divide the tail length.
pub fn split(tail: &[String], width: usize) -> Result<Vec<FileEntry>, RecordError> {
    if width == 0 || tail.len() % width != 0 {
        return Err(RecordError::misaligned(tail.len(), 0, width));
    }
    Ok(tail
        .chunks_exact(width)
        .map(|chunk| FileEntry(chunk.to_vec()))
        .collect())
}

/// Concatenate entries back into a flat tail
#[must_use]
pub fn join(entries: Vec<FileEntry>) -> Vec<String> {
    entries.into_iter().flat_map(FileEntry::into_fields).collect()
}

/// Rebuild every entry with a revision-specific inserter
///
/// # Errors
/// Returns [`RecordError::MisalignedRecord`] if an input entry is not
/// `old_width` wide or the inserter yields an entry that is not `new_width`
/// wide.
pub fn reshape<F>(
    entries: Vec<FileEntry>,
    old_width: usize,
    new_width: usize,
    mut inserter: F,
) -> Result<Vec<FileEntry>, RecordError>
where
    F: FnMut(FileEntry) -> FileEntry,
{
    let total = entries.len();
    entries
        .into_iter()
        .map(|entry| {
            if entry.width() != old_width {
                return Err(RecordError::misaligned(total * old_width, 0, old_width));
            }
            let rebuilt = inserter(entry);
            if rebuilt.width() == new_width {
                Ok(rebuilt)
            } else {
                Err(RecordError::misaligned(total * new_width, 0, new_width))
            }
        })
        .collect()
}
