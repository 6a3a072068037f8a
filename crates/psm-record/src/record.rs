//! Settings records
//!
//! Provides [`SettingsRecord`], the flat field sequence a module persists.

use std::fmt::{self, Display, Formatter};
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Ordered sequence of string-valued settings fields
///
/// Field meaning is positional: a fixed prefix followed by a tail of
/// fixed-width repeated entries. Rewrites build a new record rather than
/// editing one in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsRecord(Vec<String>);

impl SettingsRecord {
    /// Create new record from fields
    #[inline]
    #[must_use]
    pub fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    /// Record with no fields
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Get one field
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if record has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split into the fixed prefix and the repeating tail
    ///
    /// # Errors
    /// Returns [`RecordError::MisalignedRecord`] if the record is shorter than
    /// `prefix` or the tail is not a whole number of `width`-field entries.
    pub fn split_prefix(
        &self,
        prefix: usize,
        width: usize,
    ) -> Result<(&[String], &[String]), RecordError> {
        if self.0.len() < prefix || width == 0 || (self.0.len() - prefix) % width != 0 {
            return Err(RecordError::misaligned(self.0.len(), prefix, width));
        }
        Ok(self.0.split_at(prefix))
    }

    /// Build a record from a prefix and a tail
    #[must_use]
    pub fn from_parts(prefix: impl IntoIterator<Item = String>, tail: Vec<String>) -> Self {
        let mut fields: Vec<String> = prefix.into_iter().collect();
        fields.extend(tail);
        Self(fields)
    }

    /// Iterator over fields
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Take ownership of the fields
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Index<usize> for SettingsRecord {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Display for SettingsRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl From<Vec<String>> for SettingsRecord {
    fn from(fields: Vec<String>) -> Self {
        Self(fields)
    }
}

impl From<&[&str]> for SettingsRecord {
    fn from(fields: &[&str]) -> Self {
        Self(fields.iter().map(|f| (*f).to_string()).collect())
    }
}

impl<S: Into<String>> FromIterator<S> for SettingsRecord {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> SettingsRecord {
        SettingsRecord::from(fields)
    }

    #[test]
    fn record_accessors() {
        let r = record(&["a", "b", "c"]);
        assert_eq!(r.len(), 3);
        assert_eq!(r.get(1), Some("b"));
        assert_eq!(r.get(3), None);
        assert_eq!(&r[2], "c");
        assert!(!r.is_empty());
        assert!(SettingsRecord::empty().is_empty());
    }

    #[test]
    fn split_prefix_ok() {
        let r = record(&["dir", "f1", "n1", "f2", "n2"]);
        let (prefix, tail) = r.split_prefix(1, 2).unwrap();
        assert_eq!(prefix, &["dir"]);
        assert_eq!(tail.len(), 4);
    }

    #[test]
    fn split_prefix_empty_tail() {
        let r = record(&["dir"]);
        let (_, tail) = r.split_prefix(1, 5).unwrap();
        assert!(tail.is_empty());
    }

    #[test]
    fn split_prefix_misaligned_tail() {
        let r = record(&["dir", "f1", "n1", "f2"]);
        let result = r.split_prefix(1, 2);
        assert_eq!(
            result,
            Err(RecordError::MisalignedRecord {
                len: 4,
                prefix: 1,
                width: 2
            })
        );
    }

    #[test]
    fn split_prefix_too_short() {
        let r = record(&["only"]);
        assert!(matches!(
            r.split_prefix(2, 2),
            Err(RecordError::MisalignedRecord { len: 1, .. })
        ));
    }

    #[test]
    fn from_parts_concatenates() {
        let r = SettingsRecord::from_parts(["dir".to_string()], vec!["f".into(), "n".into()]);
        assert_eq!(r, record(&["dir", "f", "n"]));
    }

    #[test]
    fn serializes_as_plain_array() {
        let r = record(&["x", "y"]);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"["x","y"]"#);
        let back: SettingsRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn display_lists_fields() {
        assert_eq!(record(&["a", "b"]).to_string(), "[a, b]");
    }
}
