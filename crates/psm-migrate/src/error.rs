//! Error types for settings migration
//!
//! Every failure is fatal for the record it concerns. Migration is
//! deterministic, so retrying the same input cannot succeed; the caller
//! either repairs the document or adds support for the revision.

use psm_record::RecordError;

use crate::revision::SchemaRevision;

/// Migration failure for a single record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// A location field cannot be decoded
    #[error("malformed location descriptor '{raw}': {reason}")]
    MalformedDescriptor { raw: String, reason: String },

    /// Record length does not fit the expected prefix and entry width
    #[error(
        "misaligned record: {len} fields do not fit a {prefix}-field prefix followed by {width}-field entries"
    )]
    MisalignedRecord {
        len: usize,
        prefix: usize,
        width: usize,
    },

    /// No rewrite rule for the current revision
    #[error("no rewrite rule from revision {revision} (legacy: {legacy}) toward revision {target}")]
    UnknownRevision {
        revision: SchemaRevision,
        legacy: bool,
        target: SchemaRevision,
    },
}

/// What the caller has to do about a failed record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remedy {
    /// The document is corrupt and must be repaired
    RepairDocument,
    /// The record comes from a revision this build cannot read
    SupportRevision,
}

impl MigrationError {
    /// Check if retrying could succeed
    ///
    /// Always `false`: the same input always fails the same way.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Suggested remedy for this failure
    #[inline]
    #[must_use]
    pub fn remedy(&self) -> Remedy {
        match self {
            Self::MalformedDescriptor { .. } | Self::MisalignedRecord { .. } => {
                Remedy::RepairDocument
            }
            Self::UnknownRevision { .. } => Remedy::SupportRevision,
        }
    }
}

impl From<RecordError> for MigrationError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::MalformedDescriptor { raw, reason } => {
                Self::MalformedDescriptor { raw, reason }
            }
            RecordError::MisalignedRecord { len, prefix, width } => {
                Self::MisalignedRecord { len, prefix, width }
            }
        }
    }
}
