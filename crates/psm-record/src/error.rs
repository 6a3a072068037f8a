//! Error types for settings records

/// Errors raised while reading the structure of a settings record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// A location field cannot be decoded
    #[error("malformed location descriptor '{raw}': {reason}")]
    MalformedDescriptor { raw: String, reason: String },

    /// Record length does not fit the prefix plus whole entries
    #[error(
        "misaligned record: {len} fields do not fit a {prefix}-field prefix followed by {width}-field entries"
    )]
    MisalignedRecord {
        len: usize,
        prefix: usize,
        width: usize,
    },
}

impl RecordError {
    #[inline]
    pub(crate) fn malformed(raw: &str, reason: impl Into<String>) -> Self {
        Self::MalformedDescriptor {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    #[inline]
    pub(crate) fn misaligned(len: usize, prefix: usize, width: usize) -> Self {
        Self::MisalignedRecord { len, prefix, width }
    }
}
