//! Schema revisions

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Field-layout revision of a settings record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRevision(u32);

impl SchemaRevision {
    /// Create revision from its persisted number
    #[inline]
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// Persisted number
    #[inline]
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0
    }
}

impl Display for SchemaRevision {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SchemaRevision {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

/// Revision the current code reads and writes
pub const CURRENT_REVISION: SchemaRevision = SchemaRevision::new(5);

/// Revision number carried by records from the foreign legacy format
pub const LEGACY_SOURCE_REVISION: SchemaRevision = SchemaRevision::new(4);
