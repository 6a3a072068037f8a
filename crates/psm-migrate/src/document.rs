//! Record documents
//!
//! A [`RecordDocument`] is a settings record together with the revision and
//! origin it was written under, as exchanged in JSON.

use serde::{Deserialize, Serialize};

use psm_record::SettingsRecord;

use crate::driver::Migrator;
use crate::error::MigrationError;
use crate::revision::SchemaRevision;

/// Settings record plus the revision it was saved under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDocument {
    /// Owning module, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub revision: SchemaRevision,
    /// Written by the foreign legacy format
    #[serde(default)]
    pub legacy: bool,
    pub settings: SettingsRecord,
}

impl RecordDocument {
    /// Parse from JSON
    ///
    /// # Errors
    /// Returns error if JSON is invalid or lacks a required key
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty-printed JSON
    ///
    /// # Errors
    /// Returns error if serialization fails (rare for JSON)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Migrate to `target`, producing a non-legacy document
    ///
    /// # Errors
    /// See [`Migrator::migrate`]
    pub fn migrate(self, migrator: &Migrator, target: SchemaRevision) -> Result<Self, MigrationError> {
        let settings = migrator.migrate(self.settings, self.revision, self.legacy, target)?;
        Ok(Self {
            module: self.module,
            revision: target,
            legacy: false,
            settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CURRENT_REVISION;

    #[test]
    fn parses_minimal_document() {
        let doc = RecordDocument::from_json(
            r#"{"revision": 3, "settings": ["Default Input Folder|", "a.tif", "DNA"]}"#,
        )
        .unwrap();
        assert_eq!(doc.revision, SchemaRevision::new(3));
        assert!(!doc.legacy);
        assert!(doc.module.is_none());
        assert_eq!(doc.settings.len(), 3);
    }

    #[test]
    fn missing_settings_rejected() {
        assert!(RecordDocument::from_json(r#"{"revision": 3}"#).is_err());
    }

    #[test]
    fn migrate_clears_legacy_flag() {
        let doc = RecordDocument {
            module: Some("LoadSingleImage".to_string()),
            revision: SchemaRevision::new(4),
            legacy: true,
            settings: SettingsRecord::from(&["", ".", "a.tif", "DNA"][..]),
        };
        let migrated = doc.migrate(&Migrator::default(), CURRENT_REVISION).unwrap();
        assert_eq!(migrated.revision, CURRENT_REVISION);
        assert!(!migrated.legacy);
        assert_eq!(migrated.module.as_deref(), Some("LoadSingleImage"));
        assert_eq!(migrated.settings.len(), 6);
    }

    #[test]
    fn to_json_skips_absent_module() {
        let doc = RecordDocument {
            module: None,
            revision: SchemaRevision::new(5),
            legacy: false,
            settings: SettingsRecord::empty(),
        };
        let json = doc.to_json().unwrap();
        assert!(!json.contains("module"));
        assert_eq!(RecordDocument::from_json(&json).unwrap(), doc);
    }
}
