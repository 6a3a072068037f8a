//! Migration driver
//!
//! Provides [`Migrator`], which walks a record from any supported revision
//! to a target revision one [`RewriteRule`] at a time.

use psm_record::{decode, upgrade_legacy_tag, SettingsRecord};

use crate::error::MigrationError;
use crate::layout::{ConfigError, LayoutTable};
use crate::revision::{SchemaRevision, CURRENT_REVISION};
use crate::rules::RewriteRule;

/// Applies the rewrite chain under one layout table
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Migrator {
    layout: LayoutTable,
}

impl Migrator {
    /// Create migrator over a validated layout table
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] if the table fails
    /// [`LayoutTable::validate`]
    pub fn new(layout: LayoutTable) -> Result<Self, ConfigError> {
        layout.validate()?;
        Ok(Self { layout })
    }

    /// Layout table in use
    #[inline]
    #[must_use]
    pub fn layout(&self) -> &LayoutTable {
        &self.layout
    }

    /// Rules `migrate` would apply, in order
    ///
    /// # Errors
    /// Returns [`MigrationError::UnknownRevision`] if some step has no rule or
    /// the only rule would move past `target`.
    pub fn plan(
        &self,
        source: SchemaRevision,
        legacy: bool,
        target: SchemaRevision,
    ) -> Result<Vec<RewriteRule>, MigrationError> {
        let mut steps = Vec::new();
        let (mut revision, mut is_legacy) = (source, legacy);
        while (revision, is_legacy) != (target, false) {
            let rule = RewriteRule::for_source(revision, is_legacy)
                .filter(|rule| rule.target() <= target)
                .ok_or(MigrationError::UnknownRevision {
                    revision,
                    legacy: is_legacy,
                    target,
                })?;
            steps.push(rule);
            revision = rule.target();
            is_legacy = false;
        }
        Ok(steps)
    }

    /// Rewrite `record` from `source` to `target`
    ///
    /// At the fixed point (`source == target`, not legacy) this only checks
    /// the record and standardizes its location tag, so repeating it changes
    /// nothing.
    ///
    /// # Errors
    /// - [`MigrationError::UnknownRevision`] if no rule path reaches `target`
    /// - [`MigrationError::MisalignedRecord`] if the record's length does not
    ///   match its revision
    /// - [`MigrationError::MalformedDescriptor`] if the location field is
    ///   unreadable
    pub fn migrate(
        &self,
        record: SettingsRecord,
        source: SchemaRevision,
        legacy: bool,
        target: SchemaRevision,
    ) -> Result<SettingsRecord, MigrationError> {
        let steps = self.plan(source, legacy, target)?;
        self.check_shape(&record, source, legacy, target)?;

        let mut current = record;
        for rule in steps {
            let next = rule.apply(&current, &self.layout)?;
            self.check_shape(&next, rule.target(), false, target)?;
            tracing::debug!(
                "Applied rewrite {} ({}): {} -> {} fields",
                rule,
                rule.describe(),
                current.len(),
                next.len()
            );
            current = next;
        }

        Ok(self.standardize_location(current, target))
    }

    /// Rewrite `record` to [`CURRENT_REVISION`]
    ///
    /// # Errors
    /// See [`Migrator::migrate`]
    #[inline]
    pub fn migrate_to_current(
        &self,
        record: SettingsRecord,
        source: SchemaRevision,
        legacy: bool,
    ) -> Result<SettingsRecord, MigrationError> {
        self.migrate(record, source, legacy, CURRENT_REVISION)
    }

    fn check_shape(
        &self,
        record: &SettingsRecord,
        revision: SchemaRevision,
        legacy: bool,
        target: SchemaRevision,
    ) -> Result<(), MigrationError> {
        let shape = self
            .layout
            .shape(revision, legacy)
            .ok_or(MigrationError::UnknownRevision {
                revision,
                legacy,
                target,
            })?;
        let (prefix, _) = record.split_prefix(shape.prefix, shape.width)?;
        if shape.compound_location {
            decode(&upgrade_legacy_tag(&prefix[0]))?;
        }
        Ok(())
    }

    fn standardize_location(&self, record: SettingsRecord, revision: SchemaRevision) -> SettingsRecord {
        let compound = self
            .layout
            .shape(revision, false)
            .is_some_and(|shape| shape.compound_location);
        if !compound {
            return record;
        }
        let mut fields = record.into_inner();
        if let Some(location) = fields.first_mut() {
            *location = upgrade_legacy_tag(location);
        }
        SettingsRecord::new(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> SettingsRecord {
        SettingsRecord::from(fields)
    }

    fn rev(number: u32) -> SchemaRevision {
        SchemaRevision::new(number)
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn engine_types_are_send_sync() {
        assert_send_sync::<LayoutTable>();
        assert_send_sync::<Migrator>();
        assert_send_sync::<RewriteRule>();
    }

    #[test]
    fn new_rejects_inconsistent_layout() {
        let mut layout = LayoutTable::default();
        layout.widths.v5 = 0;
        assert!(matches!(Migrator::new(layout), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn new_accepts_default_layout() {
        let migrator = Migrator::new(LayoutTable::default()).unwrap();
        assert_eq!(migrator.layout(), &LayoutTable::default());
    }

    #[test]
    fn plan_from_legacy() {
        let plan = Migrator::default().plan(rev(4), true, CURRENT_REVISION).unwrap();
        assert_eq!(plan, RewriteRule::CHAIN.to_vec());
    }

    #[test]
    fn plan_from_v3() {
        let plan = Migrator::default().plan(rev(3), false, rev(5)).unwrap();
        assert_eq!(plan, vec![RewriteRule::V3ToV4, RewriteRule::V4ToV5]);
    }

    #[test]
    fn plan_at_fixed_point_is_empty() {
        assert!(Migrator::default().plan(rev(5), false, rev(5)).unwrap().is_empty());
    }

    #[test]
    fn plan_to_intermediate_target() {
        let plan = Migrator::default().plan(rev(1), false, rev(3)).unwrap();
        assert_eq!(plan, vec![RewriteRule::V1ToV2, RewriteRule::V2ToV3]);
    }

    #[test]
    fn plan_from_future_revision() {
        let result = Migrator::default().plan(rev(6), false, rev(5));
        assert_eq!(
            result,
            Err(MigrationError::UnknownRevision {
                revision: rev(6),
                legacy: false,
                target: rev(5)
            })
        );
    }

    #[test]
    fn plan_never_moves_backwards() {
        let result = Migrator::default().plan(rev(5), false, rev(3));
        assert!(matches!(result, Err(MigrationError::UnknownRevision { .. })));
    }

    #[test]
    fn plan_unknown_legacy_revision() {
        let result = Migrator::default().plan(rev(3), true, rev(5));
        assert!(matches!(
            result,
            Err(MigrationError::UnknownRevision { legacy: true, .. })
        ));
    }

    #[test]
    fn migrate_v4_record() {
        let out = Migrator::default()
            .migrate_to_current(record(&["Default Input Folder|", "img.tif", "OrigBlue", "Yes"]), rev(4), false)
            .unwrap();
        assert_eq!(
            out,
            record(&["Default Input Folder|", "img.tif", "Images", "OrigBlue", "Yes", "Nuclei"])
        );
    }

    #[test]
    fn migrate_standardizes_tag_at_fixed_point() {
        let out = Migrator::default()
            .migrate_to_current(
                record(&["Default Image Folder|", "img.tif", "Images", "OrigBlue", "Yes", "Nuclei"]),
                rev(5),
                false,
            )
            .unwrap();
        assert_eq!(&out[0], "Default Input Folder|");
    }

    #[test]
    fn migrate_rejects_misaligned_input() {
        let fields = ["Default Input Folder|", "a", "b", "c", "d", "e", "f", "g"];
        let result = Migrator::default().migrate_to_current(record(&fields), rev(5), false);
        assert_eq!(
            result,
            Err(MigrationError::MisalignedRecord {
                len: 8,
                prefix: 1,
                width: 5
            })
        );
    }

    #[test]
    fn migrate_rejects_malformed_location_at_fixed_point() {
        let result = Migrator::default().migrate_to_current(record(&["garbage"]), rev(5), false);
        assert!(matches!(result, Err(MigrationError::MalformedDescriptor { .. })));
    }

    #[test]
    fn migrate_to_revision_one_keeps_split_prefix() {
        let out = Migrator::default()
            .migrate(record(&["", "&", "a.tif", "DNA"]), rev(4), true, rev(1))
            .unwrap();
        assert_eq!(out, record(&["Default Output Folder", "&", "a.tif", "DNA"]));
    }
}
