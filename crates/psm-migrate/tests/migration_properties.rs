use proptest::prelude::*;
use psm_migrate::{Migrator, SchemaRevision, CURRENT_REVISION, LEGACY_SOURCE_REVISION};
use psm_record::{encode, split, FolderChoice, LocationDescriptor, SettingsRecord};
use psm_test_utils::{as_pairs, legacy_record, v1_record, UNUSED};

fn any_choice() -> impl Strategy<Value = FolderChoice> {
    proptest::sample::select(FolderChoice::ALL.to_vec())
}

fn location() -> impl Strategy<Value = String> {
    (any_choice(), "[a-z/.]{0,8}").prop_map(|(choice, path)| encode(&LocationDescriptor::new(choice, path)))
}

fn v5_record() -> impl Strategy<Value = SettingsRecord> {
    (location(), 0..4usize).prop_flat_map(|(location, count)| {
        proptest::collection::vec("[A-Za-z0-9.]{0,6}", count * 5)
            .prop_map(move |tail| SettingsRecord::from_parts([location.clone()], tail))
    })
}

fn image_name() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(UNUSED.to_string()),
        3 => "[A-Z][a-z]{0,5}",
    ]
}

fn legacy_entries() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::vec(("[a-z]{1,5}\\.tif", image_name()), 0..6)
}

fn v1_tag() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(vec![
        "Default Input Folder",
        "Default Output Folder",
        "Default Image Folder",
        "Custom folder",
        "Custom with metadata",
        "URL",
    ])
}

proptest! {
    #[test]
    fn prop_current_revision_is_fixed_point(record in v5_record()) {
        let migrator = Migrator::default();
        let once = migrator.migrate_to_current(record, CURRENT_REVISION, false).unwrap();
        let twice = migrator.migrate_to_current(once.clone(), CURRENT_REVISION, false).unwrap();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_migrated_legacy_is_aligned(path in "[a-z./&]{0,6}", entries in legacy_entries()) {
        let out = Migrator::default()
            .migrate_to_current(legacy_record(&path, &as_pairs(&entries)), LEGACY_SOURCE_REVISION, true)
            .unwrap();
        prop_assert_eq!((out.len() - 1) % 5, 0);
    }

    #[test]
    fn prop_legacy_drops_exactly_unused_entries(path in "[a-z./&]{0,6}", entries in legacy_entries()) {
        let out = Migrator::default()
            .migrate_to_current(legacy_record(&path, &as_pairs(&entries)), LEGACY_SOURCE_REVISION, true)
            .unwrap();
        let kept: Vec<(String, String)> = entries
            .iter()
            .filter(|(_, image)| image != UNUSED)
            .cloned()
            .collect();

        let (_, tail) = out.split_prefix(1, 5).unwrap();
        let migrated: Vec<(String, String)> = split(tail, 5)
            .unwrap()
            .into_iter()
            .map(|entry| {
                let fields = entry.into_fields();
                (fields[0].clone(), fields[2].clone())
            })
            .collect();
        prop_assert_eq!(migrated, kept);
    }

    #[test]
    fn prop_non_legacy_chain_keeps_entry_count(
        tag in v1_tag(),
        path in "[a-z./&]{0,6}",
        entries in proptest::collection::vec(("[a-z]{1,5}", "[A-Z][a-z ]{0,9}"), 0..6),
    ) {
        let out = Migrator::default()
            .migrate_to_current(v1_record(tag, &path, &as_pairs(&entries)), SchemaRevision::new(1), false)
            .unwrap();
        prop_assert_eq!(out.len(), 1 + 5 * entries.len());
    }

    #[test]
    fn prop_migration_is_idempotent_from_any_revision(
        revision in 1u32..=5,
        entries in proptest::collection::vec(("[a-z]{1,5}", "[A-Z][a-z]{0,5}"), 0..4),
    ) {
        let migrator = Migrator::default();
        let layout = migrator.layout();
        let width = layout
            .shape(SchemaRevision::new(revision), false)
            .map(|shape| shape.width)
            .unwrap();
        let mut tail = Vec::new();
        for (file, image) in &entries {
            tail.push(file.clone());
            tail.push(image.clone());
            tail.extend(std::iter::repeat(layout.defaults.yes.clone()).take(width - 2));
        }
        let record = if revision == 1 {
            SettingsRecord::from_parts(["Default Input Folder".to_string(), ".".to_string()], tail)
        } else {
            SettingsRecord::from_parts(["Default Input Folder|".to_string()], tail)
        };

        let once = migrator
            .migrate_to_current(record, SchemaRevision::new(revision), false)
            .unwrap();
        let again = migrator.migrate_to_current(once.clone(), CURRENT_REVISION, false).unwrap();
        prop_assert_eq!(once.len(), 1 + 5 * entries.len());
        prop_assert_eq!(again, once);
    }
}
