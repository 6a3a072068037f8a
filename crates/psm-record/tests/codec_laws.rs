use proptest::prelude::*;
use psm_record::{decode, encode, join, split, upgrade_legacy_tag, FolderChoice, LocationDescriptor};

fn any_choice() -> impl Strategy<Value = FolderChoice> {
    prop_oneof![
        Just(FolderChoice::DefaultInput),
        Just(FolderChoice::DefaultOutput),
        Just(FolderChoice::Absolute),
        Just(FolderChoice::DefaultInputSubfolder),
        Just(FolderChoice::DefaultOutputSubfolder),
        Just(FolderChoice::Url),
    ]
}

fn aligned_tail() -> impl Strategy<Value = (usize, usize, Vec<String>)> {
    (1..6usize, 0..8usize).prop_flat_map(|(width, entries)| {
        (
            Just(width),
            Just(entries),
            proptest::collection::vec("[a-z]{0,4}", width * entries),
        )
    })
}

proptest! {
    #[test]
    fn prop_decoded_descriptors_round_trip(choice in any_choice(), path in ".*") {
        let raw = format!("{}|{}", choice.tag(), path);
        let decoded = decode(&raw).unwrap();
        prop_assert_eq!(decode(&encode(&decoded)).unwrap(), decoded);
    }

    #[test]
    fn prop_constructed_descriptors_round_trip(choice in any_choice(), path in "[^|]*") {
        let d = LocationDescriptor::new(choice, path);
        prop_assert_eq!(decode(&encode(&d)).unwrap(), d);
    }

    #[test]
    fn prop_upgrade_never_touches_path(path in ".*") {
        let raw = format!("Default Image Folder|{path}");
        let upgraded = upgrade_legacy_tag(&raw);
        prop_assert_eq!(upgraded, format!("Default Input Folder|{path}"));
    }

    #[test]
    fn prop_join_inverts_split((width, entries, tail) in aligned_tail()) {
        let split_entries = split(&tail, width).unwrap();
        prop_assert_eq!(split_entries.len(), entries);
        prop_assert!(split_entries.iter().all(|e| e.width() == width));
        prop_assert_eq!(join(split_entries), tail);
    }
}
