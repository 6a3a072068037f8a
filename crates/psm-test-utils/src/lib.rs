//! Testing utilities for PSM workspace
//!
//! Record builders for every historical revision, so tests can state inputs
//! as file entries instead of flat field lists.

#![allow(missing_docs)]

use psm_record::{FileEntry, SettingsRecord};

/// Image name the legacy format uses for an unused entry
pub const UNUSED: &str = "Do not use";

pub fn record(fields: &[&str]) -> SettingsRecord {
    SettingsRecord::from(fields)
}

/// Legacy record: an ignored field, the path field, then `(file, image)` pairs
pub fn legacy_record(path: &str, entries: &[(&str, &str)]) -> SettingsRecord {
    let tail = entries
        .iter()
        .flat_map(|(file, image)| [file.to_string(), image.to_string()])
        .collect();
    SettingsRecord::from_parts([String::new(), path.to_string()], tail)
}

/// Revision 1 record: tag, path, then `(file, image)` pairs
pub fn v1_record(tag: &str, path: &str, entries: &[(&str, &str)]) -> SettingsRecord {
    let tail = entries
        .iter()
        .flat_map(|(file, image)| [file.to_string(), image.to_string()])
        .collect();
    SettingsRecord::from_parts([tag.to_string(), path.to_string()], tail)
}

/// Revision 2 or 3 record: compound location, then `(file, image)` pairs
pub fn v2_record(location: &str, entries: &[(&str, &str)]) -> SettingsRecord {
    let tail = entries
        .iter()
        .flat_map(|(file, image)| [file.to_string(), image.to_string()])
        .collect();
    SettingsRecord::from_parts([location.to_string()], tail)
}

/// Revision 4 record: compound location, then `(file, image, rescale)` triples
pub fn v4_record(location: &str, entries: &[(&str, &str, &str)]) -> SettingsRecord {
    let tail = entries
        .iter()
        .flat_map(|(file, image, rescale)| [file.to_string(), image.to_string(), rescale.to_string()])
        .collect();
    SettingsRecord::from_parts([location.to_string()], tail)
}

/// Revision 5 entry holding the defaults the 4 -> 5 rewrite adds
pub fn v5_image_entry(file: &str, image: &str, rescale: &str) -> FileEntry {
    FileEntry::from([file, "Images", image, rescale, "Nuclei"])
}

/// Borrow owned pairs in the shape the record builders take
pub fn as_pairs(pairs: &[(String, String)]) -> Vec<(&str, &str)> {
    pairs.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_record_layout() {
        let built = legacy_record(".", &[("a.tif", "DNA"), ("b.tif", UNUSED)]);
        assert_eq!(built, record(&["", ".", "a.tif", "DNA", "b.tif", UNUSED]));
    }

    #[test]
    fn v4_record_layout() {
        let built = v4_record("URL|", &[("a.tif", "DNA", "No")]);
        assert_eq!(built, record(&["URL|", "a.tif", "DNA", "No"]));
    }

    #[test]
    fn as_pairs_borrows_in_order() {
        let owned = vec![("a".to_string(), "b".to_string())];
        assert_eq!(as_pairs(&owned), vec![("a", "b")]);
    }
}
