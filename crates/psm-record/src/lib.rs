//! PSM Settings Records
//!
//! Position-addressed settings records as persisted in pipeline documents.
//!
//! # Core Concepts
//!
//! - [`SettingsRecord`]: Ordered sequence of string fields; position is meaning
//! - [`LocationDescriptor`]: Folder choice plus custom path, encoded as `tag|path`
//! - [`FileEntry`]: One fixed-width repeated group in a record's tail
//! - [`split`] / [`join`] / [`reshape`]: Typed views over the repeating tail
//!
//! # Example
//!
//! ```rust
//! use psm_record::{decode, encode, FolderChoice, LocationDescriptor};
//!
//! let descriptor = decode("Elsewhere...|/data/plate1").unwrap();
//! assert_eq!(descriptor.choice(), FolderChoice::Absolute);
//! assert_eq!(descriptor.custom_path(), Some("/data/plate1"));
//! assert_eq!(encode(&descriptor), "Elsewhere...|/data/plate1");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod group;
mod location;
mod record;

pub use error::RecordError;
pub use group::{join, reshape, split, FileEntry};
pub use location::{
    decode, encode, upgrade_legacy_tag, FolderChoice, LocationDescriptor, TAG_DELIMITER,
};
pub use record::SettingsRecord;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn record_prefix_and_entries() {
        let record = SettingsRecord::from(vec![
            "URL|http://example.org/plate".to_string(),
            "a.tif".to_string(),
            "DNA".to_string(),
            "b.tif".to_string(),
            "Actin".to_string(),
        ]);

        let (prefix, tail) = record.split_prefix(1, 2).unwrap();
        let descriptor = decode(&prefix[0]).unwrap();
        assert_eq!(descriptor.choice(), FolderChoice::Url);

        let entries = split(tail, 2).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].get(0), Some("b.tif"));
        assert_eq!(join(entries), tail.to_vec());
    }
}
