//! PSM Settings Migration
//!
//! Rewrites settings records saved under any historical schema revision into
//! the layout the current code reads.
//!
//! # Core Concepts
//!
//! - [`RewriteRule`]: One pure rewrite per adjacent revision pair
//! - [`Migrator`]: Applies the rule chain from a source to a target revision
//! - [`LayoutTable`]: Validated widths and literals the rules depend on
//! - [`LoaderSettings`]: Typed view of a current-revision record
//!
//! # Example
//!
//! ```rust
//! use psm_migrate::{Migrator, SchemaRevision};
//! use psm_record::SettingsRecord;
//!
//! let record: SettingsRecord = ["Default Input Folder|", "img.tif", "OrigBlue", "Yes"]
//!     .into_iter()
//!     .collect();
//! let migrated = Migrator::default()
//!     .migrate_to_current(record, SchemaRevision::new(4), false)
//!     .unwrap();
//! assert_eq!(migrated.get(2), Some("Images"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod driver;
mod error;
mod layout;
mod revision;
mod rules;

pub mod document;
pub mod settings;

pub use driver::Migrator;
pub use error::{MigrationError, Remedy};
pub use layout::{ConfigError, EntryWidths, FieldDefaults, LayoutTable, LegacyConventions, RecordShape};
pub use revision::{SchemaRevision, CURRENT_REVISION, LEGACY_SOURCE_REVISION};
pub use rules::RewriteRule;
pub use settings::{FileSpec, LoadChoice, LoaderSettings, SettingsError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
