//! Domain types shared by sources, classifier and export.

pub mod listing;

pub use listing::{AssetType, ListingRecord, ListingStatusRow};
