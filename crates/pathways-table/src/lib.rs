//! Pathways Table — the row-level ToC dataset and its lookups.

pub mod columns;
pub mod lookup;
pub mod table;

pub use lookup::PathwayNameLookup;
pub use table::TocTable;
