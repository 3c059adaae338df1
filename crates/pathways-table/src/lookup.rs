//! Topic → Cluster_Name lookup table.
//!
//! Built once at load time and passed by reference into the labeling
//! stage; never rebuilt per row.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use pathways_core::{Error, Result};

use crate::columns;
use crate::table::TocTable;

/// Immutable topic-id → curated pathway name mapping.
#[derive(Debug, Clone, Default)]
pub struct PathwayNameLookup {
    names: BTreeMap<i64, String>,
}

impl PathwayNameLookup {
    /// Load the lookup from a CSV with `Topic` and `Cluster_Name` columns.
    ///
    /// Rows with a non-numeric topic id are malformed input.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let table = TocTable::from_csv_path(path)?;
        let topic_col = table.require_column(columns::TOPIC)?;
        let name_col = table.require_column(columns::CLUSTER_NAME)?;

        let mut names = BTreeMap::new();
        for row in 0..table.row_count() {
            let raw = table.cell(row, topic_col).trim();
            if raw.is_empty() {
                continue;
            }
            let topic: i64 = raw.parse().map_err(|_| {
                Error::Input(format!("non-numeric topic id in lookup: {:?}", raw))
            })?;
            names.insert(topic, table.cell(row, name_col).to_string());
        }
        info!("Loaded {} pathway names from {}", names.len(), path.display());
        Ok(Self { names })
    }

    /// Build a lookup directly from pairs (used by tests and callers that
    /// already hold the mapping).
    pub fn from_pairs(pairs: impl IntoIterator<Item = (i64, String)>) -> Self {
        Self {
            names: pairs.into_iter().collect(),
        }
    }

    /// Name for a topic id, if curated.
    pub fn name(&self, topic: i64) -> Option<&str> {
        self.names.get(&topic).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_pairs() {
        let lookup =
            PathwayNameLookup::from_pairs([(0, "Poverty".to_string()), (-1, "Noise".to_string())]);
        assert_eq!(lookup.name(0), Some("Poverty"));
        assert_eq!(lookup.name(-1), Some("Noise"));
        assert_eq!(lookup.name(7), None);
    }

    #[test]
    fn test_load_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pathway_names.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "Topic,Cluster_Name,Top Keywords").unwrap();
        writeln!(f, "0,Poverty reduction,\"poverty, income\"").unwrap();
        writeln!(f, "1,Literacy,\"literacy, school\"").unwrap();
        drop(f);

        let lookup = PathwayNameLookup::from_csv_path(&path).unwrap();
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.name(1), Some("Literacy"));
    }

    #[test]
    fn test_bad_topic_id_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pathway_names.csv");
        std::fs::write(&path, "Topic,Cluster_Name\nabc,Broken\n").unwrap();
        assert!(PathwayNameLookup::from_csv_path(&path).is_err());
    }
}
