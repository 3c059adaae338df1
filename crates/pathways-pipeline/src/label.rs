//! Pathway-name labeling stage.
//!
//! Joins the curated Topic → Cluster_Name lookup onto a clustered export
//! and reports cluster statistics for the operator.

use std::collections::HashMap;

use tracing::info;

use pathways_core::{DataPaths, Error, Result};
use pathways_table::{columns, PathwayNameLookup, TocTable};

use crate::report::{ClusterSize, LabelReport};

/// How many of the largest clusters the report lists.
const LARGEST_CLUSTERS: usize = 10;

/// Attach curated pathway names to a clustered export.
pub struct LabelingStage;

impl LabelingStage {
    /// Load the clustered export and the lookup, join, write the labeled
    /// table, and return summary statistics.
    pub fn run(paths: &DataPaths) -> Result<LabelReport> {
        let start = std::time::Instant::now();

        let mut table = TocTable::from_csv_path(&paths.clustered_file)?;
        let lookup = PathwayNameLookup::from_csv_path(&paths.pathway_names_file)?;

        let report = Self::label(&mut table, &lookup)?;
        table.write_csv_path(&paths.labeled_file)?;

        let report = LabelReport {
            duration_ms: start.elapsed().as_millis() as u64,
            ..report
        };
        info!(
            "Labeling complete: rows={}, distinct_names={}, unlabeled={}",
            report.rows, report.distinct_names, report.unlabeled_rows
        );
        for entry in &report.largest {
            info!("  {:>6} rows  {}", entry.rows, entry.name);
        }
        Ok(report)
    }

    /// Join the lookup onto the table in place and compute statistics.
    pub fn label(table: &mut TocTable, lookup: &PathwayNameLookup) -> Result<LabelReport> {
        let topic_col = table.require_column(columns::TOPIC)?;

        let mut names = Vec::with_capacity(table.row_count());
        let mut unlabeled = 0usize;
        for row in 0..table.row_count() {
            let raw = table.cell(row, topic_col).trim();
            if raw.is_empty() {
                names.push(String::new());
                unlabeled += 1;
                continue;
            }
            let topic: i64 = raw
                .parse()
                .map_err(|_| Error::Input(format!("non-numeric topic id: {:?}", raw)))?;
            match lookup.name(topic) {
                Some(name) => names.push(name.to_string()),
                None => {
                    names.push(String::new());
                    unlabeled += 1;
                }
            }
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for name in names.iter().filter(|n| !n.is_empty()) {
            *counts.entry(name.as_str()).or_insert(0) += 1;
        }
        let distinct_names = counts.len();

        let mut largest: Vec<ClusterSize> = counts
            .into_iter()
            .map(|(name, rows)| ClusterSize {
                name: name.to_string(),
                rows,
            })
            .collect();
        // Descending by size, name as the deterministic tie-break.
        largest.sort_by(|a, b| b.rows.cmp(&a.rows).then_with(|| a.name.cmp(&b.name)));
        largest.truncate(LARGEST_CLUSTERS);

        let rows = table.row_count();
        table.set_column(columns::CLUSTER_NAME, names)?;

        Ok(LabelReport {
            rows,
            distinct_names,
            unlabeled_rows: unlabeled,
            largest,
            duration_ms: 0,
        })
    }
}
