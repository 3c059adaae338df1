//! Operator-facing run reports.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of one clustering batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClusterReport {
    /// Rows in the input table (preserved exactly on export).
    pub rows: usize,
    /// Unique non-empty indicators fed to both passes.
    #[serde(rename = "uniqueIndicators")]
    pub unique_indicators: usize,
    /// Lexical clusters produced by the merge pass.
    #[serde(rename = "lexicalClusters")]
    pub lexical_clusters: usize,
    /// Lexical clusters with more than one member.
    #[serde(rename = "mergedClusters")]
    pub merged_clusters: usize,
    /// Named topics, noise excluded.
    pub topics: usize,
    /// Indicators labeled as noise.
    pub outliers: usize,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One entry of the largest-clusters table in a labeling report.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterSize {
    pub name: String,
    pub rows: usize,
}

/// Result of the pathway-name labeling stage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LabelReport {
    pub rows: usize,
    /// Distinct non-empty cluster names in the labeled table.
    #[serde(rename = "distinctNames")]
    pub distinct_names: usize,
    /// Rows whose topic had no curated name.
    #[serde(rename = "unlabeledRows")]
    pub unlabeled_rows: usize,
    /// Ten largest clusters by row count, descending.
    pub largest: Vec<ClusterSize>,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}
