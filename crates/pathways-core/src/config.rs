//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Paths to all pipeline inputs and outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Combined row-level input table (`data/combined_result_framework.csv`).
    pub input_file: PathBuf,
    /// Topic → Cluster_Name lookup table (`data/pathway_names.csv`).
    pub pathway_names_file: PathBuf,
    /// Output directory (`data/outputs/`).
    pub outputs: PathBuf,
    /// Clustered export (`data/outputs/tocs_clustered.csv`).
    pub clustered_file: PathBuf,
    /// Audit mapping Original_Indicator → Clustered_Indicator
    /// (`data/outputs/indicator_clusters.csv`).
    pub audit_file: PathBuf,
    /// Labeled export with cluster names (`data/outputs/tocs_labeled.csv`).
    pub labeled_file: PathBuf,
    /// Sentence-embedding model directory (`data/model/`).
    pub model_dir: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates the output directory.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let outputs = root.join("outputs");
        let paths = Self {
            input_file: root.join("combined_result_framework.csv"),
            pathway_names_file: root.join("pathway_names.csv"),
            clustered_file: outputs.join("tocs_clustered.csv"),
            audit_file: outputs.join("indicator_clusters.csv"),
            labeled_file: outputs.join("tocs_labeled.csv"),
            model_dir: root.join("model"),
            outputs,
            root,
        };
        paths.ensure_dirs()?;
        Ok(paths)
    }

    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.outputs)?;
        Ok(())
    }
}

/// Tunables for the near-duplicate merge pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeParams {
    /// Minimum cosine similarity for two indicators to share a cluster.
    pub similarity_threshold: f64,
}

impl Default for MergeParams {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.6,
        }
    }
}

/// Tunables for the topic assignment pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicParams {
    /// Smallest group that survives as a topic; smaller groups become noise.
    pub min_cluster_size: usize,
    /// Neighbors required for a point to seed a dense region.
    pub min_samples: usize,
    /// Neighborhood radius for density clustering (Euclidean).
    pub epsilon: f64,
    /// Number of top-weighted terms used when naming a topic.
    pub top_terms: usize,
}

impl Default for TopicParams {
    fn default() -> Self {
        Self {
            min_cluster_size: 5,
            min_samples: 2,
            epsilon: 0.5,
            top_terms: 3,
        }
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub data_paths: DataPaths,
    pub merge: MergeParams,
    pub topics: TopicParams,
}

impl PipelineConfig {
    /// Create configuration from environment and defaults.
    ///
    /// `PATHWAYS_DATA_DIR` overrides the data root, `PATHWAYS_MODEL_DIR`
    /// the embedding model directory.
    pub fn from_env() -> std::io::Result<Self> {
        let root = std::env::var("PATHWAYS_DATA_DIR").unwrap_or_else(|_| "data".to_string());
        let mut data_paths = DataPaths::new(root)?;
        if let Ok(model_dir) = std::env::var("PATHWAYS_MODEL_DIR") {
            data_paths.model_dir = PathBuf::from(model_dir);
        }

        Ok(Self {
            data_paths,
            merge: MergeParams::default(),
            topics: TopicParams::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let merge = MergeParams::default();
        assert!((merge.similarity_threshold - 0.6).abs() < f64::EPSILON);

        let topics = TopicParams::default();
        assert_eq!(topics.min_cluster_size, 5);
        assert_eq!(topics.min_samples, 2);
        assert_eq!(topics.top_terms, 3);
    }
}
