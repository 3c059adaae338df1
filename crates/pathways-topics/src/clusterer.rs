//! Density-based clustering backend.
//!
//! `ClusterBackend` is the injected capability `cluster(vectors, params)
//! -> labels`; the shipped implementation runs DBSCAN over the embedding
//! matrix. `min_samples` seeds dense regions and `min_cluster_size`
//! demotes groups too small to count as a topic.

use std::collections::HashMap;

use linfa::dataset::AsTargets;
use linfa::traits::Transformer;
use linfa::DatasetBase;
use linfa_clustering::Dbscan;
use ndarray::Array2;
use tracing::info;

use pathways_core::{Error, Result, TopicParams};

/// Label reserved for indicators outside every dense region.
pub const NOISE_TOPIC: i32 = -1;

/// Trait for clustering backends over embedding matrices.
pub trait ClusterBackend: Send + Sync {
    /// Assign one label per row of `embeddings`; `NOISE_TOPIC` for noise.
    fn cluster(&self, embeddings: &Array2<f64>, params: &TopicParams) -> Result<Vec<i32>>;

    /// Backend name for logs.
    fn name(&self) -> &str;
}

/// DBSCAN over Euclidean distance.
#[derive(Debug, Clone, Default)]
pub struct DbscanClusterer;

impl ClusterBackend for DbscanClusterer {
    fn cluster(&self, embeddings: &Array2<f64>, params: &TopicParams) -> Result<Vec<i32>> {
        if embeddings.nrows() == 0 {
            return Err(Error::Clustering(
                "no embeddings to cluster; input is empty".to_string(),
            ));
        }

        let dataset = DatasetBase::from(embeddings.clone());
        let clustered = Dbscan::params(params.min_samples)
            .tolerance(params.epsilon)
            .transform(dataset)
            .map_err(|e| Error::Clustering(format!("DBSCAN failed: {:?}", e)))?;

        let raw: Vec<Option<usize>> = clustered.targets().iter().copied().collect();
        let labels = enforce_min_cluster_size(&raw, params.min_cluster_size);

        let topics = labels.iter().filter(|&&l| l != NOISE_TOPIC).count();
        info!(
            "DBSCAN assigned {} of {} points to topics",
            topics,
            labels.len()
        );
        Ok(labels)
    }

    fn name(&self) -> &str {
        "dbscan"
    }
}

/// Demote clusters below `min_cluster_size` to noise and relabel the
/// survivors to consecutive ids in first-appearance order.
fn enforce_min_cluster_size(raw: &[Option<usize>], min_cluster_size: usize) -> Vec<i32> {
    let mut sizes: HashMap<usize, usize> = HashMap::new();
    for label in raw.iter().flatten() {
        *sizes.entry(*label).or_insert(0) += 1;
    }

    let mut relabeled: HashMap<usize, i32> = HashMap::new();
    let mut next_id = 0;
    raw.iter()
        .map(|label| match label {
            Some(id) if sizes[id] >= min_cluster_size => {
                *relabeled.entry(*id).or_insert_with(|| {
                    let assigned = next_id;
                    next_id += 1;
                    assigned
                })
            }
            _ => NOISE_TOPIC,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn params(min_cluster_size: usize, min_samples: usize, epsilon: f64) -> TopicParams {
        TopicParams {
            min_cluster_size,
            min_samples,
            epsilon,
            top_terms: 3,
        }
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let clusterer = DbscanClusterer;
        let embeddings = Array2::<f64>::zeros((0, 4));
        assert!(clusterer
            .cluster(&embeddings, &params(2, 2, 0.5))
            .is_err());
    }

    #[test]
    fn test_two_blobs_and_noise() {
        let clusterer = DbscanClusterer;
        let embeddings = array![
            [0.0, 0.0],
            [0.1, 0.0],
            [0.0, 0.1],
            [5.0, 5.0],
            [5.1, 5.0],
            [5.0, 5.1],
            [20.0, 20.0],
        ];
        let labels = clusterer
            .cluster(&embeddings, &params(2, 2, 0.5))
            .unwrap();

        assert_eq!(labels.len(), 7);
        // First blob appears first, so it gets id 0.
        assert_eq!(&labels[0..3], &[0, 0, 0]);
        assert_eq!(&labels[3..6], &[1, 1, 1]);
        assert_eq!(labels[6], NOISE_TOPIC);
    }

    #[test]
    fn test_small_clusters_demoted_to_noise() {
        let raw = vec![
            Some(0),
            Some(0),
            Some(0),
            Some(1),
            Some(1),
            None,
        ];
        let labels = enforce_min_cluster_size(&raw, 3);
        assert_eq!(labels, vec![0, 0, 0, -1, -1, -1]);
    }

    #[test]
    fn test_relabel_is_first_appearance_order() {
        let raw = vec![Some(7), Some(3), Some(7), Some(3), None];
        let labels = enforce_min_cluster_size(&raw, 2);
        assert_eq!(labels, vec![0, 1, 0, 1, -1]);
    }
}
