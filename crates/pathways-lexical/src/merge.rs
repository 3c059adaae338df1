//! Greedy near-duplicate merging of indicator strings.
//!
//! Indicators are scanned in input order; the first unassigned indicator
//! anchors a cluster and pulls in every still-unassigned indicator whose
//! TF-IDF cosine similarity meets the threshold. The sweep order is part
//! of the contract: reordering the input can change cluster membership.

use std::collections::HashMap;

use tracing::{debug, info};

use pathways_core::Result;

use crate::normalize::normalize;
use crate::tfidf::{cosine_similarity_matrix, TfidfVectorizer};

/// One lexical cluster: a canonical representative and its members.
#[derive(Debug, Clone)]
pub struct LexicalCluster {
    /// Shortest member by character length (tie → first-seen).
    pub representative: String,
    /// Members sorted by character length ascending.
    pub members: Vec<String>,
}

/// Result of a merge pass over the unique indicator list.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Clusters in anchor order.
    pub clusters: Vec<LexicalCluster>,
    /// Every indicator mapped to its cluster representative.
    /// Singletons map to themselves, so the mapping is total.
    pub mapping: HashMap<String, String>,
}

impl MergeOutcome {
    /// Number of clusters with more than one member.
    pub fn merged_cluster_count(&self) -> usize {
        self.clusters.iter().filter(|c| c.members.len() > 1).count()
    }
}

/// Near-duplicate merger over unique indicator strings.
#[derive(Debug, Clone)]
pub struct NearDuplicateMerger {
    threshold: f64,
}

impl NearDuplicateMerger {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Merge the (unique, ordered) indicators into lexical clusters.
    ///
    /// Empty input yields an empty outcome without touching the vectorizer.
    pub fn merge(&self, indicators: &[String]) -> Result<MergeOutcome> {
        if indicators.is_empty() {
            return Ok(MergeOutcome::default());
        }

        let normalized: Vec<String> = indicators
            .iter()
            .map(|text| normalize(Some(text)))
            .collect();
        let (_, vectors) = TfidfVectorizer::fit_transform(&normalized)?;
        let matrix = cosine_similarity_matrix(&vectors);

        let n = indicators.len();
        let mut assigned = vec![false; n];
        let mut outcome = MergeOutcome::default();

        for i in 0..n {
            if assigned[i] {
                continue;
            }

            // The anchor always joins its own cluster; a zero vector has
            // zero self-similarity and would otherwise drop out.
            let mut group: Vec<usize> = Vec::new();
            for j in 0..n {
                if assigned[j] {
                    continue;
                }
                if j == i || matrix[i][j] >= self.threshold {
                    group.push(j);
                }
            }
            for &j in &group {
                assigned[j] = true;
            }

            // Stable sort keeps first-seen order among equal lengths.
            let mut members: Vec<String> =
                group.iter().map(|&j| indicators[j].clone()).collect();
            members.sort_by_key(|m| m.chars().count());
            let representative = members[0].clone();

            debug!(
                "Cluster anchored at {:?}: {} member(s), representative {:?}",
                indicators[i],
                members.len(),
                representative
            );

            for member in &members {
                outcome
                    .mapping
                    .insert(member.clone(), representative.clone());
            }
            outcome.clusters.push(LexicalCluster {
                representative,
                members,
            });
        }

        info!(
            "Merged {} indicators into {} lexical clusters ({} multi-member)",
            n,
            outcome.clusters.len(),
            outcome.merged_cluster_count()
        );
        Ok(outcome)
    }
}
