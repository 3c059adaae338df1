//! Topic assignment orchestration: embed → cluster → name.

use std::collections::BTreeSet;

use ndarray::Array2;
use tracing::info;

use pathways_core::{Error, Result, TopicParams};
use pathways_embed::EmbedderBackend;
use pathways_lexical::normalize;

use crate::clusterer::{ClusterBackend, NOISE_TOPIC};
use crate::terms::topic_terms;
use crate::types::{TopicModel, OUTLIER_NAME};

/// Assigns every indicator to a named topic.
pub struct TopicAssigner<'a> {
    embedder: &'a dyn EmbedderBackend,
    clusterer: &'a dyn ClusterBackend,
    params: TopicParams,
}

impl<'a> TopicAssigner<'a> {
    pub fn new(
        embedder: &'a dyn EmbedderBackend,
        clusterer: &'a dyn ClusterBackend,
        params: TopicParams,
    ) -> Self {
        Self {
            embedder,
            clusterer,
            params,
        }
    }

    /// Run the full pass over the (unique, ordered) indicator list.
    ///
    /// Embedding and clustering failures are fatal and surfaced untouched;
    /// the run is safe to re-invoke from scratch.
    pub fn assign(&self, indicators: &[String]) -> Result<TopicModel> {
        let embeddings = self.embed_all(indicators)?;
        let labels = self.clusterer.cluster(&embeddings, &self.params)?;
        let names = self.name_topics(indicators, &labels);

        info!(
            "Assigned {} indicators to {} topics via {}",
            indicators.len(),
            names.keys().filter(|&&id| id != NOISE_TOPIC).count(),
            self.clusterer.name()
        );
        Ok(TopicModel { labels, names })
    }

    /// One blocking embedding call over the whole corpus.
    fn embed_all(&self, indicators: &[String]) -> Result<Array2<f64>> {
        if !self.embedder.is_available() {
            return Err(Error::Inference(
                "embedding backend unavailable; cannot assign topics".to_string(),
            ));
        }

        let texts: Vec<&str> = indicators.iter().map(String::as_str).collect();
        let results = self.embedder.embed_batch(&texts);

        let dim = self.embedder.dimension();
        let mut matrix = Array2::zeros((indicators.len(), dim));
        for (i, result) in results.into_iter().enumerate() {
            let Some(result) = result else {
                return Err(Error::Inference(format!(
                    "failed to embed indicator {:?}",
                    indicators[i]
                )));
            };
            if result.embedding.len() != dim {
                return Err(Error::Inference(format!(
                    "embedding dimension mismatch: got {}, expected {}",
                    result.embedding.len(),
                    dim
                )));
            }
            for (d, &value) in result.embedding.iter().enumerate() {
                matrix[[i, d]] = value as f64;
            }
        }
        Ok(matrix)
    }

    /// Name every topic from its top-weighted terms: the shortest original
    /// indicator mentioning one of them wins, `Outlier` otherwise.
    fn name_topics(
        &self,
        indicators: &[String],
        labels: &[i32],
    ) -> std::collections::BTreeMap<i32, String> {
        let normalized: Vec<String> = indicators
            .iter()
            .map(|text| normalize(Some(text)))
            .collect();
        let terms_by_topic = topic_terms(&normalized, labels, self.params.top_terms);

        let mut names = std::collections::BTreeMap::new();
        names.insert(NOISE_TOPIC, OUTLIER_NAME.to_string());

        let topics: BTreeSet<i32> = labels.iter().copied().collect();
        for topic in topics {
            if topic == NOISE_TOPIC {
                continue;
            }
            let name = terms_by_topic
                .get(&topic)
                .and_then(|terms| shortest_mentioning(indicators, terms))
                .unwrap_or_else(|| OUTLIER_NAME.to_string());
            names.insert(topic, name);
        }
        names
    }
}

/// Shortest indicator (by characters, tie → first-seen) whose lowercase
/// text contains any of the given terms.
fn shortest_mentioning(indicators: &[String], terms: &[String]) -> Option<String> {
    indicators
        .iter()
        .filter(|indicator| {
            let lowered = indicator.to_lowercase();
            terms.iter().any(|term| lowered.contains(term.as_str()))
        })
        .min_by_key(|indicator| indicator.chars().count())
        .cloned()
}
