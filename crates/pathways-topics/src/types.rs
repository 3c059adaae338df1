//! Topic assignment types.

use std::collections::BTreeMap;

use crate::clusterer::NOISE_TOPIC;

/// Name given to the noise topic and to topics nothing qualifies to name.
pub const OUTLIER_NAME: &str = "Outlier";

/// Result of a topic assignment pass.
#[derive(Debug, Clone, Default)]
pub struct TopicModel {
    /// One label per input indicator, aligned to input order.
    pub labels: Vec<i32>,
    /// Topic id → human-readable name. Always contains the noise topic.
    pub names: BTreeMap<i32, String>,
}

impl TopicModel {
    /// Name for a label; unknown labels read as outliers.
    pub fn name_of(&self, label: i32) -> &str {
        self.names.get(&label).map(String::as_str).unwrap_or(OUTLIER_NAME)
    }

    /// Number of named topics, noise excluded.
    pub fn topic_count(&self) -> usize {
        self.names.keys().filter(|&&id| id != NOISE_TOPIC).count()
    }

    /// Number of indicators labeled as noise.
    pub fn outlier_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l == NOISE_TOPIC).count()
    }
}
