//! Per-topic term importance.
//!
//! Each topic's member documents are merged into one aggregate document
//! and TF-IDF is computed across the aggregates, so a term scores high
//! for a topic when it is frequent there and rare in other topics.

use std::collections::BTreeMap;

use pathways_lexical::TfidfVectorizer;

use crate::clusterer::NOISE_TOPIC;

/// Top-`top_n` terms per non-noise topic, best-effort.
///
/// Ties rank alphabetically (the vocabulary order). Returns an empty map
/// when nothing survives stop-word removal.
pub fn topic_terms(
    normalized_docs: &[String],
    labels: &[i32],
    top_n: usize,
) -> BTreeMap<i32, Vec<String>> {
    let mut aggregates: BTreeMap<i32, String> = BTreeMap::new();
    for (doc, &label) in normalized_docs.iter().zip(labels) {
        if label == NOISE_TOPIC {
            continue;
        }
        let aggregate = aggregates.entry(label).or_default();
        if !aggregate.is_empty() {
            aggregate.push(' ');
        }
        aggregate.push_str(doc);
    }

    if aggregates.is_empty() {
        return BTreeMap::new();
    }

    let topic_ids: Vec<i32> = aggregates.keys().copied().collect();
    let corpus: Vec<String> = aggregates.into_values().collect();
    let Ok((vectorizer, vectors)) = TfidfVectorizer::fit_transform(&corpus) else {
        // All topic documents were stop words; naming falls back.
        return BTreeMap::new();
    };

    let mut result = BTreeMap::new();
    for (topic, vector) in topic_ids.into_iter().zip(vectors) {
        let mut weighted: Vec<(usize, f64)> = vector
            .into_iter()
            .enumerate()
            .filter(|(_, w)| *w > 0.0)
            .collect();
        weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let terms = weighted
            .into_iter()
            .take(top_n)
            .map(|(idx, _)| vectorizer.terms()[idx].clone())
            .collect();
        result.insert(topic, terms);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_distinctive_terms_rank_first() {
        let docs = strings(&[
            "reduce poverty",
            "poverty rate falls",
            "increase literacy",
            "literacy improves",
        ]);
        let labels = vec![0, 0, 1, 1];
        let terms = topic_terms(&docs, &labels, 3);

        assert!(terms[&0].contains(&"poverty".to_string()));
        assert!(terms[&1].contains(&"literacy".to_string()));
        assert!(!terms[&0].contains(&"literacy".to_string()));
    }

    #[test]
    fn test_noise_is_excluded() {
        let docs = strings(&["reduce poverty", "stray document"]);
        let labels = vec![0, NOISE_TOPIC];
        let terms = topic_terms(&docs, &labels, 3);
        assert_eq!(terms.len(), 1);
        assert!(terms.contains_key(&0));
    }

    #[test]
    fn test_all_noise_yields_empty_map() {
        let docs = strings(&["reduce poverty"]);
        let labels = vec![NOISE_TOPIC];
        assert!(topic_terms(&docs, &labels, 3).is_empty());
    }

    #[test]
    fn test_respects_top_n() {
        let docs = strings(&["alpha beta gamma delta epsilon"]);
        let labels = vec![0];
        let terms = topic_terms(&docs, &labels, 2);
        assert_eq!(terms[&0].len(), 2);
    }
}
