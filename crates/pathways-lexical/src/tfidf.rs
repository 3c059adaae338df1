//! TF-IDF vectorization over the normalized indicator corpus.
//!
//! Tokens are runs of two or more word characters, English stop words are
//! dropped, idf is smoothed (`ln((1+n)/(1+df)) + 1`), and vectors are
//! L2-normalized so cosine similarity is a plain dot product. The
//! vocabulary is sorted, which keeps runs deterministic for a given corpus.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use pathways_core::{Error, Result};

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w\w+").expect("valid regex"));

static ENGLISH_STOP_WORDS: Lazy<HashSet<String>> = Lazy::new(|| {
    stop_words::get(stop_words::LANGUAGE::English)
        .into_iter()
        .collect()
});

/// Split text into lowercase word tokens with stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .filter(|t| !ENGLISH_STOP_WORDS.contains(t))
        .collect()
}

/// A fitted TF-IDF vocabulary with per-term idf weights.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Fit the vocabulary and idf weights on a corpus.
    ///
    /// Fatal if no tokens survive stop-word removal, matching the behavior
    /// of fitting a vectorizer on an all-stop-word corpus.
    pub fn fit(corpus: &[String]) -> Result<Self> {
        let tokenized: Vec<Vec<String>> = corpus.iter().map(|d| tokenize(d)).collect();

        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term.to_string()).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(Error::Vectorize(
                "empty vocabulary; documents only contain stop words".to_string(),
            ));
        }

        // BTreeMap iteration gives the sorted vocabulary order.
        let n = corpus.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut terms = Vec::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (index, (term, df)) in doc_freq.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term.clone(), index);
            terms.push(term);
        }

        Ok(Self {
            vocabulary,
            terms,
            idf,
        })
    }

    /// Fit on a corpus and transform every document in one pass.
    pub fn fit_transform(corpus: &[String]) -> Result<(Self, Vec<Vec<f64>>)> {
        let vectorizer = Self::fit(corpus)?;
        let vectors = corpus.iter().map(|d| vectorizer.transform(d)).collect();
        Ok((vectorizer, vectors))
    }

    /// Transform one document into a dense L2-normalized TF-IDF vector.
    ///
    /// A document with no in-vocabulary tokens maps to the zero vector.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut counts: HashMap<&str, f64> = HashMap::new();
        for token in tokenize(document) {
            if let Some(&idx) = self.vocabulary.get(token.as_str()) {
                *counts.entry(self.terms[idx].as_str()).or_insert(0.0) += 1.0;
            }
        }

        let mut vector = vec![0.0; self.terms.len()];
        for (term, count) in counts {
            let idx = self.vocabulary[term];
            vector[idx] = count * self.idf[idx];
        }

        let norm: f64 = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }

    /// Vocabulary terms, index-aligned with transformed vectors.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Full pairwise cosine-similarity matrix over unit vectors.
pub fn cosine_similarity_matrix(vectors: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = vectors.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let dot: f64 = vectors[i]
                .iter()
                .zip(&vectors[j])
                .map(|(a, b)| a * b)
                .sum();
            matrix[i][j] = dot;
            matrix[j][i] = dot;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let tokens = tokenize("the poverty of a region");
        assert_eq!(tokens, vec!["poverty", "region"]);
    }

    #[test]
    fn test_identical_documents_have_unit_similarity() {
        let corpus = vec!["poverty".to_string(), "poverty".to_string()];
        let (_, vectors) = TfidfVectorizer::fit_transform(&corpus).unwrap();
        let matrix = cosine_similarity_matrix(&vectors);
        assert!((matrix[0][1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_documents_have_zero_similarity() {
        let corpus = vec![
            "reduce poverty".to_string(),
            "increase literacy".to_string(),
        ];
        let (_, vectors) = TfidfVectorizer::fit_transform(&corpus).unwrap();
        let matrix = cosine_similarity_matrix(&vectors);
        assert_eq!(matrix[0][1], 0.0);
        assert!(matrix[0][0] > 0.99);
    }

    #[test]
    fn test_overlapping_documents_are_between() {
        let corpus = vec![
            "reduce poverty".to_string(),
            "reduce poverty rate".to_string(),
        ];
        let (_, vectors) = TfidfVectorizer::fit_transform(&corpus).unwrap();
        let matrix = cosine_similarity_matrix(&vectors);
        assert!(matrix[0][1] > 0.6, "similarity was {}", matrix[0][1]);
        assert!(matrix[0][1] < 1.0);
    }

    #[test]
    fn test_empty_vocabulary_is_fatal() {
        let corpus = vec!["the of a".to_string()];
        assert!(TfidfVectorizer::fit(&corpus).is_err());
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let corpus = vec!["zebra apple mango".to_string()];
        let vectorizer = TfidfVectorizer::fit(&corpus).unwrap();
        let mut sorted = vectorizer.terms().to_vec();
        sorted.sort();
        assert_eq!(vectorizer.terms(), sorted.as_slice());
    }
}
