//! LRU embedding cache with TTL expiry.
//!
//! Indicator corpora repeat heavily across batch runs in the same
//! process; caching keeps the embedding pass from re-encoding them.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use ndarray::Array1;
use parking_lot::Mutex;

struct Entry {
    vector: Array1<f32>,
    inserted_at: Instant,
}

/// Thread-safe LRU cache keyed by the exact input text.
pub struct EmbeddingCache {
    state: Mutex<State>,
}

struct State {
    entries: HashMap<String, Entry>,
    recency: VecDeque<String>,
    capacity: usize,
    ttl: Duration,
}

impl EmbeddingCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            state: Mutex::new(State {
                entries: HashMap::with_capacity(capacity),
                recency: VecDeque::with_capacity(capacity),
                capacity,
                ttl,
            }),
        }
    }

    /// 4096 entries, 1-hour TTL.
    pub fn default_cache() -> Self {
        Self::new(4096, Duration::from_secs(3600))
    }

    /// Look up a vector; expired entries are dropped on access.
    pub fn get(&self, text: &str) -> Option<Array1<f32>> {
        let mut state = self.state.lock();

        let fresh = match state.entries.get(text) {
            Some(entry) => entry.inserted_at.elapsed() < state.ttl,
            None => return None,
        };
        if !fresh {
            state.entries.remove(text);
            state.recency.retain(|k| k != text);
            return None;
        }

        state.recency.retain(|k| k != text);
        state.recency.push_back(text.to_string());
        state.entries.get(text).map(|e| e.vector.clone())
    }

    /// Insert a vector, evicting the least recently used entry at capacity.
    pub fn put(&self, text: String, vector: Array1<f32>) {
        let mut state = self.state.lock();

        if state.entries.contains_key(&text) {
            state.recency.retain(|k| k != &text);
        } else {
            while state.entries.len() >= state.capacity {
                match state.recency.pop_front() {
                    Some(oldest) => {
                        state.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
        }

        state.recency.push_back(text.clone());
        state.entries.insert(
            text,
            Entry {
                vector,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.recency.clear();
    }
}
