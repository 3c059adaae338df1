//! ONNX sentence embedder for indicator statements.
//!
//! Loads a SentenceTransformers-style ONNX export (all-MiniLM-L6-v2) plus
//! its HuggingFace tokenizer and produces 384-dim float32 vectors.
//! Requires the `onnx` feature.

#[cfg(feature = "onnx")]
mod inner {
    use std::path::Path;
    use std::sync::Arc;

    use ndarray::Array1;
    use ort::session::Session;
    use ort::value::Tensor;
    use parking_lot::Mutex;
    use tokenizers::Tokenizer;
    use tracing::{info, warn};

    use crate::cache::EmbeddingCache;
    use crate::embedder::{EmbedderBackend, EmbeddingResult};

    /// Maximum sequence length accepted by the model.
    const MAX_SEQ_LEN: usize = 512;

    /// Embedding dimension of all-MiniLM-L6-v2.
    const MODEL_DIM: usize = 384;

    /// ONNX Runtime sentence embedder.
    pub struct OnnxEmbedder {
        session: Arc<Mutex<Session>>,
        tokenizer: Tokenizer,
        cache: EmbeddingCache,
    }

    impl OnnxEmbedder {
        /// Load `model.onnx` and `tokenizer.json` from a directory.
        pub fn load(model_dir: &Path) -> Result<Self, String> {
            let model_path = model_dir.join("model.onnx");
            let tokenizer_path = model_dir.join("tokenizer.json");
            if !model_path.exists() {
                return Err(format!("model not found: {}", model_path.display()));
            }
            if !tokenizer_path.exists() {
                return Err(format!("tokenizer not found: {}", tokenizer_path.display()));
            }

            // With load-dynamic, ORT_DYLIB_PATH must point to libonnxruntime.
            ort::init().commit();

            let session = Session::builder()
                .map_err(|e| format!("failed to create session builder: {}", e))?
                .with_intra_threads(2)
                .map_err(|e| format!("failed to set threads: {}", e))?
                .commit_from_file(&model_path)
                .map_err(|e| format!("failed to load ONNX model: {}", e))?;

            let tokenizer = Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| format!("failed to load tokenizer: {}", e))?;

            info!(
                "ONNX embedder loaded: dim={}, model={}",
                MODEL_DIM,
                model_path.display()
            );

            Ok(Self {
                session: Arc::new(Mutex::new(session)),
                tokenizer,
                cache: EmbeddingCache::default_cache(),
            })
        }

        /// Tokenize, run the session, and pool one text into a vector.
        fn infer(&self, text: &str) -> Option<Array1<f32>> {
            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(|e| warn!("tokenization failed: {}", e))
                .ok()?;

            let seq_len = encoding.get_ids().len().min(MAX_SEQ_LEN);
            let ids: Vec<i64> = encoding.get_ids()[..seq_len]
                .iter()
                .map(|&id| id as i64)
                .collect();
            let mask: Vec<i64> = encoding.get_attention_mask()[..seq_len]
                .iter()
                .map(|&m| m as i64)
                .collect();
            let type_ids = vec![0i64; seq_len];

            let ids_tensor = Tensor::from_array(([1usize, seq_len], ids))
                .map_err(|e| warn!("failed to create ids tensor: {}", e))
                .ok()?;
            let mask_tensor = Tensor::from_array(([1usize, seq_len], mask.clone()))
                .map_err(|e| warn!("failed to create mask tensor: {}", e))
                .ok()?;
            let type_ids_tensor = Tensor::from_array(([1usize, seq_len], type_ids))
                .map_err(|e| warn!("failed to create type_ids tensor: {}", e))
                .ok()?;

            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![ids_tensor, mask_tensor, type_ids_tensor])
                .map_err(|e| warn!("ONNX inference failed: {}", e))
                .ok()?;

            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| warn!("failed to extract output tensor: {}", e))
                .ok()?;
            let dims: Vec<i64> = shape.iter().copied().collect();

            match dims.len() {
                // Token embeddings [1, seq_len, dim] need mask-weighted pooling.
                3 => mean_pool(data, dims[2] as usize, &mask),
                // Already pooled [1, dim].
                2 => Some(Array1::from_vec(data[..dims[1] as usize].to_vec())),
                _ => {
                    warn!("unexpected output shape: {:?}", dims);
                    None
                }
            }
        }
    }

    /// Mean-pool token embeddings with the attention mask.
    fn mean_pool(data: &[f32], dim: usize, mask: &[i64]) -> Option<Array1<f32>> {
        let active: f32 = mask.iter().map(|&m| m as f32).sum();
        if active < 1.0 {
            return None;
        }
        let mut pooled = Array1::zeros(dim);
        for (token, &m) in mask.iter().enumerate() {
            if m > 0 {
                let offset = token * dim;
                for d in 0..dim {
                    pooled[d] += data[offset + d];
                }
            }
        }
        Some(pooled / active)
    }

    impl EmbedderBackend for OnnxEmbedder {
        fn embed(&self, text: &str) -> Option<EmbeddingResult> {
            if let Some(vector) = self.cache.get(text) {
                return Some(EmbeddingResult {
                    embedding: vector,
                    cached: true,
                });
            }

            let embedding = self.infer(text)?;
            self.cache.put(text.to_string(), embedding.clone());
            Some(EmbeddingResult {
                embedding,
                cached: false,
            })
        }

        fn dimension(&self) -> usize {
            MODEL_DIM
        }

        fn is_available(&self) -> bool {
            true
        }
    }
}

#[cfg(feature = "onnx")]
pub use inner::OnnxEmbedder;
