//! Pathways Embed — sentence-embedding backends for indicator statements.
//!
//! The `EmbedderBackend` trait is the seam between the deterministic
//! pipeline and the pretrained model. With the `onnx` feature enabled and
//! model files present, `OnnxEmbedder` produces real vectors; otherwise
//! `UnavailableEmbedder` is returned and topic assignment fails fast.

pub mod cache;
pub mod embedder;
pub mod onnx_embedder;

pub use cache::EmbeddingCache;
pub use embedder::{EmbedderBackend, EmbeddingResult, UnavailableEmbedder};

#[cfg(feature = "onnx")]
pub use onnx_embedder::OnnxEmbedder;

use std::path::Path;
use std::sync::Arc;

/// Create the best available embedder for the given model directory.
pub fn create_embedder(model_dir: &Path) -> Arc<dyn EmbedderBackend> {
    #[cfg(feature = "onnx")]
    {
        match OnnxEmbedder::load(model_dir) {
            Ok(embedder) => {
                tracing::info!("Using ONNX embedder (dim={})", embedder.dimension());
                return Arc::new(embedder);
            }
            Err(e) => {
                tracing::warn!("ONNX embedder unavailable: {}", e);
            }
        }
    }

    #[cfg(not(feature = "onnx"))]
    {
        let _ = model_dir;
        tracing::warn!("Built without the onnx feature; no embedding backend");
    }

    Arc::new(UnavailableEmbedder::new(384))
}
