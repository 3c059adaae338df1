//! Error types for the pathways pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input error: {0}")]
    Input(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Vectorizer error: {0}")]
    Vectorize(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Clustering error: {0}")]
    Clustering(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
