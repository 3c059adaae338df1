//! Pathways Topics — density-based topic clustering and naming.

pub mod assigner;
pub mod clusterer;
pub mod terms;
pub mod types;

pub use assigner::TopicAssigner;
pub use clusterer::{ClusterBackend, DbscanClusterer, NOISE_TOPIC};
pub use types::{TopicModel, OUTLIER_NAME};
