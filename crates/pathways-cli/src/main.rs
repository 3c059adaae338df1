//! pathways — batch clustering of ToC indicator statements.

use tracing::info;
use tracing_subscriber::EnvFilter;

use pathways_core::PipelineConfig;
use pathways_pipeline::{ClusterPipeline, LabelingStage};
use pathways_topics::DbscanClusterer;

const USAGE: &str = "\
Usage: pathways [COMMAND]

Commands:
  cluster   Run the clustering pipeline over the combined input table (default)
  label     Join curated pathway names onto the clustered export

Environment:
  PATHWAYS_DATA_DIR    Data root (default: data)
  PATHWAYS_MODEL_DIR   Sentence-embedding model directory (default: data/model)
  RUST_LOG             Log filter (default: info)
";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("cluster");

    match command {
        "cluster" => run_cluster(),
        "label" => run_label(),
        "--help" | "-h" | "help" => {
            print!("{}", USAGE);
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}\n\n{}", other, USAGE);
            std::process::exit(2);
        }
    }
}

fn run_cluster() -> anyhow::Result<()> {
    let config = PipelineConfig::from_env()?;
    info!(
        "Clustering {} (threshold {})",
        config.data_paths.input_file.display(),
        config.merge.similarity_threshold
    );

    let embedder = pathways_embed::create_embedder(&config.data_paths.model_dir);
    let clusterer = DbscanClusterer;
    let pipeline = ClusterPipeline::new(
        embedder.as_ref(),
        &clusterer,
        config.merge.clone(),
        config.topics.clone(),
    );

    let report = pipeline.run(&config.data_paths)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_label() -> anyhow::Result<()> {
    let config = PipelineConfig::from_env()?;
    info!(
        "Labeling {} with {}",
        config.data_paths.clustered_file.display(),
        config.data_paths.pathway_names_file.display()
    );

    let report = LabelingStage::run(&config.data_paths)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
