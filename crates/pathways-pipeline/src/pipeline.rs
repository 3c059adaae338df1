//! Clustering batch pipeline.
//!
//! One linear run: load → unique indicators → near-duplicate merge and
//! topic assignment (independent passes over the same list) → join back
//! onto every row → export. Any stage failure aborts the run; reruns
//! start from scratch.

use std::collections::HashMap;

use chrono::Utc;
use tracing::info;

use pathways_core::{DataPaths, MergeParams, Result, TopicParams};
use pathways_embed::EmbedderBackend;
use pathways_lexical::{MergeOutcome, NearDuplicateMerger};
use pathways_table::{columns, TocTable};
use pathways_topics::{ClusterBackend, TopicAssigner, TopicModel};

use crate::export;
use crate::report::ClusterReport;

/// The clustering batch pipeline with its injected model backends.
pub struct ClusterPipeline<'a> {
    embedder: &'a dyn EmbedderBackend,
    clusterer: &'a dyn ClusterBackend,
    merge: MergeParams,
    topics: TopicParams,
}

impl<'a> ClusterPipeline<'a> {
    pub fn new(
        embedder: &'a dyn EmbedderBackend,
        clusterer: &'a dyn ClusterBackend,
        merge: MergeParams,
        topics: TopicParams,
    ) -> Self {
        Self {
            embedder,
            clusterer,
            merge,
            topics,
        }
    }

    /// Full batch: read the input table, enrich it, write the clustered
    /// export and the audit mapping.
    pub fn run(&self, paths: &DataPaths) -> Result<ClusterReport> {
        let start = std::time::Instant::now();

        let mut table = TocTable::from_csv_path(&paths.input_file)?;
        let (outcome, model, unique) = self.enrich(&mut table)?;

        table.write_csv_path(&paths.clustered_file)?;
        export::write_audit(&paths.audit_file, &unique, &outcome)?;

        let report = ClusterReport {
            rows: table.row_count(),
            unique_indicators: unique.len(),
            lexical_clusters: outcome.clusters.len(),
            merged_clusters: outcome.merged_cluster_count(),
            topics: model.topic_count(),
            outliers: model.outlier_count(),
            duration_ms: start.elapsed().as_millis() as u64,
            created_at: Some(Utc::now()),
        };
        info!(
            "Clustering complete: rows={}, unique={}, lexical_clusters={}, topics={}, outliers={}, duration={}ms",
            report.rows,
            report.unique_indicators,
            report.lexical_clusters,
            report.topics,
            report.outliers,
            report.duration_ms
        );
        Ok(report)
    }

    /// Enrich a loaded table in place with `Clustered_Indicator`, `Topic`,
    /// and `Topic_Name`. Pre-existing columns other than these three are
    /// never touched. Returns the two mappings and the unique indicator
    /// list for auditing.
    pub fn enrich(
        &self,
        table: &mut TocTable,
    ) -> Result<(MergeOutcome, TopicModel, Vec<String>)> {
        table.validate_contract()?;
        let unique = table.unique_indicators()?;
        info!(
            "Clustering {} unique indicators from {} rows",
            unique.len(),
            table.row_count()
        );

        let merger = NearDuplicateMerger::new(self.merge.similarity_threshold);
        let outcome = merger.merge(&unique)?;

        let assigner = TopicAssigner::new(self.embedder, self.clusterer, self.topics.clone());
        let model = assigner.assign(&unique)?;

        self.join(table, &unique, &outcome, &model)?;
        Ok((outcome, model, unique))
    }

    /// Left-join both mappings onto every row. Rows with a missing or
    /// unknown indicator get empty cells.
    fn join(
        &self,
        table: &mut TocTable,
        unique: &[String],
        outcome: &MergeOutcome,
        model: &TopicModel,
    ) -> Result<()> {
        let topic_of: HashMap<&str, i32> = unique
            .iter()
            .map(String::as_str)
            .zip(model.labels.iter().copied())
            .collect();

        let indicator_col = table.require_column(columns::INDICATOR)?;
        let mut clustered = Vec::with_capacity(table.row_count());
        let mut topic_ids = Vec::with_capacity(table.row_count());
        let mut topic_names = Vec::with_capacity(table.row_count());

        for row in 0..table.row_count() {
            let indicator = table.cell(row, indicator_col).trim().to_string();
            if indicator.is_empty() {
                clustered.push(String::new());
                topic_ids.push(String::new());
                topic_names.push(String::new());
                continue;
            }

            clustered.push(
                outcome
                    .mapping
                    .get(&indicator)
                    .cloned()
                    .unwrap_or_default(),
            );
            match topic_of.get(indicator.as_str()) {
                Some(&label) => {
                    topic_ids.push(label.to_string());
                    topic_names.push(model.name_of(label).to_string());
                }
                None => {
                    topic_ids.push(String::new());
                    topic_names.push(String::new());
                }
            }
        }

        table.set_column(columns::CLUSTERED_INDICATOR, clustered)?;
        table.set_column(columns::TOPIC, topic_ids)?;
        table.set_column(columns::TOPIC_NAME, topic_names)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};
    use pathways_core::Error;
    use pathways_embed::EmbeddingResult;
    use pathways_topics::NOISE_TOPIC;

    /// Embeds any text deterministically from its token overlap with two
    /// anchor themes; enough structure for the stub clusterer below.
    struct ThemeEmbedder;

    impl EmbedderBackend for ThemeEmbedder {
        fn embed(&self, text: &str) -> Option<EmbeddingResult> {
            let lowered = text.to_lowercase();
            let poverty = lowered.contains("poverty") as u8 as f32;
            let literacy = lowered.contains("literacy") as u8 as f32;
            Some(EmbeddingResult {
                embedding: Array1::from_vec(vec![poverty, literacy]),
                cached: false,
            })
        }

        fn dimension(&self) -> usize {
            2
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    /// Labels rows by dominant coordinate; all-zero rows are noise.
    struct ThemeClusterer;

    impl ClusterBackend for ThemeClusterer {
        fn cluster(&self, embeddings: &Array2<f64>, _params: &TopicParams) -> Result<Vec<i32>> {
            if embeddings.nrows() == 0 {
                return Err(Error::Clustering("empty input".to_string()));
            }
            Ok(embeddings
                .rows()
                .into_iter()
                .map(|row| {
                    if row[0] > 0.0 {
                        0
                    } else if row[1] > 0.0 {
                        1
                    } else {
                        NOISE_TOPIC
                    }
                })
                .collect())
        }

        fn name(&self) -> &str {
            "theme-stub"
        }
    }

    fn sample_table() -> TocTable {
        let headers = vec![
            "Indicator".to_string(),
            "Result Statement".to_string(),
            "Result Type".to_string(),
            "WP Title".to_string(),
            "Source_File".to_string(),
        ];
        let mk = |ind: &str, stmt: &str| {
            vec![
                ind.to_string(),
                stmt.to_string(),
                "Outcome".to_string(),
                "WP1".to_string(),
                "a.xlsx".to_string(),
            ]
        };
        TocTable::new(
            headers,
            vec![
                mk("reduce poverty", "Poverty is reduced"),
                mk("reduce poverty rate", "Poverty rate falls"),
                mk("increase literacy", "Literacy rises"),
                mk("", "Row without indicator"),
                mk("reduce poverty", "Duplicate indicator row"),
            ],
        )
        .unwrap()
    }

    fn pipeline<'a>(
        embedder: &'a ThemeEmbedder,
        clusterer: &'a ThemeClusterer,
    ) -> ClusterPipeline<'a> {
        ClusterPipeline::new(
            embedder,
            clusterer,
            MergeParams::default(),
            TopicParams::default(),
        )
    }

    #[test]
    fn test_enrich_end_to_end() {
        let embedder = ThemeEmbedder;
        let clusterer = ThemeClusterer;
        let mut table = sample_table();
        let rows_before = table.row_count();

        let (outcome, model, unique) = pipeline(&embedder, &clusterer)
            .enrich(&mut table)
            .unwrap();

        assert_eq!(table.row_count(), rows_before);
        assert_eq!(unique, vec![
            "reduce poverty",
            "reduce poverty rate",
            "increase literacy",
        ]);
        assert_eq!(model.labels.len(), unique.len());
        assert_eq!(outcome.mapping["reduce poverty rate"], "reduce poverty");

        let clustered = table.column_index("Clustered_Indicator").unwrap();
        assert_eq!(table.cell(0, clustered), "reduce poverty");
        assert_eq!(table.cell(1, clustered), "reduce poverty");
        assert_eq!(table.cell(2, clustered), "increase literacy");
        assert_eq!(table.cell(3, clustered), "");
        assert_eq!(table.cell(4, clustered), "reduce poverty");

        let topic = table.column_index("Topic").unwrap();
        assert_eq!(table.cell(0, topic), "0");
        assert_eq!(table.cell(3, topic), "");

        let name = table.column_index("Topic_Name").unwrap();
        assert_eq!(table.cell(0, name), table.cell(4, name));
        assert!(!table.cell(2, name).is_empty());
    }

    #[test]
    fn test_enrich_preserves_original_columns() {
        let embedder = ThemeEmbedder;
        let clusterer = ThemeClusterer;
        let mut table = sample_table();
        let before: Vec<Vec<String>> = (0..table.row_count())
            .map(|r| (0..5).map(|c| table.cell(r, c).to_string()).collect())
            .collect();

        pipeline(&embedder, &clusterer).enrich(&mut table).unwrap();

        for (r, row) in before.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                assert_eq!(table.cell(r, c), value);
            }
        }
    }

    #[test]
    fn test_missing_contract_column_is_fatal() {
        let embedder = ThemeEmbedder;
        let clusterer = ThemeClusterer;
        let mut table = TocTable::new(vec!["Indicator".to_string()], vec![]).unwrap();
        assert!(matches!(
            pipeline(&embedder, &clusterer).enrich(&mut table),
            Err(Error::MissingColumn(_))
        ));
    }

    #[test]
    fn test_run_writes_export_and_audit() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path()).unwrap();
        {
            let mut writer = csv::Writer::from_path(&paths.input_file).unwrap();
            sample_table().write_csv(&mut writer).unwrap();
        }

        let embedder = ThemeEmbedder;
        let clusterer = ThemeClusterer;
        let report = pipeline(&embedder, &clusterer).run(&paths).unwrap();

        assert_eq!(report.rows, 5);
        assert_eq!(report.unique_indicators, 3);
        assert_eq!(report.merged_clusters, 1);
        assert!(paths.clustered_file.exists());
        assert!(paths.audit_file.exists());

        let exported = TocTable::from_csv_path(&paths.clustered_file).unwrap();
        assert_eq!(exported.row_count(), 5);
        assert!(exported.column_index("Clustered_Indicator").is_some());
    }
}
