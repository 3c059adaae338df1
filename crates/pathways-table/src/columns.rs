//! Column names of the ToC table contract.

/// Free-text indicator extracted from a result statement.
pub const INDICATOR: &str = "Indicator";
/// The result statement the indicator came from.
pub const RESULT_STATEMENT: &str = "Result Statement";
/// Output / Outcome / Impact classification.
pub const RESULT_TYPE: &str = "Result Type";
/// Work package title.
pub const WP_TITLE: &str = "WP Title";
/// Source spreadsheet the row was combined from.
pub const SOURCE_FILE: &str = "Source_File";
/// Integer topic id; -1 is the outlier topic.
pub const TOPIC: &str = "Topic";

/// Canonical representative of the row's lexical cluster (added on export).
pub const CLUSTERED_INDICATOR: &str = "Clustered_Indicator";
/// Human-readable topic name (added on export).
pub const TOPIC_NAME: &str = "Topic_Name";
/// Curated pathway name joined from the lookup table (labeling stage).
pub const CLUSTER_NAME: &str = "Cluster_Name";

/// Columns every input table must carry.
pub const REQUIRED: &[&str] = &[
    INDICATOR,
    RESULT_STATEMENT,
    RESULT_TYPE,
    WP_TITLE,
    SOURCE_FILE,
];
