//! Audit export for the near-duplicate merge pass.

use std::path::Path;

use tracing::info;

use pathways_core::Result;
use pathways_lexical::MergeOutcome;

/// Write the `Original_Indicator → Clustered_Indicator` audit CSV,
/// one row per unique indicator in first-seen order.
pub fn write_audit(path: &Path, unique: &[String], outcome: &MergeOutcome) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["Original_Indicator", "Clustered_Indicator"])?;
    for indicator in unique {
        let representative = outcome
            .mapping
            .get(indicator)
            .map(String::as_str)
            .unwrap_or("");
        writer.write_record([indicator.as_str(), representative])?;
    }
    writer.flush()?;
    info!("Wrote audit mapping ({} indicators) to {}", unique.len(), path.display());
    Ok(())
}
