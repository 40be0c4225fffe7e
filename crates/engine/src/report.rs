use crate::model::{ReconIndex, ResidualRecord};

/// Placeholder shown when the auxiliary column was empty for a row.
pub const AUX_PLACEHOLDER: &str = "(blank)";

/// Fixed header of the residual report artifact.
pub const REPORT_HEADER: [&str; 3] = ["Source file", "Key", "Auxiliary"];

/// Report column widths, in character units.
pub const REPORT_COLUMN_WIDTHS: [f64; 3] = [25.0, 25.0, 40.0];

/// Drain the index into one record per unmatched provenance entry:
/// keys in encounter order, provenance in row order within each key.
pub fn residual_records(index: ReconIndex) -> Vec<ResidualRecord> {
    let mut records = Vec::with_capacity(index.record_count());
    for (key, provenances) in index.into_residual() {
        for provenance in provenances {
            records.push(ResidualRecord {
                source_file: provenance.source_file,
                key: key.clone(),
                auxiliary: provenance
                    .auxiliary
                    .unwrap_or_else(|| AUX_PLACEHOLDER.to_string()),
            });
        }
    }
    records
}
