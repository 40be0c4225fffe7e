use crate::config::PrimaryConfig;
use crate::error::ReconError;
use crate::indexer::find_key_column;
use crate::model::{MatchOutput, ReconIndex, SheetGrid};
use crate::normalize::normalize;

/// Single forward pass over the primary sheet.
///
/// Rows whose normalized key is present in the index are recorded as
/// matched and the key's whole entry is removed: one primary match
/// resolves every provenance record for that key. A duplicate key later
/// in the sheet therefore finds nothing and stays unmarked.
///
/// A primary sheet without the expected key column is a structural
/// failure and aborts the run.
pub fn match_primary(
    grid: &SheetGrid,
    config: &PrimaryConfig,
    index: &mut ReconIndex,
) -> Result<MatchOutput, ReconError> {
    let key_column = find_key_column(grid.row(config.header_row), &config.key_header)
        .ok_or_else(|| ReconError::KeyColumnNotFound {
            sheet: format!("primary worksheet {}", config.sheet_index),
            label: config.key_header.clone(),
        })?;

    let mut matched_rows = Vec::new();
    for row in (config.header_row + 1)..=grid.row_count() {
        let Some(key) = normalize(grid.cell(row, key_column)) else {
            continue;
        };
        if index.remove(&key).is_some() {
            matched_rows.push(row);
        }
    }

    Ok(MatchOutput {
        key_column,
        matched_rows,
    })
}
