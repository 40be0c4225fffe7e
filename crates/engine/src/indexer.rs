use crate::config::SourcesConfig;
use crate::model::{CellScalar, IndexOutcome, Provenance, ReconIndex, SheetGrid};
use crate::normalize::normalize;

/// Find the 1-based column whose header cell normalizes to `label`.
pub fn find_key_column(header_cells: &[CellScalar], label: &str) -> Option<u32> {
    header_cells
        .iter()
        .position(|cell| normalize(cell).as_deref() == Some(label))
        .map(|idx| idx as u32 + 1)
}

/// Index one secondary sheet into `index`.
///
/// The key column is located by scanning the configured header row; the
/// auxiliary value always comes from the fixed auxiliary column, whether
/// or not that is where the key column was found. Rows whose key
/// normalizes to empty contribute nothing.
pub fn index_source(
    source_file: &str,
    grid: &SheetGrid,
    config: &SourcesConfig,
    index: &mut ReconIndex,
) -> IndexOutcome {
    let Some(key_column) = find_key_column(grid.row(config.header_row), &config.key_header)
    else {
        return IndexOutcome::MissingKeyColumn;
    };

    let mut rows_indexed = 0;
    for row in (config.header_row + 1)..=grid.row_count() {
        let Some(key) = normalize(grid.cell(row, key_column)) else {
            continue;
        };
        let auxiliary = normalize(grid.cell(row, config.aux_column));
        index.insert(
            key,
            Provenance {
                source_file: source_file.to_string(),
                auxiliary,
            },
        );
        rows_indexed += 1;
    }

    IndexOutcome::Indexed { rows_indexed }
}
