// Residual report export (xlsx only).

use std::path::Path;

use licrec_engine::model::ResidualRecord;
use licrec_engine::report::{REPORT_COLUMN_WIDTHS, REPORT_HEADER};
use rust_xlsxwriter::{Format, Workbook};

/// Write the residual report workbook: a bold fixed header, fixed
/// column widths, one row per unmatched provenance record.
///
/// Callers are expected to skip this entirely when there is nothing to
/// report; an empty record list still produces a header-only artifact.
pub fn write_residual_report(records: &[ResidualRecord], path: &Path) -> Result<(), String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Unmatched")
        .map_err(|e| format!("Failed to name report sheet: {}", e))?;

    let header_format = Format::new().set_bold();
    for (col, header) in REPORT_HEADER.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| format!("Failed to write report header: {}", e))?;
    }
    for (col, width) in REPORT_COLUMN_WIDTHS.iter().enumerate() {
        worksheet
            .set_column_width(col as u16, *width)
            .map_err(|e| format!("Failed to set report column width: {}", e))?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        worksheet
            .write_string(row, 0, &record.source_file)
            .and_then(|ws| ws.write_string(row, 1, &record.key))
            .and_then(|ws| ws.write_string(row, 2, &record.auxiliary))
            .map_err(|e| format!("Failed to write report row {}: {}", row + 1, e))?;
    }

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save report {}: {}", path.display(), e))
}
