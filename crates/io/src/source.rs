// Secondary file import (read-only).
//
// Secondary registries are one-way inputs: they are opened, their first
// worksheet snapshotted into a raw grid, and closed. Nothing is ever
// written back to them.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use licrec_engine::model::{CellScalar, SheetGrid};

/// Secondary files in name order, so provenance ordering is stable
/// across platforms.
pub fn list_source_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory {}: {}", dir.display(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to list {}: {}", dir.display(), e))?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Base name of a path, as recorded in provenance.
pub fn file_base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load the first worksheet of a secondary file as a raw grid.
pub fn load_source_grid(path: &Path) -> Result<SheetGrid, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names
        .first()
        .ok_or_else(|| format!("{} contains no sheets", path.display()))?;

    let range = workbook
        .worksheet_range(first)
        .map_err(|e| format!("Failed to read sheet '{}': {}", first, e))?;

    // The used range may not begin at A1; pad so grid coordinates stay
    // aligned with sheet coordinates.
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<CellScalar>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![CellScalar::Absent; start_col as usize];
        cells.extend(row.iter().map(scalar_from_data));
        rows.push(cells);
    }

    Ok(SheetGrid::new(rows))
}

fn scalar_from_data(data: &Data) -> CellScalar {
    match data {
        Data::Empty => CellScalar::Absent,
        Data::String(s) => CellScalar::Text(s.clone()),
        Data::Float(n) => CellScalar::Number(*n),
        Data::Int(n) => CellScalar::Number(*n as f64),
        Data::Bool(b) => CellScalar::Bool(*b),
        Data::Error(e) => CellScalar::Other(format!("#{:?}", e)),
        Data::DateTime(dt) => CellScalar::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellScalar::Text(s.clone()),
    }
}
