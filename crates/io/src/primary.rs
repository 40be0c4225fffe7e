// Primary workbook access - load, annotate matched cells, save a copy.
//
// The primary registry is read and written with umya-spreadsheet so the
// annotated copy keeps every style the original carried. The highlight
// touches only the fill of the target cell's existing style.

use std::path::Path;

use licrec_engine::model::{CellScalar, SheetGrid};
use umya_spreadsheet::{Cell, Spreadsheet, Worksheet};

/// A merged region in 1-based sheet coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl MergeRange {
    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.start_row
            && row <= self.end_row
            && col >= self.start_col
            && col <= self.end_col
    }
}

/// Resolve a cell through merged regions to its writable master cell,
/// the region's top-left corner.
pub fn merge_master(merges: &[MergeRange], row: u32, col: u32) -> (u32, u32) {
    merges
        .iter()
        .find(|merge| merge.contains(row, col))
        .map(|merge| (merge.start_row, merge.start_col))
        .unwrap_or((row, col))
}

#[derive(Debug)]
pub struct PrimaryBook {
    book: Spreadsheet,
    sheet_index: usize,
    grid: SheetGrid,
    merges: Vec<MergeRange>,
}

impl PrimaryBook {
    /// Open the primary workbook and snapshot the configured worksheet
    /// (zero-based index).
    pub fn open(path: &Path, sheet_index: usize) -> Result<Self, String> {
        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;

        let sheet = book.get_sheet(&sheet_index).ok_or_else(|| {
            format!(
                "{} has no worksheet at index {} ({} sheet(s) present)",
                path.display(),
                sheet_index,
                book.get_sheet_count()
            )
        })?;

        let grid = grid_from_sheet(sheet);
        let merges = merge_ranges(sheet);

        Ok(Self {
            book,
            sheet_index,
            grid,
            merges,
        })
    }

    /// Snapshot of the worksheet taken at open time.
    pub fn grid(&self) -> &SheetGrid {
        &self.grid
    }

    pub fn merges(&self) -> &[MergeRange] {
        &self.merges
    }

    /// Overlay the accent fill on a cell, redirected to its merge
    /// master. Only the fill changes; font, borders and number format
    /// survive.
    pub fn highlight(&mut self, row: u32, col: u32, argb: &str) -> Result<(), String> {
        let (row, col) = merge_master(&self.merges, row, col);
        let sheet = self
            .book
            .get_sheet_mut(&self.sheet_index)
            .ok_or_else(|| format!("worksheet {} out of range", self.sheet_index))?;
        sheet.get_style_mut((col, row)).set_background_color(argb);
        Ok(())
    }

    /// Write the annotated copy; the original file is left untouched.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        umya_spreadsheet::writer::xlsx::write(&self.book, path)
            .map_err(|e| format!("Failed to save {}: {}", path.display(), e))
    }
}

fn grid_from_sheet(sheet: &Worksheet) -> SheetGrid {
    let mut rows: Vec<Vec<CellScalar>> = Vec::new();
    for row_dimension in sheet.get_row_dimensions() {
        let row_num = *row_dimension.get_row_num();
        for cell in sheet.get_collection_by_row(&row_num) {
            let scalar = scalar_from_cell(cell);
            if scalar == CellScalar::Absent {
                continue;
            }
            let row = row_num as usize - 1;
            let col = *cell.get_coordinate().get_col_num() as usize - 1;
            if rows.len() <= row {
                rows.resize_with(row + 1, Vec::new);
            }
            if rows[row].len() <= col {
                rows[row].resize(col + 1, CellScalar::Absent);
            }
            rows[row][col] = scalar;
        }
    }
    SheetGrid::new(rows)
}

fn scalar_from_cell(cell: &Cell) -> CellScalar {
    let value = cell.get_cell_value().get_value();
    if value.is_empty() {
        CellScalar::Absent
    } else {
        CellScalar::Text(value.to_string())
    }
}

fn merge_ranges(sheet: &Worksheet) -> Vec<MergeRange> {
    sheet
        .get_merge_cells()
        .iter()
        .filter_map(|range| parse_a1_range(&range.get_range()))
        .collect()
}

/// Parse an A1-style range ("B2:B4", or a bare "B2") into 1-based
/// coordinates. Absolute markers ($) are ignored.
fn parse_a1_range(range: &str) -> Option<MergeRange> {
    let (start, end) = match range.split_once(':') {
        Some((start, end)) => (start, end),
        None => (range, range),
    };
    let (start_row, start_col) = parse_a1_ref(start)?;
    let (end_row, end_col) = parse_a1_ref(end)?;
    Some(MergeRange {
        start_row: start_row.min(end_row),
        start_col: start_col.min(end_col),
        end_row: start_row.max(end_row),
        end_col: start_col.max(end_col),
    })
}

fn parse_a1_ref(cell: &str) -> Option<(u32, u32)> {
    let letters: String = cell.chars().filter(char::is_ascii_alphabetic).collect();
    let digits: String = cell.chars().filter(char::is_ascii_digit).collect();
    if letters.is_empty() || digits.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    for ch in letters.chars() {
        col = col * 26 + u32::from(ch.to_ascii_uppercase() as u8 - b'A' + 1);
    }
    let row: u32 = digits.parse().ok()?;
    Some((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a1_range_parsing() {
        assert_eq!(
            parse_a1_range("B2:B4"),
            Some(MergeRange {
                start_row: 2,
                start_col: 2,
                end_row: 4,
                end_col: 2,
            })
        );
        assert_eq!(
            parse_a1_range("$AA$10:$AB$12"),
            Some(MergeRange {
                start_row: 10,
                start_col: 27,
                end_row: 12,
                end_col: 28,
            })
        );
        assert_eq!(
            parse_a1_range("C3"),
            Some(MergeRange {
                start_row: 3,
                start_col: 3,
                end_row: 3,
                end_col: 3,
            })
        );
        assert_eq!(parse_a1_range(""), None);
        assert_eq!(parse_a1_range("12"), None);
    }

    #[test]
    fn merge_master_redirects_inside_region() {
        let merges = vec![MergeRange {
            start_row: 2,
            start_col: 2,
            end_row: 4,
            end_col: 3,
        }];

        assert_eq!(merge_master(&merges, 3, 3), (2, 2));
        assert_eq!(merge_master(&merges, 2, 2), (2, 2));
        assert_eq!(merge_master(&merges, 5, 2), (5, 2));
        assert_eq!(merge_master(&[], 7, 7), (7, 7));
    }

    #[test]
    fn open_annotate_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("main.xlsx");
        let annotated = dir.path().join("annotated.xlsx");

        // The registry sheet is the workbook's second worksheet; keys in
        // column B with a merged pair on rows 3-4.
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.new_sheet("Registry").unwrap();
        sheet.get_cell_mut("A1").set_value("STT");
        sheet.get_cell_mut("B1").set_value("Số giấy phép hoạt động");
        sheet.get_cell_mut("B2").set_value("A1");
        sheet.get_cell_mut("B3").set_value("B2");
        sheet.add_merge_cells("B3:B4");
        umya_spreadsheet::writer::xlsx::write(&book, &original).unwrap();

        let mut primary = PrimaryBook::open(&original, 1).unwrap();
        assert_eq!(
            primary.grid().cell(1, 2),
            &CellScalar::Text("Số giấy phép hoạt động".into())
        );
        assert_eq!(primary.grid().cell(2, 2), &CellScalar::Text("A1".into()));
        assert_eq!(
            merge_master(primary.merges(), 4, 2),
            (3, 2),
            "cells under the merge resolve to its master"
        );

        primary.highlight(2, 2, "FF6AFF00").unwrap();
        primary.highlight(4, 2, "FF6AFF00").unwrap();
        primary.save(&annotated).unwrap();

        let original_bytes = std::fs::metadata(&original).unwrap().len();
        assert!(original_bytes > 0, "original stays in place");

        // B4 sits under the merge, so the fill lands on its master B3.
        let reread = umya_spreadsheet::reader::xlsx::read(&annotated).unwrap();
        let sheet = reread.get_sheet(&1).unwrap();
        assert_eq!(fill_argb(sheet, (2, 2)).as_deref(), Some("FF6AFF00"));
        assert_eq!(fill_argb(sheet, (2, 3)).as_deref(), Some("FF6AFF00"));
        assert_eq!(fill_argb(sheet, (2, 4)), None);
    }

    #[test]
    fn highlight_overlays_fill_without_touching_the_font() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("main.xlsx");
        let annotated = dir.path().join("annotated.xlsx");

        let mut book = umya_spreadsheet::new_file();
        let sheet = book.new_sheet("Registry").unwrap();
        let cell = sheet.get_cell_mut("B2");
        cell.set_value("A1");
        cell.get_style_mut().get_font_mut().set_bold(true);
        umya_spreadsheet::writer::xlsx::write(&book, &original).unwrap();

        let mut primary = PrimaryBook::open(&original, 1).unwrap();
        primary.highlight(2, 2, "FF6AFF00").unwrap();
        primary.save(&annotated).unwrap();

        let reread = umya_spreadsheet::reader::xlsx::read(&annotated).unwrap();
        let sheet = reread.get_sheet(&1).unwrap();
        assert_eq!(fill_argb(sheet, (2, 2)).as_deref(), Some("FF6AFF00"));
        let style = sheet.get_cell((2, 2)).unwrap().get_style();
        let font = style.get_font().expect("font survives the highlight");
        assert!(*font.get_bold());
    }

    /// Foreground ARGB of a cell's pattern fill, if any.
    fn fill_argb(sheet: &Worksheet, coordinate: (u32, u32)) -> Option<String> {
        let cell = sheet.get_cell(coordinate)?;
        let fill = cell.get_style().get_fill()?;
        let color = fill.get_pattern_fill()?.get_foreground_color()?;
        Some(color.get_argb().to_string())
    }

    #[test]
    fn open_rejects_missing_worksheet_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.xlsx");

        let book = umya_spreadsheet::new_file();
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();

        let err = PrimaryBook::open(&path, 1).unwrap_err();
        assert!(err.contains("no worksheet at index 1"));
    }
}
