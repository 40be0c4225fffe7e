use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Raw cell values
// ---------------------------------------------------------------------------

/// A raw cell value as handed over by a loader, before normalization.
///
/// Closed set: every codec-specific value shape is converted into one of
/// these variants before the engine sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum CellScalar {
    Absent,
    Text(String),
    /// Rich-text runs in document order, text fragments only.
    Rich(Vec<String>),
    Number(f64),
    Bool(bool),
    /// Anything else, already stringified by the loader.
    Other(String),
}

static ABSENT: CellScalar = CellScalar::Absent;

/// A worksheet snapshot as dense row-major raw values.
///
/// Rows and columns are addressed 1-based to match spreadsheet
/// coordinates; rows carry no trailing-padding guarantees.
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    rows: Vec<Vec<CellScalar>>,
}

impl SheetGrid {
    pub fn new(rows: Vec<Vec<CellScalar>>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Cells of a 1-based row; empty when the row is past the data.
    pub fn row(&self, row: u32) -> &[CellScalar] {
        match row.checked_sub(1).map(|r| self.rows.get(r as usize)) {
            Some(Some(cells)) => cells,
            _ => &[],
        }
    }

    /// 1-based (row, col) lookup; `Absent` outside the data bounds.
    pub fn cell(&self, row: u32, col: u32) -> &CellScalar {
        match col.checked_sub(1) {
            Some(c) => self.row(row).get(c as usize).unwrap_or(&ABSENT),
            None => &ABSENT,
        }
    }
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

/// Where a key was seen: the secondary file's base name plus the fixed
/// auxiliary column's value from the same row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provenance {
    pub source_file: String,
    pub auxiliary: Option<String>,
}

/// Multi-valued key → provenance index, preserving key encounter order.
///
/// A key is present iff it was seen in some secondary file and has not
/// yet been matched against the primary sheet. Matching removes the
/// whole entry: one primary match resolves every provenance record for
/// that key.
#[derive(Debug, Default)]
pub struct ReconIndex {
    entries: HashMap<String, Vec<Provenance>>,
    order: Vec<String>,
}

impl ReconIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, provenance: Provenance) {
        match self.entries.entry(key) {
            Entry::Occupied(mut entry) => entry.get_mut().push(provenance),
            Entry::Vacant(entry) => {
                self.order.push(entry.key().clone());
                entry.insert(vec![provenance]);
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a key's entire entry, returning the provenance records it
    /// resolved, or `None` if the key was never indexed (or was already
    /// matched).
    pub fn remove(&mut self, key: &str) -> Option<Vec<Provenance>> {
        self.entries.remove(key)
    }

    /// Unique keys still unmatched.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Total provenance records still unmatched.
    pub fn record_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the index, yielding surviving entries in key encounter
    /// order. Keys removed by the matcher are skipped.
    pub fn into_residual(mut self) -> Vec<(String, Vec<Provenance>)> {
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .filter_map(|key| {
                let provenances = self.entries.remove(&key)?;
                Some((key, provenances))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Phase outcomes
// ---------------------------------------------------------------------------

/// Result of indexing one secondary sheet.
#[derive(Debug, PartialEq, Eq)]
pub enum IndexOutcome {
    Indexed { rows_indexed: usize },
    /// The header row had no cell matching the key label; the file
    /// contributes nothing and the run continues.
    MissingKeyColumn,
}

/// Result of the primary-sheet pass.
#[derive(Debug)]
pub struct MatchOutput {
    /// 1-based column where the key header was found.
    pub key_column: u32,
    /// 1-based rows whose key was resolved, in visit order.
    pub matched_rows: Vec<u32>,
}

// ---------------------------------------------------------------------------
// Report records
// ---------------------------------------------------------------------------

/// One line of the residual report: a secondary-file occurrence whose
/// key was never found in the primary sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidualRecord {
    pub source_file: String,
    pub key: String,
    pub auxiliary: String,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub sources_indexed: usize,
    pub sources_skipped: usize,
    pub keys_indexed: usize,
    pub keys_matched: usize,
    pub keys_unmatched: usize,
    pub residual_records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

impl ReconMeta {
    pub fn new(config_name: &str) -> Self {
        Self {
            config_name: config_name.to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub residuals: Vec<ResidualRecord>,
}
