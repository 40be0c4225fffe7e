use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    pub primary: PrimaryConfig,
    pub sources: SourcesConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Primary workbook
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PrimaryConfig {
    pub file: String,
    /// Zero-based worksheet index; the annotated sheet is the second
    /// one by default.
    #[serde(default = "default_primary_sheet_index")]
    pub sheet_index: usize,
    #[serde(default = "default_primary_header_row")]
    pub header_row: u32,
    pub key_header: String,
}

// ---------------------------------------------------------------------------
// Secondary sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    pub dir: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_sources_header_row")]
    pub header_row: u32,
    pub key_header: String,
    /// 1-based physical column holding the auxiliary value, independent
    /// of where the key column is found.
    #[serde(default = "default_aux_column")]
    pub aux_column: u32,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Annotated copy of the primary workbook; the original is never
    /// overwritten.
    #[serde(default = "default_annotated_file")]
    pub annotated_file: String,
    #[serde(default = "default_report_file")]
    pub report_file: String,
    #[serde(default)]
    pub report_mode: ReportMode,
    /// ARGB fill applied to matched key cells.
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportMode {
    /// Residuals land in a generated report workbook.
    Workbook,
    /// Residuals are printed as lines instead.
    Log,
}

impl Default for ReportMode {
    fn default() -> Self {
        Self::Workbook
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            annotated_file: default_annotated_file(),
            report_file: default_report_file(),
            report_mode: ReportMode::default(),
            highlight_color: default_highlight_color(),
        }
    }
}

// Defaults mirror the layout this tool was built against: secondary
// registries carry their header on row 4 with the facility name in
// column 3, the primary registry keeps its header on row 1 of the
// second sheet.

fn default_primary_sheet_index() -> usize {
    1
}

fn default_primary_header_row() -> u32 {
    1
}

fn default_extension() -> String {
    "xlsx".into()
}

fn default_sources_header_row() -> u32 {
    4
}

fn default_aux_column() -> u32 {
    3
}

fn default_annotated_file() -> String {
    "annotated.xlsx".into()
}

fn default_report_file() -> String {
    "residuals.xlsx".into()
}

fn default_highlight_color() -> String {
    "FF6AFF00".into()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.primary.key_header.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "primary.key_header must not be blank".into(),
            ));
        }
        if self.sources.key_header.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "sources.key_header must not be blank".into(),
            ));
        }
        if self.primary.header_row == 0 || self.sources.header_row == 0 {
            return Err(ReconError::ConfigValidation(
                "header rows are 1-based and must be >= 1".into(),
            ));
        }
        if self.sources.aux_column == 0 {
            return Err(ReconError::ConfigValidation(
                "sources.aux_column is 1-based and must be >= 1".into(),
            ));
        }
        if self.sources.extension.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "sources.extension must not be blank".into(),
            ));
        }
        if self.output.annotated_file == self.primary.file {
            return Err(ReconError::ConfigValidation(format!(
                "output.annotated_file '{}' would overwrite the primary workbook",
                self.output.annotated_file
            )));
        }

        let color = &self.output.highlight_color;
        if color.len() != 8 || !color.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ReconError::ConfigValidation(format!(
                "output.highlight_color '{color}' is not an 8-digit ARGB value"
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
