//! `licrec run` / `licrec validate` — the reconciliation driver.
//!
//! Phase order: index every secondary file, then run the primary pass
//! (annotating and depleting the index), then report residuals, then
//! save the annotated copy. Nothing is written before the primary pass
//! succeeds.

use std::path::Path;

use licrec_engine::config::{ReconConfig, ReportMode};
use licrec_engine::error::ReconError;
use licrec_engine::indexer::index_source;
use licrec_engine::matcher::match_primary;
use licrec_engine::model::{IndexOutcome, ReconIndex, ReconMeta, ReconResult, ReconSummary};
use licrec_engine::report::residual_records;
use licrec_io::primary::PrimaryBook;
use licrec_io::report::write_residual_report;
use licrec_io::source::{file_base_name, list_source_files, load_source_grid};

use crate::exit_codes::{EXIT_INVALID_CONFIG, EXIT_MISSING_KEY_COLUMN};
use crate::CliError;

pub fn cmd_run(config_path: &Path, json: bool, output: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;

    // File paths resolve relative to the config file's directory.
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    // Index every secondary file.
    let mut index = ReconIndex::new();
    let mut sources_indexed = 0;
    let mut sources_skipped = 0;

    let source_dir = base_dir.join(&config.sources.dir);
    let files =
        list_source_files(&source_dir, &config.sources.extension).map_err(CliError::runtime)?;
    for path in &files {
        eprintln!("reading {}", path.display());
        let grid = load_source_grid(path).map_err(CliError::runtime)?;
        let name = file_base_name(path);
        match index_source(&name, &grid, &config.sources, &mut index) {
            IndexOutcome::Indexed { .. } => sources_indexed += 1,
            IndexOutcome::MissingKeyColumn => {
                sources_skipped += 1;
                eprintln!(
                    "warning: no '{}' column in {}, skipping",
                    config.sources.key_header, name
                );
            }
        }
    }
    let keys_indexed = index.key_count();
    eprintln!("{keys_indexed} unique key(s) indexed from {sources_indexed} file(s)");

    // Primary pass: locate, mark, deplete. Aborting here (missing key
    // column, unreadable workbook) writes nothing.
    let primary_path = base_dir.join(&config.primary.file);
    let mut primary = PrimaryBook::open(&primary_path, config.primary.sheet_index)
        .map_err(CliError::runtime)?;

    let matches =
        match_primary(primary.grid(), &config.primary, &mut index).map_err(recon_error)?;
    for &row in &matches.matched_rows {
        primary
            .highlight(row, matches.key_column, &config.output.highlight_color)
            .map_err(CliError::runtime)?;
    }
    let keys_matched = matches.matched_rows.len();

    // Whatever survived the primary pass is the residual set.
    let keys_unmatched = index.key_count();
    let residuals = residual_records(index);
    if residuals.is_empty() {
        eprintln!("all keys reconciled against the primary sheet");
    } else {
        match config.output.report_mode {
            ReportMode::Workbook => {
                let report_path = base_dir.join(&config.output.report_file);
                write_residual_report(&residuals, &report_path).map_err(CliError::runtime)?;
                eprintln!("wrote {}", report_path.display());
            }
            ReportMode::Log => {
                for record in &residuals {
                    println!("{}\t{}\t{}", record.source_file, record.key, record.auxiliary);
                }
            }
        }
    }

    // Annotated copy last, never over the original.
    let annotated_path = base_dir.join(&config.output.annotated_file);
    primary.save(&annotated_path).map_err(CliError::runtime)?;
    eprintln!("wrote {}", annotated_path.display());

    let summary = ReconSummary {
        sources_indexed,
        sources_skipped,
        keys_indexed,
        keys_matched,
        keys_unmatched,
        residual_records: residuals.len(),
    };
    eprintln!(
        "recon '{}': {} file(s) indexed, {} skipped; {} key(s): {} resolved, {} unmatched ({} residual record(s))",
        config.name,
        summary.sources_indexed,
        summary.sources_skipped,
        summary.keys_indexed,
        summary.keys_matched,
        summary.keys_unmatched,
        summary.residual_records,
    );

    let result = ReconResult {
        meta: ReconMeta::new(&config.name),
        summary,
        residuals,
    };
    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::runtime(format!("JSON serialization error: {e}")))?;

    if let Some(path) = output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::runtime(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }
    if json {
        println!("{json_str}");
    }

    eprintln!("reconciliation complete");
    Ok(())
}

pub fn cmd_validate(config_path: &Path) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    eprintln!(
        "valid: recon '{}' — primary '{}' (sheet {}), sources '{}/*.{}'",
        config.name,
        config.primary.file,
        config.primary.sheet_index,
        config.sources.dir,
        config.sources.extension,
    );
    Ok(())
}

fn load_config(config_path: &Path) -> Result<ReconConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| CliError::runtime(format!("cannot read config: {e}")))?;
    ReconConfig::from_toml(&config_str).map_err(recon_error)
}

fn recon_error(err: ReconError) -> CliError {
    let code = match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::KeyColumnNotFound { .. } => EXIT_MISSING_KEY_COLUMN,
    };
    CliError::new(code, err.to_string())
}
