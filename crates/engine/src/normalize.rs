use crate::model::CellScalar;

/// Collapse a raw cell value into its canonical text form.
///
/// Returns `None` for absent cells and for values that trim to the
/// empty string; such cells are never indexed and never matched.
/// This function has no failure mode — unexpected shapes degrade to
/// their string conversion.
pub fn normalize(value: &CellScalar) -> Option<String> {
    let text = match value {
        CellScalar::Absent => return None,
        CellScalar::Text(s) => s.clone(),
        CellScalar::Rich(runs) => runs.concat(),
        CellScalar::Number(n) => format_number(*n),
        CellScalar::Bool(true) => "TRUE".to_string(),
        CellScalar::Bool(false) => "FALSE".to_string(),
        CellScalar::Other(s) => s.clone(),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Integers render without a decimal point, matching cell display.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
