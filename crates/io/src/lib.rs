// Spreadsheet I/O - secondary import, primary annotation, residual report

pub mod primary;
pub mod report;
pub mod source;
