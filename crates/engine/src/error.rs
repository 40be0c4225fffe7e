use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (blank label, bad offset, path collision).
    ConfigValidation(String),
    /// The primary sheet's header row has no column with the expected
    /// label. Structural: the run aborts before any artifact is written.
    KeyColumnNotFound { sheet: String, label: String },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::KeyColumnNotFound { sheet, label } => {
                write!(f, "{sheet}: no column labeled '{label}'")
            }
        }
    }
}

impl std::error::Error for ReconError {}
