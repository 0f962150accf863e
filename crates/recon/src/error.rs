use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad threshold, empty input path, etc.).
    ConfigValidation(String),
    /// Missing required column in the website CSV.
    MissingColumn { column: String },
    /// Catalog item date could not be parsed.
    DateParse { title: String, value: String },
    /// Catalog export is not a JSON array of items.
    CatalogParse(String),
    /// IO error (file read, CSV decode, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { column } => {
                write!(f, "website records: missing column '{column}'")
            }
            Self::DateParse { title, value } => {
                write!(f, "catalog record '{title}': cannot parse date '{value}'")
            }
            Self::CatalogParse(msg) => write!(f, "catalog parse error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

