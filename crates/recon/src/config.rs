use serde::{Deserialize, Serialize};

use crate::error::ReconError;

pub const DEFAULT_THRESHOLD: u8 = 90;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    pub inputs: InputConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Paths are resolved relative to the config file's directory.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub website: String,
    pub catalog: String,
    #[serde(default)]
    pub website_columns: WebsiteColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebsiteColumns {
    #[serde(default = "default_title_column")]
    pub title: String,
    #[serde(default = "default_authors_column")]
    pub authors: String,
}

fn default_title_column() -> String {
    "title".into()
}

fn default_authors_column() -> String {
    "authors".into()
}

impl Default for WebsiteColumns {
    fn default() -> Self {
        Self {
            title: default_title_column(),
            authors: default_authors_column(),
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    /// A pair is accepted only when its score is strictly greater.
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default)]
    pub strategy: MatchStrategy,
}

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            strategy: MatchStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Website order, best available title, no revisiting.
    #[default]
    Greedy,
    /// Highest-scoring pairs across the whole input are committed first.
    BestFirst,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Greedy => write!(f, "greedy"),
            Self::BestFirst => write!(f, "best_first"),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub report: Option<String>,
    #[serde(default)]
    pub json: Option<String>,
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
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }

        if self.matching.threshold > 100 {
            return Err(ReconError::ConfigValidation(format!(
                "threshold must be between 0 and 100, got {}",
                self.matching.threshold
            )));
        }

        if self.inputs.website.trim().is_empty() {
            return Err(ReconError::ConfigValidation("inputs.website must not be empty".into()));
        }
        if self.inputs.catalog.trim().is_empty() {
            return Err(ReconError::ConfigValidation("inputs.catalog must not be empty".into()));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
name = "Lab publications"

[inputs]
website = "website.csv"
catalog = "catalog.json"
"#;

    #[test]
    fn parse_minimal_uses_defaults() {
        let config = ReconConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.name, "Lab publications");
        assert_eq!(config.matching.threshold, 90);
        assert_eq!(config.matching.strategy, MatchStrategy::Greedy);
        assert_eq!(config.inputs.website_columns.title, "title");
        assert_eq!(config.inputs.website_columns.authors, "authors");
        assert!(config.output.report.is_none());
        assert!(config.output.json.is_none());
    }

    #[test]
    fn parse_full() {
        let input = r#"
name = "Full"

[inputs]
website = "web.csv"
catalog = "zot.json"

[inputs.website_columns]
title = "Title"
authors = "Authors"

[matching]
threshold = 85
strategy = "best_first"

[output]
report = "out.tsv"
json = "out.json"
"#;
        let config = ReconConfig::from_toml(input).unwrap();
        assert_eq!(config.matching.threshold, 85);
        assert_eq!(config.matching.strategy, MatchStrategy::BestFirst);
        assert_eq!(config.inputs.website_columns.title, "Title");
        assert_eq!(config.output.report.as_deref(), Some("out.tsv"));
        assert_eq!(config.output.json.as_deref(), Some("out.json"));
    }

    #[test]
    fn reject_threshold_above_100() {
        let input = format!("{MINIMAL}\n[matching]\nthreshold = 101\n");
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("between 0 and 100"));
    }

    #[test]
    fn reject_unknown_strategy() {
        let input = format!("{MINIMAL}\n[matching]\nstrategy = \"hungarian\"\n");
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn reject_empty_input_path() {
        let input = r#"
name = "Bad"

[inputs]
website = ""
catalog = "catalog.json"
"#;
        let err = ReconConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("inputs.website"));
    }

    #[test]
    fn reject_missing_inputs() {
        let err = ReconConfig::from_toml("name = \"x\"\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }
}
