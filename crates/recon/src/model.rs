use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::MatchStrategy;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A publication as listed on the public website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebsiteRecord {
    pub title: String,
    pub authors: String,
}

/// One entry of a catalog item's creator list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub creator_type: String,
}

impl Creator {
    pub fn is_author(&self) -> bool {
        self.creator_type == "author"
    }
}

/// A publication as held by the reference manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRecord {
    pub title: String,
    pub authors: Vec<Creator>,
    pub date: NaiveDate,
    pub url: String,
}

/// Pre-loaded records from both sides, in collector order.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub website: Vec<WebsiteRecord>,
    pub catalog: Vec<CatalogRecord>,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    Matched {
        website: WebsiteRecord,
        catalog: CatalogRecord,
        score: u8,
    },
    /// `best_score` is the highest score seen even though it was rejected.
    WebsiteOnly {
        website: WebsiteRecord,
        best_score: u8,
    },
    CatalogOnly {
        catalog: CatalogRecord,
    },
}

impl MatchOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Matched { .. } => "matched",
            Self::WebsiteOnly { .. } => "website_only",
            Self::CatalogOnly { .. } => "catalog_only",
        }
    }

    pub fn website(&self) -> Option<&WebsiteRecord> {
        match self {
            Self::Matched { website, .. } | Self::WebsiteOnly { website, .. } => Some(website),
            Self::CatalogOnly { .. } => None,
        }
    }

    pub fn catalog(&self) -> Option<&CatalogRecord> {
        match self {
            Self::Matched { catalog, .. } | Self::CatalogOnly { catalog } => Some(catalog),
            Self::WebsiteOnly { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub matched: usize,
    pub website_only: usize,
    pub catalog_only: usize,
    pub website_total: usize,
    pub catalog_total: usize,
}

impl ReconSummary {
    pub fn unmatched(&self) -> usize {
        self.website_only + self.catalog_only
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub outcomes: Vec<MatchOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub strategy: MatchStrategy,
    pub threshold: u8,
    pub engine_version: String,
    pub run_at: String,
}
