use std::collections::HashMap;

use chrono::NaiveDate;
use log::{info, warn};
use serde::Deserialize;

use crate::config::{MatchStrategy, ReconConfig, WebsiteColumns};
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::matcher::{match_best_first, match_greedy};
use crate::model::{
    CatalogRecord, Creator, MatchOutcome, ReconInput, ReconMeta, ReconResult, WebsiteRecord,
};
use crate::scorer::{TitleScorer, TokenScorer};

/// Greedy reconciliation with the default title scorer.
pub fn reconcile(
    website: &[WebsiteRecord],
    catalog: &[CatalogRecord],
    threshold: u8,
) -> Vec<MatchOutcome> {
    match_greedy(website, catalog, threshold, &TokenScorer)
}

/// Run reconciliation per config. Returns outcomes + summary.
pub fn run(config: &ReconConfig, input: &ReconInput) -> ReconResult {
    run_with_scorer(config, input, &TokenScorer)
}

pub fn run_with_scorer(
    config: &ReconConfig,
    input: &ReconInput,
    scorer: &dyn TitleScorer,
) -> ReconResult {
    warn_duplicate_titles(&input.catalog);

    let threshold = config.matching.threshold;
    let outcomes = match config.matching.strategy {
        MatchStrategy::Greedy => match_greedy(&input.website, &input.catalog, threshold, scorer),
        MatchStrategy::BestFirst => {
            match_best_first(&input.website, &input.catalog, threshold, scorer)
        }
    };

    let summary = compute_summary(&outcomes);
    info!(
        "{} recon '{}': {} matched, {} website only, {} catalog only",
        config.matching.strategy,
        config.name,
        summary.matched,
        summary.website_only,
        summary.catalog_only,
    );

    ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            strategy: config.matching.strategy,
            threshold,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        outcomes,
    }
}

/// Identical catalog titles are matched as separate records (earliest first),
/// but a scraped page can only ever show them once, so flag them.
fn warn_duplicate_titles(catalog: &[CatalogRecord]) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for record in catalog {
        *seen.entry(record.title.as_str()).or_insert(0) += 1;
    }
    for record in catalog {
        if let Some(count) = seen.remove(record.title.as_str()) {
            if count > 1 {
                warn!("catalog title appears {count} times: '{}'", record.title);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Load website records from CSV, in file order.
pub fn load_website_csv(
    csv_data: &str,
    columns: &WebsiteColumns,
) -> Result<Vec<WebsiteRecord>, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Io(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, ReconError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReconError::MissingColumn { column: name.into() })
    };

    let title_idx = idx(&columns.title)?;
    let authors_idx = idx(&columns.authors)?;

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        records.push(WebsiteRecord {
            title: record.get(title_idx).unwrap_or("").trim().to_string(),
            authors: record.get(authors_idx).unwrap_or("").trim().to_string(),
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct RawCatalogItem {
    title: String,
    #[serde(default)]
    creators: Vec<Creator>,
    #[serde(default)]
    date: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "DOI")]
    doi: Option<String>,
}

/// Reference-manager exports either wrap each item in `data` or not.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCatalogEntry {
    Wrapped { data: RawCatalogItem },
    Bare(RawCatalogItem),
}

/// Load catalog records from a JSON array of items, in array order.
///
/// `url` is `https://{DOI}` when a DOI is present, the item's own `url`
/// otherwise.
pub fn load_catalog_json(json_data: &str) -> Result<Vec<CatalogRecord>, ReconError> {
    let entries: Vec<RawCatalogEntry> =
        serde_json::from_str(json_data).map_err(|e| ReconError::CatalogParse(e.to_string()))?;

    entries
        .into_iter()
        .map(|entry| -> Result<CatalogRecord, ReconError> {
            let item = match entry {
                RawCatalogEntry::Wrapped { data } => data,
                RawCatalogEntry::Bare(item) => item,
            };

            let date = parse_catalog_date(&item.date).ok_or_else(|| ReconError::DateParse {
                title: item.title.clone(),
                value: item.date.clone(),
            })?;

            let url = match item.doi.as_deref().map(str::trim) {
                Some(doi) if !doi.is_empty() => format!("https://{doi}"),
                _ => item.url.unwrap_or_default(),
            };

            Ok(CatalogRecord {
                title: item.title,
                authors: item.creators,
                date,
                url,
            })
        })
        .collect()
}

/// Accepts full dates (`-` or `/` separated), RFC 3339 timestamps, `YYYY-MM`
/// (first of month) and bare `YYYY` (1 January).
pub fn parse_catalog_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(ts.date_naive());
    }

    if let Ok(date) = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d") {
        return Some(date);
    }

    if value.len() == 4 && value.chars().all(|c| c.is_ascii_digit()) {
        return value.parse().ok().and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1));
    }

    None
}
