use crate::model::{MatchOutcome, ReconSummary};

/// Count outcomes per category and reconstruct the input totals.
pub fn compute_summary(outcomes: &[MatchOutcome]) -> ReconSummary {
    let mut summary = ReconSummary::default();

    for outcome in outcomes {
        match outcome {
            MatchOutcome::Matched { .. } => summary.matched += 1,
            MatchOutcome::WebsiteOnly { .. } => summary.website_only += 1,
            MatchOutcome::CatalogOnly { .. } => summary.catalog_only += 1,
        }
    }

    summary.website_total = summary.matched + summary.website_only;
    summary.catalog_total = summary.matched + summary.catalog_only;
    summary
}
