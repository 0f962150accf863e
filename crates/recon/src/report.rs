//! Fixed-layout TSV report.
//!
//! Four sections in order: summary sentences, matched table, website-only
//! list, catalog-only table. Every section header is written even when the
//! section has no rows.

use std::fmt::Write as _;
use std::io;

use crate::evidence::compute_summary;
use crate::model::{Creator, MatchOutcome};

/// Render outcomes to the report text. Pure: same input, same bytes.
pub fn render(outcomes: &[MatchOutcome]) -> String {
    let summary = compute_summary(outcomes);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{} records match on website and catalog.", summary.matched);
    let _ = writeln!(out, "{} records on website not found in catalog.", summary.website_only);
    let _ = writeln!(out, "{} records in catalog not found on website.", summary.catalog_only);

    out.push_str("Successful matches:\n");
    out.push_str("Website title\tCatalog title\tOutcome\tScore\n");
    for outcome in outcomes {
        if let MatchOutcome::Matched { website, catalog, score } = outcome {
            let _ = writeln!(
                out,
                "{}\t{}\t{}\t{}",
                website.title,
                catalog.title,
                outcome.label(),
                score
            );
        }
    }

    out.push_str("Records on website not found in catalog:\n");
    out.push_str("Website title\n");
    for outcome in outcomes {
        if let MatchOutcome::WebsiteOnly { website, .. } = outcome {
            let _ = writeln!(out, "{}", website.title);
        }
    }

    out.push_str("Records in catalog not found on website:\n");
    out.push_str("Catalog title\tAuthors\tUrl\tDate\n");
    for outcome in outcomes {
        if let MatchOutcome::CatalogOnly { catalog } = outcome {
            let _ = writeln!(
                out,
                "{}\t{}\t{}\t{}",
                catalog.title,
                format_authors(&catalog.authors),
                catalog.url,
                catalog.date.format("%Y/%m/%d")
            );
        }
    }

    out
}

/// Stream the rendered report to `w`.
pub fn write_report<W: io::Write>(outcomes: &[MatchOutcome], w: &mut W) -> io::Result<()> {
    w.write_all(render(outcomes).as_bytes())?;
    w.flush()
}

/// `F.Last, F.Last` for creators typed "author"; editors and others skipped.
pub fn format_authors(creators: &[Creator]) -> String {
    creators
        .iter()
        .filter(|c| c.is_author())
        .map(|c| match c.first_name.chars().next() {
            Some(initial) => format!("{initial}.{}", c.last_name),
            None => c.last_name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
