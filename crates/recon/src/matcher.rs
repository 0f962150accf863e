use std::cmp::Reverse;

use log::debug;
use rayon::prelude::*;

use crate::model::{CatalogRecord, MatchOutcome, WebsiteRecord};
use crate::scorer::TitleScorer;

/// Greedy one-to-one matching in website order.
///
/// Each website record takes the best-scoring title still in the pool; a
/// match is accepted only when the score is strictly above `threshold`, and
/// the matched catalog record leaves the pool. The pool holds catalog indices
/// in input order, so equal titles stay distinct candidates and ties go to the
/// earliest remaining entry.
pub fn match_greedy(
    website: &[WebsiteRecord],
    catalog: &[CatalogRecord],
    threshold: u8,
    scorer: &dyn TitleScorer,
) -> Vec<MatchOutcome> {
    let mut pool: Vec<usize> = (0..catalog.len()).collect();
    let mut outcomes = Vec::with_capacity(website.len() + catalog.len());

    for record in website {
        // Scoring fans out; the pick and removal below stay on this thread.
        let scores: Vec<u8> = pool
            .par_iter()
            .map(|&ci| scorer.score(&record.title, &catalog[ci].title))
            .collect();

        match best_candidate(&scores) {
            Some((pos, score)) if score > threshold => {
                let ci = pool.remove(pos);
                debug!("matched '{}' -> '{}' ({score})", record.title, catalog[ci].title);
                outcomes.push(MatchOutcome::Matched {
                    website: record.clone(),
                    catalog: catalog[ci].clone(),
                    score,
                });
            }
            best => {
                let best_score = best.map_or(0, |(_, s)| s);
                debug!("no match for '{}' (best {best_score})", record.title);
                outcomes.push(MatchOutcome::WebsiteOnly {
                    website: record.clone(),
                    best_score,
                });
            }
        }
    }

    outcomes.extend(pool.into_iter().map(|ci| MatchOutcome::CatalogOnly {
        catalog: catalog[ci].clone(),
    }));
    outcomes
}

/// Global best-first matching.
///
/// Every website × catalog pair is scored up front; pairs above `threshold`
/// are committed in descending score order (ties by website then catalog
/// index) while both sides are unclaimed. Output order matches
/// [`match_greedy`]: website order, then leftover catalog records.
pub fn match_best_first(
    website: &[WebsiteRecord],
    catalog: &[CatalogRecord],
    threshold: u8,
    scorer: &dyn TitleScorer,
) -> Vec<MatchOutcome> {
    let matrix: Vec<Vec<u8>> = website
        .par_iter()
        .map(|w| {
            catalog
                .iter()
                .map(|c| scorer.score(&w.title, &c.title))
                .collect::<Vec<u8>>()
        })
        .collect();

    let mut candidates: Vec<(u8, usize, usize)> = matrix
        .iter()
        .enumerate()
        .flat_map(|(wi, row)| row.iter().enumerate().map(move |(ci, &s)| (s, wi, ci)))
        .filter(|&(s, _, _)| s > threshold)
        .collect();
    candidates.sort_by_key(|&(s, wi, ci)| (Reverse(s), wi, ci));

    let mut assigned: Vec<Option<usize>> = vec![None; website.len()];
    let mut claimed = vec![false; catalog.len()];
    for (score, wi, ci) in candidates {
        if assigned[wi].is_some() || claimed[ci] {
            continue;
        }
        debug!("matched '{}' -> '{}' ({score})", website[wi].title, catalog[ci].title);
        assigned[wi] = Some(ci);
        claimed[ci] = true;
    }

    let mut outcomes = Vec::with_capacity(website.len() + catalog.len());
    for (wi, record) in website.iter().enumerate() {
        match assigned[wi] {
            Some(ci) => outcomes.push(MatchOutcome::Matched {
                website: record.clone(),
                catalog: catalog[ci].clone(),
                score: matrix[wi][ci],
            }),
            None => {
                let best_score = matrix[wi]
                    .iter()
                    .enumerate()
                    .filter(|(ci, _)| !claimed[*ci])
                    .map(|(_, &s)| s)
                    .max()
                    .unwrap_or(0);
                outcomes.push(MatchOutcome::WebsiteOnly {
                    website: record.clone(),
                    best_score,
                });
            }
        }
    }

    outcomes.extend(
        catalog
            .iter()
            .enumerate()
            .filter(|(ci, _)| !claimed[*ci])
            .map(|(_, c)| MatchOutcome::CatalogOnly { catalog: c.clone() }),
    );
    outcomes
}

/// Position and score of the highest score; earliest position wins ties.
fn best_candidate(scores: &[u8]) -> Option<(usize, u8)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, s)| match best {
            Some((_, b)) if b >= s => best,
            _ => Some((i, s)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::TokenScorer;
    use chrono::NaiveDate;

    fn web(title: &str) -> WebsiteRecord {
        WebsiteRecord {
            title: title.into(),
            authors: String::new(),
        }
    }

    fn cat(title: &str) -> CatalogRecord {
        CatalogRecord {
            title: title.into(),
            authors: vec![],
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            url: format!("https://doi.org/{}", title.len()),
        }
    }

    /// Scores read from a table keyed by (website, catalog) title; 0 otherwise.
    fn table(
        entries: &'static [(&'static str, &'static str, u8)],
    ) -> impl Fn(&str, &str) -> u8 + Sync {
        move |a: &str, b: &str| {
            entries
                .iter()
                .find(|(x, y, _)| *x == a && *y == b)
                .map_or(0, |(_, _, s)| *s)
        }
    }

    #[test]
    fn best_candidate_prefers_earliest_on_tie() {
        assert_eq!(best_candidate(&[40, 92, 92, 10]), Some((1, 92)));
        assert_eq!(best_candidate(&[]), None);
    }

    #[test]
    fn greedy_exact_match() {
        let out = match_greedy(
            &[web("Deep Learning for X")],
            &[cat("Deep Learning for X")],
            90,
            &TokenScorer,
        );
        assert_eq!(out.len(), 1);
        match &out[0] {
            MatchOutcome::Matched { website, catalog, score } => {
                assert_eq!(*score, 100);
                assert_eq!(website.title, catalog.title);
            }
            other => panic!("expected match, got {other:?}"),
        }
    }

    #[test]
    fn greedy_punctuation_only_difference_matches_at_99() {
        let out = match_greedy(
            &[web("Deep learning, for X!")],
            &[cat("deep LEARNING for x")],
            99,
            &TokenScorer,
        );
        assert_eq!(out.len(), 1);
        assert!(matches!(&out[0], MatchOutcome::Matched { score: 100, .. }));
    }

    #[test]
    fn greedy_threshold_is_strict() {
        let scorer = table(&[("a", "b", 90)]);
        let out = match_greedy(&[web("a")], &[cat("b")], 90, &scorer);
        assert_eq!(
            out,
            vec![
                MatchOutcome::WebsiteOnly { website: web("a"), best_score: 90 },
                MatchOutcome::CatalogOnly { catalog: cat("b") },
            ]
        );

        let out = match_greedy(&[web("a")], &[cat("b")], 89, &scorer);
        assert_eq!(out[0].label(), "matched");
    }

    #[test]
    fn greedy_removes_claimed_title() {
        let scorer = table(&[("first", "target", 95), ("second", "target", 99)]);
        let out = match_greedy(&[web("first"), web("second")], &[cat("target")], 90, &scorer);
        assert_eq!(out.len(), 2);
        assert!(matches!(&out[0], MatchOutcome::Matched { score: 95, .. }));
        // The pool is empty by the time "second" is scored.
        assert_eq!(
            out[1],
            MatchOutcome::WebsiteOnly { website: web("second"), best_score: 0 }
        );
    }

    #[test]
    fn greedy_empty_catalog_scores_zero() {
        let out = match_greedy(&[web("A")], &[], 90, &TokenScorer);
        assert_eq!(out, vec![MatchOutcome::WebsiteOnly { website: web("A"), best_score: 0 }]);
    }

    #[test]
    fn greedy_empty_website_keeps_catalog_order() {
        let out = match_greedy(&[], &[cat("z"), cat("a"), cat("m")], 90, &TokenScorer);
        let titles: Vec<_> = out.iter().map(|o| o.catalog().unwrap().title.as_str()).collect();
        assert_eq!(titles, vec!["z", "a", "m"]);
        assert!(out.iter().all(|o| o.label() == "catalog_only"));
    }

    #[test]
    fn greedy_leftovers_follow_catalog_order() {
        let scorer = table(&[("w", "c2", 100)]);
        let out = match_greedy(&[web("w")], &[cat("c1"), cat("c2"), cat("c3")], 90, &scorer);
        let labels: Vec<_> = out.iter().map(|o| o.label()).collect();
        assert_eq!(labels, vec!["matched", "catalog_only", "catalog_only"]);
        assert_eq!(out[1].catalog().unwrap().title, "c1");
        assert_eq!(out[2].catalog().unwrap().title, "c3");
    }

    #[test]
    fn greedy_duplicate_titles_are_distinct_candidates() {
        let mut first = cat("Same title");
        first.url = "https://one".into();
        let mut second = cat("Same title");
        second.url = "https://two".into();

        let out = match_greedy(
            &[web("Same title"), web("Same title")],
            &[first, second],
            90,
            &TokenScorer,
        );
        let urls: Vec<_> = out.iter().map(|o| o.catalog().unwrap().url.as_str()).collect();
        assert_eq!(urls, vec!["https://one", "https://two"]);
        assert!(out.iter().all(|o| o.label() == "matched"));
    }

    #[test]
    fn greedy_is_order_dependent_where_best_first_is_not() {
        // "w1" grabs "c1" even though "w2" is a stronger fit for it.
        let scorer = table(&[
            ("w1", "c1", 93),
            ("w1", "c2", 92),
            ("w2", "c1", 99),
        ]);
        let website = [web("w1"), web("w2")];
        let catalog = [cat("c1"), cat("c2")];

        let greedy = match_greedy(&website, &catalog, 90, &scorer);
        assert_eq!(greedy[0].catalog().unwrap().title, "c1");
        assert_eq!(greedy[1].label(), "website_only");
        assert_eq!(greedy[2].catalog().unwrap().title, "c2");

        let best = match_best_first(&website, &catalog, 90, &scorer);
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].catalog().unwrap().title, "c2");
        assert_eq!(best[1].catalog().unwrap().title, "c1");
        assert!(best.iter().all(|o| o.label() == "matched"));
    }

    #[test]
    fn best_first_reports_best_unclaimed_score() {
        let scorer = table(&[("w1", "c1", 99), ("w2", "c1", 98), ("w2", "c2", 40)]);
        let out = match_best_first(&[web("w1"), web("w2")], &[cat("c1"), cat("c2")], 90, &scorer);
        assert_eq!(
            out[1],
            MatchOutcome::WebsiteOnly { website: web("w2"), best_score: 40 }
        );
        assert_eq!(out[2], MatchOutcome::CatalogOnly { catalog: cat("c2") });
    }

    #[test]
    fn best_first_empty_inputs() {
        assert!(match_best_first(&[], &[], 90, &TokenScorer).is_empty());
        let out = match_best_first(&[web("A")], &[], 90, &TokenScorer);
        assert_eq!(out, vec![MatchOutcome::WebsiteOnly { website: web("A"), best_score: 0 }]);
    }
}
