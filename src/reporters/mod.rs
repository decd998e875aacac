pub mod json;
pub mod terminal;

use std::cmp::Ordering;

use crate::types::{HotspotResult, Report};

/// Coupled pairs carried into a presented report.
pub const MAX_COUPLINGS: usize = 10;

/// Sorts by score descending (ties by path ascending), optionally keeps only
/// files seen in bug-fix commits, then truncates to `top`.
pub fn rank(mut results: Vec<HotspotResult>, top: usize, bugs_only: bool) -> Vec<HotspotResult> {
    if bugs_only {
        results.retain(|r| r.details.bug_commits > 0);
    }
    results.sort_by(|a, b| {
        b.hotspot_score
            .partial_cmp(&a.hotspot_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.file.cmp(&b.file))
    });
    results.truncate(top);
    results
}

/// Turns the engine's full report into the view the reporters render.
/// Meta counts still describe the whole analysis.
pub fn present(mut report: Report, top: usize, bugs_only: bool) -> Report {
    report.results = rank(std::mem::take(&mut report.results), top, bugs_only);
    report.couplings.truncate(MAX_COUPLINGS);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CouplingEntry, HotspotDetails, ReportMeta, Tier};

    fn result(file: &str, score: f64, bug_commits: usize) -> HotspotResult {
        HotspotResult {
            file: file.to_string(),
            hotspot_score: score,
            churn_score: 0.0,
            bug_fix_score: 0.0,
            revert_score: 0.0,
            burst_score: 0.0,
            coupling_score: 0.0,
            silo_score: 0.0,
            commit_quality_score: 0.0,
            tier: crate::scoring::get_tier(score),
            details: HotspotDetails {
                commit_count: 1,
                bug_commits,
                revert_count: 0,
                burst_incidents: 0,
                wip_commits: 0,
                large_commit_count: 0,
                top_author: "dev@example.com".to_string(),
                top_author_percent: 100.0,
                author_count: 1,
                additions: 0,
                deletions: 0,
            },
        }
    }

    #[test]
    fn test_rank_orders_by_score_then_path() {
        let ranked = rank(
            vec![result("b.rs", 40.0, 0), result("c.rs", 90.0, 0), result("a.rs", 40.0, 0)],
            10,
            false,
        );
        let files: Vec<&str> = ranked.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(files, vec!["c.rs", "a.rs", "b.rs"]);
        assert_eq!(ranked[0].tier, Tier::Critical);
    }

    #[test]
    fn test_rank_truncates_after_sorting() {
        let ranked = rank(
            vec![result("low.rs", 5.0, 0), result("high.rs", 80.0, 0), result("mid.rs", 50.0, 0)],
            2,
            false,
        );
        let files: Vec<&str> = ranked.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(files, vec!["high.rs", "mid.rs"]);
    }

    #[test]
    fn test_rank_bugs_only() {
        let ranked = rank(vec![result("a.rs", 90.0, 0), result("b.rs", 10.0, 2)], 10, true);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].file, "b.rs");
    }

    #[test]
    fn test_present_caps_couplings_and_keeps_meta() {
        let couplings = (0..15)
            .map(|i| CouplingEntry {
                file_a: format!("a{i}.rs"),
                file_b: format!("b{i}.rs"),
                co_changes: 20 - i,
                strength: 50.0,
            })
            .collect();
        let report = Report {
            meta: ReportMeta {
                since: "all history".to_string(),
                commit_count: 30,
                file_count: 3,
                analyzed_at: "2025-01-01T00:00:00+00:00".to_string(),
                repo_path: "repo".to_string(),
            },
            results: vec![result("a.rs", 1.0, 0), result("b.rs", 2.0, 0), result("c.rs", 3.0, 0)],
            couplings,
            security_risks: Vec::new(),
        };
        let shown = present(report, 1, false);
        assert_eq!(shown.results.len(), 1);
        assert_eq!(shown.results[0].file, "c.rs");
        assert_eq!(shown.couplings.len(), MAX_COUPLINGS);
        assert_eq!(shown.couplings[0].co_changes, 20);
        assert_eq!(shown.meta.file_count, 3);
    }
}
