//! Analysis pipeline for a single repository.
//!
//! parse → (security scan, noise filter) → seven analyzers → scorer.

use std::collections::HashSet;
use std::path::Path;

use chrono::{TimeZone, Utc};
use log::{debug, info};

use crate::analyzers::{self, security};
use crate::error::Result;
use crate::filters::{self, FilterOverrides};
use crate::git::log_parser;
use crate::scoring::{self, ScoringConfig};
use crate::types::*;

/// Everything the engine needs from its caller.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Any `git log --since` expression; empty means full history.
    pub since: String,
    /// Restrict analysis to paths under this prefix.
    pub path: Option<String>,
    pub weights: WeightOverrides,
    pub filters: FilterOverrides,
    /// Unix timestamp used as "now" for recency decay and `analyzed_at`.
    /// `None` reads the wall clock.
    pub now: Option<i64>,
}

/// Result of analyzing one repository.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Report(Box<Report>),
    /// No commits in the requested range.
    EmptyHistory,
    /// Commits exist but every file was filtered out as noise.
    EmptyFilteredSet { commit_count: usize },
}

/// Runs `git log` in `repo` and analyzes the result.
///
/// Weights are validated before git is invoked.
pub fn analyze_repo(repo: &Path, opts: &AnalysisOptions) -> Result<Outcome> {
    let config = ScoringConfig::new(&opts.weights)?;
    let (commits, diff_stats) = log_parser::parse_log(repo, &opts.since, opts.path.as_deref())?;
    Ok(analyze_history(&commits, &diff_stats, &repo.display().to_string(), opts, &config))
}

/// Analyzes already-parsed history. Deterministic for a fixed `opts.now`.
pub fn analyze_history(
    commits:    &[Commit],
    diff_stats: &DiffStatsMap,
    repo_path:  &str,
    opts:       &AnalysisOptions,
    config:     &ScoringConfig,
) -> Outcome {
    if commits.is_empty() {
        info!("{repo_path}: no commits in range, skipping");
        return Outcome::EmptyHistory;
    }

    let security_risks = security::analyze_security(commits);
    debug!("{repo_path}: {} security risk(s)", security_risks.len());

    let all_files = distinct_files(commits);
    let filtered_files = filters::filter_files(&all_files, opts.path.as_deref(), &opts.filters);
    debug!("{repo_path}: {} of {} files kept after filtering", filtered_files.len(), all_files.len());

    if filtered_files.is_empty() {
        info!("{repo_path}: every file was filtered out, skipping");
        return Outcome::EmptyFilteredSet { commit_count: commits.len() };
    }

    let now = opts.now.unwrap_or_else(|| Utc::now().timestamp());
    let signals = analyzers::run_all(commits, &filtered_files, now);
    let results = scoring::score_hotspots(&filtered_files, &signals, diff_stats, config);
    debug!("{repo_path}: scored {} files, {} coupled pairs", results.len(), signals.couplings.len());

    Outcome::Report(Box::new(Report {
        meta: ReportMeta {
            since:        if opts.since.is_empty() { "all history".to_string() } else { opts.since.clone() },
            commit_count: commits.len(),
            file_count:   filtered_files.len(),
            analyzed_at:  fmt_timestamp(now),
            repo_path:    repo_path.to_string(),
        },
        results,
        couplings: signals.couplings,
        security_risks,
    }))
}

/// Every path touched by any commit, in first-seen order.
fn distinct_files(commits: &[Commit]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    commits
        .iter()
        .flat_map(|c| c.files.iter())
        .filter(|f| seen.insert(f.as_str()))
        .cloned()
        .collect()
}

fn fmt_timestamp(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| ts.to_string())
}
