pub mod authors;
pub mod bug_correlation;
pub mod burst_detector;
pub mod churn;
pub mod commit_quality;
pub mod coupling;
pub mod revert_tracker;
pub mod security;

use std::collections::{HashMap, HashSet};

use crate::types::*;

// Denominator floor so an all-zero signal normalizes to 0 instead of NaN
const EPSILON: f64 = 0.0001;

/// `value / max` on a 0–100 scale, rounded.
pub(crate) fn max_normalized(value: f64, max: f64) -> f64 {
    ((value / max.max(EPSILON)) * 100.0).round().clamp(0.0, 100.0)
}

/// For each file in `files`, how many commits accepted by `keep` touched it.
/// Files never touched by such a commit are absent from the map.
pub(crate) fn matching_commit_counts<'a>(
    commits: &'a [Commit],
    files: &[String],
    keep: impl Fn(&Commit) -> bool,
) -> HashMap<&'a str, usize> {
    let in_scope: HashSet<&str> = files.iter().map(String::as_str).collect();
    let mut counts = HashMap::new();
    for commit in commits.iter().filter(|c| keep(c)) {
        for file in commit.files.iter().map(String::as_str).filter(|f| in_scope.contains(f)) {
            *counts.entry(file).or_insert(0) += 1;
        }
    }
    counts
}

/// The outputs of all seven signal analyzers for one file set.
#[derive(Debug, Clone, Default)]
pub struct Signals {
    pub churn: HashMap<String, ChurnData>,
    pub bugs: HashMap<String, BugData>,
    pub reverts: HashMap<String, RevertData>,
    pub bursts: HashMap<String, BurstData>,
    pub couplings: Vec<CouplingEntry>,
    pub silo: HashMap<String, SiloData>,
    pub commit_quality: HashMap<String, CommitQualityData>,
}

/// Runs every analyzer over the same read-only inputs as a rayon fork-join tree.
/// Each analyzer owns its output, so no synchronization is involved.
pub fn run_all(commits: &[Commit], files: &[String], now: i64) -> Signals {
    let (
        (churn, (bugs, reverts)),
        (bursts, (couplings, (silo, commit_quality)))
    ) = rayon::join(
        || rayon::join(
            || churn::analyze_churn(commits, files, now),
            || rayon::join(
                || bug_correlation::analyze_bug_correlation(commits, files),
                || revert_tracker::analyze_reverts(commits, files),
            ),
        ),
        || rayon::join(
            || burst_detector::analyze_bursts(commits, files),
            || rayon::join(
                || coupling::analyze_coupling(commits, files),
                || rayon::join(
                    || authors::analyze_authors(commits, files),
                    || commit_quality::analyze_commit_quality(commits, files),
                ),
            ),
        ),
    );

    Signals { churn, bugs, reverts, bursts, couplings, silo, commit_quality }
}
