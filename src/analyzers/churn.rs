use std::collections::{HashMap, HashSet};
use crate::types::{Commit, ChurnData};
use super::max_normalized;

// Exponential decay: λ = 0.005 → half-life ≈ 139 days
const DECAY_LAMBDA: f64 = 0.005;
const SECS_PER_DAY: i64 = 86_400;
// A file touched in >20% of all commits maxes out the raw score
const RAW_MULTIPLIER: f64 = 500.0;

/// Calculates churn rate with recency decay per file.
/// Recent commits contribute exponentially more to the weighted score.
/// `now` is a unix timestamp; callers pin it to make runs reproducible.
pub fn analyze_churn(commits: &[Commit], files: &[String], now: i64) -> HashMap<String, ChurnData> {
    let file_set: HashSet<&str> = files.iter().map(|s| s.as_str()).collect();

    // filename → (commit_count, weighted_churn)
    let mut file_churn: HashMap<&str, (usize, f64)> = HashMap::new();

    for commit in commits {
        let days_ago = (now.saturating_sub(commit.timestamp) / SECS_PER_DAY).max(0) as f64;
        let decay_weight = (-DECAY_LAMBDA * days_ago).exp();

        for file in &commit.files {
            if !file_set.contains(file.as_str()) { continue; }
            let entry = file_churn.entry(file.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += decay_weight;
        }
    }

    let total_commits = commits.len().max(1) as f64;
    let max_weighted = file_churn.values().map(|(_, w)| *w).fold(0.0, f64::max);

    files.iter().map(|file| {
        let (count, weighted) = file_churn.get(file.as_str()).copied().unwrap_or((0, 0.0));
        let data = ChurnData {
            commit_count:   count,
            raw_score:      ((count as f64 / total_commits) * RAW_MULTIPLIER).round().min(100.0),
            weighted_score: max_normalized(weighted, max_weighted),
        };
        (file.clone(), data)
    }).collect()
}
