use std::collections::{HashMap, HashSet};
use once_cell::sync::Lazy;
use regex::Regex;
use crate::types::{Commit, CommitQualityData};

static WIP_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(wip|temp|tmp|fixup|squash|hack|dirty|oops|typo|debug|draft)\b|^(fix|update|changes|stuff|misc|test|cleanup|commit|save|ok|done)[.!\s]*$")
        .expect("WIP regex")
});

const LARGE_COMMIT_THRESHOLD: usize = 30;
const SHORT_MSG_MIN_LENGTH:    usize = 10;
const WIP_WEIGHT:   f64 = 60.0;
const LARGE_WEIGHT: f64 = 40.0;

/// WIP markers, generic one-word subjects, or anything shorter than 10 chars.
pub fn is_low_quality(subject: &str) -> bool {
    let subj = subject.trim();
    WIP_PATTERN.is_match(subj) || subj.chars().count() < SHORT_MSG_MIN_LENGTH
}

/// Tracks per-file involvement in low-quality commits (WIP/short messages)
/// and oversized commits (mass reformats, merge-all).
///
/// A commit is oversized when it touches more than 30 of the analyzed files.
/// The score is clamped to 0–100 and rounded like every other component.
pub fn analyze_commit_quality(
    commits: &[Commit],
    files: &[String],
) -> HashMap<String, CommitQualityData> {
    let file_set: HashSet<&str> = files.iter().map(|s| s.as_str()).collect();

    let mut wip_counts:   HashMap<&str, usize> = HashMap::new();
    let mut large_counts: HashMap<&str, usize> = HashMap::new();

    for commit in commits {
        let touched: Vec<&str> = commit.files.iter()
            .map(|f| f.as_str())
            .filter(|f| file_set.contains(f))
            .collect();
        if touched.is_empty() { continue; }

        let is_wip   = is_low_quality(&commit.subject);
        let is_large = touched.len() > LARGE_COMMIT_THRESHOLD;

        for file in touched {
            if is_wip   { *wip_counts.entry(file).or_default()   += 1; }
            if is_large { *large_counts.entry(file).or_default() += 1; }
        }
    }

    let max_wip   = wip_counts.values().copied().max().unwrap_or(0).max(1) as f64;
    let max_large = large_counts.values().copied().max().unwrap_or(0).max(1) as f64;

    files.iter().map(|file| {
        let wip   = wip_counts.get(file.as_str()).copied().unwrap_or(0);
        let large = large_counts.get(file.as_str()).copied().unwrap_or(0);
        let score = (wip as f64 / max_wip) * WIP_WEIGHT + (large as f64 / max_large) * LARGE_WEIGHT;
        (file.clone(), CommitQualityData {
            wip_commits:          wip,
            large_commit_count:   large,
            commit_quality_score: score.round().clamp(0.0, 100.0),
        })
    }).collect()
}
