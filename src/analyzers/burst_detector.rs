use crate::types::{BurstData, Commit};
use std::collections::{HashMap, HashSet};
use super::max_normalized;

const BURST_WINDOW_SECS: i64 = 24 * 3600;
const BURST_MIN_COMMITS: usize = 3;

/// Counts non-overlapping burst incidents in ascending timestamps.
///
/// A window opens at each candidate timestamp and extends 24h from it; once a
/// window holds at least three commits the scan resumes after its last member.
pub fn count_bursts(sorted_timestamps: &[i64]) -> usize {
    let mut burst_incidents = 0usize;
    let mut i = 0;
    while i < sorted_timestamps.len() {
        let start = sorted_timestamps[i];
        let end = sorted_timestamps[i..]
            .iter()
            .position(|&t| t - start > BURST_WINDOW_SECS)
            .map_or(sorted_timestamps.len(), |offset| i + offset);
        if end - i >= BURST_MIN_COMMITS {
            burst_incidents += 1;
            i = end;
        } else {
            i += 1;
        }
    }
    burst_incidents
}

/// Detects rapid successive commit bursts (patch-on-patch behavior) per file.
pub fn analyze_bursts(commits: &[Commit], files: &[String]) -> HashMap<String, BurstData> {
    let file_set: HashSet<&str> = files.iter().map(|s| s.as_str()).collect();

    // filename → list of timestamps
    let mut file_timestamps: HashMap<&str, Vec<i64>> = HashMap::new();

    for commit in commits {
        for file in &commit.files {
            if !file_set.contains(file.as_str()) {
                continue;
            }
            file_timestamps
                .entry(file.as_str())
                .or_default()
                .push(commit.timestamp);
        }
    }

    let raw: HashMap<&str, usize> = file_timestamps
        .into_iter()
        .map(|(file, mut timestamps)| {
            timestamps.sort_unstable();
            (file, count_bursts(&timestamps))
        })
        .collect();

    let max_bursts = raw.values().copied().max().unwrap_or(0) as f64;

    files
        .iter()
        .map(|file| {
            let incidents = raw.get(file.as_str()).copied().unwrap_or(0);
            (
                file.clone(),
                BurstData {
                    burst_incidents: incidents,
                    burst_score: max_normalized(incidents as f64, max_bursts),
                },
            )
        })
        .collect()
}
