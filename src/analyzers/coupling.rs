use crate::types::{Commit, CouplingEntry};
use std::collections::{HashMap, HashSet};

// Skip commits touching more than this many files (large merges/reformats)
const MAX_FILES_PER_COMMIT: usize = 20;
const MIN_CO_CHANGES: usize = 3;

/// Builds a co-change coupling list using Jaccard similarity.
/// Files that always change together suggest hidden dependencies.
///
/// Pairs are ordered so `file_a < file_b`; the list is sorted by
/// `co_changes` descending, then by file names.
pub fn analyze_coupling(commits: &[Commit], files: &[String]) -> Vec<CouplingEntry> {
    let file_set: HashSet<&str> = files.iter().map(|s| s.as_str()).collect();

    let mut pair_counts: HashMap<(&str, &str), usize> = HashMap::new();
    let mut file_counts: HashMap<&str, usize> = HashMap::new();

    for commit in commits {
        let touched: Vec<&str> = commit
            .files
            .iter()
            .map(|s| s.as_str())
            .filter(|f| file_set.contains(f))
            .collect();

        // totals include oversized commits; only pair counting skips them
        for &file in &touched {
            *file_counts.entry(file).or_insert(0) += 1;
        }

        if touched.len() > MAX_FILES_PER_COMMIT {
            continue;
        }

        for (i, &a) in touched.iter().enumerate() {
            for &b in &touched[i + 1..] {
                let key = if a < b { (a, b) } else { (b, a) };
                *pair_counts.entry(key).or_insert(0) += 1;
            }
        }
    }

    let mut couplings: Vec<CouplingEntry> = pair_counts
        .into_iter()
        .filter(|&(_, count)| count >= MIN_CO_CHANGES)
        .map(|((file_a, file_b), co_changes)| {
            let total_a = file_counts.get(file_a).copied().unwrap_or(0);
            let total_b = file_counts.get(file_b).copied().unwrap_or(0);
            CouplingEntry {
                file_a: file_a.to_string(),
                file_b: file_b.to_string(),
                co_changes,
                strength: jaccard_strength(co_changes, total_a, total_b),
            }
        })
        .collect();

    couplings.sort_by(|a, b| {
        b.co_changes
            .cmp(&a.co_changes)
            .then_with(|| a.file_a.cmp(&b.file_a))
            .then_with(|| a.file_b.cmp(&b.file_b))
    });
    couplings
}

/// `co / (total_a + total_b - co)` on a 0–100 scale.
fn jaccard_strength(co_changes: usize, total_a: usize, total_b: usize) -> f64 {
    let union = (total_a + total_b).saturating_sub(co_changes);
    if union == 0 {
        return 0.0;
    }
    ((co_changes as f64 / union as f64) * 100.0).round().clamp(0.0, 100.0)
}

/// Returns a per-file coupling score: each file's maximum Jaccard strength,
/// 0 for files in no surviving pair.
pub fn get_coupling_scores(files: &[String], couplings: &[CouplingEntry]) -> HashMap<String, f64> {
    let mut scores: HashMap<String, f64> = files.iter().map(|f| (f.clone(), 0.0)).collect();
    for c in couplings {
        for file in [&c.file_a, &c.file_b] {
            if let Some(s) = scores.get_mut(file) {
                *s = s.max(c.strength);
            }
        }
    }
    scores
}
