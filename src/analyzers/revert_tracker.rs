use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{matching_commit_counts, max_normalized};
use crate::types::{Commit, RevertData};

static REVERT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^revert").expect("revert regex"));

/// Subject starts with "revert" after leading whitespace, any case.
pub fn is_revert(subject: &str) -> bool {
    REVERT_PATTERN.is_match(subject.trim())
}

/// Revert commit count per file, max-normalized across `files`.
pub fn analyze_reverts(commits: &[Commit], files: &[String]) -> HashMap<String, RevertData> {
    let counts = matching_commit_counts(commits, files, |c| is_revert(&c.subject));
    let max = counts.values().copied().max().unwrap_or(0) as f64;

    files
        .iter()
        .map(|file| {
            let revert_count = counts.get(file.as_str()).copied().unwrap_or(0);
            let revert_score = max_normalized(revert_count as f64, max);
            (file.clone(), RevertData { revert_count, revert_score })
        })
        .collect()
}
