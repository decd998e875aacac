use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{matching_commit_counts, max_normalized};
use crate::types::{BugData, Commit};

static BUG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(fix|bug|patch|hotfix|regression|broken|crash|defect|issue|error)\b")
        .expect("bug regex")
});

/// True when the subject contains a bug keyword as a whole word, any case.
pub fn is_bug_fix(subject: &str) -> bool {
    BUG_PATTERN.is_match(subject)
}

/// Bug-fix commit count per file, max-normalized across `files`.
pub fn analyze_bug_correlation(commits: &[Commit], files: &[String]) -> HashMap<String, BugData> {
    let counts = matching_commit_counts(commits, files, |c| is_bug_fix(&c.subject));
    let max = counts.values().copied().max().unwrap_or(0) as f64;

    files
        .iter()
        .map(|file| {
            let bug_commits = counts.get(file.as_str()).copied().unwrap_or(0);
            let bug_score = max_normalized(bug_commits as f64, max);
            (file.clone(), BugData { bug_commits, bug_score })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_commit(subject: &str, files: &[&str]) -> Commit {
        Commit {
            hash: "abc".to_string(),
            author: "dev@test.com".to_string(),
            timestamp: 1700000000,
            subject: subject.to_string(),
            files: files.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_detects_fix_commits() {
        let commits = vec![
            make_commit("fix: null pointer in auth", &["src/auth.rs"]),
            make_commit("add feature", &["src/feature.rs"]),
        ];
        let files = vec!["src/auth.rs".to_string(), "src/feature.rs".to_string()];
        let result = analyze_bug_correlation(&commits, &files);
        assert!(result["src/auth.rs"].bug_commits > 0, "auth.rs should have bug commits");
        assert_eq!(result["src/feature.rs"].bug_commits, 0, "feature.rs should have no bug commits");
    }

    #[test]
    fn test_detects_multiple_bug_keywords() {
        for kw in &["fix", "Bug", "PATCH", "hotfix", "regression", "broken", "crash", "defect", "issue", "error"] {
            assert!(is_bug_fix(&format!("{kw} something")), "keyword '{kw}' should trigger bug detection");
        }
    }

    #[test]
    fn test_keywords_match_whole_words_only() {
        assert!(!is_bug_fix("add prefix handling"), "'prefix' must not match 'fix'");
        assert!(!is_bug_fix("debugger integration"), "'debugger' must not match 'bug'");
        assert!(!is_bug_fix("fixes for the docs"), "'fixes' is not the whole word 'fix'");
    }

    #[test]
    fn test_scores_in_range() {
        let commits = vec![
            make_commit("fix crash", &["a.rs", "b.rs"]),
            make_commit("fix more", &["a.rs"]),
            make_commit("regular commit", &["b.rs"]),
        ];
        let files = vec!["a.rs".to_string(), "b.rs".to_string()];
        let result = analyze_bug_correlation(&commits, &files);
        for data in result.values() {
            assert!((0.0..=100.0).contains(&data.bug_score),
                "bug_score {} out of range", data.bug_score);
        }
    }

    #[test]
    fn test_highest_bug_count_gets_score_100() {
        let commits = vec![
            make_commit("fix a", &["hot.rs"]),
            make_commit("fix b", &["hot.rs"]),
            make_commit("fix c", &["cold.rs"]),
        ];
        let files = vec!["hot.rs".to_string(), "cold.rs".to_string()];
        let result = analyze_bug_correlation(&commits, &files);
        assert_eq!(result["hot.rs"].bug_score, 100.0, "Most bug-touched file should score 100");
        assert_eq!(result["cold.rs"].bug_score, 50.0);
    }

    #[test]
    fn test_no_bug_commits_scores_zero_everywhere() {
        let commits = vec![make_commit("Initial commit", &["a.rs"])];
        let files = vec!["a.rs".to_string()];
        let result = analyze_bug_correlation(&commits, &files);
        assert_eq!(result["a.rs"], BugData::default());
    }
}
