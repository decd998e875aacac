use std::collections::{HashMap, HashSet};
use crate::types::{Commit, SiloData};

/// Analyzes author concentration per file using commit history.
/// High single-author ratio = knowledge silo = elevated bug risk.
///
/// Ties for top author go to the lexicographically smallest identity.
pub fn analyze_authors(commits: &[Commit], files: &[String]) -> HashMap<String, SiloData> {
    let file_set: HashSet<&str> = files.iter().map(|s| s.as_str()).collect();

    // filename → author → commit count
    let mut file_authors: HashMap<&str, HashMap<&str, usize>> = HashMap::new();

    for commit in commits {
        for file in &commit.files {
            if !file_set.contains(file.as_str()) { continue; }
            *file_authors.entry(file.as_str()).or_default()
                .entry(commit.author.as_str()).or_insert(0) += 1;
        }
    }

    files.iter().map(|file| {
        let data = file_authors
            .get(file.as_str())
            .and_then(silo_for)
            .unwrap_or_default();
        (file.clone(), data)
    }).collect()
}

fn silo_for(authors: &HashMap<&str, usize>) -> Option<SiloData> {
    let total: usize = authors.values().sum();
    if total == 0 {
        return None;
    }
    let (top_author, top_count) = authors
        .iter()
        .max_by(|(a_name, a_count), (b_name, b_count)| {
            a_count.cmp(b_count).then_with(|| b_name.cmp(a_name))
        })
        .map(|(name, &count)| (*name, count))?;

    Some(SiloData {
        top_author: top_author.to_string(),
        top_author_percent: ((top_count as f64 / total as f64) * 100.0).round(),
        author_count: authors.len(),
    })
}
