use std::collections::HashSet;
use std::path::Path;
use std::process::Command;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, ScanError};
use crate::types::{Commit, DiffStats, DiffStatsMap};

/// Prefix git prints before every commit header (see `--format` below).
pub const HEADER_SENTINEL: &str = "COMMIT|";

static RENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]*) => ([^{}]*)\}").expect("rename regex"));

/// Runs a single `git log --numstat` and returns structured Commit objects
/// AND per-file line-level diff stats in one pass.
pub fn parse_log(
    cwd: &Path,
    since: &str,
    path_filter: Option<&str>,
) -> Result<(Vec<Commit>, DiffStatsMap)> {
    let mut args: Vec<String> = vec![
        "-c".into(),
        "core.quotepath=off".into(),
        "log".into(),
        format!("--format={HEADER_SENTINEL}%H|%ae|%ad|%s"),
        "--date=unix".into(),
        "--numstat".into(),
        "--diff-filter=ACDMRT".into(),
    ];

    if !since.is_empty() {
        args.push(format!("--since={since}"));
    }

    if let Some(p) = path_filter {
        args.push("--".into());
        args.push(p.into());
    }

    debug!("running git {} in {}", args.join(" "), cwd.display());

    let unavailable = |reason: String| ScanError::HistoryUnavailable {
        repo: cwd.to_path_buf(),
        reason,
    };

    let output = Command::new("git")
        .args(&args)
        .current_dir(cwd)
        .output()
        .map_err(|e| unavailable(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(unavailable(format!("git log failed: {}", stderr.trim())));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    let (commits, diff_stats) = parse_commit_output(&text);
    debug!("parsed {} commits, {} files with line stats", commits.len(), diff_stats.len());
    Ok((commits, diff_stats))
}

/// Parses raw `git log` text. Body lines may be plain file names
/// (`--name-only`) or `<added>\t<deleted>\t<file>` (`--numstat`).
/// Unrecognized lines are skipped.
pub fn parse_commit_output(output: &str) -> (Vec<Commit>, DiffStatsMap) {
    let mut commits: Vec<Commit> = Vec::new();
    let mut diff_stats: DiffStatsMap = DiffStatsMap::new();
    let mut current: Option<Commit> = None;
    let mut seen: HashSet<String> = HashSet::new();

    for line in output.lines() {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix(HEADER_SENTINEL) {
            if let Some(c) = current.take() {
                commits.push(c);
            }
            seen.clear();
            current = parse_header(rest);
            if current.is_none() {
                debug!("skipping malformed commit header: {trimmed}");
            }
            continue;
        }

        if trimmed.is_empty() {
            continue;
        }

        let Some(commit) = current.as_mut() else {
            debug!("skipping body line outside of a commit: {trimmed}");
            continue;
        };

        let Some(entry) = parse_body_line(trimmed) else {
            debug!("skipping malformed log line: {trimmed}");
            continue;
        };

        let Some(filename) = normalize_filename(entry.raw_name) else {
            debug!("skipping unresolvable rename: {}", entry.raw_name);
            continue;
        };

        if let Some((additions, deletions)) = entry.counts {
            let stats: &mut DiffStats = diff_stats.entry(filename.clone()).or_default();
            stats.additions += additions;
            stats.deletions += deletions;
        }

        if seen.insert(filename.clone()) {
            commit.files.push(filename);
        }
    }

    if let Some(c) = current {
        commits.push(c);
    }

    (commits, diff_stats)
}

/// `hash|email|timestamp|subject`; the subject keeps any further `|`.
fn parse_header(rest: &str) -> Option<Commit> {
    let mut parts = rest.splitn(4, '|');
    let hash = parts.next()?.trim();
    let author = parts.next()?.trim();
    let timestamp = parts.next()?.trim().parse::<i64>().ok()?;
    let subject = parts.next()?;
    if hash.is_empty() {
        return None;
    }
    Some(Commit {
        hash:      hash.to_string(),
        author:    author.to_string(),
        timestamp,
        subject:   subject.to_string(),
        files:     Vec::new(),
    })
}

struct BodyLine<'a> {
    raw_name: &'a str,
    /// `None` for plain names and for binary numstat rows (`-\t-\t<file>`).
    counts: Option<(usize, usize)>,
}

fn parse_body_line(line: &str) -> Option<BodyLine<'_>> {
    if !line.contains('\t') {
        return Some(BodyLine { raw_name: line, counts: None });
    }

    let mut parts = line.splitn(3, '\t');
    let added = parts.next()?;
    let deleted = parts.next()?;
    let raw_name = parts.next()?;

    let counts = match (added, deleted) {
        ("-", _) | (_, "-") => {
            if !is_count_or_dash(added) || !is_count_or_dash(deleted) {
                return None;
            }
            None
        }
        (a, d) => Some((a.parse().ok()?, d.parse().ok()?)),
    };

    Some(BodyLine { raw_name, counts })
}

fn is_count_or_dash(s: &str) -> bool {
    s == "-" || s.parse::<usize>().is_ok()
}

/// Normalizes git rename notations:
///   "src/{old => new}/file.js"         → "src/new/file.js"
///   "src/{ => lib}/file.js"            → "src/lib/file.js"
///   "old-name => new-name"             → "new-name"
///   "docs/{draft}.md => docs/final.md" → "docs/final.md"
/// Returns `None` when a rename form does not fully resolve.
pub fn normalize_filename(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if RENAME_RE.is_match(raw) {
        let result = RENAME_RE.replace_all(raw, "$2");
        if result.contains('{') || result.contains('}') || result.contains("=>") {
            return None;
        }
        let mut path = result.replace("//", "/");
        if let Some(stripped) = path.strip_prefix('/') {
            path = stripped.to_string();
        }
        let path = path.trim().to_string();
        return if path.is_empty() { None } else { Some(path) };
    }
    if let Some((old, new)) = raw.rsplit_once(" => ") {
        // literal braces are fine in whole paths, a half-open brace group is not
        if !balanced_braces(old) || !balanced_braces(new) {
            return None;
        }
        let new = new.trim();
        return if new.is_empty() { None } else { Some(new.to_string()) };
    }
    if raw.is_empty() { None } else { Some(raw.to_string()) }
}

fn balanced_braces(path: &str) -> bool {
    path.matches('{').count() == path.matches('}').count()
}
