use crate::types::{Commit, RiskType, SecurityRisk};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static ENV_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|/)\.env(?:\.[^/]*)?$").expect("env regex"));
static KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(pem|key|p12|pfx|cer|crt|jks|ppk|keystore)$").expect("key regex")
});
static CRED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|/)(?:credential|secret|password|passwd|private[_-]?key|api[_-]?key|auth[_-]?token)[^/]*$").expect("cred regex")
});

pub fn risk_type(file: &str) -> Option<RiskType> {
    if ENV_PATTERN.is_match(file) {
        return Some(RiskType::EnvFile);
    }
    if KEY_PATTERN.is_match(file) {
        return Some(RiskType::KeyOrCert);
    }
    if CRED_PATTERN.is_match(file) {
        return Some(RiskType::CredentialFile);
    }
    None
}

/// Scans raw (unfiltered) commits for security-sensitive files ever committed
/// to git history. Even deleted files are flagged; they remain accessible.
///
/// Sorted by occurrence count descending, then by path.
pub fn analyze_security(commits: &[Commit]) -> Vec<SecurityRisk> {
    struct Entry {
        risk_type: RiskType,
        count: usize,
        first: i64,
        last: i64,
    }

    let mut risks: HashMap<&str, Entry> = HashMap::new();

    for commit in commits {
        for file in &commit.files {
            let Some(kind) = risk_type(file) else {
                continue;
            };
            risks
                .entry(file.as_str())
                .and_modify(|e| {
                    e.count += 1;
                    e.first = e.first.min(commit.timestamp);
                    e.last = e.last.max(commit.timestamp);
                })
                .or_insert(Entry {
                    risk_type: kind,
                    count: 1,
                    first: commit.timestamp,
                    last: commit.timestamp,
                });
        }
    }

    let mut out: Vec<SecurityRisk> = risks
        .into_iter()
        .map(|(file, e)| SecurityRisk {
            file: file.to_string(),
            risk_type: e.risk_type,
            commit_count: e.count,
            first_seen: fmt_date(e.first),
            last_seen: fmt_date(e.last),
        })
        .collect();

    out.sort_by(|a, b| b.commit_count.cmp(&a.commit_count).then_with(|| a.file.cmp(&b.file)));
    out
}

fn fmt_date(ts: i64) -> String {
    use chrono::{TimeZone, Utc};
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit_at(timestamp: i64, files: &[&str]) -> Commit {
        Commit {
            hash: "abc".to_string(),
            author: "dev@example.com".to_string(),
            timestamp,
            subject: "add config".to_string(),
            files: files.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_flags_env_keys_and_certs() {
        let commits = vec![commit_at(
            1_700_000_000,
            &[".env", ".env.production", "server.key", "certs/cert.pem", "src/app.ts"],
        )];
        let risks = analyze_security(&commits);
        let flagged: Vec<&str> = risks.iter().map(|r| r.file.as_str()).collect();
        for f in [".env", ".env.production", "server.key", "certs/cert.pem"] {
            assert!(flagged.contains(&f), "{f} must be flagged");
        }
        assert!(!flagged.contains(&"src/app.ts"), "src/app.ts must not be flagged");
    }

    #[test]
    fn test_risk_classes() {
        assert_eq!(risk_type("config/.env.local"), Some(RiskType::EnvFile));
        assert_eq!(risk_type("deploy/id_rsa.PPK"), Some(RiskType::KeyOrCert));
        assert_eq!(risk_type("ops/credentials.json"), Some(RiskType::CredentialFile));
        assert_eq!(risk_type("config/api_key.txt"), Some(RiskType::CredentialFile));
        assert_eq!(risk_type("src/environment.ts"), None);
        assert_eq!(risk_type("docs/secrets/readme.md"), None, "only the file name is matched");
    }

    #[test]
    fn test_tracks_counts_and_date_range() {
        let commits = vec![
            commit_at(1_700_000_000, &[".env"]),
            commit_at(1_600_000_000, &[".env", "server.key"]),
            commit_at(1_650_000_000, &[".env"]),
        ];
        let risks = analyze_security(&commits);
        assert_eq!(risks[0].file, ".env", "most frequent risk comes first");
        assert_eq!(risks[0].commit_count, 3);
        assert_eq!(risks[0].first_seen, "2020-09-13");
        assert_eq!(risks[0].last_seen, "2023-11-14");
        assert_eq!(risks[1].file, "server.key");
        assert_eq!(risks[1].risk_type, RiskType::KeyOrCert);
    }

    #[test]
    fn test_clean_history_has_no_risks() {
        let commits = vec![commit_at(1_700_000_000, &["src/app.ts", "README.md"])];
        assert!(analyze_security(&commits).is_empty());
    }
}
