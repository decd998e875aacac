use serde::Serialize;
use std::collections::HashMap;

// ─── Core Git Data ────────────────────────────────────────────────────────────

/// One parsed `git log` entry. `files` holds post-rename paths in log order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    pub author: String,
    pub timestamp: i64,
    pub subject: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
}

pub type DiffStatsMap = HashMap<String, DiffStats>;

// ─── Analyzer Outputs ─────────────────────────────────────────────────────────
//
// Each `Default` is the neutral value for a file the analyzer saw no signal for.
// Analyzers zero-fill with these and the scorer falls back to them.

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChurnData {
    pub commit_count: usize,
    pub weighted_score: f64,
    pub raw_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BugData {
    pub bug_commits: usize,
    pub bug_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevertData {
    pub revert_count: usize,
    pub revert_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BurstData {
    pub burst_incidents: usize,
    pub burst_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiloData {
    pub top_author: String,
    pub top_author_percent: f64,
    pub author_count: usize,
}

/// A file nobody touched is treated as a full silo: worst case, not zero.
impl Default for SiloData {
    fn default() -> Self {
        SiloData {
            top_author:         "unknown".to_string(),
            top_author_percent: 100.0,
            author_count:       1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommitQualityData {
    pub wip_commits: usize,
    pub large_commit_count: usize,
    pub commit_quality_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CouplingEntry {
    pub file_a: String,
    pub file_b: String,
    pub co_changes: usize,
    pub strength: f64,
}

// ─── Security ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskType {
    EnvFile,
    KeyOrCert,
    CredentialFile,
}

impl std::fmt::Display for RiskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskType::EnvFile        => write!(f, "env-file"),
            RiskType::KeyOrCert      => write!(f, "key-or-cert"),
            RiskType::CredentialFile => write!(f, "credential-file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityRisk {
    pub file: String,
    pub risk_type: RiskType,
    pub commit_count: usize,
    pub first_seen: String,
    pub last_seen: String,
}

// ─── Scoring ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Critical => write!(f, "CRITICAL"),
            Tier::High     => write!(f, "HIGH"),
            Tier::Medium   => write!(f, "MEDIUM"),
            Tier::Low      => write!(f, "LOW"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotDetails {
    pub commit_count: usize,
    pub bug_commits: usize,
    pub revert_count: usize,
    pub burst_incidents: usize,
    pub wip_commits: usize,
    pub large_commit_count: usize,
    pub top_author: String,
    pub top_author_percent: f64,
    pub author_count: usize,
    pub additions: usize,
    pub deletions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotResult {
    pub file: String,
    pub hotspot_score: f64,
    pub churn_score: f64,
    pub bug_fix_score: f64,
    pub revert_score: f64,
    pub burst_score: f64,
    pub coupling_score: f64,
    pub silo_score: f64,
    pub commit_quality_score: f64,
    pub tier: Tier,
    pub details: HotspotDetails,
}

/// Per-signal coefficients. Raw values may be any non-negative reals;
/// [`crate::scoring::normalize_weights`] scales them to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    pub churn: f64,
    pub bugs: f64,
    pub reverts: f64,
    pub bursts: f64,
    pub coupling: f64,
    pub silo: f64,
    pub commit_quality: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            churn:          0.27,
            bugs:           0.27,
            reverts:        0.14,
            bursts:         0.09,
            coupling:       0.09,
            silo:           0.05,
            commit_quality: 0.09,
        }
    }
}

impl Weights {
    /// Field name / value pairs, in declaration order.
    pub fn named(&self) -> [(&'static str, f64); 7] {
        [
            ("churn",          self.churn),
            ("bugs",           self.bugs),
            ("reverts",        self.reverts),
            ("bursts",         self.bursts),
            ("coupling",       self.coupling),
            ("silo",           self.silo),
            ("commit_quality", self.commit_quality),
        ]
    }

    pub fn sum(&self) -> f64 {
        self.named().iter().map(|(_, v)| v).sum()
    }
}

/// Caller-supplied partial weights. Absent fields keep their default.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightOverrides {
    pub churn: Option<f64>,
    pub bugs: Option<f64>,
    pub reverts: Option<f64>,
    pub bursts: Option<f64>,
    pub coupling: Option<f64>,
    pub silo: Option<f64>,
    pub commit_quality: Option<f64>,
}

impl WeightOverrides {
    /// Layers `other` on top of `self`; fields set in `other` win.
    pub fn or(self, other: WeightOverrides) -> WeightOverrides {
        WeightOverrides {
            churn:          other.churn.or(self.churn),
            bugs:           other.bugs.or(self.bugs),
            reverts:        other.reverts.or(self.reverts),
            bursts:         other.bursts.or(self.bursts),
            coupling:       other.coupling.or(self.coupling),
            silo:           other.silo.or(self.silo),
            commit_quality: other.commit_quality.or(self.commit_quality),
        }
    }

    pub fn apply_to(&self, base: Weights) -> Weights {
        Weights {
            churn:          self.churn.unwrap_or(base.churn),
            bugs:           self.bugs.unwrap_or(base.bugs),
            reverts:        self.reverts.unwrap_or(base.reverts),
            bursts:         self.bursts.unwrap_or(base.bursts),
            coupling:       self.coupling.unwrap_or(base.coupling),
            silo:           self.silo.unwrap_or(base.silo),
            commit_quality: self.commit_quality.unwrap_or(base.commit_quality),
        }
    }
}

// ─── Report ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMeta {
    pub since: String,
    pub commit_count: usize,
    pub file_count: usize,
    pub analyzed_at: String,
    pub repo_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub results: Vec<HotspotResult>,
    pub couplings: Vec<CouplingEntry>,
    pub security_risks: Vec<SecurityRisk>,
}
