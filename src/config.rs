use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScanError};
use crate::filters::FilterOverrides;
use crate::types::WeightOverrides;

/// Config file looked up in the working directory when `--config` is absent.
pub const LOCAL_CONFIG_NAME: &str = ".git-hotspots.yml";

/// All settings that can be placed in a .git-hotspots.yml config file.
/// Every field is optional; omitted fields fall back to CLI defaults.
/// CLI flags always take precedence over values set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HotspotsConfig {
    // Analysis defaults (overridden by the corresponding CLI flag)
    pub since: Option<String>,
    pub path: Option<String>,
    pub top: Option<usize>,
    pub bugs_only: Option<bool>,
    pub format: Option<String>,
    pub output: Option<String>,

    // File-filter overrides
    pub exclude_dirs: Option<Vec<String>>,
    pub include_dirs: Option<Vec<String>>,
    pub exclude_files: Option<Vec<String>>,
    pub exclude_extensions: Option<Vec<String>>,

    // Scoring weight overrides
    pub weights: Option<ConfigWeights>,
}

/// Optional per-signal weight overrides. All weights are normalized at runtime.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigWeights {
    pub churn: Option<f64>,
    pub bugs: Option<f64>,
    pub reverts: Option<f64>,
    pub bursts: Option<f64>,
    pub coupling: Option<f64>,
    pub silo: Option<f64>,
    pub commit_quality: Option<f64>,
}

impl From<&ConfigWeights> for WeightOverrides {
    fn from(w: &ConfigWeights) -> Self {
        WeightOverrides {
            churn:          w.churn,
            bugs:           w.bugs,
            reverts:        w.reverts,
            bursts:         w.bursts,
            coupling:       w.coupling,
            silo:           w.silo,
            commit_quality: w.commit_quality,
        }
    }
}

impl HotspotsConfig {
    /// Extracts the filter-related fields into a [`FilterOverrides`] value.
    pub fn filter_overrides(&self) -> FilterOverrides {
        FilterOverrides {
            extra_exclude_dirs: self.exclude_dirs.clone().unwrap_or_default(),
            allow_dirs: self.include_dirs.clone().unwrap_or_default(),
            extra_exclude_files: self.exclude_files.clone().unwrap_or_default(),
            extra_exclude_extensions: self.exclude_extensions.clone().unwrap_or_default(),
        }
    }

    pub fn weight_overrides(&self) -> WeightOverrides {
        self.weights.as_ref().map(WeightOverrides::from).unwrap_or_default()
    }

    /// Validates semantic constraints that serde cannot enforce.
    ///
    /// Returns a human-readable message describing exactly what is wrong and
    /// what values are accepted. Called automatically by [`load_config`].
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(fmt) = &self.format {
            match fmt.as_str() {
                "terminal" | "json" => {}
                other => {
                    return Err(format!(
                        "Invalid 'format' value: \"{other}\". \
                         Expected one of: \"terminal\", \"json\""
                    ))
                }
            }
        }

        // top: 0 would silently produce an empty report
        if let Some(0) = self.top {
            return Err("Invalid 'top' value: 0. \
                 Must be 1 or greater (use bugs_only to narrow results instead)"
                .to_string());
        }

        // Weights are normalized, so only ratios matter; zero switches a signal off.
        if let Some(w) = &self.weights {
            let fields: [(&str, Option<f64>); 7] = [
                ("churn", w.churn),
                ("bugs", w.bugs),
                ("reverts", w.reverts),
                ("bursts", w.bursts),
                ("coupling", w.coupling),
                ("silo", w.silo),
                ("commit_quality", w.commit_quality),
            ];
            for (name, val) in fields {
                let Some(v) = val else { continue };
                if !v.is_finite() {
                    return Err(format!(
                        "Invalid weight 'weights.{name}': {v} is not a finite number"
                    ));
                }
                if v < 0.0 {
                    return Err(format!(
                        "Invalid weight 'weights.{name}': {v}. \
                         Weights must be 0 or greater. \
                         They are normalized automatically, so only the ratios matter \
                         (e.g. churn: 2 and bugs: 1 makes churn twice as influential)"
                    ));
                }
            }
            if fields.iter().all(|(_, v)| *v == Some(0.0)) {
                return Err("Invalid weights: all seven are 0. \
                     At least one weight must be greater than 0"
                    .to_string());
            }
        }

        Ok(())
    }
}

/// Reads, parses, and validates a YAML config file from `path`.
pub fn load_config(path: &Path) -> Result<HotspotsConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ScanError::Config(format!("cannot read config file '{}': {e}", path.display())))?;
    let cfg: HotspotsConfig = serde_yaml::from_str(&content)
        .map_err(|e| ScanError::Config(format!("invalid config file '{}': {e}", path.display())))?;
    cfg.validate()
        .map_err(|e| ScanError::Config(format!("config file '{}': {e}", path.display())))?;
    Ok(cfg)
}

/// Per-user config location, e.g. `~/.config/git-hotspots/config.yml`.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("git-hotspots").join("config.yml"))
}

/// Resolves which config file applies: an explicit path must exist; otherwise
/// `.git-hotspots.yml` in `cwd`, then the per-user file, then none.
pub fn find_config(explicit: Option<&Path>, cwd: &Path) -> Result<Option<(PathBuf, HotspotsConfig)>> {
    if let Some(path) = explicit {
        return load_config(path).map(|cfg| Some((path.to_path_buf(), cfg)));
    }
    let candidates = std::iter::once(cwd.join(LOCAL_CONFIG_NAME)).chain(user_config_path());
    for path in candidates {
        if path.is_file() {
            log::debug!("using config file {}", path.display());
            let cfg = load_config(&path)?;
            return Ok(Some((path, cfg)));
        }
    }
    Ok(None)
}

/// Annotated YAML template, printed by `--generate-config`.
pub static TEMPLATE: &str = r#"# git-hotspots configuration file
# Generated by: git-hotspots --generate-config
#
# All settings are optional. Omit any field to use the built-in default.
# CLI flags always take precedence over values in this file.
# Save this file as .git-hotspots.yml in the directory you run from, or as
# ~/.config/git-hotspots/config.yml, or pass it explicitly:
#
#   git-hotspots --config .git-hotspots.yml [path]

# ── Analysis scope ─────────────────────────────────────────────────────────────

# Analyze commits since this date. Leave empty (or omit) for all history.
# Accepts any git date format: "6 months ago", "2024-01-01", "1 year ago"
# since: ""

# Limit analysis to a subdirectory (relative path from the repo root).
# path: "src"

# Number of hotspot results to display. All files are always analyzed.
# top: 20

# Only show files that appear in bug-fix commits.
# bugs_only: false

# ── Output ─────────────────────────────────────────────────────────────────────

# Output format: terminal, json
# format: "terminal"

# Output file path (json only). Defaults to stdout.
# output: "hotspot-report.json"

# ── File filtering ─────────────────────────────────────────────────────────────

# Additional directories to exclude (merged with the built-in list).
# exclude_dirs:
#   - "generated"
#   - "migrations"

# Built-in excluded directories to allow back into analysis.
# include_dirs:
#   - "dist"

# Additional filenames to exclude (exact match against the filename, not full path).
# exclude_files:
#   - "schema.graphql"

# Additional file extensions to exclude.
# exclude_extensions:
#   - ".pb.go"
#   - ".d.ts"

# ── Scoring weights ────────────────────────────────────────────────────────────
# All weights are normalized at runtime so they always sum to 1.0.
# Set a weight to 0 to switch that signal off; at least one must stay above 0.

# weights:
#   churn:          0.27   # Commit frequency with recency decay
#   bugs:           0.27   # Correlation with bug-fix commit messages
#   reverts:        0.14   # Files that have been reverted
#   bursts:         0.09   # Rapid-commit windows (3+ commits in 24 h)
#   coupling:       0.09   # Files that always change together
#   silo:           0.05   # Single-author concentration risk
#   commit_quality: 0.09   # WIP and oversized commits
"#;

/// Prints the config template to stdout, or writes it to `output_path` if given.
pub fn print_template(output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => {
            std::fs::write(path, TEMPLATE)?;
            eprintln!("✓ Config template written to {}", path.display());
            Ok(())
        }
        None => {
            print!("{TEMPLATE}");
            Ok(())
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> HotspotsConfig {
        serde_yaml::from_str(yaml).expect("should parse")
    }

    #[test]
    fn test_template_is_valid_yaml() {
        let result: std::result::Result<HotspotsConfig, _> = serde_yaml::from_str(TEMPLATE);
        let cfg = result.expect("TEMPLATE must parse as valid HotspotsConfig");
        // everything is commented out in the template
        assert!(cfg.since.is_none());
        assert!(cfg.top.is_none());
        assert!(cfg.weights.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let cfg = parse("{}");
        assert!(cfg.since.is_none());
        assert!(cfg.path.is_none());
        assert!(cfg.exclude_dirs.is_none());
        assert_eq!(cfg.weight_overrides(), WeightOverrides::default());
    }

    #[test]
    fn test_weights_parsed_into_overrides() {
        let cfg = parse("weights:\n  churn: 0.5\n  bugs: 0.5\n");
        let w = cfg.weight_overrides();
        assert_eq!(w.churn, Some(0.5));
        assert_eq!(w.bugs, Some(0.5));
        assert_eq!(w.reverts, None);
    }

    #[test]
    fn test_analysis_defaults_parsed() {
        let cfg = parse("since: \"6 months ago\"\ntop: 10\nbugs_only: true\nformat: json\n");
        assert_eq!(cfg.since.as_deref(), Some("6 months ago"));
        assert_eq!(cfg.top, Some(10));
        assert_eq!(cfg.bugs_only, Some(true));
        assert_eq!(cfg.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<HotspotsConfig, _> = serde_yaml::from_str("unknown_setting: true\n");
        assert!(result.is_err(), "Unknown fields should be rejected by deny_unknown_fields");
    }

    #[test]
    fn test_filter_overrides_populated() {
        let cfg = parse("exclude_dirs:\n  - proto\ninclude_dirs:\n  - dist\nexclude_extensions:\n  - .pb.go\n");
        let fo = cfg.filter_overrides();
        assert_eq!(fo.extra_exclude_dirs, vec!["proto"]);
        assert_eq!(fo.allow_dirs, vec!["dist"]);
        assert!(fo.extra_exclude_files.is_empty());
        assert_eq!(fo.extra_exclude_extensions, vec![".pb.go"]);
    }

    // ── validate() ────────────────────────────────────────────────────────────

    #[test]
    fn test_validate_invalid_format_rejected() {
        let msg = parse("format: \"html\"\n").validate().expect_err("html is not supported");
        assert!(msg.contains("format"), "Error should mention 'format': {msg}");
        assert!(msg.contains("terminal") && msg.contains("json"), "Error should list valid values: {msg}");
    }

    #[test]
    fn test_validate_zero_top_rejected() {
        let msg = parse("top: 0\n").validate().expect_err("top: 0 should be rejected");
        assert!(msg.contains("top"), "Error should mention 'top': {msg}");
    }

    #[test]
    fn test_validate_zero_weight_allowed() {
        assert!(parse("weights:\n  bugs: 0.0\n").validate().is_ok(), "a single zero weight disables a signal");
    }

    #[test]
    fn test_validate_all_zero_weights_rejected() {
        let yaml = "weights:\n  churn: 0\n  bugs: 0\n  reverts: 0\n  bursts: 0\n  coupling: 0\n  silo: 0\n  commit_quality: 0\n";
        let msg = parse(yaml).validate().expect_err("all-zero weights are degenerate");
        assert!(msg.contains("all seven"), "{msg}");
    }

    #[test]
    fn test_validate_all_weight_fields_checked() {
        for field in ["churn", "bugs", "reverts", "bursts", "coupling", "silo", "commit_quality"] {
            let yaml = format!("weights:\n  {field}: -1.0\n");
            let msg = parse(&yaml).validate().expect_err("negative weight should be rejected");
            assert!(msg.contains(field), "Error for '{field}' should name the field: {msg}");
        }
    }

    #[test]
    fn test_find_config_prefers_explicit_then_local() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(LOCAL_CONFIG_NAME), "top: 7\n").expect("write local");
        let explicit = dir.path().join("other.yml");
        std::fs::write(&explicit, "top: 3\n").expect("write explicit");

        let (path, cfg) = find_config(Some(&explicit), dir.path()).expect("load").expect("found");
        assert_eq!(path, explicit);
        assert_eq!(cfg.top, Some(3));

        let (path, cfg) = find_config(None, dir.path()).expect("load").expect("found");
        assert_eq!(path, dir.path().join(LOCAL_CONFIG_NAME));
        assert_eq!(cfg.top, Some(7));
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = find_config(Some(&dir.path().join("nope.yml")), dir.path()).expect_err("must fail");
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn test_load_example_file() {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let example_path = manifest_dir.join(".git-hotspots.example.yml");

        let cfg = load_config(&example_path).unwrap_or_else(|e| {
            panic!("Example config file should parse and validate successfully: {e}")
        });

        assert_eq!(cfg.since.as_deref(), Some("6 months ago"));
        assert_eq!(cfg.path.as_deref(), Some("src"));
        assert_eq!(cfg.top, Some(20));
        assert_eq!(cfg.format.as_deref(), Some("terminal"));

        let fo = cfg.filter_overrides();
        assert!(fo.extra_exclude_dirs.contains(&"generated".to_string()));
        assert!(fo.allow_dirs.contains(&"dist".to_string()));
        assert!(fo.extra_exclude_files.contains(&"schema.graphql".to_string()));
        assert!(fo.extra_exclude_extensions.contains(&".d.ts".to_string()));

        let w = cfg.weight_overrides();
        assert_eq!(w.churn, Some(0.27));
        assert_eq!(w.bugs, Some(0.40));
        assert_eq!(w.commit_quality, Some(0.09));
    }
}
