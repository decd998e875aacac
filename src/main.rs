use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use git_hotspots::config::{self, HotspotsConfig};
use git_hotspots::engine::{self, AnalysisOptions, Outcome};
use git_hotspots::reporters;
use git_hotspots::scoring::ScoringConfig;
use git_hotspots::types::WeightOverrides;

#[derive(Parser, Debug)]
#[command(
    name = "git-hotspots",
    about = "🔥 Rank bug-prone files from git history",
    version,
    long_about = "Scans local git history and ranks files by a weighted hotspot score built from\n\
                  seven signals: churn, bug-fix correlation, reverts, commit bursts, co-change\n\
                  coupling, author concentration and commit quality.\n\n\
                  Several repository paths may be given; each is analyzed independently\n\
                  with the same settings."
)]
struct Args {
    /// Git repositories to analyze. Defaults to the current directory.
    #[arg(value_name = "PATH")]
    repo_paths: Vec<PathBuf>,

    /// Any git date expression, e.g. "6 months ago" or "2024-01-01". Default: all history.
    #[arg(long)]
    since: Option<String>,

    /// Only analyze files under this path prefix.
    #[arg(long)]
    path: Option<String>,

    /// Number of results to show. All files are always scored. [default: 20]
    #[arg(long, value_parser = parse_top)]
    top: Option<usize>,

    /// Only show files that appear in bug-fix commits.
    #[arg(long)]
    bugs_only: bool,

    /// Output format [default: terminal]
    #[arg(long, value_parser = ["terminal", "json"])]
    format: Option<String>,

    /// JSON output file. With several repositories the repo name is appended.
    #[arg(long)]
    output: Option<PathBuf>,

    /// YAML config file. Default: ./.git-hotspots.yml, then the per-user config.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print an annotated config template, or write it to FILE, and exit.
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    generate_config: Option<Option<PathBuf>>,

    /// Pin "now" to this Unix timestamp for reproducible output.
    #[arg(long, value_name = "UNIX_SECONDS")]
    now: Option<i64>,

    /// Log pipeline details to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[arg(long = "weight-churn")]          weight_churn:          Option<f64>,
    #[arg(long = "weight-bugs")]           weight_bugs:           Option<f64>,
    #[arg(long = "weight-reverts")]        weight_reverts:        Option<f64>,
    #[arg(long = "weight-bursts")]         weight_bursts:         Option<f64>,
    #[arg(long = "weight-coupling")]       weight_coupling:       Option<f64>,
    #[arg(long = "weight-silo")]           weight_silo:           Option<f64>,
    #[arg(long = "weight-commit-quality")] weight_commit_quality: Option<f64>,
}

/// Effective settings after layering defaults, config file and CLI flags.
#[derive(Debug)]
struct Settings {
    top: usize,
    bugs_only: bool,
    format: String,
    output: Option<PathBuf>,
    options: AnalysisOptions,
}

const DEFAULT_TOP: usize = 20;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_module("git_hotspots", log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    if let Some(target) = &args.generate_config {
        config::print_template(target.as_deref())?;
        return Ok(ExitCode::SUCCESS);
    }

    let cwd = std::env::current_dir().context("cannot determine the current directory")?;
    let file_config = config::find_config(args.config.as_deref(), &cwd)?;
    if let Some((path, _)) = &file_config {
        info!("loaded config from {}", path.display());
    }
    let settings = resolve_settings(&args, file_config.as_ref().map(|(_, c)| c));

    // Reject bad weights once, before touching any repository.
    ScoringConfig::new(&settings.options.weights)?;

    let repos = if args.repo_paths.is_empty() { vec![cwd] } else { args.repo_paths.clone() };
    let is_multi = repos.len() > 1;
    if settings.format == "terminal" && settings.output.is_some() {
        warn!("--output only applies to --format json; ignoring it");
    }

    let mut failed = 0usize;
    for repo in &repos {
        let name = repo_name(repo);
        let output_path = settings.output.as_deref().map(|base| {
            if is_multi { make_output_path(base, &name) } else { base.to_path_buf() }
        });

        if let Err(e) = analyze_one(repo, &name, &settings, output_path.as_deref(), is_multi) {
            eprintln!("Error analyzing {name}: {e:#}");
            failed += 1;
        }
    }

    if failed > 0 {
        if is_multi {
            eprintln!("{failed} of {} repositories failed", repos.len());
        }
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// CLI flags override the config file, which overrides built-in defaults.
fn resolve_settings(args: &Args, file: Option<&HotspotsConfig>) -> Settings {
    let cli_weights = WeightOverrides {
        churn:          args.weight_churn,
        bugs:           args.weight_bugs,
        reverts:        args.weight_reverts,
        bursts:         args.weight_bursts,
        coupling:       args.weight_coupling,
        silo:           args.weight_silo,
        commit_quality: args.weight_commit_quality,
    };
    let file_weights = file.map(HotspotsConfig::weight_overrides).unwrap_or_default();

    Settings {
        top: args.top.or(file.and_then(|c| c.top)).unwrap_or(DEFAULT_TOP),
        bugs_only: args.bugs_only || file.and_then(|c| c.bugs_only).unwrap_or(false),
        format: args
            .format
            .clone()
            .or_else(|| file.and_then(|c| c.format.clone()))
            .unwrap_or_else(|| "terminal".to_string()),
        output: args.output.clone().or_else(|| file.and_then(|c| c.output.as_ref().map(PathBuf::from))),
        options: AnalysisOptions {
            since: args
                .since
                .clone()
                .or_else(|| file.and_then(|c| c.since.clone()))
                .unwrap_or_default(),
            path: args.path.clone().or_else(|| file.and_then(|c| c.path.clone())),
            weights: file_weights.or(cli_weights),
            filters: file.map(HotspotsConfig::filter_overrides).unwrap_or_default(),
            now: args.now,
        },
    }
}

// ── Analysis of one repository ─────────────────────────────────────────────────

fn analyze_one(
    repo:        &Path,
    name:        &str,
    settings:    &Settings,
    output_path: Option<&Path>,
    is_multi:    bool,
) -> anyhow::Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(format!("[{name}] Parsing history and running all 7 analyzers..."));

    let start = Instant::now();
    let outcome = engine::analyze_repo(repo, &settings.options);
    pb.finish_and_clear();

    let report = match outcome? {
        Outcome::EmptyHistory => {
            eprintln!("⚠ [{name}] No commits found. Try a wider --since, e.g. --since=\"4 years ago\"");
            return Ok(());
        }
        Outcome::EmptyFilteredSet { commit_count } => {
            eprintln!("⚠ [{name}] {commit_count} commits, but no files left after filtering. Try --path or --since.");
            return Ok(());
        }
        Outcome::Report(report) => *report,
    };

    eprintln!(
        "✔ [{name}] {} commits, {} files, ⏱ {}{}",
        report.meta.commit_count,
        report.meta.file_count,
        fmt_dur(start.elapsed()),
        if report.security_risks.is_empty() {
            String::new()
        } else {
            format!(", ⚠ {} security risk(s)", report.security_risks.len())
        }
    );

    let report = reporters::present(report, settings.top, settings.bugs_only);
    match settings.format.as_str() {
        "json" => {
            reporters::json::report_json(&report, output_path)
                .with_context(|| format!("writing JSON report for {name}"))?;
            if let Some(p) = output_path {
                eprintln!("   → {}", p.display());
            }
        }
        _ => {
            if is_multi {
                println!();
                println!("╔══════════════════════════════════════════════════════╗");
                println!("║  📁 {name}");
                println!("╚══════════════════════════════════════════════════════╝");
            }
            reporters::terminal::report_terminal(&report);
        }
    }
    Ok(())
}

// ── Helpers ────────────────────────────────────────────────────────────────────

/// `--top` must be at least 1, matching the config file rule.
fn parse_top(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be 1 or greater (use --bugs-only to narrow results instead)".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_millis();
    if ms >= 1000 { format!("{:.1}s", d.as_secs_f64()) } else { format!("{ms}ms") }
}

/// Last path component, resolving `.` and friends through the filesystem.
fn repo_name(path: &Path) -> String {
    path.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("repo")
        .to_string()
}

/// Inserts the repo name before the extension.
/// e.g. `hotspot-report.json` + `my-app` → `hotspot-report-my-app.json`
fn make_output_path(base: &Path, repo_name: &str) -> PathBuf {
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("hotspot-report");
    let ext  = base.extension().and_then(|s| s.to_str()).unwrap_or("json");
    let dir  = base.parent().unwrap_or(Path::new("."));
    let safe: String = repo_name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    dir.join(format!("{stem}-{safe}.{ext}"))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("git-hotspots").chain(argv.iter().copied()))
            .expect("arguments should parse")
    }

    fn file_config(yaml: &str) -> HotspotsConfig {
        serde_yaml::from_str(yaml).expect("config should parse")
    }

    #[test]
    fn test_fmt_dur_milliseconds() {
        let s = fmt_dur(Duration::from_millis(250));
        assert!(s.ends_with("ms"), "Sub-second durations should use 'ms': got '{s}'");
        assert!(s.contains("250"), "Should show the millisecond value: got '{s}'");
    }

    #[test]
    fn test_fmt_dur_seconds() {
        let s = fmt_dur(Duration::from_millis(1_500));
        assert_eq!(s, "1.5s");
    }

    #[test]
    fn test_make_output_path() {
        let result = make_output_path(Path::new("report.json"), "my-app");
        assert_eq!(result, PathBuf::from("report-my-app.json"));
    }

    #[test]
    fn test_make_output_path_special_chars() {
        let result = make_output_path(Path::new("out/report.json"), "my app/v2");
        assert_eq!(result, PathBuf::from("out/report-my-app-v2.json"));
    }

    #[test]
    fn test_defaults_without_config() {
        let s = resolve_settings(&args(&[]), None);
        assert_eq!(s.top, DEFAULT_TOP);
        assert!(!s.bugs_only);
        assert_eq!(s.format, "terminal");
        assert!(s.options.since.is_empty());
        assert_eq!(s.options.weights, WeightOverrides::default());
        assert_eq!(s.options.now, None);
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let cfg = file_config("since: \"1 year ago\"\ntop: 5\nformat: json\nweights:\n  churn: 1.0\n  silo: 3.0\n");
        let s = resolve_settings(
            &args(&["--since", "2 weeks ago", "--weight-churn", "4", "--now", "1700000000"]),
            Some(&cfg),
        );
        assert_eq!(s.options.since, "2 weeks ago");
        assert_eq!(s.top, 5, "config value used when the flag is absent");
        assert_eq!(s.format, "json");
        assert_eq!(s.options.weights.churn, Some(4.0));
        assert_eq!(s.options.weights.silo, Some(3.0));
        assert_eq!(s.options.now, Some(1_700_000_000));
    }

    #[test]
    fn test_config_filters_flow_into_options() {
        let cfg = file_config("exclude_dirs:\n  - proto\nbugs_only: true\n");
        let s = resolve_settings(&args(&[]), Some(&cfg));
        assert!(s.bugs_only);
        assert_eq!(s.options.filters.extra_exclude_dirs, vec!["proto"]);
    }

    #[test]
    fn test_several_repo_paths_and_generate_config() {
        let a = args(&["one", "two", "--generate-config"]);
        assert_eq!(a.repo_paths, vec![PathBuf::from("one"), PathBuf::from("two")]);
        assert_eq!(a.generate_config, Some(None));
    }

    #[test]
    fn test_zero_top_rejected() {
        assert!(Args::try_parse_from(["git-hotspots", "--top", "0"]).is_err());
        assert!(Args::try_parse_from(["git-hotspots", "--top", "-3"]).is_err());
        assert_eq!(args(&["--top", "7"]).top, Some(7));
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Args::try_parse_from(["git-hotspots", "--format", "html"]).is_err());
    }
}
