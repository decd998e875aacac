use std::fmt::Write as _;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, Table};

use crate::types::{HotspotResult, Report, Tier};

/// Couplings with fewer co-changes are left out of the terminal summary.
const NOTABLE_CO_CHANGES: usize = 5;

pub fn report_terminal(report: &Report) {
    print!("{}", render(report));
}

/// Builds the full terminal report: header, security risks, hotspot table,
/// notable couplings and recommendations.
pub fn render(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} since \"{}\" ({} commits, {} files)",
        "🔥 git-hotspots".red().bold(),
        report.meta.repo_path.cyan(),
        report.meta.since.bright_black(),
        report.meta.commit_count.to_string().bright_black(),
        report.meta.file_count.to_string().bright_black(),
    );
    out.push('\n');

    // ── Security warnings ──────────────────────────────────────────────────
    if !report.security_risks.is_empty() {
        let _ = writeln!(out, "{}", "🔐 Security Risks: sensitive files found in git history".red().bold());
        let _ = writeln!(out, "{}", "   Even deleted files remain accessible via git history!".red());
        out.push('\n');
        for risk in &report.security_risks {
            let _ = writeln!(
                out,
                "   {}  {} [{}] {} (first: {}, last: {})",
                "⚠".red(),
                risk.file.cyan(),
                risk.risk_type.to_string().red(),
                format!("{} commit{}", risk.commit_count, if risk.commit_count != 1 { "s" } else { "" }).bright_black(),
                risk.first_seen.bright_black(),
                risk.last_seen.bright_black(),
            );
        }
        out.push('\n');
    }

    if report.results.is_empty() {
        let _ = writeln!(out, "{}", "  No hotspots found with current filters.".yellow());
        out.push('\n');
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["RANK", "FILE", "SCORE", "CHURN", "BUGS", "REVERTS", "WIP", "RISK"]);

    for (i, r) in report.results.iter().enumerate() {
        // Cells carry color as attributes so comfy-table measures plain-text widths.
        let wip_cell = if r.details.wip_commits > 0 {
            Cell::new(r.details.wip_commits.to_string()).fg(Color::Yellow)
        } else {
            Cell::new("0").fg(Color::DarkGrey)
        };

        table.add_row(vec![
            Cell::new(format!("{:3}", i + 1)),
            Cell::new(truncate_path(&r.file, 44)),
            score_cell(r.hotspot_score, r.tier),
            churn_cell(r.churn_score),
            Cell::new(r.details.bug_commits.to_string()),
            Cell::new(r.details.revert_count.to_string()),
            wip_cell,
            tier_cell(r.tier),
        ]);
    }

    let _ = writeln!(out, "{table}");

    // ── Co-change coupling ─────────────────────────────────────────────────
    let notable: Vec<_> = report
        .couplings
        .iter()
        .filter(|c| c.co_changes >= NOTABLE_CO_CHANGES)
        .take(5)
        .collect();
    if !notable.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{}", "⚠️  Co-change coupling detected:".yellow());
        for c in &notable {
            let _ = writeln!(
                out,
                "    {} ↔ {} {}",
                c.file_a.cyan(),
                c.file_b.cyan(),
                format!("(changed together {}x, strength {}%)", c.co_changes, c.strength).bright_black(),
            );
        }
    }

    // ── Recommendations ────────────────────────────────────────────────────
    let recs = build_recommendations(&report.results);
    if !recs.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{}", "💡 Recommendations:".cyan());
        for rec in &recs {
            let _ = writeln!(out, "    {} {}", "•".white(), rec);
        }
    }

    out.push('\n');
    out
}

// ─── Cell builders ────────────────────────────────────────────────────────────

fn score_cell(score: f64, tier: Tier) -> Cell {
    let text = format!("{:3}", score as u64);
    match tier {
        Tier::Critical => Cell::new(text).fg(Color::Red).add_attribute(Attribute::Bold),
        Tier::High     => Cell::new(text).fg(Color::Yellow).add_attribute(Attribute::Bold),
        Tier::Medium   => Cell::new(text),
        Tier::Low      => Cell::new(text).fg(Color::Green),
    }
}

/// Churn as a 5-char block bar, one full block per 20 points.
fn churn_cell(score: f64) -> Cell {
    let s = score.clamp(0.0, 100.0) as usize;
    let parts = ["", "▏", "▎", "▍", "▌", "▋", "▊", "▉", "█"];
    let filled  = s / 20;
    let rem     = s % 20;
    let partial = parts[(rem * 8 / 20).min(8)];
    let bar = "█".repeat(filled) + partial;
    Cell::new(format!("{bar:<5}")).fg(Color::Red)
}

fn tier_cell(tier: Tier) -> Cell {
    match tier {
        Tier::Critical => Cell::new("🔴 CRITICAL").fg(Color::Red),
        Tier::High     => Cell::new("🟠 HIGH").fg(Color::Yellow),
        Tier::Medium   => Cell::new("🟡 MEDIUM"),
        Tier::Low      => Cell::new("🟢 LOW").fg(Color::Green),
    }
}

// ─── Other helpers ────────────────────────────────────────────────────────────

/// Keeps the tail of long paths, cutting on a char boundary.
fn truncate_path(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_string();
    }
    let tail: String = s.chars().skip(len - (max - 1)).collect();
    format!("…{tail}")
}

fn build_recommendations(results: &[HotspotResult]) -> Vec<String> {
    let mut recs = Vec::new();
    for r in results.iter().take(10) {
        let name = r.file.rsplit('/').next().unwrap_or(&r.file);
        if r.details.top_author_percent >= 80.0 && r.details.author_count <= 2 {
            recs.push(format!(
                "{} has {}% single-author commits; consider a knowledge-transfer session",
                name.yellow(), r.details.top_author_percent
            ));
        }
        if r.details.burst_incidents >= 3 {
            recs.push(format!(
                "{} shows burst patterns: {} rapid-commit windows detected",
                name.yellow(), r.details.burst_incidents
            ));
        }
        if r.details.revert_count >= 2 {
            recs.push(format!(
                "{} has been reverted {} times; consider adding tests or stricter review",
                name.yellow(), r.details.revert_count
            ));
        }
        if r.details.wip_commits >= 3 {
            recs.push(format!(
                "{} appears in {} WIP/low-quality commits; this area needs careful review",
                name.yellow(), r.details.wip_commits
            ));
        }
        if r.details.large_commit_count >= 3 {
            recs.push(format!(
                "{} was swept up in {} large commits; consider smaller, focused changes",
                name.yellow(), r.details.large_commit_count
            ));
        }
        if recs.len() >= 8 { break; }
    }
    recs.truncate(8);
    recs
}
