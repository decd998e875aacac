use std::collections::HashMap;
use crate::analyzers::coupling::get_coupling_scores;
use crate::analyzers::Signals;
use crate::error::{Result, ScanError};
use crate::types::*;

const TIER_CRITICAL: f64 = 75.0;
const TIER_HIGH:     f64 = 50.0;
const TIER_MEDIUM:   f64 = 25.0;

/// Immutable scoring configuration: the effective weights, summing to 1.
/// Built once per run and passed to [`score_hotspots`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    weights: Weights,
}

impl ScoringConfig {
    /// Merges `overrides` onto the default weights and renormalizes.
    pub fn new(overrides: &WeightOverrides) -> Result<Self> {
        let weights = normalize_weights(&overrides.apply_to(Weights::default()))?;
        Ok(ScoringConfig { weights })
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig { weights: Weights::default() }
    }
}

/// Divides each weight by the sum of all seven.
///
/// Rejects negative or non-finite inputs, and an all-zero set
/// ([`ScanError::DegenerateWeights`]) instead of dividing by zero.
/// Weights are first scaled by the largest one so huge finite values
/// cannot overflow the sum.
pub fn normalize_weights(raw: &Weights) -> Result<Weights> {
    for (name, value) in raw.named() {
        if !value.is_finite() || value < 0.0 {
            return Err(ScanError::InvalidWeight { name, value });
        }
    }
    let largest = raw.named().iter().map(|(_, v)| *v).fold(0.0, f64::max);
    if largest <= 0.0 {
        return Err(ScanError::DegenerateWeights);
    }
    let scaled = Weights {
        churn:          raw.churn          / largest,
        bugs:           raw.bugs           / largest,
        reverts:        raw.reverts        / largest,
        bursts:         raw.bursts         / largest,
        coupling:       raw.coupling       / largest,
        silo:           raw.silo           / largest,
        commit_quality: raw.commit_quality / largest,
    };
    // every scaled weight is in [0, 1] and one of them is 1, so 1 <= wsum <= 7
    let wsum = scaled.sum();
    Ok(Weights {
        churn:          scaled.churn          / wsum,
        bugs:           scaled.bugs           / wsum,
        reverts:        scaled.reverts        / wsum,
        bursts:         scaled.bursts         / wsum,
        coupling:       scaled.coupling       / wsum,
        silo:           scaled.silo           / wsum,
        commit_quality: scaled.commit_quality / wsum,
    })
}

/// Aggregates all analyzer outputs into a final Hotspot Score (0–100) per file.
///
/// Returns one result per entry of `files`, in the same order. Ranking is
/// left to the caller.
pub fn score_hotspots(
    files:      &[String],
    signals:    &Signals,
    diff_stats: &DiffStatsMap,
    config:     &ScoringConfig,
) -> Vec<HotspotResult> {
    let weights = config.weights();
    let coupling_scores: HashMap<String, f64> = get_coupling_scores(files, &signals.couplings);

    files.iter().map(|file| {
        let churn   = signals.churn.get(file).cloned().unwrap_or_default();
        let bugs    = signals.bugs.get(file).cloned().unwrap_or_default();
        let reverts = signals.reverts.get(file).cloned().unwrap_or_default();
        let bursts  = signals.bursts.get(file).cloned().unwrap_or_default();
        let silo    = signals.silo.get(file).cloned().unwrap_or_default();
        let cq      = signals.commit_quality.get(file).cloned().unwrap_or_default();
        let diff    = diff_stats.get(file).cloned().unwrap_or_default();

        let churn_score          = churn.weighted_score;
        let bug_fix_score        = bugs.bug_score;
        let revert_score         = reverts.revert_score;
        let burst_score          = bursts.burst_score;
        let coupling_score       = coupling_scores.get(file).copied().unwrap_or(0.0);
        let silo_score           = silo.top_author_percent;
        let commit_quality_score = cq.commit_quality_score;

        let weighted =
            churn_score          * weights.churn          +
            bug_fix_score        * weights.bugs           +
            revert_score         * weights.reverts        +
            burst_score          * weights.bursts         +
            coupling_score       * weights.coupling       +
            silo_score           * weights.silo           +
            commit_quality_score * weights.commit_quality;
        let hotspot_score = weighted.round().clamp(0.0, 100.0);

        HotspotResult {
            file: file.clone(),
            hotspot_score,
            churn_score,
            bug_fix_score,
            revert_score,
            burst_score,
            coupling_score,
            silo_score,
            commit_quality_score,
            tier: get_tier(hotspot_score),
            details: HotspotDetails {
                commit_count:       churn.commit_count,
                bug_commits:        bugs.bug_commits,
                revert_count:       reverts.revert_count,
                burst_incidents:    bursts.burst_incidents,
                wip_commits:        cq.wip_commits,
                large_commit_count: cq.large_commit_count,
                top_author:         silo.top_author,
                top_author_percent: silo.top_author_percent,
                author_count:       silo.author_count,
                additions:          diff.additions,
                deletions:          diff.deletions,
            },
        }
    }).collect()
}

pub fn get_tier(score: f64) -> Tier {
    if score >= TIER_CRITICAL { Tier::Critical }
    else if score >= TIER_HIGH { Tier::High }
    else if score >= TIER_MEDIUM { Tier::Medium }
    else { Tier::Low }
}
