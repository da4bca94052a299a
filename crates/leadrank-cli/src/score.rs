//! `score` command handler: run one batch and report what happened.

use std::path::Path;

use anyhow::Context;
use leadrank_core::{AppConfig, TierThresholds};
use leadrank_engine::{BatchSummary, LeadEngine};

/// Run the scoring batch from `input` to `output`.
///
/// Paths and policy fall back to the environment configuration when not
/// given on the command line.
///
/// # Errors
///
/// Returns an error if the policy cannot be loaded, the input table is
/// missing, or the output table cannot be written. Skipped records are
/// reported in the summary, not as errors.
pub(crate) fn run_score(
    config: &AppConfig,
    input: Option<&Path>,
    output: Option<&Path>,
    policy: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let policy = leadrank_core::resolve_policy(config, policy).context("failed to load policy")?;
    let thresholds = policy.tiers;
    let engine = LeadEngine::new(policy);

    let input = input.unwrap_or(config.raw_path.as_path());
    let output = output.unwrap_or(config.scored_path.as_path());

    let report = leadrank_engine::run_scoring(&engine, input, output)
        .with_context(|| format!("scoring {} failed", input.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
        return Ok(());
    }

    println!(
        "scored {} leads from {} -> {}",
        report.summary.ranked,
        input.display(),
        output.display()
    );
    print_summary(&report.summary, &thresholds);
    Ok(())
}

fn print_summary(summary: &BatchSummary, thresholds: &TierThresholds) {
    let labels = tier_labels(thresholds);
    let counts = [summary.tiers.a, summary.tiers.b, summary.tiers.c];

    println!();
    println!("{:<16}LEADS", "TIER");
    for (label, count) in labels.iter().zip(counts) {
        println!("{label:<16}{count}");
    }
    println!();
    println!("mean probability: {:.1}%", summary.mean_probability);

    if summary.duplicates > 0 {
        println!("duplicates dropped: {}", summary.duplicates);
    }
    if !summary.skipped.is_empty() {
        println!("records skipped: {}", summary.skipped_count());
        for skipped in &summary.skipped {
            println!("  row {}: {}", skipped.row, skipped.reason);
        }
    }
}

/// Human labels for the three tiers under the given thresholds.
fn tier_labels(thresholds: &TierThresholds) -> [String; 3] {
    let b_upper = thresholds.a.saturating_sub(1);
    [
        format!("A (>= {})", thresholds.a),
        format!("B ({}-{b_upper})", thresholds.b),
        format!("C (< {})", thresholds.b),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tier_labels() {
        let labels = tier_labels(&TierThresholds::default());
        assert_eq!(labels, ["A (>= 80)", "B (60-79)", "C (< 60)"]);
    }

    #[test]
    fn tier_labels_follow_custom_thresholds() {
        let labels = tier_labels(&TierThresholds { a: 90, b: 50 });
        assert_eq!(labels[1], "B (50-89)");
    }
}
