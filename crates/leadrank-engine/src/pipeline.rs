//! Batch orchestration: normalize and score every record, rank the
//! survivors, and summarize what happened.

use std::path::Path;

use chrono::Utc;
use leadrank_core::{RawLead, ScoredLead, ScoringPolicy, OUTREACH_ACTION};
use uuid::Uuid;

use crate::error::EngineError;
use crate::normalize::Normalizer;
use crate::ranker::{project, rank_leads};
use crate::scorer::Scorer;
use crate::table::{read_raw_leads, write_scored_rows};
use crate::types::{BatchReport, BatchSummary, RawRecord, SkipReason, SkippedRecord, TierCounts};

/// Normalizer and scorer built from one policy.
#[derive(Debug, Clone)]
pub struct LeadEngine {
    normalizer: Normalizer,
    scorer: Scorer,
}

impl LeadEngine {
    #[must_use]
    pub fn new(policy: ScoringPolicy) -> Self {
        Self {
            normalizer: Normalizer::new(policy.normalizer.clone()),
            scorer: Scorer::new(policy),
        }
    }

    #[must_use]
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    #[must_use]
    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    /// Normalizes and scores one raw lead.
    ///
    /// # Errors
    ///
    /// Returns [`SkipReason::BlankName`] if the lead has no identity key.
    pub fn score_lead(&self, raw: RawLead) -> Result<ScoredLead, SkipReason> {
        if !raw.has_name() {
            return Err(SkipReason::BlankName);
        }

        let lead = self.normalizer.normalize_lead(raw);
        let assessment = self.scorer.assess(&lead);
        let headquarters = self.normalizer.extract_headquarters(&lead.location);

        Ok(ScoredLead {
            lead,
            scores: assessment.scores,
            probability: assessment.probability,
            tier: assessment.tier,
            headquarters,
            action: OUTREACH_ACTION.to_string(),
        })
    }

    /// Scores and ranks a whole batch. Per-record failures are collected in
    /// the summary; they never abort the batch.
    #[must_use]
    pub fn run_batch(&self, records: Vec<RawRecord>) -> BatchReport {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let records_read = records.len();

        let mut scored = Vec::with_capacity(records_read);
        let mut skipped = Vec::new();

        for record in records {
            match record.outcome.and_then(|raw| self.score_lead(raw)) {
                Ok(lead) => scored.push(lead),
                Err(reason) => {
                    tracing::warn!(%run_id, row = record.row, %reason, "skipping record");
                    skipped.push(SkippedRecord {
                        row: record.row,
                        reason,
                    });
                }
            }
        }

        let ranking = rank_leads(scored);

        let mut tiers = TierCounts::default();
        for lead in &ranking.leads {
            tiers.record(lead.scored.tier);
        }

        let mean_probability = if ranking.leads.is_empty() {
            0.0
        } else {
            #[allow(clippy::cast_precision_loss)]
            let denom = ranking.leads.len() as f64;
            let sum: f64 = ranking
                .leads
                .iter()
                .map(|l| f64::from(l.scored.probability))
                .sum();
            sum / denom
        };

        let summary = BatchSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            records_read,
            ranked: ranking.leads.len(),
            duplicates: ranking.duplicates,
            skipped,
            tiers,
            mean_probability,
        };

        tracing::info!(
            %run_id,
            records_read,
            ranked = summary.ranked,
            skipped = summary.skipped_count(),
            duplicates = summary.duplicates,
            "batch scored"
        );

        BatchReport {
            leads: ranking.leads,
            summary,
        }
    }
}

/// Reads the raw table at `input`, scores and ranks it, and writes the
/// output table to `output`.
///
/// # Errors
///
/// Returns [`EngineError::MissingInput`] if `input` does not exist; nothing
/// is written in that case. Other [`EngineError`]s come from reading or
/// writing the tables.
pub fn run_scoring(
    engine: &LeadEngine,
    input: &Path,
    output: &Path,
) -> Result<BatchReport, EngineError> {
    tracing::info!(input = %input.display(), "reading raw leads");
    let records = read_raw_leads(input)?;
    if records.is_empty() {
        tracing::warn!(input = %input.display(), "raw lead table has no data rows");
    }

    let report = engine.run_batch(records);
    let rows = project(&report.leads);
    write_scored_rows(output, &rows)?;

    tracing::info!(
        output = %output.display(),
        rows = rows.len(),
        "wrote ranked leads"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use leadrank_core::Tier;

    use super::*;

    fn engine() -> LeadEngine {
        LeadEngine::new(ScoringPolicy::default())
    }

    fn raw(name: &str) -> RawLead {
        RawLead {
            name: name.to_string(),
            ..RawLead::default()
        }
    }

    fn record(row: usize, outcome: Result<RawLead, SkipReason>) -> RawRecord {
        RawRecord { row, outcome }
    }

    #[test]
    fn score_lead_attaches_headquarters_and_action() {
        let scored = engine()
            .score_lead(RawLead {
                location: "Remote, USA".to_string(),
                ..raw("Jane Doe")
            })
            .unwrap();
        assert_eq!(scored.headquarters, "Boston, MA (Likely HQ)");
        assert_eq!(scored.lead.location, "Remote, USA");
        assert_eq!(scored.action, "Ready to Outreach");
    }

    #[test]
    fn score_lead_uses_unknown_location_for_headquarters() {
        let scored = engine().score_lead(raw("Jane Doe")).unwrap();
        assert_eq!(scored.lead.location, "Unknown");
        assert_eq!(scored.headquarters, "Unknown");
    }

    #[test]
    fn score_lead_rejects_blank_name() {
        assert_eq!(engine().score_lead(raw(" ")), Err(SkipReason::BlankName));
    }

    #[test]
    fn run_batch_counts_skips_and_duplicates() {
        let report = engine().run_batch(vec![
            record(1, Ok(raw("Jane Doe"))),
            record(2, Err(SkipReason::MalformedRow("bad".to_string()))),
            record(3, Ok(raw(""))),
            record(4, Ok(raw("Jane Doe"))),
            record(5, Ok(raw("John Roe"))),
        ]);
        let summary = &report.summary;
        assert_eq!(summary.records_read, 5);
        assert_eq!(summary.ranked, 2);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.skipped_count(), 2);
        assert_eq!(summary.skipped[0].row, 2);
        assert_eq!(summary.skipped[1].reason, SkipReason::BlankName);
    }

    #[test]
    fn run_batch_keeps_whitespace_variants_distinct() {
        let report = engine().run_batch(vec![
            record(1, Ok(raw("Jane Doe"))),
            record(2, Ok(raw("Jane Doe "))),
        ]);
        assert_eq!(report.summary.ranked, 2);
        assert_eq!(report.summary.duplicates, 0);
        assert_eq!(report.leads[1].scored.lead.name, "Jane Doe ");
    }

    #[test]
    fn run_batch_tier_counts_and_mean() {
        let strong = RawLead {
            title: "Director of Preclinical Toxicology".to_string(),
            company: "Pfizer".to_string(),
            location: "Boston, MA".to_string(),
            recent_publication: "3D organoid model of hepatotoxicity".to_string(),
            pub_date: "2024-03".to_string(),
            keywords: "DILI".to_string(),
            ..raw("Strong Lead")
        };
        let report = engine().run_batch(vec![
            record(1, Ok(raw("Weak Lead"))),
            record(2, Ok(strong)),
        ]);
        assert_eq!(report.leads[0].scored.lead.name, "Strong Lead");
        assert_eq!(report.leads[0].scored.probability, 100);
        assert_eq!(report.leads[0].scored.tier, Tier::A);
        assert_eq!(report.summary.tiers.a, 1);
        assert_eq!(report.summary.tiers.c, 1);
        assert!((report.summary.mean_probability - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn run_batch_empty_is_empty() {
        let report = engine().run_batch(Vec::new());
        assert!(report.leads.is_empty());
        assert_eq!(report.summary.ranked, 0);
        assert!(report.summary.mean_probability.abs() < f64::EPSILON);
    }

    #[test]
    fn run_scoring_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("scored.csv");
        let err = run_scoring(&engine(), &dir.path().join("raw.csv"), &output).unwrap_err();
        assert!(matches!(err, EngineError::MissingInput { .. }));
        assert!(!output.exists());
    }
}
