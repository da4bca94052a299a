use chrono::{DateTime, Utc};
use leadrank_core::{RankedLead, RawLead, Tier};
use serde::Serialize;
use uuid::Uuid;

/// Why a record was dropped from a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("record has a blank name")]
    BlankName,

    #[error("malformed row: {0}")]
    MalformedRow(String),
}

/// One data row of the input table, already parsed or already rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub outcome: Result<RawLead, SkipReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub row: usize,
    pub reason: SkipReason,
}

/// Lead counts per tier over the ranked output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl TierCounts {
    pub fn record(&mut self, tier: Tier) {
        match tier {
            Tier::A => self.a += 1,
            Tier::B => self.b += 1,
            Tier::C => self.c += 1,
        }
    }
}

/// Observable outcome of one batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Data rows seen in the input, including skipped ones.
    pub records_read: usize,
    /// Leads in the ranked output.
    pub ranked: usize,
    /// Later occurrences of an already-seen name.
    pub duplicates: usize,
    pub skipped: Vec<SkippedRecord>,
    pub tiers: TierCounts,
    /// Mean probability of the ranked output; `0.0` when empty.
    pub mean_probability: f64,
}

impl BatchSummary {
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Ranked leads plus the summary describing how they were produced.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub leads: Vec<RankedLead>,
    pub summary: BatchSummary,
}
