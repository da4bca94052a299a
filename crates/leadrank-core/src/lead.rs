//! Lead records as they move through the engine: raw input, scored, ranked,
//! and the fixed-schema row handed to the presentation layer.

use serde::{Deserialize, Deserializer, Serialize};

use crate::policy::TierThresholds;

/// Annotation attached to every scored lead.
pub const OUTREACH_ACTION: &str = "Ready to Outreach";

/// Sentinel used when a company or location cannot be determined.
pub const UNKNOWN: &str = "Unknown";

/// One candidate contact extracted from a source publication.
///
/// Every column except `name` is optional in the input table; a missing
/// column or empty cell deserializes to an empty string. Sentinels for
/// `company` and `location` are applied by the engine's normalizer, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLead {
    /// Display name; the identity key used for deduplication.
    pub name: String,
    pub title: String,
    pub company: String,
    /// Free text, may encode city, region, and country.
    pub location: String,
    pub email: String,
    pub linkedin: String,
    /// Title of the lead's most recent publication.
    pub recent_publication: String,
    /// Year-month string, e.g. `"2024-03"`.
    pub pub_date: String,
    /// Search term(s) the record was harvested under.
    pub keywords: String,
    pub journal: String,
    /// Source record identifier (PubMed ID for harvested leads).
    #[serde(alias = "pmid")]
    pub source_id: String,
    /// Raw affiliation text, when the source kept it.
    pub affiliation: String,
}

impl RawLead {
    /// Returns `true` when the record carries a usable identity key.
    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Coarse outreach bucket derived solely from the composite probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    A,
    B,
    C,
}

impl Tier {
    /// Classify a probability. Thresholds are inclusive at each tier's lower bound.
    #[must_use]
    pub fn classify(probability: u8, thresholds: &TierThresholds) -> Self {
        if probability >= thresholds.a {
            Tier::A
        } else if probability >= thresholds.b {
            Tier::B
        } else {
            Tier::C
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::A => write!(f, "A"),
            Tier::B => write!(f, "B"),
            Tier::C => write!(f, "C"),
        }
    }
}

/// The five bounded sub-scores behind a composite probability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScores {
    /// Role fit, `0..=30` under the default policy.
    pub role: u8,
    /// Company intent, `0..=20`.
    pub company: u8,
    /// Technographic fit, `0..=15`.
    pub tech: u8,
    /// Location hub, `0..=10`.
    pub location: u8,
    /// Scientific intent, `0..=40`.
    pub scientific: u8,
}

impl SubScores {
    /// Unclamped sum of all sub-scores.
    #[must_use]
    pub fn sum(&self) -> u16 {
        u16::from(self.role)
            + u16::from(self.company)
            + u16::from(self.tech)
            + u16::from(self.location)
            + u16::from(self.scientific)
    }
}

/// A [`RawLead`] enriched with scoring output. Produced once per raw lead and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredLead {
    pub lead: RawLead,
    pub scores: SubScores,
    /// `min(100, scores.sum())`.
    pub probability: u8,
    pub tier: Tier,
    /// Estimated employer location, distinct from `lead.location`.
    pub headquarters: String,
    pub action: String,
}

/// A [`ScoredLead`] with its 1-based position in the final ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedLead {
    pub rank: usize,
    pub scored: ScoredLead,
}

impl RankedLead {
    /// Project onto the fixed output schema. Sub-scores and tier are dropped.
    #[must_use]
    pub fn to_output_row(&self) -> OutputRow {
        let lead = &self.scored.lead;
        OutputRow {
            rank: self.rank,
            probability: self.scored.probability,
            name: lead.name.clone(),
            title: lead.title.clone(),
            company: lead.company.clone(),
            location: lead.location.clone(),
            headquarters: self.scored.headquarters.clone(),
            email: lead.email.clone(),
            linkedin: lead.linkedin.clone(),
            action: self.scored.action.clone(),
        }
    }
}

/// One row of the scored output table.
///
/// Field order is the column order; header names are what the dashboard
/// reads. On re-load, a missing or non-numeric `Probability` or `Rank`
/// becomes `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    #[serde(rename = "Rank", default, deserialize_with = "lenient_number")]
    pub rank: usize,
    #[serde(rename = "Probability", default, deserialize_with = "lenient_probability")]
    pub probability: u8,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Company", default)]
    pub company: String,
    #[serde(rename = "Location (Person)", default)]
    pub location: String,
    #[serde(rename = "HQ", default)]
    pub headquarters: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "LinkedIn", default)]
    pub linkedin: String,
    #[serde(rename = "Action", default)]
    pub action: String,
}

/// Column headers of the output table, in order.
pub const OUTPUT_COLUMNS: [&str; 10] = [
    "Rank",
    "Probability",
    "Name",
    "Title",
    "Company",
    "Location (Person)",
    "HQ",
    "Email",
    "LinkedIn",
    "Action",
];

/// Parse a numeric cell the way a spreadsheet would: surrounding whitespace
/// is ignored and `"85.0"` reads as 85. Anything else is `None`.
fn parse_numeric_cell(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn lenient_probability<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let value = raw.as_deref().and_then(parse_numeric_cell).unwrap_or(0.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let probability = value.round().clamp(0.0, 100.0) as u8;
    Ok(probability)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let value = raw.as_deref().and_then(parse_numeric_cell).unwrap_or(0.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let number = value.round().max(0.0) as usize;
    Ok(number)
}
