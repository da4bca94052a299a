//! Scoring policy: the keyword, allowlist, and hub tables that drive the
//! normalizer and scorer, plus tier thresholds.
//!
//! Tables are plain data. The engine receives a validated [`ScoringPolicy`]
//! at construction and never consults global constants, so policy changes
//! are a YAML edit rather than a code change. Every section (and every field
//! within a section) may be omitted from a policy file; omitted parts fall
//! back to the built-in defaults.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub role: RoleRule,
    pub company: CompanyRule,
    pub tech: TechRule,
    pub location: LocationRule,
    pub scientific: ScientificRule,
    pub tiers: TierThresholds,
    pub normalizer: NormalizerTables,
}

/// Role fit: distinct term hits in the lead's title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleRule {
    pub terms: Vec<String>,
    pub points_per_hit: u8,
    pub max: u8,
}

impl Default for RoleRule {
    fn default() -> Self {
        Self {
            terms: strings(&[
                "toxicology",
                "safety",
                "hepatic",
                "preclinical",
                "director",
                "vp",
            ]),
            points_per_hit: 10,
            max: 30,
        }
    }
}

/// Company intent: allowlist membership, then sector keywords, then a floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyRule {
    pub allowlist: Vec<String>,
    pub allowlist_points: u8,
    pub sector_terms: Vec<String>,
    pub sector_points: u8,
    pub default_points: u8,
}

impl Default for CompanyRule {
    fn default() -> Self {
        Self {
            allowlist: strings(&[
                "pfizer",
                "novartis",
                "roche",
                "merck",
                "gsk",
                "astrazeneca",
            ]),
            allowlist_points: 20,
            sector_terms: strings(&["bio", "pharma"]),
            sector_points: 15,
            default_points: 5,
        }
    }
}

/// Technographic fit: distinct term hits in the recent publication title,
/// on top of a base that always applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechRule {
    pub terms: Vec<String>,
    pub points_per_hit: u8,
    pub base: u8,
    pub max: u8,
}

impl Default for TechRule {
    fn default() -> Self {
        Self {
            terms: strings(&["3d", "in vitro", "organoid", "spheroid", "cell culture"]),
            points_per_hit: 5,
            base: 5,
            max: 15,
        }
    }
}

/// Location hub: flat points when the person's location names a tier-1 hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationRule {
    pub hubs: Vec<String>,
    pub points: u8,
}

impl Default for LocationRule {
    fn default() -> Self {
        Self {
            hubs: strings(&["cambridge", "boston", "san francisco", "basel"]),
            points: 10,
        }
    }
}

/// Scientific intent: publication recency plus a keyword bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScientificRule {
    /// Checked in order; the first band whose `min_year` the publication
    /// year reaches wins. Must be strictly descending by `min_year`.
    pub recency: Vec<RecencyBand>,
    /// Points for an older, blank, or unparseable publication date.
    pub fallback_points: u8,
    pub intent_terms: Vec<String>,
    pub intent_points: u8,
    pub max: u8,
}

impl Default for ScientificRule {
    fn default() -> Self {
        Self {
            recency: vec![
                RecencyBand {
                    min_year: 2024,
                    points: 30,
                },
                RecencyBand {
                    min_year: 2023,
                    points: 20,
                },
            ],
            fallback_points: 10,
            intent_terms: strings(&["dili", "liver injury"]),
            intent_points: 10,
            max: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecencyBand {
    pub min_year: i32,
    pub points: u8,
}

/// Lower bounds (inclusive) of tiers A and B; everything below `b` is C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub a: u8,
    pub b: u8,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self { a: 80, b: 60 }
    }
}

/// A substring to look for in affiliation text and the canonical
/// `"City, Region"` it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubAlias {
    pub needle: String,
    pub canonical: String,
}

/// Tables used by the normalizer to derive company, location, and
/// headquarters from free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerTables {
    /// Affiliation segments equal to one of these are never a company.
    pub region_codes: Vec<String>,
    /// Affiliation segments this many characters long or shorter are dropped.
    pub min_segment_chars: usize,
    /// Case-sensitive, first match in table order wins.
    pub affiliation_hubs: Vec<HubAlias>,
    /// Case-insensitive hubs used to name a headquarters.
    pub headquarters_hubs: Vec<String>,
    /// Case-insensitive markers of a remote, US-based worker.
    pub remote_markers: Vec<String>,
    pub headquarters_fallback: String,
}

impl Default for NormalizerTables {
    fn default() -> Self {
        let hub = |needle: &str, canonical: &str| HubAlias {
            needle: needle.to_string(),
            canonical: canonical.to_string(),
        };
        Self {
            region_codes: strings(&["USA", "US", "UK", "EU"]),
            min_segment_chars: 2,
            affiliation_hubs: vec![
                hub("Cambridge", "Cambridge, MA"),
                hub("Boston", "Boston, MA"),
                hub("San Francisco", "San Francisco, CA"),
                hub("San Diego", "San Diego, CA"),
                hub("Basel", "Basel, Switzerland"),
                hub("Oxford", "Oxford, UK"),
            ],
            headquarters_hubs: strings(&[
                "Boston",
                "Cambridge",
                "San Francisco",
                "Basel",
                "San Diego",
                "Oxford",
                "London",
            ]),
            remote_markers: strings(&["remote", "usa"]),
            headquarters_fallback: "Boston, MA (Likely HQ)".to_string(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl ScoringPolicy {
    /// Check the policy for tables that would make a rule degenerate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_terms("role.terms", &self.role.terms)?;
        check_terms("company.allowlist", &self.company.allowlist)?;
        check_terms("company.sector_terms", &self.company.sector_terms)?;
        check_terms("tech.terms", &self.tech.terms)?;
        check_terms("location.hubs", &self.location.hubs)?;
        check_terms("scientific.intent_terms", &self.scientific.intent_terms)?;
        check_terms(
            "normalizer.headquarters_hubs",
            &self.normalizer.headquarters_hubs,
        )?;
        check_terms("normalizer.remote_markers", &self.normalizer.remote_markers)?;

        if self.role.points_per_hit == 0 || self.role.max == 0 {
            return Err(ConfigError::Validation(
                "role.points_per_hit and role.max must be positive".to_string(),
            ));
        }

        if self.tech.points_per_hit == 0 || self.tech.max < self.tech.base {
            return Err(ConfigError::Validation(format!(
                "tech rule is degenerate: points_per_hit {}, base {}, max {}",
                self.tech.points_per_hit, self.tech.base, self.tech.max
            )));
        }

        if self.company.allowlist_points == 0 {
            return Err(ConfigError::Validation(
                "company.allowlist_points must be positive".to_string(),
            ));
        }

        if self.location.points == 0 {
            return Err(ConfigError::Validation(
                "location.points must be positive".to_string(),
            ));
        }

        if self.scientific.max == 0 {
            return Err(ConfigError::Validation(
                "scientific.max must be positive".to_string(),
            ));
        }

        for pair in self.scientific.recency.windows(2) {
            if pair[0].min_year <= pair[1].min_year {
                return Err(ConfigError::Validation(format!(
                    "scientific.recency must be strictly descending by min_year; {} is followed by {}",
                    pair[0].min_year, pair[1].min_year
                )));
            }
        }

        if self.tiers.a > 100 || self.tiers.b > self.tiers.a {
            return Err(ConfigError::Validation(format!(
                "tier thresholds must satisfy b <= a <= 100; got a = {}, b = {}",
                self.tiers.a, self.tiers.b
            )));
        }

        let mut seen_needles = HashSet::new();
        for alias in &self.normalizer.affiliation_hubs {
            if alias.needle.trim().is_empty() || alias.canonical.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "normalizer.affiliation_hubs entries need a needle and a canonical form"
                        .to_string(),
                ));
            }
            if !seen_needles.insert(alias.needle.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate affiliation hub: '{}'",
                    alias.needle
                )));
            }
        }

        if self.normalizer.headquarters_fallback.trim().is_empty() {
            return Err(ConfigError::Validation(
                "normalizer.headquarters_fallback must be non-empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Render the policy as YAML, in the same shape [`load_policy`] reads.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::PolicyFileParse`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::PolicyFileParse)
    }
}

/// A blank term would match every input, so term lists must be non-empty
/// and contain no blank entries.
fn check_terms(field: &str, terms: &[String]) -> Result<(), ConfigError> {
    if terms.is_empty() {
        return Err(ConfigError::Validation(format!("{field} must be non-empty")));
    }
    if terms.iter().any(|t| t.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "{field} contains a blank entry"
        )));
    }
    Ok(())
}

/// Load and validate a scoring policy from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_policy(path: &Path) -> Result<ScoringPolicy, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PolicyFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let policy: ScoringPolicy =
        serde_yaml::from_str(&content).map_err(ConfigError::PolicyFileParse)?;

    policy.validate()?;

    Ok(policy)
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod tests;
