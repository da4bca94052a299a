//! Multi-factor lead scorer.
//!
//! Five independent sub-scores, each capped at its own maximum, are summed
//! and clamped to 100. All matching is case-insensitive substring search
//! against the tables of the [`ScoringPolicy`] the scorer was built with.

use leadrank_core::{RawLead, ScoringPolicy, SubScores, Tier};

/// Scoring output for one lead, before headquarters and rank are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub scores: SubScores,
    /// `min(100, scores.sum())`.
    pub probability: u8,
    pub tier: Tier,
}

#[derive(Debug, Clone)]
pub struct Scorer {
    /// Policy with every term table lower-cased.
    policy: ScoringPolicy,
}

impl Scorer {
    #[must_use]
    pub fn new(policy: ScoringPolicy) -> Self {
        let mut policy = policy;
        for table in [
            &mut policy.role.terms,
            &mut policy.company.allowlist,
            &mut policy.company.sector_terms,
            &mut policy.tech.terms,
            &mut policy.location.hubs,
            &mut policy.scientific.intent_terms,
        ] {
            for term in table.iter_mut() {
                *term = term.to_lowercase();
            }
        }
        Self { policy }
    }

    /// Scores one lead. The lead is expected to be normalized already.
    #[must_use]
    pub fn assess(&self, lead: &RawLead) -> Assessment {
        let scores = SubScores {
            role: self.role_score(&lead.title),
            company: self.company_score(&lead.company),
            tech: self.tech_score(&lead.recent_publication),
            location: self.location_score(&lead.location),
            scientific: self.scientific_score(&lead.pub_date, &lead.keywords),
        };
        let probability = cap(u32::from(scores.sum()), 100);
        let tier = Tier::classify(probability, &self.policy.tiers);
        Assessment {
            scores,
            probability,
            tier,
        }
    }

    /// Distinct role terms in the title, times points per hit, capped.
    #[must_use]
    pub fn role_score(&self, title: &str) -> u8 {
        let rule = &self.policy.role;
        let hits = count_hits(&title.to_lowercase(), &rule.terms);
        cap(hits.saturating_mul(u32::from(rule.points_per_hit)), rule.max)
    }

    /// Allowlist match, else sector keyword match, else the floor.
    #[must_use]
    pub fn company_score(&self, company: &str) -> u8 {
        let rule = &self.policy.company;
        let lower = company.to_lowercase();
        if contains_any(&lower, &rule.allowlist) {
            rule.allowlist_points
        } else if contains_any(&lower, &rule.sector_terms) {
            rule.sector_points
        } else {
            rule.default_points
        }
    }

    /// Distinct technology terms in the publication title on top of the base.
    ///
    /// The base always applies, so even an empty title scores the base.
    #[must_use]
    pub fn tech_score(&self, publication: &str) -> u8 {
        let rule = &self.policy.tech;
        let hits = count_hits(&publication.to_lowercase(), &rule.terms);
        let raw = hits
            .saturating_mul(u32::from(rule.points_per_hit))
            .saturating_add(u32::from(rule.base));
        cap(raw, rule.max)
    }

    #[must_use]
    pub fn location_score(&self, location: &str) -> u8 {
        let rule = &self.policy.location;
        if contains_any(&location.to_lowercase(), &rule.hubs) {
            rule.points
        } else {
            0
        }
    }

    /// Recency band of the publication year plus the intent-keyword bonus, capped.
    #[must_use]
    pub fn scientific_score(&self, pub_date: &str, keywords: &str) -> u8 {
        let rule = &self.policy.scientific;
        let recency = publication_year(pub_date)
            .and_then(|year| rule.recency.iter().find(|band| year >= band.min_year))
            .map_or(rule.fallback_points, |band| band.points);
        let intent = if contains_any(&keywords.to_lowercase(), &rule.intent_terms) {
            rule.intent_points
        } else {
            0
        };
        cap(u32::from(recency) + u32::from(intent), rule.max)
    }
}

/// Parses the year out of a `"YYYY-MM"` (or bare `"YYYY"`) date string.
///
/// Returns `None` for blank or unparseable input.
#[must_use]
pub fn publication_year(pub_date: &str) -> Option<i32> {
    pub_date.trim().split('-').next()?.trim().parse::<i32>().ok()
}

/// Number of distinct terms that occur in `haystack`. Terms must already be lower-case.
fn count_hits(haystack: &str, terms: &[String]) -> u32 {
    let hits = terms
        .iter()
        .filter(|term| haystack.contains(term.as_str()))
        .count();
    u32::try_from(hits).unwrap_or(u32::MAX)
}

fn contains_any(haystack: &str, terms: &[String]) -> bool {
    terms.iter().any(|term| haystack.contains(term.as_str()))
}

fn cap(value: u32, max: u8) -> u8 {
    u8::try_from(value.min(u32::from(max))).unwrap_or(max)
}

#[cfg(test)]
mod tests {
    use leadrank_core::{RecencyBand, TierThresholds};

    use super::*;

    fn scorer() -> Scorer {
        Scorer::new(ScoringPolicy::default())
    }

    fn lead() -> RawLead {
        RawLead {
            name: "Jane Doe".to_string(),
            company: "Unknown".to_string(),
            location: "Unknown".to_string(),
            ..RawLead::default()
        }
    }

    #[test]
    fn role_three_hits_is_thirty() {
        assert_eq!(scorer().role_score("Director of Preclinical Toxicology"), 30);
    }

    #[test]
    fn role_caps_at_thirty() {
        assert_eq!(
            scorer().role_score("VP, Director of Preclinical Safety and Hepatic Toxicology"),
            30
        );
    }

    #[test]
    fn role_counts_each_term_once() {
        assert_eq!(scorer().role_score("Safety safety SAFETY"), 10);
    }

    #[test]
    fn role_without_hits_is_zero() {
        assert_eq!(scorer().role_score("Researcher"), 0);
        assert_eq!(scorer().role_score(""), 0);
    }

    #[test]
    fn company_allowlist_is_twenty() {
        assert_eq!(scorer().company_score("Pfizer Inc"), 20);
        assert_eq!(scorer().company_score("GSK plc"), 20);
    }

    #[test]
    fn company_sector_keyword_is_fifteen() {
        assert_eq!(scorer().company_score("Acme Biosciences"), 15);
        assert_eq!(scorer().company_score("Small Pharma Ltd"), 15);
    }

    #[test]
    fn company_other_is_five() {
        assert_eq!(scorer().company_score("Stanford University"), 5);
        assert_eq!(scorer().company_score("Unknown"), 5);
        assert_eq!(scorer().company_score(""), 5);
    }

    #[test]
    fn tech_two_hits_caps_at_fifteen() {
        assert_eq!(scorer().tech_score("3D organoid model of hepatotoxicity"), 15);
    }

    #[test]
    fn tech_one_hit_is_ten() {
        assert_eq!(scorer().tech_score("Spheroid viability assays"), 10);
    }

    #[test]
    fn tech_base_always_applies() {
        assert_eq!(scorer().tech_score("Clinical outcomes in cirrhosis"), 5);
        assert_eq!(scorer().tech_score(""), 5);
    }

    #[test]
    fn location_hub_is_ten() {
        assert_eq!(scorer().location_score("Cambridge, MA"), 10);
        assert_eq!(scorer().location_score("BASEL, Switzerland"), 10);
        assert_eq!(scorer().location_score("San Diego, CA"), 0);
        assert_eq!(scorer().location_score("Unknown"), 0);
    }

    #[test]
    fn scientific_recency_bands() {
        assert_eq!(scorer().scientific_score("2024-03", ""), 30);
        assert_eq!(scorer().scientific_score("2025-11", ""), 30);
        assert_eq!(scorer().scientific_score("2023-01", ""), 20);
        assert_eq!(scorer().scientific_score("2019-07", ""), 10);
    }

    #[test]
    fn scientific_unparseable_date_falls_back() {
        assert_eq!(scorer().scientific_score("", ""), 10);
        assert_eq!(scorer().scientific_score("nan", ""), 10);
        assert_eq!(scorer().scientific_score("March 2024", ""), 10);
    }

    #[test]
    fn scientific_intent_bonus_and_cap() {
        assert_eq!(scorer().scientific_score("2024-03", "DILI"), 40);
        assert_eq!(scorer().scientific_score("2023-03", "drug-induced liver injury"), 30);
        assert_eq!(scorer().scientific_score("2010-01", "hepatotoxicity"), 10);
    }

    #[test]
    fn scientific_respects_policy_cap() {
        let mut policy = ScoringPolicy::default();
        policy.scientific.max = 35;
        assert_eq!(Scorer::new(policy).scientific_score("2024-01", "dili"), 35);
    }

    #[test]
    fn publication_year_parses_prefix() {
        assert_eq!(publication_year("2024-03"), Some(2024));
        assert_eq!(publication_year(" 2023 "), Some(2023));
        assert_eq!(publication_year("-03"), None);
        assert_eq!(publication_year(""), None);
    }

    #[test]
    fn assess_clamps_probability_to_hundred() {
        let assessment = scorer().assess(&RawLead {
            title: "VP Preclinical Safety".to_string(),
            company: "Novartis".to_string(),
            location: "Basel, Switzerland".to_string(),
            recent_publication: "3D organoid and spheroid in vitro models".to_string(),
            pub_date: "2024-06".to_string(),
            keywords: "DILI".to_string(),
            ..lead()
        });
        assert_eq!(assessment.scores.sum(), 115);
        assert_eq!(assessment.probability, 100);
        assert_eq!(assessment.tier, Tier::A);
    }

    #[test]
    fn assess_minimal_lead_is_tier_c() {
        let assessment = scorer().assess(&lead());
        // company 5 + tech base 5 + scientific fallback 10
        assert_eq!(assessment.probability, 20);
        assert_eq!(assessment.tier, Tier::C);
    }

    #[test]
    fn assess_tier_follows_probability() {
        let assessment = scorer().assess(&RawLead {
            title: "Director of Toxicology".to_string(),
            company: "Acme Bio".to_string(),
            pub_date: "2023-05".to_string(),
            ..lead()
        });
        // role 20 + company 15 + tech 5 + location 0 + scientific 20
        assert_eq!(assessment.probability, 60);
        assert_eq!(assessment.tier, Tier::B);
    }

    #[test]
    fn policy_terms_match_case_insensitively() {
        let mut policy = ScoringPolicy::default();
        policy.role.terms = vec!["Head of Safety".to_string()];
        assert_eq!(Scorer::new(policy).role_score("head of safety, EMEA"), 10);
    }

    #[test]
    fn substituted_policy_changes_scores_not_control_flow() {
        let mut policy = ScoringPolicy::default();
        policy.scientific.recency = vec![RecencyBand {
            min_year: 2020,
            points: 25,
        }];
        policy.tiers = TierThresholds { a: 50, b: 30 };
        let scorer = Scorer::new(policy);
        assert_eq!(scorer.scientific_score("2021-01", ""), 25);
        let assessment = scorer.assess(&RawLead {
            pub_date: "2021-01".to_string(),
            company: "Roche".to_string(),
            ..lead()
        });
        // company 20 + tech 5 + scientific 25
        assert_eq!(assessment.probability, 50);
        assert_eq!(assessment.tier, Tier::A);
    }

    #[test]
    fn probability_always_within_bounds() {
        let titles = ["", "vp", "Director of Preclinical Toxicology"];
        let companies = ["", "Pfizer", "Bio Co"];
        let pubs = ["", "3d organoid spheroid in vitro cell culture"];
        let dates = ["", "2024-01", "1999-12"];
        for title in titles {
            for company in companies {
                for pubn in pubs {
                    for date in dates {
                        let a = scorer().assess(&RawLead {
                            title: title.to_string(),
                            company: company.to_string(),
                            recent_publication: pubn.to_string(),
                            pub_date: date.to_string(),
                            keywords: "dili".to_string(),
                            location: "Boston".to_string(),
                            ..lead()
                        });
                        assert!(a.probability <= 100);
                        assert_eq!(
                            a.tier,
                            Tier::classify(a.probability, &TierThresholds::default())
                        );
                    }
                }
            }
        }
    }
}
