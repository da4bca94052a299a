//! Derives structured fields from noisy affiliation and location text.
//!
//! Every function here is total: on insufficient input it returns a sentinel
//! (`"Unknown"` or an empty string) instead of failing. The heuristics are
//! deterministic, not accurate; the affiliation convention they model is
//! `"Person, Institution, City, Country"`.

use leadrank_core::{NormalizerTables, RawLead, UNKNOWN};

/// Harvested author names shorter than this are treated as initials-only
/// noise and not turned into leads.
const MIN_HARVESTED_NAME_CHARS: usize = 5;

/// Title assigned to harvested authors, whose role is not in the source record.
const HARVESTED_TITLE: &str = "Researcher";

/// Normalizer bound to one set of [`NormalizerTables`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    tables: NormalizerTables,
    /// `(display, lowercase)` pairs; display form names the headquarters.
    headquarters_hubs: Vec<(String, String)>,
    remote_markers: Vec<String>,
}

impl Normalizer {
    #[must_use]
    pub fn new(tables: NormalizerTables) -> Self {
        let headquarters_hubs = tables
            .headquarters_hubs
            .iter()
            .map(|hub| (hub.clone(), hub.to_lowercase()))
            .collect();
        let remote_markers = tables
            .remote_markers
            .iter()
            .map(|m| m.to_lowercase())
            .collect();
        Self {
            tables,
            headquarters_hubs,
            remote_markers,
        }
    }

    /// Extracts the institution from an affiliation string.
    ///
    /// Splits on commas and drops short segments and bare region codes. The
    /// institution is usually the second remaining segment; a lone segment
    /// is returned as-is. Returns `"Unknown"` when nothing survives.
    #[must_use]
    pub fn extract_company(&self, affiliation: &str) -> String {
        let segments: Vec<&str> = affiliation
            .split(',')
            .map(str::trim)
            .filter(|seg| {
                seg.chars().count() > self.tables.min_segment_chars
                    && !self.tables.region_codes.iter().any(|code| code == seg)
            })
            .collect();

        match segments.as_slice() {
            [_, second, ..] => (*second).to_string(),
            [only] => (*only).to_string(),
            [] => UNKNOWN.to_string(),
        }
    }

    /// Extracts a `"City, Region"` location from an affiliation string.
    ///
    /// A known hub (case-sensitive, first table entry wins) maps to its
    /// canonical form. Otherwise the last two comma segments are joined.
    #[must_use]
    pub fn extract_location(&self, affiliation: &str) -> String {
        if affiliation.trim().is_empty() {
            return UNKNOWN.to_string();
        }

        if let Some(alias) = self
            .tables
            .affiliation_hubs
            .iter()
            .find(|alias| affiliation.contains(alias.needle.as_str()))
        {
            return alias.canonical.clone();
        }

        let parts: Vec<&str> = affiliation.split(',').collect();
        match parts.as_slice() {
            [.., region, country] => format!("{}, {}", region.trim(), country.trim()),
            _ => UNKNOWN.to_string(),
        }
    }

    /// Estimates the employer's headquarters from the person's location.
    ///
    /// A hub named anywhere in the location (case-insensitive) becomes
    /// `"<Hub>, HQ"`. A remote or US-only location defaults to the fallback
    /// hub. Anything else is returned unchanged.
    #[must_use]
    pub fn extract_headquarters(&self, person_location: &str) -> String {
        let lower = person_location.to_lowercase();

        if let Some((display, _)) = self
            .headquarters_hubs
            .iter()
            .find(|(_, needle)| lower.contains(needle.as_str()))
        {
            return format!("{display}, HQ");
        }

        if self.remote_markers.iter().any(|m| lower.contains(m.as_str())) {
            return self.tables.headquarters_fallback.clone();
        }

        person_location.to_string()
    }

    /// Trims every field except `name` and fills blanks with their
    /// documented defaults. `name` is the identity key and is kept verbatim.
    ///
    /// | field | blank becomes |
    /// |---|---|
    /// | `company` | extracted from `affiliation`, else `"Unknown"` |
    /// | `location` | extracted from `affiliation`, else `"Unknown"` |
    /// | `email` | [`guess_email`] of name and company (may be `""`) |
    ///
    /// All other fields stay as trimmed strings, possibly empty.
    #[must_use]
    pub fn normalize_lead(&self, raw: RawLead) -> RawLead {
        let mut lead = trimmed(raw);
        let has_affiliation = !lead.affiliation.is_empty();

        if lead.company.is_empty() {
            lead.company = if has_affiliation {
                self.extract_company(&lead.affiliation)
            } else {
                UNKNOWN.to_string()
            };
        }

        if lead.location.is_empty() {
            lead.location = if has_affiliation {
                self.extract_location(&lead.affiliation)
            } else {
                UNKNOWN.to_string()
            };
        }

        if lead.email.is_empty() {
            lead.email = guess_email(&lead.name, &lead.company);
        }

        lead
    }

    /// Builds a lead from a harvested author and their affiliation text.
    ///
    /// Returns `None` for names too short to identify a person. Publication
    /// fields are left empty for the caller to fill.
    #[must_use]
    pub fn lead_from_affiliation(&self, name: &str, affiliation: &str) -> Option<RawLead> {
        let name = name.trim();
        if name.chars().count() < MIN_HARVESTED_NAME_CHARS {
            return None;
        }

        let affiliation = affiliation.trim();
        let company = self.extract_company(affiliation);
        let location = self.extract_location(affiliation);
        let email = guess_email(name, &company);

        Some(RawLead {
            name: name.to_string(),
            title: HARVESTED_TITLE.to_string(),
            company,
            location,
            email,
            linkedin: linkedin_handle(name),
            affiliation: affiliation.to_string(),
            ..RawLead::default()
        })
    }
}

/// Guesses a `first.last@domain` address from a name and company.
///
/// Returns `""` when the name has fewer than two tokens or the company is
/// blank or `"Unknown"`. The domain is the lower-cased company with spaces
/// removed, `university` → `edu`, `institute` → `org`, and `.com` appended
/// when no period is present. Deliverability is not checked.
#[must_use]
pub fn guess_email(name: &str, company: &str) -> String {
    let company = company.trim();
    if company.is_empty() || company == UNKNOWN {
        return String::new();
    }

    let lower_name = name.to_lowercase();
    let tokens: Vec<&str> = lower_name.split_whitespace().collect();
    let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
        return String::new();
    };
    if tokens.len() < 2 {
        return String::new();
    }

    let mut domain = company
        .to_lowercase()
        .replace(' ', "")
        .replace("university", "edu")
        .replace("institute", "org");
    if !domain.contains('.') {
        domain.push_str(".com");
    }

    format!("{first}.{last}@{domain}")
}

/// Builds the conventional profile handle `linkedin.com/in/<name>` with the
/// name lower-cased and whitespace removed. Blank names yield `""`.
#[must_use]
pub fn linkedin_handle(name: &str) -> String {
    let handle: String = name
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if handle.is_empty() {
        return String::new();
    }
    format!("linkedin.com/in/{handle}")
}

fn trimmed(raw: RawLead) -> RawLead {
    let t = |s: String| s.trim().to_string();
    RawLead {
        name: raw.name,
        title: t(raw.title),
        company: t(raw.company),
        location: t(raw.location),
        email: t(raw.email),
        linkedin: t(raw.linkedin),
        recent_publication: t(raw.recent_publication),
        pub_date: t(raw.pub_date),
        keywords: t(raw.keywords),
        journal: t(raw.journal),
        source_id: t(raw.source_id),
        affiliation: t(raw.affiliation),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
