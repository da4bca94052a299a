//! Consumer-side operations over the ranked output table: filtering,
//! location options, summary metrics, and export of the filtered view.

use std::collections::BTreeSet;
use std::path::Path;

use leadrank_core::OutputRow;

use crate::error::EngineError;
use crate::table::write_scored_rows;

/// Filters applied to the ranked table. The default filter keeps every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    /// Keep rows with `probability >= min_probability`.
    pub min_probability: u8,
    /// Keep rows whose person location is one of these; empty keeps all.
    pub locations: Vec<String>,
    /// Case-insensitive literal substring matched against company or title.
    pub search: Option<String>,
}

impl LeadFilter {
    #[must_use]
    pub fn matches(&self, row: &OutputRow) -> bool {
        if row.probability < self.min_probability {
            return false;
        }

        if !self.locations.is_empty() && !self.locations.iter().any(|l| *l == row.location) {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => {
                let query = query.to_lowercase();
                row.company.to_lowercase().contains(&query)
                    || row.title.to_lowercase().contains(&query)
            }
            _ => true,
        }
    }

    /// Rows that pass the filter, in table order.
    #[must_use]
    pub fn apply<'a>(&self, rows: &'a [OutputRow]) -> Vec<&'a OutputRow> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

/// Distinct, non-empty person locations in sorted order.
#[must_use]
pub fn location_options(rows: &[OutputRow]) -> Vec<String> {
    rows.iter()
        .map(|row| row.location.trim())
        .filter(|loc| !loc.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Headline numbers for a (filtered) view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMetrics {
    pub total: usize,
    /// Rows at or above the high-match threshold.
    pub high_match: usize,
    /// `None` for an empty view.
    pub mean_probability: Option<f64>,
}

impl ViewMetrics {
    #[must_use]
    pub fn compute(rows: &[&OutputRow], high_match_threshold: u8) -> Self {
        let total = rows.len();
        let high_match = rows
            .iter()
            .filter(|row| row.probability >= high_match_threshold)
            .count();
        let mean_probability = if rows.is_empty() {
            None
        } else {
            let sum: f64 = rows.iter().map(|row| f64::from(row.probability)).sum();
            #[allow(clippy::cast_precision_loss)]
            let denom = total as f64;
            Some(sum / denom)
        };
        Self {
            total,
            high_match,
            mean_probability,
        }
    }

    /// Mean probability as shown on the dashboard: one decimal place, or
    /// `"0%"` for an empty view.
    #[must_use]
    pub fn mean_display(&self) -> String {
        match self.mean_probability {
            Some(mean) => format!("{mean:.1}%"),
            None => "0%".to_string(),
        }
    }
}

/// Writes the filtered view to `path` in the output schema.
///
/// # Errors
///
/// Returns [`EngineError`] if the file cannot be written.
pub fn export_view(path: &Path, rows: &[&OutputRow]) -> Result<(), EngineError> {
    write_scored_rows(path, rows.iter().copied())?;
    tracing::info!(path = %path.display(), rows = rows.len(), "exported filtered view");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, probability: u8, company: &str, title: &str, location: &str) -> OutputRow {
        OutputRow {
            name: name.to_string(),
            probability,
            company: company.to_string(),
            title: title.to_string(),
            location: location.to_string(),
            ..OutputRow::default()
        }
    }

    fn table() -> Vec<OutputRow> {
        vec![
            row("a", 95, "Pfizer", "VP Safety", "Boston, MA"),
            row("b", 80, "Acme Bio", "Researcher", "Basel, Switzerland"),
            row("c", 65, "Stanford University", "Director", "Palo Alto, CA"),
            row("d", 20, "Unknown", "Researcher", "Unknown"),
        ]
    }

    fn names(rows: &[&OutputRow]) -> Vec<String> {
        rows.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn default_filter_keeps_everything() {
        let rows = table();
        assert_eq!(LeadFilter::default().apply(&rows).len(), 4);
    }

    #[test]
    fn threshold_is_inclusive() {
        let rows = table();
        let filter = LeadFilter {
            min_probability: 80,
            ..LeadFilter::default()
        };
        assert_eq!(names(&filter.apply(&rows)), vec!["a", "b"]);
    }

    #[test]
    fn location_multi_select() {
        let rows = table();
        let filter = LeadFilter {
            locations: vec!["Unknown".to_string(), "Boston, MA".to_string()],
            ..LeadFilter::default()
        };
        assert_eq!(names(&filter.apply(&rows)), vec!["a", "d"]);
    }

    #[test]
    fn search_matches_company_or_title_case_insensitively() {
        let rows = table();
        let by_company = LeadFilter {
            search: Some("PFIZER".to_string()),
            ..LeadFilter::default()
        };
        assert_eq!(names(&by_company.apply(&rows)), vec!["a"]);

        let by_title = LeadFilter {
            search: Some("director".to_string()),
            ..LeadFilter::default()
        };
        assert_eq!(names(&by_title.apply(&rows)), vec!["c"]);
    }

    #[test]
    fn blank_search_is_ignored() {
        let rows = table();
        let filter = LeadFilter {
            search: Some("  ".to_string()),
            ..LeadFilter::default()
        };
        assert_eq!(filter.apply(&rows).len(), 4);
    }

    #[test]
    fn filters_combine() {
        let rows = table();
        let filter = LeadFilter {
            min_probability: 50,
            locations: vec!["Basel, Switzerland".to_string(), "Palo Alto, CA".to_string()],
            search: Some("bio".to_string()),
        };
        assert_eq!(names(&filter.apply(&rows)), vec!["b"]);
    }

    #[test]
    fn location_options_are_sorted_and_distinct() {
        let mut rows = table();
        rows.push(row("e", 10, "", "", "Boston, MA"));
        rows.push(row("f", 10, "", "", ""));
        assert_eq!(
            location_options(&rows),
            vec![
                "Basel, Switzerland",
                "Boston, MA",
                "Palo Alto, CA",
                "Unknown"
            ]
        );
    }

    #[test]
    fn metrics_over_view() {
        let rows = table();
        let view: Vec<&OutputRow> = rows.iter().collect();
        let metrics = ViewMetrics::compute(&view, 80);
        assert_eq!(metrics.total, 4);
        assert_eq!(metrics.high_match, 2);
        assert_eq!(metrics.mean_display(), "65.0%");
    }

    #[test]
    fn metrics_of_empty_view() {
        let metrics = ViewMetrics::compute(&[], 80);
        assert_eq!(metrics.total, 0);
        assert_eq!(metrics.high_match, 0);
        assert!(metrics.mean_probability.is_none());
        assert_eq!(metrics.mean_display(), "0%");
    }
}
