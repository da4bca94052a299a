//! `view` command handler: the terminal rendition of the lead dashboard.

use std::path::PathBuf;

use anyhow::Context;
use leadrank_core::{AppConfig, OutputRow};
use leadrank_engine::{LeadFilter, ViewMetrics};

/// Arguments of the `view` command, after clap parsing.
#[derive(Debug)]
pub(crate) struct ViewArgs {
    pub input: Option<PathBuf>,
    pub min_probability: u8,
    pub locations: Vec<String>,
    pub search: Option<String>,
    /// `Some(None)` exports to the configured default path.
    pub export: Option<Option<PathBuf>>,
    pub list_locations: bool,
}

/// List the ranked table through the requested filters.
///
/// # Errors
///
/// Returns an error if the ranked table is missing or unreadable, or if the
/// export cannot be written.
pub(crate) fn run_view(config: &AppConfig, args: &ViewArgs) -> anyhow::Result<()> {
    let input = args.input.as_deref().unwrap_or(config.scored_path.as_path());
    let rows = leadrank_engine::read_scored_rows(input)
        .with_context(|| format!("could not load {}; run `leadrank score` first", input.display()))?;

    if args.list_locations {
        for location in leadrank_engine::location_options(&rows) {
            println!("{location}");
        }
        return Ok(());
    }

    let filter = LeadFilter {
        min_probability: args.min_probability,
        locations: args.locations.clone(),
        search: args.search.clone(),
    };
    let view = filter.apply(&rows);
    let metrics = ViewMetrics::compute(&view, config.high_match_threshold);

    println!(
        "total leads: {}   high match (>= {}): {}   avg probability: {}",
        metrics.total,
        config.high_match_threshold,
        metrics.high_match,
        metrics.mean_display()
    );
    println!();

    if view.is_empty() {
        println!("no leads match the current filters");
    } else {
        print_table(&view);
    }

    if let Some(target) = &args.export {
        let path = target.as_deref().unwrap_or(config.export_path.as_path());
        leadrank_engine::export_view(path, &view)
            .with_context(|| format!("failed to export view to {}", path.display()))?;
        println!();
        println!("exported {} leads to {}", view.len(), path.display());
    }

    Ok(())
}

fn print_table(rows: &[&OutputRow]) {
    println!(
        "{:<6}{:<7}{:<26}{:<32}{:<28}{:<24}EMAIL",
        "RANK", "PROB", "NAME", "TITLE", "COMPANY", "LOCATION"
    );
    for row in rows {
        let probability = format!("{}%", row.probability);
        println!(
            "{:<6}{:<7}{:<26}{:<32}{:<28}{:<24}{}",
            row.rank,
            probability,
            clip(&row.name, 25),
            clip(&row.title, 31),
            clip(&row.company, 27),
            clip(&row.location, 23),
            row.email
        );
    }
}

/// Shortens `text` to at most `width` characters, marking the cut with `…`.
fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}
