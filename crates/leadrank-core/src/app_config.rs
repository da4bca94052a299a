use std::path::PathBuf;

/// Process-level settings for a leadrank run, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Raw lead table produced by the record source.
    pub raw_path: PathBuf,
    /// Ranked, schema-fixed output table.
    pub scored_path: PathBuf,
    /// Default destination for exporting a filtered view.
    pub export_path: PathBuf,
    /// Scoring policy file. `None` means the built-in default policy.
    pub policy_path: Option<PathBuf>,
    pub log_level: String,
    /// Probability at or above which the view counts a lead as a high match.
    pub high_match_threshold: u8,
}
