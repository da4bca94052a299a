pub mod app_config;
pub mod config;
pub mod lead;
pub mod policy;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, resolve_policy};
pub use lead::{
    OutputRow, RankedLead, RawLead, ScoredLead, SubScores, Tier, OUTPUT_COLUMNS, OUTREACH_ACTION,
    UNKNOWN,
};
pub use policy::{
    load_policy, CompanyRule, HubAlias, LocationRule, NormalizerTables, RecencyBand, RoleRule,
    ScientificRule, ScoringPolicy, TechRule, TierThresholds,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read policy file {path}: {source}")]
    PolicyFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse policy file: {0}")]
    PolicyFileParse(#[from] serde_yaml::Error),

    #[error("policy validation failed: {0}")]
    Validation(String),
}
