//! Scoring policy command handlers.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use leadrank_core::AppConfig;

/// Sub-commands available under `policy`.
#[derive(Debug, Subcommand)]
pub enum PolicyCommands {
    /// Print the effective scoring policy as YAML
    Show {
        /// Policy file to show instead of the configured one
        #[arg(long)]
        policy: Option<PathBuf>,
    },
    /// Validate a policy file without scoring anything
    Check {
        /// Policy YAML to validate
        path: PathBuf,
    },
}

/// Print the policy a `score` run would use.
///
/// # Errors
///
/// Returns an error if the selected policy file is unreadable or invalid.
pub(crate) fn run_policy_show(config: &AppConfig, path: Option<&Path>) -> anyhow::Result<()> {
    let policy = leadrank_core::resolve_policy(config, path).context("failed to load policy")?;
    match path.or(config.policy_path.as_deref()) {
        Some(p) => println!("# policy: {}", p.display()),
        None => println!("# policy: built-in default"),
    }
    print!("{}", policy.to_yaml()?);
    Ok(())
}

/// Load and validate a policy file, reporting the result.
///
/// # Errors
///
/// Returns an error describing the first problem in the file.
pub(crate) fn run_policy_check(path: &Path) -> anyhow::Result<()> {
    let policy = leadrank_core::load_policy(path)
        .with_context(|| format!("policy {} is invalid", path.display()))?;
    println!(
        "policy {} is valid (tier A >= {}, tier B >= {})",
        path.display(),
        policy.tiers.a,
        policy.tiers.b
    );
    Ok(())
}
