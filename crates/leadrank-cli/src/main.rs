mod policy;
mod score;
mod view;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::policy::PolicyCommands;

#[derive(Debug, Parser)]
#[command(name = "leadrank")]
#[command(about = "Score, rank, and review sales leads")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score and rank the raw lead table
    Score {
        /// Raw lead table (defaults to `LEADRANK_RAW_PATH`)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Ranked output table (defaults to `LEADRANK_SCORED_PATH`)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Scoring policy YAML (defaults to `LEADRANK_POLICY_PATH`, then built-in)
        #[arg(long)]
        policy: Option<PathBuf>,
        /// Print the batch summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// List ranked leads with filters and summary metrics
    View {
        /// Ranked lead table (defaults to `LEADRANK_SCORED_PATH`)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Only show leads at or above this probability
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
        min_probability: u8,
        /// Only show leads in this location (repeatable)
        #[arg(long = "location")]
        locations: Vec<String>,
        /// Case-insensitive text to find in company or title
        #[arg(long)]
        search: Option<String>,
        /// Write the filtered view to CSV (defaults to `LEADRANK_EXPORT_PATH`)
        #[arg(long, num_args = 0..=1)]
        export: Option<Option<PathBuf>>,
        /// Print the distinct locations available for filtering and exit
        #[arg(long)]
        list_locations: bool,
    },
    /// Inspect or validate scoring policies
    Policy {
        #[command(subcommand)]
        command: PolicyCommands,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = leadrank_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Some(Commands::Score {
            input,
            output,
            policy,
            json,
        }) => score::run_score(
            &config,
            input.as_deref(),
            output.as_deref(),
            policy.as_deref(),
            json,
        )?,
        Some(Commands::View {
            input,
            min_probability,
            locations,
            search,
            export,
            list_locations,
        }) => view::run_view(
            &config,
            &view::ViewArgs {
                input,
                min_probability,
                locations,
                search,
                export,
                list_locations,
            },
        )?,
        Some(Commands::Policy { command }) => match command {
            PolicyCommands::Show { policy: path } => {
                policy::run_policy_show(&config, path.as_deref())?;
            }
            PolicyCommands::Check { path } => policy::run_policy_check(&path)?,
        },
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
