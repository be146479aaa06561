use std::path::{Path, PathBuf};

mod pipeline;
mod rank;
mod render;

use anyhow::Context;
use automatch_types::{MatchConfig, constants};
use clap::ArgAction;
use pipeline::Pipeline;
use rank::Rank;
use serde::de::DeserializeOwned;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            "Starting"
        );
        self.command.run()
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Rank capital sources for a deal
    Rank(Rank),

    /// Rank deals for one CDE's or investor's pipeline
    Pipeline(Pipeline),
}

impl Command {
    fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Rank(command) => command.run(),
            Self::Pipeline(command) => command.run(),
        }
    }
}

/// Options shared by both ranking directions.
#[derive(Debug, clap::Args)]
pub struct Common {
    /// Match config (JSON); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full run as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Common {
    fn load_config(&self) -> anyhow::Result<MatchConfig> {
        match &self.config {
            Some(path) => MatchConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display())),
            None => Ok(MatchConfig::default()),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} from {}", path.display()))?;
    parse_json(&raw, what)
}

fn parse_json<T: DeserializeOwned>(raw: &str, what: &str) -> anyhow::Result<T> {
    serde_json::from_str(raw).with_context(|| format!("malformed {what}"))
}
