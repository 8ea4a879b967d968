mod cmd;
mod locate;
mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use leave_verify_core::config::HarnessConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "leave-verify",
    about = "End-to-end verification of a leave-management backend",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: nearest leave-verify.yaml, else built-in scenario)
    #[arg(long, global = true, env = "LEAVE_VERIFY_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:8081/api
    #[arg(long, global = true, env = "LEAVE_VERIFY_BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds (0 = no bound)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log each step to stderr
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full scenario and the business-rule edge cases
    Run {
        /// Suffix each reason with a per-run nonce so reruns never collide
        #[arg(long)]
        tag_reasons: bool,
    },

    /// List pending requests as the reviewer (read-only)
    Pending,

    /// Inspect the resolved configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = load_config(&cli).and_then(|config| match cli.command {
        Commands::Run { tag_reasons } => {
            let mut config = config;
            config.tag_reasons |= tag_reasons;
            cmd::run::run(&config, cli.json)
        }
        Commands::Pending => cmd::pending::run(&config, cli.json).map(|()| 0),
        Commands::Config { subcommand } => {
            cmd::config::run(&config, subcommand, cli.json).map(|()| 0)
        }
    });

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<HarnessConfig> {
    let mut config = match locate::resolve_config_path(cli.config.as_deref()) {
        Some(path) => HarnessConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => HarnessConfig::default(),
    };
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout_secs = secs;
    }
    Ok(config)
}
