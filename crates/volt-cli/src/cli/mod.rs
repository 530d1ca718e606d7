//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use volt_core::{config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "volt")]
#[command(version)]
#[command(about = "Circuit design assistant for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the model from config
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Send one prompt and stream the reply to stdout
    Exec {
        /// The prompt to send
        #[arg(short, long)]
        prompt: String,

        /// Print the final reply as rendered HTML instead of streaming text
        #[arg(long)]
        html: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init(&config::paths::logs_dir(), cli.verbose)
        .context("initialize logging")?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "volt starting");

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        command,
        model,
        verbose: _,
    } = cli;

    let load = || -> Result<config::Config> {
        let mut config = config::Config::load().context("load config")?;
        if let Some(model) = model.as_deref() {
            config.model = model.trim().to_string();
        }
        Ok(config)
    };

    match command {
        None | Some(Commands::Chat) => commands::chat::run(&load()?).await,
        Some(Commands::Exec { prompt, html }) => {
            let output = if html {
                commands::exec::Output::Html
            } else {
                commands::exec::Output::Text
            };
            commands::exec::run(&load()?, &prompt, output).await
        }
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
