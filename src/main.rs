//! Straitwatch CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use straitwatch::cli::{commands, Cli, Commands, ScenarioCommands};
use straitwatch::infrastructure::config::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli
        .config
        .as_ref()
        .map_or_else(ConfigLoader::load, ConfigLoader::load_from_file)
    {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err:#}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging.level, &config.logging.format);

    let result: Result<()> = match cli.command {
        Commands::Init => commands::init(&config).await,
        Commands::Triggers => commands::triggers(&config).await,
        Commands::Threat => commands::threat(&config).await,
        Commands::Scenario { command } => match command {
            ScenarioCommands::Run => commands::scenario_run(&config).await,
            ScenarioCommands::Report => commands::scenario_report(&config).await,
        },
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
