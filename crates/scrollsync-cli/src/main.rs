use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scrollsync_core::behaviour::register_builtins;
use scrollsync_core::{BehaviourRegistry, EngineConfig};

mod commands;

#[derive(Parser)]
#[command(name = "scrollsync")]
#[command(author, version, about = "Scroll-synchronized behaviour runtime")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of ~/.config/scrollsync/config.toml
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the terminal preview
    Preview,
    /// Scroll a simulated page through the frame loop without a terminal
    Simulate {
        /// Number of page sections
        #[arg(short = 's', long, default_value_t = 4)]
        sections: usize,
        /// Behaviour ids applied to each section, cycled (default: fade-in)
        #[arg(short = 'b', long = "behaviour")]
        behaviours: Vec<String>,
        /// Length of the scripted scroll
        #[arg(short = 'd', long, default_value_t = 1000)]
        duration_ms: u64,
        /// Override the configured frame rate
        #[arg(long)]
        fps: Option<u32>,
        /// Also fling a carousel with this wheel delta
        #[arg(short = 'w', long, allow_negative_numbers = true)]
        wheel: Option<f64>,
    },
    /// List registered behaviours by category
    Behaviours {
        /// Show each behaviour's static style template
        #[arg(long)]
        templates: bool,
    },
    /// Print the dependency-first resolution of behaviour ids
    Resolve {
        /// Behaviour ids, in declaration order
        #[arg(required = true)]
        ids: Vec<String>,
        /// Fail on unknown ids instead of skipping them
        #[arg(long)]
        strict: bool,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
    /// Write the default configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::load()?,
    };

    // The preview owns the terminal, so its logs go to a file
    let is_preview = matches!(cli.command, Some(Commands::Preview) | None);
    init_logging(&config, is_preview)?;

    let mut registry = BehaviourRegistry::new();
    register_builtins(&mut registry);

    // Handle commands
    match cli.command {
        Some(Commands::Preview) | None => commands::preview::run(config, &registry).await,
        Some(Commands::Simulate {
            sections,
            behaviours,
            duration_ms,
            fps,
            wheel,
        }) => {
            let options = commands::simulate::SimulateOptions {
                sections,
                behaviours,
                duration_ms,
                fps,
                wheel,
            };
            commands::simulate::run(&config, &registry, options).await
        }
        Some(Commands::Behaviours { templates }) => commands::behaviours::run(&registry, templates),
        Some(Commands::Resolve { ids, strict }) => commands::resolve::run(&registry, &ids, strict),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Path => commands::config::path(cli.config.as_deref()),
            ConfigAction::Show => commands::config::show(&config),
            ConfigAction::Init { force } => commands::config::init(cli.config.as_deref(), force),
        },
    }
}

/// Initialize tracing with `RUST_LOG`, falling back to the configured level
fn init_logging(config: &EngineConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if to_file {
        let path = config.log_path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = std::fs::OpenOptions::new().create(true).append(true).open(&path)?;
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}
