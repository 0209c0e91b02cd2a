// src/main.rs — specialist-desk entry point

use clap::Parser;

use specialist_desk::cli::{self, Backend, Cli, Commands};
use specialist_desk::infra::config::Config;
use specialist_desk::infra::{logger, paths};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = args.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match args.command {
        Commands::Dashboard {
            specialist,
            backend,
        } => {
            // The dashboard owns the terminal; logs go to a file.
            logger::init_file_logging("info", &paths::log_file_path())?;
            let specialist_id = cli::resolve_specialist(specialist.as_deref(), &config)?;
            let backend = Backend::connect(&backend, &config, &specialist_id)?;
            specialist_desk::tui::run_dashboard(
                backend.presence,
                backend.chats,
                specialist_id,
                &config,
            )
            .await
        }
        Commands::Check {
            specialist,
            backend,
        } => {
            logger::init_logging("warn");
            let backend = Backend::connect(&backend, &config, &specialist)?;
            cli::check::run_check(backend.presence, &specialist).await
        }
        Commands::Chats {
            specialist,
            selected,
            backend,
        } => {
            logger::init_logging("warn");
            let backend = Backend::connect(&backend, &config, &specialist)?;
            cli::chats::run_chats(backend.chats.as_ref(), &specialist, selected.as_deref()).await
        }
    }
}
