// src/cli/mod.rs — CLI definition (clap derive)

pub mod chats;
pub mod check;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::infra::config::Config;
use crate::infra::errors::DeskError;
use crate::presence::http::HttpPresenceClient;
use crate::presence::memory::MemoryPresence;
use crate::presence::{ActiveChatsSource, PresenceClient};

#[derive(Parser)]
#[command(
    name = "specialist-desk",
    about = "Live-chat dashboard for support specialists",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Go online and open the interactive dashboard
    Dashboard {
        /// Specialist id (defaults to dashboard.specialist_id from config)
        #[arg(short, long)]
        specialist: Option<String>,
        #[command(flatten)]
        backend: BackendArgs,
    },
    /// Go online, print the session state, then go offline again
    Check {
        /// Specialist id
        specialist: String,
        #[command(flatten)]
        backend: BackendArgs,
    },
    /// List the active chats routed to a specialist
    Chats {
        /// Specialist id
        specialist: String,
        /// Mark this chat as the open one
        #[arg(long)]
        selected: Option<String>,
        #[command(flatten)]
        backend: BackendArgs,
    },
}

#[derive(Args, Clone, Default)]
pub struct BackendArgs {
    /// Use a built-in in-memory backend instead of the configured server
    #[arg(long)]
    pub demo: bool,
}

/// Presence and chat clients for one invocation.
pub struct Backend {
    pub presence: Arc<dyn PresenceClient>,
    pub chats: Arc<dyn ActiveChatsSource>,
}

impl Backend {
    pub fn connect(
        args: &BackendArgs,
        config: &Config,
        specialist_id: &str,
    ) -> Result<Self, DeskError> {
        if args.demo {
            tracing::info!("Using in-memory demo backend");
            let memory = Arc::new(MemoryPresence::demo(specialist_id));
            return Ok(Self {
                presence: memory.clone(),
                chats: memory,
            });
        }
        let http = Arc::new(HttpPresenceClient::from_config(&config.backend)?);
        Ok(Self {
            presence: http.clone(),
            chats: http,
        })
    }
}

/// Command-line id first, then the configured default.
pub fn resolve_specialist(cli: Option<&str>, config: &Config) -> Result<String, DeskError> {
    cli.map(str::to_string)
        .or_else(|| config.dashboard.specialist_id.clone())
        .filter(|id| !id.trim().is_empty())
        .ok_or(DeskError::NoSpecialist)
}
