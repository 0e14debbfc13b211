// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Barter - messaging for the campus exchange, from the terminal.
//!
//! This is the binary entry point for the Barter command-line client.

mod chat;
mod conversations;
mod shutdown;

use std::path::PathBuf;
use std::process::ExitCode;

use barter_config::BarterConfig;
use barter_core::{BarterError, UserHandle};
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::chat::IntentSource;

/// Barter - messaging for the campus exchange.
#[derive(Parser, Debug)]
#[command(name = "barter", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Local user; defaults to `auth.username` from the configuration.
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List your conversations.
    Conversations,
    /// Chat with another user, optionally about a listed item.
    Chat {
        /// The other participant.
        #[arg(long = "with")]
        other: String,
        /// Listing the conversation is about.
        #[arg(long)]
        item: Option<String>,
        /// Title of the listing, shown in the chat header.
        #[arg(long)]
        item_title: Option<String>,
    },
    /// Open a chat from a JSON handoff payload.
    Open {
        /// e.g. '{"otherUser":"bilal","itemId":"42","itemTitle":"Guitar Lessons"}'
        #[arg(long)]
        intent: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match cli.config.as_deref() {
        Some(path) => barter_config::load_and_validate_path(path),
        None => barter_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            barter_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging.level);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: BarterConfig) -> Result<(), BarterError> {
    let user = resolve_user(cli.user.as_deref(), &config)?;
    tracing::debug!(user = %user, base_url = %config.api.base_url, "starting");

    match cli.command {
        Commands::Conversations => conversations::run_conversations(config, user).await,
        Commands::Chat {
            other,
            item,
            item_title,
        } => {
            let shutdown = shutdown::install_signal_handler();
            let source = IntentSource::Flags {
                other,
                item,
                item_title,
            };
            chat::run_chat(config, user, source, shutdown).await
        }
        Commands::Open { intent } => {
            let shutdown = shutdown::install_signal_handler();
            chat::run_chat(config, user, IntentSource::Json(intent), shutdown).await
        }
    }
}

/// The `--user` flag wins over `auth.username`.
fn resolve_user(flag: Option<&str>, config: &BarterConfig) -> Result<UserHandle, BarterError> {
    flag.or(config.auth.username.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(UserHandle::new)
        .ok_or_else(|| {
            BarterError::Config("no local user: pass --user or set auth.username".into())
        })
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("barter={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_chat_with_item() {
        let cli = Cli::try_parse_from([
            "barter",
            "chat",
            "--with",
            "bilal",
            "--item",
            "42",
            "--item-title",
            "Guitar Lessons",
            "--user",
            "ayesha",
        ])
        .unwrap();

        assert_eq!(cli.user.as_deref(), Some("ayesha"));
        match cli.command {
            Commands::Chat {
                other,
                item,
                item_title,
            } => {
                assert_eq!(other, "bilal");
                assert_eq!(item.as_deref(), Some("42"));
                assert_eq!(item_title.as_deref(), Some("Guitar Lessons"));
            }
            other => panic!("expected chat, got {other:?}"),
        }
    }

    #[test]
    fn chat_requires_other_participant() {
        assert!(Cli::try_parse_from(["barter", "chat"]).is_err());
    }

    #[test]
    fn user_flag_overrides_config() {
        let config = barter_config::load_and_validate_str("[auth]\nusername = \"ayesha\"\n")
            .expect("valid config");

        assert_eq!(resolve_user(Some("zara"), &config).unwrap().as_str(), "zara");
        assert_eq!(resolve_user(None, &config).unwrap().as_str(), "ayesha");
    }

    #[test]
    fn missing_user_is_config_error() {
        let config = BarterConfig::default();
        assert!(matches!(
            resolve_user(None, &config),
            Err(BarterError::Config(_))
        ));
        assert!(resolve_user(Some("  "), &config).is_err());
    }

    #[test]
    fn default_config_is_valid() {
        let config = barter_config::load_and_validate_str("").expect("defaults should be valid");
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.sync.poll_interval_ms, 3000);
    }
}
