//! blogbot: Telegram publishing bot
//!
//! Usage:
//!   blogbot                    - Run the bot
//!   blogbot --config <path>    - Run with a TOML config file
//!   blogbot --help             - Show help

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use blogbot_core::{
    AllowList, CompletionClient, Config, DialogueController, PublishClient, SessionStore,
};
use blogbot_telegram::TelegramBot;
use tracing_subscriber::EnvFilter;

/// Run mode
#[derive(Debug, PartialEq, Eq)]
enum RunMode {
    /// Run the bot, optionally with an explicit config file
    Bot { config: Option<PathBuf> },
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = match parse_args(std::env::args().skip(1))? {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("blogbot {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Bot { config } => config,
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load(config_path.as_deref())
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting blogbot {}...", env!("CARGO_PKG_VERSION"));
    tracing::info!("{}", config.summary());

    run_bot(config).await
}

/// Parse command line arguments
fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<RunMode> {
    let mut config = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(RunMode::Help),
            "--version" | "-v" => return Ok(RunMode::Version),
            "--config" | "-c" => {
                let path = args.next().context("--config requires a path")?;
                config = Some(PathBuf::from(path));
            }
            other => anyhow::bail!("Unknown argument: {} (see --help)", other),
        }
    }

    Ok(RunMode::Bot { config })
}

/// Print help message
fn print_help() {
    println!("blogbot - publish blog posts from Telegram");
    println!();
    println!("Usage:");
    println!("  blogbot                  Run the bot");
    println!("  blogbot --config <path>  Read settings from a TOML file");
    println!("  blogbot --help           Show this help message");
    println!("  blogbot --version        Show version");
    println!();
    println!("Environment Variables:");
    println!("  BOT_TOKEN                    Telegram bot token (required)");
    println!("  TELEGRAM_USER_ID             Comma-separated allowed user ids (required)");
    println!("  API_URL                      Create-post endpoint (required)");
    println!("  DRF_TOKEN                    Content API token (required)");
    println!("  MISTRAL_API_KEY              Completion API key (enables generation)");
    println!("  MISTRAL_MODEL                Model name (default: mistral-small-latest)");
    println!("  LLM_BASE_URL                 Completion API base URL");
    println!("  SESSION_TTL_SECS             Idle conversation lifetime (default: 3600)");
    println!("  SESSION_SWEEP_INTERVAL_SECS  Expiry sweep interval (default: 300)");
    println!("  PUBLISH_TIMEOUT_SECS         Content API timeout (default: 30)");
    println!("  LLM_TIMEOUT_SECS             Completion API timeout (default: 120)");
}

/// Build the clients and run the bot until Ctrl+C
async fn run_bot(config: Config) -> anyhow::Result<()> {
    let publisher = PublishClient::new(&config.publish)
        .map_err(|e| anyhow::anyhow!("Failed to create publish client: {}", e))?;

    let sessions = SessionStore::new(config.session.ttl_secs);
    let sweeper = sessions.spawn_sweeper(Duration::from_secs(config.session.sweep_interval_secs));

    let mut controller = DialogueController::new(
        AllowList::new(config.telegram.allowed_user_ids.iter().copied()),
        sessions,
        Arc::new(publisher),
    );

    match config.llm_config() {
        Some(llm) => {
            let generator = CompletionClient::new(llm)
                .map_err(|e| anyhow::anyhow!("Failed to create LLM client: {}", e))?;
            tracing::info!("Draft generation enabled (model: {})", llm.model);
            controller = controller.with_generator(Arc::new(generator));
        }
        None => tracing::info!("No LLM API key configured; draft generation disabled"),
    }

    let bot = TelegramBot::new(&config.telegram.bot_token, controller)?;
    let result = bot.start().await;

    sweeper.abort();
    tracing::info!("blogbot stopped");
    result.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_runs_bot() {
        assert_eq!(
            parse_args(args(&[])).unwrap(),
            RunMode::Bot { config: None }
        );
    }

    #[test]
    fn test_config_path() {
        assert_eq!(
            parse_args(args(&["--config", "bot.toml"])).unwrap(),
            RunMode::Bot {
                config: Some(PathBuf::from("bot.toml"))
            }
        );
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse_args(args(&["--help"])).unwrap(), RunMode::Help);
        assert_eq!(parse_args(args(&["-v"])).unwrap(), RunMode::Version);
    }

    #[test]
    fn test_bad_args() {
        assert!(parse_args(args(&["--config"])).is_err());
        assert!(parse_args(args(&["--cli"])).is_err());
    }
}
