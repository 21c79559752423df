//! 机器人主程序入口

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serenity::Client;

use guild_translator::bot::handler::{intents, BotHandler};
use guild_translator::env::{discord, generate_env_docs, EnvConfig, EnvVar};
use guild_translator::logging::init_tracing;
use guild_translator::translation::{ConfigManager, TranslationService};

#[derive(Parser, Debug)]
#[command(
    name = "guild-translator",
    version,
    about = "Translate every channel and role name of a Discord server"
)]
struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Print the supported environment variables and exit
    #[arg(long)]
    print_env_docs: bool,

    /// Print the configuration read from the environment and exit
    #[arg(long)]
    check_env: bool,

    /// Write an example configuration file and exit
    #[arg(long, value_name = "PATH")]
    generate_config: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.print_env_docs {
        print!("{}", generate_env_docs());
        return Ok(());
    }

    if cli.check_env {
        EnvConfig::from_env()?.print_summary();
        return Ok(());
    }

    if let Some(path) = cli.generate_config {
        ConfigManager::generate_example_config(&path)?;
        println!("Example configuration written to {}", path);
        return Ok(());
    }

    let manager = match cli.config {
        Some(path) => ConfigManager::from_path(&path)?,
        None => ConfigManager::new()?,
    };
    let config = manager.into_config();
    init_tracing(cli.log_level.as_deref().unwrap_or(&config.log_level))?;

    // 令牌在 .env 加载之后读取
    let token = discord::Token::get()?;
    let service = Arc::new(TranslationService::new(config)?);

    let mut client = Client::builder(&token, intents())
        .event_handler(BotHandler::new(service))
        .await?;

    tracing::info!("正在连接 Discord 网关");
    client.start().await?;
    Ok(())
}
