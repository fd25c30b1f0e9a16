//! vidharvest CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vidharvest::cli::{commands, Cli, Commands};
use vidharvest::config::Settings;
use vidharvest::youtube::SearchOptions;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("vidharvest={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Pull in .env before anything reads API keys
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Ensure the data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    // Execute command
    match &cli.command {
        Commands::Info { url } => {
            commands::run_info(url, &settings).await?;
        }

        Commands::Load {
            url,
            max_comments,
            order,
        } => {
            commands::run_load(url, *max_comments, order, &settings).await?;
        }

        Commands::Search {
            query,
            limit,
            order,
            duration,
            published_after,
            published_before,
            caption,
            definition,
            region,
            channel,
        } => {
            let options = SearchOptions {
                order: order.clone(),
                video_duration: duration.clone(),
                published_after: published_after.clone(),
                published_before: published_before.clone(),
                video_caption: caption.clone(),
                video_definition: definition.clone(),
                region_code: region.clone(),
                channel_id: channel.clone(),
            };
            commands::run_search(query, *limit, options, &settings).await?;
        }

        Commands::List => {
            commands::run_list(&settings).await?;
        }

        Commands::Chat { model } => {
            commands::run_chat(model.clone(), &settings).await?;
        }

        Commands::Mcp => {
            commands::run_mcp(&settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, &settings)?;
        }
    }

    Ok(())
}
