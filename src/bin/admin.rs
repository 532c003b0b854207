//! CLI administration tool for tiered-shortener.
//!
//! Creates and inspects short links through the same two-tier store the
//! server uses, without going through the HTTP API. Clicks are never
//! recorded from here.
//!
//! # Usage
//!
//! ```bash
//! # Create a link (prompts for the URL when --url is omitted)
//! cargo run --bin admin -- create --url https://example.com --alias docs
//!
//! # Show the record behind a code
//! cargo run --bin admin -- resolve docs
//!
//! # Show click statistics
//! cargo run --bin admin -- stats docs
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`tiered_shortener::config`].

use tiered_shortener::application::LinkError;
use tiered_shortener::application::services::{CreateLink, LinkService};
use tiered_shortener::config::{self, Config};
use tiered_shortener::domain::repositories::EntryRepository;
use tiered_shortener::infrastructure::persistence::PgEntryRepository;
use tiered_shortener::server;
use tiered_shortener::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use std::sync::Arc;

/// CLI tool for managing tiered-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Create a short link
    Create {
        /// URL to shorten
        #[arg(short, long)]
        url: Option<String>,

        /// Custom short code used verbatim
        #[arg(short, long)]
        alias: Option<String>,
    },

    /// Show the record behind a short code
    Resolve {
        code: String,
    },

    /// Show statistics for a short code
    Stats {
        code: String,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;

    let pool = server::connect_database(&config).await?;
    let repository: Arc<dyn EntryRepository> = Arc::new(PgEntryRepository::new(Arc::new(pool)));

    match cli.command {
        Commands::Create { url, alias } => {
            let service = build_service(&config, repository).await;
            create_link(&service, url, alias).await?
        }
        Commands::Resolve { code } => {
            let service = build_service(&config, repository).await;
            resolve_link(&service, &code).await?
        }
        Commands::Stats { code } => {
            let service = build_service(&config, repository).await;
            show_stats(&service, &code).await?
        }
        Commands::Db { action } => handle_db_action(action, repository.as_ref()).await?,
    }

    Ok(())
}

/// Link service without a click sender.
async fn build_service(config: &Config, repository: Arc<dyn EntryRepository>) -> LinkService {
    let cache = server::build_cache(config).await;
    let store = server::build_store(config, cache, repository);
    LinkService::new(store, CodeGenerator::default())
}

async fn create_link(
    service: &LinkService,
    url: Option<String>,
    alias: Option<String>,
) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();

    let url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("URL to shorten")
            .with_initial_text("https://")
            .interact_text()?,
    };

    let mut request = CreateLink::new(url.clone());
    if let Some(alias) = alias {
        request = request.with_alias(alias);
    }

    let code = service
        .create_link(request)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("{}", "✅ Link created".green().bold());
    println!();
    println!("  URL:  {}", url.cyan());
    println!("  Code: {}", code.bright_yellow().bold());
    println!();

    Ok(())
}

async fn resolve_link(service: &LinkService, code: &str) -> Result<()> {
    let record = match service.resolve_link(code).await {
        Ok(record) => record,
        Err(LinkError::LinkNotFound(_)) => {
            println!("{} {}", "⚠️  No link for".yellow(), code.bright_white());
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to resolve link"),
    };

    println!("{}", "🔎 Link".bright_blue().bold());
    println!();
    println!("  Code:    {}", record.short_code.bright_yellow());
    println!("  URL:     {}", record.url.cyan());
    println!(
        "  Created: {}",
        record
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    println!("  Clicks:  {}", record.clicks.to_string().bright_green());
    println!();

    Ok(())
}

async fn show_stats(service: &LinkService, code: &str) -> Result<()> {
    let stats = match service.get_stats(code).await {
        Ok(stats) => stats,
        Err(LinkError::LinkNotFound(_)) => {
            println!("{} {}", "⚠️  No link for".yellow(), code.bright_white());
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to load statistics"),
    };

    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();
    println!("  Code:    {}", stats.short_code.bright_yellow());
    println!(
        "  Clicks:  {}",
        stats.clicks.to_string().bright_green().bold()
    );
    println!(
        "  Created: {}",
        stats
            .created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    println!("  Size:    ~{} bytes", stats.approximate_size);
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, repository: &dyn EntryRepository) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            if !repository.health_check().await {
                anyhow::bail!("Database health check failed");
            }

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}
