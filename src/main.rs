mod cli;
mod config;
mod db;
mod models;
mod prayer_times;
mod sources;
mod tui;
mod utils;
mod widget;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use rusqlite::Connection;
use std::fs::OpenOptions;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;
use widget::{Refresher, WidgetCache};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Board);

    AppConfig::ensure_data_dir()?;
    // The board owns the terminal, so its log goes to a file.
    init_logging(matches!(command, Commands::Board))?;

    let mut config = AppConfig::load().context("Loading config")?;
    let mut cache = open_cache();

    match command {
        Commands::Board => {
            tui::app::run(config, cache).await?;
        }
        Commands::Times => {
            let refresher = Refresher::new(&config).context("Creating HTTP client")?;
            handlers::handle_times(&refresher, &mut cache, &config).await?;
        }
        Commands::Hijri { date, offline } => {
            let refresher = Refresher::new(&config).context("Creating HTTP client")?;
            handlers::handle_hijri(&refresher, date, offline).await?;
        }
        Commands::Countdown => {
            let refresher = Refresher::new(&config).context("Creating HTTP client")?;
            handlers::handle_countdown(&refresher, &mut cache, &config).await?;
        }
        Commands::Calibrate { write } => {
            handlers::handle_calibrate(&mut config, write)?;
        }
        Commands::Cache { action } => {
            handlers::handle_cache(&mut cache, &action)?;
        }
    }

    Ok(())
}

fn init_logging(to_file: bool) -> Result<()> {
    let default_level = if to_file { "info" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if to_file {
        let path = AppConfig::log_path()?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Opening log file at {:?}", path))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn open_database() -> Result<Connection> {
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    // Enable WAL mode for better concurrent access
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;
    Ok(conn)
}

/// The durable cache is a convenience; without it everything still works.
fn open_cache() -> WidgetCache {
    match open_database() {
        Ok(conn) => WidgetCache::durable(conn),
        Err(e) => {
            warn!("Cache database unavailable, keeping data in memory: {:#}", e);
            WidgetCache::in_memory()
        }
    }
}
