//! awaycal CLI - OTRS absence calendar export
//!
//! Reads vacation appointments from an OTRS database and writes a
//! day-by-day absence workbook for the previous, current and next year.

mod config;
mod export;

use std::path::PathBuf;

use anyhow::{Context, Result};
use awaycal_db::OtrsDb;
use chrono::{Datelike, Utc};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{AppConfig, Overrides};
use crate::export::OutputFormat;

#[derive(Parser)]
#[command(name = "awaycal")]
#[command(author, version, about = "OTRS absence calendar export", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ./awaycal.toml if present)
    #[arg(short, long, value_name = "FILE", env = "AWAYCAL_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the absence report (default)
    Export {
        /// Base year (default: current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Xlsx)]
        format: OutputFormat,

        /// Output file for xlsx (default from configuration)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List valid agents in report column order
    Agents {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List active calendars
    Calendars {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn list_agents(config: &AppConfig, json: bool) -> Result<()> {
    let mut db = OtrsDb::connect(&config.database)
        .with_context(|| format!("connecting to {}", config.database.redacted()))?;
    let agents = db.agents()?;

    if json {
        return print_json(&agents);
    }
    for agent in &agents {
        println!("{:>6}  {:<30}  {}", agent.id, agent.display_name, agent.mail);
    }
    Ok(())
}

fn list_calendars(config: &AppConfig, json: bool) -> Result<()> {
    let mut db = OtrsDb::connect(&config.database)
        .with_context(|| format!("connecting to {}", config.database.redacted()))?;
    let calendars = db.calendars()?;

    if json {
        return print_json(&calendars);
    }
    for calendar in &calendars {
        let marker = if calendar.id == config.calendar_id { "*" } else { " " };
        println!("{marker}{:>5}  {}", calendar.id, calendar.name);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::resolve(cli.config.as_deref(), &cli.overrides)?;
    debug!(database = %config.database.redacted(), calendar_id = config.calendar_id, "configuration");

    let command = cli.command.unwrap_or(Commands::Export {
        year: None,
        format: OutputFormat::default(),
        output: None,
    });

    match command {
        Commands::Export { year, format, output } => {
            let year = year.unwrap_or_else(|| Utc::now().year());
            let output = output.unwrap_or_else(|| config.output.clone());
            export::run(&config, year, format, &output)
        }
        Commands::Agents { json } => list_agents(&config, json),
        Commands::Calendars { json } => list_calendars(&config, json),
    }
}
