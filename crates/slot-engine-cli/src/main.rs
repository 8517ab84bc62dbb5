//! `slots` CLI — generate bookable slots, merge intervals, inspect weekly masks.
//!
//! ## Usage
//!
//! ```sh
//! # Generate slots for a JSON request (stdin → stdout)
//! cat request.json | slots generate
//!
//! # From file to file, pretty-printed, with a fixed "now" for hold expiry
//! slots generate -i request.json -o slots.json --pretty --now 2026-03-16T07:00:00Z
//!
//! # Merge a JSON array of {start, end} ranges
//! echo '[{"start":10,"end":30},{"start":30,"end":40}]' | slots merge
//!
//! # Show which weekdays a mask enables
//! slots mask 124
//! ```

mod config;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Bookable slot generation from weekly availability templates"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (overrides SLOTS_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate slots from a JSON slot request
    Generate {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Instant used to expire holds (RFC 3339; defaults to the current time)
        #[arg(long)]
        now: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Merge a JSON array of {start, end} ranges
    Merge {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print the weekdays enabled by a weekly mask (Monday is the high bit)
    Mask {
        mask: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config);

    match cli.command {
        Commands::Generate {
            input,
            output,
            now,
            pretty,
        } => {
            let json = read_input(input.as_deref())?;
            let now = match now {
                Some(raw) => slot_engine::wire::parse_datetime(&raw)
                    .with_context(|| format!("Invalid --now value: {}", raw))?,
                None => Utc::now(),
            };

            let defaults = config.request_defaults()?;
            let request = slot_engine::wire::parse_request(&json, &defaults, now)
                .context("Failed to parse slot request")?;
            debug!(
                start_date = %request.start_date,
                timezone = %request.timezone,
                sources = request.occupied.len(),
                "parsed slot request"
            );

            let slots = slot_engine::generate_slots(&request).context("Failed to generate slots")?;
            info!(count = slots.len(), "generated slots");

            let out = slot_engine::wire::slots_to_json(&slots, pretty)?;
            write_output(output.as_deref(), &out)?;
        }
        Commands::Merge { input } => {
            let json = read_input(input.as_deref())?;
            let merged =
                slot_engine::wire::merge_ranges_json(&json).context("Failed to merge ranges")?;
            write_output(None, &merged)?;
        }
        Commands::Mask { mask } => {
            let week = slot_engine::decode_weekly_mask(mask)?;
            for (day, available) in week.entries() {
                println!("{}  {}", day, if available { "available" } else { "-" });
            }
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean JSON. `RUST_LOG` wins over the config.
fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .init();
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
