//! proxtrace binary.
//!
//! # Usage
//!
//! ```bash
//! # Create a device secret
//! proxtrace generate
//!
//! # Keys broadcast right now, or at a fixed point in time
//! proxtrace keys --secret <base64>
//! proxtrace keys --secret <base64> --day 18362 --interval 86
//!
//! # Check observed identifiers against disclosed daily keys
//! proxtrace match --observed seen.txt --disclosed published.txt
//! ```

use std::{io::Write, path::PathBuf};

use clap::{Parser, Subcommand};
use proxtrace_cli::{Schedule, SystemEnv, commands};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Proximity tracing key tool
#[derive(Parser, Debug)]
#[command(name = "proxtrace")]
#[command(about = "Derive rolling identifiers and check exposure against disclosed keys")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new device secret
    Generate,

    /// Show the daily key and identifier for a point in time
    Keys {
        /// Device secret (base64)
        #[arg(long)]
        secret: String,

        /// Day index (days since the Unix epoch)
        #[arg(long, requires = "interval", conflicts_with = "at")]
        day: Option<u32>,

        /// Interval index within the day (0-143)
        #[arg(long, requires = "day")]
        interval: Option<u8>,

        /// Unix timestamp in seconds
        #[arg(long)]
        at: Option<u64>,
    },

    /// List every identifier broadcast on a day
    Identifiers {
        /// Device secret (base64)
        #[arg(long)]
        secret: String,

        /// Day index (days since the Unix epoch)
        #[arg(long)]
        day: u32,
    },

    /// Match observed identifiers against disclosed daily keys
    Match {
        /// File of `<identifier> <interval>` lines
        #[arg(long)]
        observed: PathBuf,

        /// File of `<daily key> <day>` lines
        #[arg(long)]
        disclosed: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let env = SystemEnv::new();
    let mut out = std::io::stdout().lock();

    match args.command {
        Command::Generate => commands::generate(env, &mut out)?,
        Command::Keys { secret, day, interval, at } => {
            let schedule = match (day, interval, at) {
                (Some(day), Some(interval), _) => Schedule::Explicit { day, interval },
                (_, _, Some(epoch_secs)) => Schedule::At(epoch_secs),
                _ => Schedule::Now,
            };
            commands::keys(env, &secret, schedule, &mut out)?;
        },
        Command::Identifiers { secret, day } => commands::identifiers(&secret, day, &mut out)?,
        Command::Match { observed, disclosed } => {
            let matched = commands::run_match(&observed, &disclosed, &mut out)?;
            if matched == 0 {
                tracing::info!("no exposure found");
            }
        },
    }

    out.flush()?;
    Ok(())
}
