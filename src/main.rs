//! hostblock CLI.
//!
//! `block`, `unblock`, `list`, and `restore` map 1:1 to engine
//! operations. Expected conditions (already blocked, not blocked, invalid
//! site) print a message and exit zero; only fatal storage errors exit
//! non-zero.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{TimeDelta, Utc};
use clap::{Parser, Subcommand};

use hostblock::error::BlockError;
use hostblock::{backup, platform, quote, validate, Blocker, BlockerConfig};

/// Quote-of-the-day list, embedded so display never depends on the
/// working directory.
const QUOTES_JSON: &str = include_str!("../data/quotes.json");

/// Block distracting websites via the hosts file.
#[derive(Parser, Debug)]
#[command(name = "hostblock", version, about)]
struct Cli {
    /// Hosts file to edit (defaults to the platform location).
    #[arg(long, global = true)]
    hosts: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Block a website (e.g. facebook.com).
    Block {
        /// The domain to block.
        domain: String,

        /// Block temporarily, for this many minutes.
        #[arg(short, long)]
        minutes: Option<i64>,
    },

    /// Unblock a website, or everything with --all.
    Unblock {
        /// The domain to unblock.
        domain: Option<String>,

        /// Unblock every blocked domain.
        #[arg(long, conflicts_with = "domain")]
        all: bool,
    },

    /// List currently blocked websites.
    List,

    /// Restore the hosts file to its pre-hostblock contents.
    Restore,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            if e.is_permission_denied() {
                eprintln!("Editing the hosts file requires elevation (sudo / Administrator).");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> hostblock::Result<()> {
    let hosts_path = match cli.hosts {
        Some(path) => path,
        None => platform::hosts_path()?,
    };
    let config = BlockerConfig::new(hosts_path);
    backup::create(&config.hosts_path, &config.backup_path)?;

    match cli.command {
        Command::Restore => restore(&config),
        command => {
            let mut blocker = Blocker::open(&config)?;
            // Keep the file current before acting on or reporting state.
            blocker.expire_due(Utc::now())?;

            match command {
                Command::Block { domain, minutes } => block(&mut blocker, &domain, minutes),
                Command::Unblock { domain, all } => unblock(&mut blocker, domain.as_deref(), all),
                Command::List => {
                    list(&blocker);
                    Ok(())
                }
                Command::Restore => Ok(()),
            }
        }
    }
}

fn block(blocker: &mut Blocker, domain: &str, minutes: Option<i64>) -> hostblock::Result<()> {
    if !validate::is_valid_site(domain) {
        println!("Please specify a valid website to block.");
        return Ok(());
    }

    let duration = match minutes {
        None => None,
        Some(m) => match TimeDelta::try_minutes(m) {
            Some(d) => Some(d),
            // `TimeDelta::minutes` panics when the span is unrepresentable.
            None => {
                println!("Invalid duration: {m} minute(s).");
                return Ok(());
            }
        },
    };
    match blocker.block(domain, duration) {
        Ok(()) => {
            match minutes {
                Some(m) => println!("Access to {domain} has been blocked for {m} minute(s)."),
                None => println!("Access to {domain} has been blocked."),
            }
            if let Some(q) = quote::daily_quote(QUOTES_JSON) {
                println!("\n{q}");
            }
            Ok(())
        }
        Err(e @ (BlockError::AlreadyBlocked { .. } | BlockError::InvalidDuration { .. })) => {
            println!("{e}");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn unblock(blocker: &mut Blocker, domain: Option<&str>, all: bool) -> hostblock::Result<()> {
    if all {
        let count = blocker.unblock_all()?;
        println!("Unblocked {count} site(s).");
        return Ok(());
    }

    let Some(domain) = domain else {
        println!("Please specify a website to unblock, or use --all.");
        return Ok(());
    };
    match blocker.unblock(domain) {
        Ok(()) => {
            println!("Access to {domain} has been unblocked.");
            Ok(())
        }
        Err(e @ BlockError::NotBlocked { .. }) => {
            println!("{e}");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn list(blocker: &Blocker) {
    let mut any = false;
    for domain in blocker.list_blocked() {
        if !any {
            println!("Currently blocked sites:");
            any = true;
        }
        println!("- {domain}");
    }
    if !any {
        println!("No sites are currently blocked.");
    }
}

fn restore(config: &BlockerConfig) -> hostblock::Result<()> {
    backup::restore(&config.hosts_path, &config.backup_path)?;
    // The snapshot describes managed lines that no longer exist.
    if let Err(e) = std::fs::remove_file(&config.snapshot_path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            return Err(BlockError::StorageUnavailable {
                path: config.snapshot_path.clone(),
                source: e,
            });
        }
    }
    println!("Hosts file has been restored to its original state.");
    Ok(())
}
