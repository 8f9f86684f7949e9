//! Command line driver for the match function
//!
//! Reads a rule payload and a batch of tickets, runs them through
//! validation, enrichment and one matching pass, and prints every match as
//! a JSON line on stdout.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use match_function::config::{validate_config, AppConfig};
use match_function::utils::generate_ticket_id;
use match_function::{
    cancellation, ChannelTicketProvider, MatchFunctionService, MatcherKind, MatchmakingError,
    Ticket,
};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tokio::signal;
use tracing::{debug, error, info, warn};

/// Match Function - rule-driven matchmaking for match tickets
#[derive(Parser)]
#[command(
    name = "match-function",
    version,
    about = "Validate, enrich and match tickets against a pool rule set",
    long_about = "Reads a JSON rule payload and a batch of match tickets (a JSON array or one \
                 ticket per line), runs one matching pass with the selected matcher and prints \
                 each resulting match as a JSON line."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Matcher override
    #[arg(short, long, value_name = "KIND", help = "Matcher kind (base, game, crew)")]
    kind: Option<MatcherKind>,

    /// Rule payload
    #[arg(short, long, value_name = "FILE", help = "Path to the JSON rule payload")]
    rules: PathBuf,

    /// Ticket input
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "-",
        help = "Tickets as a JSON array or JSON lines; '-' reads stdin"
    )]
    tickets: PathBuf,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Seed override
    #[arg(long, value_name = "SEED", help = "Seed enrichment randomness")]
    seed: Option<u64>,

    #[arg(long, help = "Pass tickets to matching without validating them")]
    skip_validation: bool,

    #[arg(long, help = "Pass tickets to matching without enriching them")]
    skip_enrichment: bool,

    #[arg(long, help = "Print collected metrics to stderr when done")]
    print_metrics: bool,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and rules, then exit)
    #[arg(long, help = "Validate configuration and rules and exit without matching")]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment, file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if args.debug {
        config.service.log_level = "debug".to_string();
    }
    if let Some(kind) = args.kind {
        config.matchmaking.matcher_kind = kind;
    }
    if let Some(seed) = args.seed {
        config.matchmaking.rng_seed = Some(seed);
    }

    validate_config(&config)?;
    Ok(config)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read tickets from stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Parse tickets given either as one JSON array or as JSON lines
fn parse_tickets(input: &str) -> Result<Vec<Ticket>> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("Invalid ticket array");
    }
    trimmed
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid ticket on line {}", n + 1))
        })
        .collect()
}

/// Run validation and enrichment, keeping the tickets that pass
fn prepare_tickets(
    service: &MatchFunctionService,
    tickets: Vec<Ticket>,
    rules_json: &str,
    args: &Args,
) -> Result<Vec<Ticket>> {
    let mut prepared = Vec::with_capacity(tickets.len());
    for mut ticket in tickets {
        if ticket.ticket_id.is_empty() {
            ticket.ticket_id = generate_ticket_id();
        }
        if !args.skip_validation {
            match service.validate_ticket(&ticket, rules_json) {
                Ok(true) => {}
                Ok(false) => {
                    warn!(ticket_id = %ticket.ticket_id, "Ticket rejected");
                    continue;
                }
                Err(MatchmakingError::ConstraintViolation { reason }) => {
                    warn!(ticket_id = %ticket.ticket_id, reason = %reason, "Ticket rejected");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        let ticket = if args.skip_enrichment {
            ticket
        } else {
            service.enrich_ticket(ticket, rules_json)?
        };
        prepared.push(ticket);
    }
    Ok(prepared)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        service = %config.service.name,
        matcher = %config.matchmaking.matcher_kind,
        version = match_function::VERSION,
        "Starting match function"
    );

    let service = MatchFunctionService::from_config(&config)?;
    let rules_json = read_input(&args.rules)?;
    let rules = service.rules_from_json(&rules_json)?;
    info!(alliance = ?rules.alliance_rule(), "Rules loaded");

    if args.dry_run {
        info!("Dry run completed - configuration and rules are valid");
        return Ok(());
    }

    let tickets = parse_tickets(&read_input(&args.tickets)?)?;
    let received = tickets.len();
    let tickets = prepare_tickets(&service, tickets, &rules_json, &args)?;
    info!(received, accepted = tickets.len(), "Tickets prepared");

    let (handle, signal) = cancellation();
    let (tx, provider) = ChannelTicketProvider::new(tickets.len().max(1));
    let mut matches = service.make_matches(provider, &rules_json, signal)?;

    let feeder = tokio::spawn(async move {
        for ticket in tickets {
            if tx.send(ticket).await.is_err() {
                debug!("Matching pass stopped accepting tickets");
                break;
            }
        }
    });

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Received SIGINT (Ctrl+C) signal, cancelling matching pass");
            handle.cancel();
        }
    });

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut emitted = 0usize;
    while let Some(m) = matches.recv().await {
        serde_json::to_writer(&mut out, &m)?;
        writeln!(out)?;
        emitted += 1;
    }
    out.flush()?;

    if let Err(e) = feeder.await {
        error!("Ticket feeder failed: {}", e);
    }

    info!(matches = emitted, "Matching pass complete");

    if args.print_metrics {
        eprintln!("{}", service.metrics().gather_text()?);
    }
    Ok(())
}
