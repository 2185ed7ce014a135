use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};

use ephemail::{Config, Database, Email, FilterDecision, Forwarder, MailFilter, SmtpRelay};

/// Reads one raw message from stdin, runs it through the filter, and
/// exits. Designed to sit behind a receiving MTA as a pipe-style content
/// filter; the decision is logged, never printed to stdout.
#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = ephemail::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        ephemail::logging::init_console_only(&config.logging.level);
    }

    info!("ephemail - disposable address relay");
    info!(
        "Relaying via {}:{}",
        config.smtp.host, config.smtp.port
    );

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database: {e}");
            return ExitCode::FAILURE;
        }
    };

    let transport = Arc::new(SmtpRelay::new(&config.smtp));
    let forwarder = Forwarder::new(&db, transport);
    let filter = MailFilter::new(&db, forwarder);

    let mut raw = Vec::new();
    if let Err(e) = std::io::stdin().read_to_end(&mut raw) {
        error!("Failed to read message from stdin: {e}");
        return ExitCode::FAILURE;
    }

    let mut message = match Email::parse(&raw) {
        Ok(message) => message,
        Err(e) => {
            // Unparseable mail is discarded like any other unroutable mail
            warn!("Discarding unparseable message: {e}");
            return ExitCode::SUCCESS;
        }
    };

    match filter.filter_email(&mut message).await {
        Ok(FilterDecision::Forwarded { mapping_id }) => {
            info!(mapping = mapping_id, "message forwarded");
            ExitCode::SUCCESS
        }
        Ok(FilterDecision::Dropped(reason)) => {
            info!(reason = reason.as_str(), "message dropped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Filter pass failed: {e}");
            ExitCode::FAILURE
        }
    }
}
