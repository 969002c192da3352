//! Quell — security-event auto-remediation agent CLI.
//!
//! Loads the agent configuration (fatal on error), wires the dispatcher with
//! the simulated providers and the configured audit sink, then runs one
//! subcommand:
//!
//!   quell samples                 # dispatch built-in sample events
//!   quell dispatch events.json    # dispatch events from a JSON file
//!   quell status                  # mode, registered types, audit sink info
//!   quell audit --limit 10        # recent structured-form audit entries

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use quell_audit::sink_from_settings;
use quell_contracts::{event::Event, result::DispatchResult};
use quell_core::{AgentConfig, RemediationAgent};
use quell_handlers::StaticRegistry;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Quell — route security findings to remediation handlers and keep an
/// immutable audit trail of every decision.
#[derive(Parser)]
#[command(name = "quell", about = "Security-event auto-remediation agent")]
struct Cli {
    /// Path to the agent configuration file.
    #[arg(short, long, default_value = "quell.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dispatch a set of built-in sample events, then toggle the mode and
    /// re-dispatch one to show both execution modes.
    Samples,
    /// Dispatch events from a JSON file (one object, or an array of objects).
    Dispatch {
        /// Path to the events file.
        file: PathBuf,
    },
    /// Show the current mode, registered event types, and audit sink info.
    Status,
    /// Show recent audit entries (structured sink form only).
    Audit {
        /// Maximum number of entries to show.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    // Startup configuration failure is the one fatal category.
    let config = match AgentConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {e}");
            return ExitCode::FAILURE;
        }
    };

    let sink = match sink_from_settings(&config.settings) {
        Ok(sink) => sink,
        Err(e) => {
            eprintln!("FATAL: {e}");
            return ExitCode::FAILURE;
        }
    };

    let registry = StaticRegistry::with_mock_providers(&config.modules);
    let agent = RemediationAgent::new(
        Box::new(registry),
        sink,
        config.settings.initial_mode(),
    );

    println!("[quell] agent initialized in {} mode", agent.mode().label());

    match cli.command {
        Command::Samples => run_samples(&agent),
        Command::Dispatch { file } => run_dispatch(&agent, &file),
        Command::Status => run_status(&agent),
        Command::Audit { limit } => run_audit(&agent, limit),
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn run_samples(agent: &RemediationAgent) -> ExitCode {
    let samples = vec![
        json!({
            "type": "unauthorized_saas_access",
            "event_id": "sample-saas-1",
            "user": "a@b.com",
            "source": "slack",
        }),
        json!({
            "type": "open_s3_bucket",
            "event_id": "sample-s3-1",
            "bucket_name": "public-reports",
            "region": "us-east-1",
        }),
        json!({
            "type": "unauthorized_saas_access",
            "event_id": "sample-saas-2",
            "user": "a@b.com",
            // missing "source" -> validation failure
        }),
        json!({
            "type": "unknown_event",
            "event_id": "sample-unknown-1",
        }),
        json!({
            "event_id": "sample-no-type-1",
            // missing "type" -> error
        }),
    ];

    for body in &samples {
        dispatch_value(agent, body.clone());
    }

    // Show the other mode on the first sample.
    let new_mode = agent.toggle_mode();
    println!("\n[quell] mode toggled to {}\n", new_mode.label());
    dispatch_value(agent, samples[0].clone());

    ExitCode::SUCCESS
}

fn run_dispatch(agent: &RemediationAgent, file: &PathBuf) -> ExitCode {
    let contents = match std::fs::read_to_string(file) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("failed to read '{}': {e}", file.display());
            return ExitCode::FAILURE;
        }
    };
    let parsed: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("failed to parse '{}': {e}", file.display());
            return ExitCode::FAILURE;
        }
    };

    let bodies = match parsed {
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };

    for body in bodies {
        dispatch_value(agent, body);
    }
    ExitCode::SUCCESS
}

fn run_status(agent: &RemediationAgent) -> ExitCode {
    let info = agent.audit_info();
    println!("mode:          {}", agent.mode().label());
    println!("event types:   {}", agent.event_types().join(", "));
    println!("audit format:  {}", info.format);
    println!("audit file:    {}", info.file);
    println!("audit exists:  {}", info.exists);
    if let Some(size) = info.size_bytes {
        println!("audit size:    {size} bytes");
    }
    if let Some(modified) = info.last_modified {
        println!("last modified: {modified}");
    }
    ExitCode::SUCCESS
}

fn run_audit(agent: &RemediationAgent, limit: usize) -> ExitCode {
    let entries = agent.recent_audit_entries(limit);
    if entries.is_empty() {
        println!("no structured audit entries (markdown sinks expose metadata only; see 'status')");
        return ExitCode::SUCCESS;
    }
    for entry in &entries {
        println!(
            "{}  {:18} {:18} {}",
            entry.record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.record.event.event_type().unwrap_or("N/A"),
            entry.record.result.status.to_string(),
            entry.record.event.event_id().unwrap_or("N/A"),
        );
    }
    ExitCode::SUCCESS
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn dispatch_value(agent: &RemediationAgent, body: serde_json::Value) {
    match Event::from_value(body) {
        Ok(event) => print_result(&agent.dispatch(&event)),
        Err(e) => eprintln!("skipping event: {e}"),
    }
}

fn print_result(result: &DispatchResult) {
    println!("status: {}", result.status);
    for line in &result.log {
        println!("  {line}");
    }
    println!();
}
