//! depot CLI: terminal chat client for the Data Depository answer service

use clap::{Parser, Subcommand};
use depot_engine::{Config, ConversationController, HttpAnswerService, SubmitOutcome};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "DEPOT_LOG";

/// Chat with the company knowledge agent from the terminal
#[derive(Parser)]
#[command(name = "depot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/depot/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Answer service base URL, overrides the config file
    #[arg(long, global = true)]
    server: Option<String>,

    /// Request timeout in seconds, overrides the config file
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Append logs to this file (the TUI logs nowhere else)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat TUI (default when no command specified)
    Tui,

    /// Ask a single question and print the answer
    Ask {
        /// The question
        question: String,

        /// Print the conversation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the answer service is reachable
    Health {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let tui = matches!(cli.command, None | Some(Commands::Tui));
    if let Err(e) = init_logging(cli.log_file.as_deref(), tui) {
        eprintln!("Error: failed to open log file: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(Commands::Init { force }) = cli.command {
        return cmd_init(cli.config.as_deref(), force);
    }

    let config = load_config(&cli)?;
    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        None | Some(Commands::Tui) => rt.block_on(depot_tui::run_tui(&config)),
        Some(Commands::Ask { question, json }) => rt.block_on(cmd_ask(&config, &question, json)),
        Some(Commands::Health { json }) => rt.block_on(cmd_health(&config, json)),
        Some(Commands::Init { .. }) => Ok(()),
    }
}

/// Install the tracing subscriber.
///
/// With `--log-file` logs go to that file. Otherwise the TUI stays silent
/// (stderr would corrupt the alternate screen) and other commands log to
/// stderr.
fn init_logging(log_file: Option<&Path>, tui: bool) -> std::io::Result<()> {
    let filter = || EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::registry()
                .with(filter())
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None if tui => {}
        None => {
            tracing_subscriber::registry()
                .with(filter())
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
    Ok(())
}

fn config_path(explicit: Option<&Path>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::default_path().ok_or_else(|| "could not determine config directory".into()),
    }
}

/// Load the config file, apply command-line overrides and validate.
fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        // An explicit path must exist
        Some(path) => Config::load(path)?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)?,
            None => Config::default(),
        },
    };

    let config = config.with_overrides(cli.server.clone(), cli.timeout);
    config.validate()?;
    tracing::debug!(server = %config.server_url, timeout = config.timeout_seconds, "Config loaded");
    Ok(config)
}

fn cmd_init(explicit: Option<&Path>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path(explicit)?;

    if path.exists() && !force {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    Config::default().save(&path)?;
    println!("Created {}", path.display());
    Ok(())
}

async fn cmd_ask(config: &Config, question: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let service = HttpAnswerService::from_config(config)?;
    let mut controller = ConversationController::new(Arc::new(service));

    match controller.submit(question) {
        SubmitOutcome::Dispatched => {}
        SubmitOutcome::Blank => return Err("question is empty".into()),
        SubmitOutcome::Busy => return Err("a question is already in flight".into()),
    }
    controller.settled().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);
        return Ok(());
    }

    if let Some(answer) = controller.history().last() {
        println!("{}", answer.text());
        if !answer.citations().is_empty() {
            println!("\nSources:");
            for citation in answer.citations() {
                if citation.title.is_empty() {
                    println!("  - {}", citation.url);
                } else {
                    println!("  - {} <{}>", citation.title, citation.url);
                }
            }
        }
    }
    Ok(())
}

async fn cmd_health(config: &Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let service = HttpAnswerService::from_config(config)?;

    match service.health().await {
        Ok(health) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                let status = if health.ok { "OK" } else { "unhealthy" };
                println!("{} - {status}", config.server_url);
                if !health.message.is_empty() {
                    println!("  Message: {}", health.message);
                }
                println!("  Response time: {}ms", health.latency_ms);
            }
            if health.ok {
                Ok(())
            } else {
                Err("service reported itself unhealthy".into())
            }
        }
        Err(e) => {
            if json {
                let body = serde_json::json!({ "ok": false, "error": e.to_string() });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("{} - unreachable", config.server_url);
            }
            Err(e.into())
        }
    }
}
