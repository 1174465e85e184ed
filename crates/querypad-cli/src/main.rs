use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use querypad_client::{ClientError, SearchClient, SuggestionSource};
use querypad_core::{AppConfig, ExitCode, Fragment, LogConfig, Typesetter, UnicodeMath};
use querypad_tui::LaunchOptions;

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "querypad",
    about = "Terminal query editor with live entity lookup",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of the default location.
    /// Also settable with QUERYPAD_CONFIG.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the search server, overriding the config file.
    #[arg(long, global = true)]
    server: Option<String>,

    /// Start with this text in the lookup box and search it right away.
    #[arg(long)]
    lookup: Option<String>,

    /// Load the editor from this file.
    #[arg(long)]
    query_file: Option<PathBuf>,

    /// Write the final query here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one lookup and print the suggestions.
    Search {
        text: String,
        /// Output in JSON format.
        #[arg(long)]
        json: bool,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

// ─── Config Actions ──────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location.
    Path,
    /// Show the effective config.
    Show,
    /// Write a config file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);

    // `config init` has to work even when the existing file is broken.
    if let Some(Commands::Config {
        action: ConfigAction::Init { force },
    }) = &cli.command
    {
        return init_config(&config_path, *force);
    }

    let mut config = match AppConfig::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(ExitCode::ConfigError.code());
        }
    };
    if let Some(server) = cli.server.clone() {
        config.server.base_url = server;
    }

    let guard = match init_logging(&config.log) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {e:#}");
            None
        }
    };

    let code = match cli.command {
        None => run_editor(&config, cli.lookup, cli.query_file, cli.output).await?,

        Some(Commands::Search { text, json }) => run_search(&config, &text, json).await?,

        Some(Commands::Config { action }) => match action {
            ConfigAction::Path => {
                println!("{}", config_path.display());
                ExitCode::Success
            }
            ConfigAction::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
                ExitCode::Success
            }
            ConfigAction::Init { force } => return init_config(&config_path, force),
        },
    };

    if code != ExitCode::Success {
        // Flush the log file; process::exit skips destructors.
        drop(guard);
        std::process::exit(code.code());
    }
    Ok(())
}

// ─── Logging ─────────────────────────────────────────────────────────────────

/// Log to the configured file. The terminal belongs to the editor, so nothing
/// goes to stdout or stderr.
fn init_logging(log: &LogConfig) -> Result<WorkerGuard> {
    let path = Path::new(&log.file);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .context("log.file has no file name")?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("QUERYPAD_LOG")
        .or_else(|_| EnvFilter::try_new(&log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    Ok(guard)
}

// ─── Commands ────────────────────────────────────────────────────────────────

fn open_source(config: &AppConfig) -> std::result::Result<SearchClient, ExitCode> {
    SearchClient::new(&config.server).map_err(|e| {
        warn!(error = %e, "invalid search endpoint");
        eprintln!("Error: {e}");
        exit_code_for(&e)
    })
}

fn exit_code_for(err: &ClientError) -> ExitCode {
    match err {
        ClientError::InvalidEndpoint(_) => ExitCode::ConfigError,
        _ => ExitCode::NetworkError,
    }
}

async fn run_editor(
    config: &AppConfig,
    lookup: Option<String>,
    query_file: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let query = match &query_file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error: cannot read {}: {e}", path.display());
                return Ok(ExitCode::InvalidArgs);
            }
        },
        None => String::new(),
    };

    let source = match open_source(config) {
        Ok(client) => Arc::new(client),
        Err(code) => return Ok(code),
    };
    info!(server = %config.server.base_url, "starting editor");
    let final_query = querypad_tui::run_tui(config, source, LaunchOptions { query, lookup }).await?;

    match output {
        Some(path) => std::fs::write(&path, &final_query)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{final_query}"),
    }
    Ok(ExitCode::Success)
}

async fn run_search(config: &AppConfig, text: &str, json_output: bool) -> Result<ExitCode> {
    let start = Instant::now();
    let source = match open_source(config) {
        Ok(client) => client,
        Err(code) => return Ok(code),
    };

    let data = match source.suggest(text).await {
        Ok(data) => data,
        Err(e) => {
            warn!(query = text, error = %e, "one-shot search failed");
            if json_output {
                print_json(&serde_json::json!({
                    "status": "error",
                    "error": e.to_string(),
                }))?;
            } else {
                eprintln!("Search failed: {e}");
            }
            return Ok(exit_code_for(&e));
        }
    };

    let mut fragments: Vec<Fragment> = data.into_iter().map(Fragment::parse).collect();
    if config.widget.typeset_math {
        UnicodeMath.typeset_all(&mut fragments);
    }
    let dur = start.elapsed().as_millis();

    if json_output {
        let items: Vec<serde_json::Value> = fragments
            .iter()
            .enumerate()
            .map(|(i, fragment)| {
                serde_json::json!({
                    "index": i,
                    "markup": fragment.markup(),
                    "text": fragment.display(),
                    "snippet": fragment.payload(i).ok(),
                })
            })
            .collect();
        print_json(&serde_json::json!({
            "status": "ok",
            "data": { "items": items, "total": fragments.len(), "query": text },
            "meta": { "duration_ms": dur }
        }))?;
    } else if fragments.is_empty() {
        println!("Found 0 matching results for \"{text}\"");
    } else {
        println!("Displaying {} results", fragments.len());
        for (i, fragment) in fragments.iter().enumerate() {
            match fragment.payload(i) {
                Ok(snippet) => println!("  {i:>2}  {}  →  {snippet}", fragment.display()),
                Err(_) => println!("  {i:>2}  {}", fragment.display()),
            }
        }
    }
    Ok(ExitCode::Success)
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        eprintln!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
        std::process::exit(ExitCode::InvalidArgs.code());
    }
    AppConfig::default().save_to(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}
