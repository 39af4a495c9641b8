//! # Runpad - A Multi-Language Code Scratchpad
//!
//! Keeps a scratch buffer per language, remembers the chosen theme, and
//! runs code on a remote Piston service.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the saved (or starter) Python code
//! cargo run -- run -l python
//!
//! # Save a file as the Rust scratch buffer, then run it
//! cargo run -- edit -l rust main.rs
//! cargo run -- run -l rust
//!
//! # Pick a theme for the editing surface
//! cargo run -- theme monokai
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use runpad_core::{
    Config, ExecutionOutcome, FileStore, KeyValueStore, MemoryStore, SessionController, Theme,
};
use runpad_piston::PistonClient;

/// Runpad - multi-language scratchpad with remote execution
#[derive(Parser, Debug)]
#[command(name = "runpad")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Store file for saved code and theme
    #[arg(short, long, value_name = "FILE", global = true)]
    store: Option<PathBuf>,

    /// Keep nothing between invocations
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported languages
    Languages,

    /// List themes
    Themes,

    /// Select and persist a theme
    Theme {
        /// Theme id, e.g. `vs-dark`
        id: String,
    },

    /// Print the current code for a language
    Show {
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Save a file (or `-` for stdin) as the code for a language
    Edit {
        #[arg(short, long)]
        language: Option<String>,

        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Discard the saved code for a language
    Reset {
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Run a file, or the saved code when no file is given
    Run {
        #[arg(short, long)]
        language: Option<String>,

        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// List runtimes installed on the execution service
    Runtimes,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    tracing::info!("Starting Runpad v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(args.config.as_deref())?;
    let store = open_store(&args, &config)?;
    let client = PistonClient::new(&config.execution.endpoint)
        .with_timeout(config.execution.timeout());

    let session = SessionController::init(&config, store, Arc::new(client.clone()))
        .context("Failed to start session")?;

    dispatch(args.command, &session, &client).await
}

/// Installs the global subscriber; `RUST_LOG` overrides `-v`.
fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(log_level).into())
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(Config::load()),
    }
}

fn open_store(args: &Args, config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    if args.ephemeral {
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = match args.store.clone().or_else(|| config.store.path.clone()) {
        Some(path) => FileStore::open(&path)
            .with_context(|| format!("Failed to open store {}", path.display()))?,
        None => FileStore::open_default().context("Failed to open the default store")?,
    };
    tracing::debug!("Using store {}", store.path().display());
    Ok(Arc::new(store))
}

/// Reads a source file, or stdin for `-`.
fn read_source(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn select(session: &SessionController, language: Option<&str>) -> anyhow::Result<()> {
    if let Some(language) = language {
        session.select_language(language)?;
    }
    Ok(())
}

async fn dispatch(
    command: Command,
    session: &SessionController,
    client: &PistonClient,
) -> anyhow::Result<ExitCode> {
    match command {
        Command::Languages => {
            let current = session.language();
            for profile in session.catalog().iter() {
                let marker = if profile.id == current { '*' } else { ' ' };
                let saved = if session.has_saved_code(&profile.id)? {
                    " (saved)"
                } else {
                    ""
                };
                println!(
                    "{} {:<12} {:<12} {}{}",
                    marker, profile.id, profile.label, profile.runtime, saved
                );
            }
        }

        Command::Themes => {
            let current = session.theme();
            for theme in Theme::ALL {
                let marker = if theme == current { '*' } else { ' ' };
                println!("{} {:<16} {}", marker, theme.id(), theme.label());
            }
        }

        Command::Theme { id } => {
            let theme: Theme = id.parse()?;
            session.set_theme(theme)?;
            println!("Theme set to {}", theme.label());
        }

        Command::Show { language } => {
            select(session, language.as_deref())?;
            print!("{}", session.source_text());
        }

        Command::Edit { language, file } => {
            select(session, language.as_deref())?;
            let text = read_source(&file)?;
            if text.is_empty() {
                tracing::warn!("Empty input; saved code left as is");
            }
            session.text_changed(text)?;
        }

        Command::Reset { language } => {
            select(session, language.as_deref())?;
            session.reset_code()?;
            println!("Reset {} to its starter code", session.language());
        }

        Command::Run { language, file } => {
            select(session, language.as_deref())?;
            let source = file.as_deref().map(read_source).transpose()?;

            return Ok(match session.run_code(source.as_deref()).await {
                ExecutionOutcome::Success(output) => {
                    println!("{output}");
                    ExitCode::SUCCESS
                }
                ExecutionOutcome::Failure(message) => {
                    eprintln!("{message}");
                    ExitCode::FAILURE
                }
            });
        }

        Command::Runtimes => {
            let runtimes = client
                .runtimes()
                .await
                .with_context(|| format!("Failed to query {}", client.endpoint()))?;

            for info in &runtimes {
                println!("{:<16} {}", info.language, info.version);
            }
            for profile in session.catalog().iter() {
                if !runtimes.iter().any(|info| info.serves(&profile.runtime)) {
                    tracing::warn!("{} ({}) is not served", profile.id, profile.runtime);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
