use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use techscreen::api;
use techscreen::candidate::MySqlCandidateRepository;
use techscreen::chat::OpenAiCompatClient;
use techscreen::config::AppConfig;
use techscreen::interview::InterviewService;
use techscreen::transcript::TranscriptStore;

fn main() {
    if let Err(err) = try_main() {
        let _ = writeln!(io::stderr(), "{err:?}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.common)?;

    let config = AppConfig::load(cli.common.config.as_deref())?;

    match cli.command {
        Command::Serve(cmd) => run_serve(config, cmd),
    }
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Techscreen - interview screening assistant server.",
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    common: CommonOpts,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
struct CommonOpts {
    /// Override the config file path
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Reduce output to only errors
    #[arg(short, long, action = clap::ArgAction::SetTrue, global = true)]
    quiet: bool,
    /// Increase logging verbosity (stackable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve(ServeCommand),
}

#[derive(Debug, Args)]
struct ServeCommand {
    /// Override the listen host
    #[arg(long)]
    host: Option<String>,
    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,
}

fn init_tracing(common: &CommonOpts) -> Result<()> {
    let default_level = if common.quiet {
        "error"
    } else {
        match common.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "techscreen={level},tower_http={level}",
            level = default_level
        ))
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

#[tokio::main]
async fn run_serve(config: AppConfig, cmd: ServeCommand) -> Result<()> {
    info!("Starting techscreen server...");

    if config.llm.api_key.is_empty() {
        warn!("llm.api_key is empty; set TECHSCREEN__LLM__API_KEY or model calls will fail");
    }

    let llm = OpenAiCompatClient::new(&config.llm)?;
    let candidates = MySqlCandidateRepository::new(&config.database);
    let transcript = TranscriptStore::new(config.transcript.path.clone());
    info!(
        model = %config.llm.model,
        transcript = %config.transcript.path.display(),
        "interview service configured"
    );

    let interview = InterviewService::new(Arc::new(llm), Arc::new(candidates), transcript);
    let state = api::AppState::new(interview);
    let app = api::create_router(state);

    // CLI args override config file values
    let host = cmd.host.unwrap_or(config.server.host);
    let port = cmd.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}").parse().context("invalid address")?;

    info!("Listening on http://{addr}");

    let listener = TcpListener::bind(addr)
        .await
        .context("binding to address")?;

    let shutdown_signal = async {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }

        info!("Shutdown signal received");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("running server")?;

    Ok(())
}
