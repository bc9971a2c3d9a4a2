//! Switchboard -- smart routing façade for text-generation providers.
//!
//! This is the application entry point. It wires together all modules:
//!   - Configuration loading and validation
//!   - Provider adapter construction
//!   - Usage ledger + journal stores
//!   - Router kernel
//!   - Background health monitor and scheduled journal rollover
//!   - HTTP server with graceful shutdown on SIGTERM / SIGINT

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use switchboard::AppState;
use switchboard::api;
use switchboard::config::Config;
use switchboard::journal::{JournalStore, spawn_rollover_task};
use switchboard::providers::monitor::spawn_health_monitor;
use switchboard::providers::ollama::OllamaProvider;
use switchboard::providers::openai::OpenAiProvider;
use switchboard::providers::{ProviderRouter, TextProvider};
use switchboard::usage::UsageLedger;

// ---------------------------------------------------------------------------
// CLI argument parsing (minimal, no clap dependency)
// ---------------------------------------------------------------------------

struct CliArgs {
    config_path: PathBuf,
}

fn parse_args() -> CliArgs {
    let mut args = std::env::args().skip(1);
    let mut config_path = PathBuf::from("switchboard.toml");

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                if let Some(path) = args.next() {
                    config_path = PathBuf::from(path);
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("switchboard {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                eprintln!("Run with --help for usage information.");
                std::process::exit(1);
            }
        }
    }

    CliArgs { config_path }
}

fn print_usage() {
    println!(
        "\
switchboard {version} -- smart routing façade for text-generation providers

USAGE:
    switchboard [OPTIONS]

OPTIONS:
    -c, --config <PATH>    Path to configuration file [default: switchboard.toml]
    -h, --help             Print this help message
    -V, --version          Print version information

ENVIRONMENT:
    RUST_LOG               Override log level (e.g. RUST_LOG=debug)
    SWITCHBOARD_CONFIG     Alternative to --config flag
",
        version = env!("CARGO_PKG_VERSION")
    );
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse CLI arguments
    let cli = parse_args();

    // Allow SWITCHBOARD_CONFIG env var as alternative to --config flag
    let config_path = std::env::var("SWITCHBOARD_CONFIG")
        .map(PathBuf::from)
        .unwrap_or(cli.config_path);

    // 2. Load and validate configuration. A broken configuration is fatal:
    //    the process must not accept traffic.
    let config = Config::load(&config_path)?;
    config.validate()?;

    // 3. Initialize tracing/logging
    init_tracing(&config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        "Starting switchboard"
    );

    // 4. Build provider adapters from configuration
    let providers = build_providers(&config);
    if providers.is_empty() {
        tracing::warn!("No providers enabled; every generation request will fail");
    }

    // 5. Usage ledger (in-memory, process lifetime)
    let ledger = Arc::new(UsageLedger::new(config.router.provider_limits.clone()));

    // 6. Journal stores: the router's attempt journal plus the façade's
    //    response history, sharing one configuration section.
    let journal = Arc::new(JournalStore::new(config.journal.clone()));
    let history = Arc::new(JournalStore::new(config.journal.for_document("_history")));
    journal.ensure_file().await?;
    history.ensure_file().await?;

    // 7. Router kernel
    let router = Arc::new(ProviderRouter::new(
        providers,
        Arc::clone(&ledger),
        Arc::clone(&journal),
        config.router.clone(),
    ));

    // 8. Background tasks: periodic health sweep + scheduled rollover
    let _health_handle =
        spawn_health_monitor(Arc::clone(&router), config.router.health_check_interval());
    let _journal_rollover = spawn_rollover_task(
        Arc::clone(&journal),
        config.journal.rollover_check_interval(),
    );
    let _history_rollover = spawn_rollover_task(
        Arc::clone(&history),
        config.journal.rollover_check_interval(),
    );

    // 9. Build shared application state
    let state = AppState {
        config: Arc::new(config.clone()),
        router,
        ledger,
        history,
    };

    // 10. Build the app and serve
    let app = build_app(state);
    let listen_addr = config.listen_addr();
    let listener = TcpListener::bind(&listen_addr).await?;
    tracing::info!(addr = %listen_addr, "Listening");

    println!();
    println!("  switchboard v{} is running", env!("CARGO_PKG_VERSION"));
    println!("  API:     http://{listen_addr}/api/ai/");
    println!("  Health:  http://{listen_addr}/health");
    println!();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down gracefully");
    Ok(())
}

// ---------------------------------------------------------------------------
// Provider construction
// ---------------------------------------------------------------------------

/// Build every enabled adapter. A provider that fails to construct is
/// skipped with a warning rather than aborting startup.
fn build_providers(config: &Config) -> Vec<Arc<dyn TextProvider>> {
    let mut providers: Vec<Arc<dyn TextProvider>> = Vec::new();

    if let Some(ref openai) = config.providers.openai {
        if openai.enabled {
            match OpenAiProvider::new(openai.clone()) {
                Ok(provider) => {
                    providers.push(Arc::new(provider));
                    tracing::info!(priority = openai.priority, "OpenAI provider registered");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to initialize OpenAI provider, skipping");
                }
            }
        }
    }

    if let Some(ref ollama) = config.providers.ollama {
        if ollama.enabled {
            match OllamaProvider::new(ollama.clone()) {
                Ok(provider) => {
                    providers.push(Arc::new(provider));
                    tracing::info!(priority = ollama.priority, "Ollama provider registered");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to initialize Ollama provider, skipping");
                }
            }
        }
    }

    providers
}

// ---------------------------------------------------------------------------
// Router assembly
// ---------------------------------------------------------------------------

/// Build the application router with all middleware layers.
fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config);

    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();
    let trace = TraceLayer::new_for_http();

    api::build_api_router()
        .layer(propagate_id)
        .layer(request_id)
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

/// Build the CORS layer from config.
fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.server.cors_origins.is_empty() {
        // Default: allow all origins for development convenience
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .server
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

// ---------------------------------------------------------------------------
// Tracing initialization
// ---------------------------------------------------------------------------

/// Set up the tracing subscriber based on configuration.
fn init_tracing(config: &Config) {
    // RUST_LOG env var takes precedence over config file
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.logging.level;
        EnvFilter::new(format!("switchboard={level},tower_http={level},warn"))
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if config.logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

// ---------------------------------------------------------------------------
// Graceful shutdown
// ---------------------------------------------------------------------------

/// Wait for a shutdown signal (SIGTERM or SIGINT / Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C)");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
