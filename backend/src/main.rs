use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use deng_relay::config::Config;
use deng_relay::{AppState, build_router};

/// Language-learning chat relay
#[derive(Debug, Parser)]
#[command(name = "deng-relay", version, about)]
struct Args {
    /// Path to config.toml (defaults to conf/config.toml or ./config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine: the environment may already carry the key
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let mut config =
        load_config(args.config.as_deref(), std::io::stdout).context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let _log_guard = init_tracing(&config)?;
    tracing::info!(
        "Starting deng-relay v{} (model: {}, history window: {})",
        env!("CARGO_PKG_VERSION"),
        config.gemini.model,
        config.conversation.history_window
    );

    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(config).context("Failed to build provider client")?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("API docs at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Load configuration under a temporary console subscriber
///
/// The configured subscriber depends on the loaded config, so override and
/// missing-credential messages would otherwise go nowhere.
fn load_config<W>(explicit_path: Option<&str>, writer: W) -> anyhow::Result<Config>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let bootstrap = fmt().with_max_level(tracing::Level::INFO).with_writer(writer).finish();
    tracing::subscriber::with_default(bootstrap, || Config::load(explicit_path))
}

/// Console logging plus an optional daily-rolling file
fn init_tracing(config: &Config) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("Invalid logging.level")?;

    let (file_layer, guard) = match config.logging.file.as_deref() {
        Some(file) => {
            let path = Path::new(file);
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let name = path.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "deng-relay.log".into());
            std::fs::create_dir_all(dir).with_context(|| format!("Failed to create log dir {}", dir.display()))?;

            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, name));
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
