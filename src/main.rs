use std::future::IntoFuture;
use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use hr_service::{
    config::{install_config, Config},
    database::pool::{close_pool, create_pool},
    routes, AppState,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hr", about = "HR API server.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run HR API server on the given address.
    Serve {
        /// Listen address, overrides SERVER_ADDRESS.
        address: Option<String>,
        /// Postgres url, overrides DATABASE_URL.
        #[arg(long)]
        db: Option<String>,
    },
    /// Display server version.
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Version => {
            println!(
                "HR API Server {} {}/{}",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH
            );
            Ok(())
        }
        Command::Serve { address, db } => {
            init_tracing();
            let mut config = Config::from_env()?;
            if let Some(address) = address {
                config.server_address = address;
            }
            if let Some(db) = db {
                config.database_url = db;
            }
            install_config(config)?;
            serve().await
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = hr_service::config::get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool.clone());
    let abort = app_state.abort.clone();
    let app = routes::app(app_state);

    let addr: SocketAddr = config.server_address.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    let graceful = shutdown.clone();
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { graceful.cancelled().await })
            .into_future(),
    );

    tokio::select! {
        res = &mut server => res??,
        _ = shutdown.cancelled() => {
            info!(grace = ?config.shutdown_timeout, "draining in-flight requests");
            match tokio::time::timeout(config.shutdown_timeout, &mut server).await {
                Ok(res) => res??,
                Err(_) => {
                    warn!("grace period elapsed, cancelling outstanding store calls");
                    abort.cancel();
                    server.await??;
                }
            }
        }
    }

    close_pool(&pool, std::time::Duration::from_secs(5)).await;
    info!("Server stopped");
    Ok(())
}

async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Could not listen for ctrl-c: {:?}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Could not listen for SIGTERM: {:?}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received interrupt"),
        _ = terminate => info!("received terminate"),
    }
    shutdown.cancel();
}
