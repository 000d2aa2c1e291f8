use bank_registry::{BankStorage, Config, ConnectionManager, RegistryState, registry_router};
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load();

    // Fall back to `info` so a broken config is still reported.
    let loglevel = cfg
        .as_ref()
        .map(|c| c.basic.loglevel.clone())
        .unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(loglevel));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let cfg = cfg.inspect_err(|e| error!(error = %e, "failed to load configuration"))?;

    let secret_key = if cfg.basic.secret_key.is_some() { "<set>" } else { "<none>" };
    info!(
        listen_addr = %cfg.basic.listen_addr,
        database_url = %cfg.database.url,
        loglevel = %cfg.basic.loglevel,
        insecure_cookie = cfg.basic.insecure_cookie,
        secret_key,
        "configuration loaded"
    );

    let connections = ConnectionManager::new(&cfg.database)
        .inspect_err(|e| error!(error = %e, "invalid database configuration"))?;
    let storage = BankStorage::new(connections);

    if let Err(e) = storage.init_schema().await {
        error!(error = %e, "error initializing database; aborting startup");
        return Err(e.into());
    }

    let state = RegistryState::new(storage, cfg.cookie_key(), cfg.basic.insecure_cookie);
    let app = registry_router(state);

    let addr = cfg.listen_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
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
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, starting shutdown"),
        _ = terminate => info!("received SIGTERM, starting shutdown"),
    }
}
