mod auth;
mod cache;
mod clock;
mod config;
mod handlers;
mod models;
mod prism;
mod ratelimit;
mod router;
mod services;
mod session;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache::ClusterNameCache;
use clock::SystemClock;
use config::Config;
use prism::PrismClient;
use ratelimit::{GovernorRatePolicy, RatePolicy};
use services::VmListService;
use session::{MemorySessionStore, SessionStore};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub prism: Arc<PrismClient>,
    pub vms: VmListService,
    pub sessions: Arc<dyn SessionStore>,
    pub login_limiter: Arc<dyn RatePolicy>,
    pub api_limiter: Arc<dyn RatePolicy>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prism_dash=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration - refuse to start without required values
    let cfg = Config::load();
    cfg.validate()?;

    tracing::info!("Starting PrismDash Server");
    tracing::info!("Prism Central: {}", cfg.prism_host);
    tracing::info!("Listen: {}", cfg.listen_addr);

    let prism = Arc::new(PrismClient::new(&cfg)?);

    let cluster_cache = ClusterNameCache::new(
        prism.clone(),
        Arc::new(SystemClock),
        Duration::from_secs(cfg.cluster_cache_ttl_secs),
    );
    let vms = VmListService::new(prism.clone(), cluster_cache, cfg.console_base_url.clone());

    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new(Duration::from_secs(
        cfg.session_lifetime_hours * 3600,
    )));

    let login_limiter: Arc<dyn RatePolicy> =
        Arc::new(GovernorRatePolicy::per_minute(cfg.login_rate_limit_per_minute));
    let api_limiter: Arc<dyn RatePolicy> =
        Arc::new(GovernorRatePolicy::per_minute(cfg.api_rate_limit_per_minute));

    // Create app state
    let state = Arc::new(AppState {
        config: cfg.clone(),
        prism,
        vms,
        sessions,
        login_limiter,
        api_limiter,
    });

    // Build router
    let app = router::build(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("PrismDash listening on {}", cfg.listen_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("PrismDash shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
