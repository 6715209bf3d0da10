use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use live_sports_api::config::AppConfig;
use live_sports_api::database::connection::{create_indexes, get_db_client};
use live_sports_api::database::store::{MatchStore, MongoMatchStore};
use live_sports_api::routes::build_router;
use live_sports_api::services::fetcher::HttpFetcher;
use live_sports_api::services::reconciler::Reconciler;
use live_sports_api::services::scheduler::Scheduler;
use live_sports_api::services::scraper::LiveScraper;
use live_sports_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let db = match get_db_client(&config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = create_indexes(&db).await {
        tracing::warn!("Failed to create indexes: {}", e);
    }

    let store: Arc<dyn MatchStore> = Arc::new(MongoMatchStore::new(&db));

    let fetcher = match HttpFetcher::new(config.http_timeout()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            tracing::error!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let scheduler = Scheduler::new(
        LiveScraper::new(Arc::new(fetcher), config.scoreboard_url.clone()),
        Reconciler::new(store.clone()),
        config.scrape_interval(),
    );

    let shutdown = CancellationToken::new();
    let worker = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { scheduler.run_forever(shutdown).await }
    });

    let app = build_router(AppState::new(store));
    start_server(app, &config.bind_address(), shutdown.clone()).await;

    shutdown.cancel();
    if let Err(e) = worker.await {
        tracing::error!("Scheduler task ended abnormally: {}", e);
    }
}

async fn start_server(app: axum::Router, addr: &str, shutdown: CancellationToken) {
    tracing::info!("🚀 Server starting on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    let signal = async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => tracing::info!("Shutdown signal received"),
            _ = shutdown.cancelled() => {}
        }
        shutdown.cancel();
    };

    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(signal).await {
        tracing::error!("Server error: {}", e);
    }
}
