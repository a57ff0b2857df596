use std::sync::Arc;

use conduit_recs::{
    api::{create_router, AppState},
    config::{Config, InteractionBackend},
    db,
    services::{
        interactions::{
            InteractionStore, MemoryInteractionStore, PgInteractionStore, RedisInteractionStore,
        },
        items::HttpItemStore,
        RecommendationEngine,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("conduit_recs=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let interactions = build_interaction_store(&config).await?;
    let items = Arc::new(HttpItemStore::new(config.item_store_url.clone()));

    tracing::info!(
        interaction_store = interactions.name(),
        item_store_url = %config.item_store_url,
        default_limit = config.default_recommendation_limit,
        "Recommendation engine configured"
    );

    let engine = RecommendationEngine::new(interactions, items)
        .with_default_limit(config.default_recommendation_limit);
    let app = create_router(AppState::new(engine));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn build_interaction_store(config: &Config) -> anyhow::Result<Arc<dyn InteractionStore>> {
    let store: Arc<dyn InteractionStore> = match config.interaction_backend {
        InteractionBackend::Memory => Arc::new(MemoryInteractionStore::new()),
        InteractionBackend::Postgres => {
            let pool =
                db::create_pool(&config.database_url, config.database_max_connections).await?;
            Arc::new(PgInteractionStore::new(pool))
        }
        InteractionBackend::Redis => {
            let client = db::create_redis_client(&config.redis_url)?;
            Arc::new(RedisInteractionStore::new(client))
        }
    };
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
