use std::sync::Arc;

use anyhow::Context;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reelshelf_api::{
    config::{Config, StoreBackend},
    db::{create_redis_client, Cache, CacheWriterHandle, MemoryUserStore, RedisUserStore, UserStore},
    middleware::{make_span_with_request_id, request_id_middleware},
    routes::{create_router, AppState, RecommendationSettings},
    services::{HttpRecommendationModel, MetadataProvider, RecommendationModel, TmdbProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let (store, cache, cache_handle) = init_store(&config).await?;
    tracing::info!(backend = store.name(), cache = cache.is_enabled(), "Document store ready");

    let metadata: Arc<dyn MetadataProvider> = Arc::new(TmdbProvider::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.image_base_url.clone(),
        config.http_timeout(),
    )?);

    let model: Option<Arc<dyn RecommendationModel>> = match &config.ml_api_url {
        Some(url) => {
            let model = HttpRecommendationModel::new(url.clone(), config.http_timeout())?;
            tracing::info!(endpoint = %model.endpoint(), "Remote recommendation model enabled");
            Some(Arc::new(model) as Arc<dyn RecommendationModel>)
        }
        None => {
            tracing::info!("ML_API_URL not set, serving content-based recommendations only");
            None
        }
    };

    let state = AppState::new(store, metadata, model, RecommendationSettings::from(&config));

    let app = create_router(state).layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(request_id_middleware))
            .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
            .layer(CorsLayer::permissive()),
    );

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Redis backs both the document store and the metadata cache; the memory
/// backend runs with the cache disabled
async fn init_store(
    config: &Config,
) -> anyhow::Result<(Arc<dyn UserStore>, Cache, Option<CacheWriterHandle>)> {
    match config.store_backend {
        StoreBackend::Redis => {
            let client = create_redis_client(&config.redis_url)?;
            let store = RedisUserStore::connect(client.clone())
                .await
                .context("Failed to connect to Redis")?;
            let (cache, handle) = Cache::new(client);
            Ok((Arc::new(store), cache, Some(handle)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on restart");
            Ok((Arc::new(MemoryUserStore::new()), Cache::disabled(), None))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
