use anyhow::{Context, Result};
use featured_feed::cache::connect_cache;
use featured_feed::composer::FeedComposer;
use featured_feed::config::Config;
use featured_feed::server;
use featured_feed::translation::TranslationClient;
use featured_feed::wikipedia::WikipediaClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("featured_feed=info".parse()?),
        )
        .init();

    info!("Starting featured feed service");

    // Load configuration from environment
    let config = Config::from_env()?;

    // One client for every outbound call, carrying the per-call deadline
    let http = config.http_client()?;

    let mut feeds = WikipediaClient::new(http.clone(), config.feed_api_url.clone());
    if let Some(dir) = &config.debug_dump_dir {
        info!("Dumping raw feed payloads to {}", dir);
        feeds = feeds.with_debug_dump_dir(dir);
    }

    let translator = TranslationClient::new(
        http,
        Some(config.translate_api_url.clone()),
        config.translate_api_key.clone(),
    );

    let cache = connect_cache(&config.cache_url).await?;

    let composer = FeedComposer::new(Arc::new(feeds), Arc::new(translator), cache)
        .with_cache_ttl(config.cache_ttl_secs);

    let app = server::router(Arc::new(composer));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
