//! Artemis Back binary entrypoint wiring the REST layer onto the relational,
//! document and key-value stores.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use artemis_back::{
    config::{AppConfig, KvConfig},
    dao::{
        kv::{KvStore, MemoryKvStore},
        mongodb::{self as mongo, MongoConfig},
        relational,
    },
    routes,
    services::initial_data,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();

    let db = relational::connect(&config.database_url)
        .await
        .context("connecting to the relational database")?;
    relational::ensure_schema(&db)
        .await
        .context("creating relational tables")?;

    let mongo_config = MongoConfig::from_uri(&config.mongo_uri, config.mongo_db.as_deref())
        .await
        .context("parsing MongoDB URI")?;
    let database = mongo::establish_connection(&mongo_config)
        .await
        .context("connecting to MongoDB")?;
    let games = mongo::games(database).await.context("preparing games collection")?;

    let kv_store = open_kv_store(&config.kv).await?;

    let port = config.port;
    let app_state = AppState::new(config, db, games, kv_store);
    initial_data::ensure_first_superuser(&app_state)
        .await
        .context("seeding the first superuser")?;

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Open the configured key-value backend.
async fn open_kv_store(config: &KvConfig) -> anyhow::Result<Arc<dyn KvStore>> {
    match config {
        KvConfig::Memory => {
            warn!("using the in-memory key-value store; items are lost on restart");
            Ok(Arc::new(MemoryKvStore::new()))
        }
        #[cfg(feature = "redis-store")]
        KvConfig::Redis { url } => {
            use artemis_back::dao::kv::redis::RedisKvStore;

            let store = RedisKvStore::connect(url).await.context("connecting to Redis")?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "redis-store"))]
        KvConfig::Redis { .. } => {
            anyhow::bail!("the Redis key-value backend requires the `redis-store` feature")
        }
        #[cfg(feature = "couch-store")]
        KvConfig::Couch {
            base_url,
            database,
            username,
            password,
        } => {
            use artemis_back::dao::kv::couchdb::{CouchConfig, CouchKvStore};

            let mut couch = CouchConfig::new(base_url.clone(), database.clone());
            if let (Some(username), Some(password)) = (username, password) {
                couch = couch.with_credentials(username.clone(), password.clone());
            }
            let store = CouchKvStore::connect(couch).await.context("connecting to CouchDB")?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "couch-store"))]
        KvConfig::Couch { .. } => {
            anyhow::bail!("the CouchDB key-value backend requires the `couch-store` feature")
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug,sqlx=warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
