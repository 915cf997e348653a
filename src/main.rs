//! Catalog server entrypoint wiring the REST routes to the configured blob store.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ludotheque::{
    config::AppConfig,
    dao::{
        blob_store::{BlobStore, InMemoryBlobStore},
        storage::StorageError,
    },
    routes,
    services::storage_supervisor,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config);

    start_storage(app_state.clone()).await?;
    let app = routes::app(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Which blob store backs the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StorageBackend {
    Memory,
    #[cfg(feature = "couch-store")]
    Couch,
    #[cfg(feature = "mongo-store")]
    Mongo,
}

impl StorageBackend {
    /// `STORAGE_BACKEND` wins; otherwise the presence of backend variables decides.
    fn from_env() -> anyhow::Result<Self> {
        match env::var("STORAGE_BACKEND").ok().as_deref().map(str::trim) {
            Some("memory") => Ok(Self::Memory),
            #[cfg(feature = "couch-store")]
            Some("couch") | Some("couchdb") => Ok(Self::Couch),
            #[cfg(feature = "mongo-store")]
            Some("mongo") | Some("mongodb") => Ok(Self::Mongo),
            Some(other) if !other.is_empty() => {
                anyhow::bail!("unsupported STORAGE_BACKEND `{other}`")
            }
            _ => Ok(Self::detect()),
        }
    }

    fn detect() -> Self {
        #[cfg(feature = "couch-store")]
        {
            if env::var_os("COUCH_BASE_URL").is_some() {
                return Self::Couch;
            }
        }
        #[cfg(feature = "mongo-store")]
        {
            if env::var_os("MONGO_URI").is_some() {
                return Self::Mongo;
            }
        }
        Self::Memory
    }
}

/// Install the in-memory store directly, or hand remote backends to the supervisor.
async fn start_storage(state: SharedState) -> anyhow::Result<()> {
    let backend = StorageBackend::from_env()?;
    info!(?backend, "selected storage backend");

    match backend {
        StorageBackend::Memory => {
            warn!("using in-memory storage; the collection is lost on restart");
            state
                .set_blob_store(Arc::new(InMemoryBlobStore::new()))
                .await;
        }
        #[cfg(feature = "couch-store")]
        StorageBackend::Couch => {
            use ludotheque::dao::blob_store::couchdb::{CouchBlobStore, CouchConfig};

            let config = CouchConfig::from_env().context("reading CouchDB configuration")?;
            tokio::spawn(storage_supervisor::run(state, move || {
                let config = config.clone();
                async move {
                    let store = CouchBlobStore::connect(config).await?;
                    Ok::<_, StorageError>(Arc::new(store) as Arc<dyn BlobStore>)
                }
            }));
        }
        #[cfg(feature = "mongo-store")]
        StorageBackend::Mongo => {
            use ludotheque::dao::blob_store::mongodb::{MongoBlobStore, MongoConfig};

            let config = MongoConfig::from_env()
                .await
                .context("reading MongoDB configuration")?;
            tokio::spawn(storage_supervisor::run(state, move || {
                let config = config.clone();
                async move {
                    let store = MongoBlobStore::connect(config).await?;
                    Ok::<_, StorageError>(Arc::new(store) as Arc<dyn BlobStore>)
                }
            }));
        }
    }

    Ok(())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
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

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
