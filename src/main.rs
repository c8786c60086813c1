use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sec_reviewer::{
  app,
  config::{Settings, StorageBackend},
  content::ContentLibrary,
  state::{AppState, SharedStore},
  store::{MemoryStore, SqliteStore},
};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sec_reviewer=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let settings = Settings::load();

  let store: SharedStore = match &settings.storage {
    StorageBackend::Sqlite(path) => {
      Arc::new(SqliteStore::open(path).expect("Failed to open progress database"))
    }
    StorageBackend::Memory => {
      tracing::warn!("Using in-memory progress store; progress is lost on restart");
      Arc::new(MemoryStore::new())
    }
  };

  let library = ContentLibrary::load(&settings.content_dir).expect("Failed to load topic decks");

  let app = app::router(AppState::new(store, library));

  let bind_addr = settings.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://{}", bind_addr);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
