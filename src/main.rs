use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recall_notebook::clock::SystemClock;
use recall_notebook::config::Settings;
use recall_notebook::notebook::Notebook;
use recall_notebook::state::AppState;
use recall_notebook::store::SqliteStore;
use recall_notebook::{handlers, profiling};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "recall_notebook=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  // Initialize profiling (no-op if feature disabled)
  profiling::init();

  let settings = Settings::load();
  let store = SqliteStore::open(&settings.database_path).expect("Failed to open database");
  let notebook = Notebook::new(store, SystemClock);
  tracing::info!(
    "Notebook at {} ({} check mode)",
    settings.database_path.display(),
    settings.check_mode.as_str()
  );

  let app = handlers::router(AppState::new(notebook, settings.check_mode))
    .layer(TraceLayer::new_for_http());

  let bind_addr = settings.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", settings.port);

  axum::serve(listener, app)
    .with_graceful_shutdown(async {
      let _ = tokio::signal::ctrl_c().await;
      tracing::info!("Shutting down");
    })
    .await
    .expect("Server failed to start");

  profiling::shutdown();
}
