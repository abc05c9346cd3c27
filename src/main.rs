use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spelling_bee::{config::AppConfig, db, routes, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "spelling_bee=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = AppConfig::load();
  let pool = db::init_db(&config.database_path).expect("Failed to initialize database");
  let bind_addr = config.server_bind_addr();
  let port = config.server_port;

  let state = AppState::new(config, pool);

  // Load the word list up front so a missing file is reported at startup
  let snapshot = state.catalog.snapshot();
  if let Some(warning) = &snapshot.warning {
    tracing::warn!("Starting with an empty word list: {}", warning);
  }

  let app = routes::build_router(state);

  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
