use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flashdeck::config::Config;
use flashdeck::state::AppState;
use flashdeck::{db, handlers};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "flashdeck=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::load();

  let pool = db::init_db(config.database_path()).expect("Failed to initialize database");
  std::fs::create_dir_all(&config.uploads_dir).expect("Failed to create uploads directory");

  let app = handlers::router(AppState::from_config(pool, &config));

  let bind_addr = config.bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!(
    "Server running on http://localhost:{} (database: {}, uploads: {})",
    config.port,
    config.database_path().display(),
    config.uploads_dir.display()
  );

  axum::serve(listener, app).await.expect("Server error");
}
