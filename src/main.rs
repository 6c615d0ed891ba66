// src/main.rs

use skydive_booking::config::AppConfig;
use skydive_booking::errors::AppError;
use skydive_booking::state::AppState;
use skydive_booking::store::{PgStore, Store};
use skydive_booking::web;

use actix_web::{web as actix_data, App, HttpServer};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting skydive booking server...");

  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  // Connect the entity store; the schema is created on first startup.
  let store: Arc<dyn Store> = match PgStore::connect(&app_config.database_url).await {
    Ok(pg) => {
      tracing::info!("Successfully connected to the database.");
      Arc::new(pg)
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  // Create AppState
  let app_state = AppState {
    store: store.clone(),
    config: app_config.clone(),
  };

  // Configure and start the Actix Web server
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  let result = HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      // Malformed JSON bodies answer with the standard rejection envelope
      // instead of a bare 400.
      .app_data(actix_data::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(err.to_string()).into()
      }))
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await;

  // Graceful shutdown: the server has stopped accepting requests, release
  // the store before exiting.
  store.close().await;
  tracing::info!("Server stopped.");

  result
}
