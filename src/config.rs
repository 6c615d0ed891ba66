// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  /// Shared HS256 signing secret; rotating it invalidates every issued token.
  pub jwt_secret: String,

  // The admin principal is a configured credential pair, not a store record.
  pub admin_email: String,
  pub admin_password: String,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "4000".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let jwt_secret = get_env("JWT_SECRET")?;

    let admin_email = get_env("ADMIN_EMAIL").unwrap_or_else(|_| "sky@example.com".to_string());
    let admin_password = get_env("ADMIN_PASSWORD").unwrap_or_else(|_| "1234567".to_string());

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      jwt_secret,
      admin_email,
      admin_password,
    })
  }
}
