// src/models/package.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Static catalog entity. Created by admin action and immutable afterwards;
/// there is no update or delete operation for packages.
#[derive(Debug, Clone, Serialize)]
pub struct Package {
  pub id: Uuid,
  pub name: String,
  pub price: f64,
  pub altitude: i32,
  pub difficulty: String,
  pub weather: String,
  pub features: Vec<String>,
  pub image: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Package {
  pub fn new(
    name: String,
    price: f64,
    altitude: i32,
    difficulty: String,
    weather: String,
    features: Vec<String>,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      name,
      price,
      altitude,
      difficulty,
      weather,
      features,
      image: None,
      created_at: Utc::now(),
    }
  }
}
