// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Two-line postal address, stored as a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
  #[serde(default)]
  pub line1: String,
  #[serde(default)]
  pub line2: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub phone: Option<String>,
  pub address: Option<Address>,
  pub dob: Option<String>,
  pub gender: Option<String>,
  pub image: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl User {
  pub fn new(name: String, email: String, password_hash: String) -> Self {
    Self {
      id: Uuid::new_v4(),
      name,
      email,
      password_hash,
      phone: None,
      address: None,
      dob: None,
      gender: None,
      image: None,
      created_at: Utc::now(),
    }
  }
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserProfileUpdate {
  pub name: Option<String>,
  pub phone: Option<String>,
  pub address: Option<Address>,
  pub dob: Option<String>,
  pub gender: Option<String>,
  pub image: Option<String>,
}

impl UserProfileUpdate {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.phone.is_none()
      && self.address.is_none()
      && self.dob.is_none()
      && self.gender.is_none()
      && self.image.is_none()
  }
}

/// Password-free copy of a user profile embedded in a booking at creation
/// time, so historical bookings render independently of later profile edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSnapshot {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dob: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub gender: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
}

impl From<&User> for UserSnapshot {
  fn from(user: &User) -> Self {
    Self {
      id: user.id,
      name: user.name.clone(),
      email: user.email.clone(),
      phone: user.phone.clone(),
      dob: user.dob.clone(),
      gender: user.gender.clone(),
      image: user.image.clone(),
    }
  }
}
