// src/models/instructor.rs

use crate::models::user::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Calendar-date string -> time strings already reserved on that date.
/// Invariant: within one date's list no time appears twice.
pub type SlotMap = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Serialize)]
pub struct Instructor {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub image: Option<String>,
  pub about: String,
  pub experience: String,
  pub fees: f64,
  pub address: Address,
  pub available: bool,
  pub slots_booked: SlotMap,
  pub created_at: DateTime<Utc>,
}

impl Instructor {
  #[allow(clippy::too_many_arguments)]
  pub fn new(
    name: String,
    email: String,
    password_hash: String,
    image: Option<String>,
    about: String,
    experience: String,
    fees: f64,
    address: Address,
  ) -> Self {
    Self {
      id: Uuid::new_v4(),
      name,
      email,
      password_hash,
      image,
      about,
      experience,
      fees,
      address,
      available: true,
      slots_booked: SlotMap::new(),
      created_at: Utc::now(),
    }
  }
}

/// Partial profile update driven by the instructor panel.
#[derive(Debug, Clone, Default)]
pub struct InstructorProfileUpdate {
  pub fees: Option<f64>,
  pub address: Option<Address>,
  pub available: Option<bool>,
}

/// Storefront view of an instructor: the listing endpoint is public, so the
/// email stays hidden along with the password hash. Serialized keys mirror
/// the stored document (`slots_booked` included, which the storefront uses
/// to grey out taken times).
#[derive(Debug, Clone, Serialize)]
pub struct InstructorPublic {
  pub id: Uuid,
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
  pub about: String,
  pub experience: String,
  pub fees: f64,
  pub address: Address,
  pub available: bool,
  pub slots_booked: SlotMap,
}

impl From<&Instructor> for InstructorPublic {
  fn from(instructor: &Instructor) -> Self {
    Self {
      id: instructor.id,
      name: instructor.name.clone(),
      image: instructor.image.clone(),
      about: instructor.about.clone(),
      experience: instructor.experience.clone(),
      fees: instructor.fees,
      address: instructor.address.clone(),
      available: instructor.available,
      slots_booked: instructor.slots_booked.clone(),
    }
  }
}

/// Password-free, slot-map-free copy embedded in a booking at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructorSnapshot {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
  pub about: String,
  pub experience: String,
  pub fees: f64,
  pub address: Address,
}

impl From<&Instructor> for InstructorSnapshot {
  fn from(instructor: &Instructor) -> Self {
    Self {
      id: instructor.id,
      name: instructor.name.clone(),
      email: instructor.email.clone(),
      image: instructor.image.clone(),
      about: instructor.about.clone(),
      experience: instructor.experience.clone(),
      fees: instructor.fees,
      address: instructor.address.clone(),
    }
  }
}
