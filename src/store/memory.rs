// src/store/memory.rs

//! In-memory [`Store`] backend. Reference semantics for the Postgres
//! implementation and the backend every test runs against; collections are
//! plain vectors behind `parking_lot` locks, so a slot reservation is one
//! write-lock section and therefore atomic.

use crate::errors::{AppError, Result};
use crate::models::{
  Booking, BookingStatus, Instructor, InstructorProfileUpdate, Package, User, UserProfileUpdate,
};
use crate::store::{SlotReservation, Store, DUPLICATE_EMAIL};
use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
  users: RwLock<Vec<User>>,
  instructors: RwLock<Vec<Instructor>>,
  packages: RwLock<Vec<Package>>,
  bookings: RwLock<Vec<Booking>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn insert_user(&self, user: &User) -> Result<()> {
    let mut users = self.users.write();
    if users.iter().any(|u| u.email == user.email) {
      return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
    }
    users.push(user.clone());
    Ok(())
  }

  async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
    Ok(self.users.read().iter().find(|u| u.email == email).cloned())
  }

  async fn user_by_id(&self, id: Uuid) -> Result<Option<User>> {
    Ok(self.users.read().iter().find(|u| u.id == id).cloned())
  }

  async fn update_user_profile(&self, id: Uuid, update: &UserProfileUpdate) -> Result<()> {
    let mut users = self.users.write();
    let user = users
      .iter_mut()
      .find(|u| u.id == id)
      .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    if let Some(name) = &update.name {
      user.name = name.clone();
    }
    if let Some(phone) = &update.phone {
      user.phone = Some(phone.clone());
    }
    if let Some(address) = &update.address {
      user.address = Some(address.clone());
    }
    if let Some(dob) = &update.dob {
      user.dob = Some(dob.clone());
    }
    if let Some(gender) = &update.gender {
      user.gender = Some(gender.clone());
    }
    if let Some(image) = &update.image {
      user.image = Some(image.clone());
    }
    Ok(())
  }

  async fn count_users(&self) -> Result<u64> {
    Ok(self.users.read().len() as u64)
  }

  async fn insert_instructor(&self, instructor: &Instructor) -> Result<()> {
    let mut instructors = self.instructors.write();
    if instructors.iter().any(|i| i.email == instructor.email) {
      return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
    }
    instructors.push(instructor.clone());
    Ok(())
  }

  async fn instructor_by_email(&self, email: &str) -> Result<Option<Instructor>> {
    Ok(self.instructors.read().iter().find(|i| i.email == email).cloned())
  }

  async fn instructor_by_id(&self, id: Uuid) -> Result<Option<Instructor>> {
    Ok(self.instructors.read().iter().find(|i| i.id == id).cloned())
  }

  async fn list_instructors(&self) -> Result<Vec<Instructor>> {
    Ok(self.instructors.read().clone())
  }

  async fn update_instructor_profile(&self, id: Uuid, update: &InstructorProfileUpdate) -> Result<()> {
    let mut instructors = self.instructors.write();
    let instructor = instructors
      .iter_mut()
      .find(|i| i.id == id)
      .ok_or_else(|| AppError::NotFound("Instructor not found".to_string()))?;
    if let Some(fees) = update.fees {
      instructor.fees = fees;
    }
    if let Some(address) = &update.address {
      instructor.address = address.clone();
    }
    if let Some(available) = update.available {
      instructor.available = available;
    }
    Ok(())
  }

  async fn toggle_availability(&self, id: Uuid) -> Result<bool> {
    let mut instructors = self.instructors.write();
    let instructor = instructors
      .iter_mut()
      .find(|i| i.id == id)
      .ok_or_else(|| AppError::NotFound("Instructor not found".to_string()))?;
    instructor.available = !instructor.available;
    Ok(instructor.available)
  }

  async fn reserve_slot(&self, id: Uuid, slot_date: &str, slot_time: &str) -> Result<SlotReservation> {
    let mut instructors = self.instructors.write();
    let instructor = instructors
      .iter_mut()
      .find(|i| i.id == id)
      .ok_or_else(|| AppError::NotFound("Instructor not found".to_string()))?;
    if !instructor.available {
      return Ok(SlotReservation::InstructorUnavailable);
    }
    let day = instructor.slots_booked.entry(slot_date.to_string()).or_default();
    if day.iter().any(|t| t == slot_time) {
      return Ok(SlotReservation::SlotTaken);
    }
    day.push(slot_time.to_string());
    Ok(SlotReservation::Reserved)
  }

  async fn release_slot(&self, id: Uuid, slot_date: &str, slot_time: &str) -> Result<()> {
    let mut instructors = self.instructors.write();
    if let Some(instructor) = instructors.iter_mut().find(|i| i.id == id) {
      if let Some(day) = instructor.slots_booked.get_mut(slot_date) {
        day.retain(|t| t != slot_time);
      }
    }
    Ok(())
  }

  async fn insert_package(&self, package: &Package) -> Result<()> {
    self.packages.write().push(package.clone());
    Ok(())
  }

  async fn list_packages(&self) -> Result<Vec<Package>> {
    Ok(self.packages.read().clone())
  }

  async fn insert_booking(&self, booking: &Booking) -> Result<()> {
    self.bookings.write().push(booking.clone());
    Ok(())
  }

  async fn booking_by_id(&self, id: Uuid) -> Result<Option<Booking>> {
    Ok(self.bookings.read().iter().find(|b| b.id == id).cloned())
  }

  async fn bookings_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>> {
    // Insertion order is creation order; newest first on the way out.
    Ok(
      self
        .bookings
        .read()
        .iter()
        .filter(|b| b.user_id == user_id)
        .rev()
        .cloned()
        .collect(),
    )
  }

  async fn bookings_by_instructor(&self, instructor_id: Uuid) -> Result<Vec<Booking>> {
    Ok(
      self
        .bookings
        .read()
        .iter()
        .filter(|b| b.instructor_id() == Some(instructor_id))
        .rev()
        .cloned()
        .collect(),
    )
  }

  async fn list_bookings(&self) -> Result<Vec<Booking>> {
    Ok(self.bookings.read().iter().rev().cloned().collect())
  }

  async fn set_booking_status(&self, id: Uuid, status: BookingStatus) -> Result<()> {
    let mut bookings = self.bookings.write();
    let booking = bookings
      .iter_mut()
      .find(|b| b.id == id)
      .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    booking.status = status;
    Ok(())
  }
}
