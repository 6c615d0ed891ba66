// src/store/mod.rs

//! The entity store seam. Handlers and services only see the [`Store`]
//! trait; the concrete backend is injected through `AppState` with an
//! explicit lifecycle (connect at startup, `close` at shutdown).

pub mod memory;
pub mod postgres;

use crate::errors::Result;
use crate::models::{
  Booking, BookingStatus, Instructor, InstructorProfileUpdate, Package, User, UserProfileUpdate,
};
use async_trait::async_trait;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Message surfaced when the per-collection email uniqueness constraint trips.
pub const DUPLICATE_EMAIL: &str = "An account with this email already exists.";

/// Outcome of an atomic slot reservation attempt. The availability gate and
/// the duplicate-slot check are evaluated inside the same store write, so two
/// racing requests for one (instructor, date, time) triple cannot both pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotReservation {
  Reserved,
  SlotTaken,
  InstructorUnavailable,
}

#[async_trait]
pub trait Store: Send + Sync {
  // --- Users ---
  async fn insert_user(&self, user: &User) -> Result<()>;
  async fn user_by_email(&self, email: &str) -> Result<Option<User>>;
  async fn user_by_id(&self, id: Uuid) -> Result<Option<User>>;
  async fn update_user_profile(&self, id: Uuid, update: &UserProfileUpdate) -> Result<()>;
  async fn count_users(&self) -> Result<u64>;

  // --- Instructors ---
  async fn insert_instructor(&self, instructor: &Instructor) -> Result<()>;
  async fn instructor_by_email(&self, email: &str) -> Result<Option<Instructor>>;
  async fn instructor_by_id(&self, id: Uuid) -> Result<Option<Instructor>>;
  async fn list_instructors(&self) -> Result<Vec<Instructor>>;
  async fn update_instructor_profile(&self, id: Uuid, update: &InstructorProfileUpdate) -> Result<()>;
  /// Flips the `available` flag and returns the new value.
  async fn toggle_availability(&self, id: Uuid) -> Result<bool>;

  // --- Slot bookkeeping (the one contended resource) ---
  async fn reserve_slot(&self, id: Uuid, slot_date: &str, slot_time: &str) -> Result<SlotReservation>;
  /// Filters `slot_time` out of the date's list. A no-op when the
  /// instructor, the date key, or the time entry is absent.
  async fn release_slot(&self, id: Uuid, slot_date: &str, slot_time: &str) -> Result<()>;

  // --- Packages ---
  async fn insert_package(&self, package: &Package) -> Result<()>;
  async fn list_packages(&self) -> Result<Vec<Package>>;

  // --- Bookings (never deleted, only re-flagged) ---
  async fn insert_booking(&self, booking: &Booking) -> Result<()>;
  async fn booking_by_id(&self, id: Uuid) -> Result<Option<Booking>>;
  /// Newest first.
  async fn bookings_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>>;
  /// Newest first.
  async fn bookings_by_instructor(&self, instructor_id: Uuid) -> Result<Vec<Booking>>;
  /// Newest first.
  async fn list_bookings(&self) -> Result<Vec<Booking>>;
  async fn set_booking_status(&self, id: Uuid, status: BookingStatus) -> Result<()>;

  /// Release backend resources. Default is a no-op for backends that have
  /// nothing to tear down.
  async fn close(&self) {}
}
