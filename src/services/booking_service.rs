// src/services/booking_service.rs

//! The booking lifecycle manager: slot and package booking creation,
//! role-checked cancellation with slot release, completion, and the
//! availability toggle. All state lives behind the injected [`Store`].

use crate::errors::{AppError, Result};
use crate::models::{Booking, BookingKind, BookingStatus, InstructorSnapshot, UserSnapshot};
use crate::store::{SlotReservation, Store};
use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub const SLOT_NOT_AVAILABLE: &str = "Slot Not Available";
pub const INSTRUCTOR_NOT_AVAILABLE: &str = "Instructor Not Available";
pub const BOOKING_NOT_FOUND: &str = "Booking not found";
pub const UNAUTHORIZED_ACTION: &str = "Unauthorized action";

/// The principal performing a lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingActor {
  User(Uuid),
  Instructor(Uuid),
  Admin,
}

/// Input for a package booking; no availability or slot-conflict check
/// applies, and no instructor slot capacity is consumed.
#[derive(Debug, Clone)]
pub struct PackageBookingRequest {
  pub package_id: String,
  pub package_name: String,
  pub price: f64,
  pub date: String,
  pub time: String,
  pub location: String,
  pub instructor_name: String,
}

/// Books one instructor slot for a user.
///
/// The reservation is a single store-side write: availability and the
/// duplicate-slot check are evaluated together, so a concurrent request for
/// the same (instructor, date, time) triple loses cleanly with `SlotTaken`.
#[instrument(name = "booking_service::create_instructor_booking", skip(store), fields(%user_id, %instructor_id, slot_date, slot_time))]
pub async fn create_instructor_booking(
  store: &dyn Store,
  user_id: Uuid,
  instructor_id: Uuid,
  slot_date: &str,
  slot_time: &str,
) -> Result<Booking> {
  if slot_date.trim().is_empty() || slot_time.trim().is_empty() {
    return Err(AppError::Validation("Missing Details".to_string()));
  }

  let user = store
    .user_by_id(user_id)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

  match store.reserve_slot(instructor_id, slot_date, slot_time).await? {
    SlotReservation::Reserved => {}
    SlotReservation::SlotTaken => return Err(AppError::Conflict(SLOT_NOT_AVAILABLE.to_string())),
    SlotReservation::InstructorUnavailable => {
      return Err(AppError::Conflict(INSTRUCTOR_NOT_AVAILABLE.to_string()))
    }
  }

  // Holding the reservation; any failure past this point must hand it back.
  let instructor = match store.instructor_by_id(instructor_id).await {
    Ok(Some(instructor)) => instructor,
    Ok(None) => {
      release_reservation(store, instructor_id, slot_date, slot_time).await;
      return Err(AppError::NotFound("Instructor not found".to_string()));
    }
    Err(err) => {
      release_reservation(store, instructor_id, slot_date, slot_time).await;
      return Err(err);
    }
  };

  let booking = Booking {
    id: Uuid::new_v4(),
    user_id,
    kind: BookingKind::Slot {
      instructor_id,
      slot_date: slot_date.to_string(),
      slot_time: slot_time.to_string(),
      user_snapshot: UserSnapshot::from(&user),
      instructor_snapshot: InstructorSnapshot::from(&instructor),
    },
    amount: instructor.fees,
    status: BookingStatus::Pending,
    payment: false,
    created_at: Utc::now(),
  };

  if let Err(err) = store.insert_booking(&booking).await {
    release_reservation(store, instructor_id, slot_date, slot_time).await;
    return Err(err);
  }

  info!(booking_id = %booking.id, "Slot booking created.");
  Ok(booking)
}

async fn release_reservation(store: &dyn Store, instructor_id: Uuid, slot_date: &str, slot_time: &str) {
  if let Err(release_err) = store.release_slot(instructor_id, slot_date, slot_time).await {
    warn!(error = %release_err, %instructor_id, "Failed to hand back slot reservation after booking failure.");
  }
}

/// Books a fixed-content package. Always succeeds for well-formed input and
/// starts out `Confirmed` with payment pending.
#[instrument(name = "booking_service::create_package_booking", skip(store, request), fields(%user_id, package_name = %request.package_name))]
pub async fn create_package_booking(
  store: &dyn Store,
  user_id: Uuid,
  request: PackageBookingRequest,
) -> Result<Booking> {
  let booking = Booking {
    id: Uuid::new_v4(),
    user_id,
    kind: BookingKind::Package {
      package_id: request.package_id,
      package_name: request.package_name,
      location: request.location,
      instructor_name: request.instructor_name,
      slot_date: request.date,
      slot_time: request.time,
    },
    amount: request.price,
    status: BookingStatus::Confirmed,
    payment: false,
    created_at: Utc::now(),
  };

  store.insert_booking(&booking).await?;
  info!(booking_id = %booking.id, "Package booking created.");
  Ok(booking)
}

/// Cancels a booking on behalf of `actor`, releasing the reserved slot when
/// one was held. Re-cancelling an already-cancelled booking is an idempotent
/// success; a completed booking can no longer be cancelled.
#[instrument(name = "booking_service::cancel_booking", skip(store), fields(?actor, %booking_id))]
pub async fn cancel_booking(store: &dyn Store, actor: BookingActor, booking_id: Uuid) -> Result<()> {
  let booking = store
    .booking_by_id(booking_id)
    .await?
    .ok_or_else(|| AppError::NotFound(BOOKING_NOT_FOUND.to_string()))?;

  match actor {
    BookingActor::Admin => {}
    BookingActor::User(user_id) => {
      if booking.user_id != user_id {
        return Err(AppError::Auth(UNAUTHORIZED_ACTION.to_string()));
      }
    }
    BookingActor::Instructor(instructor_id) => {
      if booking.instructor_id() != Some(instructor_id) {
        return Err(AppError::Auth(UNAUTHORIZED_ACTION.to_string()));
      }
    }
  }

  match booking.status {
    BookingStatus::Cancelled => return Ok(()),
    BookingStatus::Completed => {
      return Err(AppError::Conflict("Booking already completed".to_string()))
    }
    BookingStatus::Pending | BookingStatus::Confirmed => {}
  }

  store.set_booking_status(booking_id, BookingStatus::Cancelled).await?;

  if let BookingKind::Slot {
    instructor_id,
    slot_date,
    slot_time,
    ..
  } = &booking.kind
  {
    store.release_slot(*instructor_id, slot_date, slot_time).await?;
  }

  info!(%booking_id, "Booking cancelled.");
  Ok(())
}

/// Marks a slot booking completed; only the instructor the booking
/// references may do this. The consumed slot is not freed.
#[instrument(name = "booking_service::complete_booking", skip(store), fields(%instructor_id, %booking_id))]
pub async fn complete_booking(store: &dyn Store, instructor_id: Uuid, booking_id: Uuid) -> Result<()> {
  let booking = store
    .booking_by_id(booking_id)
    .await?
    .ok_or_else(|| AppError::NotFound(BOOKING_NOT_FOUND.to_string()))?;

  if booking.instructor_id() != Some(instructor_id) {
    return Err(AppError::Auth(UNAUTHORIZED_ACTION.to_string()));
  }

  match booking.status {
    BookingStatus::Completed => return Ok(()),
    BookingStatus::Cancelled => {
      return Err(AppError::Conflict("Booking already cancelled".to_string()))
    }
    BookingStatus::Pending | BookingStatus::Confirmed => {}
  }

  store.set_booking_status(booking_id, BookingStatus::Completed).await?;
  info!(%booking_id, "Booking completed.");
  Ok(())
}

/// Flips an instructor's `available` flag. Existing bookings and reserved
/// slots are left untouched.
#[instrument(name = "booking_service::toggle_availability", skip(store), fields(%instructor_id))]
pub async fn toggle_availability(store: &dyn Store, instructor_id: Uuid) -> Result<bool> {
  let available = store.toggle_availability(instructor_id).await?;
  info!(%instructor_id, available, "Availability changed.");
  Ok(available)
}
