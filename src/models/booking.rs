// src/models/booking.rs

use crate::models::instructor::InstructorSnapshot;
use crate::models::user::UserSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// A booking moves through a single state machine; the `cancelled` and
/// `isCompleted` booleans the clients read are derived views of it. Legal
/// transitions: Pending/Confirmed may move to Cancelled or Completed; both
/// of those are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
  Pending,
  Confirmed,
  Cancelled,
  Completed,
}

impl BookingStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      BookingStatus::Pending => "pending",
      BookingStatus::Confirmed => "confirmed",
      BookingStatus::Cancelled => "cancelled",
      BookingStatus::Completed => "completed",
    }
  }

  pub fn from_str(s: &str) -> Self {
    match s {
      "confirmed" => BookingStatus::Confirmed,
      "cancelled" => BookingStatus::Cancelled,
      "completed" => BookingStatus::Completed,
      _ => BookingStatus::Pending,
    }
  }
}

/// The two shapes a booking can take. A slot booking consumes one entry in
/// the instructor's slot map; a package booking never touches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BookingKind {
  Slot {
    instructor_id: Uuid,
    slot_date: String,
    slot_time: String,
    user_snapshot: UserSnapshot,
    instructor_snapshot: InstructorSnapshot,
  },
  Package {
    package_id: String,
    package_name: String,
    location: String,
    /// Free-text display name; package bookings are not linked to a real
    /// instructor record.
    instructor_name: String,
    slot_date: String,
    slot_time: String,
  },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
  pub id: Uuid,
  pub user_id: Uuid,
  pub kind: BookingKind,
  pub amount: f64,
  pub status: BookingStatus,
  pub payment: bool,
  pub created_at: DateTime<Utc>,
}

impl Booking {
  pub fn instructor_id(&self) -> Option<Uuid> {
    match &self.kind {
      BookingKind::Slot { instructor_id, .. } => Some(*instructor_id),
      BookingKind::Package { .. } => None,
    }
  }
}

/// Wire view flattening the booking variant back into the camelCase envelope
/// the clients read, with `cancelled`/`isCompleted` derived from the status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
  pub id: Uuid,
  pub user_id: Uuid,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instructor_id: Option<Uuid>,
  pub slot_date: String,
  pub slot_time: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_data: Option<UserSnapshot>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub instructor_data: Option<serde_json::Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub package_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub package_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  pub amount: f64,
  pub date: DateTime<Utc>,
  pub status: BookingStatus,
  pub cancelled: bool,
  pub payment: bool,
  pub is_completed: bool,
}

impl From<&Booking> for BookingView {
  fn from(booking: &Booking) -> Self {
    let mut view = BookingView {
      id: booking.id,
      user_id: booking.user_id,
      instructor_id: None,
      slot_date: String::new(),
      slot_time: String::new(),
      user_data: None,
      instructor_data: None,
      package_id: None,
      package_name: None,
      location: None,
      amount: booking.amount,
      date: booking.created_at,
      status: booking.status,
      cancelled: booking.status == BookingStatus::Cancelled,
      payment: booking.payment,
      is_completed: booking.status == BookingStatus::Completed,
    };

    match &booking.kind {
      BookingKind::Slot {
        instructor_id,
        slot_date,
        slot_time,
        user_snapshot,
        instructor_snapshot,
      } => {
        view.instructor_id = Some(*instructor_id);
        view.slot_date = slot_date.clone();
        view.slot_time = slot_time.clone();
        view.user_data = Some(user_snapshot.clone());
        view.instructor_data = serde_json::to_value(instructor_snapshot).ok();
      }
      BookingKind::Package {
        package_id,
        package_name,
        location,
        instructor_name,
        slot_date,
        slot_time,
      } => {
        view.slot_date = slot_date.clone();
        view.slot_time = slot_time.clone();
        view.package_id = Some(package_id.clone());
        view.package_name = Some(package_name.clone());
        view.location = Some(location.clone());
        view.instructor_data = Some(json!({ "name": instructor_name }));
      }
    }

    view
  }
}
