// src/services/dashboard_service.rs

//! Read-model aggregators for the admin and instructor dashboards. Pure
//! scans over the store, recomputed on every call; nothing is cached.

use crate::errors::Result;
use crate::models::{BookingStatus, BookingView};
use crate::store::Store;
use serde::Serialize;
use std::collections::HashSet;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
  pub instructors: usize,
  /// Total booking records, independent of their status flags.
  pub bookings: usize,
  pub clients: u64,
  pub latest_bookings: Vec<BookingView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorDashboard {
  pub earnings: f64,
  pub bookings: usize,
  pub clients: usize,
  pub latest_bookings: Vec<BookingView>,
}

#[instrument(name = "dashboard_service::admin_dashboard", skip(store))]
pub async fn admin_dashboard(store: &dyn Store) -> Result<AdminDashboard> {
  let instructors = store.list_instructors().await?;
  let bookings = store.list_bookings().await?; // Newest first
  let clients = store.count_users().await?;

  Ok(AdminDashboard {
    instructors: instructors.len(),
    bookings: bookings.len(),
    clients,
    latest_bookings: bookings.iter().map(BookingView::from).collect(),
  })
}

#[instrument(name = "dashboard_service::instructor_dashboard", skip(store), fields(%instructor_id))]
pub async fn instructor_dashboard(store: &dyn Store, instructor_id: Uuid) -> Result<InstructorDashboard> {
  let bookings = store.bookings_by_instructor(instructor_id).await?; // Newest first

  let earnings: f64 = bookings
    .iter()
    .filter(|b| b.status == BookingStatus::Completed || b.payment)
    .map(|b| b.amount)
    .sum();

  let clients: HashSet<Uuid> = bookings.iter().map(|b| b.user_id).collect();

  Ok(InstructorDashboard {
    earnings,
    bookings: bookings.len(),
    clients: clients.len(),
    latest_bookings: bookings.iter().map(BookingView::from).collect(),
  })
}
