// src/web/handlers/admin_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Address, BookingView, Instructor, Package};
use crate::services::auth_service::{self, Role};
use crate::services::booking_service::{self, BookingActor};
use crate::services::dashboard_service;
use crate::state::AppState;
use crate::store::DUPLICATE_EMAIL;
use crate::web::extractors::AdminPrincipal;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct AdminLoginPayload {
  pub email: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct AddInstructorPayload {
  pub name: Option<String>,
  pub email: Option<String>,
  pub password: Option<String>,
  pub experience: Option<String>,
  pub about: Option<String>,
  pub fees: Option<f64>,
  /// JSON-encoded address document, as submitted by the admin form.
  pub address: Option<String>,
  pub image: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct AddPackagePayload {
  pub name: Option<String>,
  pub price: Option<f64>,
  pub altitude: Option<i32>,
  pub difficulty: Option<String>,
  pub weather: Option<String>,
  pub features: Option<Vec<String>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingPayload {
  pub booking_id: Uuid,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAvailabilityPayload {
  pub instructor_id: Uuid,
}

// --- Handler Implementations ---

// The admin principal is checked against the configured credential pair;
// there is no admin record in the entity store.
#[instrument(name = "handler::login_admin", skip(app_state, payload), fields(req_email = %payload.email))]
pub async fn login_admin(
  app_state: web::Data<AppState>,
  payload: web::Json<AdminLoginPayload>,
) -> Result<HttpResponse, AppError> {
  if payload.email != app_state.config.admin_email || payload.password != app_state.config.admin_password {
    warn!("Admin login rejected.");
    return Err(AppError::Auth("Invalid credentials".to_string()));
  }

  let token = auth_service::issue_token(&app_state.config.jwt_secret, "admin", Role::Admin)?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "token": token })))
}

#[instrument(name = "handler::add_instructor", skip(app_state, _admin, payload))]
pub async fn add_instructor(
  app_state: web::Data<AppState>,
  _admin: AdminPrincipal,
  payload: web::Json<AddInstructorPayload>,
) -> Result<HttpResponse, AppError> {
  let AddInstructorPayload {
    name,
    email,
    password,
    experience,
    about,
    fees,
    address,
    image,
  } = payload.into_inner();

  let (name, email, password, experience, about, fees, address) =
    match (name, email, password, experience, about, fees, address) {
      (Some(name), Some(email), Some(password), Some(experience), Some(about), Some(fees), Some(address))
        if !name.trim().is_empty() && !email.trim().is_empty() =>
      {
        (name, email, password, experience, about, fees, address)
      }
      _ => return Err(AppError::Validation("Missing Details".to_string())),
    };

  if !email.contains('@') {
    return Err(AppError::Validation("Please enter a valid email".to_string()));
  }
  if password.len() < 8 {
    return Err(AppError::Validation("Please enter a strong password".to_string()));
  }

  let address: Address =
    serde_json::from_str(&address).map_err(|e| AppError::Validation(format!("Invalid address payload: {}", e)))?;

  if app_state.store.instructor_by_email(&email).await?.is_some() {
    return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
  }

  let password_hash = auth_service::hash_password(&password)?;
  let instructor = Instructor::new(name, email, password_hash, image, about, experience, fees, address);
  app_state.store.insert_instructor(&instructor).await?;

  info!(instructor_id = %instructor.id, "Instructor added.");
  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Instructor Added" })))
}

#[instrument(name = "handler::add_package", skip(app_state, _admin, payload))]
pub async fn add_package(
  app_state: web::Data<AppState>,
  _admin: AdminPrincipal,
  payload: web::Json<AddPackagePayload>,
) -> Result<HttpResponse, AppError> {
  let AddPackagePayload {
    name,
    price,
    altitude,
    difficulty,
    weather,
    features,
  } = payload.into_inner();

  let (name, price, altitude, difficulty, weather, features) =
    match (name, price, altitude, difficulty, weather, features) {
      (Some(name), Some(price), Some(altitude), Some(difficulty), Some(weather), Some(features))
        if !name.trim().is_empty() =>
      {
        (name, price, altitude, difficulty, weather, features)
      }
      _ => return Err(AppError::Validation("Missing Details".to_string())),
    };

  let package = Package::new(name, price, altitude, difficulty, weather, features);
  app_state.store.insert_package(&package).await?;

  info!(package_id = %package.id, "Package added.");
  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Package Added Successfully" })))
}

#[instrument(name = "handler::all_instructors", skip(app_state, _admin))]
pub async fn all_instructors(
  app_state: web::Data<AppState>,
  _admin: AdminPrincipal,
) -> Result<HttpResponse, AppError> {
  let instructors = app_state.store.list_instructors().await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "instructors": instructors })))
}

#[instrument(name = "handler::bookings_admin", skip(app_state, _admin))]
pub async fn bookings_admin(
  app_state: web::Data<AppState>,
  _admin: AdminPrincipal,
) -> Result<HttpResponse, AppError> {
  let bookings = app_state.store.list_bookings().await?;
  let views: Vec<BookingView> = bookings.iter().map(BookingView::from).collect();
  Ok(HttpResponse::Ok().json(json!({ "success": true, "bookings": views })))
}

#[instrument(name = "handler::cancel_booking_admin", skip(app_state, _admin, payload), fields(booking_id = %payload.booking_id))]
pub async fn cancel_booking(
  app_state: web::Data<AppState>,
  _admin: AdminPrincipal,
  payload: web::Json<CancelBookingPayload>,
) -> Result<HttpResponse, AppError> {
  booking_service::cancel_booking(app_state.store.as_ref(), BookingActor::Admin, payload.booking_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Booking Cancelled" })))
}

#[instrument(name = "handler::change_availability_admin", skip(app_state, _admin, payload), fields(instructor_id = %payload.instructor_id))]
pub async fn change_availability(
  app_state: web::Data<AppState>,
  _admin: AdminPrincipal,
  payload: web::Json<ChangeAvailabilityPayload>,
) -> Result<HttpResponse, AppError> {
  booking_service::toggle_availability(app_state.store.as_ref(), payload.instructor_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Availability Changed" })))
}

#[instrument(name = "handler::admin_dashboard", skip(app_state, _admin))]
pub async fn dashboard(app_state: web::Data<AppState>, _admin: AdminPrincipal) -> Result<HttpResponse, AppError> {
  let dash_data = dashboard_service::admin_dashboard(app_state.store.as_ref()).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "dashData": dash_data })))
}
