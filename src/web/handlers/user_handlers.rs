// src/web/handlers/user_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Address, BookingView, User, UserProfileUpdate};
use crate::services::auth_service::{self, Role};
use crate::services::booking_service::{self, BookingActor, PackageBookingRequest};
use crate::state::AppState;
use crate::store::DUPLICATE_EMAIL;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct RegisterRequestPayload {
  pub name: Option<String>,
  pub email: Option<String>,
  pub password: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequestPayload {
  pub email: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct UpdateProfilePayload {
  pub name: Option<String>,
  pub phone: Option<String>,
  /// JSON-encoded address document, as submitted by the profile form.
  pub address: Option<String>,
  pub dob: Option<String>,
  pub gender: Option<String>,
  pub image: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SlotBookingPayload {
  pub instr_id: Uuid,
  pub slot_date: String,
  pub slot_time: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PackageBookingPayload {
  pub package_id: Option<String>,
  pub package_name: Option<String>,
  pub price: Option<f64>,
  pub date: Option<String>,
  pub time: Option<String>,
  pub location: Option<String>,
  pub instructor: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingPayload {
  pub booking_id: Uuid,
}

// --- Handler Implementations ---

#[instrument(name = "handler::register_user", skip(app_state, payload))]
pub async fn register_user(
  app_state: web::Data<AppState>,
  payload: web::Json<RegisterRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let RegisterRequestPayload { name, email, password } = payload.into_inner();

  let (name, email, password) = match (name, email, password) {
    (Some(name), Some(email), Some(password))
      if !name.trim().is_empty() && !email.trim().is_empty() && !password.is_empty() =>
    {
      (name, email, password)
    }
    _ => return Err(AppError::Validation("Missing Details".to_string())),
  };

  if !email.contains('@') {
    return Err(AppError::Validation("Please enter a valid email".to_string()));
  }
  if password.len() < 8 {
    return Err(AppError::Validation("Please enter a strong password".to_string()));
  }

  if app_state.store.user_by_email(&email).await?.is_some() {
    return Err(AppError::Conflict(DUPLICATE_EMAIL.to_string()));
  }

  let password_hash = auth_service::hash_password(&password)?;
  let user = User::new(name, email, password_hash);
  app_state.store.insert_user(&user).await?;

  let token = auth_service::issue_token(&app_state.config.jwt_secret, &user.id.to_string(), Role::User)?;
  info!(user_id = %user.id, "User registered.");

  Ok(HttpResponse::Ok().json(json!({ "success": true, "token": token })))
}

#[instrument(name = "handler::login_user", skip(app_state, payload), fields(req_email = %payload.email))]
pub async fn login_user(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let user = app_state
    .store
    .user_by_email(&payload.email)
    .await?
    .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

  if !auth_service::verify_password(&user.password_hash, &payload.password)? {
    return Err(AppError::Auth("Invalid credentials".to_string()));
  }

  let token = auth_service::issue_token(&app_state.config.jwt_secret, &user.id.to_string(), Role::User)?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "token": token })))
}

#[instrument(name = "handler::get_profile", skip(app_state, auth), fields(user_id = %auth.user_id))]
pub async fn get_profile(
  app_state: web::Data<AppState>,
  auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = app_state
    .store
    .user_by_id(auth.user_id)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

  Ok(HttpResponse::Ok().json(json!({ "success": true, "userData": user })))
}

#[instrument(name = "handler::update_profile", skip(app_state, auth, payload), fields(user_id = %auth.user_id))]
pub async fn update_profile(
  app_state: web::Data<AppState>,
  auth: AuthenticatedUser,
  payload: web::Json<UpdateProfilePayload>,
) -> Result<HttpResponse, AppError> {
  let UpdateProfilePayload {
    name,
    phone,
    address,
    dob,
    gender,
    image,
  } = payload.into_inner();

  let address = address
    .map(|raw| serde_json::from_str::<Address>(&raw))
    .transpose()
    .map_err(|e| AppError::Validation(format!("Invalid address payload: {}", e)))?;

  let update = UserProfileUpdate {
    name,
    phone,
    address,
    dob,
    gender,
    image,
  };
  if update.is_empty() {
    return Err(AppError::Validation("Data Missing".to_string()));
  }

  app_state.store.update_user_profile(auth.user_id, &update).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Profile Updated" })))
}

#[instrument(name = "handler::list_packages", skip(app_state))]
pub async fn list_packages(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let packages = app_state.store.list_packages().await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "packages": packages })))
}

#[instrument(
  name = "handler::book_slot",
  skip(app_state, auth, payload),
  fields(user_id = %auth.user_id, instructor_id = %payload.instr_id)
)]
pub async fn book_slot(
  app_state: web::Data<AppState>,
  auth: AuthenticatedUser,
  payload: web::Json<SlotBookingPayload>,
) -> Result<HttpResponse, AppError> {
  booking_service::create_instructor_booking(
    app_state.store.as_ref(),
    auth.user_id,
    payload.instr_id,
    &payload.slot_date,
    &payload.slot_time,
  )
  .await?;

  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Booking Created" })))
}

#[instrument(name = "handler::book_package", skip(app_state, auth, payload), fields(user_id = %auth.user_id))]
pub async fn book_package(
  app_state: web::Data<AppState>,
  auth: AuthenticatedUser,
  payload: web::Json<PackageBookingPayload>,
) -> Result<HttpResponse, AppError> {
  let PackageBookingPayload {
    package_id,
    package_name,
    price,
    date,
    time,
    location,
    instructor,
  } = payload.into_inner();

  let (package_name, price) = match (package_name, price) {
    (Some(package_name), Some(price)) if !package_name.trim().is_empty() => (package_name, price),
    _ => return Err(AppError::Validation("Missing Details".to_string())),
  };

  let request = PackageBookingRequest {
    package_id: package_id.unwrap_or_default(),
    package_name,
    price,
    date: date.unwrap_or_default(),
    time: time.unwrap_or_default(),
    location: location.unwrap_or_default(),
    instructor_name: instructor.unwrap_or_default(),
  };

  booking_service::create_package_booking(app_state.store.as_ref(), auth.user_id, request).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Package Booked Successfully" })))
}

#[instrument(name = "handler::list_bookings", skip(app_state, auth), fields(user_id = %auth.user_id))]
pub async fn list_bookings(
  app_state: web::Data<AppState>,
  auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let bookings = app_state.store.bookings_by_user(auth.user_id).await?;
  let views: Vec<BookingView> = bookings.iter().map(BookingView::from).collect();

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "bookings": views,
    "userId": auth.user_id,
  })))
}

#[instrument(
  name = "handler::cancel_booking",
  skip(app_state, auth, payload),
  fields(user_id = %auth.user_id, booking_id = %payload.booking_id)
)]
pub async fn cancel_booking(
  app_state: web::Data<AppState>,
  auth: AuthenticatedUser,
  payload: web::Json<CancelBookingPayload>,
) -> Result<HttpResponse, AppError> {
  booking_service::cancel_booking(
    app_state.store.as_ref(),
    BookingActor::User(auth.user_id),
    payload.booking_id,
  )
  .await?;

  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Booking Cancelled" })))
}
