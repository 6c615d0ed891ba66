// src/web/handlers/instructor_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Address, BookingView, InstructorProfileUpdate, InstructorPublic};
use crate::services::auth_service::{self, Role};
use crate::services::booking_service::{self, BookingActor};
use crate::services::dashboard_service;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedInstructor;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct LoginRequestPayload {
  pub email: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BookingIdPayload {
  pub booking_id: Uuid,
}

#[derive(Deserialize, Debug)]
pub struct UpdateProfilePayload {
  pub fees: Option<f64>,
  pub address: Option<Address>,
  pub available: Option<bool>,
}

// --- Handler Implementations ---

#[instrument(name = "handler::login_instructor", skip(app_state, payload), fields(req_email = %payload.email))]
pub async fn login_instructor(
  app_state: web::Data<AppState>,
  payload: web::Json<LoginRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let instructor = app_state
    .store
    .instructor_by_email(&payload.email)
    .await?
    .ok_or_else(|| AppError::Auth("Invalid credentials".to_string()))?;

  if !auth_service::verify_password(&instructor.password_hash, &payload.password)? {
    return Err(AppError::Auth("Invalid credentials".to_string()));
  }

  let token = auth_service::issue_token(&app_state.config.jwt_secret, &instructor.id.to_string(), Role::Instructor)?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "token": token })))
}

#[instrument(name = "handler::instructor_bookings", skip(app_state, auth), fields(instructor_id = %auth.instructor_id))]
pub async fn bookings(
  app_state: web::Data<AppState>,
  auth: AuthenticatedInstructor,
) -> Result<HttpResponse, AppError> {
  let bookings = app_state.store.bookings_by_instructor(auth.instructor_id).await?;
  let views: Vec<BookingView> = bookings.iter().map(BookingView::from).collect();
  Ok(HttpResponse::Ok().json(json!({ "success": true, "bookings": views })))
}

#[instrument(
  name = "handler::cancel_booking_instructor",
  skip(app_state, auth, payload),
  fields(instructor_id = %auth.instructor_id, booking_id = %payload.booking_id)
)]
pub async fn cancel_booking(
  app_state: web::Data<AppState>,
  auth: AuthenticatedInstructor,
  payload: web::Json<BookingIdPayload>,
) -> Result<HttpResponse, AppError> {
  booking_service::cancel_booking(
    app_state.store.as_ref(),
    BookingActor::Instructor(auth.instructor_id),
    payload.booking_id,
  )
  .await?;

  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Booking Cancelled" })))
}

#[instrument(
  name = "handler::complete_booking",
  skip(app_state, auth, payload),
  fields(instructor_id = %auth.instructor_id, booking_id = %payload.booking_id)
)]
pub async fn complete_booking(
  app_state: web::Data<AppState>,
  auth: AuthenticatedInstructor,
  payload: web::Json<BookingIdPayload>,
) -> Result<HttpResponse, AppError> {
  booking_service::complete_booking(app_state.store.as_ref(), auth.instructor_id, payload.booking_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Booking Completed" })))
}

// Public storefront listing; no token required, emails stay hidden.
#[instrument(name = "handler::instructor_list", skip(app_state))]
pub async fn list(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let instructors = app_state.store.list_instructors().await?;
  let public: Vec<InstructorPublic> = instructors.iter().map(InstructorPublic::from).collect();
  Ok(HttpResponse::Ok().json(json!({ "success": true, "instructors": public })))
}

#[instrument(name = "handler::change_availability_instructor", skip(app_state, auth), fields(instructor_id = %auth.instructor_id))]
pub async fn change_availability(
  app_state: web::Data<AppState>,
  auth: AuthenticatedInstructor,
) -> Result<HttpResponse, AppError> {
  booking_service::toggle_availability(app_state.store.as_ref(), auth.instructor_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Availability Changed" })))
}

#[instrument(name = "handler::instructor_dashboard", skip(app_state, auth), fields(instructor_id = %auth.instructor_id))]
pub async fn dashboard(
  app_state: web::Data<AppState>,
  auth: AuthenticatedInstructor,
) -> Result<HttpResponse, AppError> {
  let dash_data = dashboard_service::instructor_dashboard(app_state.store.as_ref(), auth.instructor_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "dashData": dash_data })))
}

#[instrument(name = "handler::instructor_profile", skip(app_state, auth), fields(instructor_id = %auth.instructor_id))]
pub async fn profile(
  app_state: web::Data<AppState>,
  auth: AuthenticatedInstructor,
) -> Result<HttpResponse, AppError> {
  let instructor = app_state
    .store
    .instructor_by_id(auth.instructor_id)
    .await?
    .ok_or_else(|| AppError::NotFound("Instructor not found".to_string()))?;

  Ok(HttpResponse::Ok().json(json!({ "success": true, "profileData": instructor })))
}

#[instrument(name = "handler::update_instructor_profile", skip(app_state, auth, payload), fields(instructor_id = %auth.instructor_id))]
pub async fn update_profile(
  app_state: web::Data<AppState>,
  auth: AuthenticatedInstructor,
  payload: web::Json<UpdateProfilePayload>,
) -> Result<HttpResponse, AppError> {
  let UpdateProfilePayload { fees, address, available } = payload.into_inner();

  let update = InstructorProfileUpdate { fees, address, available };
  app_state
    .store
    .update_instructor_profile(auth.instructor_id, &update)
    .await?;

  Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Profile Updated" })))
}
