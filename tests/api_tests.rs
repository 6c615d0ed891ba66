// tests/api_tests.rs

//! HTTP-level tests: the REST surface, the role-scoped token headers, and
//! the flat `{success, message, ...}` envelope (always HTTP 200, callers
//! inspect `success`). State is an in-memory store shared across calls.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

use skydive_booking::config::AppConfig;
use skydive_booking::state::AppState;
use skydive_booking::store::MemoryStore;
use skydive_booking::web::configure_app_routes;

fn test_state() -> AppState {
  AppState {
    store: Arc::new(MemoryStore::new()),
    config: Arc::new(AppConfig {
      server_host: "127.0.0.1".to_string(),
      server_port: 0,
      database_url: "postgres://unused".to_string(),
      jwt_secret: "test-secret".to_string(),
      admin_email: "sky@example.com".to_string(),
      admin_password: "1234567".to_string(),
    }),
  }
}

/// Runs one request against a service wired to `state` and returns the
/// status plus the decoded JSON body.
async fn call(state: &AppState, req: test::TestRequest) -> (StatusCode, Value) {
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;
  let resp = test::call_service(&app, req.to_request()).await;
  let status = resp.status();
  let body: Value = test::read_body_json(resp).await;
  (status, body)
}

async fn register_user(state: &AppState, name: &str, email: &str, password: &str) -> String {
  let (status, body) = call(
    state,
    test::TestRequest::post()
      .uri("/api/user/register")
      .set_json(json!({ "name": name, "email": email, "password": password })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["success"], json!(true), "register failed: {}", body);
  body["token"].as_str().unwrap().to_string()
}

async fn admin_token(state: &AppState) -> String {
  let (_, body) = call(
    state,
    test::TestRequest::post()
      .uri("/api/admin/login")
      .set_json(json!({ "email": "sky@example.com", "password": "1234567" })),
  )
  .await;
  assert_eq!(body["success"], json!(true), "admin login failed: {}", body);
  body["token"].as_str().unwrap().to_string()
}

/// Adds an instructor through the admin API and returns (id, itoken).
async fn add_instructor(state: &AppState, email: &str, fees: f64) -> (String, String) {
  let atoken = admin_token(state).await;
  let (_, body) = call(
    state,
    test::TestRequest::post()
      .uri("/api/admin/add-instructor")
      .insert_header(("atoken", atoken.as_str()))
      .set_json(json!({
        "name": "Mike Johnson",
        "email": email,
        "password": "airborne-123",
        "experience": "8 years",
        "about": "Tandem and freefall",
        "fees": fees,
        "address": "{\"line1\":\"Hangar 3\",\"line2\":\"Dropzone Rd\"}",
      })),
  )
  .await;
  assert_eq!(body["success"], json!(true), "add-instructor failed: {}", body);

  let (_, listing) = call(state, test::TestRequest::get().uri("/api/doctor/list")).await;
  let id = listing["instructors"]
    .as_array()
    .unwrap()
    .iter()
    .find(|i| i["name"] == json!("Mike Johnson"))
    .unwrap()["id"]
    .as_str()
    .unwrap()
    .to_string();

  let (_, login) = call(
    state,
    test::TestRequest::post()
      .uri("/api/doctor/login")
      .set_json(json!({ "email": email, "password": "airborne-123" })),
  )
  .await;
  assert_eq!(login["success"], json!(true), "instructor login failed: {}", login);

  (id, login["token"].as_str().unwrap().to_string())
}

async fn book_slot(state: &AppState, token: &str, instructor_id: &str, slot_date: &str, slot_time: &str) -> Value {
  let (_, body) = call(
    state,
    test::TestRequest::post()
      .uri("/api/user/booking")
      .insert_header(("token", token))
      .set_json(json!({ "instrId": instructor_id, "slotDate": slot_date, "slotTime": slot_time })),
  )
  .await;
  body
}

#[actix_web::test]
async fn liveness_route_answers_in_plain_text() {
  let state = test_state();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(state.clone()))
      .configure(configure_app_routes),
  )
  .await;
  let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = test::read_body(resp).await;
  assert_eq!(body, actix_web::web::Bytes::from_static(b"API Working"));
}

#[actix_web::test]
async fn register_rejects_invalid_input() {
  let state = test_state();

  let (status, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/user/register")
      .set_json(json!({ "name": "Jamie", "email": "jamie@example.com" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK); // Logical failures still answer 200
  assert_eq!(body["success"], json!(false));
  assert_eq!(body["message"], json!("Missing Details"));

  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/user/register")
      .set_json(json!({ "name": "Jamie", "email": "not-an-email", "password": "longenough" })),
  )
  .await;
  assert_eq!(body["message"], json!("Please enter a valid email"));

  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/user/register")
      .set_json(json!({ "name": "Jamie", "email": "jamie@example.com", "password": "short" })),
  )
  .await;
  assert_eq!(body["message"], json!("Please enter a strong password"));
}

#[actix_web::test]
async fn register_login_and_profile_flow() {
  let state = test_state();
  let token = register_user(&state, "Jamie Fields", "jamie@example.com", "chute-happens").await;

  // Second registration under the same email trips the uniqueness constraint.
  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/user/register")
      .set_json(json!({ "name": "Imposter", "email": "jamie@example.com", "password": "chute-happens" })),
  )
  .await;
  assert_eq!(body["success"], json!(false));
  assert_eq!(body["message"], json!("An account with this email already exists."));

  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/user/login")
      .set_json(json!({ "email": "jamie@example.com", "password": "wrong-password" })),
  )
  .await;
  assert_eq!(body["message"], json!("Invalid credentials"));

  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/user/login")
      .set_json(json!({ "email": "nobody@example.com", "password": "whatever-123" })),
  )
  .await;
  assert_eq!(body["message"], json!("User does not exist"));

  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/user/get-profile")
      .insert_header(("token", token.as_str())),
  )
  .await;
  assert_eq!(body["success"], json!(true));
  assert_eq!(body["userData"]["name"], json!("Jamie Fields"));
  // The password hash never leaves the server.
  assert!(body["userData"].get("passwordHash").is_none());
  assert!(body["userData"].get("password").is_none());

  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/user/update-profile")
      .insert_header(("token", token.as_str()))
      .set_json(json!({})),
  )
  .await;
  assert_eq!(body["message"], json!("Data Missing"));

  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/user/update-profile")
      .insert_header(("token", token.as_str()))
      .set_json(json!({
        "phone": "555-0100",
        "address": "{\"line1\":\"12 Cloud St\",\"line2\":\"\"}",
        "gender": "non-binary",
      })),
  )
  .await;
  assert_eq!(body["message"], json!("Profile Updated"));

  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/user/get-profile")
      .insert_header(("token", token.as_str())),
  )
  .await;
  assert_eq!(body["userData"]["phone"], json!("555-0100"));
  assert_eq!(body["userData"]["address"]["line1"], json!("12 Cloud St"));
}

#[actix_web::test]
async fn tokens_are_role_scoped() {
  let state = test_state();
  let user_token = register_user(&state, "Jamie", "jamie@example.com", "chute-happens").await;
  let atoken = admin_token(&state).await;

  // No token at all.
  let (status, body) = call(&state, test::TestRequest::get().uri("/api/user/get-profile")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["success"], json!(false));
  assert_eq!(body["message"], json!("Not Authorized. Login Again"));

  // An admin token in the user header is not a user token.
  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/user/get-profile")
      .insert_header(("token", atoken.as_str())),
  )
  .await;
  assert_eq!(body["message"], json!("Not Authorized. Login Again"));

  // A user token in the admin header is not an admin token.
  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/admin/bookings")
      .insert_header(("atoken", user_token.as_str())),
  )
  .await;
  assert_eq!(body["message"], json!("Not Authorized. Login Again"));

  // Nor is it an instructor token.
  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/doctor/bookings")
      .insert_header(("itoken", user_token.as_str())),
  )
  .await;
  assert_eq!(body["message"], json!("Not Authorized. Login Again"));
}

#[actix_web::test]
async fn admin_login_requires_the_configured_pair() {
  let state = test_state();

  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/admin/login")
      .set_json(json!({ "email": "sky@example.com", "password": "nope" })),
  )
  .await;
  assert_eq!(body["success"], json!(false));
  assert_eq!(body["message"], json!("Invalid credentials"));

  let token = admin_token(&state).await;
  assert!(!token.is_empty());
}

#[actix_web::test]
async fn slot_booking_end_to_end() {
  let state = test_state();
  let (instructor_id, _itoken) = add_instructor(&state, "mike@example.com", 150.0).await;
  let token = register_user(&state, "Jamie", "jamie@example.com", "chute-happens").await;

  // The public listing hides credentials.
  let (_, listing) = call(&state, test::TestRequest::get().uri("/api/doctor/list")).await;
  let entry = &listing["instructors"][0];
  assert!(entry.get("email").is_none());
  assert!(entry.get("passwordHash").is_none());

  let body = book_slot(&state, &token, &instructor_id, "2024-01-10", "10:00").await;
  assert_eq!(body["success"], json!(true));
  assert_eq!(body["message"], json!("Booking Created"));

  // The same (instructor, date, time) triple is now taken.
  let body = book_slot(&state, &token, &instructor_id, "2024-01-10", "10:00").await;
  assert_eq!(body["success"], json!(false));
  assert_eq!(body["message"], json!("Slot Not Available"));

  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/user/listBookings")
      .insert_header(("token", token.as_str())),
  )
  .await;
  let bookings = body["bookings"].as_array().unwrap();
  assert_eq!(bookings.len(), 1);
  assert_eq!(bookings[0]["amount"], json!(150.0));
  assert_eq!(bookings[0]["status"], json!("pending"));
  assert_eq!(bookings[0]["cancelled"], json!(false));
  assert_eq!(bookings[0]["instructorData"]["name"], json!("Mike Johnson"));
  let booking_id = bookings[0]["id"].as_str().unwrap().to_string();

  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/user/cancel-appointment")
      .insert_header(("token", token.as_str()))
      .set_json(json!({ "bookingId": booking_id })),
  )
  .await;
  assert_eq!(body["message"], json!("Booking Cancelled"));

  // Cancellation released the slot.
  let body = book_slot(&state, &token, &instructor_id, "2024-01-10", "10:00").await;
  assert_eq!(body["success"], json!(true));
}

#[actix_web::test]
async fn users_cannot_cancel_other_users_bookings() {
  let state = test_state();
  let (instructor_id, _) = add_instructor(&state, "mike@example.com", 150.0).await;
  let owner = register_user(&state, "Jamie", "jamie@example.com", "chute-happens").await;
  let stranger = register_user(&state, "Alex", "alex@example.com", "hook-knife-1").await;

  let body = book_slot(&state, &owner, &instructor_id, "2024-01-10", "10:00").await;
  assert_eq!(body["success"], json!(true));

  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/user/listBookings")
      .insert_header(("token", owner.as_str())),
  )
  .await;
  let booking_id = body["bookings"][0]["id"].as_str().unwrap().to_string();

  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/user/cancel-appointment")
      .insert_header(("token", stranger.as_str()))
      .set_json(json!({ "bookingId": booking_id })),
  )
  .await;
  assert_eq!(body["success"], json!(false));
  assert_eq!(body["message"], json!("Unauthorized action"));
}

#[actix_web::test]
async fn package_booking_is_unconditional() {
  let state = test_state();
  let token = register_user(&state, "Jamie", "jamie@example.com", "chute-happens").await;

  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/user/book-package")
      .insert_header(("token", token.as_str()))
      .set_json(json!({
        "packageId": "p1",
        "packageName": "Tandem Jump",
        "price": 299,
        "date": "2024-01-10",
        "time": "10:00",
        "location": "Dropzone",
        "instructor": "Mike Johnson",
      })),
  )
  .await;
  assert_eq!(body["success"], json!(true));
  assert_eq!(body["message"], json!("Package Booked Successfully"));

  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/user/listBookings")
      .insert_header(("token", token.as_str())),
  )
  .await;
  let booking = &body["bookings"][0];
  assert_eq!(booking["status"], json!("confirmed"));
  assert_eq!(booking["payment"], json!(false));
  assert_eq!(booking["isCompleted"], json!(false));
  assert_eq!(booking["cancelled"], json!(false));
  assert_eq!(booking["packageName"], json!("Tandem Jump"));
  assert_eq!(booking["location"], json!("Dropzone"));
  assert_eq!(booking["instructorData"]["name"], json!("Mike Johnson"));
}

#[actix_web::test]
async fn instructor_panel_flow() {
  let state = test_state();
  let (instructor_id, itoken) = add_instructor(&state, "mike@example.com", 150.0).await;
  let token = register_user(&state, "Jamie", "jamie@example.com", "chute-happens").await;

  let body = book_slot(&state, &token, &instructor_id, "2024-01-10", "10:00").await;
  assert_eq!(body["success"], json!(true));

  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/doctor/bookings")
      .insert_header(("itoken", itoken.as_str())),
  )
  .await;
  let booking_id = body["bookings"][0]["id"].as_str().unwrap().to_string();

  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/doctor/complete-booking")
      .insert_header(("itoken", itoken.as_str()))
      .set_json(json!({ "bookingId": booking_id })),
  )
  .await;
  assert_eq!(body["message"], json!("Booking Completed"));

  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/doctor/dashboard")
      .insert_header(("itoken", itoken.as_str())),
  )
  .await;
  assert_eq!(body["dashData"]["earnings"], json!(150.0));
  assert_eq!(body["dashData"]["bookings"], json!(1));
  assert_eq!(body["dashData"]["clients"], json!(1));

  // Self-service availability toggle closes the calendar.
  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/doctor/change-availability")
      .insert_header(("itoken", itoken.as_str())),
  )
  .await;
  assert_eq!(body["message"], json!("Availability Changed"));

  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/doctor/profile")
      .insert_header(("itoken", itoken.as_str())),
  )
  .await;
  assert_eq!(body["profileData"]["available"], json!(false));

  let body = book_slot(&state, &token, &instructor_id, "2024-01-11", "10:00").await;
  assert_eq!(body["message"], json!("Instructor Not Available"));

  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/doctor/update-profile")
      .insert_header(("itoken", itoken.as_str()))
      .set_json(json!({ "fees": 175.0, "available": true })),
  )
  .await;
  assert_eq!(body["message"], json!("Profile Updated"));

  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/doctor/profile")
      .insert_header(("itoken", itoken.as_str())),
  )
  .await;
  assert_eq!(body["profileData"]["fees"], json!(175.0));
  assert_eq!(body["profileData"]["available"], json!(true));
}

#[actix_web::test]
async fn admin_surface_counts_every_booking_record() {
  let state = test_state();
  let (instructor_id, _) = add_instructor(&state, "mike@example.com", 150.0).await;
  let token = register_user(&state, "Jamie", "jamie@example.com", "chute-happens").await;
  let atoken = admin_token(&state).await;

  for slot_time in ["10:00", "11:00"] {
    let body = book_slot(&state, &token, &instructor_id, "2024-01-10", slot_time).await;
    assert_eq!(body["success"], json!(true));
  }

  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/admin/bookings")
      .insert_header(("atoken", atoken.as_str())),
  )
  .await;
  let booking_id = body["bookings"][0]["id"].as_str().unwrap().to_string();

  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/admin/cancel-booking")
      .insert_header(("atoken", atoken.as_str()))
      .set_json(json!({ "bookingId": booking_id })),
  )
  .await;
  assert_eq!(body["message"], json!("Booking Cancelled"));

  // The cancelled record still counts.
  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/admin/dashboard")
      .insert_header(("atoken", atoken.as_str())),
  )
  .await;
  assert_eq!(body["dashData"]["bookings"], json!(2));
  assert_eq!(body["dashData"]["instructors"], json!(1));
  assert_eq!(body["dashData"]["clients"], json!(1));

  // The admin listing, unlike the storefront, includes instructor emails.
  let (_, body) = call(
    &state,
    test::TestRequest::get()
      .uri("/api/admin/all-instructors")
      .insert_header(("atoken", atoken.as_str())),
  )
  .await;
  assert_eq!(body["instructors"][0]["email"], json!("mike@example.com"));
  assert!(body["instructors"][0].get("password_hash").is_none());
}

#[actix_web::test]
async fn admin_curates_the_package_catalog() {
  let state = test_state();
  let atoken = admin_token(&state).await;

  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/admin/add-package")
      .insert_header(("atoken", atoken.as_str()))
      .set_json(json!({
        "name": "Tandem Jump",
        "price": 299.0,
        "altitude": 14000,
        "difficulty": "Beginner",
        "weather": "Clear skies",
        "features": ["Instructor attached", "Video package", "Certificate"],
      })),
  )
  .await;
  assert_eq!(body["message"], json!("Package Added Successfully"));

  // Missing fields are rejected before anything is stored.
  let (_, body) = call(
    &state,
    test::TestRequest::post()
      .uri("/api/admin/add-package")
      .insert_header(("atoken", atoken.as_str()))
      .set_json(json!({ "name": "Halfway Jump" })),
  )
  .await;
  assert_eq!(body["message"], json!("Missing Details"));

  // The catalog read is public.
  let (_, body) = call(&state, test::TestRequest::get().uri("/api/user/packages")).await;
  let packages = body["packages"].as_array().unwrap();
  assert_eq!(packages.len(), 1);
  assert_eq!(packages[0]["name"], json!("Tandem Jump"));
  assert_eq!(packages[0]["altitude"], json!(14000));
  assert_eq!(packages[0]["features"].as_array().unwrap().len(), 3);
}
