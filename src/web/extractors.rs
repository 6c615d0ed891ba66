// src/web/extractors.rs

//! Role-gated access layer. Each role authenticates through its own request
//! header and token namespace; none of the three is interchangeable with
//! another. Extraction failures surface as the standard rejection envelope.

use crate::errors::AppError;
use crate::services::auth_service::{self, Claims, Role, NOT_AUTHORIZED};
use crate::state::AppState;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future;
use uuid::Uuid;

pub const USER_TOKEN_HEADER: &str = "token";
pub const INSTRUCTOR_TOKEN_HEADER: &str = "itoken";
pub const ADMIN_TOKEN_HEADER: &str = "atoken";

/// A user principal resolved from the `token` header.
#[derive(Debug)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
}

/// An instructor principal resolved from the `itoken` header.
#[derive(Debug)]
pub struct AuthenticatedInstructor {
  pub instructor_id: Uuid,
}

/// The admin system principal, resolved from the `atoken` header. Admin
/// tokens prove knowledge of the configured credential pair and carry no
/// entity id.
#[derive(Debug)]
pub struct AdminPrincipal;

fn claims_from_request(req: &HttpRequest, header: &str, role: Role) -> Result<Claims, AppError> {
  let state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;

  let token = req
    .headers()
    .get(header)
    .and_then(|value| value.to_str().ok())
    .ok_or_else(|| AppError::Auth(NOT_AUTHORIZED.to_string()))?;

  auth_service::verify_token(&state.config.jwt_secret, token, role)
}

fn principal_id(claims: &Claims) -> Result<Uuid, AppError> {
  Uuid::parse_str(&claims.sub).map_err(|_| AppError::Auth(NOT_AUTHORIZED.to_string()))
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    future::ready(
      claims_from_request(req, USER_TOKEN_HEADER, Role::User)
        .and_then(|claims| principal_id(&claims).map(|user_id| AuthenticatedUser { user_id })),
    )
  }
}

impl FromRequest for AuthenticatedInstructor {
  type Error = AppError;
  type Future = future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    future::ready(
      claims_from_request(req, INSTRUCTOR_TOKEN_HEADER, Role::Instructor)
        .and_then(|claims| principal_id(&claims).map(|instructor_id| AuthenticatedInstructor { instructor_id })),
    )
  }
}

impl FromRequest for AdminPrincipal {
  type Error = AppError;
  type Future = future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    future::ready(claims_from_request(req, ADMIN_TOKEN_HEADER, Role::Admin).map(|_| AdminPrincipal))
  }
}
