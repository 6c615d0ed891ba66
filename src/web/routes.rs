// src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{admin_handlers, instructor_handlers, user_handlers};

// Liveness probe kept outside the /api scope.
async fn api_working() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().body("API Working")
}

// This function is called in `main.rs` (and by the HTTP tests) to configure
// services for the Actix App. The instructor scope keeps its historical
// `/doctor` mount path; the panel clients depend on it.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/", web::get().to(api_working))
    .service(
      web::scope("/api")
        .service(
          web::scope("/user")
            .route("/register", web::post().to(user_handlers::register_user))
            .route("/login", web::post().to(user_handlers::login_user))
            .route("/get-profile", web::get().to(user_handlers::get_profile))
            .route("/update-profile", web::post().to(user_handlers::update_profile))
            .route("/packages", web::get().to(user_handlers::list_packages))
            .route("/booking", web::post().to(user_handlers::book_slot))
            .route("/book-package", web::post().to(user_handlers::book_package))
            .route("/listBookings", web::get().to(user_handlers::list_bookings))
            .route("/cancel-appointment", web::post().to(user_handlers::cancel_booking)),
        )
        .service(
          web::scope("/admin")
            .route("/login", web::post().to(admin_handlers::login_admin))
            .route("/add-instructor", web::post().to(admin_handlers::add_instructor))
            .route("/add-package", web::post().to(admin_handlers::add_package))
            .route("/all-instructors", web::get().to(admin_handlers::all_instructors))
            .route("/bookings", web::get().to(admin_handlers::bookings_admin))
            .route("/cancel-booking", web::post().to(admin_handlers::cancel_booking))
            .route("/change-availability", web::post().to(admin_handlers::change_availability))
            .route("/dashboard", web::get().to(admin_handlers::dashboard)),
        )
        .service(
          web::scope("/doctor")
            .route("/login", web::post().to(instructor_handlers::login_instructor))
            .route("/bookings", web::get().to(instructor_handlers::bookings))
            .route("/cancel-booking", web::post().to(instructor_handlers::cancel_booking))
            .route("/complete-booking", web::post().to(instructor_handlers::complete_booking))
            .route("/list", web::get().to(instructor_handlers::list))
            .route("/change-availability", web::post().to(instructor_handlers::change_availability))
            .route("/dashboard", web::get().to(instructor_handlers::dashboard))
            .route("/profile", web::get().to(instructor_handlers::profile))
            .route("/update-profile", web::post().to(instructor_handlers::update_profile)),
        ),
    );
}
