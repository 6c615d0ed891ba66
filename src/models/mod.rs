// src/models/mod.rs

//! Contains data structures representing store entities.

// Declare child modules for each model
pub mod booking;
pub mod instructor;
pub mod package;
pub mod user;

// Re-export the model structs for convenient access
pub use booking::{Booking, BookingKind, BookingStatus, BookingView};
pub use instructor::{Instructor, InstructorProfileUpdate, InstructorPublic, InstructorSnapshot};
pub use package::Package;
pub use user::{Address, User, UserProfileUpdate, UserSnapshot};
