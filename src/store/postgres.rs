// src/store/postgres.rs

//! Postgres [`Store`] backend. JSON-shaped fields (addresses, the slot map,
//! booking snapshots) live in JSONB columns; slot reservation is a single
//! conditional UPDATE so the conflict check and the map write cannot be
//! interleaved by a racing request.

use crate::errors::{AppError, Result};
use crate::models::{
  Address, Booking, BookingKind, BookingStatus, Instructor, InstructorProfileUpdate,
  InstructorSnapshot, Package, User, UserProfileUpdate, UserSnapshot,
};
use crate::models::instructor::SlotMap;
use crate::store::{SlotReservation, Store, DUPLICATE_EMAIL};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use std::time::Duration;
use uuid::Uuid;

pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub async fn connect(database_url: &str) -> Result<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(10)
      .acquire_timeout(Duration::from_secs(30))
      .connect(database_url)
      .await?;

    let store = PgStore { pool };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    sqlx::query(
      r#"
      CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        phone TEXT,
        address JSONB,
        dob TEXT,
        gender TEXT,
        image TEXT,
        created_at TIMESTAMPTZ NOT NULL
      )
      "#,
    )
    .execute(&self.pool)
    .await?;

    sqlx::query(
      r#"
      CREATE TABLE IF NOT EXISTS instructors (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        image TEXT,
        about TEXT NOT NULL,
        experience TEXT NOT NULL,
        fees DOUBLE PRECISION NOT NULL,
        address JSONB NOT NULL,
        available BOOLEAN NOT NULL DEFAULT TRUE,
        slots_booked JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at TIMESTAMPTZ NOT NULL
      )
      "#,
    )
    .execute(&self.pool)
    .await?;

    sqlx::query(
      r#"
      CREATE TABLE IF NOT EXISTS packages (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        price DOUBLE PRECISION NOT NULL,
        altitude INTEGER NOT NULL,
        difficulty TEXT NOT NULL,
        weather TEXT NOT NULL,
        features JSONB NOT NULL,
        image TEXT,
        created_at TIMESTAMPTZ NOT NULL
      )
      "#,
    )
    .execute(&self.pool)
    .await?;

    sqlx::query(
      r#"
      CREATE TABLE IF NOT EXISTS bookings (
        id UUID PRIMARY KEY,
        user_id UUID NOT NULL,
        kind TEXT NOT NULL,
        instructor_id UUID,
        slot_date TEXT,
        slot_time TEXT,
        user_snapshot JSONB,
        instructor_snapshot JSONB,
        package_id TEXT,
        package_name TEXT,
        location TEXT,
        instructor_name TEXT,
        amount DOUBLE PRECISION NOT NULL,
        status TEXT NOT NULL,
        payment BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL
      )
      "#,
    )
    .execute(&self.pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_user_id ON bookings (user_id)")
      .execute(&self.pool)
      .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_instructor_id ON bookings (instructor_id)")
      .execute(&self.pool)
      .await?;

    Ok(())
  }
}

fn map_unique_violation(err: sqlx::Error) -> AppError {
  match &err {
    sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(DUPLICATE_EMAIL.to_string()),
    _ => AppError::Sqlx(err),
  }
}

fn user_from_row(row: &PgRow) -> std::result::Result<User, sqlx::Error> {
  let address: Option<Json<Address>> = row.try_get("address")?;
  Ok(User {
    id: row.try_get("id")?,
    name: row.try_get("name")?,
    email: row.try_get("email")?,
    password_hash: row.try_get("password_hash")?,
    phone: row.try_get("phone")?,
    address: address.map(|Json(a)| a),
    dob: row.try_get("dob")?,
    gender: row.try_get("gender")?,
    image: row.try_get("image")?,
    created_at: row.try_get("created_at")?,
  })
}

fn instructor_from_row(row: &PgRow) -> std::result::Result<Instructor, sqlx::Error> {
  let Json(address): Json<Address> = row.try_get("address")?;
  let Json(slots_booked): Json<SlotMap> = row.try_get("slots_booked")?;
  Ok(Instructor {
    id: row.try_get("id")?,
    name: row.try_get("name")?,
    email: row.try_get("email")?,
    password_hash: row.try_get("password_hash")?,
    image: row.try_get("image")?,
    about: row.try_get("about")?,
    experience: row.try_get("experience")?,
    fees: row.try_get("fees")?,
    address,
    available: row.try_get("available")?,
    slots_booked,
    created_at: row.try_get("created_at")?,
  })
}

fn package_from_row(row: &PgRow) -> std::result::Result<Package, sqlx::Error> {
  let Json(features): Json<Vec<String>> = row.try_get("features")?;
  Ok(Package {
    id: row.try_get("id")?,
    name: row.try_get("name")?,
    price: row.try_get("price")?,
    altitude: row.try_get("altitude")?,
    difficulty: row.try_get("difficulty")?,
    weather: row.try_get("weather")?,
    features,
    image: row.try_get("image")?,
    created_at: row.try_get("created_at")?,
  })
}

fn booking_from_row(row: &PgRow) -> std::result::Result<Booking, sqlx::Error> {
  let kind_tag: String = row.try_get("kind")?;
  let kind = match kind_tag.as_str() {
    "slot" => {
      let user_snapshot: Option<Json<UserSnapshot>> = row.try_get("user_snapshot")?;
      let instructor_snapshot: Option<Json<InstructorSnapshot>> = row.try_get("instructor_snapshot")?;
      BookingKind::Slot {
        instructor_id: row.try_get("instructor_id")?,
        slot_date: row.try_get("slot_date")?,
        slot_time: row.try_get("slot_time")?,
        user_snapshot: user_snapshot
          .map(|Json(s)| s)
          .ok_or_else(|| sqlx::Error::Decode("slot booking without user snapshot".into()))?,
        instructor_snapshot: instructor_snapshot
          .map(|Json(s)| s)
          .ok_or_else(|| sqlx::Error::Decode("slot booking without instructor snapshot".into()))?,
      }
    }
    "package" => BookingKind::Package {
      package_id: row.try_get("package_id")?,
      package_name: row.try_get("package_name")?,
      location: row.try_get("location")?,
      instructor_name: row.try_get("instructor_name")?,
      slot_date: row.try_get("slot_date")?,
      slot_time: row.try_get("slot_time")?,
    },
    other => {
      return Err(sqlx::Error::Decode(
        format!("unknown booking kind '{}'", other).into(),
      ))
    }
  };

  let status: String = row.try_get("status")?;
  Ok(Booking {
    id: row.try_get("id")?,
    user_id: row.try_get("user_id")?,
    kind,
    amount: row.try_get("amount")?,
    status: BookingStatus::from_str(&status),
    payment: row.try_get("payment")?,
    created_at: row.try_get("created_at")?,
  })
}

#[async_trait]
impl Store for PgStore {
  async fn insert_user(&self, user: &User) -> Result<()> {
    sqlx::query(
      r#"
      INSERT INTO users (id, name, email, password_hash, phone, address, dob, gender, image, created_at)
      VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
      "#,
    )
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.phone)
    .bind(user.address.as_ref().map(Json))
    .bind(&user.dob)
    .bind(&user.gender)
    .bind(&user.image)
    .bind(user.created_at)
    .execute(&self.pool)
    .await
    .map_err(map_unique_violation)?;
    Ok(())
  }

  async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
    let row = sqlx::query("SELECT * FROM users WHERE email = $1")
      .bind(email)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.as_ref().map(user_from_row).transpose()?)
  }

  async fn user_by_id(&self, id: Uuid) -> Result<Option<User>> {
    let row = sqlx::query("SELECT * FROM users WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.as_ref().map(user_from_row).transpose()?)
  }

  async fn update_user_profile(&self, id: Uuid, update: &UserProfileUpdate) -> Result<()> {
    let result = sqlx::query(
      r#"
      UPDATE users SET
        name = COALESCE($2, name),
        phone = COALESCE($3, phone),
        address = COALESCE($4, address),
        dob = COALESCE($5, dob),
        gender = COALESCE($6, gender),
        image = COALESCE($7, image)
      WHERE id = $1
      "#,
    )
    .bind(id)
    .bind(&update.name)
    .bind(&update.phone)
    .bind(update.address.as_ref().map(Json))
    .bind(&update.dob)
    .bind(&update.gender)
    .bind(&update.image)
    .execute(&self.pool)
    .await?;
    if result.rows_affected() == 0 {
      return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(())
  }

  async fn count_users(&self) -> Result<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
      .fetch_one(&self.pool)
      .await?;
    Ok(count as u64)
  }

  async fn insert_instructor(&self, instructor: &Instructor) -> Result<()> {
    sqlx::query(
      r#"
      INSERT INTO instructors
        (id, name, email, password_hash, image, about, experience, fees, address, available, slots_booked, created_at)
      VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
      "#,
    )
    .bind(instructor.id)
    .bind(&instructor.name)
    .bind(&instructor.email)
    .bind(&instructor.password_hash)
    .bind(&instructor.image)
    .bind(&instructor.about)
    .bind(&instructor.experience)
    .bind(instructor.fees)
    .bind(Json(&instructor.address))
    .bind(instructor.available)
    .bind(Json(&instructor.slots_booked))
    .bind(instructor.created_at)
    .execute(&self.pool)
    .await
    .map_err(map_unique_violation)?;
    Ok(())
  }

  async fn instructor_by_email(&self, email: &str) -> Result<Option<Instructor>> {
    let row = sqlx::query("SELECT * FROM instructors WHERE email = $1")
      .bind(email)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.as_ref().map(instructor_from_row).transpose()?)
  }

  async fn instructor_by_id(&self, id: Uuid) -> Result<Option<Instructor>> {
    let row = sqlx::query("SELECT * FROM instructors WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.as_ref().map(instructor_from_row).transpose()?)
  }

  async fn list_instructors(&self) -> Result<Vec<Instructor>> {
    let rows = sqlx::query("SELECT * FROM instructors ORDER BY created_at")
      .fetch_all(&self.pool)
      .await?;
    Ok(rows.iter().map(instructor_from_row).collect::<std::result::Result<_, _>>()?)
  }

  async fn update_instructor_profile(&self, id: Uuid, update: &InstructorProfileUpdate) -> Result<()> {
    let result = sqlx::query(
      r#"
      UPDATE instructors SET
        fees = COALESCE($2, fees),
        address = COALESCE($3, address),
        available = COALESCE($4, available)
      WHERE id = $1
      "#,
    )
    .bind(id)
    .bind(update.fees)
    .bind(update.address.as_ref().map(Json))
    .bind(update.available)
    .execute(&self.pool)
    .await?;
    if result.rows_affected() == 0 {
      return Err(AppError::NotFound("Instructor not found".to_string()));
    }
    Ok(())
  }

  async fn toggle_availability(&self, id: Uuid) -> Result<bool> {
    let available: Option<bool> =
      sqlx::query_scalar("UPDATE instructors SET available = NOT available WHERE id = $1 RETURNING available")
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
    available.ok_or_else(|| AppError::NotFound("Instructor not found".to_string()))
  }

  async fn reserve_slot(&self, id: Uuid, slot_date: &str, slot_time: &str) -> Result<SlotReservation> {
    // Availability gate, conflict check and map update in one statement; the
    // row lock taken by UPDATE serializes racing reservations.
    let result = sqlx::query(
      r#"
      UPDATE instructors
         SET slots_booked = jsonb_set(
               slots_booked,
               ARRAY[$2],
               COALESCE(slots_booked -> $2, '[]'::jsonb) || to_jsonb($3::text),
               true
             )
       WHERE id = $1
         AND available
         AND NOT COALESCE(slots_booked -> $2, '[]'::jsonb) ? $3
      "#,
    )
    .bind(id)
    .bind(slot_date)
    .bind(slot_time)
    .execute(&self.pool)
    .await?;

    if result.rows_affected() == 1 {
      return Ok(SlotReservation::Reserved);
    }

    // Nothing matched; look at the row to report why.
    let available: bool = sqlx::query_scalar("SELECT available FROM instructors WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?
      .ok_or_else(|| AppError::NotFound("Instructor not found".to_string()))?;

    if !available {
      Ok(SlotReservation::InstructorUnavailable)
    } else {
      Ok(SlotReservation::SlotTaken)
    }
  }

  async fn release_slot(&self, id: Uuid, slot_date: &str, slot_time: &str) -> Result<()> {
    sqlx::query(
      r#"
      UPDATE instructors
         SET slots_booked = jsonb_set(
               slots_booked,
               ARRAY[$2],
               (SELECT COALESCE(jsonb_agg(elem), '[]'::jsonb)
                  FROM jsonb_array_elements(slots_booked -> $2) AS elem
                 WHERE elem <> to_jsonb($3::text))
             )
       WHERE id = $1
         AND slots_booked ? $2
      "#,
    )
    .bind(id)
    .bind(slot_date)
    .bind(slot_time)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn insert_package(&self, package: &Package) -> Result<()> {
    sqlx::query(
      r#"
      INSERT INTO packages (id, name, price, altitude, difficulty, weather, features, image, created_at)
      VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
      "#,
    )
    .bind(package.id)
    .bind(&package.name)
    .bind(package.price)
    .bind(package.altitude)
    .bind(&package.difficulty)
    .bind(&package.weather)
    .bind(Json(&package.features))
    .bind(&package.image)
    .bind(package.created_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn list_packages(&self) -> Result<Vec<Package>> {
    let rows = sqlx::query("SELECT * FROM packages ORDER BY created_at")
      .fetch_all(&self.pool)
      .await?;
    Ok(rows.iter().map(package_from_row).collect::<std::result::Result<_, _>>()?)
  }

  async fn insert_booking(&self, booking: &Booking) -> Result<()> {
    let mut query = sqlx::query(
      r#"
      INSERT INTO bookings
        (id, user_id, kind, instructor_id, slot_date, slot_time, user_snapshot, instructor_snapshot,
         package_id, package_name, location, instructor_name, amount, status, payment, created_at)
      VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
      "#,
    )
    .bind(booking.id)
    .bind(booking.user_id);

    query = match &booking.kind {
      BookingKind::Slot {
        instructor_id,
        slot_date,
        slot_time,
        user_snapshot,
        instructor_snapshot,
      } => query
        .bind("slot")
        .bind(instructor_id)
        .bind(slot_date)
        .bind(slot_time)
        .bind(Json(user_snapshot))
        .bind(Json(instructor_snapshot))
        .bind(None::<String>)
        .bind(None::<String>)
        .bind(None::<String>)
        .bind(None::<String>),
      BookingKind::Package {
        package_id,
        package_name,
        location,
        instructor_name,
        slot_date,
        slot_time,
      } => query
        .bind("package")
        .bind(None::<Uuid>)
        .bind(slot_date)
        .bind(slot_time)
        .bind(None::<Json<&UserSnapshot>>)
        .bind(None::<Json<&InstructorSnapshot>>)
        .bind(package_id)
        .bind(package_name)
        .bind(location)
        .bind(instructor_name),
    };

    query
      .bind(booking.amount)
      .bind(booking.status.as_str())
      .bind(booking.payment)
      .bind(booking.created_at)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  async fn booking_by_id(&self, id: Uuid) -> Result<Option<Booking>> {
    let row = sqlx::query("SELECT * FROM bookings WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.as_ref().map(booking_from_row).transpose()?)
  }

  async fn bookings_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>> {
    let rows = sqlx::query("SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC")
      .bind(user_id)
      .fetch_all(&self.pool)
      .await?;
    Ok(rows.iter().map(booking_from_row).collect::<std::result::Result<_, _>>()?)
  }

  async fn bookings_by_instructor(&self, instructor_id: Uuid) -> Result<Vec<Booking>> {
    let rows = sqlx::query("SELECT * FROM bookings WHERE instructor_id = $1 ORDER BY created_at DESC")
      .bind(instructor_id)
      .fetch_all(&self.pool)
      .await?;
    Ok(rows.iter().map(booking_from_row).collect::<std::result::Result<_, _>>()?)
  }

  async fn list_bookings(&self) -> Result<Vec<Booking>> {
    let rows = sqlx::query("SELECT * FROM bookings ORDER BY created_at DESC")
      .fetch_all(&self.pool)
      .await?;
    Ok(rows.iter().map(booking_from_row).collect::<std::result::Result<_, _>>()?)
  }

  async fn set_booking_status(&self, id: Uuid, status: BookingStatus) -> Result<()> {
    let result = sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1")
      .bind(id)
      .bind(status.as_str())
      .execute(&self.pool)
      .await?;
    if result.rows_affected() == 0 {
      return Err(AppError::NotFound("Booking not found".to_string()));
    }
    Ok(())
  }

  async fn close(&self) {
    self.pool.close().await;
  }
}
