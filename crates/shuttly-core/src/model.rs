// ── Canonical domain types ──
//
// Normalized views over the backend's duck-typed wire shapes. The
// `From` impls here are the single place the inconsistent field
// variants (`route` vs `routeOrigin`, booking echo fallbacks) are
// resolved; nothing downstream reads a wire type or chains fallbacks
// at render time.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shuttly_api::models::{BookingDto, DriverDto, RouteDto, ScheduleDto, UserDto, VehicleDto};

use crate::error::CoreError;

// ── ScheduleId ──────────────────────────────────────────────────────

/// Validated reference to a dispatched trip.
///
/// The backend issues 24-character lowercase-hex identifiers; anything
/// else is rejected before a network call is made with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(String);

impl ScheduleId {
    /// Parse and validate a raw identifier.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        let valid = raw.len() == 24 && raw.chars().all(|c| c.is_ascii_hexdigit());
        if valid {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(CoreError::DataIntegrity(format!(
                "'{raw}' is not a valid schedule reference"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScheduleId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── Route ───────────────────────────────────────────────────────────

/// An (origin, destination) city pair. Origin and destination differ
/// on every route the backend serves; degenerate pairs price to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub origin: String,
    pub destination: String,
}

impl From<RouteDto> for Route {
    fn from(dto: RouteDto) -> Self {
        Self {
            origin: dto.origin,
            destination: dto.destination,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.origin, self.destination)
    }
}

// ── Users ───────────────────────────────────────────────────────────

/// Account role. Decides the landing route and which commands gate open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Admin,
}

impl From<shuttly_api::models::Role> for Role {
    fn from(role: shuttly_api::models::Role) -> Self {
        match role {
            shuttly_api::models::Role::User => Self::User,
            shuttly_api::models::Role::Admin => Self::Admin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            email: dto.email,
            phone: dto.phone,
            role: dto.role.into(),
        }
    }
}

// ── Vehicles & schedules ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub registration_number: Option<String>,
    pub capacity: Option<u32>,
}

impl From<VehicleDto> for Vehicle {
    fn from(dto: VehicleDto) -> Self {
        Self {
            name: dto.name.unwrap_or_else(|| "Shuttle".into()),
            id: dto.id,
            registration_number: dto.registration_number,
            capacity: dto.capacity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
}

impl From<DriverDto> for Driver {
    fn from(dto: DriverDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            phone: dto.phone,
            license_number: dto.license_number,
        }
    }
}

/// A dispatched trip, normalized.
///
/// Timestamps stay optional: a record missing them is displayable in a
/// results list but fails the data-integrity guard on the way into
/// seat selection. The raw id is validated into a [`ScheduleId`] only
/// when the user picks the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub route: Route,
    pub departure: Option<DateTime<Utc>>,
    pub arrival: Option<DateTime<Utc>>,
    pub fare_per_seat: f64,
    pub available_seats: u32,
    pub vehicle: Option<Vehicle>,
    pub num_reviews: u32,
    pub average_rating: Option<f64>,
}

impl From<ScheduleDto> for Schedule {
    fn from(dto: ScheduleDto) -> Self {
        // Endpoints disagree: search embeds `route`, echoes flatten it.
        let route = dto.route.map(Route::from).unwrap_or_else(|| Route {
            origin: dto.route_origin.unwrap_or_default(),
            destination: dto.route_destination.unwrap_or_default(),
        });
        Self {
            id: dto.id,
            route,
            departure: dto.departure_date_time,
            arrival: dto.arrival_date_time,
            fare_per_seat: dto.fare_per_seat.unwrap_or(0.0),
            available_seats: dto.available_seats.unwrap_or(0),
            vehicle: dto.vehicle.map(Vehicle::from),
            num_reviews: dto.num_reviews,
            average_rating: dto.average_rating,
        }
    }
}

// ── Bookings ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
    Unknown,
}

impl BookingStatus {
    fn from_wire(raw: &str) -> Self {
        match raw {
            "Confirmed" => Self::Confirmed,
            "Cancelled" => Self::Cancelled,
            "Completed" => Self::Completed,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
            Self::Unknown => "Unknown",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
    Unknown,
}

impl PaymentStatus {
    fn from_wire(raw: &str) -> Self {
        match raw {
            "Pending" => Self::Pending,
            "Paid" => Self::Paid,
            "Refunded" => Self::Refunded,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Refunded => "Refunded",
            Self::Unknown => "Unknown",
        };
        write!(f, "{s}")
    }
}

/// A committed booking with its schedule echo resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub route: Route,
    pub departure: Option<DateTime<Utc>>,
    pub seat_numbers: Vec<String>,
    pub passenger_names: Vec<String>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub total_fare: f64,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<BookingDto> for Booking {
    fn from(dto: BookingDto) -> Self {
        // The echo fields win when present; otherwise fall back to the
        // embedded schedule. Resolved here, once.
        let echoed = dto.schedule.map(Schedule::from);
        let route = Route {
            origin: dto
                .origin
                .or_else(|| echoed.as_ref().map(|s| s.route.origin.clone()))
                .unwrap_or_default(),
            destination: dto
                .destination
                .or_else(|| echoed.as_ref().map(|s| s.route.destination.clone()))
                .unwrap_or_default(),
        };
        let departure = dto
            .departure_date_time
            .or_else(|| echoed.as_ref().and_then(|s| s.departure));

        Self {
            id: dto.id,
            route,
            departure,
            seat_numbers: dto.seat_numbers,
            passenger_names: dto.passengers.into_iter().map(|p| p.name).collect(),
            status: BookingStatus::from_wire(&dto.status),
            payment_status: PaymentStatus::from_wire(&dto.payment_status),
            total_fare: dto.total_fare.unwrap_or(0.0),
            created_at: dto.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn schedule_id_accepts_24_hex() {
        let id = ScheduleId::parse("64a10f2b9d3e4c0012ab34cd").unwrap();
        assert_eq!(id.as_str(), "64a10f2b9d3e4c0012ab34cd");
    }

    #[test]
    fn schedule_id_normalizes_case() {
        let id = ScheduleId::parse("64A10F2B9D3E4C0012AB34CD").unwrap();
        assert_eq!(id.as_str(), "64a10f2b9d3e4c0012ab34cd");
    }

    #[test]
    fn schedule_id_rejects_wrong_length() {
        assert!(ScheduleId::parse("64a10f2b").is_err());
    }

    #[test]
    fn schedule_id_rejects_non_hex() {
        assert!(ScheduleId::parse("64a10f2b9d3e4c0012ab34zz").is_err());
    }

    #[test]
    fn schedule_id_from_str() {
        let id: ScheduleId = "64a10f2b9d3e4c0012ab34cd".parse().unwrap();
        assert_eq!(id.to_string(), "64a10f2b9d3e4c0012ab34cd");
    }

    #[test]
    fn booking_prefers_echo_fields_over_embedded_schedule() {
        let dto: BookingDto = serde_json::from_value(serde_json::json!({
            "_id": "64a10f2b9d3e4c0012ab34d0",
            "origin": "Lucknow",
            "destination": "Kanpur",
            "schedule": {
                "_id": "64a10f2b9d3e4c0012ab34cd",
                "route": { "origin": "Stale", "destination": "Echo" }
            },
            "status": "Confirmed",
            "paymentStatus": "Pending"
        }))
        .unwrap();

        let booking = Booking::from(dto);
        assert_eq!(booking.route.origin, "Lucknow");
        assert_eq!(booking.route.destination, "Kanpur");
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn booking_falls_back_to_embedded_schedule() {
        let dto: BookingDto = serde_json::from_value(serde_json::json!({
            "_id": "64a10f2b9d3e4c0012ab34d0",
            "schedule": {
                "_id": "64a10f2b9d3e4c0012ab34cd",
                "route": { "origin": "Lucknow", "destination": "Kanpur" },
                "departureDateTime": "2025-06-14T08:30:00Z"
            },
            "status": "Confirmed",
            "paymentStatus": "Paid"
        }))
        .unwrap();

        let booking = Booking::from(dto);
        assert_eq!(booking.route.origin, "Lucknow");
        assert!(booking.departure.is_some());
    }
}
