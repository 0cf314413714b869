// Wire types for the Shuttly backend
//
// These mirror the backend's JSON exactly: camelCase fields, Mongo-style
// `_id` identifiers, and optional fields wherever endpoints disagree on
// shape (e.g. schedules embed a `route` object in search results but
// flat `routeOrigin`/`routeDestination` strings in booking echoes).
// Normalization into canonical domain types happens once, in
// `shuttly-core` -- nothing downstream should read these directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Envelope ────────────────────────────────────────────────────────

/// The standard `{ success, data }` response envelope.
///
/// `message` appears on `success: false` bodies and on message-only
/// successes (e.g. OTP dispatch).
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

// ── Users & auth ────────────────────────────────────────────────────

/// Account role, as the backend spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
}

/// Message-only response (`{ success, message }`): OTP dispatch,
/// review submission.
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: Option<String>,
}

/// `POST auth/verify-otp` response.
///
/// Two success shapes share one body: an existing account logs straight
/// in (`loggedIn`, `token`, `user`), a new phone number gets a
/// short-lived `registrationToken` to finish signup with
/// (`needsDetails`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub success: bool,
    #[serde(default)]
    pub logged_in: bool,
    pub token: Option<String>,
    pub user: Option<UserDto>,
    #[serde(default)]
    pub needs_details: bool,
    pub registration_token: Option<String>,
    pub phone: Option<String>,
}

/// Flat auth response: `{ success, token, user }`.
///
/// Returned by password login, admin login, and registration completion.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: Option<String>,
    pub user: Option<UserDto>,
}

// ── Schedules & seats ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDto {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub registration_number: Option<String>,
    pub capacity: Option<u32>,
}

/// A dispatched trip as the search endpoint returns it.
///
/// Route appears either embedded (`route`) or flattened
/// (`routeOrigin`/`routeDestination`) depending on the endpoint;
/// timestamps may be absent on malformed records.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub route: Option<RouteDto>,
    pub route_origin: Option<String>,
    pub route_destination: Option<String>,
    pub departure_date_time: Option<DateTime<Utc>>,
    pub arrival_date_time: Option<DateTime<Utc>>,
    pub fare_per_seat: Option<f64>,
    pub available_seats: Option<u32>,
    pub vehicle: Option<VehicleDto>,
    #[serde(default)]
    pub num_reviews: u32,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub number: String,
    /// `available`, `booked`, or `driver`.
    pub status: String,
    #[serde(default)]
    pub is_female_only: bool,
}

// ── Bookings ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerPayload {
    pub seat_id: String,
    pub name: String,
    pub age: u8,
    pub gender: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactPayload {
    pub email: String,
    pub phone: String,
}

/// `POST bookings` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub schedule_id: String,
    pub seat_ids: Vec<String>,
    pub passengers: Vec<PassengerPayload>,
    pub contact: ContactPayload,
    pub boarding_point_id: String,
    pub deboarding_point_id: String,
    /// `Online` or `Cash`.
    pub payment_method: String,
    pub total_fare: f64,
}

/// A committed booking, as returned by create/list/cancel.
///
/// Echoes schedule display fields so history renders without a second
/// fetch; the echoes are optional and inconsistently flattened, same as
/// schedules.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub schedule: Option<ScheduleDto>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub seat_numbers: Vec<String>,
    #[serde(default)]
    pub passengers: Vec<BookedPassengerDto>,
    /// `Confirmed`, `Cancelled`, or `Completed`.
    pub status: String,
    /// `Pending`, `Paid`, or `Refunded`.
    pub payment_status: String,
    pub total_fare: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedPassengerDto {
    pub name: String,
    pub age: Option<u8>,
    pub gender: Option<String>,
    pub seat_number: Option<String>,
}

// ── Payments ────────────────────────────────────────────────────────

/// `POST payments/create-order` response: `{ success, order, razorpayKeyId }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrderResponse {
    pub success: bool,
    pub order: Option<OrderDto>,
    pub razorpay_key_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderDto {
    pub id: String,
    /// Amount in the gateway's minor unit (paise).
    pub amount: u64,
    pub currency: String,
}

/// `POST payments/verify` request body: the gateway's proof triple.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentPayload {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub booking_id: String,
}

/// `POST payments/verify` response: `{ success, booking }`.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub booking: Option<BookingDto>,
    pub message: Option<String>,
}

// ── Reviews ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    pub booking_id: String,
    pub rating: u8,
    pub comment: String,
}

// ── Admin ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePayload {
    pub name: String,
    pub registration_number: String,
    pub capacity: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub license_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverPayload {
    pub name: String,
    pub phone: String,
    pub license_number: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    pub origin: String,
    pub destination: String,
    pub departure_date_time: DateTime<Utc>,
    pub arrival_date_time: DateTime<Utc>,
    pub fare_per_seat: f64,
    pub vehicle_id: String,
}

/// `PUT admin/bookings/{id}/assign` request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentPayload {
    pub vehicle_id: Option<String>,
    pub driver_id: Option<String>,
}
