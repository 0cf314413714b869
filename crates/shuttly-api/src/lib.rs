//! Async client for the Shuttly shuttle-booking REST backend.
//!
//! The backend speaks JSON under `/api` with a `{ success, data }`
//! envelope on most endpoints and flat bodies on the auth/payment
//! exchanges; errors arrive as `{ message }` with a non-2xx status.
//! [`ApiClient`] owns the transport mechanics (URL construction, bearer
//! token, envelope unwrapping, error normalization); endpoint methods
//! live in per-resource modules as inherent impls:
//!
//! - [`auth`] — OTP flow, password/admin login, session rehydration
//! - [`schedules`] — route/date search, per-schedule seat maps
//! - [`bookings`] — create, history, cancel, ticket download
//! - [`payments`] — payment-order creation and proof verification
//! - [`reviews`] — rating a completed booking
//! - [`admin`] — vehicle/driver/schedule CRUD, booking assignment
//!
//! Wire types ([`models`]) mirror the backend's JSON exactly, optional
//! fields and all; canonical domain types live in `shuttly-core`.

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod client;
pub mod error;
pub mod models;
pub mod payments;
pub mod reviews;
pub mod schedules;
pub mod transport;

pub use auth::{LoginOutcome, OtpOutcome};
pub use client::ApiClient;
pub use error::Error;
pub use payments::PaymentOrder;
pub use transport::TransportConfig;
