//! Domain model and booking logic between `shuttly-api` and UI consumers.
//!
//! This crate owns the business logic for the Shuttly client workspace:
//!
//! - **[`BookingFlow`]** — The booking state machine: Search → Results →
//!   SeatSelection → PassengerDetails → Confirmed, with guarded
//!   transitions, a busy flag against re-entrant submissions, and
//!   collaborators injected behind [`BookingServices`] /
//!   [`PaymentCollector`]. Testable without any rendering.
//!
//! - **[`FarePolicy`]** — Injectable pricing seam; the default
//!   [`DistanceTableFare`] prices a route from a fixed inter-city
//!   distance table (unknown or degenerate routes price to zero).
//!
//! - **[`SeatLayout`] / [`SelectionSet`]** — The seat map with its
//!   invariants (one driver seat, unique ids) and toggle-selection
//!   semantics; `is_selected` is derived, never stored on a seat.
//!
//! - **[`AuthSession`]** — Current user/token lifecycle: startup
//!   rehydration from the durable [`TokenStore`], login, logout, and
//!   forced logout on session errors.
//!
//! - **Route policy** ([`routes`]) — The allow-list/role gating rules
//!   every surface applies.
//!
//! - **Domain model** ([`model`]) — Canonical types normalized from the
//!   backend's wire shapes exactly once, at the fetch boundary.

pub mod error;
pub mod fare;
pub mod flow;
pub mod model;
pub mod passenger;
pub mod payment;
pub mod points;
pub mod routes;
pub mod seatmap;
pub mod services;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use fare::{DistanceTableFare, FarePolicy};
pub use flow::{BookingDraft, BookingFlow, BookingServices, FlowState, SearchQuery};
pub use passenger::{ContactDetails, Gender, PassengerDetail, PaymentMethod};
pub use payment::{
    CheckoutRequest, PaymentCollector, PaymentOrder, PaymentOutcome, PaymentProof,
};
pub use points::{BoardingPoint, points_for_city};
pub use routes::{Gate, RouteAccess, gate, landing_route, route_access};
pub use seatmap::{Seat, SeatAppearance, SeatLayout, SeatStatus, SelectionSet};
pub use session::{AuthSession, IdentityServices, TokenStore};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Booking, BookingStatus, Driver, PaymentStatus, Role, Route, Schedule, ScheduleId, User,
    Vehicle,
};
