//! Scenario tests for the booking flow state machine.
//!
//! A recording fake stands in for the backend so every test can assert
//! not just the resulting state but exactly which collaborator calls
//! were made -- guard failures must leave the wire untouched.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;

use shuttly_core::{
    Booking, BookingDraft, BookingFlow, BookingServices, BookingStatus, CheckoutRequest,
    CoreError, DistanceTableFare, FlowState, Gender, PaymentCollector, PaymentMethod,
    PaymentOrder, PaymentOutcome, PaymentProof, PaymentStatus, Role, Route, Schedule, ScheduleId,
    SearchQuery, Seat, SeatLayout, SeatStatus, User,
};

const SCHEDULE_ID: &str = "64a10f2b9d3e4c0012ab34cd";
const BOOKING_ID: &str = "64a10f2b9d3e4c0012ab34d0";

// ── Fixtures ────────────────────────────────────────────────────────

fn schedule() -> Schedule {
    Schedule {
        id: SCHEDULE_ID.into(),
        route: Route {
            origin: "Lucknow".into(),
            destination: "Kanpur".into(),
        },
        departure: Some(Utc.with_ymd_and_hms(2025, 6, 14, 8, 30, 0).unwrap()),
        arrival: Some(Utc.with_ymd_and_hms(2025, 6, 14, 10, 15, 0).unwrap()),
        fare_per_seat: 420.0,
        available_seats: 10,
        vehicle: None,
        num_reviews: 4,
        average_rating: Some(4.5),
    }
}

fn seats() -> Vec<Seat> {
    let available = |id: &str, number: &str| Seat {
        id: id.into(),
        number: number.into(),
        status: SeatStatus::Available,
        female_only: false,
    };
    vec![
        Seat {
            id: "d1".into(),
            number: "D".into(),
            status: SeatStatus::Driver,
            female_only: false,
        },
        available("s1", "1"),
        available("s2", "2"),
        available("s3", "3"),
        Seat {
            id: "b1".into(),
            number: "4".into(),
            status: SeatStatus::Booked,
            female_only: false,
        },
    ]
}

fn profile() -> User {
    User {
        id: "64a10f2b9d3e4c0012ab34ce".into(),
        name: "Asha".into(),
        email: Some("asha@example.com".into()),
        phone: Some("9876543210".into()),
        role: Role::User,
    }
}

fn query() -> SearchQuery {
    SearchQuery {
        origin: "Lucknow".into(),
        destination: "Kanpur".into(),
        date: NaiveDate::from_ymd_opt(2025, 6, 14),
    }
}

fn booking(payment_status: PaymentStatus) -> Booking {
    Booking {
        id: BOOKING_ID.into(),
        route: Route {
            origin: "Lucknow".into(),
            destination: "Kanpur".into(),
        },
        departure: Some(Utc.with_ymd_and_hms(2025, 6, 14, 8, 30, 0).unwrap()),
        seat_numbers: vec!["1".into()],
        passenger_names: vec!["Asha".into()],
        status: BookingStatus::Confirmed,
        payment_status,
        total_fare: 420.0,
        created_at: None,
    }
}

// ── Recording fake backend ──────────────────────────────────────────

#[derive(Default)]
struct FakeBackend {
    schedules: Vec<Schedule>,
    seats: Vec<Seat>,
    fail_create: bool,
    fail_verify: bool,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeBackend {
    fn with_inventory() -> Self {
        Self {
            schedules: vec![schedule()],
            seats: seats(),
            ..Self::default()
        }
    }

    fn calls_of(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait]
impl BookingServices for FakeBackend {
    async fn search_schedules(
        &self,
        _origin: &str,
        _destination: &str,
        _date: NaiveDate,
    ) -> Result<Vec<Schedule>, CoreError> {
        self.record("search");
        Ok(self.schedules.clone())
    }

    async fn seat_layout(&self, _schedule_id: &ScheduleId) -> Result<SeatLayout, CoreError> {
        self.record("layout");
        SeatLayout::new(self.seats.clone())
    }

    async fn create_booking(&self, _draft: &BookingDraft) -> Result<Booking, CoreError> {
        self.record("create");
        if self.fail_create {
            return Err(CoreError::Api(shuttly_api::Error::Api {
                message: "seat was just taken".into(),
            }));
        }
        Ok(booking(PaymentStatus::Pending))
    }

    async fn create_payment_order(&self, _booking_id: &str) -> Result<PaymentOrder, CoreError> {
        self.record("order");
        Ok(PaymentOrder {
            order_id: "order_9".into(),
            amount_minor: 42_000,
            currency: "INR".into(),
            gateway_key_id: "rzp_test_key".into(),
        })
    }

    async fn verify_payment(
        &self,
        _booking_id: &str,
        _proof: &PaymentProof,
    ) -> Result<Booking, CoreError> {
        self.record("verify");
        if self.fail_verify {
            return Err(CoreError::Api(shuttly_api::Error::Api {
                message: "booking could not be recorded".into(),
            }));
        }
        Ok(booking(PaymentStatus::Paid))
    }
}

// ── Payment collector fakes ─────────────────────────────────────────

struct Collector {
    outcome: PaymentOutcome,
    invocations: Mutex<usize>,
}

impl Collector {
    fn completing() -> Self {
        Self::new(PaymentOutcome::Completed(PaymentProof {
            order_id: "order_9".into(),
            payment_id: "pay_1".into(),
            signature: "sig".into(),
        }))
    }

    fn new(outcome: PaymentOutcome) -> Self {
        Self {
            outcome,
            invocations: Mutex::new(0),
        }
    }

    fn invocations(&self) -> usize {
        *self.invocations.lock().unwrap()
    }
}

#[async_trait]
impl PaymentCollector for Collector {
    async fn collect(&self, _request: &CheckoutRequest) -> PaymentOutcome {
        *self.invocations.lock().unwrap() += 1;
        self.outcome.clone()
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn flow_over(backend: &Arc<FakeBackend>) -> BookingFlow {
    BookingFlow::new(backend.clone(), Arc::new(DistanceTableFare::default()))
}

/// Walk a flow to the details screen with `seat_ids` selected and every
/// field filled validly.
async fn filled_flow(backend: &Arc<FakeBackend>, seat_ids: &[&str]) -> BookingFlow {
    let mut flow = flow_over(backend);
    flow.submit_search(query()).await.unwrap();
    flow.choose_schedule(SCHEDULE_ID).await.unwrap();
    for id in seat_ids {
        assert!(flow.toggle_seat(id).unwrap());
    }
    flow.proceed_to_details(Some(&profile())).unwrap();

    let boarding = flow.boarding_points()[0].id.clone();
    let deboarding = flow.deboarding_points()[0].id.clone();
    flow.set_boarding_point(&boarding).unwrap();
    flow.set_deboarding_point(&deboarding).unwrap();
    for index in 0..seat_ids.len() {
        flow.set_passenger(index, format!("Passenger {index}"), Some(30), Some(Gender::Other))
            .unwrap();
    }
    flow
}

// ── Search guards ───────────────────────────────────────────────────

#[tokio::test]
async fn search_rejects_identical_cities_without_network() {
    let backend = Arc::new(FakeBackend::with_inventory());
    let mut flow = flow_over(&backend);

    let err = flow
        .submit_search(SearchQuery {
            origin: "Kanpur".into(),
            destination: "Kanpur".into(),
            date: NaiveDate::from_ymd_opt(2025, 6, 14),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation(_)));
    assert!(matches!(flow.state(), FlowState::Search));
    assert_eq!(backend.calls_of("search"), 0);
}

#[tokio::test]
async fn search_requires_a_date() {
    let backend = Arc::new(FakeBackend::with_inventory());
    let mut flow = flow_over(&backend);

    let err = flow
        .submit_search(SearchQuery {
            date: None,
            ..query()
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "travel date is required");
    assert_eq!(backend.calls_of("search"), 0);
}

#[tokio::test]
async fn empty_result_list_is_a_valid_state() {
    let backend = Arc::new(FakeBackend {
        seats: seats(),
        ..FakeBackend::default()
    });
    let mut flow = flow_over(&backend);

    let count = flow.submit_search(query()).await.unwrap();
    assert_eq!(count, 0);
    assert!(matches!(flow.state(), FlowState::Results { .. }));
    assert!(flow.results().is_empty());
}

// ── Schedule selection guards ───────────────────────────────────────

#[tokio::test]
async fn malformed_schedule_id_aborts_before_network() {
    let backend = Arc::new(FakeBackend::with_inventory());
    let mut flow = flow_over(&backend);
    flow.submit_search(query()).await.unwrap();

    let err = flow.choose_schedule("not-a-schedule").await.unwrap_err();
    assert!(matches!(err, CoreError::DataIntegrity(_)));
    assert!(matches!(flow.state(), FlowState::Results { .. }));
    assert_eq!(backend.calls_of("layout"), 0);
}

#[tokio::test]
async fn schedule_outside_results_is_rejected() {
    let backend = Arc::new(FakeBackend::with_inventory());
    let mut flow = flow_over(&backend);
    flow.submit_search(query()).await.unwrap();

    let err = flow
        .choose_schedule("ffffffffffffffffffffffff")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    assert_eq!(backend.calls_of("layout"), 0);
}

// ── Selection & fare ────────────────────────────────────────────────

#[tokio::test]
async fn total_fare_recomputes_with_selection() {
    let backend = Arc::new(FakeBackend::with_inventory());
    let mut flow = flow_over(&backend);
    flow.submit_search(query()).await.unwrap();
    flow.choose_schedule(SCHEDULE_ID).await.unwrap();

    for id in ["s1", "s2", "s3"] {
        flow.toggle_seat(id).unwrap();
    }
    assert_eq!(flow.total_fare(), 1260.0);

    flow.toggle_seat("s2").unwrap();
    assert_eq!(flow.total_fare(), 840.0);
}

#[tokio::test]
async fn passenger_records_match_selection_one_to_one() {
    let backend = Arc::new(FakeBackend::with_inventory());
    let mut flow = flow_over(&backend);
    flow.submit_search(query()).await.unwrap();
    flow.choose_schedule(SCHEDULE_ID).await.unwrap();
    flow.toggle_seat("s1").unwrap();
    flow.toggle_seat("s3").unwrap();
    flow.proceed_to_details(None).unwrap();

    let draft = flow.draft().unwrap();
    assert_eq!(draft.passengers.len(), 2);
    let tagged: Vec<&str> = draft.passengers.iter().map(|p| p.seat_id.as_str()).collect();
    assert_eq!(tagged, ["s1", "s3"]);
}

#[tokio::test]
async fn contact_is_prefilled_from_profile() {
    let backend = Arc::new(FakeBackend::with_inventory());
    let mut flow = flow_over(&backend);
    flow.submit_search(query()).await.unwrap();
    flow.choose_schedule(SCHEDULE_ID).await.unwrap();
    flow.toggle_seat("s1").unwrap();
    flow.proceed_to_details(Some(&profile())).unwrap();

    let draft = flow.draft().unwrap();
    assert_eq!(draft.contact.email, "asha@example.com");
    assert_eq!(draft.contact.phone, "9876543210");
}

#[tokio::test]
async fn empty_selection_blocks_details() {
    let backend = Arc::new(FakeBackend::with_inventory());
    let mut flow = flow_over(&backend);
    flow.submit_search(query()).await.unwrap();
    flow.choose_schedule(SCHEDULE_ID).await.unwrap();

    let err = flow.proceed_to_details(None).unwrap_err();
    assert_eq!(err.to_string(), "select at least one seat");
}

#[tokio::test]
async fn missing_timestamps_are_a_data_integrity_error() {
    let mut incomplete = schedule();
    incomplete.arrival = None;
    let backend = Arc::new(FakeBackend {
        schedules: vec![incomplete],
        seats: seats(),
        ..FakeBackend::default()
    });
    let mut flow = flow_over(&backend);
    flow.submit_search(query()).await.unwrap();
    flow.choose_schedule(SCHEDULE_ID).await.unwrap();
    flow.toggle_seat("s1").unwrap();

    let err = flow.proceed_to_details(None).unwrap_err();
    assert!(matches!(err, CoreError::DataIntegrity(_)));
    assert!(matches!(flow.state(), FlowState::SeatSelection { .. }));
}

// ── Submission guards ───────────────────────────────────────────────

#[tokio::test]
async fn missing_age_rejects_submission_before_any_network_call() {
    let backend = Arc::new(FakeBackend::with_inventory());
    let mut flow = filled_flow(&backend, &["s1", "s2"]).await;
    // Drop the second passenger's age.
    flow.set_passenger(1, "Ravi".into(), None, Some(Gender::Male))
        .unwrap();

    let collector = Collector::completing();
    let err = flow.submit(&collector).await.unwrap_err();

    assert_eq!(err.to_string(), "passenger 2: age is required");
    assert_eq!(backend.calls_of("create"), 0);
    assert_eq!(collector.invocations(), 0);
    assert!(matches!(flow.state(), FlowState::PassengerDetails { .. }));
}

// ── Scenarios ───────────────────────────────────────────────────────

#[tokio::test]
async fn happy_path_cash_booking() {
    let backend = Arc::new(FakeBackend::with_inventory());
    let mut flow = flow_over(&backend);

    let count = flow.submit_search(query()).await.unwrap();
    assert!(count >= 1);

    let first = flow.results()[0].id.clone();
    flow.choose_schedule(&first).await.unwrap();
    assert!(flow.toggle_seat("s1").unwrap());

    flow.proceed_to_details(Some(&profile())).unwrap();
    let boarding = flow.boarding_points()[0].id.clone();
    let deboarding = flow.deboarding_points()[0].id.clone();
    flow.set_boarding_point(&boarding).unwrap();
    flow.set_deboarding_point(&deboarding).unwrap();
    flow.set_passenger(0, "Asha".into(), Some(29), Some(Gender::Female))
        .unwrap();
    flow.set_payment_method(PaymentMethod::Cash).unwrap();

    let collector = Collector::completing();
    let confirmed = flow.submit(&collector).await.unwrap();

    assert_eq!(confirmed.status, BookingStatus::Confirmed);
    assert_eq!(confirmed.payment_status, PaymentStatus::Pending);
    assert!(matches!(flow.state(), FlowState::Confirmed { .. }));
    // Cash never touches the payment collaborators.
    assert_eq!(collector.invocations(), 0);
    assert_eq!(backend.calls_of("order"), 0);
    assert_eq!(backend.calls_of("verify"), 0);
}

#[tokio::test]
async fn online_payment_completes_end_to_end() {
    let backend = Arc::new(FakeBackend::with_inventory());
    let mut flow = filled_flow(&backend, &["s1"]).await;
    flow.set_payment_method(PaymentMethod::Online).unwrap();

    let collector = Collector::completing();
    let confirmed = flow.submit(&collector).await.unwrap();

    assert_eq!(confirmed.payment_status, PaymentStatus::Paid);
    assert_eq!(collector.invocations(), 1);
    assert_eq!(backend.calls_of("create"), 1);
    assert_eq!(backend.calls_of("order"), 1);
    assert_eq!(backend.calls_of("verify"), 1);
}

#[tokio::test]
async fn verify_failure_after_capture_is_the_distinct_severe_error() {
    let backend = Arc::new(FakeBackend {
        fail_verify: true,
        ..FakeBackend::with_inventory()
    });
    let mut flow = filled_flow(&backend, &["s1"]).await;
    flow.set_payment_method(PaymentMethod::Online).unwrap();

    let collector = Collector::completing();
    let err = flow.submit(&collector).await.unwrap_err();

    assert!(matches!(err, CoreError::PaymentUnrecorded(_)));
    // Not the generic payment-failed message, and no implied refund.
    let message = err.to_string();
    assert!(message.contains("payment was received"));
    assert!(!message.to_lowercase().contains("refund"));
    assert!(matches!(flow.state(), FlowState::PassengerDetails { .. }));
    assert!(flow.confirmed_booking().is_none());
}

#[tokio::test]
async fn dismissed_checkout_allows_resubmission() {
    let backend = Arc::new(FakeBackend::with_inventory());
    let mut flow = filled_flow(&backend, &["s1"]).await;
    flow.set_payment_method(PaymentMethod::Online).unwrap();

    let dismissing = Collector::new(PaymentOutcome::Dismissed);
    let err = flow.submit(&dismissing).await.unwrap_err();
    assert!(matches!(err, CoreError::PaymentDismissed));
    assert!(matches!(flow.state(), FlowState::PassengerDetails { .. }));

    let completing = Collector::completing();
    let confirmed = flow.submit(&completing).await.unwrap();
    assert_eq!(confirmed.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn gateway_failure_surfaces_without_advancing() {
    let backend = Arc::new(FakeBackend::with_inventory());
    let mut flow = filled_flow(&backend, &["s1"]).await;
    flow.set_payment_method(PaymentMethod::Online).unwrap();

    let failing = Collector::new(PaymentOutcome::Failed("card declined".into()));
    let err = flow.submit(&failing).await.unwrap_err();

    assert_eq!(err.to_string(), "payment failed: card declined");
    assert_eq!(backend.calls_of("verify"), 0);
    assert!(matches!(flow.state(), FlowState::PassengerDetails { .. }));
}

#[tokio::test]
async fn create_failure_leaves_the_draft_intact() {
    let backend = Arc::new(FakeBackend {
        fail_create: true,
        ..FakeBackend::with_inventory()
    });
    let mut flow = filled_flow(&backend, &["s1"]).await;

    let collector = Collector::completing();
    let err = flow.submit(&collector).await.unwrap_err();

    assert_eq!(err.to_string(), "seat was just taken");
    let draft = flow.draft().expect("draft survives the failure");
    assert_eq!(draft.seat_ids, ["s1"]);
    assert_eq!(draft.passengers.len(), 1);
}
