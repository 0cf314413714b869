// ── Booking flow state machine ──
//
// The linear flow: Search → Results → SeatSelection → PassengerDetails
// → Confirmed. Every transition is a guarded method: guard failures
// return a validation error without touching the network, collaborator
// failures surface their message and leave the state exactly where it
// was. One busy flag rejects re-entrant triggers while a collaborator
// call is in flight.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::error::CoreError;
use crate::fare::FarePolicy;
use crate::model::{Booking, Schedule, ScheduleId, User};
use crate::passenger::{
    ContactDetails, Gender, PassengerDetail, PaymentMethod, validate_details,
};
use crate::payment::{
    CheckoutRequest, PaymentCollector, PaymentOrder, PaymentOutcome, PaymentProof,
};
use crate::points::{BoardingPoint, points_for_city};
use crate::seatmap::{SeatLayout, SelectionSet};

// ── Collaborator seam ───────────────────────────────────────────────

/// The backend calls the flow makes, behind a trait so tests can
/// substitute recording fakes. The production implementation lives in
/// [`services`](crate::services) and delegates to `shuttly_api`.
#[async_trait]
pub trait BookingServices: Send + Sync {
    async fn search_schedules(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<Schedule>, CoreError>;

    async fn seat_layout(&self, schedule_id: &ScheduleId) -> Result<SeatLayout, CoreError>;

    async fn create_booking(&self, draft: &BookingDraft) -> Result<Booking, CoreError>;

    async fn create_payment_order(&self, booking_id: &str) -> Result<PaymentOrder, CoreError>;

    async fn verify_payment(
        &self,
        booking_id: &str,
        proof: &PaymentProof,
    ) -> Result<Booking, CoreError>;
}

// ── Query & draft ───────────────────────────────────────────────────

/// Search-form inputs. `date` is optional so the "date set" guard has
/// something to check; downstream code only sees validated queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,
    pub date: Option<NaiveDate>,
}

impl SearchQuery {
    /// The search-form guard: origin set, destination set, origin ≠
    /// destination, date set.
    fn validate(&self) -> Result<NaiveDate, CoreError> {
        if self.origin.trim().is_empty() {
            return Err(CoreError::Validation("origin is required".into()));
        }
        if self.destination.trim().is_empty() {
            return Err(CoreError::Validation("destination is required".into()));
        }
        if self.origin == self.destination {
            return Err(CoreError::Validation(
                "origin and destination must differ".into(),
            ));
        }
        self.date
            .ok_or_else(|| CoreError::Validation("travel date is required".into()))
    }
}

/// The in-progress, not-yet-submitted booking. Owned exclusively by
/// the flow; discarded on reset or successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub schedule_id: ScheduleId,
    pub seat_ids: Vec<String>,
    pub passengers: Vec<PassengerDetail>,
    pub contact: ContactDetails,
    pub boarding_point: Option<BoardingPoint>,
    pub deboarding_point: Option<BoardingPoint>,
    pub payment_method: PaymentMethod,
    pub total_fare: f64,
}

// ── States ──────────────────────────────────────────────────────────

/// Named states of the booking flow.
#[derive(Debug, Clone)]
pub enum FlowState {
    /// Initial: the search form.
    Search,
    /// Schedules returned for a query. An empty list is a valid
    /// sub-state ("no schedules found"), not an error.
    Results {
        query: SearchQuery,
        schedules: Vec<Schedule>,
    },
    /// One schedule picked, its seat map loaded, selection in progress.
    SeatSelection {
        schedule: Schedule,
        schedule_id: ScheduleId,
        layout: SeatLayout,
        selection: SelectionSet,
    },
    /// Collecting passenger/contact/point/payment details.
    PassengerDetails {
        schedule: Schedule,
        layout: SeatLayout,
        draft: BookingDraft,
    },
    /// Terminal: the booking is committed. Cancel and ticket download
    /// are separate actions that never leave this state.
    Confirmed { booking: Booking },
}

impl FlowState {
    /// Short name for diagnostics and `InvalidTransition` messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Results { .. } => "results",
            Self::SeatSelection { .. } => "seat selection",
            Self::PassengerDetails { .. } => "passenger details",
            Self::Confirmed { .. } => "confirmed",
        }
    }
}

// ── The machine ─────────────────────────────────────────────────────

/// The booking flow, independent of any rendering.
///
/// Collaborators are injected: the backend behind [`BookingServices`],
/// pricing behind [`FarePolicy`], and the checkout behind
/// [`PaymentCollector`] (passed to [`submit`](Self::submit), the only
/// step that needs it).
pub struct BookingFlow {
    services: Arc<dyn BookingServices>,
    fare_policy: Arc<dyn FarePolicy>,
    state: FlowState,
    busy: bool,
}

impl BookingFlow {
    pub fn new(services: Arc<dyn BookingServices>, fare_policy: Arc<dyn FarePolicy>) -> Self {
        Self {
            services,
            fare_policy,
            state: FlowState::Search,
            busy: false,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Whether a collaborator call is in flight. Renderers show a
    /// loading state and disable triggers while this holds.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Discard the draft and return to the search form.
    pub fn reset(&mut self) {
        debug!(from = self.state.name(), "resetting booking flow");
        self.state = FlowState::Search;
        self.busy = false;
    }

    /// Advisory single-seat fare for a prospective route, from the
    /// injected policy. Zero means the route is unknown/unbookable.
    pub fn estimated_fare(&self, origin: &str, destination: &str) -> f64 {
        self.fare_policy.single_ticket_fare(origin, destination)
    }

    // ── Search → Results ─────────────────────────────────────────────

    /// Run the search. Allowed from the search form or from an earlier
    /// result list (a new search discards the old one). Returns the
    /// number of schedules found; zero is valid.
    pub async fn submit_search(&mut self, query: SearchQuery) -> Result<usize, CoreError> {
        match self.state {
            FlowState::Search | FlowState::Results { .. } => {}
            _ => {
                return Err(CoreError::InvalidTransition {
                    expected: "search or results",
                });
            }
        }
        if self.busy {
            return Err(CoreError::Busy);
        }
        let date = query.validate()?;

        self.busy = true;
        let result = self
            .services
            .search_schedules(&query.origin, &query.destination, date)
            .await;
        self.busy = false;

        let schedules = result?;
        debug!(count = schedules.len(), "search complete");
        let count = schedules.len();
        self.state = FlowState::Results { query, schedules };
        Ok(count)
    }

    /// Schedules in the current result list (empty outside `Results`).
    pub fn results(&self) -> &[Schedule] {
        match &self.state {
            FlowState::Results { schedules, .. } => schedules,
            _ => &[],
        }
    }

    // ── Results → SeatSelection ──────────────────────────────────────

    /// Pick a schedule from the results and load its seat map.
    ///
    /// A malformed identifier or one not present in the results aborts
    /// before any network call.
    pub async fn choose_schedule(&mut self, raw_id: &str) -> Result<(), CoreError> {
        let FlowState::Results { schedules, .. } = &self.state else {
            return Err(CoreError::InvalidTransition { expected: "results" });
        };
        if self.busy {
            return Err(CoreError::Busy);
        }

        let schedule_id = ScheduleId::parse(raw_id)?;
        let Some(schedule) = schedules.iter().find(|s| s.id == schedule_id.as_str()) else {
            return Err(CoreError::Validation(
                "that schedule is not in the current results".into(),
            ));
        };
        let schedule = schedule.clone();

        self.busy = true;
        let result = self.services.seat_layout(&schedule_id).await;
        self.busy = false;

        let layout = result?;
        debug!(schedule_id = %schedule_id, seats = layout.seats().len(), "seat layout loaded");
        self.state = FlowState::SeatSelection {
            schedule,
            schedule_id,
            layout,
            selection: SelectionSet::new(),
        };
        Ok(())
    }

    // ── Seat selection ───────────────────────────────────────────────

    /// Toggle one seat. Returns whether it is selected afterwards.
    pub fn toggle_seat(&mut self, seat_id: &str) -> Result<bool, CoreError> {
        let FlowState::SeatSelection {
            layout, selection, ..
        } = &mut self.state
        else {
            return Err(CoreError::InvalidTransition {
                expected: "seat selection",
            });
        };
        Ok(selection.toggle(layout, seat_id))
    }

    /// Currently selected seat ids, in pick order.
    pub fn selected_seats(&self) -> &[String] {
        match &self.state {
            FlowState::SeatSelection { selection, .. } => selection.ids(),
            FlowState::PassengerDetails { draft, .. } => &draft.seat_ids,
            _ => &[],
        }
    }

    /// Seat numbers for the current selection, in pick order.
    pub fn selected_seat_numbers(&self) -> Vec<String> {
        match &self.state {
            FlowState::SeatSelection {
                layout, selection, ..
            } => layout.numbers_for(selection.ids()),
            FlowState::PassengerDetails { layout, draft, .. } => layout.numbers_for(&draft.seat_ids),
            _ => Vec::new(),
        }
    }

    /// Total fare for the current selection or draft, recomputed from
    /// the schedule's per-seat fare whenever the selection changes.
    #[allow(clippy::cast_precision_loss)]
    pub fn total_fare(&self) -> f64 {
        match &self.state {
            FlowState::SeatSelection {
                schedule, selection, ..
            } => schedule.fare_per_seat * selection.len() as f64,
            FlowState::PassengerDetails { draft, .. } => draft.total_fare,
            FlowState::Confirmed { booking } => booking.total_fare,
            _ => 0.0,
        }
    }

    // ── SeatSelection → PassengerDetails ─────────────────────────────

    /// Move to the details screen: one passenger record per selected
    /// seat, contact prefilled from the session profile when available.
    ///
    /// Blocked when nothing is selected, or when the schedule is
    /// missing a departure or arrival timestamp (data-integrity error).
    #[allow(clippy::cast_precision_loss)]
    pub fn proceed_to_details(&mut self, profile: Option<&User>) -> Result<(), CoreError> {
        let FlowState::SeatSelection {
            schedule,
            schedule_id,
            selection,
            ..
        } = &self.state
        else {
            return Err(CoreError::InvalidTransition {
                expected: "seat selection",
            });
        };

        if selection.is_empty() {
            return Err(CoreError::Validation("select at least one seat".into()));
        }
        if schedule.departure.is_none() || schedule.arrival.is_none() {
            return Err(CoreError::DataIntegrity(
                "this schedule is missing its departure or arrival time".into(),
            ));
        }

        let passengers: Vec<PassengerDetail> = selection
            .ids()
            .iter()
            .map(|seat_id| PassengerDetail::empty(seat_id.clone()))
            .collect();
        let contact = ContactDetails {
            email: profile.and_then(|u| u.email.clone()).unwrap_or_default(),
            phone: profile.and_then(|u| u.phone.clone()).unwrap_or_default(),
        };
        let draft = BookingDraft {
            schedule_id: schedule_id.clone(),
            seat_ids: selection.ids().to_vec(),
            passengers,
            contact,
            boarding_point: None,
            deboarding_point: None,
            payment_method: PaymentMethod::default(),
            total_fare: schedule.fare_per_seat * selection.len() as f64,
        };

        let FlowState::SeatSelection {
            schedule, layout, ..
        } = std::mem::replace(&mut self.state, FlowState::Search)
        else {
            unreachable!("state checked above");
        };
        self.state = FlowState::PassengerDetails {
            schedule,
            layout,
            draft,
        };
        Ok(())
    }

    // ── Details screen ───────────────────────────────────────────────

    /// The in-progress draft, while on the details screen.
    pub fn draft(&self) -> Option<&BookingDraft> {
        match &self.state {
            FlowState::PassengerDetails { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Pickup points for the schedule's origin city.
    pub fn boarding_points(&self) -> Vec<BoardingPoint> {
        self.details_schedule()
            .map(|s| points_for_city(&s.route.origin))
            .unwrap_or_default()
    }

    /// Drop points for the schedule's destination city.
    pub fn deboarding_points(&self) -> Vec<BoardingPoint> {
        self.details_schedule()
            .map(|s| points_for_city(&s.route.destination))
            .unwrap_or_default()
    }

    pub fn set_boarding_point(&mut self, point_id: &str) -> Result<(), CoreError> {
        let point = self
            .boarding_points()
            .into_iter()
            .find(|p| p.id == point_id)
            .ok_or_else(|| CoreError::Validation("unknown boarding point".into()))?;
        self.draft_mut()?.boarding_point = Some(point);
        Ok(())
    }

    pub fn set_deboarding_point(&mut self, point_id: &str) -> Result<(), CoreError> {
        let point = self
            .deboarding_points()
            .into_iter()
            .find(|p| p.id == point_id)
            .ok_or_else(|| CoreError::Validation("unknown deboarding point".into()))?;
        self.draft_mut()?.deboarding_point = Some(point);
        Ok(())
    }

    pub fn set_contact(&mut self, email: String, phone: String) -> Result<(), CoreError> {
        let draft = self.draft_mut()?;
        draft.contact = ContactDetails { email, phone };
        Ok(())
    }

    /// Fill in one passenger record (indexed in seat-pick order).
    pub fn set_passenger(
        &mut self,
        index: usize,
        name: String,
        age: Option<u8>,
        gender: Option<Gender>,
    ) -> Result<(), CoreError> {
        let draft = self.draft_mut()?;
        let Some(passenger) = draft.passengers.get_mut(index) else {
            return Err(CoreError::Validation(format!(
                "no passenger record at position {}",
                index + 1
            )));
        };
        passenger.name = name;
        passenger.age = age;
        passenger.gender = gender;
        Ok(())
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) -> Result<(), CoreError> {
        self.draft_mut()?.payment_method = method;
        Ok(())
    }

    fn draft_mut(&mut self) -> Result<&mut BookingDraft, CoreError> {
        match &mut self.state {
            FlowState::PassengerDetails { draft, .. } => Ok(draft),
            _ => Err(CoreError::InvalidTransition {
                expected: "passenger details",
            }),
        }
    }

    fn details_schedule(&self) -> Option<&Schedule> {
        match &self.state {
            FlowState::PassengerDetails { schedule, .. } => Some(schedule),
            _ => None,
        }
    }

    /// The details-screen guard, in order: points chosen, contact
    /// valid, count invariant, per-passenger fields, positive fare.
    /// First violation wins; no network call happens on failure.
    fn validate_draft(draft: &BookingDraft) -> Result<(), CoreError> {
        if draft.boarding_point.is_none() {
            return Err(CoreError::Validation("choose a boarding point".into()));
        }
        if draft.deboarding_point.is_none() {
            return Err(CoreError::Validation("choose a deboarding point".into()));
        }
        validate_details(&draft.contact, &draft.passengers, draft.seat_ids.len())
            .map_err(CoreError::Validation)?;
        if draft.total_fare <= 0.0 {
            return Err(CoreError::Validation(
                "fare could not be determined for this route".into(),
            ));
        }
        Ok(())
    }

    // ── Submission → Confirmed ───────────────────────────────────────

    /// Submit the draft. Branches on payment method:
    ///
    /// - `Cash`: create the booking, done.
    /// - `Online`: create the booking (payment pending), create a
    ///   payment order, hand off to the checkout, verify the proof.
    ///
    /// On any failure the flow stays on the details screen with the
    /// surfaced error and the draft intact -- resubmission is allowed.
    /// A verification failure after the checkout reported success maps
    /// to [`CoreError::PaymentUnrecorded`], the severe case.
    pub async fn submit(&mut self, collector: &dyn PaymentCollector) -> Result<Booking, CoreError> {
        let FlowState::PassengerDetails { draft, .. } = &self.state else {
            return Err(CoreError::InvalidTransition {
                expected: "passenger details",
            });
        };
        if self.busy {
            return Err(CoreError::Busy);
        }
        Self::validate_draft(draft)?;
        let draft = draft.clone();

        self.busy = true;
        let result = self.perform_submission(&draft, collector).await;
        self.busy = false;

        let booking = result?;
        debug!(booking_id = %booking.id, "booking confirmed");
        self.state = FlowState::Confirmed {
            booking: booking.clone(),
        };
        Ok(booking)
    }

    async fn perform_submission(
        &self,
        draft: &BookingDraft,
        collector: &dyn PaymentCollector,
    ) -> Result<Booking, CoreError> {
        let booking = self.services.create_booking(draft).await?;

        match draft.payment_method {
            PaymentMethod::Cash => Ok(booking),
            PaymentMethod::Online => {
                let order = self.services.create_payment_order(&booking.id).await?;
                let request = CheckoutRequest {
                    order,
                    prefill: draft.contact.clone(),
                };
                match collector.collect(&request).await {
                    PaymentOutcome::Completed(proof) => self
                        .services
                        .verify_payment(&booking.id, &proof)
                        .await
                        .map_err(|e| match e {
                            CoreError::Api(api) => CoreError::PaymentUnrecorded(api.to_string()),
                            other => other,
                        }),
                    PaymentOutcome::Failed(message) => Err(CoreError::PaymentFailed(message)),
                    PaymentOutcome::Dismissed => Err(CoreError::PaymentDismissed),
                }
            }
        }
    }

    /// The committed booking, once confirmed.
    pub fn confirmed_booking(&self) -> Option<&Booking> {
        match &self.state {
            FlowState::Confirmed { booking } => Some(booking),
            _ => None,
        }
    }
}
