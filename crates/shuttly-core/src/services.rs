// ── Production collaborator wiring ──
//
// Implements the flow's and session's collaborator traits for the real
// `ApiClient`, converting wire shapes into domain types at this
// boundary and nowhere else.

use async_trait::async_trait;
use chrono::NaiveDate;

use shuttly_api::ApiClient;
use shuttly_api::models::{BookingPayload, ContactPayload, PassengerPayload, VerifyPaymentPayload};

use crate::error::CoreError;
use crate::flow::{BookingDraft, BookingServices};
use crate::model::{Booking, Schedule, ScheduleId, User};
use crate::payment::{PaymentOrder, PaymentProof};
use crate::seatmap::SeatLayout;
use crate::session::IdentityServices;

#[async_trait]
impl BookingServices for ApiClient {
    async fn search_schedules(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<Schedule>, CoreError> {
        let schedules = ApiClient::search_schedules(self, origin, destination, date).await?;
        Ok(schedules.into_iter().map(Schedule::from).collect())
    }

    async fn seat_layout(&self, schedule_id: &ScheduleId) -> Result<SeatLayout, CoreError> {
        let seats = ApiClient::seat_layout(self, schedule_id.as_str()).await?;
        SeatLayout::from_wire(seats)
    }

    async fn create_booking(&self, draft: &BookingDraft) -> Result<Booking, CoreError> {
        let payload = to_booking_payload(draft)?;
        let booking = ApiClient::create_booking(self, &payload).await?;
        Ok(booking.into())
    }

    async fn create_payment_order(&self, booking_id: &str) -> Result<PaymentOrder, CoreError> {
        let order = ApiClient::create_payment_order(self, booking_id).await?;
        Ok(PaymentOrder {
            order_id: order.order.id,
            amount_minor: order.order.amount,
            currency: order.order.currency,
            gateway_key_id: order.gateway_key_id,
        })
    }

    async fn verify_payment(
        &self,
        booking_id: &str,
        proof: &PaymentProof,
    ) -> Result<Booking, CoreError> {
        let payload = VerifyPaymentPayload {
            razorpay_order_id: proof.order_id.clone(),
            razorpay_payment_id: proof.payment_id.clone(),
            razorpay_signature: proof.signature.clone(),
            booking_id: booking_id.to_owned(),
        };
        let booking = ApiClient::verify_payment(self, &payload).await?;
        Ok(booking.into())
    }
}

#[async_trait]
impl IdentityServices for ApiClient {
    async fn current_user(&self) -> Result<User, CoreError> {
        let user = ApiClient::current_user(self).await?;
        Ok(user.into())
    }
}

/// Flatten a validated draft into the wire payload. Missing fields
/// surface as validation errors; the flow's own guard runs first.
fn to_booking_payload(draft: &BookingDraft) -> Result<BookingPayload, CoreError> {
    let boarding = draft
        .boarding_point
        .as_ref()
        .ok_or_else(|| CoreError::Validation("choose a boarding point".into()))?;
    let deboarding = draft
        .deboarding_point
        .as_ref()
        .ok_or_else(|| CoreError::Validation("choose a deboarding point".into()))?;

    let passengers = draft
        .passengers
        .iter()
        .map(|p| {
            let age = p
                .age
                .ok_or_else(|| CoreError::Validation("passenger age is required".into()))?;
            let gender = p
                .gender
                .ok_or_else(|| CoreError::Validation("passenger gender is required".into()))?;
            Ok(PassengerPayload {
                seat_id: p.seat_id.clone(),
                name: p.name.trim().to_owned(),
                age,
                gender: gender.to_string(),
            })
        })
        .collect::<Result<Vec<_>, CoreError>>()?;

    Ok(BookingPayload {
        schedule_id: draft.schedule_id.to_string(),
        seat_ids: draft.seat_ids.clone(),
        passengers,
        contact: ContactPayload {
            email: draft.contact.email.clone(),
            phone: draft.contact.phone.clone(),
        },
        boarding_point_id: boarding.id.clone(),
        deboarding_point_id: deboarding.id.clone(),
        payment_method: draft.payment_method.to_string(),
        total_fare: draft.total_fare,
    })
}
