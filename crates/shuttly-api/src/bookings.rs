// Booking endpoints
//
// Create, history, cancel, and ticket download. All protected.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{BookingDto, BookingPayload};

impl ApiClient {
    /// Commit a booking.
    ///
    /// `POST /api/bookings`
    pub async fn create_booking(&self, payload: &BookingPayload) -> Result<BookingDto, Error> {
        let url = self.api_url("bookings");
        debug!(schedule_id = %payload.schedule_id, seats = payload.seat_ids.len(), "creating booking");
        self.post(url, payload).await
    }

    /// List the authenticated user's bookings, newest first.
    ///
    /// `GET /api/bookings/my`
    pub async fn my_bookings(&self) -> Result<Vec<BookingDto>, Error> {
        let url = self.api_url("bookings/my");
        debug!("fetching booking history");
        self.get(url, &[]).await
    }

    /// Cancel a booking.
    ///
    /// `PUT /api/bookings/{id}/cancel`
    pub async fn cancel_booking(&self, booking_id: &str) -> Result<BookingDto, Error> {
        let url = self.api_url(&format!("bookings/{booking_id}/cancel"));
        debug!(booking_id, "cancelling booking");
        self.put(url, &serde_json::json!({})).await
    }

    /// Download the printable ticket for a booking.
    ///
    /// `GET /api/bookings/{id}/ticket` -- returns the raw document
    /// bytes; the caller decides where to write them.
    pub async fn booking_ticket(&self, booking_id: &str) -> Result<Vec<u8>, Error> {
        let url = self.api_url(&format!("bookings/{booking_id}/ticket"));
        debug!(booking_id, "downloading ticket");
        self.get_bytes(url).await
    }
}
