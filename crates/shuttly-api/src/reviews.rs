// Review endpoint
//
// One call: rate a completed booking.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{MessageResponse, ReviewPayload};

impl ApiClient {
    /// Submit a rating and comment for a completed booking.
    ///
    /// `POST /api/reviews`
    pub async fn submit_review(&self, payload: &ReviewPayload) -> Result<String, Error> {
        let url = self.api_url("reviews");
        debug!(booking_id = %payload.booking_id, rating = payload.rating, "submitting review");

        let resp: MessageResponse = self.post_flat(url, payload).await?;
        if !resp.success {
            return Err(Error::Api {
                message: resp
                    .message
                    .unwrap_or_else(|| "review submission failed".into()),
            });
        }
        Ok(resp.message.unwrap_or_else(|| "review submitted".into()))
    }
}
