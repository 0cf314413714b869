// Payment endpoints
//
// Online payments are a three-step handshake: create an order for a
// pending booking, hand the order to the external gateway, then verify
// the gateway's proof triple server-side. Both endpoints return flat
// bodies rather than the `{ success, data }` envelope.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    BookingDto, OrderDto, PaymentOrderResponse, VerifyPaymentPayload, VerifyPaymentResponse,
};

/// A payment order plus the gateway key needed to drive the checkout.
#[derive(Debug, Clone)]
pub struct PaymentOrder {
    pub order: OrderDto,
    pub gateway_key_id: String,
}

impl ApiClient {
    /// Start an online payment for a pending booking.
    ///
    /// `POST /api/payments/create-order`
    pub async fn create_payment_order(&self, booking_id: &str) -> Result<PaymentOrder, Error> {
        let url = self.api_url("payments/create-order");
        debug!(booking_id, "creating payment order");

        let resp: PaymentOrderResponse = self
            .post_flat(url, &serde_json::json!({ "bookingId": booking_id }))
            .await?;

        if !resp.success {
            return Err(Error::Api {
                message: resp
                    .message
                    .unwrap_or_else(|| "payment order creation failed".into()),
            });
        }

        match (resp.order, resp.razorpay_key_id) {
            (Some(order), Some(gateway_key_id)) => Ok(PaymentOrder {
                order,
                gateway_key_id,
            }),
            _ => Err(Error::Api {
                message: "payment order response was missing order or key id".into(),
            }),
        }
    }

    /// Confirm a captured payment against its booking.
    ///
    /// `POST /api/payments/verify`
    ///
    /// Failure here after the gateway reported success is the severe
    /// case (money captured, booking not recorded); callers surface it
    /// distinctly.
    pub async fn verify_payment(&self, payload: &VerifyPaymentPayload) -> Result<BookingDto, Error> {
        let url = self.api_url("payments/verify");
        debug!(booking_id = %payload.booking_id, "verifying payment");

        let resp: VerifyPaymentResponse = self.post_flat(url, payload).await?;

        if !resp.success {
            return Err(Error::Api {
                message: resp
                    .message
                    .unwrap_or_else(|| "payment verification failed".into()),
            });
        }

        resp.booking.ok_or_else(|| Error::Api {
            message: "payment verified but no booking was returned".into(),
        })
    }
}
