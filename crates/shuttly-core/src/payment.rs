// ── Payment collaborator seam ──
//
// The external checkout widget is a black box invoked with an order
// handle; this client only reacts to its three callbacks, modeled here
// as a three-variant outcome. Implementations: the CLI's interactive
// collector, recording fakes in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::passenger::ContactDetails;

/// A payment order handle issued by the backend for a pending booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub order_id: String,
    /// Amount in the gateway's minor unit (paise).
    pub amount_minor: u64,
    pub currency: String,
    /// Public key identifying the merchant to the gateway.
    pub gateway_key_id: String,
}

/// Everything the checkout needs: the order plus contact prefill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub order: PaymentOrder,
    pub prefill: ContactDetails,
}

/// The gateway's proof triple, handed back on successful capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProof {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// What the checkout reported. Mirrors the widget's success / failure /
/// dismiss callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The gateway captured the payment and produced proof.
    Completed(PaymentProof),
    /// The gateway reported a failure before capture.
    Failed(String),
    /// The user closed the checkout without paying.
    Dismissed,
}

/// Drives the external checkout for one order.
#[async_trait]
pub trait PaymentCollector: Send + Sync {
    async fn collect(&self, request: &CheckoutRequest) -> PaymentOutcome;
}
