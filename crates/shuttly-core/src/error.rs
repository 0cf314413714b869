// Core error types
//
// The taxonomy the whole client shares: validation errors are caught
// before any network call and never logged as system failures;
// collaborator failures surface a message and leave state untouched;
// payment errors distinguish "nothing happened" from "money captured
// but booking not recorded".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A client-side guard failed before any network call. The message
    /// names the first offending field or passenger.
    #[error("{0}")]
    Validation(String),

    /// The data on hand is missing something it must have (schedule
    /// without timestamps, malformed identifier). Blocks the relevant
    /// transition rather than proceeding with undefined behavior.
    #[error("{0}")]
    DataIntegrity(String),

    /// The requested operation does not exist in the current step.
    #[error("not available in the current booking step (expected {expected})")]
    InvalidTransition { expected: &'static str },

    /// A collaborator call for this action is already in flight.
    #[error("a request is already in progress")]
    Busy,

    /// The payment gateway reported failure before capture.
    #[error("payment failed: {0}")]
    PaymentFailed(String),

    /// The user closed the payment gateway without paying.
    #[error("payment was cancelled before completion")]
    PaymentDismissed,

    /// The gateway captured the payment but the booking could not be
    /// recorded. The wording must not suggest the charge was reversed.
    #[error(
        "your payment was received, but the booking could not be recorded: {0}. \
         Do not pay again -- contact support with your payment reference."
    )]
    PaymentUnrecorded(String),

    /// Durable token storage failed (keyring / token file).
    #[error("token storage failed: {0}")]
    TokenStorage(String),

    /// A backend call failed; carries the normalized message.
    #[error(transparent)]
    Api(#[from] shuttly_api::Error),
}

impl CoreError {
    /// Whether this error should force a logout (expired/invalid session).
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_auth_error())
    }
}
