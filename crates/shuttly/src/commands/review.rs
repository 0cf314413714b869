//! Rate a completed trip.

use shuttly_api::models::ReviewPayload;

use crate::cli::{GlobalOpts, ReviewArgs};
use crate::config::AppContext;
use crate::error::CliError;

use super::util;

pub async fn handle(
    ctx: &AppContext,
    args: ReviewArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::gate_command(&ctx.session, "/my-bookings")?;

    if !(1..=5).contains(&args.rating) {
        return Err(CliError::Validation {
            field: "rating".into(),
            reason: "must be between 1 and 5".into(),
        });
    }

    let payload = ReviewPayload {
        booking_id: args.booking,
        rating: args.rating,
        comment: args.comment,
    };

    let spinner = util::spinner("Submitting review...");
    let result = ctx.client.submit_review(&payload).await;
    spinner.finish_and_clear();

    let message = result.map_err(CliError::from_api)?;
    if !global.quiet {
        eprintln!("{message}");
    }
    Ok(())
}
