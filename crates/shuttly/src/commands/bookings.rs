//! Booking history command handlers: list, show, cancel, ticket.

use std::path::PathBuf;

use tabled::Tabled;

use shuttly_core::Booking;

use crate::cli::{BookingsArgs, BookingsCommand, GlobalOpts};
use crate::config::AppContext;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct BookingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Route")]
    route: String,
    #[tabled(rename = "Departure")]
    departure: String,
    #[tabled(rename = "Seats")]
    seats: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Payment")]
    payment: String,
    #[tabled(rename = "Total")]
    total: String,
}

impl From<&Booking> for BookingRow {
    fn from(b: &Booking) -> Self {
        Self {
            id: b.id.clone(),
            route: b.route.to_string(),
            departure: b
                .departure
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "?".into()),
            seats: b.seat_numbers.join(","),
            status: b.status.to_string(),
            payment: b.payment_status.to_string(),
            total: format!("₹{:.2}", b.total_fare),
        }
    }
}

/// Multi-line detail view for a single booking.
pub fn describe_booking(b: &Booking) -> String {
    let mut lines = vec![
        format!("Booking:   {}", b.id),
        format!("Route:     {}", b.route),
    ];
    if let Some(departure) = b.departure {
        lines.push(format!("Departure: {}", departure.format("%Y-%m-%d %H:%M")));
    }
    if !b.seat_numbers.is_empty() {
        lines.push(format!("Seats:     {}", b.seat_numbers.join(", ")));
    }
    if !b.passenger_names.is_empty() {
        lines.push(format!("Riders:    {}", b.passenger_names.join(", ")));
    }
    lines.push(format!("Status:    {}", b.status));
    lines.push(format!("Payment:   {}", b.payment_status));
    lines.push(format!("Total:     ₹{:.2}", b.total_fare));
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: BookingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::gate_command(&ctx.session, "/my-bookings")?;

    match args.command {
        BookingsCommand::List => {
            let spinner = util::spinner("Fetching bookings...");
            let result = ctx.client.my_bookings().await;
            spinner.finish_and_clear();

            let bookings: Vec<Booking> = result
                .map_err(CliError::from_api)?
                .into_iter()
                .map(Booking::from)
                .collect();

            if bookings.is_empty() {
                if !global.quiet {
                    eprintln!("No bookings yet -- `shuttly book` to make one.");
                }
                return Ok(());
            }
            let out = output::render_list(
                &global.output,
                &bookings,
                |b| BookingRow::from(b),
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BookingsCommand::Show { id } => {
            let booking = find_booking(ctx, &id).await?;
            let out =
                output::render_single(&global.output, &booking, describe_booking, |b| b.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BookingsCommand::Cancel { id } => {
            if !util::confirm(&format!("Cancel booking {id}?"), global.yes)? {
                return Ok(());
            }
            let spinner = util::spinner("Cancelling...");
            let result = ctx.client.cancel_booking(&id).await;
            spinner.finish_and_clear();

            let booking = Booking::from(result.map_err(CliError::from_api)?);
            if !global.quiet {
                eprintln!("Booking cancelled ({})", booking.payment_status);
            }
            Ok(())
        }

        BookingsCommand::Ticket { id, out } => {
            let spinner = util::spinner("Downloading ticket...");
            let result = ctx.client.booking_ticket(&id).await;
            spinner.finish_and_clear();

            let bytes = result.map_err(CliError::from_api)?;
            let path = out.unwrap_or_else(|| PathBuf::from(format!("ticket-{id}.pdf")));
            std::fs::write(&path, bytes)?;
            if !global.quiet {
                eprintln!("Ticket written to {}", path.display());
            }
            Ok(())
        }
    }
}

/// The backend has no single-booking read; resolve ids against the
/// history list.
async fn find_booking(ctx: &AppContext, id: &str) -> Result<Booking, CliError> {
    let spinner = util::spinner("Fetching bookings...");
    let result = ctx.client.my_bookings().await;
    spinner.finish_and_clear();

    result
        .map_err(CliError::from_api)?
        .into_iter()
        .map(Booking::from)
        .find(|b| b.id == id)
        .ok_or_else(|| CliError::NotFound {
            resource: "booking".into(),
            identifier: id.to_owned(),
            list_command: "bookings list".into(),
        })
}
