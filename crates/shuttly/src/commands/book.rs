//! The interactive booking wizard.
//!
//! A thin rendering over `shuttly_core::BookingFlow`: every screen is
//! a set of prompts, every transition goes through the state machine's
//! guarded methods, and every collaborator round-trip shows a spinner.
//! The payment checkout is the interactive collector at the bottom of
//! this file.

use std::sync::Arc;

use async_trait::async_trait;
use dialoguer::{Input, Select};
use owo_colors::OwoColorize;

use shuttly_core::{
    BookingFlow, CheckoutRequest, CoreError, DistanceTableFare, Gender, PaymentCollector,
    PaymentMethod, PaymentOutcome, PaymentProof, Schedule, SearchQuery, Seat, SeatAppearance,
    SelectionSet,
};

use crate::cli::{BookArgs, GlobalOpts};
use crate::config::AppContext;
use crate::error::CliError;

use super::util;

pub async fn handle(
    ctx: &mut AppContext,
    args: BookArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::gate_command(&ctx.session, "/new-booking")?;

    let fare_policy = Arc::new(DistanceTableFare::default());
    let mut flow = BookingFlow::new(ctx.client.clone(), fare_policy.clone());
    let color = crate::output::should_color(&global.color);

    // ── Search form ──────────────────────────────────────────────────
    let cities = fare_policy.known_cities();
    let origin = match args.from {
        Some(city) => city,
        None => select_city("Origin", &cities, 0)?,
    };
    let destination = match args.to {
        Some(city) => city,
        None => select_city("Destination", &cities, 1)?,
    };
    let date = match args.date {
        Some(raw) => util::parse_date(&raw)?,
        None => prompt_date()?,
    };

    let estimate = flow.estimated_fare(&origin, &destination);
    if estimate > 0.0 && !global.quiet {
        eprintln!("Estimated fare: ₹{estimate:.2} per seat");
    }

    let spinner = util::spinner("Searching schedules...");
    let result = flow
        .submit_search(SearchQuery {
            origin,
            destination,
            date: Some(date),
        })
        .await;
    spinner.finish_and_clear();
    let count = result.map_err(CliError::from_core)?;

    // ── Results ──────────────────────────────────────────────────────
    if count == 0 {
        eprintln!("No schedules found for that route and date.");
        return Ok(());
    }

    let labels: Vec<String> = flow.results().iter().map(describe_schedule).collect();
    let pick = Select::new()
        .with_prompt("Pick a schedule")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;
    let schedule_id = flow.results()[pick].id.clone();

    let spinner = util::spinner("Loading seat map...");
    let result = flow.choose_schedule(&schedule_id).await;
    spinner.finish_and_clear();
    result.map_err(CliError::from_core)?;

    // ── Seat selection ───────────────────────────────────────────────
    select_seats(&mut flow, color)?;
    flow.proceed_to_details(ctx.session.user())
        .map_err(CliError::from_core)?;

    // ── Passenger details ────────────────────────────────────────────
    collect_details(ctx, &mut flow)?;

    // ── Review & submit ──────────────────────────────────────────────
    print_summary(&flow, color);
    if !util::confirm("Submit this booking?", global.yes)? {
        eprintln!("Booking abandoned.");
        return Ok(());
    }

    let collector = InteractiveCollector;
    loop {
        let submitting_cash = flow
            .draft()
            .is_some_and(|d| d.payment_method == PaymentMethod::Cash);
        let spinner = submitting_cash.then(|| util::spinner("Submitting booking..."));
        let result = flow.submit(&collector).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        match result {
            Ok(booking) => {
                if color {
                    eprintln!("{}", "Booking confirmed!".green().bold());
                } else {
                    eprintln!("Booking confirmed!");
                }
                let out = crate::output::render_single(
                    &global.output,
                    &booking,
                    super::bookings::describe_booking,
                    |b| b.id.clone(),
                );
                crate::output::print_output(&out, global.quiet);
                if !global.quiet {
                    eprintln!(
                        "Ticket: `shuttly bookings ticket {id}`  Cancel: `shuttly bookings cancel {id}`",
                        id = booking.id
                    );
                }
                return Ok(());
            }
            // Recoverable payment outcomes: offer to try again with the
            // draft intact.
            Err(err @ (CoreError::PaymentFailed(_) | CoreError::PaymentDismissed)) => {
                eprintln!("{err}");
                if util::confirm("Try the payment again?", false)? {
                    continue;
                }
                eprintln!("Booking not submitted.");
                return Ok(());
            }
            Err(other) => return Err(CliError::from_core(other)),
        }
    }
}

// ── Search prompts ──────────────────────────────────────────────────

fn select_city(prompt: &str, cities: &[String], default: usize) -> Result<String, CliError> {
    let pick = Select::new()
        .with_prompt(prompt)
        .items(cities)
        .default(default.min(cities.len().saturating_sub(1)))
        .interact()
        .map_err(util::prompt_err)?;
    Ok(cities[pick].clone())
}

fn prompt_date() -> Result<chrono::NaiveDate, CliError> {
    let raw: String = Input::new()
        .with_prompt("Travel date (YYYY-MM-DD)")
        .validate_with(|input: &String| {
            util::parse_date(input).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(util::prompt_err)?;
    util::parse_date(&raw)
}

fn describe_schedule(s: &Schedule) -> String {
    let departure = s
        .departure
        .map(|d| d.format("%H:%M").to_string())
        .unwrap_or_else(|| "??:??".into());
    let rating = match s.average_rating {
        Some(rating) => format!("{rating:.1}★"),
        None => "unrated".into(),
    };
    format!(
        "{departure}  {}  ₹{:.2}/seat  {} seats left  {rating}",
        s.route, s.fare_per_seat, s.available_seats
    )
}

// ── Seat selection screen ───────────────────────────────────────────

/// Loop: render the seat map, offer the selectable seats plus
/// "Continue". Booked and driver seats are shown but never offered --
/// the model would no-op them anyway.
fn select_seats(flow: &mut BookingFlow, color: bool) -> Result<(), CliError> {
    loop {
        let (map_lines, selectable) = match flow.state() {
            shuttly_core::FlowState::SeatSelection {
                layout, selection, ..
            } => (seat_map_lines(layout.seats(), selection, color), {
                layout
                    .seats()
                    .iter()
                    .filter(|s| {
                        matches!(
                            s.appearance(),
                            SeatAppearance::Available | SeatAppearance::AvailableFemaleOnly
                        )
                    })
                    .map(|s| (s.id.clone(), s.number.clone()))
                    .collect::<Vec<_>>()
            }),
            _ => return Ok(()),
        };

        eprintln!("\nSeat map:");
        for line in map_lines {
            eprintln!("  {line}");
        }

        let selected = flow.selected_seats().len();
        let mut items: Vec<String> = vec![format!(
            "Continue ({selected} selected, ₹{:.2})",
            flow.total_fare()
        )];
        items.extend(selectable.iter().map(|(id, number)| {
            if flow.selected_seats().contains(id) {
                format!("Deselect seat {number}")
            } else {
                format!("Select seat {number}")
            }
        }));

        let pick = Select::new()
            .with_prompt("Seats")
            .items(&items)
            .default(0)
            .interact()
            .map_err(util::prompt_err)?;

        if pick == 0 {
            if selected == 0 {
                eprintln!("Select at least one seat.");
                continue;
            }
            return Ok(());
        }
        let (seat_id, _) = &selectable[pick - 1];
        flow.toggle_seat(seat_id).map_err(CliError::from_core)?;
    }
}

fn seat_map_lines(seats: &[Seat], selection: &SelectionSet, color: bool) -> Vec<String> {
    seats
        .iter()
        .map(|seat| {
            let marker = if selection.is_selected(&seat.id) {
                let m = format!("[✓ {}]", seat.number);
                if color { m.cyan().to_string() } else { m }
            } else {
                match seat.appearance() {
                    SeatAppearance::Driver => {
                        let m = "[ D ]".to_owned();
                        if color { m.dimmed().to_string() } else { m }
                    }
                    SeatAppearance::Booked => {
                        let m = format!("[x {}]", seat.number);
                        if color { m.red().to_string() } else { m }
                    }
                    SeatAppearance::AvailableFemaleOnly => {
                        let m = format!("[♀ {}]", seat.number);
                        if color { m.magenta().to_string() } else { m }
                    }
                    SeatAppearance::Available => {
                        let m = format!("[  {}]", seat.number);
                        if color { m.green().to_string() } else { m }
                    }
                }
            };
            marker
        })
        .collect()
}

// ── Details screen ──────────────────────────────────────────────────

fn collect_details(ctx: &AppContext, flow: &mut BookingFlow) -> Result<(), CliError> {
    let draft = flow.draft().expect("details screen has a draft");

    // Contact: session profile prefill, then the config profile's
    // stored contact, then whatever the user types.
    let email_default = if draft.contact.email.is_empty() {
        ctx.profile.contact_email.clone().unwrap_or_default()
    } else {
        draft.contact.email.clone()
    };
    let phone_default = if draft.contact.phone.is_empty() {
        ctx.profile.contact_phone.clone().unwrap_or_default()
    } else {
        draft.contact.phone.clone()
    };

    let email: String = Input::new()
        .with_prompt("Contact email")
        .with_initial_text(email_default)
        .interact_text()
        .map_err(util::prompt_err)?;
    let phone: String = Input::new()
        .with_prompt("Contact phone")
        .with_initial_text(phone_default)
        .interact_text()
        .map_err(util::prompt_err)?;
    flow.set_contact(email, phone).map_err(CliError::from_core)?;

    // One passenger per selected seat, in pick order.
    let seat_numbers = flow.selected_seat_numbers();
    for (index, seat_number) in seat_numbers.iter().enumerate() {
        eprintln!("Passenger for seat {seat_number}:");
        let name: String = Input::new()
            .with_prompt("  Name")
            .interact_text()
            .map_err(util::prompt_err)?;
        let age: u8 = Input::new()
            .with_prompt("  Age")
            .validate_with(|input: &String| match input.parse::<u8>() {
                Ok(age) if (1..=120).contains(&age) => Ok(()),
                _ => Err("age must be between 1 and 120".to_owned()),
            })
            .interact_text()
            .map_err(util::prompt_err)?
            .parse()
            .map_err(|_| CliError::Validation {
                field: "age".into(),
                reason: "not a number".into(),
            })?;
        let genders = [Gender::Female, Gender::Male, Gender::Other];
        let gender_pick = Select::new()
            .with_prompt("  Gender")
            .items(&genders.map(|g| g.to_string()))
            .default(0)
            .interact()
            .map_err(util::prompt_err)?;

        flow.set_passenger(index, name, Some(age), Some(genders[gender_pick]))
            .map_err(CliError::from_core)?;
    }

    // Boarding / deboarding points, derived from the route's cities.
    let boarding = flow.boarding_points();
    let pick = Select::new()
        .with_prompt("Boarding point")
        .items(&boarding.iter().map(|p| p.name.clone()).collect::<Vec<_>>())
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;
    let boarding_id = boarding[pick].id.clone();
    flow.set_boarding_point(&boarding_id)
        .map_err(CliError::from_core)?;

    let deboarding = flow.deboarding_points();
    let pick = Select::new()
        .with_prompt("Deboarding point")
        .items(&deboarding.iter().map(|p| p.name.clone()).collect::<Vec<_>>())
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;
    let deboarding_id = deboarding[pick].id.clone();
    flow.set_deboarding_point(&deboarding_id)
        .map_err(CliError::from_core)?;

    // Payment method.
    let methods = [PaymentMethod::Cash, PaymentMethod::Online];
    let pick = Select::new()
        .with_prompt("Payment method")
        .items(&methods.map(|m| m.to_string()))
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;
    flow.set_payment_method(methods[pick])
        .map_err(CliError::from_core)?;

    Ok(())
}

fn print_summary(flow: &BookingFlow, color: bool) {
    let Some(draft) = flow.draft() else { return };
    let seats = flow.selected_seat_numbers().join(", ");
    let header = "Booking summary";
    eprintln!();
    if color {
        eprintln!("{}", header.bold());
    } else {
        eprintln!("{header}");
    }
    eprintln!("  Seats:      {seats}");
    for passenger in &draft.passengers {
        let age = passenger.age.map_or_else(|| "?".into(), |a| a.to_string());
        let gender = passenger
            .gender
            .map_or_else(|| "?".into(), |g| g.to_string());
        eprintln!("  Passenger:  {} ({age}, {gender})", passenger.name);
    }
    if let Some(point) = &draft.boarding_point {
        eprintln!("  Board at:   {}", point.name);
    }
    if let Some(point) = &draft.deboarding_point {
        eprintln!("  Leave at:   {}", point.name);
    }
    eprintln!("  Contact:    {} / {}", draft.contact.email, draft.contact.phone);
    eprintln!("  Payment:    {}", draft.payment_method);
    eprintln!("  Total:      ₹{:.2}", draft.total_fare);
}

// ── Interactive payment collector ───────────────────────────────────

/// Stands in for the hosted checkout widget: shows the order, then maps
/// what the user reports back onto the widget's three callbacks.
struct InteractiveCollector;

#[async_trait]
impl PaymentCollector for InteractiveCollector {
    async fn collect(&self, request: &CheckoutRequest) -> PaymentOutcome {
        #[allow(clippy::cast_precision_loss)]
        let amount = request.order.amount_minor as f64 / 100.0;
        eprintln!();
        eprintln!("Online payment");
        eprintln!("  Order:    {}", request.order.order_id);
        eprintln!("  Amount:   ₹{amount:.2} {}", request.order.currency);
        eprintln!("  Merchant: {}", request.order.gateway_key_id);
        eprintln!("Complete the payment in the checkout, then report the result.");

        let choices = [
            "I completed the payment",
            "The payment failed",
            "Cancel the payment",
        ];
        let Ok(pick) = Select::new()
            .with_prompt("Checkout result")
            .items(&choices)
            .default(0)
            .interact()
        else {
            return PaymentOutcome::Dismissed;
        };

        match pick {
            0 => {
                let payment_id = prompt_or_dismiss("Payment id");
                let signature = prompt_or_dismiss("Signature");
                match (payment_id, signature) {
                    (Some(payment_id), Some(signature)) => {
                        PaymentOutcome::Completed(PaymentProof {
                            order_id: request.order.order_id.clone(),
                            payment_id,
                            signature,
                        })
                    }
                    _ => PaymentOutcome::Dismissed,
                }
            }
            1 => {
                let reason =
                    prompt_or_dismiss("Failure reason").unwrap_or_else(|| "unknown".into());
                PaymentOutcome::Failed(reason)
            }
            _ => PaymentOutcome::Dismissed,
        }
    }
}

fn prompt_or_dismiss(prompt: &str) -> Option<String> {
    Input::<String>::new().with_prompt(prompt).interact_text().ok()
}
