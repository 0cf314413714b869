//! One-shot schedule search.

use tabled::Tabled;

use shuttly_core::{DistanceTableFare, FarePolicy, Schedule};

use crate::cli::{GlobalOpts, SearchArgs};
use crate::config::AppContext;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Route")]
    route: String,
    #[tabled(rename = "Departure")]
    departure: String,
    #[tabled(rename = "Fare/seat")]
    fare: String,
    #[tabled(rename = "Seats")]
    seats: String,
    #[tabled(rename = "Rating")]
    rating: String,
}

impl From<&Schedule> for ScheduleRow {
    fn from(s: &Schedule) -> Self {
        Self {
            id: s.id.clone(),
            route: s.route.to_string(),
            departure: s
                .departure
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "?".into()),
            fare: format!("₹{:.2}", s.fare_per_seat),
            seats: s.available_seats.to_string(),
            rating: match s.average_rating {
                Some(rating) => format!("{rating:.1} ({})", s.num_reviews),
                None => "-".into(),
            },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &AppContext,
    args: SearchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::gate_command(&ctx.session, "/new-booking")?;
    let date = util::parse_date(&args.date)?;

    let spinner = util::spinner("Searching schedules...");
    let result = ctx.client.search_schedules(&args.from, &args.to, date).await;
    spinner.finish_and_clear();

    let schedules: Vec<Schedule> = result
        .map_err(CliError::from_api)?
        .into_iter()
        .map(Schedule::from)
        .collect();

    if schedules.is_empty() {
        if !global.quiet {
            eprintln!("No schedules found for {} → {} on {date}", args.from, args.to);
        }
        return Ok(());
    }

    let out = output::render_list(
        &global.output,
        &schedules,
        |s| ScheduleRow::from(s),
        |s| s.id.clone(),
    );
    output::print_output(&out, global.quiet);

    // Advisory estimate from the pricing policy; zero means the route
    // is not in the table.
    let estimate = DistanceTableFare::default().single_ticket_fare(&args.from, &args.to);
    if estimate > 0.0 && !global.quiet {
        eprintln!("Estimated single-ticket fare: ₹{estimate:.2}");
    }

    Ok(())
}
