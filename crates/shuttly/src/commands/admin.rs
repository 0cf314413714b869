//! Admin command handlers: vehicles, drivers, schedules, bookings.
//!
//! Thin forms over the admin CRUD endpoints; the only logic here is
//! input parsing, confirmation prompts, and table rendering.

use tabled::Tabled;

use shuttly_api::models::{
    AssignmentPayload, DriverPayload, SchedulePayload, VehiclePayload,
};
use shuttly_core::{Booking, Driver, Schedule, Vehicle};

use crate::cli::{
    AdminArgs, AdminBookingsCommand, AdminCommand, DriversCommand, GlobalOpts, SchedulesCommand,
    VehiclesCommand,
};
use crate::config::AppContext;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(ctx: &AppContext, args: AdminArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::gate_command(&ctx.session, "/admin")?;

    match args.command {
        AdminCommand::Vehicles(args) => vehicles(ctx, args.command, global).await,
        AdminCommand::Drivers(args) => drivers(ctx, args.command, global).await,
        AdminCommand::Schedules(args) => schedules(ctx, args.command, global).await,
        AdminCommand::Bookings(args) => bookings(ctx, args.command, global).await,
    }
}

// ── Vehicles ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct VehicleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Registration")]
    registration: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
}

impl From<&Vehicle> for VehicleRow {
    fn from(v: &Vehicle) -> Self {
        Self {
            id: v.id.clone(),
            name: v.name.clone(),
            registration: v.registration_number.clone().unwrap_or_default(),
            capacity: v.capacity.map(|c| c.to_string()).unwrap_or_default(),
        }
    }
}

async fn vehicles(
    ctx: &AppContext,
    command: VehiclesCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        VehiclesCommand::List => {
            let dtos = ctx
                .client
                .admin_list_vehicles()
                .await
                .map_err(CliError::from_api)?;
            let vehicles: Vec<Vehicle> = dtos.into_iter().map(Vehicle::from).collect();
            let out = output::render_list(
                &global.output,
                &vehicles,
                |v| VehicleRow::from(v),
                |v| v.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VehiclesCommand::Create {
            name,
            registration,
            capacity,
        } => {
            let payload = VehiclePayload {
                name,
                registration_number: registration,
                capacity,
            };
            ctx.client
                .admin_create_vehicle(&payload)
                .await
                .map_err(CliError::from_api)?;
            status(global, "Vehicle created");
            Ok(())
        }

        VehiclesCommand::Update {
            id,
            name,
            registration,
            capacity,
        } => {
            let payload = VehiclePayload {
                name,
                registration_number: registration,
                capacity,
            };
            ctx.client
                .admin_update_vehicle(&id, &payload)
                .await
                .map_err(CliError::from_api)?;
            status(global, "Vehicle updated");
            Ok(())
        }

        VehiclesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete vehicle '{id}'?"), global.yes)? {
                return Ok(());
            }
            ctx.client
                .admin_delete_vehicle(&id)
                .await
                .map_err(CliError::from_api)?;
            status(global, "Vehicle deleted");
            Ok(())
        }
    }
}

// ── Drivers ─────────────────────────────────────────────────────────

#[derive(Tabled)]
struct DriverRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "License")]
    license: String,
}

async fn drivers(
    ctx: &AppContext,
    command: DriversCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        DriversCommand::List => {
            let dtos = ctx
                .client
                .admin_list_drivers()
                .await
                .map_err(CliError::from_api)?;
            let drivers: Vec<Driver> = dtos.into_iter().map(Driver::from).collect();
            let out = output::render_list(
                &global.output,
                &drivers,
                |d| DriverRow {
                    id: d.id.clone(),
                    name: d.name.clone(),
                    phone: d.phone.clone().unwrap_or_default(),
                    license: d.license_number.clone().unwrap_or_default(),
                },
                |d| d.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DriversCommand::Create {
            name,
            phone,
            license,
        } => {
            util::validate_phone(&phone)?;
            let payload = DriverPayload {
                name,
                phone,
                license_number: license,
            };
            ctx.client
                .admin_create_driver(&payload)
                .await
                .map_err(CliError::from_api)?;
            status(global, "Driver created");
            Ok(())
        }

        DriversCommand::Update {
            id,
            name,
            phone,
            license,
        } => {
            util::validate_phone(&phone)?;
            let payload = DriverPayload {
                name,
                phone,
                license_number: license,
            };
            ctx.client
                .admin_update_driver(&id, &payload)
                .await
                .map_err(CliError::from_api)?;
            status(global, "Driver updated");
            Ok(())
        }

        DriversCommand::Delete { id } => {
            if !util::confirm(&format!("Delete driver '{id}'?"), global.yes)? {
                return Ok(());
            }
            ctx.client
                .admin_delete_driver(&id)
                .await
                .map_err(CliError::from_api)?;
            status(global, "Driver deleted");
            Ok(())
        }
    }
}

// ── Schedules ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AdminScheduleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Route")]
    route: String,
    #[tabled(rename = "Departure")]
    departure: String,
    #[tabled(rename = "Fare")]
    fare: String,
    #[tabled(rename = "Vehicle")]
    vehicle: String,
}

impl From<&Schedule> for AdminScheduleRow {
    fn from(s: &Schedule) -> Self {
        Self {
            id: s.id.clone(),
            route: s.route.to_string(),
            departure: s
                .departure
                .map(|d| d.to_rfc3339())
                .unwrap_or_else(|| "?".into()),
            fare: format!("₹{:.2}", s.fare_per_seat),
            vehicle: s
                .vehicle
                .as_ref()
                .map(|v| v.name.clone())
                .unwrap_or_default(),
        }
    }
}

async fn schedules(
    ctx: &AppContext,
    command: SchedulesCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        SchedulesCommand::List => {
            let dtos = ctx
                .client
                .admin_list_schedules()
                .await
                .map_err(CliError::from_api)?;
            let schedules: Vec<Schedule> = dtos.into_iter().map(Schedule::from).collect();
            let out = output::render_list(
                &global.output,
                &schedules,
                |s| AdminScheduleRow::from(s),
                |s| s.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SchedulesCommand::Create {
            from,
            to,
            departure,
            arrival,
            fare,
            vehicle,
        } => {
            let payload = schedule_payload(from, to, &departure, &arrival, fare, vehicle)?;
            ctx.client
                .admin_create_schedule(&payload)
                .await
                .map_err(CliError::from_api)?;
            status(global, "Schedule created");
            Ok(())
        }

        SchedulesCommand::Update {
            id,
            from,
            to,
            departure,
            arrival,
            fare,
            vehicle,
        } => {
            let payload = schedule_payload(from, to, &departure, &arrival, fare, vehicle)?;
            ctx.client
                .admin_update_schedule(&id, &payload)
                .await
                .map_err(CliError::from_api)?;
            status(global, "Schedule updated");
            Ok(())
        }

        SchedulesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete schedule '{id}'?"), global.yes)? {
                return Ok(());
            }
            ctx.client
                .admin_delete_schedule(&id)
                .await
                .map_err(CliError::from_api)?;
            status(global, "Schedule deleted");
            Ok(())
        }
    }
}

fn schedule_payload(
    from: String,
    to: String,
    departure: &str,
    arrival: &str,
    fare: f64,
    vehicle: String,
) -> Result<SchedulePayload, CliError> {
    if from == to {
        return Err(CliError::Validation {
            field: "route".into(),
            reason: "origin and destination must differ".into(),
        });
    }
    Ok(SchedulePayload {
        origin: from,
        destination: to,
        departure_date_time: util::parse_timestamp("departure", departure)?,
        arrival_date_time: util::parse_timestamp("arrival", arrival)?,
        fare_per_seat: fare,
        vehicle_id: vehicle,
    })
}

// ── Bookings ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct AdminBookingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Route")]
    route: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Payment")]
    payment: String,
    #[tabled(rename = "Total")]
    total: String,
}

async fn bookings(
    ctx: &AppContext,
    command: AdminBookingsCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        AdminBookingsCommand::List => {
            let dtos = ctx
                .client
                .admin_list_bookings()
                .await
                .map_err(CliError::from_api)?;
            let bookings: Vec<Booking> = dtos.into_iter().map(Booking::from).collect();
            let out = output::render_list(
                &global.output,
                &bookings,
                |b| AdminBookingRow {
                    id: b.id.clone(),
                    route: b.route.to_string(),
                    status: b.status.to_string(),
                    payment: b.payment_status.to_string(),
                    total: format!("₹{:.2}", b.total_fare),
                },
                |b| b.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AdminBookingsCommand::Assign {
            id,
            vehicle,
            driver,
        } => {
            if vehicle.is_none() && driver.is_none() {
                return Err(CliError::Validation {
                    field: "assignment".into(),
                    reason: "pass --vehicle and/or --driver".into(),
                });
            }
            let payload = AssignmentPayload {
                vehicle_id: vehicle,
                driver_id: driver,
            };
            ctx.client
                .admin_assign_booking(&id, &payload)
                .await
                .map_err(CliError::from_api)?;
            status(global, "Booking assignment updated");
            Ok(())
        }
    }
}

fn status(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}
