//! Clap derive structures for the `shuttly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// shuttly -- book shuttle seats from the command line
#[derive(Debug, Parser)]
#[command(
    name = "shuttly",
    version,
    about = "Book and manage shuttle trips from the command line",
    long_about = "A command-line client for the Shuttly booking service.\n\n\
        Search routes, pick seats, pay cash or online, and review your\n\
        trips. Admins manage vehicles, drivers, and schedules.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "SHUTTLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server base URL (overrides profile)
    #[arg(long, short = 's', env = "SHUTTLY_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SHUTTLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SHUTTLY_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with email and password
    Login(LoginArgs),

    /// Register or log in with a phone number (OTP)
    #[command(alias = "reg")]
    Register(RegisterArgs),

    /// End the current session
    Logout,

    /// Show the logged-in account
    Whoami,

    /// Search schedules for a route and date
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Book a trip (interactive)
    #[command(alias = "b")]
    Book(BookArgs),

    /// Manage your bookings
    #[command(alias = "bk")]
    Bookings(BookingsArgs),

    /// Rate a completed trip
    Review(ReviewArgs),

    /// Administer vehicles, drivers, schedules, and bookings
    Admin(AdminArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted if omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Log in to the admin console
    #[arg(long)]
    pub admin: bool,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Phone number (10 digits; prompted if omitted)
    #[arg(long)]
    pub phone: Option<String>,
}

// ── Search & booking ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Origin city
    #[arg(long, short = 'f', value_name = "CITY")]
    pub from: String,

    /// Destination city
    #[arg(long, short = 't', value_name = "CITY")]
    pub to: String,

    /// Travel date (YYYY-MM-DD)
    #[arg(long, short = 'd')]
    pub date: String,
}

#[derive(Debug, Args)]
pub struct BookArgs {
    /// Origin city (prompted if omitted)
    #[arg(long, short = 'f', value_name = "CITY")]
    pub from: Option<String>,

    /// Destination city (prompted if omitted)
    #[arg(long, short = 't', value_name = "CITY")]
    pub to: Option<String>,

    /// Travel date (YYYY-MM-DD; prompted if omitted)
    #[arg(long, short = 'd')]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct BookingsArgs {
    #[command(subcommand)]
    pub command: BookingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BookingsCommand {
    /// List your bookings
    List,

    /// Show one booking
    Show {
        /// Booking id
        id: String,
    },

    /// Cancel a booking
    Cancel {
        /// Booking id
        id: String,
    },

    /// Download the printable ticket
    Ticket {
        /// Booking id
        id: String,

        /// Output file (defaults to ticket-<id>.pdf)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct ReviewArgs {
    /// Booking id
    pub booking: String,

    /// Rating, 1-5
    #[arg(long, short = 'r')]
    pub rating: u8,

    /// Review comment
    #[arg(long, short = 'c', default_value = "")]
    pub comment: String,
}

// ── Admin ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Manage the vehicle fleet
    #[command(alias = "veh")]
    Vehicles(VehiclesArgs),

    /// Manage drivers
    Drivers(DriversArgs),

    /// Manage dispatched schedules
    #[command(alias = "sched")]
    Schedules(SchedulesArgs),

    /// View and assign bookings
    Bookings(AdminBookingsArgs),
}

#[derive(Debug, Args)]
pub struct VehiclesArgs {
    #[command(subcommand)]
    pub command: VehiclesCommand,
}

#[derive(Debug, Subcommand)]
pub enum VehiclesCommand {
    /// List vehicles
    List,

    /// Add a vehicle
    Create {
        /// Display name
        name: String,

        /// Registration plate
        #[arg(long)]
        registration: String,

        /// Passenger capacity
        #[arg(long)]
        capacity: u32,
    },

    /// Update a vehicle
    Update {
        /// Vehicle id
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        registration: String,

        #[arg(long)]
        capacity: u32,
    },

    /// Remove a vehicle
    Delete {
        /// Vehicle id
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct DriversArgs {
    #[command(subcommand)]
    pub command: DriversCommand,
}

#[derive(Debug, Subcommand)]
pub enum DriversCommand {
    /// List drivers
    List,

    /// Add a driver
    Create {
        /// Full name
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        license: String,
    },

    /// Update a driver
    Update {
        /// Driver id
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        #[arg(long)]
        license: String,
    },

    /// Remove a driver
    Delete {
        /// Driver id
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct SchedulesArgs {
    #[command(subcommand)]
    pub command: SchedulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SchedulesCommand {
    /// List schedules
    List,

    /// Dispatch a new schedule
    Create {
        /// Origin city
        #[arg(long, short = 'f')]
        from: String,

        /// Destination city
        #[arg(long, short = 't')]
        to: String,

        /// Departure (RFC 3339, e.g. 2025-06-14T08:30:00Z)
        #[arg(long)]
        departure: String,

        /// Arrival (RFC 3339)
        #[arg(long)]
        arrival: String,

        /// Fare per seat
        #[arg(long)]
        fare: f64,

        /// Vehicle id
        #[arg(long)]
        vehicle: String,
    },

    /// Update a schedule
    Update {
        /// Schedule id
        id: String,

        #[arg(long, short = 'f')]
        from: String,

        #[arg(long, short = 't')]
        to: String,

        #[arg(long)]
        departure: String,

        #[arg(long)]
        arrival: String,

        #[arg(long)]
        fare: f64,

        #[arg(long)]
        vehicle: String,
    },

    /// Remove a schedule
    Delete {
        /// Schedule id
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct AdminBookingsArgs {
    #[command(subcommand)]
    pub command: AdminBookingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminBookingsCommand {
    /// List all bookings
    List,

    /// Assign a vehicle and/or driver to a booking
    Assign {
        /// Booking id
        id: String,

        #[arg(long)]
        vehicle: Option<String>,

        #[arg(long)]
        driver: Option<String>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved configuration
    Show,

    /// Set a profile's server URL (creates the profile if needed)
    SetServer {
        /// Server base URL
        url: String,

        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,
    },

    /// Make a profile the default
    Use {
        /// Profile name
        profile: String,
    },

    /// Print the config file path
    Path,
}
