//! `slots` CLI — inspect a day's booking grid and book appointments from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Show the slot grid for a 30-minute booking
//! slots grid --date 2026-03-16 --duration 30 -a appointments.json -p prefs.json
//!
//! # Same, as JSON for a front end
//! slots grid --date 2026-03-16 --duration 30 -a appointments.json --json
//!
//! # Check a manually entered time
//! slots check --date 2026-03-16 --start 09:15 --duration 45 -a appointments.json
//!
//! # List free windows of at least an hour
//! slots windows --date 2026-03-16 --min-duration 60 -a appointments.json
//!
//! # Book a slot, acknowledging any warning, and save it back to the file
//! slots book --date 2026-03-16 --start 09:00 --duration 30 -a appointments.json --confirm --save
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG` or pass `-v` for more detail.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Args, Parser, Subcommand};
use slot_engine::timefmt::parse_time;
use slot_engine::{
    Appointment, AppointmentId, BookingSession, CandidateSlot, Evaluation, FlowOutcome,
    GridSummary, InMemoryAppointmentStore, SchedulingPreferences,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Exit status when a warning needs acknowledgment and `--confirm` was not given.
const EXIT_NEEDS_CONFIRMATION: i32 = 2;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Appointment availability and booking CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Inputs shared by every subcommand.
#[derive(Args)]
struct DayArgs {
    /// Calendar day (YYYY-MM-DD)
    #[arg(short, long)]
    date: NaiveDate,
    /// JSON array of existing appointments (empty day if omitted)
    #[arg(short, long)]
    appointments: Option<PathBuf>,
    /// JSON scheduling preferences (defaults if omitted)
    #[arg(short, long)]
    preferences: Option<PathBuf>,
    /// Override the current time (YYYY-MM-DDTHH:MM); defaults to local now
    #[arg(long)]
    now: Option<String>,
    /// Id of the appointment being rescheduled
    #[arg(long)]
    editing: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every candidate slot for a booking of the given duration
    Grid {
        #[command(flatten)]
        day: DayArgs,
        /// Booking duration in minutes
        #[arg(long)]
        duration: u32,
        /// Print the grid as JSON
        #[arg(long)]
        json: bool,
    },
    /// Evaluate a single start time
    Check {
        #[command(flatten)]
        day: DayArgs,
        /// Start time (HH:MM)
        #[arg(short, long)]
        start: String,
        /// Booking duration in minutes
        #[arg(long)]
        duration: u32,
        /// Print the evaluation as JSON
        #[arg(long)]
        json: bool,
    },
    /// List free windows within business hours
    Windows {
        #[command(flatten)]
        day: DayArgs,
        /// Only show windows at least this long (minutes)
        #[arg(long)]
        min_duration: Option<u32>,
    },
    /// Book a start time through the confirmation flow
    Book {
        #[command(flatten)]
        day: DayArgs,
        /// Start time (HH:MM)
        #[arg(short, long)]
        start: String,
        /// Booking duration in minutes (defaults to the edited appointment's)
        #[arg(long)]
        duration: Option<u32>,
        /// Acknowledge an advisory warning and book anyway
        #[arg(long)]
        confirm: bool,
        /// Write the updated appointment list back to the appointments file
        #[arg(long, requires = "appointments")]
        save: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Grid {
            day,
            duration,
            json,
        } => {
            let ctx = DayContext::load(&day)?;
            let session = ctx.session(Some(duration))?;
            let slots = session
                .slot_grid(&ctx.store, ctx.now)
                .context("Failed to build slot grid")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                for slot in &slots {
                    println!("{}", describe(slot.start_time, &slot.evaluation()));
                }
                let summary = GridSummary::from_slots(&slots);
                println!(
                    "\n{} slots: {} available, {} need confirmation, {} blocked",
                    summary.total, summary.clean, summary.advisory, summary.blocked
                );
            }
        }
        Commands::Check {
            day,
            start,
            duration,
            json,
        } => {
            let ctx = DayContext::load(&day)?;
            let start_time = parse_start(&start)?;
            let session = ctx.session(Some(duration))?;
            let evaluation = session
                .evaluate(&ctx.store, start_time, ctx.now)
                .context("Failed to evaluate slot")?;

            if json {
                let slot = CandidateSlot::new(start_time, evaluation);
                println!("{}", serde_json::to_string_pretty(&slot)?);
            } else {
                println!("{}", describe(start_time, &evaluation));
            }
        }
        Commands::Windows { day, min_duration } => {
            let ctx = DayContext::load(&day)?;
            let appointments = ctx.store.all();
            let min = min_duration.unwrap_or(0);
            let windows = slot_engine::find_free_windows(
                ctx.date,
                appointments,
                ctx.editing.as_ref(),
                &ctx.preferences,
            );
            for window in windows
                .iter()
                .filter(|w| w.duration_minutes >= i64::from(min))
            {
                println!(
                    "{}-{}  {} min",
                    window.start.format("%H:%M"),
                    window.end.format("%H:%M"),
                    window.duration_minutes
                );
            }
        }
        Commands::Book {
            day,
            start,
            duration,
            confirm,
            save,
        } => {
            let mut ctx = DayContext::load(&day)?;
            let start_time = parse_start(&start)?;
            let mut session = ctx.session(duration)?;

            match session.select(&ctx.store, start_time, ctx.now)? {
                FlowOutcome::NeedsConfirmation { start_time, warning } => {
                    if !confirm {
                        println!(
                            "{}  needs confirmation: {}",
                            start_time.format("%H:%M"),
                            warning
                        );
                        println!("Re-run with --confirm to book anyway, or choose another time.");
                        session.choose_another()?;
                        process::exit(EXIT_NEEDS_CONFIRMATION);
                    }
                    session.confirm_anyway()?;
                }
                FlowOutcome::Committed { .. } | FlowOutcome::Cancelled { .. } => {}
            }

            let booked = session
                .submit(&mut ctx.store)
                .context("Failed to store booking")?;
            println!("{}", serde_json::to_string_pretty(&booked)?);

            if save {
                if let Some(path) = day.appointments.as_deref() {
                    write_appointments(path, ctx.store.all())?;
                }
            }
        }
    }

    Ok(())
}

/// Install the stderr `fmt` subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Everything loaded from the shared day arguments.
struct DayContext {
    date: NaiveDate,
    now: NaiveDateTime,
    editing: Option<AppointmentId>,
    preferences: SchedulingPreferences,
    store: InMemoryAppointmentStore,
}

impl DayContext {
    fn load(args: &DayArgs) -> Result<Self> {
        let preferences = match args.preferences.as_deref() {
            Some(path) => {
                let raw = read_file(path)?;
                SchedulingPreferences::from_json(&raw)
                    .with_context(|| format!("Invalid preferences in {}", path.display()))?
            }
            None => SchedulingPreferences::default(),
        };

        let appointments = match args.appointments.as_deref() {
            Some(path) => read_appointments(path)?,
            None => Vec::new(),
        };
        debug!(count = appointments.len(), "loaded appointments");

        let now = match args.now.as_deref() {
            Some(raw) => parse_now(raw)?,
            None => Local::now().naive_local(),
        };

        Ok(Self {
            date: args.date,
            now,
            editing: args.editing.as_deref().map(AppointmentId::from),
            preferences,
            store: InMemoryAppointmentStore::with_appointments(appointments),
        })
    }

    /// A booking session for this day, excluding the edited appointment if any.
    ///
    /// When editing, the duration defaults to the edited appointment's own.
    fn session(&self, duration: Option<u32>) -> Result<BookingSession> {
        let mut session = match &self.editing {
            Some(id) => {
                let original = self
                    .store
                    .get(id)
                    .with_context(|| format!("No appointment with id '{}'", id))?;
                BookingSession::for_edit(original, self.preferences.clone())?
            }
            None => {
                let duration = duration
                    .context("--duration is required when booking a new appointment")?;
                BookingSession::new(self.date, duration, self.preferences.clone())?
            }
        };
        session.set_date(self.date);
        if let Some(d) = duration {
            session.set_duration(d)?;
        }
        Ok(session)
    }
}

/// One line per evaluation: `HH:MM  available|advisory: ...|blocked`.
fn describe(start_time: NaiveTime, evaluation: &Evaluation) -> String {
    let status = match (evaluation.available, &evaluation.warning) {
        (false, _) => "blocked".to_string(),
        (true, None) => "available".to_string(),
        (true, Some(warning)) => format!("advisory: {}", warning),
    };
    format!("{}  {}", start_time.format("%H:%M"), status)
}

fn parse_start(raw: &str) -> Result<NaiveTime> {
    parse_time(raw).with_context(|| format!("Invalid start time '{}', expected HH:MM", raw))
}

fn parse_now(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .with_context(|| format!("Invalid --now '{}', expected YYYY-MM-DDTHH:MM", raw))
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

fn read_appointments(path: &Path) -> Result<Vec<Appointment>> {
    let raw = read_file(path)?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid appointments JSON in {}", path.display()))
}

fn write_appointments(path: &Path, appointments: &[Appointment]) -> Result<()> {
    let json = serde_json::to_string_pretty(appointments)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}
