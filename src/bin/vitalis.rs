//! Vitalis CLI - Command-line interface for the Vitalis engine
//!
//! Commands:
//! - log: Record steps, water, sleep, or weight for a day
//! - goals: Show or change goals and body parameters
//! - dashboard: Recompute and print the dashboard snapshot
//! - undo-water: Remove the most recent drink logged for a day
//! - validate: Validate every record in a store file
//! - doctor: Diagnose store health and configuration
//! - reset: Delete all records (preferences survive)

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use vitalis::engine::TrackerEngine;
use vitalis::snapshot::SNAPSHOT_VERSION;
use vitalis::store::MemoryStore;
use vitalis::types::DashboardSnapshot;
use vitalis::{validate, TrackerError, PRODUCER_NAME, VITALIS_VERSION};

const DEFAULT_STORE: &str = "vitalis-store.json";

/// Vitalis - On-device insights engine for personal health tracking data
#[derive(Parser)]
#[command(name = "vitalis")]
#[command(author = "Vitalis Health")]
#[command(version = VITALIS_VERSION)]
#[command(about = "Track daily health records and derive insights", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record steps, water, sleep, or weight for a day
    Log {
        #[command(subcommand)]
        record: LogRecord,
    },

    /// Show or change goals and body parameters
    Goals {
        /// Store file path
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,

        /// Daily step goal
        #[arg(long)]
        steps: Option<u32>,

        /// Daily water goal (ml)
        #[arg(long)]
        water_ml: Option<u32>,

        /// Nightly sleep goal (hours)
        #[arg(long)]
        sleep_hours: Option<f64>,

        /// Target body weight (kg)
        #[arg(long)]
        weight_kg: Option<f64>,

        /// Body height (cm)
        #[arg(long)]
        height_cm: Option<f64>,

        /// Print preferences as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recompute and print the dashboard snapshot
    Dashboard {
        /// Store file path
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,

        /// Day to compute for (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Remove the most recent drink logged for a day
    UndoWater {
        /// Store file path
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,

        /// Day to undo on (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Validate every record in a store file
    Validate {
        /// Store file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose store health and configuration
    Doctor {
        /// Store file to check
        #[arg(long)]
        store: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete all records (preferences survive)
    Reset {
        /// Store file path
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,

        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum LogRecord {
    /// Set or add to a day's step count
    Steps {
        /// Step count (a signed delta with --add)
        #[arg(allow_hyphen_values = true)]
        count: i32,

        /// Add to the existing count instead of replacing it
        #[arg(long)]
        add: bool,

        /// Store file path
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,

        /// Day to record (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Log a drink
    Water {
        /// Amount (ml)
        amount_ml: u32,

        /// Time of day (HH:MM, default now)
        #[arg(long)]
        time: Option<String>,

        /// Store file path
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,

        /// Day to record (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Log a night of sleep
    Sleep {
        /// Hours slept (derived from bedtime/wake when omitted)
        #[arg(long)]
        hours: Option<f64>,

        /// Subjective quality, 1-10
        #[arg(long)]
        quality: u8,

        /// Bedtime (HH:MM)
        #[arg(long)]
        bedtime: String,

        /// Wake time (HH:MM)
        #[arg(long)]
        wake: String,

        /// Store file path
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,

        /// Day the night is attributed to (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Log a weight measurement
    Weight {
        /// Body weight (kg)
        kg: f64,

        /// Store file path
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,

        /// Day of the measurement (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Tracker(#[from] TrackerError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    BadDate(String),

    #[error("Invalid time '{0}': expected HH:MM")]
    BadTime(String),

    #[error("Validation failed for {0} record(s)")]
    ValidationFailed(usize),

    #[error("Refusing to reset without --yes")]
    ResetNotConfirmed,

    #[error("Doctor found errors")]
    DoctorFailed,
}

#[derive(Serialize)]
struct ErrorReport {
    error: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let report = ErrorReport {
                error: e.to_string(),
            };
            eprintln!(
                "{}",
                serde_json::to_string(&report).unwrap_or_else(|_| e.to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Log { record } => cmd_log(record),

        Commands::Goals {
            store,
            steps,
            water_ml,
            sleep_hours,
            weight_kg,
            height_cm,
            json,
        } => cmd_goals(&store, steps, water_ml, sleep_hours, weight_kg, height_cm, json),

        Commands::Dashboard {
            store,
            date,
            output_format,
        } => cmd_dashboard(&store, date.as_deref(), &output_format),

        Commands::UndoWater { store, date } => cmd_undo_water(&store, date.as_deref()),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Doctor { store, json } => cmd_doctor(store.as_deref(), json),

        Commands::Reset { store, yes } => cmd_reset(&store, yes),
    }
}

fn cmd_log(record: LogRecord) -> Result<(), CliError> {
    match record {
        LogRecord::Steps {
            count,
            add,
            store,
            date,
        } => {
            let day = parse_date(date.as_deref())?;
            with_engine(&store, |engine| {
                let entry = if add {
                    engine.add_steps(day, count)?
                } else {
                    engine.set_steps(day, u32::try_from(count).map_err(|_| {
                        TrackerError::invalid("steps", "count must be non-negative")
                    })?)?
                };
                println!(
                    "Logged {} steps for {} ({:.2} km, {} kcal)",
                    entry.steps, entry.date, entry.distance_km, entry.calories
                );
                Ok(())
            })
        }

        LogRecord::Water {
            amount_ml,
            time,
            store,
            date,
        } => {
            let day = parse_date(date.as_deref())?;
            let at = parse_time(time.as_deref())?;
            with_engine(&store, |engine| {
                let entry = engine.add_water(day, at, amount_ml)?;
                println!(
                    "Logged {} ml for {} (total {} / {} ml)",
                    amount_ml, entry.date, entry.total_intake_ml, entry.daily_goal_ml
                );
                Ok(())
            })
        }

        LogRecord::Sleep {
            hours,
            quality,
            bedtime,
            wake,
            store,
            date,
        } => {
            let day = parse_date(date.as_deref())?;
            let bed = parse_time(Some(&bedtime))?;
            let woke = parse_time(Some(&wake))?;
            with_engine(&store, |engine| {
                let entry = engine.log_sleep(day, hours, quality, bed, woke)?;
                println!(
                    "Logged {:.1} h of sleep for {} (quality {}/10)",
                    entry.hours, entry.date, entry.quality
                );
                Ok(())
            })
        }

        LogRecord::Weight { kg, store, date } => {
            let day = parse_date(date.as_deref())?;
            with_engine(&store, |engine| {
                let entry = engine.add_weight(day, kg)?;
                println!("Logged {:.1} kg for {}", entry.weight_kg, entry.date);
                Ok(())
            })
        }
    }
}

fn cmd_goals(
    store_path: &Path,
    steps: Option<u32>,
    water_ml: Option<u32>,
    sleep_hours: Option<f64>,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    json: bool,
) -> Result<(), CliError> {
    with_engine(store_path, |engine| {
        let mut prefs = engine.preferences()?;
        let changed =
            steps.is_some() || water_ml.is_some() || sleep_hours.is_some() || weight_kg.is_some() || height_cm.is_some();

        if let Some(goal) = steps {
            prefs.steps_goal = goal;
        }
        if let Some(goal) = water_ml {
            prefs.water_goal_ml = goal;
        }
        if let Some(goal) = sleep_hours {
            prefs.sleep_goal_hours = goal;
        }
        if let Some(goal) = weight_kg {
            prefs.weight_goal_kg = Some(goal);
        }
        if let Some(height) = height_cm {
            prefs.height_cm = Some(height);
        }

        if changed {
            engine.update_preferences(prefs.clone())?;
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        } else {
            println!("Goals");
            println!("=====");
            println!("Steps:  {} / day", prefs.steps_goal);
            println!("Water:  {} ml / day", prefs.water_goal_ml);
            println!("Sleep:  {} h / night", prefs.sleep_goal_hours);
            match prefs.weight_goal_kg {
                Some(goal) => println!("Weight: {goal} kg target"),
                None => println!("Weight: no target set"),
            }
            match prefs.height_cm {
                Some(height) => println!("Height: {height} cm"),
                None => println!("Height: not set"),
            }
        }
        Ok(())
    })
}

fn cmd_dashboard(
    store_path: &Path,
    date: Option<&str>,
    output_format: &OutputFormat,
) -> Result<(), CliError> {
    let store = load_store(store_path)?;
    let engine = TrackerEngine::new(store);
    let today = parse_date(date)?;
    let snapshot = engine.dashboard(today)?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&snapshot)?),
        OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => print_dashboard(&snapshot),
    }
    Ok(())
}

fn print_dashboard(snapshot: &DashboardSnapshot) {
    println!("Vitalis Dashboard - {}", snapshot.date);
    println!("=============================");

    let activity = &snapshot.activity;
    println!(
        "Steps:  {} / {} ({}%), best day this week {}",
        activity.today.steps,
        snapshot.preferences.steps_goal,
        activity.progress_pct,
        activity.best_day_steps
    );

    let water = &snapshot.water;
    println!(
        "Water:  {} / {} ml ({}%), streak {} day(s), avg {} ml",
        water.today.total_intake_ml,
        water.today.daily_goal_ml,
        water.progress_pct,
        water.streak_days,
        water.average_daily_ml
    );

    let sleep = &snapshot.sleep;
    match &sleep.last_night {
        Some(night) => println!(
            "Sleep:  {:.1} h last night ({}%), streak {} night(s)",
            night.hours, sleep.progress_pct, sleep.streak_nights
        ),
        None => println!("Sleep:  no nights recorded"),
    }
    if let Some(bedtime) = sleep.optimal_bedtime {
        println!("        suggested bedtime {}", bedtime.format("%H:%M"));
    }

    let weight = &snapshot.weight;
    match (weight.current_kg, weight.goal_kg) {
        (Some(current), Some(goal)) => println!("Weight: {current:.1} kg (target {goal:.1} kg)"),
        (Some(current), None) => println!("Weight: {current:.1} kg"),
        _ => println!("Weight: no measurements"),
    }

    println!("\nAchievements:");
    for achievement in &snapshot.achievements {
        let marker = if achievement.earned { "[x]" } else { "[ ]" };
        println!(
            "  {} {} ({}%)",
            marker,
            achievement.kind.title(),
            achievement.progress
        );
    }
}

fn cmd_undo_water(store_path: &Path, date: Option<&str>) -> Result<(), CliError> {
    let day = parse_date(date)?;
    with_engine(store_path, |engine| {
        match engine.undo_last_water(day)? {
            Some(removed) => println!(
                "Removed {} ml logged at {} on {}",
                removed.amount_ml,
                removed.time.format("%H:%M"),
                removed.date
            ),
            None => println!("Nothing to undo for {day}"),
        }
        Ok(())
    })
}

#[derive(Serialize)]
struct ValidationReport {
    total_records: usize,
    valid_records: usize,
    invalid_records: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(Serialize)]
struct ValidationErrorDetail {
    collection: &'static str,
    date: String,
    error: String,
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), CliError> {
    let data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::Read::read_to_string(&mut io::stdin(), &mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };
    let store = MemoryStore::from_json(&data)?;

    let mut errors = Vec::new();
    let mut total_records = 0usize;

    use vitalis::store::RecordStore;
    for entry in store.activities()? {
        total_records += 1;
        if let Err(e) = validate::steps(entry.steps) {
            errors.push(detail("activity", entry.date, e));
        }
    }
    for entry in store.waters()? {
        total_records += 1;
        for drink in &entry.entries {
            if let Err(e) = validate::drink_amount(drink.amount_ml) {
                errors.push(detail("water", entry.date, e));
            }
        }
    }
    for entry in store.sleeps()? {
        total_records += 1;
        if let Err(e) = validate::sleep_hours(entry.hours) {
            errors.push(detail("sleep", entry.date, e));
        }
        if let Err(e) = validate::sleep_quality(entry.quality) {
            errors.push(detail("sleep", entry.date, e));
        }
    }
    for entry in store.weights()? {
        total_records += 1;
        if let Err(e) = validate::weight_kg(entry.weight_kg) {
            errors.push(detail("weight", entry.date, e));
        }
    }
    if let Err(e) = validate::preferences(&store.preferences()?) {
        errors.push(ValidationErrorDetail {
            collection: "preferences",
            date: String::new(),
            error: e.to_string(),
        });
    }

    let report = ValidationReport {
        total_records,
        valid_records: total_records.saturating_sub(errors.len()),
        invalid_records: errors.len(),
        errors,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total records:   {}", report.total_records);
        println!("Valid records:   {}", report.valid_records);
        println!("Invalid records: {}", report.invalid_records);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - {} ({}): {}", err.collection, err.date, err.error);
            }
        }
    }

    if report.invalid_records > 0 {
        Err(CliError::ValidationFailed(report.invalid_records))
    } else {
        Ok(())
    }
}

fn detail(collection: &'static str, date: NaiveDate, error: TrackerError) -> ValidationErrorDetail {
    ValidationErrorDetail {
        collection,
        date: date.to_string(),
        error: error.to_string(),
    }
}

#[derive(Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

fn cmd_doctor(store_path: Option<&Path>, json: bool) -> Result<(), CliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "vitalis_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Vitalis version {VITALIS_VERSION}"),
    });

    checks.push(DoctorCheck {
        name: "snapshot_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Snapshot schema: {SNAPSHOT_VERSION}"),
    });

    if let Some(path) = store_path {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match MemoryStore::from_json(&content) {
                    Ok(store) => {
                        let prefs_note = if store.has_preferences() {
                            "preferences set"
                        } else {
                            "default preferences"
                        };
                        checks.push(DoctorCheck {
                            name: "store".to_string(),
                            status: CheckStatus::Ok,
                            message: format!(
                                "Store file valid ({} records, {})",
                                store.record_count(),
                                prefs_note
                            ),
                        });
                    }
                    Err(e) => {
                        checks.push(DoctorCheck {
                            name: "store".to_string(),
                            status: CheckStatus::Error,
                            message: format!("Invalid store JSON: {e}"),
                        });
                    }
                },
                Err(e) => {
                    checks.push(DoctorCheck {
                        name: "store".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Cannot read store file: {e}"),
                    });
                }
            }
        } else {
            checks.push(DoctorCheck {
                name: "store".to_string(),
                status: CheckStatus::Warning,
                message: "Store file does not exist".to_string(),
            });
        }
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (stream input ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: VITALIS_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Vitalis Doctor Report");
        println!("=====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(CliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_reset(store_path: &Path, yes: bool) -> Result<(), CliError> {
    if !yes {
        return Err(CliError::ResetNotConfirmed);
    }
    with_engine(store_path, |engine| {
        engine.reset_statistics()?;
        println!("All records deleted; preferences kept");
        Ok(())
    })
}

// Helper functions

/// Load the store, run an engine operation, and persist the store back
fn with_engine<F>(store_path: &Path, op: F) -> Result<(), CliError>
where
    F: FnOnce(&mut TrackerEngine<MemoryStore>) -> Result<(), CliError>,
{
    let store = load_store(store_path)?;
    let mut engine = TrackerEngine::new(store);
    op(&mut engine)?;
    save_store(store_path, engine.store())
}

fn load_store(path: &Path) -> Result<MemoryStore, CliError> {
    if path.exists() {
        Ok(MemoryStore::from_json(&fs::read_to_string(path)?)?)
    } else {
        Ok(MemoryStore::new())
    }
}

fn save_store(path: &Path, store: &MemoryStore) -> Result<(), CliError> {
    fs::write(path, store.to_json()?)?;
    Ok(())
}

/// "Today" is recomputed from the local clock on every invocation
fn parse_date(date: Option<&str>) -> Result<NaiveDate, CliError> {
    match date {
        None => Ok(Local::now().date_naive()),
        Some(s) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CliError::BadDate(s.to_string()))
        }
    }
}

fn parse_time(time: Option<&str>) -> Result<NaiveTime, CliError> {
    match time {
        None => {
            // Truncate to the minute; logging precision beyond that is noise
            let now = Local::now().time();
            Ok(NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now))
        }
        Some(s) => {
            NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| CliError::BadTime(s.to_string()))
        }
    }
}
