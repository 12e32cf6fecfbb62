use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use cycle_core::date_math::{format_date, parse_date};
use cycle_core::phase::active_cycle_start;
use cycle_core::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cyc")]
#[command(about = "Cycle and pregnancy calendar calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Phase of a single day (default: today)
    Phase {
        /// Day to classify (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Phase of every day in a month
    Calendar {
        /// Month to show (YYYY-MM, default: current month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Next period, ovulation and fertile window
    Predict {
        /// Reference day (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Aggregate statistics over the cycle history
    Stats,

    /// Cycles and symptom logs, newest first
    History {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Gestational age of the active pregnancy
    Pregnancy {
        /// Reference day (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Export the canonical cycle history as CSV
    Export {
        /// Destination file
        #[arg(long)]
        out: PathBuf,
    },
}

/// Everything a command needs, loaded once
struct Workspace {
    config: Config,
    data_dir: PathBuf,
}

impl Workspace {
    fn history(&self) -> Vec<CycleRecord> {
        let raw = load_cycle_sources(&self.config.data.cycle_paths(&self.data_dir));
        reconcile_cycles(&raw)
    }

    fn resolved(&self) -> ResolvedConfig {
        resolve_config_with(&self.config.cycle, &self.config.fertile_window)
    }
}

fn main() {
    cycle_core::logging::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);
    let ws = Workspace { config, data_dir };
    let json = cli.json;

    match cli.command {
        Commands::Phase { date } => cmd_phase(&ws, date.as_deref(), json),
        Commands::Calendar { month } => cmd_calendar(&ws, month.as_deref(), json),
        Commands::Predict { today } => cmd_predict(&ws, today.as_deref(), json),
        Commands::Stats => cmd_stats(&ws, json),
        Commands::History { limit } => cmd_history(&ws, limit, json),
        Commands::Pregnancy { today } => cmd_pregnancy(&ws, today.as_deref(), json),
        Commands::Export { out } => cmd_export(&ws, &out),
    }
}

/// Parse a user-typed date, defaulting to the local calendar day
fn day_arg(arg: Option<&str>) -> Result<NaiveDate> {
    match arg {
        Some(s) => parse_date(s).ok_or_else(|| Error::InvalidDate(s.to_string())),
        None => Ok(Local::now().date_naive()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_phase(ws: &Workspace, date: Option<&str>, json: bool) -> Result<()> {
    let day = day_arg(date)?;
    let phase = classify_with_history(&ws.history(), &ws.resolved(), day);

    if json {
        #[derive(Serialize)]
        struct Out {
            date: NaiveDate,
            phase: Phase,
        }
        return print_json(&Out { date: day, phase });
    }

    println!("{}: {}", format_date(day), phase.label());
    Ok(())
}

fn cmd_calendar(ws: &Workspace, month: Option<&str>, json: bool) -> Result<()> {
    let (year, month) = match month {
        Some(s) => parse_date(&format!("{}-01", s))
            .map(|d| (d.year(), d.month()))
            .ok_or_else(|| Error::InvalidDate(s.to_string()))?,
        None => {
            let today = Local::now().date_naive();
            (today.year(), today.month())
        }
    };

    let history = ws.history();
    let days = match active_cycle_start(&history) {
        Some(start) => month_phases(start, &ws.resolved(), year, month),
        None => Vec::new(),
    };

    if json {
        let map: Vec<_> = days
            .iter()
            .map(|(day, phase)| serde_json::json!({ "date": day, "phase": phase }))
            .collect();
        return print_json(&map);
    }

    if days.is_empty() {
        println!("No cycles recorded.");
        return Ok(());
    }
    for (day, phase) in days {
        println!("{}  {}", format_date(day), phase.label());
    }
    Ok(())
}

fn cmd_predict(ws: &Workspace, today: Option<&str>, json: bool) -> Result<()> {
    let today = day_arg(today)?;
    let Some(start) = active_cycle_start(&ws.history()) else {
        if json {
            return print_json(&Option::<Prediction>::None);
        }
        println!("No cycles recorded.");
        return Ok(());
    };
    let Some(prediction) = predict(start, &ws.resolved(), today) else {
        if json {
            return print_json(&Option::<Prediction>::None);
        }
        println!("No prediction available.");
        return Ok(());
    };

    if json {
        return print_json(&prediction);
    }

    println!(
        "Next period:    {} to {}",
        format_date(prediction.next_period_start),
        format_date(prediction.next_period_end)
    );
    println!("Ovulation:      {}", format_date(prediction.ovulation_date));
    println!(
        "Fertile window: {} to {}",
        format_date(prediction.fertile_window.start),
        format_date(prediction.fertile_window.end)
    );
    Ok(())
}

fn cmd_stats(ws: &Workspace, json: bool) -> Result<()> {
    let stats = compute_stats(&ws.history());

    if json {
        return print_json(&stats);
    }

    println!("Cycles recorded:   {}", stats.total_cycles);
    println!("Avg cycle length:  {} days", stats.avg_cycle_length);
    println!("Avg period length: {} days", stats.avg_period_length);
    println!(
        "Cycle range:       {}-{} days",
        stats.cycle_range_min, stats.cycle_range_max
    );
    Ok(())
}

fn cmd_history(ws: &Workspace, limit: Option<usize>, json: bool) -> Result<()> {
    let symptoms = load_symptoms(&ws.data_dir.join(&ws.config.data.symptoms_file));
    let feed = merge_timeline(&ws.history(), &symptoms);
    let shown = &feed[..limit.unwrap_or(feed.len()).min(feed.len())];

    if json {
        return print_json(&shown);
    }

    for entry in shown {
        let date = entry
            .date()
            .map(format_date)
            .unwrap_or_else(|| "????-??-??".into());
        match entry {
            TimelineEntry::Cycle(record) => {
                let end = record.end_date.as_deref().unwrap_or("ongoing");
                println!("{}  cycle    until {}", date, end);
            }
            TimelineEntry::Symptom(symptom) => {
                let tags: Vec<&str> = symptom.symptoms.iter().map(String::as_str).collect();
                let pain = symptom
                    .pain_level
                    .map(|p| format!(" pain {}/10", p))
                    .unwrap_or_default();
                println!("{}  symptom  {}{}", date, tags.join(", "), pain);
            }
        }
    }
    Ok(())
}

fn cmd_pregnancy(ws: &Workspace, today: Option<&str>, json: bool) -> Result<()> {
    let today = day_arg(today)?;
    let pregnancy_path = ws.data_dir.join(&ws.config.data.pregnancy_file);

    // A stored record wins over a pregnancy marker on the latest cycle;
    // a marker followed by newer cycles has already ended
    let pregnancy = match load_pregnancy(&pregnancy_path)? {
        Some(p) => Some(p),
        None => ws.history().first().and_then(PregnancyRecord::from_cycle),
    }
    .filter(|p| p.is_active);

    let Some(pregnancy) = pregnancy else {
        if json {
            return print_json(&Option::<GestationalAge>::None);
        }
        println!("No active pregnancy.");
        return Ok(());
    };

    let age = pregnancy.age(today)?;

    if json {
        return print_json(&age);
    }

    println!("Gestational age: {} weeks, {} days", age.weeks, age.days);
    println!("Trimester:       {}", age.trimester);
    println!("Due date:        {}", format_date(age.due_date));
    let next = &age.next_milestone;
    if next.completed {
        println!("Milestones:      all completed ({})", next.milestone.title);
    } else {
        println!(
            "Next milestone:  week {}: {} (in {} weeks)",
            next.milestone.week, next.milestone.title, next.weeks_until
        );
    }
    Ok(())
}

fn cmd_export(ws: &Workspace, out: &Path) -> Result<()> {
    let count = export_history_csv(&ws.history(), out)?;
    println!("✓ Exported {} cycles", count);
    println!("  CSV: {}", out.display());
    Ok(())
}
