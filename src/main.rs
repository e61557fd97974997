//! CLI entry point for the report card tool.
//!
//! Each subcommand loads the roster from a CSV file, runs one engine
//! operation, and prints the result. `add` writes the roster back.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use report_card::config::{LoadOptions, SubjectsConfig};
use report_card::grading::validate;
use report_card::output::{load_with, save};
use report_card::report::{export_reports, render, render_listing, render_summary};
use report_card::stats::{SummaryDocument, summarize};
use report_card::{Roster, StudentRecord};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "report_card")]
#[command(about = "Student marks and report card generator", long_about = None)]
struct Cli {
    /// CSV file holding the roster
    #[arg(short, long, global = true, default_value = "students.csv")]
    file: String,

    /// Comma-separated subject list, e.g. "Maths,Science"
    #[arg(long, global = true)]
    subjects: Option<String>,

    /// JSON file containing the subject list as an array of names
    #[arg(long, global = true)]
    subjects_file: Option<String>,

    /// Fail on unreadable CSV cells instead of substituting defaults
    #[arg(long, global = true, default_value_t = false)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a student and save the roster
    Add {
        /// Student name
        name: String,

        /// Optional roll number
        #[arg(short, long)]
        roll: Option<String>,

        /// One mark (0-100) per subject, in subject order
        #[arg(value_name = "MARK", num_args = 0.., allow_hyphen_values = true)]
        marks: Vec<String>,
    },
    /// List every student with percentage and grade
    List,
    /// Print report cards for students whose name contains QUERY
    Report {
        #[arg(value_name = "QUERY")]
        query: String,
    },
    /// Class summary statistics
    Summary {
        /// Print the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write one report card text file per student
    Export {
        /// Folder to write report cards into
        #[arg(short = 'd', long, default_value = "report_cards")]
        folder: String,
    },
    /// Show the subject list in use
    Subjects,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/report_card.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("report_card.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = SubjectsConfig::resolve(cli.subjects.as_deref(), cli.subjects_file.as_deref())
        .context("failed to resolve subject list")?;
    let subjects = config.subjects();
    let options = LoadOptions { strict: cli.strict };

    match cli.command {
        Commands::Add { name, roll, marks } => {
            let mut roster = load_roster(&cli.file, subjects, options)?;
            let record = build_record(&name, roll.as_deref(), subjects, &marks)?;
            info!(name = %record.name, grade = %record.grade, "Student added");
            roster.add(record);
            let count = save(&roster, subjects, &cli.file)
                .with_context(|| format!("failed to save {}", cli.file))?;
            println!("Saved {count} students to {}", cli.file);
        }
        Commands::List => {
            let roster = load_roster(&cli.file, subjects, options)?;
            if roster.is_empty() {
                println!("No students available.");
            } else {
                println!("{}", render_listing(&roster));
            }
        }
        Commands::Report { query } => {
            let roster = load_roster(&cli.file, subjects, options)?;
            let matches = roster.find_by_name(&query);
            if matches.is_empty() {
                println!("No matching student found.");
            }
            for record in matches {
                println!("\n{}\n", render(record, subjects));
            }
        }
        Commands::Summary { json } => {
            let roster = load_roster(&cli.file, subjects, options)?;
            if json {
                let doc = SummaryDocument::new(&roster, subjects);
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                println!("{}", render_summary(summarize(&roster).as_ref()));
            }
        }
        Commands::Export { folder } => {
            let roster = load_roster(&cli.file, subjects, options)?;
            if roster.is_empty() {
                println!("No students to export.");
            } else {
                let count = export_reports(&roster, subjects, &folder)
                    .with_context(|| format!("failed to export report cards to {folder}"))?;
                println!("Exported {count} report(s) to folder '{folder}'.");
            }
        }
        Commands::Subjects => {
            println!("Subjects: {}", subjects.join(", "));
        }
    }

    Ok(())
}

/// Loads the roster, flagging records whose stored totals or grades no
/// longer match their marks.
#[tracing::instrument(skip(subjects, options))]
fn load_roster(file: &str, subjects: &[String], options: LoadOptions) -> Result<Roster> {
    let roster = load_with(file, subjects, options)
        .with_context(|| format!("failed to load {file}"))?;

    let drifted = roster
        .iter()
        .filter(|r| !r.revalidate(subjects.len()))
        .count();
    if drifted > 0 {
        warn!(drifted, "Some records do not match their stored totals or grades");
    }

    Ok(roster)
}

/// Validates each mark token and builds the record.
fn build_record(
    name: &str,
    roll: Option<&str>,
    subjects: &[String],
    marks: &[String],
) -> Result<StudentRecord> {
    if marks.len() != subjects.len() {
        anyhow::bail!(
            "expected {} marks ({}), got {}",
            subjects.len(),
            subjects.join(", "),
            marks.len()
        );
    }

    let marks = subjects
        .iter()
        .zip(marks)
        .map(|(subject, token)| {
            validate(token).with_context(|| format!("bad mark {token:?} for {subject}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StudentRecord::build(name, roll, subjects, marks)?)
}
