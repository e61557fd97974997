//! Plain-text rendering of report cards, listings and class summaries.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::grading::utility::format_percentage;
use crate::record::StudentRecord;
use crate::roster::Roster;
use crate::stats::ClassStatistics;

const SUBJECT_WIDTH: usize = 12;
const MARK_WIDTH: usize = 3;
const FOOTER_RULE: usize = 23;

/// Formats one student's report card.
///
/// ```text
/// Report Card - Asha (Roll: R1)
/// -----------------------------
/// Math        :  90
/// Science     :  85
/// -----------------------
/// Total      :175
/// Percentage :87.5%
/// Grade      :A
/// ```
pub fn render(record: &StudentRecord, subjects: &[String]) -> String {
    let mut title = format!("Report Card - {}", record.name);
    if let Some(roll) = record.roll_id() {
        title.push_str(&format!(" (Roll: {roll})"));
    }

    let mut lines = vec![title.clone(), "-".repeat(title.chars().count())];
    for (subject, mark) in subjects.iter().zip(&record.marks) {
        lines.push(format!(
            "{:<sw$}: {:>mw$}",
            subject,
            mark,
            sw = SUBJECT_WIDTH,
            mw = MARK_WIDTH
        ));
    }
    lines.push("-".repeat(FOOTER_RULE));
    lines.push(format!("Total      :{}", record.total));
    lines.push(format!("Percentage :{}%", format_percentage(record.percentage)));
    lines.push(format!("Grade      :{}", record.grade));

    lines.join("\n")
}

/// One numbered line per student: `1. Name - 87.5% - A`.
pub fn render_listing(roster: &Roster) -> String {
    roster
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "{}. {} - {}% - {}",
                i + 1,
                r.name,
                format_percentage(r.percentage),
                r.grade
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Formats the class summary block, or a notice when there is no data.
pub fn render_summary(stats: Option<&ClassStatistics>) -> String {
    let Some(stats) = stats else {
        return "No students to summarize.".to_string();
    };

    [
        "Class Summary".to_string(),
        "-------------".to_string(),
        format!(
            "Average Percentage : {}%",
            format_percentage(stats.average_percentage)
        ),
        format!(
            "Highest Percentage : {}% (Top: {})",
            format_percentage(stats.highest_percentage),
            stats.top_students.join(", ")
        ),
        format!(
            "Lowest Percentage  : {}%",
            format_percentage(stats.lowest_percentage)
        ),
        format!(
            "Class Pass Rate    : {}%",
            format_percentage(stats.pass_rate_percent)
        ),
    ]
    .join("\n")
}

/// Replaces every character other than alphanumerics, space, `-` and `_`.
pub fn safe_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Writes one `<name>.txt` report card per student into `folder`, creating
/// it if needed. Students whose names sanitize to the same stem overwrite
/// each other. Returns the number of files written.
pub fn export_reports(
    roster: &Roster,
    subjects: &[String],
    folder: impl AsRef<Path>,
) -> Result<usize> {
    let folder = folder.as_ref();
    fs::create_dir_all(folder)?;

    for record in roster {
        let path = folder.join(format!("{}.txt", safe_file_stem(&record.name)));
        debug!(path = %path.display(), "Writing report card");
        fs::write(&path, render(record, subjects))?;
    }

    info!(count = roster.len(), folder = %folder.display(), "Exported report cards");
    Ok(roster.len())
}
