//! Class-wide statistics computed on demand from a roster.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::grading::PASS_PERCENTAGE;
use crate::grading::utility::{mean, round2};
use crate::roster::Roster;

/// Class-wide snapshot computed from the current roster. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassStatistics {
    pub student_count: usize,
    pub average_percentage: f64,
    pub highest_percentage: f64,
    pub lowest_percentage: f64,
    /// Every student on the highest percentage, in roster order.
    pub top_students: Vec<String>,
    pub pass_rate_percent: f64,
}

/// Computes class statistics, or `None` when the roster is empty.
pub fn summarize(roster: &Roster) -> Option<ClassStatistics> {
    if roster.is_empty() {
        return None;
    }

    let percentages: Vec<f64> = roster.iter().map(|r| r.percentage).collect();

    let highest = percentages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = percentages.iter().copied().fold(f64::INFINITY, f64::min);

    let top_students = roster
        .iter()
        .filter(|r| r.percentage == highest)
        .map(|r| r.name.clone())
        .collect();

    let fail_count = percentages.iter().filter(|&&p| p < PASS_PERCENTAGE).count();

    Some(ClassStatistics {
        student_count: percentages.len(),
        average_percentage: round2(mean(&percentages)),
        highest_percentage: highest,
        lowest_percentage: lowest,
        top_students,
        pass_rate_percent: pass_rate(fail_count, percentages.len()),
    })
}

fn pass_rate(fail_count: usize, total: usize) -> f64 {
    round2((1.0 - fail_count as f64 / total as f64) * 100.0)
}

/// Timestamped summary, serialized by the CLI's `--json` output.
#[derive(Debug, Serialize)]
pub struct SummaryDocument<'a> {
    pub generated_at: DateTime<Utc>,
    pub subjects: &'a [String],
    pub statistics: Option<ClassStatistics>,
}

impl<'a> SummaryDocument<'a> {
    pub fn new(roster: &Roster, subjects: &'a [String]) -> Self {
        SummaryDocument {
            generated_at: Utc::now(),
            subjects,
            statistics: summarize(roster),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StudentRecord;

    fn with_percentage(name: &str, percentage: f64) -> StudentRecord {
        StudentRecord {
            name: name.to_string(),
            roll_id: String::new(),
            marks: vec![],
            total: 0,
            percentage,
            grade: String::new(),
        }
    }

    #[test]
    fn test_summarize_empty_roster() {
        assert_eq!(summarize(&Roster::new()), None);
    }

    #[test]
    fn test_summarize_with_tied_top() {
        let roster: Roster = vec![
            with_percentage("Ana", 95.0),
            with_percentage("Ben", 95.0),
            with_percentage("Cal", 30.0),
        ]
        .into_iter()
        .collect();

        let stats = summarize(&roster).unwrap();

        assert_eq!(stats.student_count, 3);
        assert_eq!(stats.highest_percentage, 95.0);
        assert_eq!(stats.lowest_percentage, 30.0);
        assert_eq!(stats.top_students, ["Ana", "Ben"]);
        assert_eq!(stats.average_percentage, 73.33);
        assert_eq!(stats.pass_rate_percent, 66.67);
    }

    #[test]
    fn test_summarize_duplicate_names_both_listed() {
        let roster: Roster = vec![with_percentage("Sam", 80.0), with_percentage("Sam", 80.0)]
            .into_iter()
            .collect();

        let stats = summarize(&roster).unwrap();
        assert_eq!(stats.top_students, ["Sam", "Sam"]);
        assert_eq!(stats.pass_rate_percent, 100.0);
    }

    #[test]
    fn test_pass_boundary_counts_as_pass() {
        let roster: Roster = vec![with_percentage("Edge", 40.0), with_percentage("Low", 39.99)]
            .into_iter()
            .collect();

        let stats = summarize(&roster).unwrap();
        assert_eq!(stats.pass_rate_percent, 50.0);
    }

    #[test]
    fn test_pass_rate_matches_fail_fraction() {
        let percentages = [12.0, 40.0, 55.5, 39.0, 99.0, 0.0, 71.25];
        let roster: Roster = percentages
            .iter()
            .enumerate()
            .map(|(i, &p)| with_percentage(&format!("S{i}"), p))
            .collect();

        let stats = summarize(&roster).unwrap();
        let fail_fraction =
            percentages.iter().filter(|&&p| p < 40.0).count() as f64 / percentages.len() as f64;

        assert!((fail_fraction - (1.0 - stats.pass_rate_percent / 100.0)).abs() < 0.0001);
    }

    #[test]
    fn test_pass_rate_all_fail() {
        assert_eq!(pass_rate(4, 4), 0.0);
    }

    #[test]
    fn test_summary_document_serializes() {
        let subjects = vec!["Math".to_string()];
        let doc = SummaryDocument::new(&Roster::new(), &subjects);
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["subjects"][0], "Math");
        assert!(json["statistics"].is_null());
        assert!(json["generated_at"].is_string());
    }
}
