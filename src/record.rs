//! Student records and the builder that derives total, percentage and grade.

use serde::Serialize;

use crate::error::{Result, RosterError};
use crate::grading::classify;
use crate::grading::utility::round2;

/// One student's marks together with the derived fields.
///
/// `marks` is positionally aligned with the subject list in use when the
/// record was built or loaded. Records read back from CSV keep whatever
/// `total`, `percentage` and `grade` the file held, so only builder-made
/// records are guaranteed to be internally consistent; see
/// [`StudentRecord::revalidate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub name: String,
    pub roll_id: String,
    pub marks: Vec<i64>,
    pub total: i64,
    pub percentage: f64,
    pub grade: String,
}

impl StudentRecord {
    /// Builds a record from already-validated marks.
    ///
    /// Marks are not range-checked here; run each through
    /// [`crate::grading::validate`] first.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the trimmed name is empty or if the number of marks
    /// differs from the number of subjects.
    pub fn build(
        name: &str,
        roll_id: Option<&str>,
        subjects: &[String],
        marks: Vec<i64>,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::InvalidInput("empty name".into()));
        }

        if marks.len() != subjects.len() {
            return Err(RosterError::InvalidInput(format!(
                "marks/subjects length mismatch: {} marks for {} subjects",
                marks.len(),
                subjects.len()
            )));
        }

        let total = sum(&marks);
        let percentage = percentage_of(total, subjects.len());

        Ok(StudentRecord {
            name: name.to_string(),
            roll_id: roll_id.map(str::trim).unwrap_or_default().to_string(),
            marks,
            total,
            percentage,
            grade: classify(percentage).to_string(),
        })
    }

    /// Roll id, if one was given.
    pub fn roll_id(&self) -> Option<&str> {
        Some(self.roll_id.as_str()).filter(|r| !r.is_empty())
    }

    /// Returns `true` when the stored total, percentage and grade are exactly
    /// what the builder would derive from `marks` over `subject_count`
    /// subjects. Useful for spotting records that drifted in a CSV file.
    pub fn revalidate(&self, subject_count: usize) -> bool {
        let percentage = percentage_of(self.total, subject_count);

        self.marks.len() == subject_count
            && self.total == sum(&self.marks)
            && self.percentage == percentage
            && self.grade == classify(percentage).as_str()
    }
}

pub(crate) fn sum(marks: &[i64]) -> i64 {
    marks.iter().fold(0, |acc, &m| acc.saturating_add(m))
}

fn percentage_of(total: i64, subject_count: usize) -> f64 {
    if subject_count == 0 {
        0.0
    } else {
        round2(total as f64 / subject_count as f64)
    }
}
