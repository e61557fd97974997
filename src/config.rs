//! Subject list and load-policy configuration.

use std::collections::HashSet;

use crate::error::{Result, RosterError};
use crate::output::{
    GRADE_COLUMN, LEGACY_ROLL_ID_COLUMN, NAME_COLUMN, PERCENTAGE_COLUMN, ROLL_ID_COLUMN,
    TOTAL_COLUMN,
};

/// Subjects used when nothing else is configured.
pub const DEFAULT_SUBJECTS: &[&str] = &["English", "Maths", "Science", "Social", "Human Values"];

/// Environment variable holding a comma-separated subject list.
pub const SUBJECTS_ENV: &str = "REPORT_CARD_SUBJECTS";

/// Column names the CSV file already uses for the record's own fields.
const RESERVED_COLUMNS: &[&str] = &[
    NAME_COLUMN,
    ROLL_ID_COLUMN,
    LEGACY_ROLL_ID_COLUMN,
    TOTAL_COLUMN,
    PERCENTAGE_COLUMN,
    GRADE_COLUMN,
];

/// How [`crate::output::load_with`] treats cells it cannot parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Fail on the first unreadable cell instead of substituting a fallback.
    pub strict: bool,
}

impl LoadOptions {
    pub fn strict() -> Self {
        LoadOptions { strict: true }
    }
}

/// The ordered subject list that aligns marks with CSV columns.
///
/// Can be read from a JSON array on disk:
/// ```json
/// ["English", "Maths", "Science"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectsConfig {
    subjects: Vec<String>,
}

impl Default for SubjectsConfig {
    fn default() -> Self {
        SubjectsConfig {
            subjects: DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SubjectsConfig {
    /// Builds a config from explicit names, rejecting duplicates and names
    /// that would collide with the fixed CSV columns.
    pub fn new(subjects: Vec<String>) -> Result<Self> {
        if let Some(reserved) = subjects
            .iter()
            .find(|s| RESERVED_COLUMNS.contains(&s.as_str()))
        {
            return Err(RosterError::InvalidInput(format!(
                "subject {reserved:?} clashes with a reserved column"
            )));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = subjects.iter().find(|s| !seen.insert(s.as_str())) {
            return Err(RosterError::InvalidInput(format!("duplicate subject {dup:?}")));
        }
        Ok(SubjectsConfig { subjects })
    }

    /// Loads the subject list from a JSON file at `path`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let subjects: Vec<String> = serde_json::from_str(&content)?;
        Ok(Self::new(subjects)?)
    }

    /// Resolves the subject list: an inline comma list wins over a JSON
    /// file, which wins over [`SUBJECTS_ENV`], which wins over the defaults.
    /// A comma list with no usable names is ignored.
    pub fn resolve(inline: Option<&str>, file: Option<&str>) -> anyhow::Result<Self> {
        if let Some(subjects) = inline.and_then(parse_list) {
            return Ok(Self::new(subjects)?);
        }
        if let Some(path) = file {
            return Self::load(path);
        }
        if let Some(subjects) = std::env::var(SUBJECTS_ENV).ok().as_deref().and_then(parse_list) {
            return Ok(Self::new(subjects)?);
        }
        Ok(Self::default())
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }
}

/// Splits a comma-separated list, trimming names and dropping blanks.
/// Returns `None` when nothing usable is left.
pub fn parse_list(raw: &str) -> Option<Vec<String>> {
    let parts: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();

    (!parts.is_empty()).then_some(parts)
}
