//! CSV persistence for the roster.
//!
//! Files carry one header row, `name,rollId,<subjects...>,total,percentage,grade`,
//! then one row per student. Loading is lenient by default: unreadable or
//! missing cells fall back to safe values and stored derived fields are
//! trusted as-is.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, info, warn};

use crate::config::LoadOptions;
use crate::error::{Result, RosterError};
use crate::grading::utility::{format_percentage, round2};
use crate::record::{StudentRecord, sum};
use crate::roster::Roster;

pub const NAME_COLUMN: &str = "name";
pub const ROLL_ID_COLUMN: &str = "rollId";
/// Roll id column name used by older files.
pub const LEGACY_ROLL_ID_COLUMN: &str = "roll_no";
pub const TOTAL_COLUMN: &str = "total";
pub const PERCENTAGE_COLUMN: &str = "percentage";
pub const GRADE_COLUMN: &str = "grade";

/// Header row for a roster saved under `subjects`.
pub fn header(subjects: &[String]) -> Vec<&str> {
    let mut columns = vec![NAME_COLUMN, ROLL_ID_COLUMN];
    columns.extend(subjects.iter().map(String::as_str));
    columns.extend([TOTAL_COLUMN, PERCENTAGE_COLUMN, GRADE_COLUMN]);
    columns
}

/// Writes the roster to `path` and returns the number of rows written.
///
/// Rows go to a hidden temporary file beside `path` which is then renamed
/// over it, so a failed save leaves any existing file untouched.
pub fn save(roster: &Roster, subjects: &[String], path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let tmp = temp_path_for(path);
    debug!(path = %path.display(), tmp = %tmp.display(), "Saving roster");

    let written = write_rows(roster, subjects, &tmp).and_then(|count| {
        fs::rename(&tmp, path)?;
        Ok(count)
    });

    match written {
        Ok(count) => {
            info!(path = %path.display(), rows = count, "Saved roster");
            Ok(count)
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn write_rows(roster: &Roster, subjects: &[String], tmp: &Path) -> Result<usize> {
    let file = File::create(tmp)?;
    let mut writer = WriterBuilder::new().from_writer(file);

    writer.write_record(header(subjects))?;

    for record in roster {
        let mut row = Vec::with_capacity(subjects.len() + 5);
        row.push(record.name.clone());
        row.push(record.roll_id.clone());
        // Marks beyond the subject list have no column; missing ones stay blank.
        row.extend(
            (0..subjects.len()).map(|i| record.marks.get(i).map(i64::to_string).unwrap_or_default()),
        );
        row.push(record.total.to_string());
        row.push(format_percentage(record.percentage));
        row.push(record.grade.clone());
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(roster.len())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("roster.csv");
    parent.join(format!(".{}.{}.tmp", file_name, std::process::id()))
}

/// Loads a roster from `path` with the default lenient policy.
///
/// A missing file is not an error and yields an empty roster.
pub fn load(path: impl AsRef<Path>, subjects: &[String]) -> Result<Roster> {
    load_with(path, subjects, LoadOptions::default())
}

/// Loads a roster from `path` using `options`.
pub fn load_with(
    path: impl AsRef<Path>,
    subjects: &[String],
    options: LoadOptions,
) -> Result<Roster> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "File not found, starting with an empty roster");
        return Ok(Roster::new());
    }

    let roster = load_from_reader(File::open(path)?, subjects, options)?;
    info!(path = %path.display(), rows = roster.len(), "Loaded roster");
    Ok(roster)
}

/// Reads roster rows from any CSV source.
///
/// Columns are matched by header name, so reordered columns still load.
/// In lenient mode a subject cell that is missing or not an integer becomes
/// `0`, an unreadable total becomes the sum of the marks, and an unreadable
/// percentage becomes `0.0`. Grades are taken verbatim.
pub fn load_from_reader<R: Read>(
    reader: R,
    subjects: &[String],
    options: LoadOptions,
) -> Result<Roster> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::new(rdr.headers()?, subjects);

    let mut roster = Roster::new();
    for (index, result) in rdr.records().enumerate() {
        let row = Row {
            number: index + 1,
            cells: result?,
            columns: &columns,
            options,
        };
        roster.add(row.to_record(subjects)?);
    }

    Ok(roster)
}

/// Header positions resolved once per file.
struct Columns {
    name: Option<usize>,
    roll_id: Option<usize>,
    subjects: Vec<Option<usize>>,
    total: Option<usize>,
    percentage: Option<usize>,
    grade: Option<usize>,
}

impl Columns {
    fn new(headers: &StringRecord, subjects: &[String]) -> Self {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            // first occurrence wins on duplicate headers
            positions.entry(h).or_insert(i);
        }
        let find = |name: &str| positions.get(name).copied();

        Columns {
            name: find(NAME_COLUMN),
            roll_id: find(ROLL_ID_COLUMN).or_else(|| find(LEGACY_ROLL_ID_COLUMN)),
            subjects: subjects.iter().map(|s| find(s.as_str())).collect(),
            total: find(TOTAL_COLUMN),
            percentage: find(PERCENTAGE_COLUMN),
            grade: find(GRADE_COLUMN),
        }
    }
}

struct Row<'a> {
    number: usize,
    cells: StringRecord,
    columns: &'a Columns,
    options: LoadOptions,
}

impl Row<'_> {
    fn to_record(&self, subjects: &[String]) -> Result<StudentRecord> {
        let mut marks: Vec<i64> = Vec::with_capacity(subjects.len());
        for (subject, position) in subjects.iter().zip(&self.columns.subjects) {
            let mark = self.parse_or(subject, *position, || 0)?;
            marks.push(mark);
        }

        let total = self.parse_or(TOTAL_COLUMN, self.columns.total, || sum(&marks))?;
        let percentage: f64 = self.parse_or(PERCENTAGE_COLUMN, self.columns.percentage, || 0.0)?;

        Ok(StudentRecord {
            name: self.text(NAME_COLUMN, self.columns.name)?,
            roll_id: self.cell(self.columns.roll_id).unwrap_or_default().trim().to_string(),
            marks,
            total,
            percentage: round2(percentage),
            grade: self.cell(self.columns.grade).unwrap_or_default().trim().to_string(),
        })
    }

    fn cell(&self, position: Option<usize>) -> Option<&str> {
        position.and_then(|i| self.cells.get(i))
    }

    fn text(&self, column: &str, position: Option<usize>) -> Result<String> {
        match self.cell(position) {
            Some(value) => Ok(value.trim().to_string()),
            None if self.options.strict => Err(self.malformed(column, "")),
            None => Ok(String::new()),
        }
    }

    fn parse_or<T: std::str::FromStr>(
        &self,
        column: &str,
        position: Option<usize>,
        fallback: impl FnOnce() -> T,
    ) -> Result<T> {
        let raw = self.cell(position);
        if let Some(value) = raw.and_then(|v| v.trim().parse().ok()) {
            return Ok(value);
        }

        let raw = raw.unwrap_or_default();
        if self.options.strict {
            return Err(self.malformed(column, raw));
        }

        warn!(row = self.number, column, value = raw, "Unreadable cell, using fallback");
        Ok(fallback())
    }

    fn malformed(&self, column: &str, value: &str) -> RosterError {
        RosterError::Malformed {
            row: self.number,
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}
