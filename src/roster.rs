//! The in-memory roster owned by a session.

use crate::record::StudentRecord;

/// Ordered collection of student records. Insertion order is preserved and
/// duplicate names or roll ids are allowed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    records: Vec<StudentRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: StudentRecord) {
        self.records.push(record);
    }

    /// Appends every record from `other`, keeping its order.
    pub fn extend(&mut self, other: Roster) {
        self.records.extend(other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StudentRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    /// Case-insensitive substring search on names, in roster order.
    /// The query is trimmed first; an empty query matches everyone.
    pub fn find_by_name(&self, query: &str) -> Vec<&StudentRecord> {
        let query = query.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&query))
            .collect()
    }
}

impl FromIterator<StudentRecord> for Roster {
    fn from_iter<I: IntoIterator<Item = StudentRecord>>(iter: I) -> Self {
        Roster {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a StudentRecord;
    type IntoIter = std::slice::Iter<'a, StudentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
