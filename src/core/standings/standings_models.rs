// Domain models for the workout standings pipeline.
// Everything here is plain data - no spreadsheet, HTTP or chat types leak in.

use chrono::NaiveDate;
use thiserror::Error;

// ============================================================================
// RAW INPUT
// ============================================================================

/// A rectangular block of cells exactly as the spreadsheet returned it.
///
/// The first two rows are header rows. Rows may be shorter than the header
/// row because the Sheets API drops trailing empty cells.
pub type RawGrid = Vec<Vec<String>>;

// ============================================================================
// TYPED TABLE
// ============================================================================

/// One day of tracked activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    pub date: NaiveDate,
    /// One cell per person, in the same order as `ActivityTable::persons`.
    /// `None` means nobody entered anything for that day.
    pub cells: Vec<Option<u32>>,
}

/// The normalized workout log: a Date column plus one column per person.
///
/// Built once per run from a `RawGrid` and never mutated afterwards; the
/// date-range selector hands out filtered copies instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityTable {
    persons: Vec<String>,
    rows: Vec<ActivityRow>,
}

impl ActivityTable {
    pub fn new(persons: Vec<String>, rows: Vec<ActivityRow>) -> Self {
        Self { persons, rows }
    }

    /// Person names in sheet column order.
    pub fn persons(&self) -> &[String] {
        &self.persons
    }

    pub fn rows(&self) -> &[ActivityRow] {
        &self.rows
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a new table with only the rows matching `keep`, order preserved.
    pub fn filter_rows<F>(&self, mut keep: F) -> ActivityTable
    where
        F: FnMut(&ActivityRow) -> bool,
    {
        ActivityTable {
            persons: self.persons.clone(),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }
}

// ============================================================================
// STANDINGS
// ============================================================================

/// A single person's place in the standings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub person: String,
    /// Number of days with an entry inside the selected window.
    pub count: u32,
}

/// Ranked list of persons, highest count first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Standings {
    entries: Vec<Standing>,
}

impl Standings {
    pub fn new(entries: Vec<Standing>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Zero-based rank lookup.
    pub fn rank(&self, index: usize) -> Option<&Standing> {
        self.entries.get(index)
    }

    pub fn last(&self) -> Option<&Standing> {
        self.entries.last()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Standing> {
        self.entries.iter()
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum StandingsError {
    /// The spreadsheet does not have the shape or formats we expect.
    #[error("Malformed spreadsheet input: {0}")]
    MalformedInput(String),
}
