// Turns the raw spreadsheet block into an `ActivityTable`.
//
// Sheet layout (0-based columns):
//   0: Date   1: Weekday   2: Person1   3: (blank)   4: Person2   5: (blank) ...
// Row 0 holds the column names, row 1 is a second header row we ignore.

use chrono::NaiveDate;
use std::collections::HashSet;

use super::standings_models::{ActivityRow, ActivityTable, RawGrid, StandingsError};

pub const DATE_COLUMN: &str = "Date";
pub const WEEKDAY_COLUMN: &str = "Weekday";

const DATE_FORMAT: &str = "%d.%m.%Y";
const HEADER_ROWS: usize = 2;

/// Every person's value column is followed by a blank spacer column.
/// Those spacers sit at the odd indices starting from 3.
fn is_separator_column(index: usize) -> bool {
    index >= 3 && index % 2 == 1
}

fn drop_separator_columns(row: &[String], width: usize) -> Vec<String> {
    (0..width)
        .filter(|index| !is_separator_column(*index))
        .map(|index| row.get(index).cloned().unwrap_or_default())
        .collect()
}

/// Parses one person cell.
///
/// Empty means "no workout that day". Numbers are taken as-is; anything else
/// people type into the sheet (a check mark, "Gym", "Laufen") is one entry.
fn parse_cell(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.parse::<u32>().unwrap_or(1))
}

fn parse_date(raw: &str, sheet_row: usize) -> Result<NaiveDate, StandingsError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StandingsError::MalformedInput(format!(
            "row {} has entries but no date",
            sheet_row
        )));
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|e| {
        StandingsError::MalformedInput(format!(
            "row {}: could not parse date '{}' as DD.MM.YYYY ({})",
            sheet_row, trimmed, e
        ))
    })
}

/// Normalizes a raw spreadsheet grid into a typed activity table.
///
/// **Errors:** `MalformedInput` when there are fewer than three rows, no `Date`
/// header, a row wider than the header, an unparseable or duplicated date.
pub fn normalize(grid: &RawGrid) -> Result<ActivityTable, StandingsError> {
    if grid.len() <= HEADER_ROWS {
        return Err(StandingsError::MalformedInput(format!(
            "expected {} header rows and at least one data row, got {} row(s)",
            HEADER_ROWS,
            grid.len()
        )));
    }

    let raw_width = grid[0].len();
    let header = drop_separator_columns(&grid[0], raw_width);

    let date_index = header
        .iter()
        .position(|name| name.trim() == DATE_COLUMN)
        .ok_or_else(|| {
            StandingsError::MalformedInput(format!(
                "no '{}' column in header row {:?}",
                DATE_COLUMN, header
            ))
        })?;

    let person_columns: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .map(|(index, name)| (index, name.trim().to_string()))
        .filter(|(_, name)| !name.is_empty() && name != DATE_COLUMN && name != WEEKDAY_COLUMN)
        .collect();

    let mut seen_dates = HashSet::new();
    let mut rows = Vec::with_capacity(grid.len() - HEADER_ROWS);

    for (offset, raw_row) in grid.iter().enumerate().skip(HEADER_ROWS) {
        // 1-based, matches what people see in the spreadsheet UI
        let sheet_row = offset + 1;

        if raw_row.len() > raw_width {
            return Err(StandingsError::MalformedInput(format!(
                "row {} has {} cells but the header has {}",
                sheet_row,
                raw_row.len(),
                raw_width
            )));
        }

        if raw_row.iter().all(|cell| cell.trim().is_empty()) {
            tracing::debug!(sheet_row, "Skipping blank row");
            continue;
        }

        let cells = drop_separator_columns(raw_row, raw_width);
        let date = parse_date(&cells[date_index], sheet_row)?;

        if !seen_dates.insert(date) {
            return Err(StandingsError::MalformedInput(format!(
                "date {} appears more than once (row {})",
                date.format(DATE_FORMAT),
                sheet_row
            )));
        }

        rows.push(ActivityRow {
            date,
            cells: person_columns
                .iter()
                .map(|(index, _)| parse_cell(&cells[*index]))
                .collect(),
        });
    }

    let persons = person_columns.into_iter().map(|(_, name)| name).collect();
    let table = ActivityTable::new(persons, rows);

    tracing::debug!(
        persons = table.persons().len(),
        rows = table.rows().len(),
        "Converted spreadsheet into activity table"
    );

    Ok(table)
}
