// Date-range selection over the activity table.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use super::standings_models::ActivityTable;

/// Keeps the rows whose date lies strictly between `start` and `end`.
///
/// A row's date counts as midnight of that day. Both bounds are exclusive,
/// so a row dated exactly on `start` or `end` is dropped. An inverted or empty
/// window simply yields an empty table.
pub fn select_between(
    table: &ActivityTable,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> ActivityTable {
    if start >= end {
        tracing::debug!(%start, %end, "Empty date window, selecting nothing");
        return table.filter_rows(|_| false);
    }

    table.filter_rows(|row| {
        let instant = row.date.and_time(NaiveTime::MIN);
        start < instant && instant < end
    })
}

/// Selects the last `n_days` days relative to `now`.
///
/// `now` is evaluated once by the caller, not per row.
/// A window reaching past the representable calendar selects nothing.
pub fn select_last_n_days(table: &ActivityTable, n_days: i64, now: NaiveDateTime) -> ActivityTable {
    let Some(start) = Duration::try_days(n_days).and_then(|span| now.checked_sub_signed(span))
    else {
        tracing::warn!(n_days, "Date window out of range, selecting nothing");
        return table.filter_rows(|_| false);
    };

    let selected = select_between(table, start, now);
    tracing::debug!(
        n_days,
        rows = selected.rows().len(),
        "Selected last days of activity"
    );
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::standings::standings_models::ActivityRow;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 5, d).unwrap()
    }

    fn at(d: u32, h: u32) -> NaiveDateTime {
        day(d).and_hms_opt(h, 0, 0).unwrap()
    }

    fn table(days: &[u32]) -> ActivityTable {
        ActivityTable::new(
            vec!["Anna".to_string()],
            days.iter()
                .map(|d| ActivityRow {
                    date: day(*d),
                    cells: vec![Some(1)],
                })
                .collect(),
        )
    }

    fn dates(table: &ActivityTable) -> Vec<u32> {
        use chrono::Datelike;
        table.rows().iter().map(|r| r.date.day()).collect()
    }

    #[test]
    fn bounds_are_exclusive() {
        let source = table(&[1, 2, 3, 4, 5]);
        let selected = select_between(&source, at(2, 0), at(4, 0));
        assert_eq!(dates(&selected), vec![3]);
    }

    #[test]
    fn preserves_row_order_and_persons() {
        let source = table(&[1, 2, 3, 4, 5]);
        let selected = select_between(&source, at(1, 12), at(5, 12));
        assert_eq!(dates(&selected), vec![2, 3, 4, 5]);
        assert_eq!(selected.persons(), source.persons());
    }

    #[test]
    fn inverted_window_is_empty_not_an_error() {
        let source = table(&[1, 2, 3]);
        assert!(select_between(&source, at(3, 0), at(1, 0)).is_empty());
        assert!(select_between(&source, at(2, 0), at(2, 0)).is_empty());
    }

    #[test]
    fn last_seven_days_includes_today_but_not_a_week_ago() {
        let source = table(&[9, 10, 11, 12, 13, 14, 15, 16, 17]);
        // Evening of the 17th: the 10th at midnight is before 17th 20:00 - 7 days.
        let selected = select_last_n_days(&source, 7, at(17, 20));
        assert_eq!(dates(&selected), vec![11, 12, 13, 14, 15, 16, 17]);
    }

    #[test]
    fn oversized_window_selects_nothing() {
        let source = table(&[1, 2, 3]);
        assert!(select_last_n_days(&source, 1_000_000_000, at(3, 12)).is_empty());
        assert!(select_last_n_days(&source, i64::MAX, at(3, 12)).is_empty());
    }

    #[test]
    fn last_days_at_midnight_excludes_today() {
        let source = table(&[9, 10, 11, 16, 17]);
        let selected = select_last_n_days(&source, 7, at(17, 0));
        assert_eq!(dates(&selected), vec![11, 16]);
    }
}
