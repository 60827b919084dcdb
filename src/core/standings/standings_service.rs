// Reduces an (already date-filtered) activity table to ranked standings.

use super::standings_models::{ActivityTable, Standing, Standings};

/// Counts the days each person has an entry and ranks them, most active first.
///
/// The sort is stable: people with equal counts keep their sheet column order.
/// An empty table gives everyone a count of zero.
pub fn compute_standings(table: &ActivityTable) -> Standings {
    let mut entries: Vec<Standing> = table
        .persons()
        .iter()
        .enumerate()
        .map(|(column, person)| Standing {
            person: person.clone(),
            count: table
                .rows()
                .iter()
                .filter(|row| matches!(row.cells.get(column), Some(Some(_))))
                .count() as u32,
        })
        .collect();

    entries.sort_by(|a, b| b.count.cmp(&a.count));

    let standings = Standings::new(entries);
    tracing::debug!(?standings, "Computed current standings");
    standings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::standings::standings_models::ActivityRow;
    use chrono::NaiveDate;

    fn row(d: u32, cells: Vec<Option<u32>>) -> ActivityRow {
        ActivityRow {
            date: NaiveDate::from_ymd_opt(2023, 5, d).unwrap(),
            cells,
        }
    }

    fn persons(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn ranking(standings: &Standings) -> Vec<(&str, u32)> {
        standings
            .iter()
            .map(|s| (s.person.as_str(), s.count))
            .collect()
    }

    #[test]
    fn counts_entries_not_values() {
        let table = ActivityTable::new(
            persons(&["Anna", "Ben"]),
            vec![
                row(1, vec![Some(5), None]),
                row(2, vec![Some(1), Some(1)]),
                row(3, vec![None, Some(1)]),
                row(4, vec![None, Some(3)]),
            ],
        );

        assert_eq!(
            ranking(&compute_standings(&table)),
            vec![("Ben", 3), ("Anna", 2)]
        );
    }

    #[test]
    fn ties_keep_column_order() {
        let table = ActivityTable::new(
            persons(&["Anna", "Ben", "Cleo", "Dario"]),
            vec![
                row(1, vec![Some(1), Some(1), Some(1), None]),
                row(2, vec![None, Some(1), None, Some(1)]),
            ],
        );

        assert_eq!(
            ranking(&compute_standings(&table)),
            vec![("Ben", 2), ("Anna", 1), ("Cleo", 1), ("Dario", 1)]
        );
    }

    #[test]
    fn empty_table_ranks_everyone_at_zero() {
        let table = ActivityTable::new(persons(&["Anna", "Ben", "Cleo"]), vec![]);
        let standings = compute_standings(&table);

        assert_eq!(standings.len(), 3);
        assert!(standings.iter().all(|s| s.count == 0));
        assert_eq!(standings.rank(0).unwrap().person, "Anna");
    }
}
