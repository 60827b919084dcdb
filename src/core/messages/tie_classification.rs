use crate::core::standings::Standings;

/// How many people the message templates talk about by rank.
pub const MIN_PARTICIPANTS: usize = 4;

/// The shape of the top of the standings, used to pick the message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieClass {
    /// Ranks 1-4 all have the same count.
    EveryoneTied,
    /// Ranks 1-3 share first place.
    ThreeWayTie,
    /// Ranks 1-2 share first place.
    TwoWayTie,
    ClearWinner,
}

impl TieClass {
    /// Classifies the standings by comparing the counts at ranks 1 to 4.
    ///
    /// Returns `None` when there are fewer than four people; the templates
    /// need a first, second, third and last place that are distinct people.
    pub fn classify(standings: &Standings) -> Option<TieClass> {
        if standings.len() < MIN_PARTICIPANTS {
            return None;
        }

        let count = |rank: usize| standings.rank(rank).map(|s| s.count);
        let (c0, c1, c2, c3) = (count(0)?, count(1)?, count(2)?, count(3)?);

        let tie = if c0 == c1 && c0 == c2 && c0 == c3 {
            TieClass::EveryoneTied
        } else if c0 == c1 && c0 == c2 {
            TieClass::ThreeWayTie
        } else if c0 == c1 {
            TieClass::TwoWayTie
        } else {
            TieClass::ClearWinner
        };

        Some(tie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::standings::Standing;

    fn standings(counts: &[u32]) -> Standings {
        Standings::new(
            counts
                .iter()
                .enumerate()
                .map(|(i, count)| Standing {
                    person: format!("P{}", i),
                    count: *count,
                })
                .collect(),
        )
    }

    #[test]
    fn classifies_top_four() {
        let cases = [
            (vec![10, 10, 10, 10], TieClass::EveryoneTied),
            (vec![10, 10, 10, 3], TieClass::ThreeWayTie),
            (vec![10, 10, 7, 3], TieClass::TwoWayTie),
            (vec![10, 8, 7, 3], TieClass::ClearWinner),
            (vec![0, 0, 0, 0], TieClass::EveryoneTied),
        ];

        for (counts, expected) in cases {
            assert_eq!(
                TieClass::classify(&standings(&counts)),
                Some(expected),
                "counts {:?}",
                counts
            );
        }
    }

    #[test]
    fn only_ranks_one_to_four_matter() {
        // Counts past rank four are ignored.
        assert_eq!(
            TieClass::classify(&standings(&[4, 4, 4, 4, 1])),
            Some(TieClass::EveryoneTied)
        );
        assert_eq!(
            TieClass::classify(&standings(&[5, 3, 2, 1, 1, 0])),
            Some(TieClass::ClearWinner)
        );
    }

    #[test]
    fn fewer_than_four_people_is_rejected() {
        assert_eq!(TieClass::classify(&standings(&[3, 3, 3])), None);
        assert_eq!(TieClass::classify(&standings(&[])), None);
    }
}
