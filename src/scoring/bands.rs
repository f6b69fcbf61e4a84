/// One row of the APS table: marks in `min_mark..=max_mark` earn `points`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBand {
    pub min_mark: i32,
    pub max_mark: i32,
    pub points: u32,
}

impl ScoreBand {
    pub fn matches(&self, mark: i32) -> bool {
        mark >= self.min_mark && mark <= self.max_mark
    }
}

/// NSC-aligned bands, highest first. Marks below 30 earn nothing (not 1).
pub const SCORE_BANDS: [ScoreBand; 7] = [
    ScoreBand { min_mark: 80, max_mark: 100, points: 7 },
    ScoreBand { min_mark: 70, max_mark: 79, points: 6 },
    ScoreBand { min_mark: 60, max_mark: 69, points: 5 },
    ScoreBand { min_mark: 50, max_mark: 59, points: 4 },
    ScoreBand { min_mark: 40, max_mark: 49, points: 3 },
    ScoreBand { min_mark: 30, max_mark: 39, points: 2 },
    ScoreBand { min_mark: 0, max_mark: 29, points: 0 },
];

/// Highest points any single subject can earn
pub const MAX_POINTS_PER_SUBJECT: u32 = 7;

/// Convert a percentage mark to APS points.
///
/// Bands are checked highest first against their lower bound only, so
/// out-of-range input saturates: anything above 100 lands in the top band
/// and anything below 0 lands in the bottom band.
pub fn points_for_mark(mark: i32) -> u32 {
    SCORE_BANDS
        .iter()
        .find(|band| mark >= band.min_mark)
        .map(|band| band.points)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(points_for_mark(80), 7);
        assert_eq!(points_for_mark(79), 6);
        assert_eq!(points_for_mark(70), 6);
        assert_eq!(points_for_mark(69), 5);
        assert_eq!(points_for_mark(60), 5);
        assert_eq!(points_for_mark(59), 4);
        assert_eq!(points_for_mark(50), 4);
        assert_eq!(points_for_mark(49), 3);
        assert_eq!(points_for_mark(40), 3);
        assert_eq!(points_for_mark(39), 2);
        assert_eq!(points_for_mark(30), 2);
        assert_eq!(points_for_mark(29), 0);
    }

    #[test]
    fn test_below_thirty_is_zero() {
        for mark in 0..=29 {
            assert_eq!(points_for_mark(mark), 0, "mark {}", mark);
        }
    }

    #[test]
    fn test_monotonic_non_decreasing() {
        let mut previous = points_for_mark(0);
        for mark in 1..=100 {
            let current = points_for_mark(mark);
            assert!(current >= previous, "dropped at mark {}", mark);
            previous = current;
        }
    }

    #[test]
    fn test_out_of_range_saturates() {
        assert_eq!(points_for_mark(-5), 0);
        assert_eq!(points_for_mark(i32::MIN), 0);
        assert_eq!(points_for_mark(130), 7);
    }

    #[test]
    fn test_table_is_contiguous_and_covers_range() {
        // Highest first: each band's max sits directly below the previous band's min
        assert_eq!(SCORE_BANDS[0].max_mark, 100);
        assert_eq!(SCORE_BANDS[SCORE_BANDS.len() - 1].min_mark, 0);
        for pair in SCORE_BANDS.windows(2) {
            assert_eq!(pair[1].max_mark + 1, pair[0].min_mark);
            assert!(pair[1].min_mark <= pair[1].max_mark);
        }
    }

    #[test]
    fn test_every_mark_matches_exactly_one_band() {
        for mark in 0..=100 {
            let hits: Vec<_> = SCORE_BANDS.iter().filter(|b| b.matches(mark)).collect();
            assert_eq!(hits.len(), 1, "mark {}", mark);
            assert_eq!(hits[0].points, points_for_mark(mark));
        }
    }
}
