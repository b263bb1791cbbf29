//! The fixed points rubric for a single predicted position.
//!
//! Tiers are checked strictest first and the first match wins:
//!
//! | Tier         | Condition                               | Points |
//! |--------------|-----------------------------------------|--------|
//! | Exact        | predicted == actual                     | 10     |
//! | Close        | within 3 places                         | 5      |
//! | Near         | within 5 places                         | 2      |
//! | CorrectHalf  | both in the top half or both in bottom  | 1      |
//! | Miss         | anything else                           | 0      |
//!
//! The table splits at `n / 2` using real division, so for an odd league
//! size the middle position belongs to the bottom half.

const CLOSE_WINDOW: u32 = 3;
const NEAR_WINDOW: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Exact,
    Close,
    Near,
    CorrectHalf,
    Miss,
}

impl Tier {
    /// Classify a predicted rank against the actual rank in a league of
    /// `total_teams`
    pub fn classify(predicted: u32, actual: u32, total_teams: u32) -> Tier {
        let diff = predicted.abs_diff(actual);

        if diff == 0 {
            Tier::Exact
        } else if diff <= CLOSE_WINDOW {
            Tier::Close
        } else if diff <= NEAR_WINDOW {
            Tier::Near
        } else if in_top_half(predicted, total_teams) == in_top_half(actual, total_teams) {
            Tier::CorrectHalf
        } else {
            Tier::Miss
        }
    }

    pub fn points(self) -> u32 {
        match self {
            Tier::Exact => 10,
            Tier::Close => 5,
            Tier::Near => 2,
            Tier::CorrectHalf => 1,
            Tier::Miss => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Exact => "exact",
            Tier::Close => "close",
            Tier::Near => "near",
            Tier::CorrectHalf => "half",
            Tier::Miss => "miss",
        }
    }
}

/// Points for one guess
pub fn score_cell(predicted: u32, actual: u32, total_teams: u32) -> u32 {
    Tier::classify(predicted, actual, total_teams).points()
}

// rank <= n / 2 in real arithmetic, without the float
fn in_top_half(rank: u32, total_teams: u32) -> bool {
    2 * u64::from(rank) <= u64::from(total_teams)
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: u32 = 20;

    #[test]
    fn test_exact_match_scores_ten() {
        for r in 1..=N {
            assert_eq!(score_cell(r, r, N), 10);
        }
    }

    #[test]
    fn test_tiers_over_whole_table() {
        for p in 1..=N {
            for a in 1..=N {
                let diff = p.abs_diff(a);
                let same_half = (p <= 10) == (a <= 10);
                let expected = match diff {
                    0 => 10,
                    1..=3 => 5,
                    4..=5 => 2,
                    _ if same_half => 1,
                    _ => 0,
                };
                assert_eq!(score_cell(p, a, N), expected, "p={} a={}", p, a);
            }
        }
    }

    #[test]
    fn test_scenario_exact() {
        assert_eq!(Tier::classify(5, 5, N), Tier::Exact);
    }

    #[test]
    fn test_scenario_close_miss_boundary() {
        assert_eq!(score_cell(1, 4, N), 5);
        assert_eq!(score_cell(4, 1, N), 5);
    }

    #[test]
    fn test_near_boundary() {
        assert_eq!(score_cell(1, 5, N), 2);
        assert_eq!(score_cell(1, 6, N), 2);
        assert_eq!(score_cell(1, 7, N), 1);
    }

    #[test]
    fn test_scenario_correct_half() {
        assert_eq!(Tier::classify(2, 8, N), Tier::CorrectHalf);
        assert_eq!(score_cell(2, 8, N), 1);
        assert_eq!(score_cell(12, 20, N), 1);
    }

    #[test]
    fn test_scenario_opposite_halves() {
        assert_eq!(score_cell(1, 20, N), 0);
        assert_eq!(score_cell(4, 11, N), 0);
    }

    #[test]
    fn test_midline_splits_ten_and_eleven() {
        // 10 and 11 are adjacent, so pick ranks far enough apart to reach the half tier
        assert_eq!(score_cell(10, 1, N), 1);
        assert_eq!(score_cell(11, 1, N), 0);
    }

    #[test]
    fn test_odd_league_middle_rank_is_bottom_half() {
        // n = 19: midline at 9.5, so rank 10 is bottom half
        assert_eq!(score_cell(10, 19, 19), 1);
        assert_eq!(score_cell(10, 1, 19), 0);
        assert_eq!(score_cell(9, 1, 19), 1);
    }

    #[test]
    fn test_tier_points_descend() {
        let tiers = [Tier::Exact, Tier::Close, Tier::Near, Tier::CorrectHalf, Tier::Miss];
        for pair in tiers.windows(2) {
            assert!(pair[0].points() > pair[1].points());
        }
    }
}
