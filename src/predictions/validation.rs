use std::collections::{BTreeMap, BTreeSet};

use super::PredictionSet;

/// Report data-quality problems in a prediction set.
/// Returns all issues at once (not just the first). None of them stop scoring.
pub fn validate_predictions(set: &PredictionSet, total_teams: u32) -> Vec<String> {
    let mut issues = Vec::new();

    for (participant, prediction) in set.iter() {
        let mut rank_counts: BTreeMap<u32, usize> = BTreeMap::new();
        let mut team_counts: BTreeMap<&str, usize> = BTreeMap::new();

        for guess in &prediction.guesses {
            *rank_counts.entry(guess.rank).or_default() += 1;
            *team_counts.entry(guess.team.as_str()).or_default() += 1;
        }

        for (rank, count) in &rank_counts {
            if *rank > total_teams {
                issues.push(format!(
                    "{}: rank {} is outside 1..{}",
                    participant, rank, total_teams
                ));
            }
            if *count > 1 {
                issues.push(format!(
                    "{}: rank {} predicted {} times",
                    participant, rank, count
                ));
            }
        }

        let present: BTreeSet<u32> = rank_counts.keys().copied().collect();
        let missing: Vec<String> = (1..=total_teams)
            .filter(|r| !present.contains(r))
            .map(|r| r.to_string())
            .collect();
        if !missing.is_empty() {
            issues.push(format!(
                "{}: no prediction for rank {}",
                participant,
                missing.join(", ")
            ));
        }

        for (team, count) in &team_counts {
            if *count > 1 {
                issues.push(format!(
                    "{}: '{}' predicted {} times",
                    participant, team, count
                ));
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictions::Prediction;

    fn full_prediction(n: u32) -> Prediction {
        (1..=n).map(|r| (r, format!("Team {}", r))).collect()
    }

    #[test]
    fn test_complete_prediction_has_no_issues() {
        let mut set = PredictionSet::new();
        set.insert("Alice", full_prediction(20));
        assert!(validate_predictions(&set, 20).is_empty());
    }

    #[test]
    fn test_missing_ranks_reported_together() {
        let mut set = PredictionSet::new();
        set.insert("Alice", full_prediction(18));
        let issues = validate_predictions(&set, 20);
        assert_eq!(issues, vec!["Alice: no prediction for rank 19, 20".to_string()]);
    }

    #[test]
    fn test_duplicate_rank_and_team() {
        let mut prediction = full_prediction(3);
        prediction.push(2, "Team 1");
        let mut set = PredictionSet::new();
        set.insert("Bob", prediction);

        let issues = validate_predictions(&set, 3);
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i == "Bob: rank 2 predicted 2 times"));
        assert!(issues.iter().any(|i| i == "Bob: 'Team 1' predicted 2 times"));
    }

    #[test]
    fn test_out_of_range_rank() {
        let mut prediction = full_prediction(2);
        prediction.push(25, "Team 25");
        let mut set = PredictionSet::new();
        set.insert("Cleo", prediction);

        let issues = validate_predictions(&set, 2);
        assert_eq!(issues, vec!["Cleo: rank 25 is outside 1..2".to_string()]);
    }
}
