pub mod loader;
pub mod validation;

pub use loader::{load_predictions, read_predictions, DEFAULT_RANK_COLUMN};
pub use validation::validate_predictions;

/// One predicted (rank, team) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guess {
    pub rank: u32,
    pub team: String,
}

/// A participant's guessed table, in source row order.
///
/// Not required to be well formed: ranks may repeat or be missing, and a
/// team may appear twice. Every guess present is scored on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prediction {
    pub guesses: Vec<Guess>,
}

impl Prediction {
    pub fn push(&mut self, rank: u32, team: impl Into<String>) {
        self.guesses.push(Guess {
            rank,
            team: team.into(),
        });
    }

    /// Team guessed at `rank`, first occurrence wins
    pub fn team_at(&self, rank: u32) -> Option<&str> {
        self.guesses
            .iter()
            .find(|g| g.rank == rank)
            .map(|g| g.team.as_str())
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for Prediction {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        let mut prediction = Prediction::default();
        for (rank, team) in iter {
            prediction.push(rank, team);
        }
        prediction
    }
}

/// Every participant's prediction, keyed by participant name and kept in
/// source column order
#[derive(Debug, Clone, Default)]
pub struct PredictionSet {
    entries: Vec<(String, Prediction)>,
}

impl PredictionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant. Returns false (and keeps the existing entry) if the
    /// name is already present.
    pub fn insert(&mut self, participant: impl Into<String>, prediction: Prediction) -> bool {
        let participant = participant.into();
        if self.get(&participant).is_some() {
            return false;
        }
        self.entries.push((participant, prediction));
        true
    }

    pub fn get(&self, participant: &str) -> Option<&Prediction> {
        self.entries
            .iter()
            .find(|(name, _)| name == participant)
            .map(|(_, p)| p)
    }

    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Prediction)> {
        self.entries.iter().map(|(name, p)| (name.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_duplicate_participant() {
        let mut set = PredictionSet::new();
        assert!(set.insert("Alice", [(1, "Arsenal")].into_iter().collect()));
        assert!(!set.insert("Alice", [(1, "Chelsea")].into_iter().collect()));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("Alice").unwrap().team_at(1), Some("Arsenal"));
    }

    #[test]
    fn test_participants_keep_insertion_order() {
        let mut set = PredictionSet::new();
        set.insert("Zoe", Prediction::default());
        set.insert("Adam", Prediction::default());
        let names: Vec<&str> = set.participants().collect();
        assert_eq!(names, vec!["Zoe", "Adam"]);
    }

    #[test]
    fn test_team_at_first_occurrence() {
        let prediction: Prediction = [(1, "Arsenal"), (1, "Chelsea")].into_iter().collect();
        assert_eq!(prediction.team_at(1), Some("Arsenal"));
        assert_eq!(prediction.team_at(2), None);
    }
}
