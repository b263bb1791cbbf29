use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

use super::rubric::Tier;
use crate::predictions::PredictionSet;
use crate::standings::Standings;

/// A single guess after looking its team up in the live table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedGuess {
    pub participant: String,
    pub rank: u32,
    pub team: String,
    pub actual_rank: Option<u32>, // None when the name is not in the table
}

/// Result of matching every predicted team name against the standings
#[derive(Debug, Clone, Default)]
pub struct MatchReport {
    pub guesses: Vec<ClassifiedGuess>,
}

impl MatchReport {
    pub fn matched_count(&self) -> usize {
        self.guesses.iter().filter(|g| g.actual_rank.is_some()).count()
    }

    pub fn unmatched_count(&self) -> usize {
        self.guesses.len() - self.matched_count()
    }

    /// Distinct team names that matched nothing, sorted
    pub fn unmatched_teams(&self) -> BTreeSet<&str> {
        self.guesses
            .iter()
            .filter(|g| g.actual_rank.is_none())
            .map(|g| g.team.as_str())
            .collect()
    }
}

/// Look up every guess in the standings. Exact, case-sensitive names only.
pub fn classify(standings: &Standings, predictions: &PredictionSet) -> MatchReport {
    let guesses = predictions
        .iter()
        .flat_map(|(participant, prediction)| {
            prediction.guesses.iter().map(move |guess| ClassifiedGuess {
                participant: participant.to_string(),
                rank: guess.rank,
                team: guess.team.clone(),
                actual_rank: standings.rank_of(&guess.team),
            })
        })
        .collect();

    MatchReport { guesses }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCell {
    pub participant: String,
    pub rank: u32,
    pub team: String,
    pub actual_rank: Option<u32>,
    pub tier: Option<Tier>, // None for unmatched names
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantTotal {
    pub participant: String,
    pub total: u32,
    pub icon: Option<String>,
}

/// Everything one scoring pass produces
#[derive(Debug, Clone)]
pub struct Scoreboard {
    participants: Vec<String>, // source column order
    cells: Vec<ScoreCell>,
    leaderboard: Vec<ParticipantTotal>,
    report: MatchReport,
}

impl Scoreboard {
    /// Totals sorted by points descending, ties by participant name
    pub fn leaderboard(&self) -> &[ParticipantTotal] {
        &self.leaderboard
    }

    /// Participants in the order the predictions source listed them
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn cells(&self) -> &[ScoreCell] {
        &self.cells
    }

    pub fn cells_for<'a>(&'a self, participant: &'a str) -> impl Iterator<Item = &'a ScoreCell> {
        self.cells.iter().filter(move |c| c.participant == participant)
    }

    /// Cell for a participant's guess at `rank`, first occurrence wins
    pub fn cell_at(&self, participant: &str, rank: u32) -> Option<&ScoreCell> {
        self.cells
            .iter()
            .find(|c| c.participant == participant && c.rank == rank)
    }

    pub fn total_for(&self, participant: &str) -> Option<u32> {
        self.leaderboard
            .iter()
            .find(|t| t.participant == participant)
            .map(|t| t.total)
    }

    /// Participant -> total, as stored in history snapshots
    pub fn totals(&self) -> BTreeMap<String, u32> {
        self.leaderboard
            .iter()
            .map(|t| (t.participant.clone(), t.total))
            .collect()
    }

    pub fn report(&self) -> &MatchReport {
        &self.report
    }

    pub fn unmatched_count(&self) -> usize {
        self.report.unmatched_count()
    }

    /// Every distinct predicted rank, ascending. Used as the grid's row keys.
    pub fn ranks(&self) -> Vec<u32> {
        let ranks: BTreeSet<u32> = self.cells.iter().map(|c| c.rank).collect();
        ranks.into_iter().collect()
    }

    /// Attach display icons to the leaderboard entries
    pub fn with_icons<F>(mut self, icon_for: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for entry in &mut self.leaderboard {
            entry.icon = icon_for(&entry.participant);
        }
        self
    }
}

/// Score every participant's prediction against the live table.
///
/// Pure: no I/O, no state. Unmatched team names score zero and are counted
/// in the report.
pub fn score_predictions(
    standings: &Standings,
    predictions: &PredictionSet,
    total_teams: u32,
) -> Scoreboard {
    let report = classify(standings, predictions);

    for team in report.unmatched_teams() {
        warn!("'{}' is not in the current standings, scoring 0", team);
    }

    let cells: Vec<ScoreCell> = report
        .guesses
        .iter()
        .map(|guess| {
            let tier = guess
                .actual_rank
                .map(|actual| Tier::classify(guess.rank, actual, total_teams));
            ScoreCell {
                participant: guess.participant.clone(),
                rank: guess.rank,
                team: guess.team.clone(),
                actual_rank: guess.actual_rank,
                tier,
                points: tier.map(Tier::points).unwrap_or(0),
            }
        })
        .collect();

    let participants: Vec<String> = predictions.participants().map(str::to_string).collect();

    let mut leaderboard: Vec<ParticipantTotal> = participants
        .iter()
        .map(|participant| ParticipantTotal {
            participant: participant.clone(),
            total: cells
                .iter()
                .filter(|c| &c.participant == participant)
                .map(|c| c.points)
                .sum(),
            icon: None,
        })
        .collect();

    // Primary: total descending. Tie-breaker: name ascending
    leaderboard.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.participant.cmp(&b.participant))
    });

    Scoreboard {
        participants,
        cells,
        leaderboard,
        report,
    }
}
