use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::FetchError;

/// One row of the live league table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub position: u32, // As reported by the provider, display only
    pub name: String,
    pub played: u32,
    pub won: u32,
    pub draw: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}

impl TeamStanding {
    /// A row with only a name and position, all statistics zero
    pub fn named(position: u32, name: &str) -> Self {
        Self {
            position,
            name: name.to_string(),
            played: 0,
            won: 0,
            draw: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }
}

/// The current table, ordered by rank. A team's actual rank is its 1-based
/// index in `teams`.
#[derive(Debug, Clone)]
pub struct Standings {
    teams: Vec<TeamStanding>,
    ranks: HashMap<String, u32>,
}

impl Standings {
    /// Build a table from rows in rank order.
    ///
    /// Rejects more rows than `total_teams` and duplicate team names.
    pub fn new(teams: Vec<TeamStanding>, total_teams: u32) -> Result<Self, FetchError> {
        if teams.len() > total_teams as usize {
            return Err(FetchError::InvalidStandings(format!(
                "{} teams in table, league size is {}",
                teams.len(),
                total_teams
            )));
        }

        let mut ranks = HashMap::with_capacity(teams.len());
        for (idx, team) in teams.iter().enumerate() {
            if ranks.insert(team.name.clone(), idx as u32 + 1).is_some() {
                return Err(FetchError::InvalidStandings(format!(
                    "duplicate team '{}'",
                    team.name
                )));
            }
        }

        Ok(Self { teams, ranks })
    }

    /// Exact, case-sensitive lookup of a team's current rank
    pub fn rank_of(&self, team: &str) -> Option<u32> {
        self.ranks.get(team).copied()
    }

    pub fn teams(&self) -> &[TeamStanding] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
