use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::debug;

use super::provider::StandingsProvider;
use super::types::{Standings, TeamStanding};
use crate::error::FetchError;

pub const DEFAULT_BASE_URL: &str = "https://api.football-data.org/v4";
const AUTH_HEADER: &str = "X-Auth-Token";

#[derive(Deserialize)]
struct StandingsResponse {
    standings: Vec<StandingGroup>,
}

#[derive(Deserialize)]
struct StandingGroup {
    table: Vec<TableRow>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TableRow {
    position: u32,
    team: TeamRef,
    played_games: u32,
    won: u32,
    draw: u32,
    lost: u32,
    points: u32,
    goals_for: u32,
    goals_against: u32,
    goal_difference: i32,
}

#[derive(Deserialize)]
struct TeamRef {
    name: String,
}

/// football-data.org v4 standings client
#[derive(Clone, Debug)]
pub struct FootballDataProvider {
    client: Client,
    base_url: String,
    total_teams: u32,
}

impl FootballDataProvider {
    pub fn new(base_url: &str, timeout: Duration, total_teams: u32) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("table-tipper/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            total_teams,
        })
    }

    async fn request(&self, url: &str, credential: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(AUTH_HEADER, credential)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}

impl StandingsProvider for FootballDataProvider {
    async fn fetch(&self, league_id: &str, credential: &str) -> Result<Standings, FetchError> {
        let url = standings_url(&self.base_url, league_id);
        debug!(%url, "fetching standings");

        // Only transport failures are retried; a status code is an answer
        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(3);

        let body = RetryIf::spawn(
            retry_strategy,
            || self.request(&url, credential),
            |e: &FetchError| matches!(e, FetchError::Transport(_)),
        )
        .await?;

        parse_standings(&body, self.total_teams)
    }
}

fn standings_url(base_url: &str, league_id: &str) -> String {
    format!(
        "{}/competitions/{}/standings",
        base_url.trim_end_matches('/'),
        league_id
    )
}

/// Decode a standings response body, taking the first (overall) table
pub fn parse_standings(body: &str, total_teams: u32) -> Result<Standings, FetchError> {
    let response: StandingsResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    let group = response
        .standings
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::InvalidStandings("response has no standings".to_string()))?;

    let teams = group
        .table
        .into_iter()
        .map(|row| TeamStanding {
            position: row.position,
            name: row.team.name,
            played: row.played_games,
            won: row.won,
            draw: row.draw,
            lost: row.lost,
            goals_for: row.goals_for,
            goals_against: row.goals_against,
            goal_difference: row.goal_difference,
            points: row.points,
        })
        .collect();

    Standings::new(teams, total_teams)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "competition": {"code": "PL"},
        "standings": [
            {
                "stage": "REGULAR_SEASON",
                "type": "TOTAL",
                "table": [
                    {
                        "position": 1,
                        "team": {"id": 64, "name": "Liverpool FC", "shortName": "Liverpool"},
                        "playedGames": 10, "form": null, "won": 8, "draw": 1, "lost": 1,
                        "points": 25, "goalsFor": 22, "goalsAgainst": 7, "goalDifference": 15
                    },
                    {
                        "position": 2,
                        "team": {"id": 57, "name": "Arsenal FC", "shortName": "Arsenal"},
                        "playedGames": 10, "form": null, "won": 7, "draw": 2, "lost": 1,
                        "points": 23, "goalsFor": 20, "goalsAgainst": 9, "goalDifference": 11
                    }
                ]
            },
            {"stage": "REGULAR_SEASON", "type": "HOME", "table": []}
        ]
    }"#;

    #[test]
    fn test_parse_first_table() {
        let standings = parse_standings(BODY, 20).unwrap();
        assert_eq!(standings.len(), 2);
        assert_eq!(standings.rank_of("Liverpool FC"), Some(1));
        assert_eq!(standings.rank_of("Arsenal FC"), Some(2));

        let arsenal = &standings.teams()[1];
        assert_eq!(arsenal.played, 10);
        assert_eq!(arsenal.points, 23);
        assert_eq!(arsenal.goal_difference, 11);
    }

    #[test]
    fn test_parse_negative_goal_difference() {
        let body = r#"{"standings": [{"table": [{
            "position": 1, "team": {"name": "Ipswich Town FC"},
            "playedGames": 3, "won": 0, "draw": 0, "lost": 3,
            "points": 0, "goalsFor": 1, "goalsAgainst": 9, "goalDifference": -8
        }]}]}"#;
        let standings = parse_standings(body, 20).unwrap();
        assert_eq!(standings.teams()[0].goal_difference, -8);
    }

    #[test]
    fn test_parse_empty_standings_is_invalid() {
        let result = parse_standings(r#"{"standings": []}"#, 20);
        assert!(matches!(result, Err(FetchError::InvalidStandings(_))));
    }

    #[test]
    fn test_parse_garbage_is_decode_error() {
        let result = parse_standings("<html>Bad Gateway</html>", 20);
        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_standings_url_trims_trailing_slash() {
        assert_eq!(
            standings_url("https://example.test/v4/", "PL"),
            "https://example.test/v4/competitions/PL/standings"
        );
    }
}
