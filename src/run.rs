use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::RunError;
use crate::history::{self, trend, HistorySnapshot, HistoryStore};
use crate::predictions::{load_predictions, validate_predictions};
use crate::scoring::{score_predictions, Scoreboard};
use crate::standings::{Standings, StandingsProvider};

/// What the presenters get to show for history
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryView {
    /// Snapshots in chronological order
    Loaded(Vec<HistorySnapshot>),
    Disabled,
    /// The store could not be read; current scores are still shown
    Unavailable(String),
}

impl HistoryView {
    pub fn snapshots(&self) -> &[HistorySnapshot] {
        match self {
            HistoryView::Loaded(snapshots) => snapshots,
            _ => &[],
        }
    }
}

/// Output of one scoring run
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub standings: Standings,
    pub scoreboard: Scoreboard,
    pub history: HistoryView,
    pub fetched_at: DateTime<Utc>,
}

/// Everything a run needs, built once at startup and passed explicitly
#[derive(Debug, Clone)]
pub struct RunContext<P, S> {
    pub provider: P,
    pub history: Option<S>, // None when history is disabled
    pub config: Config,
    pub credential: String,
}

impl<P, S> RunContext<P, S>
where
    P: StandingsProvider,
    S: HistoryStore,
{
    /// Load predictions, fetch the table, score, optionally record a
    /// snapshot, then read back history.
    ///
    /// Predictions and fetch failures abort the run. History failures never do.
    pub async fn execute(&self, record: bool) -> Result<RunOutput, RunError> {
        let total_teams = self.config.total_teams;

        let predictions =
            load_predictions(&self.config.predictions_path(), &self.config.rank_column)?;
        for issue in validate_predictions(&predictions, total_teams) {
            warn!("predictions: {}", issue);
        }

        let standings = self
            .provider
            .fetch(&self.config.league, &self.credential)
            .await?;
        let fetched_at = Utc::now();
        info!(
            league = %self.config.league,
            teams = standings.len(),
            "fetched standings"
        );

        let scoreboard = score_predictions(&standings, &predictions, total_teams)
            .with_icons(|name| self.config.icon_for(name));

        if scoreboard.unmatched_count() > 0 {
            warn!(
                "{} predicted entries matched no team in the current standings",
                scoreboard.unmatched_count()
            );
        }

        if record {
            if let Some(store) = &self.history {
                record_snapshot(store, &scoreboard, &history::types::timestamp_at(fetched_at));
            }
        }

        let history = load_history(self.history.as_ref());

        Ok(RunOutput {
            standings,
            scoreboard,
            history,
            fetched_at,
        })
    }
}

/// Append this run's totals. Best-effort: failures are logged, never returned.
pub fn record_snapshot<S: HistoryStore>(store: &S, scoreboard: &Scoreboard, timestamp: &str) -> bool {
    match store.append(timestamp, &scoreboard.totals()) {
        Ok(()) => {
            debug!(%timestamp, "recorded snapshot");
            true
        }
        Err(e) => {
            warn!("failed to record history: {}", e);
            false
        }
    }
}

/// Read all history, sorted for display
pub fn load_history<S: HistoryStore>(store: Option<&S>) -> HistoryView {
    let Some(store) = store else {
        return HistoryView::Disabled;
    };

    match store.retrieve_all() {
        Ok(snapshots) => HistoryView::Loaded(trend::sorted(snapshots)),
        Err(e) => {
            warn!("failed to read history: {}", e);
            HistoryView::Unavailable(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, PersistenceError, PredictionError};
    use crate::history::{JsonHistoryStore, Totals};
    use crate::standings::TeamStanding;
    use std::path::Path;

    #[derive(Clone)]
    struct StubProvider {
        teams: Vec<&'static str>,
        status: Option<u16>,
    }

    impl StandingsProvider for StubProvider {
        async fn fetch(&self, _league_id: &str, _credential: &str) -> Result<Standings, FetchError> {
            if let Some(code) = self.status {
                return Err(FetchError::Status { code });
            }
            let rows = self
                .teams
                .iter()
                .enumerate()
                .map(|(i, name)| TeamStanding::named(i as u32 + 1, name))
                .collect();
            Standings::new(rows, 20)
        }
    }

    /// Store whose every operation fails
    struct BrokenStore;

    impl HistoryStore for BrokenStore {
        fn append(&self, _timestamp: &str, _totals: &Totals) -> Result<(), PersistenceError> {
            Err(PersistenceError::UnsupportedVersion(99))
        }

        fn retrieve_all(&self) -> Result<Vec<HistorySnapshot>, PersistenceError> {
            Err(PersistenceError::UnsupportedVersion(99))
        }
    }

    fn config_in(dir: &Path) -> Config {
        std::fs::write(
            dir.join("tips.csv"),
            "Position,Alice,Bob\n1,Arsenal FC,Chelsea FC\n2,Chelsea FC,Arsenal FC\n3,Everton FC,Typo FC\n",
        )
        .unwrap();
        let mut config: Config =
            serde_saphyr::from_str("league: PL\npredictions: tips.csv\n").unwrap();
        config.base_dir = Some(dir.to_path_buf());
        config
    }

    fn provider() -> StubProvider {
        StubProvider {
            teams: vec!["Arsenal FC", "Chelsea FC", "Everton FC"],
            status: None,
        }
    }

    #[tokio::test]
    async fn test_run_scores_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = RunContext {
            provider: provider(),
            history: Some(JsonHistoryStore::new(dir.path().join("history.json"))),
            config: config_in(dir.path()),
            credential: "token".to_string(),
        };

        let output = ctx.execute(true).await.unwrap();
        assert_eq!(output.scoreboard.total_for("Alice"), Some(30));
        // Chelsea/Arsenal swapped: 5 + 5, Typo FC unmatched: 0
        assert_eq!(output.scoreboard.total_for("Bob"), Some(10));
        assert_eq!(output.scoreboard.unmatched_count(), 1);

        let snapshots = output.history.snapshots();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].totals["Alice"], 30);
    }

    #[tokio::test]
    async fn test_run_without_record_leaves_history_alone() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = RunContext {
            provider: provider(),
            history: Some(JsonHistoryStore::new(dir.path().join("history.json"))),
            config: config_in(dir.path()),
            credential: "token".to_string(),
        };

        let output = ctx.execute(false).await.unwrap();
        assert_eq!(output.history, HistoryView::Loaded(vec![]));
        assert!(!dir.path().join("history.json").exists());
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = RunContext {
            provider: StubProvider {
                teams: vec![],
                status: Some(403),
            },
            history: Some(JsonHistoryStore::new(dir.path().join("history.json"))),
            config: config_in(dir.path()),
            credential: "token".to_string(),
        };

        let result = ctx.execute(true).await;
        assert!(matches!(
            result,
            Err(RunError::Fetch(FetchError::Status { code: 403 }))
        ));
        assert!(!dir.path().join("history.json").exists());
    }

    #[tokio::test]
    async fn test_missing_predictions_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.predictions = "absent.csv".into();
        let ctx: RunContext<_, JsonHistoryStore> = RunContext {
            provider: provider(),
            history: None,
            config,
            credential: "token".to_string(),
        };

        let result = ctx.execute(false).await;
        assert!(matches!(
            result,
            Err(RunError::Predictions(PredictionError::Read { .. }))
        ));
    }

    #[tokio::test]
    async fn test_broken_history_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = RunContext {
            provider: provider(),
            history: Some(BrokenStore),
            config: config_in(dir.path()),
            credential: "token".to_string(),
        };

        let output = ctx.execute(true).await.unwrap();
        assert_eq!(output.scoreboard.total_for("Alice"), Some(30));
        assert!(matches!(output.history, HistoryView::Unavailable(_)));
        assert!(output.history.snapshots().is_empty());
    }

    #[tokio::test]
    async fn test_history_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let ctx: RunContext<_, JsonHistoryStore> = RunContext {
            provider: provider(),
            history: None,
            config: config_in(dir.path()),
            credential: "token".to_string(),
        };

        let output = ctx.execute(true).await.unwrap();
        assert_eq!(output.history, HistoryView::Disabled);
    }

    #[test]
    fn test_record_snapshot_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let standings = Standings::new(vec![TeamStanding::named(1, "Arsenal FC")], 20).unwrap();
        let board = score_predictions(
            &standings,
            &crate::predictions::read_predictions("Position,Alice\n1,Arsenal FC\n".as_bytes(), "Position")
                .unwrap(),
            20,
        );

        assert!(!record_snapshot(&BrokenStore, &board, "2026-10-14 08:00:00"));

        let store = JsonHistoryStore::new(dir.path().join("history.json"));
        assert!(record_snapshot(&store, &board, "2026-10-14 08:00:00"));
        assert_eq!(store.retrieve_all().unwrap()[0].totals["Alice"], 10);
    }
}
