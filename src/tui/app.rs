use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::history::trend;
use crate::run::RunOutput;
use crate::tui::theme::ThemeColors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Leaderboard,
    Grid,
    Standings,
    Trend,
}

impl View {
    pub const ALL: [View; 4] = [View::Leaderboard, View::Grid, View::Standings, View::Trend];

    pub fn title(self) -> &'static str {
        match self {
            View::Leaderboard => "Leaderboard",
            View::Grid => "Predictions",
            View::Standings => "Table",
            View::Trend => "Trend",
        }
    }

    pub fn index(self) -> usize {
        match self {
            View::Leaderboard => 0,
            View::Grid => 1,
            View::Standings => 2,
            View::Trend => 3,
        }
    }

    pub fn next(self) -> View {
        View::ALL[(self.index() + 1) % View::ALL.len()]
    }

    pub fn previous(self) -> View {
        View::ALL[(self.index() + View::ALL.len() - 1) % View::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
}

pub struct App {
    pub output: Option<RunOutput>, // None until the first run completes
    pub changes: BTreeMap<String, i64>,
    pub table_state: ratatui::widgets::TableState,
    pub current_view: View,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, Instant)>,
    pub last_refresh: Instant,
    pub last_interaction: Instant,
    pub needs_refresh: bool,
    pub force_refresh: bool,
    pub should_quit: bool,
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub league: String,
    pub auto_refresh_interval: Duration,
    pub theme: ThemeColors,
}

impl App {
    /// App with no data yet, in loading state. The dashboard draws
    /// immediately and fills in when the first run returns.
    pub fn new_loading(league: String, auto_refresh_secs: u64, theme: ThemeColors) -> Self {
        Self {
            output: None,
            changes: BTreeMap::new(),
            table_state: ratatui::widgets::TableState::default(),
            current_view: View::Leaderboard,
            input_mode: InputMode::Normal,
            flash_message: None,
            last_refresh: Instant::now(),
            last_interaction: Instant::now(),
            needs_refresh: false,
            force_refresh: false,
            should_quit: false,
            is_loading: true,
            spinner_frame: 0,
            league,
            auto_refresh_interval: Duration::from_secs(auto_refresh_secs),
            theme,
        }
    }

    /// Number of selectable rows in the current view
    pub fn row_count(&self) -> usize {
        let Some(output) = &self.output else {
            return 0;
        };
        match self.current_view {
            View::Leaderboard => output.scoreboard.leaderboard().len(),
            View::Grid => output.scoreboard.ranks().len(),
            View::Standings => output.standings.len(),
            View::Trend => 0,
        }
    }

    pub fn next_row(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.reset_selection();
    }

    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    pub fn previous_view(&mut self) {
        self.set_view(self.current_view.previous());
    }

    fn reset_selection(&mut self) {
        if self.row_count() == 0 {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
    }

    /// Keep the selection inside the current row count
    fn clamp_selection(&mut self) {
        let len = self.row_count();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            Some(selected) if selected >= len => self.table_state.select(Some(len - 1)),
            Some(_) => {}
            None => self.table_state.select(Some(0)),
        }
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Replace the displayed tables with a fresh run
    pub fn update_output(&mut self, output: RunOutput) {
        self.changes = trend::latest_change(output.history.snapshots());

        let participants = output.scoreboard.participants().len();
        let unmatched = output.scoreboard.unmatched_count();
        self.output = Some(output);
        self.clamp_selection();
        self.last_refresh = Instant::now();

        if unmatched > 0 {
            self.show_flash(format!(
                "Refreshed ({} participants, {} unmatched names)",
                participants, unmatched
            ));
        } else {
            self.show_flash(format!("Refreshed ({} participants)", participants));
        }
    }

    /// Advance the loading spinner animation frame
    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictions::read_predictions;
    use crate::run::HistoryView;
    use crate::scoring::score_predictions;
    use crate::standings::{Standings, TeamStanding};
    use chrono::Utc;

    fn sample_output() -> RunOutput {
        let standings = Standings::new(
            vec![
                TeamStanding::named(1, "Arsenal FC"),
                TeamStanding::named(2, "Chelsea FC"),
                TeamStanding::named(3, "Everton FC"),
            ],
            20,
        )
        .unwrap();
        let predictions = read_predictions(
            "Position,Alice,Bob\n1,Arsenal FC,Chelsea FC\n2,Chelsea FC,Typo FC\n".as_bytes(),
            "Position",
        )
        .unwrap();
        let scoreboard = score_predictions(&standings, &predictions, 20);
        RunOutput {
            standings,
            scoreboard,
            history: HistoryView::Disabled,
            fetched_at: Utc::now(),
        }
    }

    fn loaded_app() -> App {
        let mut app = App::new_loading("PL".to_string(), 300, ThemeColors::dark());
        app.update_output(sample_output());
        app
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Leaderboard.next(), View::Grid);
        assert_eq!(View::Trend.next(), View::Leaderboard);
        assert_eq!(View::Leaderboard.previous(), View::Trend);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = loaded_app();
        assert_eq!(app.table_state.selected(), Some(0));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(1));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(1));
    }

    #[test]
    fn test_row_count_per_view() {
        let mut app = loaded_app();
        assert_eq!(app.row_count(), 2);
        app.set_view(View::Standings);
        assert_eq!(app.row_count(), 3);
        app.set_view(View::Trend);
        assert_eq!(app.row_count(), 0);
        assert_eq!(app.table_state.selected(), None);
    }

    #[test]
    fn test_loading_app_has_no_rows() {
        let mut app = App::new_loading("PL".to_string(), 300, ThemeColors::dark());
        assert!(app.is_loading);
        app.next_row();
        assert_eq!(app.table_state.selected(), None);
    }

    #[test]
    fn test_update_output_flashes_unmatched() {
        let app = loaded_app();
        let (msg, _) = app.flash_message.clone().unwrap();
        assert_eq!(msg, "Refreshed (2 participants, 1 unmatched names)");
    }

    #[test]
    fn test_update_output_clamps_selection() {
        let mut app = loaded_app();
        app.set_view(View::Standings);
        app.table_state.select(Some(2));
        app.set_view(View::Leaderboard);
        app.table_state.select(Some(5));
        app.update_output(sample_output());
        assert_eq!(app.table_state.selected(), Some(1));
    }
}
