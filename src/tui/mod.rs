pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, ThemeColors};

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};
use tokio::task::JoinHandle;
use tokio::time::error::Elapsed;

use crate::error::RunError;
use crate::history::HistoryStore;
use crate::run::{RunContext, RunOutput};
use crate::standings::StandingsProvider;

const RUN_TIMEOUT: Duration = Duration::from_secs(20);
const TICK_RATE: Duration = Duration::from_millis(250);

type PendingRun = JoinHandle<Result<Result<RunOutput, RunError>, Elapsed>>;

fn spawn_run<P, S>(ctx: &Arc<RunContext<P, S>>, record: bool) -> PendingRun
where
    P: StandingsProvider + Send + Sync + 'static,
    S: HistoryStore + Send + Sync + 'static,
{
    let ctx = Arc::clone(ctx);
    tokio::spawn(async move { tokio::time::timeout(RUN_TIMEOUT, ctx.execute(record)).await })
}

/// Run the interactive dashboard until the user quits.
///
/// The first run records a snapshot when `record_first` is set. Later
/// refreshes, manual or timed, only re-read history.
pub async fn run_tui<P, S>(
    mut app: App,
    ctx: RunContext<P, S>,
    record_first: bool,
) -> anyhow::Result<()>
where
    P: StandingsProvider + Send + Sync + 'static,
    S: HistoryStore + Send + Sync + 'static,
{
    let ctx = Arc::new(ctx);

    // Log output would corrupt the display while the TUI owns the terminal
    crate::stderr_buffer::activate();

    // Sets up panic hooks that restore the terminal
    let mut terminal = ratatui::init();

    let mut events = EventHandler::new(TICK_RATE, app.auto_refresh_interval);

    let mut pending_run: Option<PendingRun> = Some(spawn_run(&ctx, record_first));
    app.is_loading = true;

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(anyhow::Error::new(e).context("failed to draw dashboard"));
        }

        match events.next().await {
            Some(Event::Key(key)) => {
                app.last_interaction = std::time::Instant::now();
                handle_key_event(&mut app, key);
            }
            Some(Event::Tick) => {
                app.update_flash();
                app.advance_spinner();
            }
            Some(Event::Refresh) => app.needs_refresh = true,
            None => app.should_quit = true,
        }

        if pending_run.as_ref().is_some_and(|h| h.is_finished()) {
            if let Some(handle) = pending_run.take() {
                apply_run_result(&mut app, handle.await);
                app.is_loading = false;
            }
        }

        if app.needs_refresh && pending_run.is_none() {
            // Auto-refresh waits while help is open or the user is active.
            // Manual refresh always proceeds. needs_refresh stays set so a
            // suppressed refresh retries on the next tick.
            let is_manual = app.force_refresh;
            let modal_open = app.input_mode != app::InputMode::Normal;
            let recent_interaction = app.last_interaction.elapsed() < Duration::from_secs(10);

            if is_manual || (!modal_open && !recent_interaction) {
                app.needs_refresh = false;
                app.force_refresh = false;
                pending_run = Some(spawn_run(&ctx, false));
                app.is_loading = true;
            }
        }

        if app.should_quit {
            break Ok(());
        }
    };

    ratatui::restore();

    // Flush buffered log output now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn apply_run_result(
    app: &mut App,
    joined: Result<Result<Result<RunOutput, RunError>, Elapsed>, tokio::task::JoinError>,
) {
    match joined {
        Ok(Ok(Ok(output))) => app.update_output(output),
        Ok(Ok(Err(RunError::Fetch(e)))) if e.is_auth() => {
            app.show_flash(format!(
                "Token rejected ({}). Check {}.",
                e,
                crate::credentials::ENV_TOKEN_VAR
            ));
        }
        Ok(Ok(Err(e))) => app.show_flash(format!("Refresh failed: {}", e)),
        Ok(Err(_elapsed)) => app.show_flash(format!(
            "Refresh timed out ({}s). Will retry on next refresh.",
            RUN_TIMEOUT.as_secs()
        )),
        Err(e) => app.show_flash(format!("Refresh failed: task panicked: {}", e)),
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

            KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => app.next_view(),
            KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => app.previous_view(),
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                app.set_view(app::View::ALL[idx]);
            }

            KeyCode::Char('r') => {
                app.needs_refresh = true;
                app.force_refresh = true;
                app.show_flash("Refreshing...".to_string());
            }

            KeyCode::Char('?') => app.show_help(),

            _ => {}
        },
        app::InputMode::Help => app.dismiss_help(),
    }
}
