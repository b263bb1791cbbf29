use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::{
    Axis, Block, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Tabs,
};
use std::time::Duration;

use crate::history::trend;
use crate::output::{format_cell, format_change, truncate_name, NO_HISTORY};
use crate::run::{HistoryView, RunOutput};
use crate::tui::app::{App, InputMode, View};
use crate::tui::theme::ThemeColors;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 6 || area.width < 30 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Tabs(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    render_body(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    if app.input_mode == InputMode::Help {
        render_help_popup(frame, &app.theme);
    }

    // Loading overlay sits on top of everything
    if app.is_loading {
        render_loading_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let name = "Table Tipper";
    let mut spans = vec![Span::styled(
        name,
        Style::default().fg(app.theme.title_color).bold(),
    )];

    if let Some(output) = &app.output {
        let right = format!(
            "{}  fetched {} UTC",
            app.league,
            output.fetched_at.format("%H:%M:%S")
        );
        let padding_len =
            (area.width as usize).saturating_sub(name.len() + right.chars().count());
        spans.push(Span::raw(" ".repeat(padding_len)));
        spans.push(Span::styled(right, Style::default().fg(app.theme.muted)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<&str> = View::ALL.iter().map(|v| v.title()).collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style.reversed())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_body(frame: &mut Frame, area: Rect, app: &mut App) {
    let Some(output) = &app.output else {
        let msg = Paragraph::new("Waiting for standings...").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    };

    match app.current_view {
        View::Leaderboard => {
            let table = leaderboard_table(output, &app.changes, &app.theme);
            frame.render_stateful_widget(table, area, &mut app.table_state);
        }
        View::Grid => {
            let table = grid_table(output, area.width, &app.theme);
            frame.render_stateful_widget(table, area, &mut app.table_state);
        }
        View::Standings => {
            let table = standings_table(output, &app.theme);
            frame.render_stateful_widget(table, area, &mut app.table_state);
        }
        View::Trend => render_trend(frame, area, &output.history, &app.theme),
    }
}

fn alt_row_style(idx: usize, theme: &ThemeColors) -> Style {
    if idx % 2 == 1 {
        Style::default().bg(theme.row_alt_bg)
    } else {
        Style::default()
    }
}

fn score_bar(total: u32, max_total: u32, width: usize, theme: &ThemeColors) -> Line<'static> {
    let ratio = if max_total > 0 {
        (f64::from(total) / f64::from(max_total)).min(1.0)
    } else {
        0.0
    };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled(
            "█".repeat(filled),
            Style::default().fg(theme.bar_filled),
        ));
    }
    if empty > 0 {
        spans.push(Span::styled(
            "░".repeat(empty),
            Style::default().fg(theme.bar_empty),
        ));
    }
    Line::from(spans)
}

fn leaderboard_table<'a>(
    output: &'a RunOutput,
    changes: &std::collections::BTreeMap<String, i64>,
    theme: &ThemeColors,
) -> Table<'a> {
    let entries = output.scoreboard.leaderboard();
    let max_total = entries.first().map(|e| e.total).unwrap_or(0);

    let rows: Vec<Row> = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let change = changes.get(&entry.participant).copied();
            let change_cell = match change {
                Some(c) if c > 0 => {
                    Cell::from(format_change(c)).style(Style::default().fg(theme.positive))
                }
                Some(c) if c < 0 => {
                    Cell::from(format_change(c)).style(Style::default().fg(theme.negative))
                }
                Some(c) => Cell::from(format_change(c)).style(Style::default().fg(theme.muted)),
                None => Cell::from(""),
            };
            let mut score_spans = vec![Span::styled(
                format!("{:>4} ", entry.total),
                Style::default().bold(),
            )];
            score_spans.extend(score_bar(entry.total, max_total, 10, theme).spans);

            Row::new(vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.index_color)),
                Cell::from(Line::from(score_spans)),
                change_cell,
                Cell::from(entry.icon.clone().unwrap_or_default()),
                Cell::from(entry.participant.as_str()),
            ])
            .style(alt_row_style(idx, theme))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Length(16),
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Fill(1),
    ];

    Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Points", "+/-", "", "Participant"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected)
}

fn grid_table<'a>(output: &'a RunOutput, width: u16, theme: &ThemeColors) -> Table<'a> {
    let board = &output.scoreboard;
    let participants = board.participants();
    let column_width = if participants.is_empty() {
        0
    } else {
        (width as usize).saturating_sub(5) / participants.len()
    };
    let cell_width = column_width.saturating_sub(1).max(4);

    let rows: Vec<Row> = board
        .ranks()
        .into_iter()
        .enumerate()
        .map(|(idx, rank)| {
            let mut cells = vec![
                Cell::from(rank.to_string()).style(Style::default().fg(theme.index_color))
            ];
            cells.extend(participants.iter().map(|p| match board.cell_at(p, rank) {
                Some(cell) => Cell::from(truncate_name(&format_cell(cell), cell_width))
                    .style(Style::default().fg(theme.tier_color(cell.tier))),
                None => Cell::from(""),
            }));
            Row::new(cells).style(alt_row_style(idx, theme))
        })
        .collect();

    let mut widths = vec![Constraint::Length(4)];
    widths.extend(participants.iter().map(|_| Constraint::Fill(1)));

    let mut header = vec![Cell::from("Pos")];
    header.extend(participants.iter().map(|p| {
        let total = board.total_for(p).unwrap_or(0);
        Cell::from(truncate_name(&format!("{} ({})", p, total), cell_width))
    }));

    Table::new(rows, widths)
        .header(Row::new(header).style(theme.header_style).bottom_margin(1))
        .row_highlight_style(theme.row_selected)
}

fn standings_table<'a>(output: &'a RunOutput, theme: &ThemeColors) -> Table<'a> {
    let rows: Vec<Row> = output
        .standings
        .teams()
        .iter()
        .enumerate()
        .map(|(idx, team)| {
            Row::new(vec![
                Cell::from(format!("{}", idx + 1)).style(Style::default().fg(theme.index_color)),
                Cell::from(team.name.as_str()),
                Cell::from(team.played.to_string()),
                Cell::from(team.won.to_string()),
                Cell::from(team.draw.to_string()),
                Cell::from(team.lost.to_string()),
                Cell::from(team.goals_for.to_string()),
                Cell::from(team.goals_against.to_string()),
                Cell::from(format!("{:+}", team.goal_difference)),
                Cell::from(team.points.to_string()).style(Style::default().bold()),
            ])
            .style(alt_row_style(idx, theme))
        })
        .collect();

    let mut widths = vec![Constraint::Length(4), Constraint::Fill(1)];
    widths.extend([Constraint::Length(4); 8]);

    Table::new(rows, widths)
        .header(
            Row::new(vec!["Pos", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected)
}

fn render_trend(frame: &mut Frame, area: Rect, history: &HistoryView, theme: &ThemeColors) {
    let snapshots = history.snapshots();
    if snapshots.is_empty() {
        let text = match history {
            HistoryView::Unavailable(reason) => format!("{} ({})", NO_HISTORY, reason),
            _ => NO_HISTORY.to_string(),
        };
        let msg = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.muted));
        frame.render_widget(msg, area);
        return;
    }

    let series = trend::series(snapshots);
    let points: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| {
            s.points
                .iter()
                .map(|(idx, total)| (*idx as f64, f64::from(*total)))
                .collect()
        })
        .collect();

    let datasets: Vec<Dataset> = series
        .iter()
        .zip(&points)
        .enumerate()
        .map(|(idx, (s, data))| {
            Dataset::default()
                .name(s.participant.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme.series_color(idx)))
                .data(data)
        })
        .collect();

    let last_idx = snapshots.len().saturating_sub(1);
    let x_max = (last_idx as f64).max(1.0);
    let y_max = f64::from(trend::max_total(snapshots)).max(1.0);

    let first_label = short_timestamp(&snapshots[0].timestamp);
    let last_label = short_timestamp(&snapshots[last_idx].timestamp);

    let chart = Chart::new(datasets)
        .block(Block::default())
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme.muted))
                .bounds([0.0, x_max])
                .labels(vec![first_label, last_label]),
        )
        .y_axis(
            Axis::default()
                .title("Points")
                .style(Style::default().fg(theme.muted))
                .bounds([0.0, y_max])
                .labels(vec![
                    "0".to_string(),
                    format!("{:.0}", y_max / 2.0),
                    format!("{:.0}", y_max),
                ]),
        );

    frame.render_widget(chart, area);
}

/// "YYYY-MM-DD HH:MM:SS" shortened to "MM-DD HH:MM" for axis labels
fn short_timestamp(timestamp: &str) -> String {
    timestamp
        .get(5..16)
        .map(str::to_string)
        .unwrap_or_else(|| timestamp.to_string())
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Refresh failed")
            || msg.starts_with("Token rejected")
            || msg.contains("timed out")
        {
            theme.flash_error
        } else if msg.starts_with("Refreshed") {
            theme.flash_success
        } else {
            theme.muted
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let count = app
            .output
            .as_ref()
            .map(|o| format!("{} participants", o.scoreboard.participants().len()))
            .unwrap_or_default();

        let elapsed = Duration::from_secs(app.last_refresh.elapsed().as_secs());
        let refresh_time = format!("refreshed {} ago", humantime::format_duration(elapsed));

        let hints = [
            ("j/k", ":nav "),
            ("Tab", ":view "),
            ("r", ":refresh "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = vec![
            Span::styled(count, Style::default().fg(theme.muted)),
            Span::raw(" "),
            Span::styled(refresh_time, Style::default().fg(theme.muted)),
            Span::raw("  "),
        ];
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_help_popup(frame: &mut Frame, theme: &ThemeColors) {
    let popup_area = centered_rect_fixed(50, 13, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border))
        .style(Style::default().bg(theme.popup_bg));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(theme.status_key_color).bold();
    let entries = [
        ("j / Down      ", "Move down"),
        ("k / Up        ", "Move up"),
        ("Tab / l       ", "Next view"),
        ("S-Tab / h     ", "Previous view"),
        ("1-4           ", "Jump to view"),
        ("r             ", "Refresh standings"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, action)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*action)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(30, 3, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered().border_style(Style::default().fg(app.theme.popup_border));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    // Braille spinner animation
    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let spinner = spinner_chars[app.spinner_frame % spinner_chars.len()];

    let text = if app.output.is_none() {
        format!("{} Loading standings...", spinner)
    } else {
        format!("{} Refreshing...", spinner)
    };

    let loading_text = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.title_color));
    frame.render_widget(loading_text, inner);
}
