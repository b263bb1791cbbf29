use owo_colors::OwoColorize;
use std::collections::BTreeMap;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::history::HistorySnapshot;
use crate::run::HistoryView;
use crate::scoring::{ScoreCell, Scoreboard, Tier};
use crate::standings::Standings;

pub const NO_HISTORY: &str = "No historical data";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
pub fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Signed change, "=" for no movement
pub fn format_change(change: i64) -> String {
    if change == 0 {
        "=".to_string()
    } else {
        format!("{:+}", change)
    }
}

/// Cell text: "Team (points)", with an asterisk when the team matched nothing
pub fn format_cell(cell: &ScoreCell) -> String {
    if cell.actual_rank.is_some() {
        format!("{} ({})", cell.team, cell.points)
    } else {
        format!("{} ({}*)", cell.team, cell.points)
    }
}

fn paint_cell(text: &str, tier: Option<Tier>) -> String {
    match tier {
        Some(Tier::Exact) => text.green().bold().to_string(),
        Some(Tier::Close) => text.green().to_string(),
        Some(Tier::Near) => text.yellow().to_string(),
        Some(Tier::CorrectHalf) => text.to_string(),
        Some(Tier::Miss) => text.dimmed().to_string(),
        None => text.red().to_string(),
    }
}

/// Leaderboard: index, total, optional movement since the previous snapshot,
/// icon and participant. No headers.
pub fn format_leaderboard(
    board: &Scoreboard,
    changes: &BTreeMap<String, i64>,
    use_colors: bool,
) -> String {
    if board.leaderboard().is_empty() {
        return "No predictions found.".to_string();
    }

    board
        .leaderboard()
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let index_str = format!("{:>2}.", idx + 1);
            let total_str = format!("{:>5}", entry.total);
            let icon = entry.icon.as_deref().unwrap_or(" ");
            let change = changes
                .get(&entry.participant)
                .map(|c| format!("  ({})", format_change(*c)))
                .unwrap_or_default();

            if use_colors {
                format!(
                    "{} {}  {} {}{}",
                    index_str.dimmed(),
                    total_str.bold(),
                    icon,
                    entry.participant.cyan(),
                    change.dimmed()
                )
            } else {
                format!(
                    "{} {}  {} {}{}",
                    index_str, total_str, icon, entry.participant, change
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Leaderboard as tab-separated values for scripting
/// Columns: place, total, participant (no headers, no colors)
pub fn format_tsv(board: &Scoreboard) -> String {
    board
        .leaderboard()
        .iter()
        .enumerate()
        .map(|(idx, entry)| format!("{}\t{}\t{}", idx + 1, entry.total, entry.participant))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Detail grid: one row per predicted rank, one column per participant
pub fn format_grid(board: &Scoreboard, use_colors: bool) -> String {
    let participants = board.participants();
    if participants.is_empty() {
        return "No predictions found.".to_string();
    }

    let ranks = board.ranks();
    let rank_width = 4;
    let separator = " | ";

    // Widest cell per column, capped so the grid fits the terminal
    let mut widths: Vec<usize> = participants
        .iter()
        .map(|p| {
            board
                .cells_for(p)
                .map(|c| format_cell(c).chars().count())
                .chain(std::iter::once(p.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    if let Some(term_width) = get_terminal_width() {
        let fixed = rank_width + separator.len() * participants.len();
        let per_column = term_width.saturating_sub(fixed) / participants.len();
        let cap = per_column.max(8);
        for w in &mut widths {
            *w = (*w).min(cap);
        }
    }

    let mut lines = Vec::with_capacity(ranks.len() + 3);

    let header: Vec<String> = participants
        .iter()
        .zip(&widths)
        .map(|(p, w)| pad_right(&truncate_name(p, *w), *w))
        .collect();
    let header_line = format!("{:>rank_width$}{}{}", "Pos", separator, header.join(separator));
    lines.push(if use_colors {
        header_line.bold().to_string()
    } else {
        header_line
    });

    for rank in &ranks {
        let cells: Vec<String> = participants
            .iter()
            .zip(&widths)
            .map(|(p, w)| match board.cell_at(p, *rank) {
                Some(cell) => {
                    let text = pad_right(&truncate_name(&format_cell(cell), *w), *w);
                    if use_colors {
                        paint_cell(&text, cell.tier)
                    } else {
                        text
                    }
                }
                None => " ".repeat(*w),
            })
            .collect();
        lines.push(format!("{:>rank_width$}{}{}", rank, separator, cells.join(separator)));
    }

    let totals: Vec<String> = participants
        .iter()
        .zip(&widths)
        .map(|(p, w)| pad_right(&board.total_for(p).unwrap_or(0).to_string(), *w))
        .collect();
    lines.push(format!("{:>rank_width$}{}{}", "Tot", separator, totals.join(separator)));

    let unmatched = board.unmatched_count();
    if unmatched > 0 {
        lines.push(String::new());
        lines.push(format!("* not in current standings ({})", unmatched));
    }

    lines.join("\n")
}

/// Current table: Pos, Team, P, W, D, L, GF, GA, GD, Pts
pub fn format_standings(standings: &Standings, use_colors: bool) -> String {
    if standings.is_empty() {
        return "No standings available.".to_string();
    }

    let name_width = standings
        .teams()
        .iter()
        .map(|t| t.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let header = format!(
        "{:>3}  {}  {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
        "Pos",
        pad_right("Team", name_width),
        "P",
        "W",
        "D",
        "L",
        "GF",
        "GA",
        "GD",
        "Pts"
    );

    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for (idx, team) in standings.teams().iter().enumerate() {
        let line = format!(
            "{:>3}  {}  {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>+4} {:>4}",
            idx + 1,
            pad_right(&team.name, name_width),
            team.played,
            team.won,
            team.draw,
            team.lost,
            team.goals_for,
            team.goals_against,
            team.goal_difference,
            team.points
        );
        lines.push(line);
    }

    lines.join("\n")
}

fn format_snapshot(snapshot: &HistorySnapshot) -> String {
    let mut entries: Vec<(&String, &u32)> = snapshot.totals.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let totals = entries
        .iter()
        .map(|(name, total)| format!("{} {}", name, total))
        .collect::<Vec<_>>()
        .join("  ");
    format!("{}  {}", snapshot.timestamp, totals)
}

/// Totals over time, oldest first, one line per snapshot
pub fn format_history(history: &HistoryView) -> String {
    match history {
        HistoryView::Loaded(snapshots) if !snapshots.is_empty() => snapshots
            .iter()
            .map(format_snapshot)
            .collect::<Vec<_>>()
            .join("\n"),
        HistoryView::Unavailable(reason) => format!("{} ({})", NO_HISTORY, reason),
        _ => NO_HISTORY.to_string(),
    }
}
