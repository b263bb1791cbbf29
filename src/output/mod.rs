pub mod formatter;

pub use formatter::{
    format_cell, format_change, format_grid, format_history, format_leaderboard,
    format_standings, format_tsv, should_use_colors, truncate_name, NO_HISTORY,
};
