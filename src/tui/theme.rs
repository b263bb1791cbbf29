//! Dashboard color palettes and theme resolution

use ratatui::prelude::*;
use tracing::debug;

use crate::config::ThemeSetting;
use crate::scoring::Tier;

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tier colors for grid cells
    pub tier_exact: Color,
    pub tier_close: Color,
    pub tier_near: Color,
    pub tier_half: Color,
    pub tier_miss: Color,
    pub unmatched: Color,

    // Leaderboard bar
    pub bar_filled: Color,
    pub bar_empty: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub header_style: Style,
    pub row_selected: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,
    pub positive: Color,
    pub negative: Color,

    // Tab colors
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,

    // Trend chart lines, cycled per participant
    pub series: Vec<Color>,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            tier_exact: Color::LightGreen,
            tier_close: Color::Green,
            tier_near: Color::Yellow,
            tier_half: Color::White,
            tier_miss: Color::DarkGray,
            unmatched: Color::Red,
            bar_filled: Color::Cyan,
            bar_empty: Color::DarkGray,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            positive: Color::Green,
            negative: Color::Red,
            tab_active_style: Style::new().fg(Color::Cyan).bold(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
            series: vec![
                Color::Cyan,
                Color::Yellow,
                Color::Magenta,
                Color::Green,
                Color::LightRed,
                Color::LightBlue,
                Color::White,
            ],
        }
    }

    pub fn light() -> Self {
        Self {
            tier_exact: Color::Green,
            tier_close: Color::Indexed(28),
            tier_near: Color::Indexed(130),
            tier_half: Color::Black,
            tier_miss: Color::Gray,
            unmatched: Color::Red,
            bar_filled: Color::Blue,
            bar_empty: Color::Indexed(252),
            row_alt_bg: Color::Indexed(255),
            index_color: Color::Gray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::DarkGray,
            title_color: Color::Blue,
            positive: Color::Indexed(28),
            negative: Color::Red,
            tab_active_style: Style::new().fg(Color::Blue).bold(),
            tab_inactive_style: Style::new().fg(Color::Gray),
            status_bar_bg: Color::Indexed(254),
            status_key_color: Color::Blue,
            flash_success: Color::Indexed(28),
            flash_error: Color::Red,
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            popup_bg: Color::Indexed(255),
            series: vec![
                Color::Blue,
                Color::Indexed(130),
                Color::Magenta,
                Color::Indexed(28),
                Color::Red,
                Color::Indexed(24),
                Color::Black,
            ],
        }
    }

    /// Color for a grid cell. `None` means the team matched nothing.
    pub fn tier_color(&self, tier: Option<Tier>) -> Color {
        match tier {
            Some(Tier::Exact) => self.tier_exact,
            Some(Tier::Close) => self.tier_close,
            Some(Tier::Near) => self.tier_near,
            Some(Tier::CorrectHalf) => self.tier_half,
            Some(Tier::Miss) => self.tier_miss,
            None => self.unmatched,
        }
    }

    pub fn series_color(&self, idx: usize) -> Color {
        if self.series.is_empty() {
            self.title_color
        } else {
            self.series[idx % self.series.len()]
        }
    }
}

/// Pick the palette. `auto` asks the terminal for its background luma and
/// falls back to dark when the terminal doesn't answer.
pub fn resolve_theme(setting: &ThemeSetting) -> ThemeColors {
    match setting {
        ThemeSetting::Dark => ThemeColors::dark(),
        ThemeSetting::Light => ThemeColors::light(),
        ThemeSetting::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            Ok(_) => ThemeColors::dark(),
            Err(e) => {
                debug!("terminal background detection failed: {}", e);
                ThemeColors::dark()
            }
        },
    }
}
