pub mod football_data;
pub mod provider;
pub mod types;

pub use football_data::FootballDataProvider;
pub use provider::StandingsProvider;
pub use types::{Standings, TeamStanding};
