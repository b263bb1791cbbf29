use std::future::Future;

use super::types::Standings;
use crate::error::FetchError;

/// Source of the live league table.
///
/// Implementations fetch fresh on every call; nothing is cached between runs.
pub trait StandingsProvider {
    fn fetch(
        &self,
        league_id: &str,
        credential: &str,
    ) -> impl Future<Output = Result<Standings, FetchError>> + Send;
}
