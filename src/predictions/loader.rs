use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use super::{Prediction, PredictionSet};
use crate::error::PredictionError;

pub const DEFAULT_RANK_COLUMN: &str = "Position";

/// Load a predictions CSV from disk
pub fn load_predictions(path: &Path, rank_column: &str) -> Result<PredictionSet, PredictionError> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| PredictionError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let set = from_csv_reader(reader, rank_column)?;
    debug!(
        participants = set.len(),
        path = %path.display(),
        "loaded predictions"
    );
    Ok(set)
}

/// Read predictions from any CSV source.
///
/// The `rank_column` header names the predicted-rank column; every other
/// non-empty header is a participant whose column holds their team guesses.
pub fn read_predictions<R: Read>(rdr: R, rank_column: &str) -> Result<PredictionSet, PredictionError> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);
    from_csv_reader(reader, rank_column)
}

fn from_csv_reader<R: Read>(
    mut reader: csv::Reader<R>,
    rank_column: &str,
) -> Result<PredictionSet, PredictionError> {
    let headers = reader.headers()?.clone();

    let rank_idx = headers
        .iter()
        .position(|h| h == rank_column)
        .ok_or_else(|| PredictionError::MissingRankColumn(rank_column.to_string()))?;

    // (column index, participant name)
    let columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, name)| *idx != rank_idx && !name.is_empty())
        .map(|(idx, name)| (idx, name.to_string()))
        .collect();

    let mut predictions: Vec<Prediction> = vec![Prediction::default(); columns.len()];

    for (row, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("skipping malformed predictions row {}: {}", row + 2, e);
                continue;
            }
        };

        let rank_cell = record.get(rank_idx).unwrap_or("");
        let rank = match rank_cell.parse::<u32>() {
            Ok(rank) if rank > 0 => rank,
            _ => {
                warn!(
                    "skipping predictions row {}: rank '{}' is not a positive integer",
                    row + 2,
                    rank_cell
                );
                continue;
            }
        };

        for (slot, (idx, _)) in columns.iter().enumerate() {
            let team = record.get(*idx).unwrap_or("");
            if !team.is_empty() {
                predictions[slot].push(rank, team);
            }
        }
    }

    let mut set = PredictionSet::new();
    for ((_, name), prediction) in columns.into_iter().zip(predictions) {
        if !set.insert(name.clone(), prediction) {
            warn!("duplicate participant column '{}', keeping the first", name);
        }
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_basic_csv() {
        let data = "\
Position,Alice,Bob
1,Arsenal FC,Liverpool FC
2,Liverpool FC,Arsenal FC
3,Chelsea FC,Chelsea FC";

        let set = read_predictions(data.as_bytes(), "Position").unwrap();
        assert_eq!(set.len(), 2);

        let alice = set.get("Alice").unwrap();
        assert_eq!(alice.guesses.len(), 3);
        assert_eq!(alice.team_at(1), Some("Arsenal FC"));
        assert_eq!(set.get("Bob").unwrap().team_at(2), Some("Arsenal FC"));
    }

    #[test]
    fn test_rank_column_need_not_be_first() {
        let data = "\
Alice,Position,Bob
Arsenal FC,1,Chelsea FC";
        let set = read_predictions(data.as_bytes(), "Position").unwrap();
        assert_eq!(set.get("Alice").unwrap().team_at(1), Some("Arsenal FC"));
        assert_eq!(set.get("Bob").unwrap().team_at(1), Some("Chelsea FC"));
    }

    #[test]
    fn test_missing_rank_column() {
        let data = "Rank,Alice\n1,Arsenal FC";
        let result = read_predictions(data.as_bytes(), "Position");
        assert!(matches!(result, Err(PredictionError::MissingRankColumn(_))));
    }

    #[test]
    fn test_cells_are_trimmed_and_blanks_skipped() {
        let data = "\
Position, Alice , Bob
1,  Arsenal FC ,
2,Chelsea FC,Everton FC";
        let set = read_predictions(data.as_bytes(), "Position").unwrap();
        let alice = set.get("Alice").unwrap();
        assert_eq!(alice.team_at(1), Some("Arsenal FC"));
        let bob = set.get("Bob").unwrap();
        assert_eq!(bob.guesses.len(), 1);
        assert_eq!(bob.team_at(2), Some("Everton FC"));
    }

    #[test]
    fn test_bad_rank_rows_are_skipped() {
        let data = "\
Position,Alice
1,Arsenal FC
x,Chelsea FC
0,Everton FC
3,Fulham FC";
        let set = read_predictions(data.as_bytes(), "Position").unwrap();
        let alice = set.get("Alice").unwrap();
        assert_eq!(alice.guesses.len(), 2);
        assert_eq!(alice.team_at(3), Some("Fulham FC"));
    }

    #[test]
    fn test_duplicate_ranks_are_kept() {
        let data = "\
Position,Alice
1,Arsenal FC
1,Chelsea FC";
        let set = read_predictions(data.as_bytes(), "Position").unwrap();
        assert_eq!(set.get("Alice").unwrap().guesses.len(), 2);
    }

    #[test]
    fn test_short_rows_do_not_fail() {
        let data = "\
Position,Alice,Bob
1,Arsenal FC";
        let set = read_predictions(data.as_bytes(), "Position").unwrap();
        assert!(set.get("Bob").unwrap().guesses.is_empty());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("predictions.csv");
        std::fs::write(&path, "Position,Alice\n1,Arsenal FC\n").unwrap();

        let set = load_predictions(&path, DEFAULT_RANK_COLUMN).unwrap();
        assert_eq!(set.get("Alice").unwrap().team_at(1), Some("Arsenal FC"));
    }

    #[test]
    fn test_load_missing_path_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_predictions(&dir.path().join("nope.csv"), DEFAULT_RANK_COLUMN);
        assert!(matches!(result, Err(PredictionError::Read { .. })));
    }
}
