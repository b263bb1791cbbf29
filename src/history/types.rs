use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Snapshot keys have one-second resolution. Two runs inside the same second
/// share a key and the later one replaces the earlier.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const HISTORY_VERSION: u32 = 1;

/// Participant -> total points
pub type Totals = BTreeMap<String, u32>;

/// On-disk history document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryFile {
    pub version: u32,
    #[serde(default)]
    pub snapshots: HashMap<String, Totals>,
}

impl Default for HistoryFile {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryFile {
    pub fn new() -> Self {
        Self {
            version: HISTORY_VERSION,
            snapshots: HashMap::new(),
        }
    }

    /// Record totals under `timestamp`.
    /// Returns true if an existing snapshot with the same key was replaced.
    pub fn insert(&mut self, timestamp: &str, totals: Totals) -> bool {
        self.snapshots.insert(timestamp.to_string(), totals).is_some()
    }

    /// All snapshots, in no particular order
    pub fn snapshots(&self) -> Vec<HistorySnapshot> {
        self.snapshots
            .iter()
            .map(|(timestamp, totals)| HistorySnapshot {
                timestamp: timestamp.clone(),
                totals: totals.clone(),
            })
            .collect()
    }
}

/// Totals for every participant at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySnapshot {
    pub timestamp: String,
    pub totals: Totals,
}

impl HistorySnapshot {
    /// Parse the key back into a time, None if it isn't in TIMESTAMP_FORMAT
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }
}

pub fn timestamp_at(time: DateTime<Utc>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

pub fn timestamp_now() -> String {
    timestamp_at(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn totals(pairs: &[(&str, u32)]) -> Totals {
        pairs.iter().map(|(n, t)| (n.to_string(), *t)).collect()
    }

    #[test]
    fn test_new_file_is_empty() {
        let file = HistoryFile::new();
        assert_eq!(file.version, 1);
        assert!(file.snapshots().is_empty());
    }

    #[test]
    fn test_same_second_overwrites() {
        let mut file = HistoryFile::new();
        assert!(!file.insert("2026-10-14 09:00:00", totals(&[("Alice", 10)])));
        assert!(file.insert("2026-10-14 09:00:00", totals(&[("Alice", 12)])));

        let snapshots = file.snapshots();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].totals["Alice"], 12);
    }

    #[test]
    fn test_timestamp_has_second_resolution() {
        let time = Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 5).unwrap()
            + chrono::Duration::milliseconds(750);
        assert_eq!(timestamp_at(time), "2026-10-14 09:30:05");
    }

    #[test]
    fn test_recorded_at_roundtrip() {
        let snapshot = HistorySnapshot {
            timestamp: "2026-10-14 09:30:05".to_string(),
            totals: Totals::new(),
        };
        let parsed = snapshot.recorded_at().unwrap();
        assert_eq!(parsed.format(TIMESTAMP_FORMAT).to_string(), snapshot.timestamp);

        let bogus = HistorySnapshot {
            timestamp: "yesterday".to_string(),
            totals: Totals::new(),
        };
        assert!(bogus.recorded_at().is_none());
    }
}
