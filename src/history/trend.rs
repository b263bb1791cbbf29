use std::collections::BTreeMap;

use super::types::HistorySnapshot;

/// Snapshots in chronological order. Keys sort lexically in time order.
pub fn sorted(mut snapshots: Vec<HistorySnapshot>) -> Vec<HistorySnapshot> {
    snapshots.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    snapshots
}

/// One participant's totals over time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub participant: String,
    /// (index into the sorted snapshot list, points). Snapshots that don't
    /// mention the participant are skipped.
    pub points: Vec<(usize, u32)>,
}

/// Per-participant series from chronologically sorted snapshots, by name
pub fn series(snapshots: &[HistorySnapshot]) -> Vec<Series> {
    let mut by_participant: BTreeMap<&str, Vec<(usize, u32)>> = BTreeMap::new();

    for (idx, snapshot) in snapshots.iter().enumerate() {
        for (participant, total) in &snapshot.totals {
            by_participant
                .entry(participant.as_str())
                .or_default()
                .push((idx, *total));
        }
    }

    by_participant
        .into_iter()
        .map(|(participant, points)| Series {
            participant: participant.to_string(),
            points,
        })
        .collect()
}

/// Change in each participant's total between the last two snapshots.
/// Participants missing from either snapshot are left out.
pub fn latest_change(snapshots: &[HistorySnapshot]) -> BTreeMap<String, i64> {
    let [.., previous, latest] = snapshots else {
        return BTreeMap::new();
    };

    latest
        .totals
        .iter()
        .filter_map(|(participant, now)| {
            previous
                .totals
                .get(participant)
                .map(|before| (participant.clone(), i64::from(*now) - i64::from(*before)))
        })
        .collect()
}

/// Highest total seen in any snapshot, for chart bounds
pub fn max_total(snapshots: &[HistorySnapshot]) -> u32 {
    snapshots
        .iter()
        .flat_map(|s| s.totals.values().copied())
        .max()
        .unwrap_or(0)
}
