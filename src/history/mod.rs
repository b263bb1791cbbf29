pub mod storage;
pub mod trend;
pub mod types;

pub use storage::{get_history_path, HistoryStore, JsonHistoryStore};
pub use types::{timestamp_now, HistoryFile, HistorySnapshot, Totals, TIMESTAMP_FORMAT};
