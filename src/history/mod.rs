mod entry;
mod stats;
mod store;

pub use entry::{HistoryEntry, HistorySource};
pub use stats::AggregateStats;
pub use store::{HistoryStore, DEFAULT_HISTORY_LIMIT};
