use chrono::Utc;
use chrono_tz::Tz;
use parking_lot::Mutex;

use crate::storage::{KeyValueStore, KeyValueStoreExt, StoreError};

use super::{
    entry::{summarize, HistoryEntry, HistorySource},
    stats::AggregateStats,
};

pub const EMAILS_PROCESSED_KEY: &str = "emailsProcessed";
pub const TOTAL_TIME_KEY: &str = "totalProcessingTime";
pub const HISTORY_KEY: &str = "emailHistory";

pub const DEFAULT_HISTORY_LIMIT: usize = 10;
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Bounded, most-recent-first classification history plus the two running
/// counters. Persistence is best-effort: store failures are logged and
/// never reach the caller.
pub struct HistoryStore<S> {
    store: S,
    limit: usize,
    timezone: Tz,
    stats: Mutex<AggregateStats>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S, limit: usize, timezone: Tz) -> Self {
        let stats = AggregateStats {
            emails_processed: store.get_or(EMAILS_PROCESSED_KEY, 0),
            total_processing_time_ms: store.get_or(TOTAL_TIME_KEY, 0),
        };
        Self {
            store,
            limit,
            timezone,
            stats: Mutex::new(stats),
        }
    }

    pub fn append(&self, source: HistorySource<'_>) -> HistoryEntry {
        match self.try_append(source) {
            Ok(entry) => entry,
            Err((entry, err)) => {
                tracing::warn!(
                    target: "history",
                    id = entry.id,
                    error = %err,
                    "failed to persist history entry"
                );
                entry
            }
        }
    }

    fn try_append(
        &self,
        source: HistorySource<'_>,
    ) -> Result<HistoryEntry, (HistoryEntry, StoreError)> {
        let mut history = self.list();
        let now = Utc::now();
        let millis = now.timestamp_millis();
        let id = history
            .first()
            .map_or(millis, |newest| millis.max(newest.id + 1));

        let entry = HistoryEntry {
            id,
            timestamp: now
                .with_timezone(&self.timezone)
                .format(TIMESTAMP_FORMAT)
                .to_string(),
            text_summary: summarize(source.text),
            category: source.category.map(str::to_string),
            priority: source.priority.map(str::to_string),
            processing_time_ms: source.processing_time_ms,
        };

        history.insert(0, entry.clone());
        history.truncate(self.limit);

        match self.store.set_json(HISTORY_KEY, &history) {
            Ok(()) => {
                tracing::debug!(target: "history", id, len = history.len(), "history entry stored");
                Ok(entry)
            }
            Err(err) => Err((entry, err)),
        }
    }

    pub fn list(&self) -> Vec<HistoryEntry> {
        self.store.get_or(HISTORY_KEY, Vec::new())
    }

    pub fn clear(&self) {
        if let Err(err) = self.store.remove(HISTORY_KEY) {
            tracing::warn!(target: "history", error = %err, "failed to clear history");
        }
    }

    pub fn record_stats(&self, processing_time_ms: u64) {
        let snapshot = {
            let mut stats = self.stats.lock();
            stats.record(processing_time_ms);
            *stats
        };
        if let Err(err) = self.persist_stats(snapshot) {
            tracing::warn!(target: "history", error = %err, "failed to persist processing stats");
        }
    }

    fn persist_stats(&self, stats: AggregateStats) -> Result<(), StoreError> {
        self.store
            .set_json(EMAILS_PROCESSED_KEY, &stats.emails_processed)?;
        self.store
            .set_json(TOTAL_TIME_KEY, &stats.total_processing_time_ms)
    }

    pub fn stats(&self) -> AggregateStats {
        *self.stats.lock()
    }

    pub fn average_seconds(&self) -> f64 {
        self.stats().average_seconds()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStore;

    struct RejectingStore;

    impl KeyValueStore for RejectingStore {
        fn get_raw(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }

        fn set_raw(&self, key: &str, _value: String) -> Result<(), StoreError> {
            Err(StoreError::QuotaExceeded {
                key: key.to_string(),
                size: 1,
                limit: 0,
            })
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("read-only")))
        }
    }

    fn history<S: KeyValueStore>(store: S) -> HistoryStore<S> {
        HistoryStore::new(store, DEFAULT_HISTORY_LIMIT, chrono_tz::America::Sao_Paulo)
    }

    fn source(text: &str) -> HistorySource<'_> {
        HistorySource {
            text,
            category: Some("Produtivo"),
            priority: Some("Alta"),
            processing_time_ms: 100,
        }
    }

    #[test]
    fn keeps_only_the_newest_entries() {
        let store = history(MemoryStore::new());
        for i in 0..11 {
            store.append(source(&format!("email {i}")));
        }

        let list = store.list();
        assert_eq!(list.len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(list[0].text_summary, "email 10");
        assert_eq!(list[9].text_summary, "email 1");
        assert!(list.iter().all(|entry| entry.text_summary != "email 0"));
    }

    #[test]
    fn ids_increase_even_within_one_millisecond() {
        let store = history(MemoryStore::new());
        let first = store.append(source("first"));
        let second = store.append(source("second"));
        let third = store.append(source("third"));
        assert!(first.id < second.id);
        assert!(second.id < third.id);
    }

    #[test]
    fn entries_copy_result_fields_and_truncate_text() {
        let store = history(MemoryStore::new());
        let long = "x".repeat(80);
        let entry = store.append(HistorySource {
            text: &long,
            category: Some("Improdutivo"),
            priority: None,
            processing_time_ms: 42,
        });

        assert_eq!(entry.text_summary, format!("{}...", "x".repeat(50)));
        assert_eq!(entry.category.as_deref(), Some("Improdutivo"));
        assert_eq!(entry.priority, None);
        assert_eq!(entry.processing_time_ms, 42);
        assert_eq!(store.list(), vec![entry]);
    }

    #[test]
    fn clear_empties_the_list() {
        let store = history(MemoryStore::new());
        store.append(source("to be cleared"));
        store.clear();
        assert!(store.list().is_empty());
        // Clearing an empty history is fine too.
        store.clear();
        assert!(store.list().is_empty());
    }

    #[test]
    fn stats_survive_a_new_session() {
        let backing = Arc::new(MemoryStore::new());
        let store = history(backing.clone());
        assert_eq!(store.average_seconds(), 0.0);
        store.record_stats(1000);
        store.record_stats(2000);
        assert_eq!(store.average_seconds(), 1.5);

        let reopened = history(backing);
        assert_eq!(
            reopened.stats(),
            AggregateStats {
                emails_processed: 2,
                total_processing_time_ms: 3000,
            }
        );
    }

    #[test]
    fn corrupt_history_reads_as_empty() {
        let backing = MemoryStore::new();
        backing.set_raw(HISTORY_KEY, "{oops".to_string()).unwrap();
        let store = history(backing);
        assert!(store.list().is_empty());

        store.append(source("recovers after corruption"));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn store_failures_are_swallowed() {
        let store = history(RejectingStore);
        let entry = store.append(source("not persisted"));
        assert_eq!(entry.text_summary, "not persisted");
        assert!(store.list().is_empty());

        store.clear();
        store.record_stats(500);
        assert_eq!(store.stats().emails_processed, 1);
    }
}
