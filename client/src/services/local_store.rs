//! Local rolling-window history
//!
//! One JSON array per calculator type under the key `"{type}Calculations"`,
//! oldest entry first, never longer than the configured cap. Storage I/O is
//! synchronous; callers on the async runtime hold no locks across awaits.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{CalculationRecord, CalculatorType, HistoryEntry, HistoryId, SyncStatus};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Key-value string storage backing the local history
pub trait LocalStore: Send + Sync {
    fn read(&self, key: &str) -> AppResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> AppResult<()>;
}

/// One file per key in a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl LocalStore for FileStore {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::LocalStorage(format!("Failed to read {}: {}", key, e))),
        }
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| AppError::LocalStorage(format!("Failed to create {}: {}", self.dir.display(), e)))?;

        // Write then rename so a crash never leaves a truncated array.
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        std::fs::write(&tmp, value)
            .map_err(|e| AppError::LocalStorage(format!("Failed to write {}: {}", key, e)))?;
        std::fs::rename(&tmp, self.path(key))
            .map_err(|e| AppError::LocalStorage(format!("Failed to replace {}: {}", key, e)))
    }
}

/// In-memory store with an optional size quota
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes whose serialized value exceeds `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            quota: Some(bytes),
        }
    }
}

impl LocalStore for MemoryStore {
    fn read(&self, key: &str) -> AppResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| AppError::LocalStorage("Store lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> AppResult<()> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(AppError::LocalStorage(format!(
                    "Quota exceeded writing {} ({} > {} bytes)",
                    key,
                    value.len(),
                    quota
                )));
            }
        }
        let mut values = self
            .values
            .lock()
            .map_err(|_| AppError::LocalStorage("Store lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A calculation kept on this device
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(flatten)]
    pub record: CalculationRecord,
    pub timestamp: DateTime<Utc>,
    /// Id issued by the remote when the dual write reached it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,
}

impl LocalRecord {
    pub fn new(record: CalculationRecord, remote_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
            timestamp: Utc::now(),
            remote_id,
        }
    }

    /// Stamp with the time the remote recorded instead of the local clock
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether `id` names exactly this record
    pub fn matches(&self, id: &HistoryId) -> bool {
        match id {
            HistoryId::Local(local_id) => self.id == *local_id,
            HistoryId::Remote(remote_id) => self.remote_id.as_deref() == Some(remote_id.as_str()),
        }
    }

    /// View as a history entry; records the remote knows about keep its id
    pub fn to_entry(&self) -> HistoryEntry {
        let (id, sync) = match &self.remote_id {
            Some(remote_id) => (HistoryId::Remote(remote_id.clone()), SyncStatus::Synced),
            None => (HistoryId::Local(self.id), SyncStatus::Unsynced),
        };
        HistoryEntry {
            id,
            record: self.record.clone(),
            created_at: self.timestamp,
            sync,
        }
    }
}

/// Result of appending to the rolling window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appended {
    pub id: Uuid,
    pub evicted: usize,
}

/// Capped FIFO history per calculator type
#[derive(Clone)]
pub struct LocalHistory {
    store: Arc<dyn LocalStore>,
    cap: usize,
    write_lock: Arc<Mutex<()>>,
}

impl LocalHistory {
    pub fn new(store: Arc<dyn LocalStore>, cap: usize) -> Self {
        Self {
            store,
            cap: cap.max(1),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Stored records, oldest first; unreadable entries are skipped
    pub fn load(&self, calculator_type: CalculatorType) -> AppResult<Vec<LocalRecord>> {
        let key = calculator_type.storage_key();
        let Some(raw) = self.store.read(&key)? else {
            return Ok(Vec::new());
        };

        let rows: Vec<Value> = serde_json::from_str(&raw)?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value::<LocalRecord>(row) {
                Ok(record) if record.record.calculator_type() == calculator_type => records.push(record),
                Ok(_) => tracing::warn!(key = %key, "Dropping record stored under the wrong calculator"),
                Err(e) => tracing::warn!(key = %key, error = %e, "Dropping unreadable local record"),
            }
        }
        Ok(records)
    }

    /// Append, evicting the oldest entries beyond the cap
    pub fn append(&self, record: LocalRecord) -> AppResult<Appended> {
        let calculator_type = record.record.calculator_type();
        let _guard = self.lock()?;

        let mut records = self.load(calculator_type)?;
        let id = record.id;
        records.push(record);
        let evicted = records.len().saturating_sub(self.cap);
        records.drain(..evicted);

        self.persist(calculator_type, &records)?;
        if evicted > 0 {
            tracing::debug!(calculator_type = %calculator_type, evicted, "Evicted oldest local records");
        }
        Ok(Appended { id, evicted })
    }

    /// Remove the single record at the index `select` picks, if any
    ///
    /// `select` sees the stored records oldest first.
    pub fn remove_one<F>(
        &self,
        calculator_type: CalculatorType,
        select: F,
    ) -> AppResult<Option<LocalRecord>>
    where
        F: FnOnce(&[LocalRecord]) -> Option<usize>,
    {
        let _guard = self.lock()?;

        let mut records = self.load(calculator_type)?;
        let Some(index) = select(&records).filter(|i| *i < records.len()) else {
            return Ok(None);
        };
        let removed = records.remove(index);
        self.persist(calculator_type, &records)?;
        Ok(Some(removed))
    }

    fn persist(&self, calculator_type: CalculatorType, records: &[LocalRecord]) -> AppResult<()> {
        let json = serde_json::to_string(records)?;
        self.store.write(&calculator_type.storage_key(), &json)
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| AppError::LocalStorage("History lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use shared::calculators::calculate_record;
    use shared::models::{CalculationInput, ProfitInput};
    use shared::reference::ReferenceTables;
    use shared::{Area, Crop};

    fn profit_record(area: i64) -> CalculationRecord {
        calculate_record(
            CalculationInput::Profit(ProfitInput {
                crop: Crop::Wheat.into(),
                area: Area::acres(Decimal::from(area)),
                market_price: Decimal::from(2200),
                input_cost: Decimal::from(50000),
                yield_override: None,
            }),
            &ReferenceTables::default(),
        )
    }

    fn history(cap: usize) -> LocalHistory {
        LocalHistory::new(Arc::new(MemoryStore::new()), cap)
    }

    #[test]
    fn test_append_evicts_oldest_first() {
        let history = history(10);
        for area in 1..=12 {
            history.append(LocalRecord::new(profit_record(area), None)).unwrap();
        }

        let records = history.load(CalculatorType::Profit).unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].record, profit_record(3));
        assert_eq!(records[9].record, profit_record(12));
    }

    #[test]
    fn test_storage_key_and_shape() {
        let store = Arc::new(MemoryStore::new());
        let history = LocalHistory::new(store.clone(), 10);
        history
            .append(LocalRecord::new(profit_record(5), Some("41".to_string())))
            .unwrap();

        let raw = store.read("profitCalculations").unwrap().unwrap();
        let rows: Vec<Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["calculator_type"], "profit");
        assert!(rows[0]["input_data"].is_object());
        assert!(rows[0]["result_data"].is_object());
        assert!(rows[0]["timestamp"].is_string());
        assert_eq!(rows[0]["remote_id"], "41");
    }

    #[test]
    fn test_unreadable_rows_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        let history = LocalHistory::new(store.clone(), 10);
        history.append(LocalRecord::new(profit_record(5), None)).unwrap();

        let raw = store.read("profitCalculations").unwrap().unwrap();
        let mut rows: Vec<Value> = serde_json::from_str(&raw).unwrap();
        rows.push(serde_json::json!({"calculator_type": "profit", "input_data": 3}));
        store.write("profitCalculations", &serde_json::to_string(&rows).unwrap()).unwrap();

        assert_eq!(history.load(CalculatorType::Profit).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_one_takes_a_single_record() {
        let history = history(10);
        let kept = history.append(LocalRecord::new(profit_record(1), None)).unwrap();
        let gone = history.append(LocalRecord::new(profit_record(1), None)).unwrap();

        let removed = history
            .remove_one(CalculatorType::Profit, |records| {
                records.iter().position(|r| r.matches(&HistoryId::Local(gone.id)))
            })
            .unwrap();
        assert_eq!(removed.map(|r| r.id), Some(gone.id));

        let records = history.load(CalculatorType::Profit).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, kept.id);

        let missing = history.remove_one(CalculatorType::Profit, |_| None).unwrap();
        assert!(missing.is_none());
        assert_eq!(history.load(CalculatorType::Profit).unwrap().len(), 1);
    }

    #[test]
    fn test_matches_by_local_or_remote_id() {
        let local = LocalRecord::new(profit_record(1), None);
        assert!(local.matches(&HistoryId::Local(local.id)));
        assert!(!local.matches(&HistoryId::Local(Uuid::new_v4())));
        assert!(!local.matches(&HistoryId::Remote("1".to_string())));

        let synced = LocalRecord::new(profit_record(1), Some("7".to_string()));
        assert!(synced.matches(&HistoryId::Remote("7".to_string())));
        assert!(!synced.matches(&HistoryId::Remote("8".to_string())));
    }

    #[test]
    fn test_quota_failure_is_local_storage_error() {
        let history = LocalHistory::new(Arc::new(MemoryStore::with_quota(16)), 10);
        let err = history
            .append(LocalRecord::new(profit_record(1), None))
            .unwrap_err();
        assert_eq!(err.code(), "LOCAL_STORAGE_ERROR");
        assert!(history.load(CalculatorType::Profit).unwrap().is_empty());
    }

    #[test]
    fn test_to_entry_flags_sync_state() {
        let local = LocalRecord::new(profit_record(1), None);
        assert_eq!(local.to_entry().sync, SyncStatus::Unsynced);
        assert_eq!(local.to_entry().id, HistoryId::Local(local.id));

        let synced = LocalRecord::new(profit_record(1), Some("9".to_string()));
        assert_eq!(synced.to_entry().sync, SyncStatus::Synced);
        assert_eq!(synced.to_entry().id, HistoryId::Remote("9".to_string()));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn prop_window_never_exceeds_cap(saves in 1usize..25, cap in 1usize..12) {
            let history = history(cap);
            let mut evicted_total = 0;
            for area in 0..saves {
                let appended = history
                    .append(LocalRecord::new(profit_record(area as i64 + 1), None))
                    .unwrap();
                evicted_total += appended.evicted;
            }
            let records = history.load(CalculatorType::Profit).unwrap();
            prop_assert_eq!(records.len(), saves.min(cap));
            prop_assert_eq!(evicted_total, saves.saturating_sub(cap));
            prop_assert_eq!(&records[records.len() - 1].record, &profit_record(saves as i64));
        }
    }
}
