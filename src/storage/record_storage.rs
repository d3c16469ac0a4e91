use std::cmp::Reverse;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::{
    backend::StorageBackend,
    entities::DayRecord,
    merge::upgrade_record,
    StoreError,
};
use crate::utils::time::RECORD_KEY_FORMAT;

/// Namespace the whole mapping is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "rhythm_app_data_v2";

type RecordMapping = Map<String, Value>;

/// The only way records are read and written. Holds no state of its own between calls, every
/// operation loads the mapping from the backend again.
///
/// Read paths never fail: broken or missing data degrades to default records. Writes report
/// their failure and leave it to the caller to decide what to do with it.
pub struct RecordStore<B: StorageBackend> {
    backend: B,
    key: String,
}

impl<B: StorageBackend> RecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    fn load_mapping(&self) -> Result<RecordMapping, StoreError> {
        let Some(data) = self.backend.get_raw(&self.key)? else {
            return Ok(RecordMapping::new());
        };
        match serde_json::from_str::<Value>(&data)? {
            Value::Object(mapping) => Ok(mapping),
            _ => Err(StoreError::InvalidShape),
        }
    }

    fn write_mapping(&self, mapping: &RecordMapping) -> Result<(), StoreError> {
        let data = serde_json::to_string(mapping)?;
        self.backend.set_raw(&self.key, &data)
    }

    /// Same as [Self::get_record_for_date] but reports why the stored record couldn't be used.
    pub fn load_record(&self, date: &str) -> Result<DayRecord, StoreError> {
        let mapping = self.load_mapping()?;
        match mapping.get(date) {
            None | Some(Value::Null) => Ok(DayRecord::new(date)),
            Some(stored) => Ok(upgrade_record(date, stored)?),
        }
    }

    /// Returns the record for `date` in its current shape. A date that was never saved yields
    /// the default record. The date isn't validated, an unknown key behaves like a new day.
    pub fn get_record_for_date(&self, date: &str) -> DayRecord {
        self.load_record(date).unwrap_or_else(|e| {
            warn!("Failed to load record for {date}, using defaults: {e}");
            DayRecord::new(date)
        })
    }

    /// Replaces the whole record stored under `record.date`. Other days are rewritten as they
    /// were read. A mapping that isn't valid JSON is treated as empty, a backend that can't be
    /// read fails the save without writing.
    pub fn save_record(&self, record: &DayRecord) -> Result<(), StoreError> {
        let mut mapping = match self.load_mapping() {
            Ok(mapping) => mapping,
            Err(e @ StoreError::Access(_)) => return Err(e),
            Err(e) => {
                warn!("Stored records are unreadable, starting from an empty mapping: {e}");
                RecordMapping::new()
            }
        };
        mapping.insert(record.date.clone(), serde_json::to_value(record)?);
        self.write_mapping(&mapping)?;
        debug!("Saved record for {}", record.date);
        Ok(())
    }

    /// Same as [Self::get_all_history] but reports a broken mapping.
    pub fn load_history(&self) -> Result<Vec<DayRecord>, StoreError> {
        let mapping = self.load_mapping()?;
        let mut history = mapping
            .iter()
            .map(|(date, stored)| {
                upgrade_record(date, stored).unwrap_or_else(|e| {
                    warn!("Record for {date} is broken, showing defaults: {e}");
                    DayRecord::new(date.as_str())
                })
            })
            .collect::<Vec<_>>();
        // keys that aren't dates go last
        history.sort_by_cached_key(|record| {
            Reverse((
                NaiveDate::parse_from_str(&record.date, RECORD_KEY_FORMAT).ok(),
                record.date.clone(),
            ))
        });
        Ok(history)
    }

    /// All stored days, most recent first, each upgraded to the current shape.
    pub fn get_all_history(&self) -> Vec<DayRecord> {
        self.load_history().unwrap_or_else(|e| {
            warn!("Failed to load history: {e}");
            vec![]
        })
    }

    /// The stored mapping exactly as it is on disk, legacy shapes included.
    pub fn get_raw_data_for_export(&self) -> String {
        match self.backend.get_raw(&self.key) {
            Ok(Some(data)) => data,
            Ok(None) => "{}".to_string(),
            Err(e) => {
                warn!("Failed to read stored records for export: {e}");
                "{}".to_string()
            }
        }
    }

    /// Replaces every stored day with the content of `blob`. The blob has to be a JSON object
    /// whose values are all records or `null`, otherwise nothing is touched. Entries are stored
    /// as given, not upgraded, so anything exported can be imported back. Returns the number of
    /// imported days.
    pub fn import_raw_data(&self, blob: &str) -> Result<usize, StoreError> {
        let Value::Object(mapping) = serde_json::from_str::<Value>(blob)? else {
            return Err(StoreError::InvalidShape);
        };

        for (date, stored) in &mapping {
            if stored.is_null() {
                continue;
            }
            if !stored.is_object() {
                return Err(StoreError::InvalidRecord {
                    date: date.clone(),
                    reason: "expected an object".into(),
                });
            }
            upgrade_record(date, stored).map_err(|e| StoreError::InvalidRecord {
                date: date.clone(),
                reason: e.to_string(),
            })?;
        }

        self.write_mapping(&mapping)?;
        info!("Imported {} records", mapping.len());
        Ok(mapping.len())
    }
}
