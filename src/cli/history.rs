use std::{fs, path::Path};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use tracing::{error, info};

use crate::{
    storage::{backend::StorageBackend, record_storage::RecordStore},
    utils::time::date_to_record_key,
};

use super::output::format_history_entry;

pub fn print_history<B: StorageBackend>(store: &RecordStore<B>) {
    let history = store.get_all_history();
    if history.is_empty() {
        println!("暂无记录");
        return;
    }
    for day in history {
        println!("{}\n", format_history_entry(&day));
    }
}

pub fn default_backup_name(today: NaiveDate) -> String {
    format!("rhythm_backup_{}.json", date_to_record_key(today))
}

/// Writes everything stored into `path`, exactly as stored.
pub fn export_backup<B: StorageBackend>(store: &RecordStore<B>, path: &Path) -> Result<()> {
    fs::write(path, store.get_raw_data_for_export())?;
    info!("Exported records into {path:?}");
    Ok(())
}

/// Replaces all stored days with the backup in `path`. An invalid backup leaves stored data
/// untouched.
pub fn import_backup<B: StorageBackend>(store: &RecordStore<B>, path: &Path) -> Result<usize> {
    let content = fs::read_to_string(path)?;
    store.import_raw_data(&content).map_err(|e| {
        error!("Rejected backup {path:?}: {e}");
        anyhow!("数据文件格式错误，请使用正确的备份文件。({e})")
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::storage::{
        backend::MemoryBackend, entities::DayRecord, record_storage::RecordStore,
    };

    use super::{default_backup_name, export_backup, import_backup};

    #[test]
    fn backup_name_carries_the_date() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        assert_eq!(default_backup_name(today), "rhythm_backup_2024-07-04.json");
    }

    #[test]
    fn backup_file_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("backup.json");

        let source = RecordStore::new(MemoryBackend::new());
        let mut record = DayRecord::new("2024-01-01");
        record.weight = Some(60.1);
        source.save_record(&record)?;
        export_backup(&source, &path)?;

        let target = RecordStore::new(MemoryBackend::new());
        assert_eq!(import_backup(&target, &path)?, 1);
        assert_eq!(target.get_all_history(), vec![record]);
        Ok(())
    }

    #[test]
    fn invalid_backup_file_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("backup.json");
        fs::write(&path, "not json")?;

        let store = RecordStore::new(MemoryBackend::new());
        store.save_record(&DayRecord::new("2024-01-01"))?;

        assert!(import_backup(&store, &path).is_err());
        assert_eq!(store.get_all_history(), vec![DayRecord::new("2024-01-01")]);
        Ok(())
    }

    #[test]
    fn missing_backup_file_is_an_error() {
        let store = RecordStore::new(MemoryBackend::new());
        assert!(import_backup(&store, std::path::Path::new("/nonexistent/backup.json")).is_err());
    }
}
