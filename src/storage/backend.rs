use std::{
    cell::RefCell,
    collections::HashMap,
    fs::{self, File},
    io::{ErrorKind, Read, Write},
    ops::Deref,
    path::PathBuf,
};

use fs4::fs_std::FileExt;
use tracing::debug;

use super::StoreError;

/// Raw key-value persistence used by [RecordStore](super::record_storage::RecordStore). Values
/// are opaque text, the backend knows nothing about records.
#[cfg_attr(test, mockall::automock)]
pub trait StorageBackend {
    /// Returns `None` when nothing was ever written under `key`.
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the value under `key` as a whole.
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: Deref> StorageBackend for T
where
    T::Target: StorageBackend,
{
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.deref().get_raw(key)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.deref().set_raw(key, value)
    }
}

/// Keeps every key in its own `<key>.json` file inside a directory.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    fn data_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Writers replace the data file through a rename, so locks are taken on a sibling file that
    /// lives as long as the key does.
    fn open_lock(&self, key: &str) -> Result<File, std::io::Error> {
        File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.dir.join(format!("{key}.lock")))
    }
}

impl StorageBackend for FileBackend {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let lock = self.open_lock(key)?;
        FileExt::lock_shared(&lock)?;

        let path = self.data_path(key);
        debug!("Reading {path:?}");
        let result = match File::open(&path) {
            Ok(mut file) => {
                let mut data = String::new();
                file.read_to_string(&mut data).map(|_| Some(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        };

        FileExt::unlock(&lock)?;
        Ok(result?)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let lock = self.open_lock(key)?;
        FileExt::lock_exclusive(&lock)?;

        let path = self.data_path(key);
        let staging = self.dir.join(format!("{key}.json.tmp"));
        debug!("Writing {} bytes into {path:?}", value.len());
        let result = (|| -> std::io::Result<()> {
            let mut file = File::create(&staging)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
            fs::rename(&staging, &path)
        })();

        FileExt::unlock(&lock)?;
        Ok(result?)
    }
}

/// In-process backend. Nothing outlives the value itself.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
