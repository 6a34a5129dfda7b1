//! Durable key-value storage and the background writer.
//!
//! Stores mirror their state through [`StorageWriter`], which applies writes
//! on a background thread so mutations never wait on the device storage
//! layer. Commands are applied in enqueue order, so successive writes to the
//! same key settle last-mutation-wins. Storage failures are logged and never
//! surface to the mutating caller; the in-memory state stays authoritative.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

/// The device-local persistent key-value layer the stores depend on.
///
/// Values are serialized strings; an absent key reads as `None` and removing
/// an absent key succeeds.
pub trait KeyValueStorage: Send + Sync {
    fn set(&self, key: &str, value: &str) -> Result<(), String>;
    fn get(&self, key: &str) -> Result<Option<String>, String>;
    fn remove(&self, key: &str) -> Result<(), String>;
}

/// File-backed storage: one `<key>.json` file per key under a base directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write never leaves a torn value behind.
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        fs::create_dir_all(&self.base_dir).map_err(|e| e.to_string())?;

        let path = self.path_for(key);
        let tmp_path = self.base_dir.join(format!("{}.json.tmp", key));
        fs::write(&tmp_path, value).map_err(|e| e.to_string())?;
        fs::rename(&tmp_path, &path).map_err(|e| e.to_string())
    }

    fn get(&self, key: &str) -> Result<Option<String>, String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.to_string()),
        }
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| "storage mutex poisoned".to_string())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, String> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| "storage mutex poisoned".to_string())?;
        Ok(entries.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| "storage mutex poisoned".to_string())?;
        entries.remove(key);
        Ok(())
    }
}

enum StorageCommand {
    Set { key: String, value: String },
    Remove { key: String },
    Flush(mpsc::Sender<()>),
}

/// Cloneable handle to the background thread that applies storage commands.
///
/// `set` and `remove` enqueue and return immediately. Failures in the
/// backend are logged and swallowed; a later command is still applied.
#[derive(Clone)]
pub struct StorageWriter {
    tx: mpsc::Sender<StorageCommand>,
}

impl StorageWriter {
    /// Spawns the worker thread over the given backend.
    ///
    /// The thread exits once every handle has been dropped and the queue
    /// has drained.
    pub fn spawn(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (tx, rx) = mpsc::channel::<StorageCommand>();

        thread::spawn(move || {
            for command in rx {
                match command {
                    StorageCommand::Set { key, value } => {
                        if let Err(e) = storage.set(&key, &value) {
                            tracing::warn!(error = %e, key = %key, "durable storage write failed");
                        }
                    }
                    StorageCommand::Remove { key } => {
                        if let Err(e) = storage.remove(&key) {
                            tracing::warn!(error = %e, key = %key, "durable storage erase failed");
                        }
                    }
                    StorageCommand::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });

        Self { tx }
    }

    /// Enqueues a write of `value` under `key`.
    pub fn set(&self, key: &str, value: String) {
        self.send(StorageCommand::Set {
            key: key.to_string(),
            value,
        });
    }

    /// Enqueues erasure of `key`.
    pub fn remove(&self, key: &str) {
        self.send(StorageCommand::Remove {
            key: key.to_string(),
        });
    }

    /// Blocks until every previously enqueued command has been applied.
    ///
    /// Ordinary mutations never call this; it is a durability barrier for
    /// tests and for hosts that want one at shutdown.
    pub fn flush(&self) {
        let (done_tx, done_rx) = mpsc::channel();
        self.send(StorageCommand::Flush(done_tx));
        let _ = done_rx.recv();
    }

    fn send(&self, command: StorageCommand) {
        if self.tx.send(command).is_err() {
            tracing::error!("storage writer thread is gone; durable state will go stale");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_round_trip() {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let storage = FileStorage::new(tmp.path());

        storage.set("cart", "{\"items\":[]}").unwrap();
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("{\"items\":[]}"));

        storage.set("cart", "{\"items\":[1]}").unwrap();
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("{\"items\":[1]}"));
    }

    #[test]
    fn test_file_storage_absent_key_reads_none() {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let storage = FileStorage::new(tmp.path());

        assert_eq!(storage.get("missing").unwrap(), None);
    }

    #[test]
    fn test_file_storage_remove_is_idempotent() {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let storage = FileStorage::new(tmp.path());

        storage.set("token", "abc").unwrap();
        storage.remove("token").unwrap();
        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
    }

    #[test]
    fn test_file_storage_leaves_no_temp_files() {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let storage = FileStorage::new(tmp.path());

        storage.set("cart", "{}").unwrap();

        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["cart.json".to_string()]);
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();

        storage.set("token", "abc").unwrap();
        assert_eq!(storage.get("token").unwrap().as_deref(), Some("abc"));

        storage.remove("token").unwrap();
        assert_eq!(storage.get("token").unwrap(), None);
        storage.remove("token").unwrap();
    }

    #[test]
    fn test_writer_applies_commands_in_order() {
        let storage = Arc::new(MemoryStorage::new());
        let writer = StorageWriter::spawn(storage.clone());

        writer.set("cart", "first".to_string());
        writer.set("cart", "second".to_string());
        writer.set("token", "abc".to_string());
        writer.remove("token");
        writer.flush();

        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("second"));
        assert_eq!(storage.get("token").unwrap(), None);
    }

    /// Backend that refuses writes to one key, to exercise failure logging.
    struct RefusingStorage {
        inner: MemoryStorage,
    }

    impl KeyValueStorage for RefusingStorage {
        fn set(&self, key: &str, value: &str) -> Result<(), String> {
            if key == "boom" {
                return Err("device storage unavailable".to_string());
            }
            self.inner.set(key, value)
        }

        fn get(&self, key: &str) -> Result<Option<String>, String> {
            self.inner.get(key)
        }

        fn remove(&self, key: &str) -> Result<(), String> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_writer_survives_backend_failure() {
        let storage = Arc::new(RefusingStorage {
            inner: MemoryStorage::new(),
        });
        let writer = StorageWriter::spawn(storage.clone());

        writer.set("boom", "lost".to_string());
        writer.set("cart", "kept".to_string());
        writer.flush();

        assert_eq!(storage.get("boom").unwrap(), None);
        assert_eq!(storage.get("cart").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn test_writer_handles_are_cloneable() {
        let storage = Arc::new(MemoryStorage::new());
        let writer = StorageWriter::spawn(storage.clone());
        let other = writer.clone();

        writer.set("a", "1".to_string());
        other.set("b", "2".to_string());
        writer.flush();

        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(storage.get("b").unwrap().as_deref(), Some("2"));
    }
}
