use super::error::StoreError;
use super::selection::{default_selection, Selection};
use super::settings::{ApiKeys, Settings};
use super::types::Thread;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const SELECTED_MODELS_KEY: &str = "selected-models";
pub const API_KEYS_KEY: &str = "keys";
pub const THREADS_KEY: &str = "threads";
pub const ACTIVE_THREAD_KEY: &str = "active-thread";
pub const SIDEBAR_OPEN_KEY: &str = "sidebar-open";
pub const SHOW_LANDING_KEY: &str = "show-landing";
pub const THEME_KEY: &str = "theme";

/// Raw client-local key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Move an unreadable value out of the way so later writes keep it.
    fn quarantine(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

/// One JSON file per key.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store under `<settings dir>/store`
    pub fn in_settings_dir() -> Result<Self, StoreError> {
        let base = Settings::settings_dir().map_err(|_| StoreError::NoConfigDir)?;
        Ok(Self::new(base.join("store")))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn corrupt_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json.corrupt", key))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        // Write beside the target and rename over it, so a crash mid-write
        // never leaves a torn file under the real name
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;

        // Keys and conversations are private to the owner
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&tmp)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&tmp, perms)?;
        }

        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn quarantine(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if path.exists() {
            fs::rename(&path, self.corrupt_path_for(key))?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn quarantine(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(raw) = values.remove(key) {
            values.insert(format!("{}.corrupt", key), raw);
        }
        Ok(())
    }
}

/// Typed access to persisted app state.
#[derive(Clone)]
pub struct AppStore {
    backend: Arc<dyn KeyValueStore>,
}

impl PartialEq for AppStore {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.backend, &other.backend)
    }
}

impl AppStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// File-backed store, or an in-memory one when no config dir exists.
    pub fn open_default() -> Self {
        match FileStore::in_settings_dir() {
            Ok(store) => Self::new(Arc::new(store)),
            Err(e) => {
                tracing::warn!("{}; state will not survive a restart", e);
                Self::new(Arc::new(MemoryStore::new()))
            }
        }
    }

    pub fn load_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.backend.read(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key, "Setting aside unreadable stored value: {}", e);
                    if let Err(e) = self.backend.quarantine(key) {
                        tracing::error!(key, "Failed to set aside stored value: {}", e);
                    }
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, "Failed to read stored value: {}", e);
                default
            }
        }
    }

    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.load_or(key, T::default())
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.backend.write(key, &raw)
    }

    /// Save and log instead of failing; used from UI handlers
    pub fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.save(key, value) {
            tracing::error!(key, "Failed to persist: {}", e);
        }
    }

    pub fn selection(&self) -> Selection {
        self.load_or(SELECTED_MODELS_KEY, default_selection())
    }

    pub fn api_keys(&self) -> ApiKeys {
        self.load(API_KEYS_KEY)
    }

    pub fn threads(&self) -> Vec<Thread> {
        self.load(THREADS_KEY)
    }

    pub fn active_thread(&self) -> Option<String> {
        self.load(ACTIVE_THREAD_KEY)
    }

    pub fn sidebar_open(&self) -> bool {
        self.load_or(SIDEBAR_OPEN_KEY, true)
    }

    pub fn show_landing(&self) -> bool {
        self.load_or(SHOW_LANDING_KEY, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::types::Message;

    fn memory() -> AppStore {
        AppStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_defaults_on_empty_store() {
        let store = memory();
        assert_eq!(store.selection(), default_selection());
        assert_eq!(store.api_keys(), ApiKeys::default());
        assert!(store.threads().is_empty());
        assert_eq!(store.active_thread(), None);
        assert!(store.sidebar_open());
        assert!(store.show_landing());
    }

    #[test]
    fn test_save_then_load_threads() {
        let store = memory();
        let mut thread = Thread::new();
        thread.messages.push(Message::user("hi"));
        thread.messages.push(Message::assistant("deepseek-r1", "hello"));
        store.save(THREADS_KEY, &vec![thread.clone()]).unwrap();
        store.save(ACTIVE_THREAD_KEY, &Some(thread.id.clone())).unwrap();

        assert_eq!(store.threads(), vec![thread.clone()]);
        assert_eq!(store.active_thread(), Some(thread.id));
    }

    #[test]
    fn test_corrupt_value_falls_back_to_default() {
        let backend = Arc::new(MemoryStore::new());
        backend.write(SIDEBAR_OPEN_KEY, "{not json").unwrap();
        let store = AppStore::new(backend);
        assert!(store.sidebar_open());
    }

    #[test]
    fn test_corrupt_value_is_kept_aside() {
        let backend = Arc::new(MemoryStore::new());
        backend.write(SIDEBAR_OPEN_KEY, "{not json").unwrap();
        let store = AppStore::new(backend.clone());

        assert!(store.sidebar_open());
        assert_eq!(backend.read(SIDEBAR_OPEN_KEY).unwrap(), None);
        assert_eq!(
            backend.read("sidebar-open.corrupt").unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn test_torn_threads_file_survives_next_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = AppStore::new(Arc::new(FileStore::new(dir.path().to_path_buf())));

        let threads: Vec<Thread> = (0..3)
            .map(|i| {
                let mut thread = Thread::new();
                thread.messages.push(Message::user(format!("question {}", i)));
                thread
            })
            .collect();
        store.save(THREADS_KEY, &threads).unwrap();

        // Cut the file in half as an interrupted write would
        let path = dir.path().join("threads.json");
        let full = fs::read_to_string(&path).unwrap();
        let torn = full[..full.len() / 2].to_string();
        fs::write(&path, &torn).unwrap();

        assert!(store.threads().is_empty());
        store.persist(THREADS_KEY, &Vec::<Thread>::new());

        let kept = fs::read_to_string(dir.path().join("threads.json.corrupt")).unwrap();
        assert_eq!(kept, torn);
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileStore::new(dir.path().to_path_buf());
        backend.write(THEME_KEY, "\"light\"").unwrap();
        backend.write(THEME_KEY, "\"dark\"").unwrap();

        assert_eq!(backend.read(THEME_KEY).unwrap().as_deref(), Some("\"dark\""));
        assert!(!dir.path().join("theme.json.tmp").exists());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = AppStore::new(Arc::new(FileStore::new(dir.path().join("nested"))));

        let mut selection = Selection::new();
        selection.toggle("gpt-oss-20b");
        store.save(SELECTED_MODELS_KEY, &selection).unwrap();

        let reopened = AppStore::new(Arc::new(FileStore::new(dir.path().join("nested"))));
        assert_eq!(reopened.selection(), selection);
        assert!(dir.path().join("nested").join("selected-models.json").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let backend = FileStore::new(dir.path().to_path_buf());
        backend.write(API_KEYS_KEY, "{}").unwrap();
        let mode = fs::metadata(dir.path().join("keys.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
