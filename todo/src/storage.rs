//! Persistence for the task list.
//!
//! [`TodoRepository`] is the only code that knows how a list is stored: a
//! JSON array under [`STORAGE_KEY`] in some [`KeyValueStore`]. It never
//! reports failure to its callers. A value that cannot be read back yields an
//! empty list and a write that fails is logged and dropped; the in-memory
//! list stays authoritative for the session either way.
//!
//! [`FileStore`] is the key-value store used by the binary: a single JSON
//! object on disk, shaped like browser local storage.

use crate::types::{Todo, TodoList};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tasklist_core::environment::{KeyValueStore, StorageError};

/// Key the task list is stored under
pub const STORAGE_KEY: &str = "todo-app-todos";

/// Loads and saves the task list through a [`KeyValueStore`]
#[derive(Clone)]
pub struct TodoRepository {
    store: Arc<dyn KeyValueStore>,
}

impl TodoRepository {
    /// Creates a repository over `store`
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads the saved list
    ///
    /// Returns an empty list when nothing was saved, when the stored value
    /// is not a JSON array of task records, or when the store cannot be read.
    #[must_use]
    pub fn load(&self) -> TodoList {
        self.try_load().unwrap_or_default()
    }

    /// Reads the saved list, distinguishing an unreadable store
    ///
    /// Returns `None` only when the store itself fails. A missing or
    /// malformed value still yields `Some` of an empty list.
    #[must_use]
    pub fn try_load(&self) -> Option<TodoList> {
        let raw = match self.store.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No saved task list");
                return Some(TodoList::new());
            },
            Err(error) => {
                tracing::warn!(%error, "Failed to read task list");
                return None;
            },
        };

        match decode(&raw) {
            Ok(todos) => {
                tracing::debug!(count = todos.len(), "Loaded task list");
                Some(todos)
            },
            Err(error) => {
                tracing::warn!(%error, "Saved task list is unreadable, treating it as empty");
                Some(TodoList::new())
            },
        }
    }

    /// Writes `todos`, replacing whatever was saved before
    ///
    /// Failures are logged and swallowed.
    pub fn save(&self, todos: &TodoList) {
        let encoded = match encode(todos) {
            Ok(encoded) => encoded,
            Err(error) => {
                tracing::warn!(%error, "Failed to encode task list, not saved");
                return;
            },
        };

        match self.store.set(STORAGE_KEY, &encoded) {
            Ok(()) => tracing::debug!(count = todos.len(), "Saved task list"),
            Err(error) => tracing::warn!(%error, "Failed to save task list"),
        }
    }
}

impl std::fmt::Debug for TodoRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoRepository")
            .field("key", &STORAGE_KEY)
            .finish_non_exhaustive()
    }
}

/// Serializes a list to the persisted JSON format
///
/// # Errors
///
/// Returns the serializer's error; with the types involved this does not
/// happen in practice.
pub fn encode(todos: &TodoList) -> Result<String, serde_json::Error> {
    serde_json::to_string(todos)
}

/// Parses the persisted JSON format
///
/// Records are normalized on the way in: text is trimmed, records whose
/// text is blank are dropped, and only the first record for each id is kept.
///
/// # Errors
///
/// Returns an error if `raw` is not a JSON array of task-shaped records.
pub fn decode(raw: &str) -> Result<TodoList, serde_json::Error> {
    let records: Vec<Todo> = serde_json::from_str(raw)?;
    let total = records.len();

    let mut seen = HashSet::new();
    let todos: TodoList = records
        .into_iter()
        .filter_map(|record| {
            let text = record.text.trim();
            if text.is_empty() || !seen.insert(record.id.clone()) {
                return None;
            }
            let text = text.to_string();
            Some(Todo { text, ..record })
        })
        .collect();

    if todos.len() < total {
        tracing::warn!(
            dropped = total - todos.len(),
            "Dropped blank or duplicate records from saved task list"
        );
    }

    Ok(todos)
}

/// Key-value store persisted as one JSON object in a file
///
/// Writes go to a sibling temporary file that is then renamed over the
/// original, so a crash mid-write leaves the previous contents intact.
/// An optional quota caps the combined length of keys and values.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    quota: Option<usize>,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by `path`; the file is created on first write
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quota: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Limits the stored size to `bytes`
    #[must_use]
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            },
            Err(error) => return Err(error.into()),
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let encoded = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        write_atomically(&self.path, &encoded)?;
        Ok(())
    }
}

/// Replaces the file at `path` with `contents` in one step
///
/// The data goes to a sibling `.tmp` file first, which is then renamed over
/// `path`; readers see either the old file or the new one, never a prefix.
///
/// # Errors
///
/// Returns the I/O error from writing or renaming the temporary file.
pub(crate) fn write_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    std::fs::write(&temp, contents)?;
    std::fs::rename(&temp, path)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StorageError::Serialization(error)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "Storage file is corrupt, replacing it"
                );
                BTreeMap::new()
            },
            Err(error) => return Err(error),
        };
        entries.insert(key.to_string(), value.to_string());

        if let Some(quota) = self.quota {
            let required: usize = entries.iter().map(|(k, v)| k.len() + v.len()).sum();
            if required > quota {
                return Err(StorageError::QuotaExceeded { required, quota });
            }
        }

        self.write_entries(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TodoId;
    use tasklist_testing::{FailingKeyValueStore, InMemoryKeyValueStore};

    fn todo(id: &str, text: &str, completed: bool) -> Todo {
        Todo {
            completed,
            ..Todo::new(TodoId::new(id), text, None)
        }
    }

    fn repository(store: InMemoryKeyValueStore) -> (TodoRepository, Arc<InMemoryKeyValueStore>) {
        let store = Arc::new(store);
        (TodoRepository::new(store.clone()), store)
    }

    #[test]
    fn test_load_empty_storage() {
        let (repo, _) = repository(InMemoryKeyValueStore::new());
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_load_parses_stored_todos() {
        let (repo, _) = repository(InMemoryKeyValueStore::with_entry(
            STORAGE_KEY,
            r#"[{"id":"1","text":"A","completed":false}]"#,
        ));

        let todos = repo.load();

        assert_eq!(todos.len(), 1);
        assert_eq!(*todos[0], todo("1", "A", false));
    }

    #[test]
    fn test_load_corrupt_data() {
        for raw in ["not-json!!!", "{}", "42", r#"[{"id":1}]"#, r#"[{"text":"A"}]"#] {
            let (repo, _) = repository(InMemoryKeyValueStore::with_entry(STORAGE_KEY, raw));
            assert!(repo.load().is_empty(), "expected empty list for {raw}");
        }
    }

    #[test]
    fn test_load_unreadable_store() {
        let repo = TodoRepository::new(Arc::new(FailingKeyValueStore::new()));
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_try_load_tells_unreadable_from_empty() {
        let (repo, store) = repository(InMemoryKeyValueStore::new());
        assert_eq!(repo.try_load(), Some(TodoList::new()));

        store.fail_reads(true);
        assert_eq!(repo.try_load(), None);
    }

    #[test]
    fn test_try_load_corrupt_value_is_empty() {
        let (repo, _) = repository(InMemoryKeyValueStore::with_entry(STORAGE_KEY, "{}"));
        assert_eq!(repo.try_load(), Some(TodoList::new()));
    }

    #[test]
    fn test_save_stores_json_array() {
        let (repo, store) = repository(InMemoryKeyValueStore::new());
        let todos: TodoList = vec![todo("1", "Buy milk", false)].into_iter().collect();

        repo.save(&todos);

        let raw = store.raw(STORAGE_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{ "id": "1", "text": "Buy milk", "completed": false }])
        );
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let (repo, store) =
            repository(InMemoryKeyValueStore::with_entry(STORAGE_KEY, r#"[{"id":"old"}]"#));

        repo.save(&TodoList::new());

        assert_eq!(store.raw(STORAGE_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let store = Arc::new(FailingKeyValueStore::new());
        let repo = TodoRepository::new(store.clone());

        repo.save(&vec![todo("1", "A", false)].into_iter().collect());

        assert_eq!(store.attempts(), 1);
    }

    #[test]
    fn test_round_trip() {
        let (repo, _) = repository(InMemoryKeyValueStore::new());
        let todos: TodoList = vec![todo("1", "A", false), todo("2", "B", true)]
            .into_iter()
            .collect();

        repo.save(&todos);

        assert_eq!(repo.load(), todos);
    }

    #[test]
    fn test_decode_normalizes_records() {
        let raw = r#"[
            {"id":"1","text":"  A  ","completed":false},
            {"id":"2","text":"   ","completed":false},
            {"id":"1","text":"duplicate","completed":true},
            {"id":"3","text":"C","completed":true,"createdAt":1735689600000}
        ]"#;

        let todos = decode(raw).unwrap();

        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].text, "A");
        assert_eq!(todos[1].id, TodoId::new("3"));
        assert!(todos[1].created_at.is_some());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));

        assert!(store.get("k").unwrap().is_none());

        store.set("k", "one").unwrap();
        store.set("other", "two").unwrap();
        store.set("k", "three").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("three"));
        assert_eq!(store.get("other").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_write_atomically_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");

        write_atomically(&path, "first").unwrap();
        write_atomically(&path, "second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["page.html"]);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        FileStore::new(&path).set("k", "v").unwrap();

        assert_eq!(FileStore::new(&path).get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_store_quota() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json")).with_quota(10);

        store.set("k", "small").unwrap();
        let result = store.set("k", "far too large for the quota");

        assert!(matches!(result, Err(StorageError::QuotaExceeded { quota: 10, .. })));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("small"));
    }

    #[test]
    fn test_file_store_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "garbage").unwrap();
        let store = FileStore::new(&path);

        assert!(matches!(store.get("k"), Err(StorageError::Serialization(_))));

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
