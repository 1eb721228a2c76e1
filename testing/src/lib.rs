//! # Tasklist Testing
//!
//! Testing utilities and helpers for the Tasklist reducer architecture.
//!
//! This crate provides:
//! - Deterministic implementations of the Environment traits
//! - A Given-When-Then harness for reducers
//! - proptest strategies for task text
//!
//! ## Example
//!
//! ```
//! use tasklist_core::environment::{Clock, IdGenerator};
//! use tasklist_testing::{test_clock, SequentialIdGenerator};
//!
//! let ids = SequentialIdGenerator::new();
//! assert_eq!(ids.next_id(), "todo-1");
//! assert_eq!(test_clock().now(), test_clock().now());
//! ```

use chrono::{DateTime, Utc};
use tasklist_core::environment::{Clock, IdGenerator, KeyValueStore, StorageError};


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, KeyValueStore, StorageError, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::{Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// ```
    /// use tasklist_testing::mocks::FixedClock;
    /// use tasklist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Predictable identifiers: `todo-1`, `todo-2`, ...
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Start counting from 1
        #[must_use]
        pub const fn new() -> Self {
            Self {
                next: AtomicU64::new(0),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
            format!("todo-{n}")
        }
    }

    /// Always returns the same identifier
    ///
    /// Useful for exercising collision handling.
    #[derive(Debug, Clone)]
    pub struct RepeatingIdGenerator {
        id: String,
    }

    impl RepeatingIdGenerator {
        /// Hand out `id` forever
        #[must_use]
        pub fn new(id: impl Into<String>) -> Self {
            Self { id: id.into() }
        }
    }

    impl IdGenerator for RepeatingIdGenerator {
        fn next_id(&self) -> String {
            self.id.clone()
        }
    }

    /// In-memory key-value store
    ///
    /// Behaves like browser local storage: missing keys read as `None`,
    /// writes overwrite. Reads can be made to fail for a while with
    /// [`fail_reads`](Self::fail_reads).
    #[derive(Debug, Default)]
    pub struct InMemoryKeyValueStore {
        entries: Mutex<HashMap<String, String>>,
        reads_fail: AtomicBool,
    }

    impl InMemoryKeyValueStore {
        /// Create an empty store
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a store pre-populated with one entry
        #[must_use]
        pub fn with_entry(key: &str, value: &str) -> Self {
            let store = Self::new();
            store
                .entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            store
        }

        /// Raw value under `key`, bypassing the trait
        #[must_use]
        pub fn raw(&self, key: &str) -> Option<String> {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned()
        }

        /// Number of stored keys
        #[must_use]
        pub fn len(&self) -> usize {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// True when nothing has been stored
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// While `failing` is set, every `get` returns an I/O error
        pub fn fail_reads(&self, failing: bool) {
            self.reads_fail.store(failing, Ordering::SeqCst);
        }
    }

    impl KeyValueStore for InMemoryKeyValueStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if self.reads_fail.load(Ordering::SeqCst) {
                return Err(StorageError::Io(std::io::Error::other("storage unavailable")));
            }
            Ok(self.raw(key))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    /// Key-value store whose every operation fails
    ///
    /// Reads fail with an I/O error, writes with a quota error, mirroring a
    /// browser in private mode with a zero quota.
    #[derive(Debug, Default)]
    pub struct FailingKeyValueStore {
        attempts: AtomicU64,
    }

    impl FailingKeyValueStore {
        /// Create a new failing store
        #[must_use]
        pub const fn new() -> Self {
            Self {
                attempts: AtomicU64::new(0),
            }
        }

        /// How many reads and writes were attempted
        #[must_use]
        pub fn attempts(&self) -> u64 {
            self.attempts.load(Ordering::SeqCst)
        }
    }

    impl KeyValueStore for FailingKeyValueStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Io(std::io::Error::other("storage unavailable")))
        }

        fn set(&self, _key: &str, value: &str) -> Result<(), StorageError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::QuotaExceeded {
                required: value.len(),
                quota: 0,
            })
        }
    }
}

/// Property-based testing utilities
///
/// proptest strategies for the text users type into a task list.
pub mod properties {
    use proptest::prelude::*;

    /// Text with at least one visible character, possibly padded with spaces
    pub fn task_text() -> impl Strategy<Value = String> {
        ("[ \t]{0,3}", "[a-zA-Z0-9][a-zA-Z0-9 .,!?-]{0,30}", "[ \t]{0,3}")
            .prop_map(|(lead, body, trail)| format!("{lead}{body}{trail}"))
    }

    /// Text made only of whitespace, including the empty string
    pub fn blank_text() -> impl Strategy<Value = String> {
        "[ \t\n]{0,6}"
    }
}

// Re-export commonly used items
pub use mocks::{
    FailingKeyValueStore, FixedClock, InMemoryKeyValueStore, RepeatingIdGenerator,
    SequentialIdGenerator, test_clock,
};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::new();
        assert_eq!(ids.next_id(), "todo-1");
        assert_eq!(ids.next_id(), "todo-2");
    }

    #[test]
    fn test_in_memory_store_overwrites() {
        let store = InMemoryKeyValueStore::new();
        assert!(store.is_empty());
        assert!(matches!(store.get("k"), Ok(None)));

        assert!(store.set("k", "one").is_ok());
        assert!(store.set("k", "two").is_ok());

        assert_eq!(store.raw("k").as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_in_memory_store_failing_reads() {
        let store = InMemoryKeyValueStore::with_entry("k", "v");

        store.fail_reads(true);
        assert!(matches!(store.get("k"), Err(StorageError::Io(_))));

        store.fail_reads(false);
        assert_eq!(store.get("k").ok().flatten().as_deref(), Some("v"));
    }

    #[test]
    fn test_failing_store_counts_attempts() {
        let store = FailingKeyValueStore::new();
        assert!(store.get("k").is_err());
        assert!(matches!(
            store.set("k", "abc"),
            Err(StorageError::QuotaExceeded { required: 3, quota: 0 })
        ));
        assert_eq!(store.attempts(), 2);
    }
}
