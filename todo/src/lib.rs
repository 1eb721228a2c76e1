//! A task list built on the Tasklist reducer architecture.
//!
//! The crate is layered so that only the outer shell touches the world:
//!
//! - [`domain`]: pure list operations (add, remove, toggle, edit, clear
//!   completed, filter, count)
//! - [`view`]: pure rendering from state to a declarative tree
//! - [`reducer`]: applies commands through the domain and describes the save
//!   as an effect
//! - [`storage`]: the JSON repository and the file-backed key-value store
//! - [`events`], [`app`], [`surface`], [`command`]: the controller and its
//!   front ends
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use tasklist_core::environment::{SystemClock, UuidGenerator};
//! use tasklist_runtime::StoreConfig;
//! use tasklist_testing::InMemoryKeyValueStore;
//! use todo::{App, Key, TodoEnvironment, TodoRepository, UiEvent};
//!
//! let environment = TodoEnvironment::new(
//!     Arc::new(SystemClock),
//!     Arc::new(UuidGenerator),
//!     TodoRepository::new(Arc::new(InMemoryKeyValueStore::new())),
//! );
//! let mut app = App::new(environment, StoreConfig::default());
//!
//! app.dispatch(UiEvent::NewTaskKey {
//!     key: Key::Enter,
//!     value: "Buy milk".to_string(),
//! })?;
//!
//! assert_eq!(app.state(|s| s.count()), 1);
//! assert!(todo::surface::to_text(&app.view()).contains("1 item left"));
//! # Ok::<(), todo::AppError>(())
//! ```

pub mod app;
pub mod command;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod reducer;
pub mod storage;
pub mod surface;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use app::{App, TodoStore};
pub use config::Config;
pub use error::{AppError, CommandError};
pub use events::{intent, Key, UiEvent};
pub use reducer::{TodoEnvironment, TodoReducer};
pub use storage::{FileStore, TodoRepository, STORAGE_KEY};
pub use types::{Filter, Todo, TodoAction, TodoId, TodoList, TodoState};
pub use view::{render_app, View};
