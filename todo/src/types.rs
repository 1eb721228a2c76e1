//! Domain types for the task list.
//!
//! A task list is an ordered sequence of tasks. Each task is held behind its
//! own `Arc` so that a list produced by a domain operation shares every entry
//! it did not touch with the list it was derived from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tasklist_macros::Action;

/// Unique identifier for a task
///
/// Opaque to everything but the id generator that produced it. Lists loaded
/// from storage may carry ids minted by older builds, so no format is assumed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A single task
///
/// Serialized with the field names of the persisted format
/// (`id`, `text`, `completed`, `createdAt` in epoch milliseconds).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier
    pub id: TodoId,
    /// Display text, trimmed and never blank
    pub text: String,
    /// Whether the task is done
    pub completed: bool,
    /// When the task was created
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// Creates an open task with trimmed text
    #[must_use]
    pub fn new(id: TodoId, text: &str, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            text: text.trim().to_string(),
            completed: false,
            created_at,
        }
    }

    /// Copy of this task with `completed` flipped
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }

    /// Copy of this task with new text
    #[must_use]
    pub fn with_text(&self, text: String) -> Self {
        Self {
            text,
            ..self.clone()
        }
    }
}

/// Ordered, immutable list of tasks
///
/// Cloning is cheap: the list and each entry are reference counted.
/// Equality compares content; [`TodoList::ptr_eq`] compares identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoList(Arc<Vec<Arc<Todo>>>);

impl TodoList {
    /// Creates an empty list
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if both handles point at the same list
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns a task by ID
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&Arc<Todo>> {
        self.0.iter().find(|todo| &todo.id == id)
    }

    /// Position of the task with the given ID
    #[must_use]
    pub fn position(&self, id: &TodoId) -> Option<usize> {
        self.0.iter().position(|todo| &todo.id == id)
    }

    /// Checks if a task exists
    #[must_use]
    pub fn contains(&self, id: &TodoId) -> bool {
        self.position(id).is_some()
    }

    /// Entries as shared handles
    #[must_use]
    pub fn entries(&self) -> &[Arc<Todo>] {
        &self.0
    }
}

impl std::ops::Deref for TodoList {
    type Target = [Arc<Todo>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Arc<Todo>> for TodoList {
    fn from_iter<I: IntoIterator<Item = Arc<Todo>>>(iter: I) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}

impl FromIterator<Todo> for TodoList {
    fn from_iter<I: IntoIterator<Item = Todo>>(iter: I) -> Self {
        iter.into_iter().map(Arc::new).collect()
    }
}

impl<'a> IntoIterator for &'a TodoList {
    type Item = &'a Arc<Todo>;
    type IntoIter = std::slice::Iter<'a, Arc<Todo>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Which subset of the list is on screen
///
/// Transient view state; never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Every task
    #[default]
    All,
    /// Tasks not yet completed
    Active,
    /// Completed tasks
    Completed,
}

impl Filter {
    /// Every filter, in display order
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Completed];

    /// Parses a filter name, treating anything unrecognized as [`Filter::All`]
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::All,
        }
    }

    /// Machine name, as carried by `data-filter`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Button label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    /// Whether `todo` belongs to this subset
    #[must_use]
    pub const fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }
}

impl From<&str> for Filter {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State owned by the store
///
/// Only `todos` is persisted. `filter` and `editing` live for the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// The task list
    pub todos: TodoList,
    /// Current filter
    pub filter: Filter,
    /// Task whose text is being edited, if any
    pub editing: Option<TodoId>,
}

impl TodoState {
    /// Creates an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State around a previously loaded list
    #[must_use]
    pub fn with_todos(todos: TodoList) -> Self {
        Self {
            todos,
            ..Self::default()
        }
    }

    /// Returns the number of tasks
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }
}

/// Actions representing commands and events for the task list
///
/// Commands come from the user through the event layer. Events are fed back
/// by effects.
#[derive(Action, Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Append a task
    #[command]
    AddTodo {
        /// Raw input text
        text: String,
    },

    /// Command: Flip a task's completion
    #[command]
    ToggleTodo {
        /// Task to toggle
        id: TodoId,
    },

    /// Command: Replace a task's text
    #[command]
    EditTodo {
        /// Task to edit
        id: TodoId,
        /// Raw replacement text
        text: String,
    },

    /// Command: Delete a task
    #[command]
    RemoveTodo {
        /// Task to delete
        id: TodoId,
    },

    /// Command: Delete every completed task
    #[command]
    ClearCompleted,

    /// Command: Change the visible subset
    #[command]
    SetFilter {
        /// New filter
        filter: Filter,
    },

    /// Command: Enter edit mode on a task
    #[command]
    BeginEdit {
        /// Task to edit
        id: TodoId,
    },

    /// Command: Leave edit mode, applying the text
    #[command]
    CommitEdit {
        /// Raw replacement text
        text: String,
    },

    /// Command: Leave edit mode without changes
    #[command]
    CancelEdit,

    /// Command: Re-read the list from storage, keeping it if storage is unreadable
    #[command]
    Reload,

    // ========== Events ==========
    /// Event: A list was read from storage
    #[event]
    TodosLoaded {
        /// The loaded list
        todos: TodoList,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: &str, text: &str, completed: bool) -> Todo {
        Todo {
            completed,
            ..Todo::new(TodoId::new(id), text, None)
        }
    }

    #[test]
    fn todo_new_trims_text() {
        let item = Todo::new(TodoId::new("1"), "  Buy milk \n", None);

        assert_eq!(item.text, "Buy milk");
        assert!(!item.completed);
        assert_eq!(item.created_at, None);
    }

    #[test]
    fn todo_toggled_flips_only_completion() {
        let item = todo("1", "A", false);
        let toggled = item.toggled();

        assert!(toggled.completed);
        assert_eq!(toggled.id, item.id);
        assert_eq!(toggled.text, item.text);
    }

    #[test]
    fn todo_list_equality_is_by_content() {
        let a: TodoList = vec![todo("1", "A", false)].into_iter().collect();
        let b: TodoList = vec![todo("1", "A", false)].into_iter().collect();

        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a.clone()));
    }

    #[test]
    fn todo_list_lookup() {
        let list: TodoList = vec![todo("1", "A", false), todo("2", "B", true)]
            .into_iter()
            .collect();

        assert_eq!(list.position(&TodoId::new("2")), Some(1));
        assert!(list.contains(&TodoId::new("1")));
        assert!(list.get(&TodoId::new("3")).is_none());
    }

    #[test]
    fn filter_parse_is_lenient() {
        assert_eq!(Filter::parse("active"), Filter::Active);
        assert_eq!(Filter::parse(" Completed "), Filter::Completed);
        assert_eq!(Filter::parse("all"), Filter::All);
        assert_eq!(Filter::parse("unknown"), Filter::All);
        assert_eq!(Filter::parse(""), Filter::All);
    }

    #[test]
    fn filter_round_trips_through_its_name() {
        for filter in Filter::ALL {
            assert_eq!(Filter::from(filter.as_str()), filter);
        }
    }

    #[test]
    fn todo_serializes_with_persisted_field_names() {
        let json = serde_json::json!({ "id": "1", "text": "A", "completed": true });
        let parsed: Todo = serde_json::from_value(json).unwrap();

        assert_eq!(parsed, todo("1", "A", true));
        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            serde_json::json!({ "id": "1", "text": "A", "completed": true })
        );
    }

    #[test]
    fn todo_created_at_is_epoch_millis() {
        let created = DateTime::from_timestamp_millis(1_735_689_600_123).unwrap();
        let item = Todo::new(TodoId::new("1"), "A", Some(created));

        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["createdAt"], 1_735_689_600_123_i64);
    }

    #[test]
    fn todo_action_classification() {
        let add = TodoAction::AddTodo {
            text: "A".to_string(),
        };
        let loaded = TodoAction::TodosLoaded {
            todos: TodoList::new(),
        };

        assert!(add.is_command());
        assert!(!add.is_event());
        assert!(loaded.is_event());
        assert_eq!(loaded.name(), "TodosLoaded");
    }
}
