//! Pure task-list operations.
//!
//! Every function takes the current list and returns the next one without
//! touching its input. When an operation has nothing to do (blank text,
//! unknown id, nothing completed) it hands back the input handle itself, so
//! callers can detect a no-op with [`TodoList::ptr_eq`]. Entries an operation
//! does not change are shared with the input.

use crate::types::{Filter, Todo, TodoId, TodoList};
use chrono::SubsecRound;
use std::sync::Arc;
use tasklist_core::environment::{Clock, IdGenerator};

/// Creates a task with trimmed text, a fresh id, and a millisecond timestamp
///
/// The timestamp is truncated to what the persisted format can carry, so a
/// saved and reloaded task compares equal to the original.
#[must_use]
pub fn create(text: &str, ids: &dyn IdGenerator, clock: &dyn Clock) -> Todo {
    Todo::new(
        TodoId::new(ids.next_id()),
        text,
        Some(clock.now().trunc_subsecs(3)),
    )
}

/// Draws from the generator before falling back to suffixed ids
const MAX_ID_DRAWS: usize = 8;

/// Appends a task, unless `text` is blank
///
/// Should the generator hand out an id already in the list, it is asked
/// again; after [`MAX_ID_DRAWS`] collisions the last id gets a numeric suffix.
#[must_use]
pub fn add(todos: &TodoList, text: &str, ids: &dyn IdGenerator, clock: &dyn Clock) -> TodoList {
    if text.trim().is_empty() {
        return todos.clone();
    }

    let mut todo = create(text, ids, clock);
    todo.id = unique_id(todos, todo.id, ids);

    todos
        .iter()
        .cloned()
        .chain(std::iter::once(Arc::new(todo)))
        .collect()
}

/// Removes the task with `id`
#[must_use]
pub fn remove(todos: &TodoList, id: &TodoId) -> TodoList {
    if !todos.contains(id) {
        return todos.clone();
    }

    todos.iter().filter(|todo| &todo.id != id).cloned().collect()
}

/// Flips `completed` on the task with `id`
#[must_use]
pub fn toggle(todos: &TodoList, id: &TodoId) -> TodoList {
    replace(todos, id, |todo| Some(todo.toggled()))
}

/// Replaces the text of the task with `id`, unless `text` is blank
#[must_use]
pub fn edit(todos: &TodoList, id: &TodoId, text: &str) -> TodoList {
    let text = text.trim();
    if text.is_empty() {
        return todos.clone();
    }

    replace(todos, id, |todo| {
        (todo.text != text).then(|| todo.with_text(text.to_string()))
    })
}

/// Removes every completed task, keeping the order of the rest
#[must_use]
pub fn clear_completed(todos: &TodoList) -> TodoList {
    if !todos.iter().any(|todo| todo.completed) {
        return todos.clone();
    }

    todos.iter().filter(|todo| !todo.completed).cloned().collect()
}

/// Tasks belonging to `filter`, in list order
#[must_use]
pub fn filter(todos: &TodoList, filter: Filter) -> Vec<Arc<Todo>> {
    todos
        .iter()
        .filter(|todo| filter.matches(todo))
        .cloned()
        .collect()
}

/// Number of tasks not yet completed
#[must_use]
pub fn count_active(todos: &TodoList) -> usize {
    todos.iter().filter(|todo| !todo.completed).count()
}

/// Number of completed tasks
#[must_use]
pub fn count_completed(todos: &TodoList) -> usize {
    todos.len() - count_active(todos)
}

/// First id not present in `todos`, starting from `candidate`
fn unique_id(todos: &TodoList, candidate: TodoId, ids: &dyn IdGenerator) -> TodoId {
    let mut candidate = candidate;
    for _ in 0..MAX_ID_DRAWS {
        if !todos.contains(&candidate) {
            return candidate;
        }
        candidate = TodoId::new(ids.next_id());
    }

    let base = candidate.to_string();
    (1..)
        .map(|n| TodoId::new(format!("{base}-{n}")))
        .find(|id| !todos.contains(id))
        .unwrap_or(candidate)
}

/// Swaps the entry with `id` for `change(entry)`
///
/// Returns the input handle when there is no such entry or `change` declines.
fn replace<F>(todos: &TodoList, id: &TodoId, change: F) -> TodoList
where
    F: FnOnce(&Todo) -> Option<Todo>,
{
    let Some(index) = todos.position(id) else {
        return todos.clone();
    };
    let Some(updated) = change(todos[index].as_ref()) else {
        return todos.clone();
    };

    let mut entries = todos.entries().to_vec();
    entries[index] = Arc::new(updated);
    entries.into_iter().collect()
}
