//! User interface events and the actions they stand for.
//!
//! A front end reports what happened in its own terms; [`intent`] decides
//! which [`TodoAction`], if any, that amounts to. Rows are addressed by the
//! `data-id` the view put on them, never by position.

use crate::storage::STORAGE_KEY;
use crate::types::{Filter, TodoAction, TodoId};

/// Keys the inputs react to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Submit
    Enter,
    /// Abandon
    Escape,
    /// Anything else
    Other,
}

/// Something the user did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// Key pressed in the new-task input
    NewTaskKey {
        /// Which key
        key: Key,
        /// Input contents at the time
        value: String,
    },
    /// Checkbox of a row clicked
    ToggleClicked {
        /// Row's `data-id`
        id: TodoId,
    },
    /// Delete button of a row clicked
    DeleteClicked {
        /// Row's `data-id`
        id: TodoId,
    },
    /// Label of a row double clicked
    LabelDoubleClicked {
        /// Row's `data-id`
        id: TodoId,
    },
    /// Key pressed in the edit input
    EditKey {
        /// Which key
        key: Key,
        /// Input contents at the time
        value: String,
    },
    /// Edit input lost focus
    EditBlurred {
        /// Input contents at the time
        value: String,
    },
    /// Filter button clicked
    FilterClicked {
        /// The button's `data-filter`
        filter: String,
    },
    /// Clear-completed button clicked
    ClearCompletedClicked,
    /// Another session wrote to storage
    StorageChanged {
        /// Key that changed
        key: String,
    },
}

/// Maps an event to the action it requests
///
/// Returns `None` for events that request nothing, such as ordinary typing
/// or a storage change under an unrelated key.
#[must_use]
pub fn intent(event: UiEvent) -> Option<TodoAction> {
    match event {
        UiEvent::NewTaskKey {
            key: Key::Enter,
            value,
        } => Some(TodoAction::AddTodo { text: value }),
        UiEvent::ToggleClicked { id } => Some(TodoAction::ToggleTodo { id }),
        UiEvent::DeleteClicked { id } => Some(TodoAction::RemoveTodo { id }),
        UiEvent::LabelDoubleClicked { id } => Some(TodoAction::BeginEdit { id }),
        UiEvent::EditKey {
            key: Key::Enter,
            value,
        }
        | UiEvent::EditBlurred { value } => Some(TodoAction::CommitEdit { text: value }),
        UiEvent::EditKey {
            key: Key::Escape, ..
        } => Some(TodoAction::CancelEdit),
        UiEvent::FilterClicked { filter } => Some(TodoAction::SetFilter {
            filter: Filter::parse(&filter),
        }),
        UiEvent::ClearCompletedClicked => Some(TodoAction::ClearCompleted),
        UiEvent::StorageChanged { key } if key == STORAGE_KEY => Some(TodoAction::Reload),
        UiEvent::NewTaskKey { .. } | UiEvent::EditKey { .. } | UiEvent::StorageChanged { .. } => {
            None
        },
    }
}
