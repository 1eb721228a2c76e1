//! Reducer logic for the task list.
//!
//! Commands are applied through the pure functions in [`crate::domain`]. When
//! a command leaves the list untouched (blank text, unknown id) the reducer
//! returns no effects; otherwise it swaps in the new list and returns one
//! effect that saves it.

use crate::domain;
use crate::storage::TodoRepository;
use crate::types::{TodoAction, TodoList, TodoState};
use std::sync::Arc;
use tasklist_core::{
    effect::Effect,
    environment::{Clock, IdGenerator},
    reducer::Reducer,
    smallvec, SmallVec,
};

/// Environment dependencies for the task list reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
    /// Source of ids for new tasks
    pub ids: Arc<dyn IdGenerator>,
    /// Where the list is saved and loaded
    pub repository: TodoRepository,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        repository: TodoRepository,
    ) -> Self {
        Self {
            clock,
            ids,
            repository,
        }
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

/// Reducer for the task list
#[derive(Clone, Debug)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Installs `next` if it differs from the current list
    ///
    /// Returns the effect that persists it, or nothing for a no-op.
    fn commit(
        state: &mut TodoState,
        next: TodoList,
        env: &TodoEnvironment,
    ) -> SmallVec<[Effect<TodoAction>; 4]> {
        if next.ptr_eq(&state.todos) {
            return SmallVec::new();
        }

        state.todos = next;
        Self::forget_missing_edit(state);

        let repository = env.repository.clone();
        let todos = state.todos.clone();
        smallvec![Effect::run(move || {
            repository.save(&todos);
            None
        })]
    }

    /// Leaves edit mode if the task being edited no longer exists
    fn forget_missing_edit(state: &mut TodoState) {
        if state
            .editing
            .as_ref()
            .is_some_and(|id| !state.todos.contains(id))
        {
            state.editing = None;
        }
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            TodoAction::AddTodo { text } => {
                let next = domain::add(&state.todos, &text, env.ids.as_ref(), env.clock.as_ref());
                Self::commit(state, next, env)
            },

            TodoAction::ToggleTodo { id } => {
                let next = domain::toggle(&state.todos, &id);
                Self::commit(state, next, env)
            },

            TodoAction::EditTodo { id, text } => {
                let next = domain::edit(&state.todos, &id, &text);
                Self::commit(state, next, env)
            },

            TodoAction::RemoveTodo { id } => {
                let next = domain::remove(&state.todos, &id);
                Self::commit(state, next, env)
            },

            TodoAction::ClearCompleted => {
                let next = domain::clear_completed(&state.todos);
                Self::commit(state, next, env)
            },

            TodoAction::SetFilter { filter } => {
                state.filter = filter;
                SmallVec::new()
            },

            TodoAction::BeginEdit { id } => {
                if state.todos.contains(&id) {
                    state.editing = Some(id);
                }
                SmallVec::new()
            },

            TodoAction::CommitEdit { text } => {
                let Some(id) = state.editing.take() else {
                    return SmallVec::new();
                };
                let next = domain::edit(&state.todos, &id, &text);
                Self::commit(state, next, env)
            },

            TodoAction::CancelEdit => {
                state.editing = None;
                SmallVec::new()
            },

            TodoAction::Reload => {
                let repository = env.repository.clone();
                // An unreadable store keeps the list we have
                smallvec![Effect::run(move || {
                    repository
                        .try_load()
                        .map(|todos| TodoAction::TodosLoaded { todos })
                })]
            },

            // ========== Events ==========
            TodoAction::TodosLoaded { todos } => {
                // Already persisted elsewhere; only adopt it
                state.todos = todos;
                Self::forget_missing_edit(state);
                SmallVec::new()
            },
        }
    }
}
