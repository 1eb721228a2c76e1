//! The controller: owns the store and the surfaces.
//!
//! Every user event goes through [`App::dispatch`], which turns it into an
//! action, runs it to completion in the store, and redraws every surface from
//! the resulting state.

use crate::error::AppError;
use crate::events::{self, UiEvent};
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::surface::Surface;
use crate::types::{TodoAction, TodoState};
use crate::view::{render_app, View};
use tasklist_runtime::{Store, StoreConfig};

/// Store specialised to the task list
pub type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Task list controller
pub struct App {
    store: TodoStore,
    surfaces: Vec<Box<dyn Surface>>,
}

impl App {
    /// Creates the app around the list saved in the environment's repository
    #[must_use]
    pub fn new(environment: TodoEnvironment, config: StoreConfig) -> Self {
        let todos = environment.repository.load();
        tracing::info!(count = todos.len(), "Task list loaded");

        let store = Store::with_config(
            TodoState::with_todos(todos),
            TodoReducer::new(),
            environment,
            config,
        );

        Self {
            store,
            surfaces: Vec::new(),
        }
    }

    /// Adds a surface to redraw after every change
    #[must_use]
    pub fn with_surface(mut self, surface: Box<dyn Surface>) -> Self {
        self.surfaces.push(surface);
        self
    }

    /// Handles one user event
    ///
    /// Events that request nothing leave state and surfaces alone.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if the store rejects the action or a surface
    /// cannot be written.
    pub fn dispatch(&mut self, event: UiEvent) -> Result<(), AppError> {
        let Some(action) = events::intent(event) else {
            tracing::trace!("Event requested no action");
            return Ok(());
        };
        self.send(action)
    }

    /// Handles several events, redrawing once at the end
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] on the first rejected action or failed redraw.
    /// Events before a rejected one have been applied.
    pub fn dispatch_all<I>(&mut self, batch: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = UiEvent>,
    {
        let mut applied = false;
        for action in batch.into_iter().filter_map(events::intent) {
            self.apply(action)?;
            applied = true;
        }

        if applied { self.render() } else { Ok(()) }
    }

    /// Runs `action` through the store and redraws
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if the store rejects the action or a surface
    /// cannot be written.
    pub fn send(&mut self, action: TodoAction) -> Result<(), AppError> {
        self.apply(action)?;
        self.render()
    }

    fn apply(&mut self, action: TodoAction) -> Result<(), AppError> {
        tracing::debug!(action = action.name(), "Dispatching action");
        self.store.send(action)?;
        Ok(())
    }

    /// Redraws every surface from the current state
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if a surface cannot be written.
    pub fn render(&mut self) -> Result<(), AppError> {
        let view = self.view();
        for surface in &mut self.surfaces {
            surface.present(&view)?;
        }
        Ok(())
    }

    /// The view for the current state
    #[must_use]
    pub fn view(&self) -> View {
        self.store
            .state(|state| render_app(&state.todos, state.filter, state.editing.as_ref()))
    }

    /// Read current state via a closure
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&TodoState) -> T,
    {
        self.store.state(f)
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("todos", &self.state(|s| s.todos.len()))
            .field("surfaces", &self.surfaces.len())
            .finish_non_exhaustive()
    }
}
