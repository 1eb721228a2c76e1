//! # Tasklist Runtime
//!
//! Runtime implementation for the Tasklist reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state and is its only writer
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to the reducer
//! - **Event Loop**: Drains the action → reducer → effects → action feedback loop
//!
//! Everything runs on the caller's thread. `send` returns once the action and
//! every action its effects produced have been reduced, so a caller that reads
//! state right after `send` always sees the result.
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_runtime::Store;
//!
//! let mut store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething)?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field);
//! ```

use std::collections::VecDeque;
use tasklist_core::{effect::Effect, reducer::Reducer};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects kept producing actions past the configured limit
        ///
        /// The state reflects every action reduced before the limit was hit.
        #[error("Effect feedback exceeded {0} actions")]
        FeedbackLimitExceeded(usize),
    }
}

pub use error::StoreError;
pub use store::Store;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use tasklist_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_max_feedback_actions(16);
/// assert_eq!(config.max_feedback_actions, 16);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum number of actions fed back by effects during one `send`
    pub max_feedback_actions: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(max_feedback_actions: usize) -> Self {
        Self {
            max_feedback_actions,
        }
    }

    /// Set the feedback limit
    #[must_use]
    pub const fn with_max_feedback_actions(mut self, limit: usize) -> Self {
        self.max_feedback_actions = limit;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_feedback_actions: 64,
        }
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{Effect, Reducer, StoreConfig, StoreError, VecDeque};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (owned, mutated only through `send`)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: S,
        reducer: R,
        environment: E,
        config: StoreConfig,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        A: std::fmt::Debug,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new store with explicit configuration
        #[must_use]
        pub const fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            Self {
                state: initial_state,
                reducer,
                environment,
                config,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Calls reducer with (state, action, environment)
        /// 2. Executes returned effects in order
        /// 3. Actions produced by effects are reduced next, first in first out
        /// 4. Returns when no action is left
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::FeedbackLimitExceeded`] if effects produce more
        /// than `max_feedback_actions` actions. Remaining actions are dropped.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic propagates.
        /// Reducers should be pure functions that do not panic.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&mut self, action: A) -> Result<(), StoreError> {
            metrics::counter!("store.commands.total").increment(1);

            let mut queue = VecDeque::from([action]);
            let mut fed_back = 0usize;

            while let Some(action) = queue.pop_front() {
                tracing::debug!(?action, "Processing action");

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut self.state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                let queued = queue.len();
                for effect in effects {
                    Self::execute_effect(effect, &mut queue);
                }

                fed_back += queue.len() - queued;
                if fed_back > self.config.max_feedback_actions {
                    tracing::error!(
                        limit = self.config.max_feedback_actions,
                        dropped = queue.len(),
                        "Effect feedback limit exceeded"
                    );
                    metrics::counter!("store.feedback.limit_exceeded").increment(1);
                    return Err(StoreError::FeedbackLimitExceeded(
                        self.config.max_feedback_actions,
                    ));
                }
            }

            Ok(())
        }

        /// Execute a single effect, queueing any action it produces
        fn execute_effect(effect: Effect<A>, queue: &mut VecDeque<A>) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Sequential(effects) => {
                    tracing::trace!("Executing Effect::Sequential with {} effects", effects.len());
                    metrics::counter!("store.effects.executed", "type" => "sequential")
                        .increment(1);
                    for effect in effects {
                        Self::execute_effect(effect, queue);
                    }
                },
                Effect::Run(work) => {
                    metrics::counter!("store.effects.executed", "type" => "run").increment(1);
                    if let Some(action) = work() {
                        tracing::trace!("Effect::Run produced an action, feeding back");
                        queue.push_back(action);
                    }
                },
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Borrow the injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Consume the store, returning its final state
        #[must_use]
        pub fn into_state(self) -> S {
            self.state
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_core::{smallvec, SmallVec};

    #[derive(Clone, Debug, Default)]
    struct TestState {
        value: i32,
        log: Vec<&'static str>,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        IncrementTwiceLater,
        Record(&'static str),
        Loop,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut TestState,
            action: TestAction,
            _env: &(),
        ) -> SmallVec<[Effect<TestAction>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::IncrementTwiceLater => smallvec![Effect::chain(vec![
                    Effect::run(|| Some(TestAction::Increment)),
                    Effect::run(|| Some(TestAction::Record("after"))),
                    Effect::run(|| Some(TestAction::Increment)),
                ])],
                TestAction::Record(entry) => {
                    state.log.push(entry);
                    smallvec![Effect::None]
                },
                TestAction::Loop => smallvec![Effect::run(|| Some(TestAction::Loop))],
            }
        }
    }

    #[test]
    fn test_send_updates_state() {
        let mut store = Store::new(TestState::default(), TestReducer, ());

        assert!(store.send(TestAction::Increment).is_ok());
        assert!(store.send(TestAction::Increment).is_ok());

        assert_eq!(store.state(|s| s.value), 2);
    }

    #[test]
    fn test_feedback_runs_before_send_returns() {
        let mut store = Store::new(TestState::default(), TestReducer, ());

        assert!(store.send(TestAction::IncrementTwiceLater).is_ok());

        assert_eq!(store.state(|s| s.value), 2);
        assert_eq!(store.state(|s| s.log.clone()), vec!["after"]);
    }

    #[test]
    fn test_feedback_limit() {
        let config = StoreConfig::default().with_max_feedback_actions(5);
        let mut store = Store::with_config(TestState::default(), TestReducer, (), config);

        let result = store.send(TestAction::Loop);

        assert_eq!(result, Err(StoreError::FeedbackLimitExceeded(5)));
        // Store stays usable
        assert!(store.send(TestAction::Increment).is_ok());
        assert_eq!(store.into_state().value, 1);
    }
}
