//! Public contracts - Stable interfaces between the interpreter and its host
//!
//! The host owns rendering. The interpreter reaches it only through the
//! [`Terminal`] trait and reports fatal conditions through [`InterpreterError`].

use async_trait::async_trait;

use crate::types::story::{ChoiceOption, InputSpec, PrintOptions, StateDef};
use crate::types::state::Mode;

/// Output surface implemented by the rendering layer
///
/// The async methods are suspension points: the interpreter awaits each one
/// before doing anything else in the same line sequence. A call that never
/// completes parks that sequence forever.
///
/// `on_state_change` and the synchronous part of each async method up to its
/// first suspension run while the interpreter holds its sequencing gate, so
/// they must not call `start`, `stop` or `enter` on the same interpreter.
#[async_trait]
pub trait Terminal: Send + Sync {
    /// Render one line of text
    async fn print(&self, text: &str, options: PrintOptions);

    /// Present a text-entry affordance
    async fn show_input(&self, spec: &InputSpec);

    /// Present a prompt and its selectable options
    async fn show_choices(&self, prompt: &str, choices: &[ChoiceOption]);

    /// Remove any input or choice affordance currently shown
    fn clear_interactive(&self);

    fn on_state_change(&self, _state_id: &str, _mode: Mode) {}

    /// A guard rejected a submitted value
    fn on_validation_error(&self, _message: &str) {}
}

/// Errors that abort an interpreter operation
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    #[error("start state '{id}' is not declared in story '{story}'")]
    MissingStartState { story: String, id: String },

    #[error("transition to undeclared state '{id}'")]
    UnknownState { id: String },

    #[error("state '{id}' is a {actual} state, expected {expected}")]
    WrongStateKind {
        id: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("line sequence task failed: {message}")]
    TaskFailed { message: String },
}

impl InterpreterError {
    pub fn unknown_state(id: impl Into<String>) -> Self {
        Self::UnknownState { id: id.into() }
    }

    pub fn wrong_kind(state: &StateDef, expected: &'static str) -> Self {
        Self::WrongStateKind {
            id: state.id().to_string(),
            expected,
            actual: state.kind(),
        }
    }

    pub fn task_failed(message: impl Into<String>) -> Self {
        Self::TaskFailed {
            message: message.into(),
        }
    }
}
