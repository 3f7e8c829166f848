//! Core types for the termtale library
//!
//! - Story: the declarative document (states, transitions, guards, actions)
//! - State: interpreter runtime state (mode, pending marker, variables)

pub mod state;
pub mod story;

pub use state::{Mode, Pending, PendingKind, RuntimeState};
pub use story::{
    Action, ChoiceOption, ChoiceState, Guard, InputSpec, InputState, Line, PrintOptions,
    SequenceState, StateDef, Story, StoryContext, Transition, ValueSource,
};
