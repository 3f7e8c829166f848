//! Story document representation
//!
//! A story is a flat list of states keyed by id. Each state is one of three
//! kinds: a sequence of printed lines, a text input, or a multiple choice.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::contracts::InterpreterError;

/// Event name of the transition taken when an input is submitted
pub const SUBMIT_EVENT: &str = "SUBMIT";
/// Event name of the acknowledgement that resumes a parked sequence
pub const ENTER_EVENT: &str = "ENTER";

/// A complete story document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Story {
    pub id: String,
    pub version: String,
    /// Initial variable snapshot
    #[serde(default)]
    pub context: StoryContext,
    /// Id of the state entered on start
    pub start: String,
    pub states: Vec<StateDef>,
}

impl Story {
    /// Find a state by id. When ids are duplicated the last declaration wins.
    pub fn state(&self, id: &str) -> Option<&StateDef> {
        self.states.iter().rev().find(|state| state.id() == id)
    }
}

/// Initial interpreter context carried by a story
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoryContext {
    #[serde(default)]
    pub vars: HashMap<String, String>,
}

/// A named node in the narrative graph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StateDef {
    Sequence(SequenceState),
    Input(InputState),
    Choice(ChoiceState),
}

impl StateDef {
    pub fn id(&self) -> &str {
        match self {
            StateDef::Sequence(state) => &state.id,
            StateDef::Input(state) => &state.id,
            StateDef::Choice(state) => &state.id,
        }
    }

    /// Short kind name, as written in the document's `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            StateDef::Sequence(_) => "sequence",
            StateDef::Input(_) => "input",
            StateDef::Choice(_) => "choice",
        }
    }

    /// Only sequences carry the terminal flag
    pub fn is_terminal(&self) -> bool {
        matches!(self, StateDef::Sequence(state) if state.terminal)
    }

    pub fn as_sequence(&self) -> Result<&SequenceState, InterpreterError> {
        match self {
            StateDef::Sequence(state) => Ok(state),
            other => Err(InterpreterError::wrong_kind(other, "sequence")),
        }
    }

    pub fn as_input(&self) -> Result<&InputState, InterpreterError> {
        match self {
            StateDef::Input(state) => Ok(state),
            other => Err(InterpreterError::wrong_kind(other, "input")),
        }
    }

    pub fn as_choice(&self) -> Result<&ChoiceState, InterpreterError> {
        match self {
            StateDef::Choice(state) => Ok(state),
            other => Err(InterpreterError::wrong_kind(other, "choice")),
        }
    }

    /// Every state id this state can lead to, in declaration order.
    ///
    /// A sequence that awaits an event never takes its `next`.
    pub fn successors(&self) -> Vec<&str> {
        match self {
            StateDef::Sequence(state) => state
                .next
                .iter()
                .filter(|_| state.await_event.is_none())
                .chain(state.on.values())
                .map(String::as_str)
                .collect(),
            StateDef::Input(state) => state.transitions.iter().map(|t| t.to.as_str()).collect(),
            StateDef::Choice(state) => state.choices.iter().map(|c| c.to.as_str()).collect(),
        }
    }
}

/// Prints its lines in order, then advances, parks, or ends
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SequenceState {
    pub id: String,
    #[serde(default)]
    pub lines: Vec<Line>,
    /// Run on entry, before the first line
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Explicit successor once all lines are printed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Event to wait for after the last line, instead of advancing
    #[serde(rename = "await", default, skip_serializing_if = "Option::is_none")]
    pub await_event: Option<String>,
    /// Event name to successor state id
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub on: HashMap<String, String>,
    #[serde(default)]
    pub terminal: bool,
}

/// One printed line of a sequence
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Line {
    /// Template, `{var}` tokens are substituted before printing
    pub text: String,
    /// Pause after the line, in milliseconds
    #[serde(default, deserialize_with = "lenient_delay")]
    pub delay: u64,
    #[serde(default)]
    pub instant: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<u64>,
}

impl Line {
    pub fn print_options(&self) -> PrintOptions {
        PrintOptions {
            instant: self.instant,
            speed: self.speed,
        }
    }
}

/// Any JSON number is accepted; zero, negative and non-finite values mean no pause.
/// Fractions round up so a positive delay always waits.
fn lenient_delay<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let millis = f64::deserialize(deserializer)?;
    Ok(if millis.is_finite() && millis > 0.0 {
        millis.ceil() as u64
    } else {
        0
    })
}

/// Rendering hints handed to the terminal alongside a printed line
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrintOptions {
    pub instant: bool,
    /// Milliseconds per character
    pub speed: Option<u64>,
}

/// Solicits one line of text from the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputState {
    pub id: String,
    pub input: InputSpec,
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

impl InputState {
    pub fn submit_transition(&self) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.event == SUBMIT_EVENT)
    }
}

/// What the terminal should present for a text input
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InputSpec {
    /// Field identifier
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub trim: bool,
}

/// Presents a prompt and a list of options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceState {
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub choices: Vec<ChoiceOption>,
}

impl ChoiceState {
    pub fn option(&self, choice_id: &str) -> Option<&ChoiceOption> {
        self.choices.iter().find(|c| c.id == choice_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChoiceOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub actions: Vec<Action>,
    pub to: String,
}

/// An event-triggered move to another state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transition {
    pub event: String,
    /// All must pass, checked in order
    #[serde(default)]
    pub guards: Vec<Guard>,
    /// Run only once every guard passed
    #[serde(default)]
    pub actions: Vec<Action>,
    pub to: String,
}

/// Predicate over a submitted value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Guard {
    #[serde(rename = "minLength")]
    MinLength { value: usize },
    /// Kinds this version does not know; they always pass
    #[serde(other)]
    Unknown,
}

/// Mutation of the variable store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    Set {
        var: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<ValueSource>,
    },
    /// Kinds this version does not know; they are skipped
    #[serde(other)]
    Unknown,
}

/// Where a `set` action takes its value from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    /// The value currently being submitted
    Input,
}
