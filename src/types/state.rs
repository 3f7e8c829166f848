//! Runtime state representation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// What the interpreter is currently doing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Idle,
    /// A line sequence is printing
    Running,
    WaitingForInput,
    WaitingForChoice,
    WaitingForEnter,
    Ended,
}

impl Mode {
    pub fn is_waiting(self) -> bool {
        matches!(
            self,
            Mode::WaitingForInput | Mode::WaitingForChoice | Mode::WaitingForEnter
        )
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Idle => "idle",
            Mode::Running => "running",
            Mode::WaitingForInput => "waiting_for_input",
            Mode::WaitingForChoice => "waiting_for_choice",
            Mode::WaitingForEnter => "waiting_for_enter",
            Mode::Ended => "ended",
        };
        f.write_str(name)
    }
}

/// External event kinds the interpreter can park on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingKind {
    Input,
    Choice,
    Enter,
}

impl PendingKind {
    /// The waiting mode that accompanies this marker
    pub fn mode(self) -> Mode {
        match self {
            PendingKind::Input => Mode::WaitingForInput,
            PendingKind::Choice => Mode::WaitingForChoice,
            PendingKind::Enter => Mode::WaitingForEnter,
        }
    }
}

/// The interaction currently awaited, and for which state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pending {
    pub kind: PendingKind,
    pub state_id: String,
}

/// Mutable interpreter state. Only the interpreter writes to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeState {
    pub mode: Mode,
    pub current: Option<String>,
    pub pending: Option<Pending>,
    pub vars: HashMap<String, String>,
    /// Bumped by every new line sequence, start and stop
    pub generation: u64,
}

impl RuntimeState {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self {
            vars,
            ..Default::default()
        }
    }

    /// Park on `kind` for `state_id`, keeping mode and marker in step
    pub fn park(&mut self, kind: PendingKind, state_id: &str) {
        self.mode = kind.mode();
        self.current = Some(state_id.to_string());
        self.pending = Some(Pending {
            kind,
            state_id: state_id.to_string(),
        });
    }

    pub fn pending_for(&self, kind: PendingKind) -> Option<&str> {
        self.pending
            .as_ref()
            .filter(|pending| pending.kind == kind)
            .map(|pending| pending.state_id.as_str())
    }

    /// Start a new generation and return it
    pub fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}
