//! Narrative interpreter
//!
//! Drives a [`Story`] against a host [`Terminal`]. Line sequences run as
//! background tasks that await every print and delay; each one holds a
//! generation number and abandons itself as soon as a newer sequence,
//! `start` or `stop` has taken over.
//!
//! ```no_run
//! use std::sync::Arc;
//! use termtale::{Interpreter, Terminal};
//!
//! # async fn run(story: termtale::Story, terminal: Arc<dyn Terminal>) -> Result<(), termtale::InterpreterError> {
//! let interpreter = Interpreter::new(story, terminal)?;
//! interpreter.start().await?;
//! interpreter.settle().await?;
//! interpreter.submit("Bea").await?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::future::{Future, poll_fn};
use std::pin::{Pin, pin};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::Poll;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::contracts::{InterpreterError, Terminal};
use crate::types::{
    state::{Mode, Pending, PendingKind, RuntimeState},
    story::{Action, ENTER_EVENT, StateDef, Story},
};

pub mod debug;
pub mod interpolate;
pub mod rules;


use debug::{DebugCategory, DebugConfig, LogLevel};

type StepFuture<'a> = Pin<Box<dyn Future<Output = Result<(), InterpreterError>> + Send + 'a>>;

/// Interpreter settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterpreterConfig {
    #[serde(default)]
    pub debug: DebugConfig,
}

/// Cheap to clone; clones share the same story position and variables.
#[derive(Clone)]
pub struct Interpreter {
    shared: Arc<Shared>,
}

struct Shared {
    story: Story,
    /// State id to position in `story.states`
    index: HashMap<String, usize>,
    terminal: Arc<dyn Terminal>,
    config: InterpreterConfig,
    runtime: Mutex<RuntimeState>,
    /// Held while a generation check is paired with the mode change or
    /// terminal call it guards. Taken before `runtime`, never after.
    gate: Mutex<()>,
    /// Most recently spawned line sequence
    task: Mutex<Option<JoinHandle<Result<(), InterpreterError>>>>,
}

enum Submission {
    Accepted { to: String, generation: u64 },
    Rejected { message: String },
}

/// How a line sequence ends once its lines are out
enum Finish<'a> {
    Superseded,
    Notify(Mode),
    Advance(&'a str),
}

impl Interpreter {
    pub fn new(story: Story, terminal: Arc<dyn Terminal>) -> Result<Self, InterpreterError> {
        Self::with_config(story, terminal, InterpreterConfig::default())
    }

    /// Fails when the story's start state is not declared.
    pub fn with_config(
        story: Story,
        terminal: Arc<dyn Terminal>,
        config: InterpreterConfig,
    ) -> Result<Self, InterpreterError> {
        let index: HashMap<String, usize> = story
            .states
            .iter()
            .enumerate()
            .map(|(position, state)| (state.id().to_string(), position))
            .collect();

        if !index.contains_key(&story.start) {
            return Err(InterpreterError::MissingStartState {
                story: story.id.clone(),
                id: story.start.clone(),
            });
        }

        let runtime = RuntimeState::new(story.context.vars.clone());
        Ok(Self {
            shared: Arc::new(Shared {
                story,
                index,
                terminal,
                config,
                runtime: Mutex::new(runtime),
                gate: Mutex::new(()),
                task: Mutex::new(None),
            }),
        })
    }

    pub fn story(&self) -> &Story {
        &self.shared.story
    }

    pub fn mode(&self) -> Mode {
        self.lock().mode
    }

    /// `None` until the first state has been entered
    pub fn current_state_id(&self) -> Option<String> {
        self.lock().current.clone()
    }

    pub fn pending(&self) -> Option<Pending> {
        self.lock().pending.clone()
    }

    /// Snapshot of the variable store
    pub fn vars(&self) -> HashMap<String, String> {
        self.lock().vars.clone()
    }

    pub fn var(&self, name: &str) -> Option<String> {
        self.lock().vars.get(name).cloned()
    }

    /// Enter the start state, superseding anything in flight.
    ///
    /// Variables are kept as they are; only mode and the pending marker reset.
    pub async fn start(&self) -> Result<(), InterpreterError> {
        let generation = {
            let _gate = self.gate();
            let mut runtime = self.lock();
            runtime.pending = None;
            runtime.bump_generation()
        };
        let story = &self.shared.story;
        self.log(
            DebugCategory::Engine,
            LogLevel::Info,
            &format!("[Start] story '{}' v{} at '{}'", story.id, story.version, story.start),
        );
        self.shared.terminal.clear_interactive();
        self.enter_state(&story.start, generation).await
    }

    /// Abandon any running sequence and end the story. Idempotent.
    pub fn stop(&self) {
        let _gate = self.gate();
        let current = {
            let mut runtime = self.lock();
            runtime.bump_generation();
            runtime.pending = None;
            runtime.mode = Mode::Ended;
            runtime.current.clone().unwrap_or_default()
        };
        self.log(DebugCategory::Engine, LogLevel::Info, "[Stop] story stopped");
        self.notify(&current, Mode::Ended);
    }

    /// Submit text to the input currently shown.
    ///
    /// Ignored unless waiting for input. A failing guard reports through
    /// [`Terminal::on_validation_error`] and keeps waiting.
    pub async fn submit(&self, value: &str) -> Result<(), InterpreterError> {
        let submission = {
            let mut runtime = self.lock();
            let Some(state_id) = runtime.pending_for(PendingKind::Input).map(str::to_string) else {
                self.log(DebugCategory::Flow, LogLevel::Debug, "[Submit] ignored, not waiting for input");
                return Ok(());
            };
            let input = self.state(&state_id)?.as_input()?;
            let value = rules::normalize_input(&input.input, value);
            let Some(transition) = input.submit_transition() else {
                self.log(
                    DebugCategory::Flow,
                    LogLevel::Debug,
                    &format!("[Submit] ignored, '{state_id}' has no submit transition"),
                );
                return Ok(());
            };

            match rules::evaluate_guards(&transition.guards, &value) {
                Some(message) => Submission::Rejected { message },
                None => {
                    self.state(&transition.to)?;
                    self.run_actions(&mut runtime, &transition.actions, Some(&value));
                    runtime.pending = None;
                    Submission::Accepted {
                        to: transition.to.clone(),
                        generation: runtime.generation,
                    }
                }
            }
        };

        match submission {
            Submission::Rejected { message } => {
                self.log(
                    DebugCategory::Flow,
                    LogLevel::Debug,
                    &format!("[Submit] rejected: {message}"),
                );
                self.shared.terminal.on_validation_error(&message);
                Ok(())
            }
            Submission::Accepted { to, generation } => {
                self.shared.terminal.clear_interactive();
                self.enter_state(&to, generation).await
            }
        }
    }

    /// Pick an option of the choice currently shown. Unknown ids are ignored.
    pub async fn choose(&self, choice_id: &str) -> Result<(), InterpreterError> {
        let (target, generation) = {
            let mut runtime = self.lock();
            let Some(state_id) = runtime.pending_for(PendingKind::Choice).map(str::to_string) else {
                self.log(DebugCategory::Flow, LogLevel::Debug, "[Choose] ignored, not waiting for a choice");
                return Ok(());
            };
            let choice = self.state(&state_id)?.as_choice()?;
            let Some(option) = choice.option(choice_id) else {
                self.log(
                    DebugCategory::Flow,
                    LogLevel::Debug,
                    &format!("[Choose] ignored unknown option '{choice_id}' in '{state_id}'"),
                );
                return Ok(());
            };
            self.state(&option.to)?;
            self.run_actions(&mut runtime, &option.actions, None);
            runtime.pending = None;
            (option.to.clone(), runtime.generation)
        };

        self.shared.terminal.clear_interactive();
        self.enter_state(&target, generation).await
    }

    /// Acknowledge a sequence that is waiting for Enter.
    pub async fn enter(&self) -> Result<(), InterpreterError> {
        let advance = {
            let _gate = self.gate();
            let mut runtime = self.lock();
            let Some(state_id) = runtime.pending_for(PendingKind::Enter).map(str::to_string) else {
                self.log(DebugCategory::Flow, LogLevel::Debug, "[Enter] ignored, nothing to acknowledge");
                return Ok(());
            };
            let sequence = self.state(&state_id)?.as_sequence()?;
            match sequence.on.get(ENTER_EVENT) {
                Some(to) => {
                    self.state(to)?;
                    runtime.pending = None;
                    Some((to.as_str(), runtime.generation))
                }
                None => {
                    runtime.pending = None;
                    runtime.mode = Mode::Ended;
                    drop(runtime);
                    self.log(
                        DebugCategory::Flow,
                        LogLevel::Info,
                        &format!("[Enter] '{state_id}' has no ENTER transition, story ends"),
                    );
                    self.notify(&state_id, Mode::Ended);
                    None
                }
            }
        };

        match advance {
            Some((to, generation)) => self.enter_state(to, generation).await,
            None => Ok(()),
        }
    }

    /// Wait for in-flight line sequences to finish, surfacing their errors.
    ///
    /// Never returns if the terminal never completes a print.
    pub async fn settle(&self) -> Result<(), InterpreterError> {
        loop {
            let handle = self.task_slot().take();
            let Some(handle) = handle else {
                return Ok(());
            };
            match handle.await {
                Ok(result) => result?,
                Err(err) => return Err(InterpreterError::task_failed(err.to_string())),
            }
        }
    }

    /// Enter `target` on behalf of `generation`. A superseded generation
    /// changes nothing.
    fn enter_state<'a>(&'a self, target: &'a str, generation: u64) -> StepFuture<'a> {
        Box::pin(async move {
            let state = self.state(target)?;
            self.log(
                DebugCategory::Engine,
                LogLevel::Debug,
                &format!("[Enter] {} state '{target}'", state.kind()),
            );

            if state.is_terminal() {
                let _gate = self.gate();
                {
                    let mut runtime = self.lock();
                    if !runtime.is_current(generation) {
                        return Ok(());
                    }
                    runtime.current = Some(target.to_string());
                    runtime.pending = None;
                    runtime.mode = Mode::Ended;
                }
                self.notify(target, Mode::Ended);
                return Ok(());
            }

            match state {
                StateDef::Sequence(sequence) => {
                    let generation = {
                        let _gate = self.gate();
                        let generation = {
                            let mut runtime = self.lock();
                            if !runtime.is_current(generation) {
                                return Ok(());
                            }
                            runtime.current = Some(target.to_string());
                            runtime.mode = Mode::Running;
                            runtime.bump_generation()
                        };
                        self.notify(target, Mode::Running);
                        let mut runtime = self.lock();
                        self.run_actions(&mut runtime, &sequence.actions, None);
                        generation
                    };

                    let this = self.clone();
                    let state_id = target.to_string();
                    let handle = tokio::spawn(async move {
                        let result = this.play_lines(&state_id, generation).await;
                        if let Err(err) = &result {
                            log::error!("line sequence '{state_id}' failed: {err}");
                        }
                        result
                    });
                    *self.task_slot() = Some(handle);
                    Ok(())
                }
                StateDef::Input(input) => {
                    if self.park(generation, PendingKind::Input, target) {
                        self.gated(generation, self.shared.terminal.show_input(&input.input))
                            .await;
                    }
                    Ok(())
                }
                StateDef::Choice(choice) => {
                    if self.park(generation, PendingKind::Choice, target) {
                        let prompt = interpolate::interpolate(&choice.prompt, &self.lock().vars);
                        self.gated(
                            generation,
                            self.shared.terminal.show_choices(&prompt, &choice.choices),
                        )
                        .await;
                    }
                    Ok(())
                }
            }
        })
    }

    async fn play_lines(&self, state_id: &str, generation: u64) -> Result<(), InterpreterError> {
        let sequence = self.state(state_id)?.as_sequence()?;

        for (index, line) in sequence.lines.iter().enumerate() {
            let text = interpolate::interpolate(&line.text, &self.lock().vars);
            self.log(
                DebugCategory::Timing,
                LogLevel::Trace,
                &format!("[Line] '{state_id}' #{index}: {text}"),
            );
            let printed = self
                .gated(generation, self.shared.terminal.print(&text, line.print_options()))
                .await;

            if !printed || self.superseded(generation) {
                self.log(
                    DebugCategory::Timing,
                    LogLevel::Debug,
                    &format!("[Line] '{state_id}' superseded, abandoning"),
                );
                return Ok(());
            }
            if line.delay > 0 {
                tokio::time::sleep(Duration::from_millis(line.delay)).await;
            }
        }

        let advance = {
            let _gate = self.gate();
            let finish = {
                let mut runtime = self.lock();
                if !runtime.is_current(generation) {
                    Finish::Superseded
                } else if sequence.await_event.is_some() {
                    runtime.park(PendingKind::Enter, state_id);
                    Finish::Notify(Mode::WaitingForEnter)
                } else if let Some(next) = &sequence.next {
                    Finish::Advance(next)
                } else {
                    runtime.mode = Mode::Ended;
                    Finish::Notify(Mode::Ended)
                }
            };
            match finish {
                Finish::Superseded => {
                    self.log(
                        DebugCategory::Timing,
                        LogLevel::Debug,
                        &format!("[Line] '{state_id}' superseded after its last line"),
                    );
                    None
                }
                Finish::Notify(mode) => {
                    self.notify(state_id, mode);
                    None
                }
                Finish::Advance(next) => Some(next),
            }
        };

        match advance {
            Some(next) => self.enter_state(next, generation).await,
            None => Ok(()),
        }
    }

    /// Park on `kind` and announce it, unless `generation` was superseded
    fn park(&self, generation: u64, kind: PendingKind, state_id: &str) -> bool {
        let _gate = self.gate();
        {
            let mut runtime = self.lock();
            if !runtime.is_current(generation) {
                return false;
            }
            runtime.park(kind, state_id);
        }
        self.notify(state_id, kind.mode());
        true
    }

    /// Run a terminal call to completion if `generation` is still current when
    /// it begins. Returns `false` when the call was skipped.
    ///
    /// The check and the first poll of `call` happen under the gate, and
    /// `start`/`stop` bump the generation under the same gate, so a stale
    /// sequence can never begin a call after either of them.
    async fn gated<F>(&self, generation: u64, call: F) -> bool
    where
        F: Future<Output = ()>,
    {
        let mut call = pin!(call);
        let mut started = false;
        poll_fn(|cx| {
            if !started {
                let _gate = self.gate();
                if !self.lock().is_current(generation) {
                    return Poll::Ready(false);
                }
                started = true;
                return call.as_mut().poll(cx).map(|()| true);
            }
            call.as_mut().poll(cx).map(|()| true)
        })
        .await
    }

    fn run_actions(&self, runtime: &mut RuntimeState, actions: &[Action], submitted: Option<&str>) {
        for written in rules::apply_actions(actions, submitted, &mut runtime.vars) {
            self.log(
                DebugCategory::Variables,
                LogLevel::Debug,
                &format!("[Set] {}={:?} ({})", written.var, written.value, written.source),
            );
        }
    }

    fn superseded(&self, generation: u64) -> bool {
        !self.lock().is_current(generation)
    }

    fn state(&self, id: &str) -> Result<&StateDef, InterpreterError> {
        self.shared
            .index
            .get(id)
            .and_then(|&position| self.shared.story.states.get(position))
            .ok_or_else(|| InterpreterError::unknown_state(id))
    }

    fn notify(&self, state_id: &str, mode: Mode) {
        self.log(
            DebugCategory::Flow,
            LogLevel::Debug,
            &format!("[Mode] '{state_id}' -> {mode}"),
        );
        self.shared.terminal.on_state_change(state_id, mode);
    }

    fn log(&self, category: DebugCategory, level: LogLevel, message: &str) {
        debug::log(&self.shared.config.debug, category, level, message);
    }

    fn lock(&self) -> MutexGuard<'_, RuntimeState> {
        self.shared
            .runtime
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn gate(&self) -> MutexGuard<'_, ()> {
        self.shared.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn task_slot(&self) -> MutexGuard<'_, Option<JoinHandle<Result<(), InterpreterError>>>> {
        self.shared.task.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let runtime = self.lock();
        f.debug_struct("Interpreter")
            .field("story", &self.shared.story.id)
            .field("mode", &runtime.mode)
            .field("current", &runtime.current)
            .field("pending", &runtime.pending)
            .finish()
    }
}
