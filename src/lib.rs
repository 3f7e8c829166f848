//! # termtale
//!
//! A Rust library that plays scripted, branching stories as simulated terminal
//! output. A JSON story describes line sequences, text inputs and multiple
//! choices; the [`Interpreter`] walks it, calling a host-provided [`Terminal`]
//! for every line, prompt and choice list.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use termtale::{ChoiceOption, InputSpec, Interpreter, Mode, PrintOptions, Terminal};
//!
//! struct Stdout;
//!
//! #[async_trait::async_trait]
//! impl Terminal for Stdout {
//!     async fn print(&self, text: &str, _options: PrintOptions) {
//!         println!("{text}");
//!     }
//!     async fn show_input(&self, spec: &InputSpec) {
//!         println!("{}", spec.label);
//!     }
//!     async fn show_choices(&self, prompt: &str, choices: &[ChoiceOption]) {
//!         println!("{prompt} ({} options)", choices.len());
//!     }
//!     fn clear_interactive(&self) {}
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let story = termtale::parse_story(r#"{
//!     "id": "hello", "version": "1", "start": "greet",
//!     "states": [
//!         { "id": "greet", "type": "sequence", "lines": [{ "text": "Hello!" }], "next": "ask" },
//!         { "id": "ask", "type": "input", "input": { "id": "name", "label": "Name?" },
//!           "transitions": [{ "event": "SUBMIT",
//!             "actions": [{ "type": "set", "var": "name", "from": "input" }],
//!             "to": "bye" }] },
//!         { "id": "bye", "type": "sequence", "lines": [{ "text": "Bye, {name}." }] }
//!     ]
//! }"#)?;
//!
//! let interpreter = Interpreter::new(story, Arc::new(Stdout))?;
//! interpreter.start().await?;
//! interpreter.settle().await?;
//! assert_eq!(interpreter.mode(), Mode::WaitingForInput);
//!
//! interpreter.submit("Ada").await?;
//! interpreter.settle().await?;
//! assert_eq!(interpreter.mode(), Mode::Ended);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod contracts;
pub mod lint;
pub mod parser;
pub mod runtime;
pub mod types;

pub use contracts::{InterpreterError, Terminal};
pub use lint::{LintResult, lint};
pub use parser::{load as load_story, parse as parse_story};
pub use runtime::{Interpreter, InterpreterConfig};
pub use types::{ChoiceOption, InputSpec, Mode, PrintOptions, StateDef, Story};
