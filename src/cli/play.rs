//! CUI player mode for running stories
//!
//! This module drives an interpreter from stdin: text for inputs, a number
//! for choices, Enter for acknowledgements, and `:q` to quit.

use anyhow::Context;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::{
    cli::terminal::StdioTerminal,
    lint::{self, LintLevel},
    runtime::{Interpreter, InterpreterConfig, debug::DebugConfig},
    types::{state::Mode, story::Story},
};

const QUIT: &str = ":q";

/// Options for a play session
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    pub debug: bool,
    /// Typewriter speed for lines without their own hint (ms per character)
    pub speed: Option<u64>,
}

/// Run the player mode
pub async fn run_play(story: Story, options: PlayOptions) -> anyhow::Result<()> {
    let report = lint::lint(&story);
    for issue in &report.issues {
        if issue.level != LintLevel::Info || options.debug {
            eprintln!("[{}] {}", issue.level, issue.message);
        }
    }

    let config = InterpreterConfig {
        debug: if options.debug {
            DebugConfig::verbose()
        } else {
            DebugConfig::default()
        },
    };
    let terminal = Arc::new(StdioTerminal::new(options.speed, options.debug));
    let interpreter = Interpreter::with_config(story, terminal, config)?;

    println!("=== {} ===", interpreter.story().id);
    println!("(type {QUIT} to quit)");
    println!();

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    interpreter.start().await?;

    loop {
        interpreter.settle().await?;

        let mode = interpreter.mode();
        if mode == Mode::Ended {
            println!();
            println!("== THE END ==");
            return Ok(());
        }
        if !mode.is_waiting() {
            tokio::task::yield_now().await;
            continue;
        }

        let Some(answer) = read_line(&mut input).await? else {
            interpreter.stop();
            return Ok(());
        };
        if answer.trim() == QUIT {
            interpreter.stop();
            println!("Goodbye!");
            return Ok(());
        }

        match mode {
            Mode::WaitingForInput => {
                interpreter.submit(&answer).await?;
                if interpreter.mode() == Mode::WaitingForInput {
                    print!("> ");
                }
            }
            Mode::WaitingForChoice => match choice_id(&interpreter, &answer) {
                Some(id) => interpreter.choose(&id).await?,
                None => print!("Enter a number from the list > "),
            },
            Mode::WaitingForEnter => interpreter.enter().await?,
            Mode::Idle | Mode::Running | Mode::Ended => {}
        }
        flush_stdout()?;
    }
}

/// Map a 1-based answer to the id of the option on screen
fn choice_id(interpreter: &Interpreter, answer: &str) -> Option<String> {
    let index = answer.trim().parse::<usize>().ok()?.checked_sub(1)?;
    let current = interpreter.current_state_id()?;
    let choice = interpreter.story().state(&current)?.as_choice().ok()?;
    choice.choices.get(index).map(|option| option.id.clone())
}

async fn read_line(input: &mut Lines<BufReader<Stdin>>) -> anyhow::Result<Option<String>> {
    input.next_line().await.context("failed to read from stdin")
}

fn flush_stdout() -> anyhow::Result<()> {
    use std::io::Write;
    std::io::stdout().flush().context("failed to flush stdout")
}
