//! Stdout-backed terminal for the CUI player
//!
//! Lines are typed out character by character when the story gives a speed
//! hint. Inputs and choices are rendered as plain prompts; reading the
//! answer is left to the player loop.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::io::{AsyncWriteExt, Stdout};

use crate::contracts::Terminal;
use crate::types::{
    state::Mode,
    story::{ChoiceOption, InputSpec, PrintOptions},
};

pub struct StdioTerminal {
    /// Used when a line has no speed of its own
    default_speed: Option<u64>,
    debug: bool,
    /// Whether an input or choice prompt is currently on screen
    interactive: AtomicBool,
}

impl StdioTerminal {
    pub fn new(default_speed: Option<u64>, debug: bool) -> Self {
        Self {
            default_speed,
            debug,
            interactive: AtomicBool::new(false),
        }
    }

    async fn write(out: &mut Stdout, text: &str) {
        let written = async {
            out.write_all(text.as_bytes()).await?;
            out.flush().await
        }
        .await;
        if let Err(err) = written {
            log::warn!("failed to write to stdout: {err}");
        }
    }
}

#[async_trait]
impl Terminal for StdioTerminal {
    async fn print(&self, text: &str, options: PrintOptions) {
        let mut out = tokio::io::stdout();
        let speed = options.speed.or(self.default_speed).unwrap_or(0);

        if options.instant || speed == 0 {
            Self::write(&mut out, &format!("{text}\n")).await;
            return;
        }

        let mut buf = [0u8; 4];
        for ch in text.chars() {
            Self::write(&mut out, ch.encode_utf8(&mut buf)).await;
            tokio::time::sleep(Duration::from_millis(speed)).await;
        }
        Self::write(&mut out, "\n").await;
    }

    async fn show_input(&self, spec: &InputSpec) {
        self.interactive.store(true, Ordering::SeqCst);
        let mut prompt = spec.label.clone();
        if let Some(placeholder) = &spec.placeholder {
            prompt.push_str(&format!(" ({placeholder})"));
        }
        Self::write(&mut tokio::io::stdout(), &format!("{prompt} > ")).await;
    }

    async fn show_choices(&self, prompt: &str, choices: &[ChoiceOption]) {
        self.interactive.store(true, Ordering::SeqCst);
        let mut block = format!("{prompt}\n");
        for (i, choice) in choices.iter().enumerate() {
            block.push_str(&format!("  {}. {}\n", i + 1, choice.label));
        }
        block.push_str("> ");
        Self::write(&mut tokio::io::stdout(), &block).await;
    }

    fn clear_interactive(&self) {
        if self.interactive.swap(false, Ordering::SeqCst) {
            println!();
        }
    }

    fn on_state_change(&self, state_id: &str, mode: Mode) {
        if self.debug {
            eprintln!("[debug] state={state_id} mode={mode}");
        }
    }

    fn on_validation_error(&self, message: &str) {
        println!("! {message}");
    }
}
