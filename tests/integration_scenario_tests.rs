//! Integration tests for whole stories
//!
//! These tests verify that parse → interpreter → terminal calls work end to end

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use termtale::{
    ChoiceOption, InputSpec, Interpreter, InterpreterError, Mode, PrintOptions, Terminal,
    parse_story, types::PendingKind,
};

/// Keeps a transcript of everything the interpreter asked for
#[derive(Default)]
struct Transcript {
    entries: Mutex<Vec<String>>,
}

impl Transcript {
    fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    fn push(&self, entry: String) {
        self.entries.lock().unwrap().push(entry);
    }
}

#[async_trait]
impl Terminal for Transcript {
    async fn print(&self, text: &str, options: PrintOptions) {
        let marker = if options.instant { "!" } else { "" };
        self.push(format!("print{marker}: {text}"));
    }

    async fn show_input(&self, spec: &InputSpec) {
        self.push(format!("input: {}", spec.label));
    }

    async fn show_choices(&self, prompt: &str, choices: &[ChoiceOption]) {
        let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
        self.push(format!("choices: {prompt} [{}]", labels.join(", ")));
    }

    fn clear_interactive(&self) {}

    fn on_validation_error(&self, message: &str) {
        self.push(format!("invalid: {message}"));
    }
}

const THREE_STATES: &str = r#"{
  "id": "three", "version": "1",
  "start": "intro",
  "states": [
    { "id": "intro", "type": "sequence", "lines": [{ "text": "Wake up." }], "next": "name" },
    { "id": "name", "type": "input",
      "input": { "id": "name", "label": "Name?" },
      "transitions": [{ "event": "SUBMIT",
        "guards": [{ "type": "minLength", "value": 1 }],
        "actions": [{ "type": "set", "var": "name", "from": "input" }],
        "to": "fork" }] },
    { "id": "fork", "type": "choice", "prompt": "{name}, pick one",
      "choices": [
        { "id": "stay", "label": "Stay", "to": "finale" },
        { "id": "leave", "label": "Leave", "to": "finale" }
      ] },
    { "id": "finale", "type": "sequence", "terminal": true }
  ]
}"#;

#[tokio::test]
async fn integration_three_state_story_reaches_terminal_state() {
    let transcript = Arc::new(Transcript::default());
    let interpreter = Interpreter::new(parse_story(THREE_STATES).unwrap(), transcript.clone())
        .expect("start state exists");

    interpreter.start().await.unwrap();
    interpreter.settle().await.unwrap();
    assert_eq!(interpreter.mode(), Mode::WaitingForInput);

    interpreter.submit("").await.unwrap();
    assert_eq!(interpreter.mode(), Mode::WaitingForInput);

    interpreter.submit("Bea").await.unwrap();
    assert_eq!(interpreter.mode(), Mode::WaitingForChoice);

    let first = interpreter.story().state("fork").unwrap().as_choice().unwrap().choices[0]
        .id
        .clone();
    interpreter.choose(&first).await.unwrap();
    interpreter.settle().await.unwrap();

    assert_eq!(interpreter.mode(), Mode::Ended);
    assert_eq!(interpreter.current_state_id().as_deref(), Some("finale"));
    assert_eq!(interpreter.var("name").as_deref(), Some("Bea"));
    assert_eq!(
        transcript.entries(),
        vec![
            "print: Wake up.",
            "input: Name?",
            "invalid: Please enter at least 1 characters.",
            "choices: Bea, pick one [Stay, Leave]",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn integration_demo_story_file_plays_through() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/stories/terminal_demo.json");
    let story = termtale::load_story(path).await.expect("demo story loads");
    assert!(!termtale::lint(&story).has_errors());

    let transcript = Arc::new(Transcript::default());
    let interpreter = Interpreter::new(story, transcript.clone()).unwrap();

    interpreter.start().await.unwrap();
    interpreter.settle().await.unwrap();
    assert_eq!(
        interpreter.pending().map(|p| p.kind),
        Some(PendingKind::Enter)
    );

    interpreter.enter().await.unwrap();
    interpreter.settle().await.unwrap();
    interpreter.submit("   Grace Hopper of the Navy   ").await.unwrap();
    interpreter.settle().await.unwrap();
    assert_eq!(interpreter.var("name").as_deref(), Some("Grace Hopper of "));

    interpreter.choose("shell").await.unwrap();
    interpreter.settle().await.unwrap();

    assert_eq!(interpreter.mode(), Mode::Ended);
    assert_eq!(interpreter.current_state_id().as_deref(), Some("end"));
    assert_eq!(interpreter.var("route").as_deref(), Some("shell"));
    let entries = transcript.entries();
    assert!(entries.contains(&"print: Hello, operator. Press Enter to continue.".to_string()));
    assert!(entries.contains(&"print!: # whoami".to_string()));
    assert!(entries.contains(&"print: Grace Hopper of ".to_string()));
    assert_eq!(entries.last().map(String::as_str), Some("print!: Session closed."));
}

#[tokio::test]
async fn integration_missing_start_state_is_rejected() {
    let story = parse_story(
        r#"{"id": "s", "version": "1", "start": "ghost", "states": [{"id": "a", "type": "sequence"}]}"#,
    )
    .unwrap();

    let err = Interpreter::new(story, Arc::new(Transcript::default())).unwrap_err();

    assert!(matches!(err, InterpreterError::MissingStartState { .. }));
    assert!(err.to_string().contains("ghost"));
}

#[tokio::test]
async fn integration_clones_share_one_session() {
    let interpreter =
        Interpreter::new(parse_story(THREE_STATES).unwrap(), Arc::new(Transcript::default()))
            .unwrap();
    let handle = interpreter.clone();

    interpreter.start().await.unwrap();
    interpreter.settle().await.unwrap();
    handle.submit("Ada").await.unwrap();

    assert_eq!(interpreter.mode(), Mode::WaitingForChoice);
    assert_eq!(interpreter.var("name").as_deref(), Some("Ada"));
}
