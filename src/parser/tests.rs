//! Tests for the parser module

use super::*;
use crate::types::story::{Action, Guard, StateDef, ValueSource};

const STORY: &str = r#"{
  "id": "demo",
  "version": "1.2",
  "context": { "vars": { "name": "stranger" } },
  "start": "boot",
  "states": [
    {
      "id": "boot", "type": "sequence",
      "lines": [
        { "text": "Booting...", "delay": 300, "instant": true },
        { "text": "Hello {name}", "speed": 25 }
      ],
      "next": "ask"
    },
    {
      "id": "ask", "type": "input",
      "input": { "id": "name", "label": "Name?", "placeholder": "Ada", "minLength": 1, "maxLength": 12, "trim": true },
      "transitions": [{
        "event": "SUBMIT",
        "guards": [{ "type": "minLength", "value": 1 }],
        "actions": [{ "type": "set", "var": "name", "from": "input" }],
        "to": "pick"
      }]
    },
    {
      "id": "pick", "type": "choice", "prompt": "Where to, {name}?",
      "choices": [
        { "id": "left", "label": "Left", "actions": [{ "type": "set", "var": "route", "value": "L" }], "to": "end" },
        { "id": "right", "label": "Right", "to": "end" }
      ]
    },
    { "id": "end", "type": "sequence", "terminal": true }
  ]
}"#;

#[test]
fn parse_full_story() {
    let story = parse(STORY).unwrap();

    assert_eq!(story.id, "demo");
    assert_eq!(story.version, "1.2");
    assert_eq!(story.context.vars["name"], "stranger");
    assert_eq!(story.states.len(), 4);

    let boot = story.state("boot").unwrap().as_sequence().unwrap();
    assert_eq!(boot.lines[0].delay, 300);
    assert!(boot.lines[0].instant);
    assert_eq!(boot.lines[1].speed, Some(25));
    assert_eq!(boot.next.as_deref(), Some("ask"));

    let ask = story.state("ask").unwrap().as_input().unwrap();
    assert_eq!(ask.input.placeholder.as_deref(), Some("Ada"));
    assert_eq!(ask.input.min_length, Some(1));
    let submit = ask.submit_transition().unwrap();
    assert_eq!(submit.guards, vec![Guard::MinLength { value: 1 }]);
    assert_eq!(
        submit.actions,
        vec![Action::Set {
            var: "name".to_string(),
            value: None,
            from: Some(ValueSource::Input),
        }]
    );

    let pick = story.state("pick").unwrap().as_choice().unwrap();
    assert_eq!(pick.choices.len(), 2);
    assert!(pick.choices[1].actions.is_empty());

    assert!(story.state("end").unwrap().is_terminal());
}

#[test]
fn parse_defaults_missing_context() {
    let story = parse(
        r#"{"id": "s", "version": "1", "start": "a", "states": [{"id": "a", "type": "sequence"}]}"#,
    )
    .unwrap();

    assert!(story.context.vars.is_empty());
    assert!(matches!(&story.states[0], StateDef::Sequence(s) if s.lines.is_empty() && !s.terminal));
}

#[test]
fn parse_keeps_dangling_references() {
    let story = parse(
        r#"{"id": "s", "version": "1", "start": "a",
            "states": [{"id": "a", "type": "sequence", "next": "ghost"}]}"#,
    );
    assert!(story.is_ok());
}

#[test]
fn parse_rejects_unknown_state_type() {
    let err = parse(
        r#"{"id": "s", "version": "1", "start": "a", "states": [{"id": "a", "type": "video"}]}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("invalid story document"));
}

#[test]
fn parse_rejects_empty_ids() {
    let err = parse(r#"{"id": "s", "version": "1", "start": " ", "states": []}"#).unwrap_err();
    assert!(err.to_string().contains("empty start"));

    let err = parse(
        r#"{"id": "s", "version": "1", "start": "a", "states": [{"id": "", "type": "sequence"}]}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("empty id"));
}

#[test]
fn parse_rejects_malformed_json() {
    assert!(parse("{ not json").is_err());
}

#[tokio::test]
async fn load_reports_missing_file() {
    let err = load("/definitely/not/here/story.json").await.unwrap_err();
    assert!(format!("{err:#}").contains("failed to read story file"));
}
