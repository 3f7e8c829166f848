//! Flow analysis implementation

use crate::lint::config::LintConfig;
use crate::lint::{LintIssue, LintLevel, LintResult};
use crate::types::story::{ENTER_EVENT, StateDef, Story};
use std::collections::{HashSet, VecDeque};

/// Check flow issues (unreachable states, states that can never advance)
pub fn check(story: &Story, result: &mut LintResult, config: &LintConfig) {
    if config.flow.check_reachability {
        check_unreachable_states(story, result);
    }

    if config.flow.check_dead_ends {
        check_dead_ends(story, result);
    }
}

/// Breadth-first walk from the start state over every declared successor
fn check_unreachable_states(story: &Story, result: &mut LintResult) {
    let mut reachable = HashSet::new();
    let mut queue = VecDeque::new();

    if story.state(&story.start).is_some() {
        reachable.insert(story.start.as_str());
        queue.push_back(story.start.as_str());
    }

    while let Some(id) = queue.pop_front() {
        let Some(state) = story.state(id) else {
            continue;
        };
        for target in state.successors() {
            if reachable.insert(target) {
                queue.push_back(target);
            }
        }
    }

    let mut reported = HashSet::new();
    for state in &story.states {
        let id = state.id();
        if !reachable.contains(id) && reported.insert(id) {
            result.add_issue(LintIssue::new(
                LintLevel::Warning,
                "flow",
                Some(id),
                format!("State '{id}' is unreachable from '{}'", story.start),
            ));
        }
    }
}

fn check_dead_ends(story: &Story, result: &mut LintResult) {
    for state in &story.states {
        match state {
            StateDef::Input(input) if input.submit_transition().is_none() => {
                result.add_issue(LintIssue::new(
                    LintLevel::Warning,
                    "flow",
                    Some(&input.id),
                    format!("Input '{}' has no SUBMIT transition and can never advance", input.id),
                ));
            }
            StateDef::Choice(choice) if choice.choices.is_empty() => {
                result.add_issue(LintIssue::new(
                    LintLevel::Warning,
                    "flow",
                    Some(&choice.id),
                    format!("Choice '{}' offers no options", choice.id),
                ));
            }
            StateDef::Sequence(sequence)
                if sequence.await_event.is_some()
                    && !sequence.terminal
                    && !sequence.on.contains_key(ENTER_EVENT) =>
            {
                result.add_issue(LintIssue::new(
                    LintLevel::Info,
                    "flow",
                    Some(&sequence.id),
                    format!(
                        "Sequence '{}' waits for Enter but has no ENTER transition; the story ends there",
                        sequence.id
                    ),
                ));
            }
            _ => {}
        }

        if let StateDef::Sequence(sequence) = state {
            if let (Some(event), Some(next)) = (&sequence.await_event, &sequence.next) {
                result.add_issue(LintIssue::new(
                    LintLevel::Info,
                    "flow",
                    Some(&sequence.id),
                    format!(
                        "Sequence '{}' waits for {event}, so its next state '{next}' is never taken",
                        sequence.id
                    ),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn run(json: &str) -> LintResult {
        let story = parse(json).unwrap();
        let mut result = LintResult::new();
        check(&story, &mut result, &LintConfig::default());
        result
    }

    #[test]
    fn flow_check_unreachable_state() {
        let result = run(
            r#"{"id": "s", "version": "1", "start": "a", "states": [
                {"id": "a", "type": "sequence", "next": "b"},
                {"id": "b", "type": "sequence", "terminal": true},
                {"id": "orphan", "type": "sequence"}
            ]}"#,
        );

        assert_eq!(result.count(LintLevel::Warning), 1);
        assert_eq!(result.issues[0].state.as_deref(), Some("orphan"));
    }

    #[test]
    fn flow_check_follows_enter_and_choices() {
        let result = run(
            r#"{"id": "s", "version": "1", "start": "a", "states": [
                {"id": "a", "type": "sequence", "await": "ENTER", "on": {"ENTER": "b"}},
                {"id": "b", "type": "choice", "prompt": "?", "choices": [{"id": "x", "label": "X", "to": "c"}]},
                {"id": "c", "type": "sequence"}
            ]}"#,
        );

        assert!(result.is_clean(), "unexpected issues: {:?}", result.issues);
    }

    #[test]
    fn flow_check_dead_ends() {
        let result = run(
            r#"{"id": "s", "version": "1", "start": "a", "states": [
                {"id": "a", "type": "sequence", "await": "ENTER", "next": "b"},
                {"id": "b", "type": "input", "input": {"id": "n", "label": "N"}},
                {"id": "c", "type": "choice", "prompt": "?"}
            ]}"#,
        );

        // b and c are unreachable, b has no SUBMIT, c has no options;
        // a has no ENTER target and an unused next
        assert_eq!(result.count(LintLevel::Warning), 4);
        assert_eq!(result.count(LintLevel::Info), 2);
    }

    #[test]
    fn flow_check_skips_next_of_awaiting_sequence() {
        let result = run(
            r#"{"id": "s", "version": "1", "start": "a", "states": [
                {"id": "a", "type": "sequence", "await": "ENTER", "on": {"ENTER": "b"}, "next": "only_via_next"},
                {"id": "b", "type": "sequence"},
                {"id": "only_via_next", "type": "sequence"}
            ]}"#,
        );

        let unreachable: Vec<&str> = result
            .issues
            .iter()
            .filter(|i| i.level == LintLevel::Warning)
            .filter_map(|i| i.state.as_deref())
            .collect();
        assert_eq!(unreachable, vec!["only_via_next"]);
        assert_eq!(result.for_state("a").count(), 1);
        assert!(result.issues.iter().any(|i| i.message.contains("never taken")));
    }
}
