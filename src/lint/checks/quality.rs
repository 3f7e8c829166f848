//! Quality checking implementation

use crate::lint::config::LintConfig;
use crate::lint::{LintIssue, LintLevel, LintResult};
use crate::runtime::interpolate::tokens;
use crate::types::story::{Action, StateDef, Story};
use std::collections::HashSet;

/// Check quality issues (unset template variables, overlong lines)
pub fn check(story: &Story, result: &mut LintResult, config: &LintConfig) {
    if config.quality.check_unset_variables {
        check_unset_variables(story, result);
    }
    check_line_length(story, result, config);
}

/// Every variable the story seeds or that some action writes
fn assigned_variables(story: &Story) -> HashSet<&str> {
    let mut assigned: HashSet<&str> = story.context.vars.keys().map(String::as_str).collect();

    for state in &story.states {
        let actions: Vec<&Action> = match state {
            StateDef::Sequence(sequence) => sequence.actions.iter().collect(),
            StateDef::Input(input) => input
                .transitions
                .iter()
                .flat_map(|t| t.actions.iter())
                .collect(),
            StateDef::Choice(choice) => choice
                .choices
                .iter()
                .flat_map(|c| c.actions.iter())
                .collect(),
        };
        for action in actions {
            if let Action::Set { var, .. } = action {
                assigned.insert(var.as_str());
            }
        }
    }

    assigned
}

fn templates(state: &StateDef) -> Vec<&str> {
    match state {
        StateDef::Sequence(sequence) => sequence.lines.iter().map(|l| l.text.as_str()).collect(),
        StateDef::Choice(choice) => vec![choice.prompt.as_str()],
        StateDef::Input(_) => Vec::new(),
    }
}

fn check_unset_variables(story: &Story, result: &mut LintResult) {
    let assigned = assigned_variables(story);

    for state in &story.states {
        let mut reported = HashSet::new();
        for template in templates(state) {
            for name in tokens(template) {
                if !assigned.contains(name) && reported.insert(name) {
                    result.add_issue(LintIssue::new(
                        LintLevel::Info,
                        "quality",
                        Some(state.id()),
                        format!(
                            "Variable '{name}' used in '{}' is never set and will print as empty",
                            state.id()
                        ),
                    ));
                }
            }
        }
    }
}

fn check_line_length(story: &Story, result: &mut LintResult, config: &LintConfig) {
    for state in &story.states {
        for template in templates(state) {
            let length = template.chars().count();
            if length > config.quality.max_line_length {
                result.add_issue(LintIssue::new(
                    LintLevel::Warning,
                    "quality",
                    Some(state.id()),
                    format!(
                        "Text in '{}' is {length} characters (threshold: {})",
                        state.id(),
                        config.quality.max_line_length
                    ),
                ));
            }
        }
    }
}
