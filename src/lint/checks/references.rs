//! Reference integrity checking implementation

use crate::lint::config::LintConfig;
use crate::lint::{LintIssue, LintLevel, LintResult};
use crate::types::story::Story;
use std::collections::HashSet;

/// Check reference integrity (start state, successors, duplicate ids)
pub fn check(story: &Story, result: &mut LintResult, config: &LintConfig) {
    let declared: HashSet<&str> = story.states.iter().map(|state| state.id()).collect();

    if !declared.contains(story.start.as_str()) {
        result.add_issue(LintIssue::new(
            LintLevel::Error,
            "references",
            None,
            format!("Start state '{}' is not declared", story.start),
        ));
    }

    check_successors(story, &declared, result);

    if config.references.check_duplicates {
        check_duplicates(story, result);
    }
}

fn check_successors(story: &Story, declared: &HashSet<&str>, result: &mut LintResult) {
    for state in &story.states {
        for target in state.successors() {
            if !declared.contains(target) {
                result.add_issue(LintIssue::new(
                    LintLevel::Error,
                    "references",
                    Some(state.id()),
                    format!(
                        "State '{}' leads to undeclared state '{}'",
                        state.id(),
                        target
                    ),
                ));
            }
        }
    }
}

fn check_duplicates(story: &Story, result: &mut LintResult) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for state in &story.states {
        let id = state.id();
        if !seen.insert(id) && reported.insert(id) {
            result.add_issue(LintIssue::new(
                LintLevel::Error,
                "references",
                Some(id),
                format!("State '{id}' is declared more than once; the last declaration wins"),
            ));
        }
    }
}
