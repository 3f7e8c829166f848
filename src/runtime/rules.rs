//! Guard evaluation, action application and input normalisation

use std::collections::HashMap;

use crate::types::story::{Action, Guard, InputSpec, ValueSource};

/// First failure message among `guards`, or `None` when all pass
pub fn evaluate_guards(guards: &[Guard], value: &str) -> Option<String> {
    guards.iter().find_map(|guard| match guard {
        Guard::MinLength { value: min } if value.chars().count() < *min => {
            Some(format!("Please enter at least {min} characters."))
        }
        Guard::MinLength { .. } | Guard::Unknown => None,
    })
}

/// A variable write made by [`apply_actions`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub var: &'a str,
    pub value: String,
    /// `input` for the submitted value, `literal` otherwise
    pub source: &'static str,
}

/// Apply `actions` in order. `submitted` is the value of the input event, if any.
pub fn apply_actions<'a>(
    actions: &'a [Action],
    submitted: Option<&str>,
    vars: &mut HashMap<String, String>,
) -> Vec<Assignment<'a>> {
    let mut written = Vec::new();
    for action in actions {
        match action {
            Action::Set { var, value, from } => {
                let (resolved, source) = match from {
                    Some(ValueSource::Input) => (submitted.unwrap_or_default().to_string(), "input"),
                    None => (value.clone().unwrap_or_default(), "literal"),
                };
                vars.insert(var.clone(), resolved.clone());
                written.push(Assignment {
                    var,
                    value: resolved,
                    source,
                });
            }
            Action::Unknown => {}
        }
    }
    written
}

/// Trim (if requested) and then truncate to the input's maximum length.
///
/// The minimum length is not enforced here; only a guard can reject a value.
pub fn normalize_input(spec: &InputSpec, raw: &str) -> String {
    let value = if spec.trim { raw.trim() } else { raw };
    match spec.max_length {
        Some(max) => value.chars().take(max).collect(),
        None => value.to_string(),
    }
}
