//! `{var}` substitution in line and prompt templates

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("token pattern compiles"));

/// Replace every `{name}` token with the variable's value, or nothing if unset.
///
/// Substitution is single-pass: a value containing `{other}` is not expanded again.
pub fn interpolate(template: &str, vars: &HashMap<String, String>) -> String {
    TOKEN
        .replace_all(template, |caps: &Captures<'_>| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Variable names referenced by a template, in order of appearance
pub fn tokens(template: &str) -> impl Iterator<Item = &str> {
    TOKEN
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}
