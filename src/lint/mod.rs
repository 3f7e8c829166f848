//! Lint module for story quality checking
//!
//! This module provides static checks over a parsed story:
//! - Reference integrity (successor ids, duplicate ids, start state)
//! - Flow analysis (reachability, states that can never advance)
//! - Template quality (variables that are never given a value)

use crate::types::story::Story;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod checks;
pub mod config;

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintLevel {
    /// The interpreter fails or stalls on this path
    Error,
    Warning,
    Info,
}

impl fmt::Display for LintLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LintLevel::Error => "error",
            LintLevel::Warning => "warning",
            LintLevel::Info => "info",
        })
    }
}

/// One finding, optionally tied to a state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintIssue {
    pub level: LintLevel,
    /// Which check produced it: `references`, `flow` or `quality`
    pub category: &'static str,
    pub state: Option<String>,
    pub message: String,
}

impl LintIssue {
    pub fn new(
        level: LintLevel,
        category: &'static str,
        state: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            category,
            state: state.map(str::to_owned),
            message: message.into(),
        }
    }
}

/// Findings collected over a whole story, in check order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LintResult {
    pub issues: Vec<LintIssue>,
}

impl LintResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_issue(&mut self, issue: LintIssue) {
        self.issues.push(issue);
    }

    pub fn count(&self, level: LintLevel) -> usize {
        self.issues.iter().filter(|i| i.level == level).count()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.level == LintLevel::Error)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Findings attached to one state
    pub fn for_state<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a LintIssue> + 'a {
        self.issues
            .iter()
            .filter(move |i| i.state.as_deref() == Some(id))
    }
}

/// Lint a story with default configuration
pub fn lint(story: &Story) -> LintResult {
    let config = config::LintConfig::default();
    lint_with_config(story, &config)
}

/// Lint a story with custom configuration
pub fn lint_with_config(story: &Story, config: &config::LintConfig) -> LintResult {
    let mut result = LintResult::new();

    if config.references.enabled {
        checks::references::check(story, &mut result, config);
    }

    if config.flow.enabled {
        checks::flow::check(story, &mut result, config);
    }

    if config.quality.enabled {
        checks::quality::check(story, &mut result, config);
    }

    result
}
