//! Lint configuration

use serde::{Deserialize, Serialize};

/// Lint configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintConfig {
    pub references: ReferencesConfig,
    pub flow: FlowConfig,
    pub quality: QualityConfig,
}

/// Reference checking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferencesConfig {
    pub enabled: bool,
    /// Report state ids declared more than once
    pub check_duplicates: bool,
}

impl Default for ReferencesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_duplicates: true,
        }
    }
}

/// Flow analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    pub enabled: bool,
    /// Report states that cannot be reached from the start state
    pub check_reachability: bool,
    /// Report inputs and choices that can never advance
    pub check_dead_ends: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_reachability: true,
            check_dead_ends: true,
        }
    }
}

/// Template quality configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    pub enabled: bool,
    /// Report `{var}` tokens no context entry or action ever sets
    pub check_unset_variables: bool,
    /// Longest line text before a warning (characters)
    pub max_line_length: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            check_unset_variables: true,
            max_line_length: 200,
        }
    }
}
