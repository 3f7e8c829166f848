//! Debug logging for story execution
//!
//! Messages are grouped by category and forwarded to the `log` facade with a
//! `termtale::<category>` target, so the host picks the backend.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Environment variable that switches debug logging on by default
pub const DEBUG_ENV: &str = "TERMTALE_DEBUG";

/// Debug log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// All internal state changes
    Trace,
    Debug,
    /// Important state changes
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// Debug log category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebugCategory {
    /// Interpreter lifecycle and state entry
    Engine,
    /// Transitions, parking and ignored events
    Flow,
    /// Variable store writes
    Variables,
    /// Line printing, delays and cancellation
    Timing,
}

impl DebugCategory {
    pub fn target(self) -> &'static str {
        match self {
            DebugCategory::Engine => "termtale::engine",
            DebugCategory::Flow => "termtale::flow",
            DebugCategory::Variables => "termtale::variables",
            DebugCategory::Timing => "termtale::timing",
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    pub enabled: bool,
    /// Minimum level forwarded
    pub level: LogLevel,
    /// Enabled categories
    pub categories: HashSet<DebugCategory>,
}

impl Default for DebugConfig {
    fn default() -> Self {
        let mut categories = HashSet::new();
        categories.insert(DebugCategory::Engine);
        categories.insert(DebugCategory::Flow);

        Self {
            enabled: std::env::var(DEBUG_ENV).is_ok(),
            level: LogLevel::Debug,
            categories,
        }
    }
}

impl DebugConfig {
    /// Everything on, down to trace
    pub fn verbose() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Trace,
            categories: [
                DebugCategory::Engine,
                DebugCategory::Flow,
                DebugCategory::Variables,
                DebugCategory::Timing,
            ]
            .into_iter()
            .collect(),
        }
    }

    pub fn allows(&self, category: DebugCategory, level: LogLevel) -> bool {
        self.enabled && level >= self.level && self.categories.contains(&category)
    }
}

/// Log a debug message
pub fn log(config: &DebugConfig, category: DebugCategory, level: LogLevel, message: &str) {
    if !config.allows(category, level) {
        return;
    }
    log::log!(target: category.target(), log::Level::from(level), "{message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_config_default() {
        let config = DebugConfig::default();
        assert!(!config.enabled || std::env::var(DEBUG_ENV).is_ok());
        assert!(config.categories.contains(&DebugCategory::Engine));
        assert!(!config.categories.contains(&DebugCategory::Timing));
    }

    #[test]
    fn allows_respects_level_and_category() {
        let mut config = DebugConfig::default();
        config.enabled = true;

        assert!(config.allows(DebugCategory::Flow, LogLevel::Info));
        assert!(!config.allows(DebugCategory::Flow, LogLevel::Trace));
        assert!(!config.allows(DebugCategory::Variables, LogLevel::Error));
    }

    #[test]
    fn disabled_config_allows_nothing() {
        let mut config = DebugConfig::verbose();
        config.enabled = false;
        assert!(!config.allows(DebugCategory::Engine, LogLevel::Error));
    }

    #[test]
    fn verbose_enables_all_categories() {
        let config = DebugConfig::verbose();
        assert!(config.allows(DebugCategory::Timing, LogLevel::Trace));
        assert!(config.allows(DebugCategory::Variables, LogLevel::Trace));

        // No logger installed in tests; this must simply not panic.
        log(&config, DebugCategory::Engine, LogLevel::Debug, "Test message");
    }
}
