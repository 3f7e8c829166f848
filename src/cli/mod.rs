//! Command-line host for stories

pub mod logger;
pub mod play;
pub mod terminal;
