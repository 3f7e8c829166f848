//! Story document loading
//!
//! Stories are JSON documents. Parsing checks shape only; dangling state
//! references are left to [`crate::lint`] and to the interpreter.

use anyhow::Context;
use std::path::Path;

use crate::types::story::Story;

#[cfg(test)]
mod tests;

/// Parse a JSON story document
pub fn parse(json: &str) -> anyhow::Result<Story> {
    let story: Story = serde_json::from_str(json).context("invalid story document")?;
    if story.start.trim().is_empty() {
        anyhow::bail!("story '{}' has an empty start state id", story.id);
    }
    if let Some(state) = story.states.iter().find(|state| state.id().trim().is_empty()) {
        anyhow::bail!(
            "story '{}' declares a {} state with an empty id",
            story.id,
            state.kind()
        );
    }
    Ok(story)
}

/// Read and parse a story file
pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Story> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read story file {}", path.display()))?;
    parse(&json).with_context(|| format!("failed to load story from {}", path.display()))
}
