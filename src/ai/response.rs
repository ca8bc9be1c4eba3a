//! Extraction of the story JSON from free-form model output.

use crate::models::StoryDraft;
use crate::{Error, Result};

/// Parse a model reply into a [`StoryDraft`].
///
/// Models wrap structured output differently, so candidates are tried in
/// order: a ```` ```json ```` fence, any bare ```` ``` ```` fence, then the
/// outermost `{...}` span.
pub fn parse_story_response(text: &str) -> Result<StoryDraft> {
    let json = extract_json(text).ok_or_else(|| {
        tracing::error!("No JSON object found in story response");
        Error::StoryParse("no JSON object found in response".to_string())
    })?;

    serde_json::from_str(json.trim()).map_err(|e| {
        tracing::error!("Failed to parse story JSON: {}", e);
        Error::StoryParse(e.to_string())
    })
}

fn extract_json(text: &str) -> Option<&str> {
    fenced_block(text, "```json\n")
        .or_else(|| fenced_block(text, "```\n"))
        .or_else(|| brace_span(text))
}

/// Content between `opener` and the last closing fence that follows it.
fn fenced_block<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    let end = rest.rfind("\n```")?;
    Some(&rest[..end])
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
