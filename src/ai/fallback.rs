//! Placeholder illustrations for pages whose image generation failed.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const PLACEHOLDER_BASE_URL: &str = "https://source.unsplash.com/random/800x600/";
const MAX_QUERY_WORDS: usize = 3;
const PHOTO_PREFIXES: [&str; 2] = ["a photo of ", "photo of "];

/// Everything but ASCII alphanumerics and `_` is escaped; spaces become `%20`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_');

/// Stock-photo search URL derived from an image prompt.
///
/// Only the first sentence is used, a leading "photo of" marker is dropped,
/// punctuation is removed and at most three words are kept.
pub fn placeholder_image_url(image_prompt: &str) -> String {
    format!(
        "{}?{}",
        PLACEHOLDER_BASE_URL,
        utf8_percent_encode(&search_phrase(image_prompt), QUERY_COMPONENT)
    )
}

fn search_phrase(image_prompt: &str) -> String {
    let first_sentence = image_prompt.split('.').next().unwrap_or_default().trim_start();
    let lowered = first_sentence.to_ascii_lowercase();
    let subject = PHOTO_PREFIXES
        .iter()
        .find(|prefix| lowered.starts_with(*prefix))
        .map(|prefix| &first_sentence[prefix.len()..])
        .unwrap_or(first_sentence);

    let cleaned: String = subject
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned
        .trim()
        .split(' ')
        .take(MAX_QUERY_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}
