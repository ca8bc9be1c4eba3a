//! Data models and structures
//!
//! Defines story parameters, generated drafts, persisted stories, and the
//! environment-driven configuration.

use crate::ai::ProviderSettings;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Identifiers of the registered provider adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    Stability,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Gemini, Provider::OpenAi, Provider::Stability];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
            Provider::Stability => "stability",
        }
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            "stability" => Ok(Provider::Stability),
            other => Err(Error::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "3-5")]
    Toddler,
    #[serde(rename = "6-9")]
    EarlyReader,
    #[serde(rename = "10-13")]
    MiddleGrade,
    #[serde(rename = "14+")]
    Teen,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Toddler => "3-5",
            AgeGroup::EarlyReader => "6-9",
            AgeGroup::MiddleGrade => "10-13",
            AgeGroup::Teen => "14+",
        }
    }
}

impl FromStr for AgeGroup {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "3-5" => Ok(AgeGroup::Toddler),
            "6-9" => Ok(AgeGroup::EarlyReader),
            "10-13" => Ok(AgeGroup::MiddleGrade),
            "14+" => Ok(AgeGroup::Teen),
            other => Err(Error::InvalidInput(format!(
                "Unknown age group '{}'. Expected one of 3-5, 6-9, 10-13, 14+",
                other
            ))),
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoryType {
    Adventure,
    Fantasy,
    SciFi,
    Moral,
    Comedy,
    Mystery,
    Historical,
    Educational,
}

impl StoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryType::Adventure => "adventure",
            StoryType::Fantasy => "fantasy",
            StoryType::SciFi => "sci-fi",
            StoryType::Moral => "moral",
            StoryType::Comedy => "comedy",
            StoryType::Mystery => "mystery",
            StoryType::Historical => "historical",
            StoryType::Educational => "educational",
        }
    }
}

impl FromStr for StoryType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "adventure" => Ok(StoryType::Adventure),
            "fantasy" => Ok(StoryType::Fantasy),
            "sci-fi" => Ok(StoryType::SciFi),
            "moral" => Ok(StoryType::Moral),
            "comedy" => Ok(StoryType::Comedy),
            "mystery" => Ok(StoryType::Mystery),
            "historical" => Ok(StoryType::Historical),
            "educational" => Ok(StoryType::Educational),
            other => Err(Error::InvalidInput(format!("Unknown story type '{}'", other))),
        }
    }
}

impl fmt::Display for StoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested story length.
///
/// Parsing is permissive: any unrecognized tag becomes [`StoryLength::Short`]
/// so a bad value still yields a five-page story instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StoryLength {
    Short,
    Medium,
    Long,
}

impl StoryLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryLength::Short => "short",
            StoryLength::Medium => "medium",
            StoryLength::Long => "long",
        }
    }

    /// Number of pages requested from the model, title and ending included.
    pub fn page_count(&self) -> u32 {
        match self {
            StoryLength::Short => 5,
            StoryLength::Medium => 8,
            StoryLength::Long => 12,
        }
    }
}

impl From<&str> for StoryLength {
    fn from(value: &str) -> Self {
        match value {
            "short" => StoryLength::Short,
            "medium" => StoryLength::Medium,
            "long" => StoryLength::Long,
            other => {
                tracing::warn!("Unrecognized story length '{}', using short", other);
                StoryLength::Short
            }
        }
    }
}

impl From<String> for StoryLength {
    fn from(value: String) -> Self {
        StoryLength::from(value.as_str())
    }
}

impl From<StoryLength> for String {
    fn from(value: StoryLength) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for StoryLength {
    type Err = Infallible;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(StoryLength::from(value))
    }
}

/// Caller-supplied inputs for one story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryParameters {
    pub prompt: String,
    pub age_group: AgeGroup,
    pub story_type: StoryType,
    pub story_length: StoryLength,
    pub language: String,
    pub tone_style: String,
}

impl StoryParameters {
    /// Parameters with the form defaults: 6-9, adventure, medium, english, engaging.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            age_group: AgeGroup::EarlyReader,
            story_type: StoryType::Adventure,
            story_length: StoryLength::Medium,
            language: "english".to_string(),
            tone_style: "engaging".to_string(),
        }
    }
}

/// One page as returned by the model, before illustration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPage {
    pub page_number: u32,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image_prompt: String,
}

/// Structured story content before images are attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryDraft {
    pub title: String,
    pub pages: Vec<DraftPage>,
}

/// Either a remote image URL or an inline `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageReference {
    Remote(String),
    Inline(String),
}

impl ImageReference {
    /// Build an inline reference from an already base64-encoded payload.
    pub fn inline(mime_type: &str, base64_data: &str) -> Self {
        ImageReference::Inline(format!("data:{};base64,{}", mime_type, base64_data))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImageReference::Remote(url) | ImageReference::Inline(url) => url,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ImageReference::Inline(_))
    }
}

impl From<String> for ImageReference {
    fn from(value: String) -> Self {
        if value.starts_with("data:") {
            ImageReference::Inline(value)
        } else {
            ImageReference::Remote(value)
        }
    }
}

impl From<ImageReference> for String {
    fn from(value: ImageReference) -> Self {
        match value {
            ImageReference::Remote(url) | ImageReference::Inline(url) => url,
        }
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished page with its illustration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub page_number: u32,
    pub text: String,
    pub image_prompt: String,
    pub image_url: ImageReference,
}

impl Page {
    pub fn new(draft: DraftPage, image_url: ImageReference) -> Self {
        Self {
            page_number: draft.page_number,
            text: draft.text,
            image_prompt: draft.image_prompt,
            image_url,
        }
    }
}

/// Story parameters as recorded with a saved story, including the provider used.
///
/// Bundled example stories were never generated, so they have no provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredParameters {
    #[serde(flatten)]
    pub params: StoryParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
}

/// The persisted unit handed to the story library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,
    pub title: String,
    pub params: StoredParameters,
    pub pages: Vec<Page>,
    pub created_at: DateTime<Utc>,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: String,
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub stability_api_key: Option<String>,
    pub settings: ProviderSettings,
    pub library_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    /// Build a config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = ProviderSettings::default();

        let gemini_api_key = var("GEMINI_API_KEY");
        let stability_story_key = var("STABILITY_STORY_API_KEY").or_else(|| gemini_api_key.clone());

        Self {
            provider: var("STORY_PROVIDER").unwrap_or_else(|| Provider::Gemini.to_string()),
            openai_api_key: var("OPENAI_API_KEY"),
            stability_api_key: var("STABILITY_API_KEY"),
            settings: ProviderSettings {
                gemini_model: var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
                openai_chat_model: var("OPENAI_CHAT_MODEL").unwrap_or(defaults.openai_chat_model),
                openai_image_model: var("OPENAI_IMAGE_MODEL")
                    .unwrap_or(defaults.openai_image_model),
                gemini_base_url: var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
                openai_base_url: var("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
                stability_base_url: var("STABILITY_BASE_URL")
                    .unwrap_or(defaults.stability_base_url),
                stability_story_key,
            },
            gemini_api_key,
            library_path: var("STORY_LIBRARY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("stories.json")),
        }
    }

    /// Credential configured for `provider`.
    pub fn credential_for(&self, provider: Provider) -> Result<String> {
        let (key, var) = match provider {
            Provider::Gemini => (&self.gemini_api_key, "GEMINI_API_KEY"),
            Provider::OpenAi => (&self.openai_api_key, "OPENAI_API_KEY"),
            Provider::Stability => (&self.stability_api_key, "STABILITY_API_KEY"),
        };
        key.clone()
            .ok_or_else(|| Error::MissingCredential(format!("{} not set", var)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_provider_parsing() {
        for provider in Provider::ALL {
            assert_eq!(provider.as_str().parse::<Provider>().unwrap(), provider);
        }
        let err = "anthropic".parse::<Provider>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedProvider(name) if name == "anthropic"));
    }

    #[test]
    fn test_story_length_page_counts() {
        assert_eq!(StoryLength::from("short").page_count(), 5);
        assert_eq!(StoryLength::from("medium").page_count(), 8);
        assert_eq!(StoryLength::from("long").page_count(), 12);
        assert_eq!(StoryLength::from("epic").page_count(), 5);
        assert_eq!(StoryLength::from("").page_count(), 5);
    }

    #[test]
    fn test_story_parameters_serialization() {
        let mut params = StoryParameters::new("a brave knight");
        params.story_type = StoryType::SciFi;
        params.age_group = AgeGroup::Teen;

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["storyType"], "sci-fi");
        assert_eq!(json["ageGroup"], "14+");
        assert_eq!(json["storyLength"], "medium");
        assert_eq!(json["toneStyle"], "engaging");

        let back: StoryParameters = serde_json::from_value(json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_unknown_length_deserializes_permissively() {
        let params: StoryParameters = serde_json::from_value(serde_json::json!({
            "prompt": "p",
            "ageGroup": "3-5",
            "storyType": "moral",
            "storyLength": "gigantic",
            "language": "english",
            "toneStyle": "calming"
        }))
        .unwrap();
        assert_eq!(params.story_length, StoryLength::Short);
    }

    #[test]
    fn test_image_reference_kind_follows_scheme() {
        let remote = ImageReference::from("https://example.com/a.png".to_string());
        assert!(!remote.is_inline());

        let inline = ImageReference::inline("image/png", "AAAA");
        assert!(inline.is_inline());
        assert_eq!(inline.as_str(), "data:image/png;base64,AAAA");

        let json = serde_json::to_string(&inline).unwrap();
        assert_eq!(json, "\"data:image/png;base64,AAAA\"");
    }

    #[test]
    fn test_stored_parameters_flatten_provider() {
        let stored = StoredParameters {
            params: StoryParameters::new("prompt"),
            provider: Some(Provider::OpenAi),
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["provider"], "openai");
        assert_eq!(json["prompt"], "prompt");
    }

    #[test]
    fn test_stored_parameters_without_provider() {
        let stored: StoredParameters = serde_json::from_value(serde_json::json!({
            "prompt": "a food truck",
            "ageGroup": "6-9",
            "storyType": "comedy",
            "storyLength": "short",
            "language": "english",
            "toneStyle": "funny"
        }))
        .unwrap();
        assert_eq!(stored.provider, None);

        let json = serde_json::to_value(&stored).unwrap();
        assert!(json.get("provider").is_none());
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("STORY_PROVIDER", "stability"),
            ("GEMINI_API_KEY", "gem-key"),
            ("STABILITY_API_KEY", "stab-key"),
            ("OPENAI_API_KEY", "  "),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.provider, "stability");
        assert_eq!(config.settings.stability_story_key.as_deref(), Some("gem-key"));
        assert_eq!(config.settings.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.library_path, PathBuf::from("stories.json"));
        assert_eq!(config.credential_for(Provider::Stability).unwrap(), "stab-key");
        assert!(matches!(
            config.credential_for(Provider::OpenAi),
            Err(Error::MissingCredential(_))
        ));
    }

    #[test]
    fn test_explicit_stability_story_key_wins() {
        let config = Config::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("gem".to_string()),
            "STABILITY_STORY_API_KEY" => Some("story".to_string()),
            _ => None,
        });
        assert_eq!(config.settings.stability_story_key.as_deref(), Some("story"));
    }
}
