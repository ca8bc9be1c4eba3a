//! AI provider integration for story text and illustrations
//!
//! Every vendor is wrapped behind the same two-verb [`StoryProvider`]
//! contract so the generator can treat them interchangeably.

pub mod factory;
pub mod fallback;
pub mod gemini;
pub mod mime;
pub mod mock;
pub mod openai;
pub mod response;
pub mod stability;

pub use factory::{HttpProviderFactory, ProviderSettings};
pub use fallback::placeholder_image_url;
pub use gemini::GeminiProvider;
pub use mock::{MockProviderFactory, MockStoryProvider};
pub use openai::OpenAiProvider;
pub use response::parse_story_response;
pub use stability::StabilityProvider;

use crate::models::{ImageReference, Provider, StoryDraft, StoryParameters};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait StoryProvider: Send + Sync {
    async fn generate_story(&self, params: &StoryParameters) -> Result<StoryDraft>;
    async fn generate_image(&self, image_prompt: &str) -> Result<ImageReference>;
}

/// Builds a ready-to-use adapter from a caller credential.
pub trait ProviderFactory: Send + Sync {
    fn connect(&self, provider: Provider, credential: &str) -> Result<Box<dyn StoryProvider>>;
}
