use super::{gemini, openai, stability};
use super::{GeminiProvider, OpenAiProvider, ProviderFactory, StabilityProvider, StoryProvider};
use crate::models::Provider;
use crate::Result;
use tracing::debug;

/// Models, endpoints and secondary credentials shared by every adapter.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub gemini_model: String,
    pub openai_chat_model: String,
    pub openai_image_model: String,
    pub gemini_base_url: String,
    pub openai_base_url: String,
    pub stability_base_url: String,
    /// Gemini key used by the Stability adapter to write story text.
    pub stability_story_key: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            gemini_model: "gemini-2.0-flash".to_string(),
            openai_chat_model: "gpt-4".to_string(),
            openai_image_model: "dall-e-3".to_string(),
            gemini_base_url: gemini::client::DEFAULT_BASE_URL.to_string(),
            openai_base_url: openai::client::DEFAULT_BASE_URL.to_string(),
            stability_base_url: stability::client::DEFAULT_BASE_URL.to_string(),
            stability_story_key: None,
        }
    }
}

/// Builds real HTTP-backed adapters, one fresh client per call.
#[derive(Debug, Clone, Default)]
pub struct HttpProviderFactory {
    settings: ProviderSettings,
}

impl HttpProviderFactory {
    pub fn new(settings: ProviderSettings) -> Self {
        Self { settings }
    }

    fn gemini(&self, api_key: String) -> GeminiProvider {
        GeminiProvider::new(api_key, self.settings.gemini_model.clone())
            .with_base_url(self.settings.gemini_base_url.clone())
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn connect(&self, provider: Provider, credential: &str) -> Result<Box<dyn StoryProvider>> {
        let api_key = credential.to_string();
        let adapter: Box<dyn StoryProvider> = match provider {
            Provider::Gemini => {
                debug!("Connecting Gemini provider (model: {})", self.settings.gemini_model);
                Box::new(self.gemini(api_key))
            }
            Provider::OpenAi => {
                debug!(
                    "Connecting OpenAI provider (chat: {}, image: {})",
                    self.settings.openai_chat_model, self.settings.openai_image_model
                );
                Box::new(
                    OpenAiProvider::new(
                        api_key,
                        self.settings.openai_chat_model.clone(),
                        self.settings.openai_image_model.clone(),
                    )
                    .with_base_url(self.settings.openai_base_url.clone()),
                )
            }
            Provider::Stability => {
                debug!("Connecting Stability provider");
                let story_delegate = self
                    .settings
                    .stability_story_key
                    .clone()
                    .map(|key| self.gemini(key));
                Box::new(
                    StabilityProvider::new(api_key, story_delegate)
                        .with_base_url(self.settings.stability_base_url.clone()),
                )
            }
        };
        Ok(adapter)
    }
}
