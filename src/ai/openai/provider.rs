use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage, ImageGenerationRequest};
use crate::ai::{mime, parse_story_response, StoryProvider};
use crate::models::{ImageReference, StoryDraft, StoryParameters};
use crate::{prompts, Error, Result};
use async_trait::async_trait;

/// Chat+image adapter: chat completions for text, a dedicated endpoint for art.
pub struct OpenAiProvider {
    http: OpenAiHttpClient,
    chat_model: String,
    image_model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, chat_model: String, image_model: String) -> Self {
        Self::new_with_client(api_key, chat_model, image_model, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        chat_model: String,
        image_model: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, client),
            chat_model,
            image_model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl StoryProvider for OpenAiProvider {
    async fn generate_story(&self, params: &StoryParameters) -> Result<StoryDraft> {
        let request = ChatCompletionRequest {
            model: self.chat_model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(prompts::build_story_prompt(params)),
            }],
        };

        let response = self.http.chat_completion(&request).await?;

        let choice = response.choices.first().ok_or_else(|| {
            tracing::error!("OpenAI returned no choices for story request");
            Error::ProviderRequest("No response from OpenAI chat API".to_string())
        })?;
        if let Some(reason) = choice.finish_reason.as_deref().filter(|r| *r != "stop") {
            tracing::warn!("OpenAI story completion finished with reason '{}'", reason);
        }
        let content = choice.message.content.as_deref().ok_or_else(|| {
            Error::ProviderRequest("Empty message from OpenAI chat API".to_string())
        })?;

        parse_story_response(content)
    }

    async fn generate_image(&self, image_prompt: &str) -> Result<ImageReference> {
        let request = ImageGenerationRequest {
            model: self.image_model.clone(),
            prompt: format!("{}{}", prompts::OPENAI_IMAGE_STYLE, image_prompt),
            n: 1,
            size: "1024x1024".to_string(),
            quality: "standard".to_string(),
            style: "vivid".to_string(),
        };

        let response = self.http.image_generation(&request).await?;

        let image_data = response
            .data
            .first()
            .ok_or_else(|| Error::ProviderRequest("No image data in OpenAI response".to_string()))?;

        if let Some(url) = &image_data.url {
            Ok(ImageReference::Remote(url.clone()))
        } else if let Some(b64_json) = &image_data.b64_json {
            mime::inline_image_from_base64(b64_json).map_err(|e| {
                Error::ProviderRequest(format!("Failed to decode OpenAI base64 image: {}", e))
            })
        } else {
            Err(Error::ProviderRequest(
                "No image data (neither URL nor base64) in OpenAI response".to_string(),
            ))
        }
    }
}
