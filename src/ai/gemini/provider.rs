use super::client::GeminiHttpClient;
use super::types::{GenerateContentRequest, GenerateContentResponse};
use crate::ai::{parse_story_response, StoryProvider};
use crate::models::{ImageReference, StoryDraft, StoryParameters};
use crate::{prompts, Error, Result};
use async_trait::async_trait;

/// Marker a text model may use to hand back an embedded image.
const IMAGE_DATA_MARKER: &str = "image data: ";

/// Language-model adapter: one model handle serves both story and image paths.
pub struct GeminiProvider {
    http: GeminiHttpClient,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn embedded_image(response: &GenerateContentResponse) -> Option<ImageReference> {
        if let Some(inline) = response.inline_data() {
            return Some(ImageReference::inline(&inline.mime_type, &inline.data));
        }

        let text = response.text()?;
        let start = text.find(IMAGE_DATA_MARKER)? + IMAGE_DATA_MARKER.len();
        let payload = text[start..].lines().next().unwrap_or_default().trim();
        (!payload.is_empty()).then(|| ImageReference::inline("image/png", payload))
    }
}

#[async_trait]
impl StoryProvider for GeminiProvider {
    async fn generate_story(&self, params: &StoryParameters) -> Result<StoryDraft> {
        let request = GenerateContentRequest::user_text([prompts::build_story_prompt(params)]);
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let text = response.text().ok_or_else(|| {
            tracing::error!("Gemini returned no text for story request");
            Error::ProviderRequest("No text in Gemini story response".to_string())
        })?;

        parse_story_response(&text)
    }

    /// Best effort: asks the text model for an image and only succeeds when
    /// the reply actually embeds one.
    async fn generate_image(&self, image_prompt: &str) -> Result<ImageReference> {
        let request = GenerateContentRequest::user_text([
            prompts::render(prompts::IMAGE_DESCRIPTION, &[("prompt", image_prompt)]),
            prompts::IMAGE_FOLLOW_UP.to_string(),
        ]);
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        Self::embedded_image(&response).ok_or_else(|| {
            Error::ImageGenerationUnsupported(format!(
                "{} returned no embedded image",
                self.http.model()
            ))
        })
    }
}
