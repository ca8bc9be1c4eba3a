use super::client::StabilityHttpClient;
use super::types::TextToImageRequest;
use crate::ai::{GeminiProvider, StoryProvider};
use crate::models::{ImageReference, StoryDraft, StoryParameters};
use crate::{prompts, Error, Result};
use async_trait::async_trait;

/// Image-specialized adapter.
///
/// It has no text model of its own: stories go through a Gemini provider built
/// from a separately configured credential. The Stability key only pays for
/// illustrations.
pub struct StabilityProvider {
    http: StabilityHttpClient,
    story_delegate: Option<GeminiProvider>,
}

impl StabilityProvider {
    pub fn new(api_key: String, story_delegate: Option<GeminiProvider>) -> Self {
        Self::new_with_client(api_key, story_delegate, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        story_delegate: Option<GeminiProvider>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: StabilityHttpClient::new_with_client(api_key, client),
            story_delegate,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl StoryProvider for StabilityProvider {
    async fn generate_story(&self, params: &StoryParameters) -> Result<StoryDraft> {
        match &self.story_delegate {
            Some(delegate) => delegate.generate_story(params).await,
            None => {
                tracing::error!("Stability provider has no text-generation credential");
                Err(Error::MissingCredential(
                    "stability stories need STABILITY_STORY_API_KEY or GEMINI_API_KEY".to_string(),
                ))
            }
        }
    }

    async fn generate_image(&self, image_prompt: &str) -> Result<ImageReference> {
        let request =
            TextToImageRequest::new(format!("{}{}", prompts::STABILITY_IMAGE_STYLE, image_prompt));

        let response = self.http.text_to_image(&request).await?;

        let artifact = response.artifacts.first().ok_or_else(|| {
            Error::ProviderRequest("No artifacts in Stability AI response".to_string())
        })?;
        if let Some(reason) = artifact.finish_reason.as_deref().filter(|r| *r != "SUCCESS") {
            tracing::warn!("Stability AI artifact finished with reason '{}'", reason);
        }

        let payload = artifact.base64.trim();
        if payload.is_empty() {
            return Err(Error::ProviderRequest(
                "Empty image payload in Stability AI response".to_string(),
            ));
        }

        // The endpoint always answers with PNG artifacts.
        Ok(ImageReference::inline("image/png", payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::ai::stability::client::TEXT_TO_IMAGE_PATH;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_generate_image_sends_wire_contract() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TEXT_TO_IMAGE_PATH))
            .and(header("Authorization", "Bearer stab-key"))
            .and(header("Accept", "application/json"))
            .and(body_json(serde_json::json!({
                "text_prompts": [{
                    "text": "Children's storybook illustration, colorful, friendly style: A sleepy dragon",
                    "weight": 1
                }],
                "cfg_scale": 7,
                "height": 1024,
                "width": 1024,
                "samples": 1,
                "steps": 30
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "artifacts": [{ "base64": "iVBORw==", "seed": 42, "finishReason": "SUCCESS" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = StabilityProvider::new("stab-key".to_string(), None).with_base_url(server.uri());
        let image = provider.generate_image("A sleepy dragon").await.unwrap();

        assert_eq!(image.as_str(), "data:image/png;base64,iVBORw==");
    }

    #[tokio::test]
    async fn test_generate_image_labels_payload_png_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TEXT_TO_IMAGE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "artifacts": [
                    { "base64": "/9j/4AAQ", "finishReason": "SUCCESS" },
                    { "base64": "iVBORw0KGgo", "finishReason": "SUCCESS" }
                ]
            })))
            .mount(&server)
            .await;

        let provider = StabilityProvider::new("key".to_string(), None).with_base_url(server.uri());
        let image = provider.generate_image("A dragon").await.unwrap();

        assert_eq!(image.as_str(), "data:image/png;base64,/9j/4AAQ");
    }

    #[tokio::test]
    async fn test_generate_image_unpadded_payload_passes_through() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TEXT_TO_IMAGE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "artifacts": [{ "base64": "iVBORw0KGgo", "finishReason": "SUCCESS" }]
            })))
            .mount(&server)
            .await;

        let provider = StabilityProvider::new("key".to_string(), None).with_base_url(server.uri());
        let image = provider.generate_image("A dragon").await.unwrap();

        assert_eq!(image.as_str(), "data:image/png;base64,iVBORw0KGgo");
    }

    #[tokio::test]
    async fn test_generate_image_error_carries_upstream_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TEXT_TO_IMAGE_PATH))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"message":"invalid api key"}"#),
            )
            .mount(&server)
            .await;

        let provider = StabilityProvider::new("bad".to_string(), None).with_base_url(server.uri());
        let err = provider.generate_image("A dragon").await.unwrap_err();

        assert!(matches!(err, Error::ProviderRequest(ref detail) if detail.contains("invalid api key")));
    }

    #[tokio::test]
    async fn test_generate_image_without_artifacts() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TEXT_TO_IMAGE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "artifacts": []
            })))
            .mount(&server)
            .await;

        let provider = StabilityProvider::new("key".to_string(), None).with_base_url(server.uri());
        let err = provider.generate_image("A dragon").await.unwrap_err();
        assert!(matches!(err, Error::ProviderRequest(_)));
    }

    #[tokio::test]
    async fn test_generate_story_delegates_with_secondary_credential() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(header("x-goog-api-key", "gemini-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(test_support::text_reply(
                r#"{"title": "Delegated", "pages": []}"#,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let delegate = GeminiProvider::new("gemini-key".to_string(), "gemini-2.0-flash".to_string())
            .with_base_url(server.uri());
        let provider = StabilityProvider::new("stab-key".to_string(), Some(delegate));

        let draft = provider
            .generate_story(&StoryParameters::new("a dragon"))
            .await
            .unwrap();
        assert_eq!(draft.title, "Delegated");
    }

    #[tokio::test]
    async fn test_generate_story_without_delegate_fails() {
        let provider = StabilityProvider::new("stab-key".to_string(), None);
        let err = provider
            .generate_story(&StoryParameters::new("a dragon"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingCredential(_)));
    }
}
